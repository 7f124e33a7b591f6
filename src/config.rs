use serde::{Deserialize, Serialize};

use crate::storage::HistoryMode;

/// Which backend a storage built from configuration should use.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BackendKind {
    Local,
    Session,
    Url,
}

/// Options for a storage instance.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageOptions {
    /// Prefix for all keys managed by the storage
    pub prefix: Option<String>,
    /// How URL storages update the history. Ignored by the other backends.
    pub history_mode: HistoryMode,
}

impl StorageOptions {
    pub fn with_prefix(prefix: impl Into<String>) -> Self {
        Self {
            prefix: Some(prefix.into()),
            ..Self::default()
        }
    }

    pub fn history_mode(mut self, mode: HistoryMode) -> Self {
        self.history_mode = mode;
        self
    }
}
