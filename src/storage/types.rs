use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// How a URL storage records a mutation in the session history.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum HistoryMode {
    /// Overwrite the current history entry.
    #[default]
    Replace,
    /// Append a new history entry for every mutation.
    Push,
}

impl fmt::Display for HistoryMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HistoryMode::Replace => f.write_str("REPLACE"),
            HistoryMode::Push => f.write_str("PUSH"),
        }
    }
}

impl FromStr for HistoryMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "REPLACE" => Ok(HistoryMode::Replace),
            "PUSH" => Ok(HistoryMode::Push),
            other => Err(format!("unknown history mode: {other}")),
        }
    }
}

/// Which key/value area an area backed storage talks to.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum StorageScope {
    Local,
    Session,
}

impl fmt::Display for StorageScope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StorageScope::Local => f.write_str("local"),
            StorageScope::Session => f.write_str("session"),
        }
    }
}
