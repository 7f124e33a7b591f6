pub mod backend;
pub mod config;
pub mod errors;
pub mod provider;
pub mod storage;

pub use config::{BackendKind, StorageOptions};
pub use errors::StorageError;
pub use provider::StorageProvider;
pub use storage::{Entries, HistoryMode, Keys, Storage, StorageExt, StorageValue};
