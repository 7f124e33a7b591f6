/// Errors raised by write operations on a [`Storage`](crate::storage::Storage).
///
/// Reads never fail: anything that cannot be interpreted as the requested type
/// is reported as `None` instead.
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("Invalid type of value")]
    InvalidValueType,

    #[error("Either specify key, value or an object containing multiple key/value pairs")]
    InvalidArguments,

    #[error("Storage backend error: {0}")]
    Backend(#[from] anyhow::Error),
}

/// Failure to interpret a stored string as a typed value.
///
/// Only used internally by the readers; it is collapsed into `None` before it
/// reaches the caller.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ParseError {
    #[error("value is not a number")]
    NotANumber,

    #[error("value is not a boolean")]
    NotABoolean,

    #[error("value is not valid JSON: {0}")]
    InvalidJson(String),

    #[error("value is not a JSON object or array")]
    NotARecord,

    #[error("value is not a JSON array")]
    NotAnArray,
}

pub type Result<T, E = StorageError> = std::result::Result<T, E>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn messages_match_the_public_contract() {
        assert_eq!(StorageError::InvalidValueType.to_string(), "Invalid type of value");
        assert!(StorageError::InvalidArguments.to_string().starts_with("Either specify key, value"));
    }

    #[test]
    fn backend_errors_wrap_anyhow() {
        let err: StorageError = anyhow::anyhow!("quota exceeded").into();
        assert!(matches!(err, StorageError::Backend(_)));
        assert_eq!(err.to_string(), "Storage backend error: quota exceeded");
    }
}
