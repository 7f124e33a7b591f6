use serde::Serialize;
use serde_json::{Map, Value};

use crate::errors::StorageError;

/// A value that can be written into a [`Storage`](crate::storage::Storage).
///
/// Everything is stored as text; the variant only decides how that text is produced.
#[derive(Clone, Debug, PartialEq)]
pub enum StorageValue {
    String(String),
    Number(f64),
    Boolean(bool),
    Record(Map<String, Value>),
    Array(Vec<Value>),
}

impl StorageValue {
    /// Serializes `value` to JSON and classifies the result.
    ///
    /// Fails with [`StorageError::InvalidValueType`] when `value` serializes to `null`
    /// (e.g. `()` or `None`) or cannot be serialized at all.
    pub fn from_serialize<T: Serialize + ?Sized>(value: &T) -> Result<Self, StorageError> {
        let json = serde_json::to_value(value).map_err(|_| StorageError::InvalidValueType)?;
        Self::try_from(json)
    }
}

impl TryFrom<Value> for StorageValue {
    type Error = StorageError;

    fn try_from(value: Value) -> Result<Self, Self::Error> {
        match value {
            Value::String(s) => Ok(Self::String(s)),
            Value::Bool(b) => Ok(Self::Boolean(b)),
            Value::Number(n) => n.as_f64().map(Self::Number).ok_or(StorageError::InvalidValueType),
            Value::Object(m) => Ok(Self::Record(m)),
            Value::Array(a) => Ok(Self::Array(a)),
            Value::Null => Err(StorageError::InvalidValueType),
        }
    }
}

impl From<&str> for StorageValue {
    fn from(v: &str) -> Self {
        Self::String(v.to_string())
    }
}

impl From<String> for StorageValue {
    fn from(v: String) -> Self {
        Self::String(v)
    }
}

impl From<&String> for StorageValue {
    fn from(v: &String) -> Self {
        Self::String(v.clone())
    }
}

impl From<bool> for StorageValue {
    fn from(v: bool) -> Self {
        Self::Boolean(v)
    }
}

macro_rules! number_from {
    ($($t:ty),*) => {
        $(
            impl From<$t> for StorageValue {
                fn from(v: $t) -> Self {
                    Self::Number(v as f64)
                }
            }
        )*
    };
}

number_from!(f64, f32, i8, i16, i32, i64, u8, u16, u32, u64, isize, usize);

impl From<Map<String, Value>> for StorageValue {
    fn from(v: Map<String, Value>) -> Self {
        Self::Record(v)
    }
}

impl From<Vec<Value>> for StorageValue {
    fn from(v: Vec<Value>) -> Self {
        Self::Array(v)
    }
}

impl From<Vec<&str>> for StorageValue {
    fn from(v: Vec<&str>) -> Self {
        Self::Array(v.into_iter().map(Value::from).collect())
    }
}

impl From<Vec<String>> for StorageValue {
    fn from(v: Vec<String>) -> Self {
        Self::Array(v.into_iter().map(Value::from).collect())
    }
}
