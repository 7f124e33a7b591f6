//! Typed key/value storage over interchangeable backends.
//!
//! Everything written through a [`Storage`] ends up as a string in some backend: a
//! local storage area, a session storage area, or the query string of the current URL.
//! The typed readers (`get_as_*`) reconstruct values from that text and report anything
//! they cannot interpret as `None`.
//!
//! # Concepts
//!
//! - **Prefix** — every storage may carry a prefix; the key `k` is then stored as
//!   `prefix_k`, so several independent users can share one backend.
//! - **Entries** — a write is either a single key/value pair or an ordered batch
//!   ([`Entries`]). A batch becomes a single history entry on URL storage.
//! - **History mode** — URL storage either replaces the current history entry on every
//!   mutation or pushes a new one ([`HistoryMode`]).
//!
//! # Example
//!
//! ```
//! use gosub_storage::{Storage, StorageExt, StorageProvider};
//!
//! let provider = StorageProvider::in_memory("https://example.com/").unwrap();
//! let storage = provider.local_storage(Some("test"));
//!
//! storage.set_item("abc", -524.6).unwrap();
//! assert_eq!(storage.get("abc").as_deref(), Some("-524.6"));
//! assert_eq!(storage.get_as_number("abc"), Some(-524.6));
//! ```

use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::errors::{Result, StorageError};

/// Local/session storage adapter.
pub mod area_storage;
/// Value text conversion.
pub mod codec;
/// Key prefixing.
pub mod namespace;
/// Query string parsing and URL rebuilding.
pub mod query;
/// History mode and storage scope.
pub mod types;
/// URL query storage adapter.
pub mod url_storage;
/// Storable values.
pub mod value;

pub use area_storage::AreaStorage;
pub use namespace::KeyNamespace;
pub use types::{HistoryMode, StorageScope};
pub use url_storage::UrlStorage;
pub use value::StorageValue;

/// Arguments of a write: one key/value pair or an ordered batch of them.
#[derive(Clone, Debug, PartialEq)]
pub enum Entries {
    Single(String, StorageValue),
    Batch(Vec<(String, StorageValue)>),
}

impl Entries {
    pub fn single(key: impl Into<String>, value: impl Into<StorageValue>) -> Self {
        Entries::Single(key.into(), value.into())
    }

    pub fn batch<I, K, V>(entries: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<StorageValue>,
    {
        Entries::Batch(
            entries
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }

    /// Builds entries from loosely typed arguments: a key with a value, or no key and a
    /// JSON object holding several pairs.
    ///
    /// Any other combination fails with [`StorageError::InvalidArguments`]; a `null`
    /// value fails with [`StorageError::InvalidValueType`].
    pub fn from_json(key: Option<&str>, value: Option<Value>) -> Result<Self> {
        match (key, value) {
            (Some(key), Some(value)) => Ok(Entries::Single(key.to_string(), StorageValue::try_from(value)?)),
            (None, Some(Value::Object(map))) => {
                let entries = map
                    .into_iter()
                    .map(|(k, v)| StorageValue::try_from(v).map(|v| (k, v)))
                    .collect::<Result<Vec<_>>>()?;
                Ok(Entries::Batch(entries))
            }
            _ => Err(StorageError::InvalidArguments),
        }
    }

    /// Iterates the pairs in write order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &StorageValue)> {
        let (single, batch) = match self {
            Entries::Single(k, v) => (Some((k.as_str(), v)), &[][..]),
            Entries::Batch(pairs) => (None, pairs.as_slice()),
        };
        single
            .into_iter()
            .chain(batch.iter().map(|(k, v)| (k.as_str(), v)))
    }

    pub fn len(&self) -> usize {
        match self {
            Entries::Single(..) => 1,
            Entries::Batch(pairs) => pairs.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl<K: Into<String>, V: Into<StorageValue>> From<(K, V)> for Entries {
    fn from((k, v): (K, V)) -> Self {
        Entries::single(k, v)
    }
}

/// Keys to delete: one or many.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Keys {
    One(String),
    Many(Vec<String>),
}

impl Keys {
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        match self {
            Keys::One(k) => std::slice::from_ref(k).iter(),
            Keys::Many(ks) => ks.iter(),
        }
        .map(String::as_str)
    }
}

impl From<&str> for Keys {
    fn from(k: &str) -> Self {
        Keys::One(k.to_string())
    }
}

impl From<String> for Keys {
    fn from(k: String) -> Self {
        Keys::One(k)
    }
}

impl From<Vec<String>> for Keys {
    fn from(ks: Vec<String>) -> Self {
        Keys::Many(ks)
    }
}

impl From<Vec<&str>> for Keys {
    fn from(ks: Vec<&str>) -> Self {
        Keys::Many(ks.into_iter().map(str::to_string).collect())
    }
}

impl From<&[&str]> for Keys {
    fn from(ks: &[&str]) -> Self {
        Keys::Many(ks.iter().map(|k| k.to_string()).collect())
    }
}

impl<const N: usize> From<[&str; N]> for Keys {
    fn from(ks: [&str; N]) -> Self {
        Keys::Many(ks.iter().map(|k| k.to_string()).collect())
    }
}

/// Uniform key/value capability implemented by every backend adapter.
///
/// All keys are logical keys; implementations apply their prefix before touching the
/// backend.
pub trait Storage {
    /// Writes one value or a batch of values.
    ///
    /// Batches are not atomic on area backends: a backend failure leaves the pairs
    /// before it written.
    fn set(&self, entries: Entries) -> Result<()>;

    /// Returns the raw stored text for `key`.
    fn get(&self, key: &str) -> Option<String>;

    /// Deletes one or many keys. Missing keys are ignored.
    fn del(&self, keys: Keys) -> Result<()>;

    /// Number of backend keys starting with this storage's prefix (all keys when
    /// there is no prefix).
    fn size(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.size() == 0
    }

    /// Same as [`get`](Storage::get); every stored value is a string.
    fn get_as_string(&self, key: &str) -> Option<String> {
        self.get(key)
    }

    /// The stored text as a number; `"0"` yields `Some(0.0)`.
    fn get_as_number(&self, key: &str) -> Option<f64> {
        self.get(key).and_then(|s| codec::parse_number(&s).ok())
    }

    /// `Some` only for exactly `"true"` or `"false"`.
    fn get_as_boolean(&self, key: &str) -> Option<bool> {
        self.get(key).and_then(|s| codec::parse_boolean(&s).ok())
    }

    /// The stored text parsed as a JSON object or array.
    fn get_as_record(&self, key: &str) -> Option<Value> {
        self.get(key).and_then(|s| codec::parse_record(&s).ok())
    }

    /// The stored text parsed as a JSON array.
    fn get_as_array(&self, key: &str) -> Option<Vec<Value>> {
        self.get(key).and_then(|s| codec::parse_array(&s).ok())
    }

    /// Like [`get_as_record`](Storage::get_as_record), but only when `predicate`
    /// accepts the record.
    fn get_as_object(&self, key: &str, predicate: &dyn Fn(&Value) -> bool) -> Option<Value> {
        self.get_as_record(key).filter(|record| predicate(record))
    }
}

/// Generic conveniences on top of [`Storage`], available on trait objects as well.
pub trait StorageExt: Storage {
    /// Writes a single value.
    fn set_item<K, V>(&self, key: K, value: V) -> Result<()>
    where
        K: Into<String>,
        V: Into<StorageValue>,
    {
        self.set(Entries::single(key, value))
    }

    /// Writes several values as one batch.
    fn set_all<I, K, V>(&self, entries: I) -> Result<()>
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<StorageValue>,
    {
        self.set(Entries::batch(entries))
    }

    /// Writes a loosely typed JSON value under `key`.
    fn set_json(&self, key: &str, value: Value) -> Result<()> {
        self.set(Entries::from_json(Some(key), Some(value))?)
    }

    /// Writes every pair of a JSON object as one batch.
    fn set_json_map(&self, map: Value) -> Result<()> {
        self.set(Entries::from_json(None, Some(map))?)
    }

    /// Serializes `value` and writes it under `key`.
    fn set_serialized<T: serde::Serialize + ?Sized>(&self, key: &str, value: &T) -> Result<()> {
        self.set(Entries::Single(key.to_string(), StorageValue::from_serialize(value)?))
    }

    fn del_item(&self, key: &str) -> Result<()> {
        self.del(Keys::from(key))
    }

    /// Reads a record accepted by `predicate` and deserializes it into `T`.
    ///
    /// `None` when the key is missing, the text is not a record, the predicate rejects
    /// it, or it does not deserialize into `T`.
    fn get_as_object_of<T, F>(&self, key: &str, predicate: F) -> Option<T>
    where
        T: DeserializeOwned,
        F: Fn(&Value) -> bool,
    {
        let record = self.get_as_object(key, &predicate)?;
        serde_json::from_value(record).ok()
    }
}

impl<S: Storage + ?Sized> StorageExt for S {}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn entries_from_json_pairs() {
        let e = Entries::from_json(Some("k"), Some(json!(true))).unwrap();
        assert_eq!(e, Entries::single("k", true));

        let e = Entries::from_json(None, Some(json!({"str": "a", "bool": true}))).unwrap();
        let pairs: Vec<_> = e.iter().map(|(k, _)| k.to_string()).collect();
        assert_eq!(pairs, vec!["str", "bool"]);
    }

    #[test]
    fn entries_from_json_rejects_other_shapes() {
        assert!(matches!(Entries::from_json(None, None), Err(StorageError::InvalidArguments)));
        assert!(matches!(Entries::from_json(Some("k"), None), Err(StorageError::InvalidArguments)));
        assert!(matches!(
            Entries::from_json(None, Some(json!("not a map"))),
            Err(StorageError::InvalidArguments)
        ));
        assert!(matches!(
            Entries::from_json(None, Some(json!(["a", "b"]))),
            Err(StorageError::InvalidArguments)
        ));
    }

    #[test]
    fn entries_from_json_rejects_null_values() {
        assert!(matches!(
            Entries::from_json(Some("k"), Some(Value::Null)),
            Err(StorageError::InvalidValueType)
        ));
        assert!(matches!(
            Entries::from_json(None, Some(json!({"a": 1, "b": null}))),
            Err(StorageError::InvalidValueType)
        ));
    }

    #[test]
    fn entries_iterate_in_order() {
        let e = Entries::batch([("a", 1), ("b", 2)]);
        assert_eq!(e.len(), 2);
        let keys: Vec<_> = e.iter().map(|(k, _)| k).collect();
        assert_eq!(keys, vec!["a", "b"]);

        let e: Entries = ("only", "value").into();
        assert_eq!(e.len(), 1);
        assert!(!e.is_empty());
    }

    #[test]
    fn keys_conversions() {
        assert_eq!(Keys::from("a").iter().collect::<Vec<_>>(), vec!["a"]);
        assert_eq!(Keys::from(["a", "b"]).iter().collect::<Vec<_>>(), vec!["a", "b"]);
        assert_eq!(Keys::from(vec!["x".to_string()]), Keys::Many(vec!["x".to_string()]));
    }
}
