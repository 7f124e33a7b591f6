use std::fmt;
use std::rc::Rc;

use crate::backend::Navigation;
use crate::errors::Result;
use crate::storage::codec::prepare_value;
use crate::storage::namespace::KeyNamespace;
use crate::storage::query::{query_values, update_url, QueryParams};
use crate::storage::types::HistoryMode;
use crate::storage::{Entries, Keys, Storage};

/// [`Storage`] kept in the query string of the current URL.
///
/// Each `set`/`del` call reads the current query, applies all of its changes and then
/// records exactly one history transition, replacing or pushing according to the
/// [`HistoryMode`] chosen at construction. The URL hash is left untouched.
///
/// The read and the write are separate steps: a URL change made by someone else in
/// between is overwritten.
pub struct UrlStorage {
    navigation: Rc<dyn Navigation>,
    namespace: KeyNamespace,
    mode: HistoryMode,
}

impl fmt::Debug for UrlStorage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("UrlStorage")
            .field("prefix", &self.namespace.prefix())
            .field("mode", &self.mode)
            .finish_non_exhaustive()
    }
}

impl UrlStorage {
    pub fn new(navigation: Rc<dyn Navigation>, prefix: Option<&str>, mode: HistoryMode) -> Self {
        Self {
            navigation,
            namespace: KeyNamespace::new(prefix),
            mode,
        }
    }

    pub fn mode(&self) -> HistoryMode {
        self.mode
    }

    pub fn prefix(&self) -> Option<&str> {
        self.namespace.prefix()
    }

    /// All parameters of the current URL, decoded, regardless of prefix.
    pub fn query_values(&self) -> QueryParams {
        query_values(self.navigation.as_ref())
    }

    fn commit(&self, params: &QueryParams) -> Result<()> {
        update_url(self.navigation.as_ref(), self.mode, params).map_err(|e| {
            log::warn!("url storage: cannot update history: {e:#}");
            e.into()
        })
    }
}

impl Storage for UrlStorage {
    fn set(&self, entries: Entries) -> Result<()> {
        let mut params = self.query_values();
        for (key, value) in entries.iter() {
            params.insert(self.namespace.concat(key).into_owned(), prepare_value(value)?);
        }
        log::debug!("url storage: writing {} entries", entries.len());
        self.commit(&params)
    }

    fn get(&self, key: &str) -> Option<String> {
        self.query_values()
            .get(&self.namespace.concat(key))
            .map(str::to_string)
    }

    fn del(&self, keys: Keys) -> Result<()> {
        let mut params = self.query_values();
        for key in keys.iter() {
            params.remove(&self.namespace.concat(key));
        }
        log::debug!("url storage: deleting keys");
        self.commit(&params)
    }

    fn size(&self) -> usize {
        self.query_values()
            .keys()
            .filter(|k| self.namespace.matches(k))
            .count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::InMemoryNavigation;
    use crate::errors::StorageError;
    use crate::storage::StorageExt;
    use serde_json::{json, Value};

    const KEY: &str = "abc";
    const BASE: &str = "http://localhost/";

    fn setup(prefix: Option<&str>, mode: HistoryMode) -> (Rc<InMemoryNavigation>, UrlStorage) {
        let nav = Rc::new(InMemoryNavigation::new(BASE).unwrap());
        let storage = UrlStorage::new(nav.clone(), prefix, mode);
        (nav, storage)
    }

    fn search(nav: &InMemoryNavigation) -> String {
        nav.location().search
    }

    fn expect_key_value(nav: &InMemoryNavigation, key: &str, value: &str) {
        assert_eq!(search(nav), format!("?{key}={value}"));
    }

    #[test]
    fn get_reads_prefixed_key() {
        let (nav, storage) = setup(Some("test"), HistoryMode::Replace);
        nav.replace_state(&format!("{BASE}?test_abc=someValue&test_efg=otherValue")).unwrap();
        assert_eq!(storage.get(KEY).as_deref(), Some("someValue"));
    }

    #[test]
    fn set_writes_prefixed_key() {
        let (nav, storage) = setup(Some("test"), HistoryMode::Replace);
        storage.set_item(KEY, "someValue").unwrap();
        expect_key_value(&nav, "test_abc", "someValue");
    }

    #[test]
    fn del_removes_prefixed_keys() {
        let (nav, storage) = setup(Some("test"), HistoryMode::Replace);
        nav.replace_state(&format!("{BASE}?test_abc=someValue&test_efg=otherValue")).unwrap();

        storage.del(Keys::from(KEY)).unwrap();
        assert_eq!(search(&nav), "?test_efg=otherValue");

        nav.replace_state(&format!("{BASE}?test_abc=someValue&test_efg=otherValue")).unwrap();
        storage.del(Keys::from([KEY, "efg"])).unwrap();
        assert_eq!(search(&nav), "");
        assert_eq!(nav.current_url().as_str(), BASE);
    }

    #[test]
    fn two_prefixes_share_the_url() {
        let (nav, storage) = setup(Some("test"), HistoryMode::Replace);
        let unprefixed = UrlStorage::new(nav.clone(), None, HistoryMode::Replace);

        storage.set_item(KEY, "prefixedValue").unwrap();
        unprefixed.set_item(KEY, "value").unwrap();

        assert_eq!(search(&nav), "?test_abc=prefixedValue&abc=value");
        assert_eq!(storage.get(KEY).as_deref(), Some("prefixedValue"));
        assert_eq!(unprefixed.get(KEY).as_deref(), Some("value"));
    }

    #[test]
    fn values_are_serialized_and_encoded() {
        let (nav, storage) = setup(Some("test"), HistoryMode::Replace);

        storage.set_item(KEY, true).unwrap();
        expect_key_value(&nav, "test_abc", "true");

        storage.set_item(KEY, -524.6).unwrap();
        expect_key_value(&nav, "test_abc", "-524.6");

        storage.set_json(KEY, json!({"name": "Jane Doe"})).unwrap();
        expect_key_value(&nav, "test_abc", "%7B%22name%22%3A%22Jane%20Doe%22%7D");

        storage.set_item(KEY, vec!["eins", "zwei"]).unwrap();
        expect_key_value(&nav, "test_abc", "%5B%22eins%22%2C%22zwei%22%5D");
    }

    #[test]
    fn batch_lands_as_separate_parameters() {
        let (nav, storage) = setup(Some("test"), HistoryMode::Replace);
        storage
            .set_json_map(json!({"str": "someString", "bool": true, "obj": {"val": "innerValue"}}))
            .unwrap();

        let s = search(&nav);
        let pairs: Vec<&str> = s.trim_start_matches('?').split('&').collect();
        assert_eq!(
            pairs,
            vec![
                "test_str=someString",
                "test_bool=true",
                "test_obj=%7B%22val%22%3A%22innerValue%22%7D",
            ]
        );
    }

    #[test]
    fn overwrite_keeps_parameter_position() {
        let (nav, storage) = setup(None, HistoryMode::Replace);
        nav.replace_state(&format!("{BASE}?a=1&b=2&c=3")).unwrap();

        storage.set_item("a", "9").unwrap();
        storage.set_item("d", "4").unwrap();
        assert_eq!(search(&nav), "?a=9&b=2&c=3&d=4");
    }

    #[test]
    fn typed_readers_round_trip_through_the_url() {
        let (_, storage) = setup(Some("test"), HistoryMode::Replace);

        storage.set_item("num", 0).unwrap();
        storage.set_item("bool", false).unwrap();
        storage.set_json("obj", json!({"name": "Jane Doe"})).unwrap();
        storage.set_item("arr", vec!["eins", "zwei"]).unwrap();

        assert_eq!(storage.get_as_number("num"), Some(0.0));
        assert_eq!(storage.get_as_boolean("bool"), Some(false));
        assert_eq!(storage.get_as_record("obj"), Some(json!({"name": "Jane Doe"})));
        assert_eq!(storage.get_as_array("obj"), None);
        assert_eq!(storage.get_as_array("arr"), Some(vec![json!("eins"), json!("zwei")]));
        assert_eq!(storage.get_as_number("bool"), None);
    }

    #[test]
    fn plus_and_space_round_trip() {
        let (nav, storage) = setup(None, HistoryMode::Replace);

        storage.set_item(KEY, "a+b c").unwrap();
        expect_key_value(&nav, KEY, "a%2Bb%20c");
        assert_eq!(storage.get(KEY).as_deref(), Some("a+b c"));

        nav.replace_state(&format!("{BASE}?abc=x+y")).unwrap();
        assert_eq!(storage.get(KEY).as_deref(), Some("x y"));
    }

    #[test]
    fn keys_with_plus_and_space_round_trip() {
        let (nav, storage) = setup(Some("test"), HistoryMode::Replace);

        storage.set_item("a key+val", "v").unwrap();
        assert_eq!(search(&nav), "?test_a%20key%2Bval=v");
        assert_eq!(storage.get("a key+val").as_deref(), Some("v"));
        assert_eq!(storage.size(), 1);

        nav.replace_state(&format!("{BASE}?test_x+y=1")).unwrap();
        assert_eq!(storage.get("x y").as_deref(), Some("1"));
        assert_eq!(storage.get("x+y"), None);

        storage.del_item("x y").unwrap();
        assert_eq!(search(&nav), "");
    }

    #[test]
    fn malformed_query_yields_absent_values() {
        let (nav, storage) = setup(None, HistoryMode::Replace);
        nav.replace_state(&format!("{BASE}?abc&x=1=2&y=%FF")).unwrap();

        assert_eq!(storage.get(KEY), None);
        assert_eq!(storage.get("x"), None);
        assert_eq!(storage.get("y"), None);
        assert!(storage.is_empty());
    }

    #[test]
    fn replace_mode_never_grows_history() {
        let (nav, storage) = setup(Some("test"), HistoryMode::Replace);
        let before = nav.history_len();

        storage.set_item("a", 1).unwrap();
        storage.set_all([("b", 2), ("c", 3)]).unwrap();
        storage.del(Keys::from(["a", "b"])).unwrap();
        storage.del_item("missing").unwrap();

        assert_eq!(nav.history_len(), before);
    }

    #[test]
    fn push_mode_adds_one_entry_per_call() {
        let (nav, storage) = setup(Some("test"), HistoryMode::Push);
        let before = nav.history_len();

        storage.set_item("a", 1).unwrap();
        assert_eq!(nav.history_len(), before + 1);

        storage.set_all([("b", 2), ("c", 3), ("d", 4)]).unwrap();
        assert_eq!(nav.history_len(), before + 2);

        storage.del(Keys::from(["a", "b", "c"])).unwrap();
        assert_eq!(nav.history_len(), before + 3);

        // going back restores the previous query
        assert!(nav.back());
        assert_eq!(storage.get("a").as_deref(), Some("1"));
    }

    #[test]
    fn hash_is_preserved_in_both_modes() {
        for mode in [HistoryMode::Replace, HistoryMode::Push] {
            let (nav, storage) = setup(Some("test"), mode);
            nav.replace_state(&format!("{BASE}#some-anchor")).unwrap();

            storage.set_item(KEY, "v").unwrap();
            assert_eq!(nav.location().hash, "#some-anchor");
            assert_eq!(nav.current_url().as_str(), format!("{BASE}?test_abc=v#some-anchor"));

            storage.del_item(KEY).unwrap();
            assert_eq!(nav.location().hash, "#some-anchor");
            assert_eq!(nav.current_url().as_str(), format!("{BASE}#some-anchor"));
        }
    }

    #[test]
    fn size_counts_prefixed_parameters() {
        let (nav, storage) = setup(Some("test"), HistoryMode::Replace);
        nav.replace_state(&format!("{BASE}?test_a=1&test_b=2&other=3&tester=4")).unwrap();

        // literal prefix match also counts "tester"
        assert_eq!(storage.size(), 3);
        assert!(!storage.is_empty());

        let unprefixed = UrlStorage::new(nav.clone(), None, HistoryMode::Replace);
        assert_eq!(unprefixed.size(), 4);
    }

    #[test]
    fn invalid_writes_leave_the_url_alone() {
        let (nav, storage) = setup(None, HistoryMode::Push);

        assert!(matches!(storage.set_json(KEY, Value::Null), Err(StorageError::InvalidValueType)));
        assert!(matches!(storage.set_json_map(json!("nope")), Err(StorageError::InvalidArguments)));
        assert_eq!(nav.history_len(), 1);
        assert_eq!(search(&nav), "");
    }
}
