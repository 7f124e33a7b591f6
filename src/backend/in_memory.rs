use std::cell::RefCell;
use std::collections::BTreeMap;

use anyhow::Result;

use crate::backend::area::StorageArea;

/// In‑memory storage area (no persistence). Used by tests and by hosts without a browser.
///
/// Keys are enumerated by [`StorageArea::key`] in lexicographic order, which keeps
/// index based scans deterministic.
#[derive(Debug, Default)]
pub struct InMemoryStorageArea {
    map: RefCell<BTreeMap<String, String>>,
}

impl InMemoryStorageArea {
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an area pre-filled with the given raw (already namespaced) entries.
    pub fn with_items<I, K, V>(items: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        let map = items
            .into_iter()
            .map(|(k, v)| (k.into(), v.into()))
            .collect();
        Self { map: RefCell::new(map) }
    }
}

impl StorageArea for InMemoryStorageArea {
    fn get_item(&self, key: &str) -> Option<String> {
        self.map.borrow().get(key).cloned()
    }

    fn set_item(&self, key: &str, value: &str) -> Result<()> {
        self.map
            .borrow_mut()
            .insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove_item(&self, key: &str) -> Result<()> {
        self.map.borrow_mut().remove(key);
        Ok(())
    }

    fn key(&self, index: usize) -> Option<String> {
        self.map.borrow().keys().nth(index).cloned()
    }

    fn len(&self) -> usize {
        self.map.borrow().len()
    }

    fn clear(&self) -> Result<()> {
        self.map.borrow_mut().clear();
        Ok(())
    }

    fn keys(&self) -> Vec<String> {
        self.map.borrow().keys().cloned().collect()
    }
}
