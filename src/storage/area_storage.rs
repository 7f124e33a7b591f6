use std::fmt;
use std::rc::Rc;

use crate::backend::StorageArea;
use crate::errors::Result;
use crate::storage::codec::prepare_value;
use crate::storage::namespace::KeyNamespace;
use crate::storage::types::StorageScope;
use crate::storage::{Entries, Keys, Storage};

/// [`Storage`] over a local or session [`StorageArea`].
///
/// Every call goes straight to the area; nothing is cached.
pub struct AreaStorage {
    scope: StorageScope,
    area: Rc<dyn StorageArea>,
    namespace: KeyNamespace,
}

impl fmt::Debug for AreaStorage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AreaStorage")
            .field("scope", &self.scope)
            .field("prefix", &self.namespace.prefix())
            .finish_non_exhaustive()
    }
}

impl AreaStorage {
    pub fn new(scope: StorageScope, area: Rc<dyn StorageArea>, prefix: Option<&str>) -> Self {
        Self {
            scope,
            area,
            namespace: KeyNamespace::new(prefix),
        }
    }

    /// Storage over a local storage area.
    pub fn local(area: Rc<dyn StorageArea>, prefix: Option<&str>) -> Self {
        Self::new(StorageScope::Local, area, prefix)
    }

    /// Storage over a session storage area.
    pub fn session(area: Rc<dyn StorageArea>, prefix: Option<&str>) -> Self {
        Self::new(StorageScope::Session, area, prefix)
    }

    pub fn scope(&self) -> StorageScope {
        self.scope
    }

    pub fn prefix(&self) -> Option<&str> {
        self.namespace.prefix()
    }
}

impl Storage for AreaStorage {
    fn set(&self, entries: Entries) -> Result<()> {
        log::debug!("{} storage: writing {} entries", self.scope, entries.len());

        for (key, value) in entries.iter() {
            let key = self.namespace.concat(key);
            let text = prepare_value(value)?;
            log::trace!("{} storage: set {key}", self.scope);

            if let Err(e) = self.area.set_item(&key, &text) {
                log::warn!("{} storage: cannot write {key}: {e:#}", self.scope);
                return Err(e.into());
            }
        }
        Ok(())
    }

    fn get(&self, key: &str) -> Option<String> {
        self.area.get_item(&self.namespace.concat(key))
    }

    fn del(&self, keys: Keys) -> Result<()> {
        for key in keys.iter() {
            let key = self.namespace.concat(key);
            log::trace!("{} storage: remove {key}", self.scope);
            self.area.remove_item(&key)?;
        }
        Ok(())
    }

    fn size(&self) -> usize {
        (0..self.area.len())
            .filter_map(|i| self.area.key(i))
            .filter(|k| self.namespace.matches(k))
            .count()
    }
}
