use std::fmt;
use std::rc::Rc;

use anyhow::Result;

use crate::backend::{InMemoryNavigation, InMemoryStorageArea, Navigation, StorageArea};
use crate::config::{BackendKind, StorageOptions};
use crate::storage::{AreaStorage, HistoryMode, Storage, UrlStorage};

/// Hands out [`Storage`] instances over one set of backends.
///
/// Every call builds a fresh, lightweight storage; instances are never cached or shared.
/// Storages created from the same provider share the underlying backends, so two of them
/// with the same prefix see the same data.
#[derive(Clone)]
pub struct StorageProvider {
    local: Rc<dyn StorageArea>,
    session: Rc<dyn StorageArea>,
    navigation: Rc<dyn Navigation>,
}

impl fmt::Debug for StorageProvider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StorageProvider").finish_non_exhaustive()
    }
}

impl StorageProvider {
    pub fn new(
        local: Rc<dyn StorageArea>,
        session: Rc<dyn StorageArea>,
        navigation: Rc<dyn Navigation>,
    ) -> Self {
        Self {
            local,
            session,
            navigation,
        }
    }

    /// A provider over empty in-memory areas and a history starting at `start_url`.
    pub fn in_memory(start_url: &str) -> Result<Self> {
        Ok(Self::new(
            Rc::new(InMemoryStorageArea::new()),
            Rc::new(InMemoryStorageArea::new()),
            Rc::new(InMemoryNavigation::new(start_url)?),
        ))
    }

    /// A provider over the browser's `localStorage`, `sessionStorage`, `location` and
    /// `history`.
    #[cfg(all(feature = "web", target_arch = "wasm32"))]
    pub fn from_window() -> Result<Self> {
        use crate::backend::{WebStorageArea, WindowNavigation};

        Ok(Self::new(
            Rc::new(WebStorageArea::local()?),
            Rc::new(WebStorageArea::session()?),
            Rc::new(WindowNavigation::new()?),
        ))
    }

    /// Returns a [`Storage`] which uses the local storage area as backend.
    pub fn local_storage(&self, prefix: Option<&str>) -> Box<dyn Storage> {
        Box::new(AreaStorage::local(self.local.clone(), prefix))
    }

    /// Returns a [`Storage`] which uses the session storage area as backend.
    pub fn session_storage(&self, prefix: Option<&str>) -> Box<dyn Storage> {
        Box::new(AreaStorage::session(self.session.clone(), prefix))
    }

    /// Returns a [`Storage`] which keeps its values in the URL query. `mode` defaults
    /// to [`HistoryMode::Replace`].
    pub fn url_storage(&self, prefix: Option<&str>, mode: Option<HistoryMode>) -> Box<dyn Storage> {
        Box::new(UrlStorage::new(
            self.navigation.clone(),
            prefix,
            mode.unwrap_or_default(),
        ))
    }

    /// Builds a storage of `kind` from configuration.
    pub fn storage(&self, kind: BackendKind, options: &StorageOptions) -> Box<dyn Storage> {
        let prefix = options.prefix.as_deref();
        log::debug!("provider: {kind:?} storage, prefix {prefix:?}");
        match kind {
            BackendKind::Local => self.local_storage(prefix),
            BackendKind::Session => self.session_storage(prefix),
            BackendKind::Url => self.url_storage(prefix, Some(options.history_mode)),
        }
    }

    pub fn local_area(&self) -> &Rc<dyn StorageArea> {
        &self.local
    }

    pub fn session_area(&self) -> &Rc<dyn StorageArea> {
        &self.session
    }

    pub fn navigation(&self) -> &Rc<dyn Navigation> {
        &self.navigation
    }
}
