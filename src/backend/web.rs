//! Browser backends built on `web-sys`.
//!
//! Only compiled for `wasm32` with the `web` feature enabled.

use anyhow::{anyhow, Result};
use wasm_bindgen::JsValue;

use crate::backend::area::StorageArea;
use crate::backend::navigation::{Location, Navigation};

fn js_err(what: &str, e: JsValue) -> anyhow::Error {
    anyhow!("{what} failed: {e:?}")
}

fn window() -> Result<web_sys::Window> {
    web_sys::window().ok_or_else(|| anyhow!("no global window"))
}

/// A `window.localStorage` or `window.sessionStorage` area.
pub struct WebStorageArea {
    storage: web_sys::Storage,
}

impl WebStorageArea {
    pub fn local() -> Result<Self> {
        let storage = window()?
            .local_storage()
            .map_err(|e| js_err("localStorage", e))?
            .ok_or_else(|| anyhow!("localStorage unavailable"))?;
        Ok(Self { storage })
    }

    pub fn session() -> Result<Self> {
        let storage = window()?
            .session_storage()
            .map_err(|e| js_err("sessionStorage", e))?
            .ok_or_else(|| anyhow!("sessionStorage unavailable"))?;
        Ok(Self { storage })
    }
}

impl StorageArea for WebStorageArea {
    fn get_item(&self, key: &str) -> Option<String> {
        self.storage.get_item(key).ok().flatten()
    }

    fn set_item(&self, key: &str, value: &str) -> Result<()> {
        self.storage
            .set_item(key, value)
            .map_err(|e| js_err("setItem", e))
    }

    fn remove_item(&self, key: &str) -> Result<()> {
        self.storage
            .remove_item(key)
            .map_err(|e| js_err("removeItem", e))
    }

    fn key(&self, index: usize) -> Option<String> {
        let index = u32::try_from(index).ok()?;
        self.storage.key(index).ok().flatten()
    }

    fn len(&self) -> usize {
        self.storage.length().map(|n| n as usize).unwrap_or(0)
    }

    fn clear(&self) -> Result<()> {
        self.storage.clear().map_err(|e| js_err("clear", e))
    }
}

/// `window.location` plus `window.history`.
pub struct WindowNavigation {
    window: web_sys::Window,
}

impl WindowNavigation {
    pub fn new() -> Result<Self> {
        Ok(Self { window: window()? })
    }

    fn history(&self) -> Result<web_sys::History> {
        self.window.history().map_err(|e| js_err("history", e))
    }
}

impl Navigation for WindowNavigation {
    fn location(&self) -> Location {
        let l = self.window.location();
        Location {
            protocol: l.protocol().unwrap_or_default(),
            host: l.host().unwrap_or_default(),
            pathname: l.pathname().unwrap_or_default(),
            search: l.search().unwrap_or_default(),
            hash: l.hash().unwrap_or_default(),
        }
    }

    fn replace_state(&self, url: &str) -> Result<()> {
        self.history()?
            .replace_state_with_url(&JsValue::NULL, "", Some(url))
            .map_err(|e| js_err("replaceState", e))
    }

    fn push_state(&self, url: &str) -> Result<()> {
        self.history()?
            .push_state_with_url(&JsValue::NULL, "", Some(url))
            .map_err(|e| js_err("pushState", e))
    }

    fn history_len(&self) -> usize {
        self.history()
            .and_then(|h| h.length().map_err(|e| js_err("history.length", e)))
            .map(|n| n as usize)
            .unwrap_or(0)
    }
}
