//! Ambient backends consumed by the storage adapters.
//!
//! The adapters never reach for global browser objects. Instead they are handed
//! implementations of two small traits:
//!
//! - [`StorageArea`] — a DOM `Storage`-like key/value area (local or session scope).
//! - [`Navigation`] — the current document [`Location`] and its session history.
//!
//! # Available implementations
//!
//! - [`InMemoryStorageArea`] — a `RefCell<BTreeMap>` backed area for tests and
//!   non-browser hosts.
//! - [`InMemoryNavigation`] — a session history over [`url::Url`] entries.
//! - `WebStorageArea`, `WindowNavigation` — the real `window.localStorage`,
//!   `window.sessionStorage`, `window.location` and `window.history` (feature `web`,
//!   `wasm32` only).

/// Storage area trait, the key/value interface.
pub mod area;
/// In-memory session history.
pub mod history;
/// In-memory storage area.
pub mod in_memory;
/// Location snapshot and navigation trait.
pub mod navigation;
/// Browser backends.
#[cfg(all(feature = "web", target_arch = "wasm32"))]
pub mod web;

pub use area::StorageArea;
pub use history::InMemoryNavigation;
pub use in_memory::InMemoryStorageArea;
pub use navigation::{Location, Navigation};
#[cfg(all(feature = "web", target_arch = "wasm32"))]
pub use web::{WebStorageArea, WindowNavigation};
