use std::cell::RefCell;

use anyhow::{Context, Result};
use url::Url;

use crate::backend::navigation::{Location, Navigation};

#[derive(Debug)]
struct SessionHistory {
    entries: Vec<Url>,
    current: usize,
}

/// In-memory session history, used where no browser window exists.
///
/// Mirrors `history.replaceState` / `history.pushState`: URLs are resolved against the
/// current entry, pushing drops any forward entries, and the history never shrinks.
#[derive(Debug)]
pub struct InMemoryNavigation {
    history: RefCell<SessionHistory>,
}

impl InMemoryNavigation {
    /// Starts a history with a single entry for `start_url`.
    pub fn new(start_url: &str) -> Result<Self> {
        let url = Url::parse(start_url).with_context(|| format!("invalid start URL {start_url:?}"))?;
        Ok(Self::from_url(url))
    }

    pub fn from_url(url: Url) -> Self {
        Self {
            history: RefCell::new(SessionHistory {
                entries: vec![url],
                current: 0,
            }),
        }
    }

    /// Returns the URL of the current entry.
    pub fn current_url(&self) -> Url {
        let h = self.history.borrow();
        h.entries[h.current].clone()
    }

    /// Moves one entry back. Returns `false` when already at the oldest entry.
    pub fn back(&self) -> bool {
        let mut h = self.history.borrow_mut();
        if h.current == 0 {
            return false;
        }
        h.current -= 1;
        true
    }

    /// Moves one entry forward. Returns `false` when already at the newest entry.
    pub fn forward(&self) -> bool {
        let mut h = self.history.borrow_mut();
        if h.current + 1 >= h.entries.len() {
            return false;
        }
        h.current += 1;
        true
    }

    fn resolve(&self, url: &str) -> Result<Url> {
        self.current_url()
            .join(url)
            .with_context(|| format!("cannot resolve history URL {url:?}"))
    }
}

impl Navigation for InMemoryNavigation {
    fn location(&self) -> Location {
        Location::from_url(&self.current_url())
    }

    fn replace_state(&self, url: &str) -> Result<()> {
        let url = self.resolve(url)?;
        log::trace!("history: replace current entry with {url}");

        let mut h = self.history.borrow_mut();
        let idx = h.current;
        h.entries[idx] = url;
        Ok(())
    }

    fn push_state(&self, url: &str) -> Result<()> {
        let url = self.resolve(url)?;
        log::trace!("history: push {url}");

        let mut h = self.history.borrow_mut();
        let keep = h.current + 1;
        h.entries.truncate(keep);
        h.entries.push(url);
        h.current = keep;
        Ok(())
    }

    fn history_len(&self) -> usize {
        self.history.borrow().entries.len()
    }
}
