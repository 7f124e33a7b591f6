use anyhow::Result;
use url::Url;

/// Snapshot of the document location, in the shape of the DOM `Location` object.
///
/// `search` includes the leading `?` and `hash` the leading `#`; both are empty strings
/// when the URL has no query or fragment.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Location {
    /// Scheme followed by a colon, e.g. `https:`.
    pub protocol: String,
    /// Hostname plus `:port` when the port is not the scheme default.
    pub host: String,
    pub pathname: String,
    pub search: String,
    pub hash: String,
}

impl Location {
    /// Builds the snapshot a browser would report for `url`.
    pub fn from_url(url: &Url) -> Self {
        let host = match (url.host_str(), url.port()) {
            (Some(h), Some(p)) => format!("{h}:{p}"),
            (Some(h), None) => h.to_string(),
            (None, _) => String::new(),
        };

        Self {
            protocol: format!("{}:", url.scheme()),
            host,
            pathname: url.path().to_string(),
            search: match url.query() {
                Some(q) if !q.is_empty() => format!("?{q}"),
                _ => String::new(),
            },
            hash: match url.fragment() {
                Some(f) if !f.is_empty() => format!("#{f}"),
                _ => String::new(),
            },
        }
    }

    /// Returns the full URL of this location.
    pub fn href(&self) -> String {
        format!(
            "{}//{}{}{}{}",
            self.protocol, self.host, self.pathname, self.search, self.hash
        )
    }
}

/// Access to the current document URL and its session history (`window.location` and
/// `window.history`).
pub trait Navigation {
    /// Returns a snapshot of the current location.
    fn location(&self) -> Location;

    /// Replaces the current history entry with `url` without reloading.
    fn replace_state(&self, url: &str) -> Result<()>;

    /// Appends `url` as a new history entry without reloading.
    fn push_state(&self, url: &str) -> Result<()>;

    /// Number of entries in the session history.
    fn history_len(&self) -> usize;
}
