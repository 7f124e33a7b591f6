//! URL query string handling for the URL backed storage.
//!
//! Parsing is deliberately forgiving: pairs that do not split into exactly one key and
//! one value, or that do not decode to UTF-8, are dropped instead of failing.

use std::fmt;

use percent_encoding::{percent_decode_str, utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};

use crate::backend::{Location, Navigation};
use crate::storage::types::HistoryMode;

/// Characters left alone by JavaScript's `encodeURIComponent`.
const COMPONENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'!')
    .remove(b'~')
    .remove(b'*')
    .remove(b'\'')
    .remove(b'(')
    .remove(b')');

/// Percent-encodes a query key or value.
pub fn encode_component(s: &str) -> String {
    utf8_percent_encode(s, COMPONENT).to_string()
}

/// Decodes a query key or value: `+` is a space, then percent escapes are resolved.
///
/// Returns `None` when a `%` is not followed by two hex digits, or when the escapes do
/// not form valid UTF-8.
pub fn decode_component(s: &str) -> Option<String> {
    if !well_formed_escapes(s) {
        return None;
    }
    let spaced = s.replace('+', "%20");
    percent_decode_str(&spaced)
        .decode_utf8()
        .ok()
        .map(|c| c.into_owned())
}

fn well_formed_escapes(s: &str) -> bool {
    let bytes = s.as_bytes();
    bytes.iter().enumerate().all(|(i, &b)| {
        b != b'%'
            || matches!(
                bytes.get(i + 1..i + 3),
                Some([h, l]) if h.is_ascii_hexdigit() && l.is_ascii_hexdigit()
            )
    })
}

/// Ordered query parameters.
///
/// Behaves like a JavaScript object used as a map: overwriting a key keeps its position,
/// new keys are appended, removed keys disappear.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct QueryParams {
    pairs: Vec<(String, String)>,
}

impl QueryParams {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parses a `search` string, with or without its leading `?`.
    pub fn parse(search: &str) -> Self {
        let query = search.strip_prefix('?').unwrap_or(search);
        let mut params = Self::new();

        for p in query.split('&') {
            let pair: Vec<&str> = p.split('=').collect();
            let [k, v] = pair.as_slice() else {
                if !p.is_empty() {
                    log::trace!("query: dropping malformed pair {p:?}");
                }
                continue;
            };
            match (decode_component(k), decode_component(v)) {
                (Some(k), Some(v)) => params.insert(k, v),
                _ => log::trace!("query: dropping undecodable pair {p:?}"),
            }
        }

        params
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.pairs
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    pub fn insert(&mut self, key: String, value: String) {
        match self.pairs.iter_mut().find(|(k, _)| *k == key) {
            Some((_, v)) => *v = value,
            None => self.pairs.push((key, value)),
        }
    }

    pub fn remove(&mut self, key: &str) -> Option<String> {
        let idx = self.pairs.iter().position(|(k, _)| k == key)?;
        Some(self.pairs.remove(idx).1)
    }

    pub fn len(&self) -> usize {
        self.pairs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.pairs.iter().map(|(k, _)| k.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.pairs.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for QueryParams {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut params = Self::new();
        for (k, v) in iter {
            params.insert(k.into(), v.into());
        }
        params
    }
}

/// Formats as a `search` string: empty, or `?` followed by `&`-joined `k=v` pairs.
impl fmt::Display for QueryParams {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, (k, v)) in self.iter().enumerate() {
            f.write_str(if i == 0 { "?" } else { "&" })?;
            write!(f, "{}={}", encode_component(k), encode_component(v))?;
        }
        Ok(())
    }
}

/// Reads the query parameters of the current location.
pub fn query_values(nav: &dyn Navigation) -> QueryParams {
    QueryParams::parse(&nav.location().search)
}

/// Rebuilds the URL of `location` with `params` as its query; the hash is kept verbatim.
pub fn build_url(location: &Location, params: &QueryParams) -> String {
    Location {
        search: params.to_string(),
        ..location.clone()
    }
    .href()
}

/// Writes `params` into the current URL, recording a single history transition.
pub fn update_url(nav: &dyn Navigation, mode: HistoryMode, params: &QueryParams) -> anyhow::Result<()> {
    let url = build_url(&nav.location(), params);
    log::debug!("query: {mode} history with {url}");
    match mode {
        HistoryMode::Replace => nav.replace_state(&url),
        HistoryMode::Push => nav.push_state(&url),
    }
}
