use std::borrow::Cow;

/// Scopes logical keys under an optional prefix.
///
/// A key `k` under prefix `p` is stored as `p_k`. An empty prefix behaves like no prefix.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct KeyNamespace {
    prefix: Option<String>,
}

impl KeyNamespace {
    pub fn new(prefix: Option<&str>) -> Self {
        Self {
            prefix: prefix.filter(|p| !p.is_empty()).map(str::to_string),
        }
    }

    pub fn prefix(&self) -> Option<&str> {
        self.prefix.as_deref()
    }

    /// Returns the backend key for the logical `key`.
    pub fn concat<'a>(&self, key: &'a str) -> Cow<'a, str> {
        match &self.prefix {
            Some(p) => Cow::Owned(format!("{p}_{key}")),
            None => Cow::Borrowed(key),
        }
    }

    /// Whether a raw backend key counts towards this namespace.
    ///
    /// This is a plain string prefix test: with prefix `ab`, the raw key `abc` matches
    /// even though it was not written through the namespace.
    pub fn matches(&self, raw_key: &str) -> bool {
        match &self.prefix {
            Some(p) => raw_key.starts_with(p.as_str()),
            None => true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn prefixed_keys_are_joined_with_underscore() {
        let ns = KeyNamespace::new(Some("test"));
        assert_eq!(ns.concat("abc"), "test_abc");
        assert_eq!(ns.prefix(), Some("test"));
    }

    #[test]
    fn missing_or_empty_prefix_leaves_keys_alone() {
        assert_eq!(KeyNamespace::new(None).concat("abc"), "abc");
        assert_eq!(KeyNamespace::new(Some("")).concat("abc"), "abc");
        assert_eq!(KeyNamespace::new(Some("")).prefix(), None);
    }

    #[test]
    fn matching_is_a_literal_prefix_test() {
        let ns = KeyNamespace::new(Some("ab"));
        assert!(ns.matches("ab_key"));
        assert!(ns.matches("abc"));
        assert!(!ns.matches("a_key"));

        assert!(KeyNamespace::new(None).matches("anything"));
    }
}
