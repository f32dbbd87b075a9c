//! Static preflight headers.

use axum::http::{header, HeaderMap, HeaderName, HeaderValue};

/// Default value of `Access-Control-Allow-Headers`
pub const DEFAULT_ALLOW_HEADERS: &str = "origin, authorization, accept, content-type, x-requested-with";

/// Default value of `Access-Control-Allow-Methods`
pub const DEFAULT_ALLOW_METHODS: &str = "GET, HEAD, POST, PUT, DELETE, TRACE, OPTIONS";

/// Default preflight cache lifetime in seconds
pub const DEFAULT_MAX_AGE_SECS: u32 = 3600;

/// Ordered set of headers emitted verbatim on every allowed preflight.
///
/// Names compare case-insensitively (they are normalised by [`HeaderName`]),
/// so inserting `Access-Control-Max-Age` replaces the built-in
/// `access-control-max-age` entry in place instead of adding a second one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StaticHeaderSet {
    entries: Vec<(HeaderName, HeaderValue)>,
}

impl StaticHeaderSet {
    /// Create an empty header set
    pub fn empty() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Insert or replace an entry, keeping the position of a replaced one.
    pub fn insert(&mut self, name: HeaderName, value: HeaderValue) {
        match self.entries.iter_mut().find(|(existing, _)| *existing == name) {
            Some((_, slot)) => *slot = value,
            None => self.entries.push((name, value)),
        }
    }

    /// Look up an entry by name.
    pub fn get(&self, name: &HeaderName) -> Option<&HeaderValue> {
        self.entries
            .iter()
            .find(|(existing, _)| existing == name)
            .map(|(_, value)| value)
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the set holds no entries.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entries in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&HeaderName, &HeaderValue)> {
        self.entries.iter().map(|(name, value)| (name, value))
    }

    /// Write every entry into a response header map.
    pub fn apply_to(&self, headers: &mut HeaderMap) {
        for (name, value) in &self.entries {
            headers.insert(name.clone(), value.clone());
        }
    }
}

impl Default for StaticHeaderSet {
    fn default() -> Self {
        let mut set = Self::empty();
        set.insert(
            header::ACCESS_CONTROL_ALLOW_HEADERS,
            HeaderValue::from_static(DEFAULT_ALLOW_HEADERS),
        );
        set.insert(
            header::ACCESS_CONTROL_ALLOW_METHODS,
            HeaderValue::from_static(DEFAULT_ALLOW_METHODS),
        );
        set.insert(header::ACCESS_CONTROL_MAX_AGE, HeaderValue::from(DEFAULT_MAX_AGE_SECS));
        set
    }
}
