//! Flat mapping of parsed values produced by the parser.

use indexmap::IndexMap;

use crate::Value;

/// Values parsed from one command line, keyed by field path.
///
/// Only keys the user supplied are present; defaults are applied later by
/// the constructor. Nested fields use their full path joined by the parser's
/// separator, e.g. `limits.cpu`.
///
/// # Examples
///
/// ```
/// use ortho_args::{RawResultMap, Value};
///
/// let raw: RawResultMap = [("name", Value::Str("job1".into()))].into_iter().collect();
/// assert!(raw.contains_key("name"));
/// assert!(!raw.has_prefix("limits", "."));
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawResultMap(IndexMap<String, Value>);

impl RawResultMap {
    /// Creates an empty map.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Stores `value` under `key`, replacing any earlier value.
    pub fn insert(&mut self, key: impl Into<String>, value: Value) -> Option<Value> {
        self.0.insert(key.into(), value)
    }

    /// Borrows the value stored for `key`.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    /// Returns `true` when `key` was supplied.
    #[must_use]
    pub fn contains_key(&self, key: &str) -> bool {
        self.0.contains_key(key)
    }

    /// Returns `true` when any key lives under `prefix` followed by
    /// `separator`.
    #[must_use]
    pub fn has_prefix(&self, prefix: &str, separator: &str) -> bool {
        self.0.keys().any(|key| {
            key.strip_prefix(prefix)
                .is_some_and(|rest| rest.starts_with(separator))
        })
    }

    /// Iterates over `(key, value)` pairs in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Number of supplied keys.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns `true` when nothing was supplied.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<K: Into<String>> FromIterator<(K, Value)> for RawResultMap {
    fn from_iter<I: IntoIterator<Item = (K, Value)>>(iter: I) -> Self {
        Self(iter.into_iter().map(|(k, v)| (k.into(), v)).collect())
    }
}
