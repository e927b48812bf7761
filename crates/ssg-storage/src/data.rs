//! Per-file data bag shared between pipeline stages.
//!
//! Every [`SourceFile`](crate::SourceFile) carries a [`DataBag`]: a map of
//! arbitrary JSON values attached by earlier stages (front matter, custom
//! transforms) and read by later ones (templates). Stages that compute
//! defaults use [`DataBag::insert_if_absent`] so values supplied upstream
//! always win.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Arbitrary data attached to a content file.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DataBag(Map<String, Value>);

impl DataBag {
    /// Create an empty bag.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Get a value by key.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    /// Get a string value by key.
    #[must_use]
    pub fn get_str(&self, key: &str) -> Option<&str> {
        self.0.get(key).and_then(Value::as_str)
    }

    /// Check whether a key is present (a JSON `null` counts as present).
    #[must_use]
    pub fn contains_key(&self, key: &str) -> bool {
        self.0.contains_key(key)
    }

    /// Set a value, replacing any previous one.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<Value>) -> Option<Value> {
        self.0.insert(key.into(), value.into())
    }

    /// Set a value only if the key is not already present.
    ///
    /// Returns `true` if the value was inserted.
    pub fn insert_if_absent(&mut self, key: &str, value: impl Into<Value>) -> bool {
        if self.0.contains_key(key) {
            return false;
        }
        self.0.insert(key.to_owned(), value.into());
        true
    }

    /// Number of entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether the bag has no entries.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Iterate over entries in key order.
    pub fn iter(&self) -> impl Iterator<Item = (&String, &Value)> {
        self.0.iter()
    }

    /// Borrow the underlying JSON map.
    #[must_use]
    pub fn as_map(&self) -> &Map<String, Value> {
        &self.0
    }
}

impl From<Map<String, Value>> for DataBag {
    fn from(map: Map<String, Value>) -> Self {
        Self(map)
    }
}

impl From<DataBag> for Value {
    fn from(bag: DataBag) -> Self {
        Value::Object(bag.0)
    }
}

impl<K: Into<String>> FromIterator<(K, Value)> for DataBag {
    fn from_iter<I: IntoIterator<Item = (K, Value)>>(iter: I) -> Self {
        Self(iter.into_iter().map(|(k, v)| (k.into(), v)).collect())
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn test_insert_if_absent_keeps_existing() {
        let mut bag = DataBag::new();
        bag.insert("url", "/custom/");

        let inserted = bag.insert_if_absent("url", "/derived/");

        assert!(!inserted);
        assert_eq!(bag.get_str("url"), Some("/custom/"));
    }

    #[test]
    fn test_insert_if_absent_treats_null_as_present() {
        let mut bag = DataBag::new();
        bag.insert("parent", Value::Null);

        assert!(!bag.insert_if_absent("parent", "/"));
        assert_eq!(bag.get("parent"), Some(&Value::Null));
    }

    #[test]
    fn test_insert_if_absent_adds_missing() {
        let mut bag = DataBag::new();

        assert!(bag.insert_if_absent("isIndex", true));
        assert_eq!(bag.get("isIndex"), Some(&json!(true)));
        assert_eq!(bag.len(), 1);
    }

    #[test]
    fn test_serializes_as_plain_object() {
        let bag: DataBag = [("title", json!("Hello")), ("order", json!(2))]
            .into_iter()
            .collect();

        let value = serde_json::to_value(&bag).unwrap();

        assert_eq!(value, json!({"title": "Hello", "order": 2}));
    }

    #[test]
    fn test_as_map_matches_entries() {
        let bag: DataBag = [("b", json!(1)), ("a", json!(null))].into_iter().collect();

        let map = bag.as_map();

        assert_eq!(map.len(), 2);
        assert_eq!(map.get("a"), Some(&Value::Null));
        assert_eq!(Value::Object(map.clone()), Value::from(bag.clone()));
    }
}
