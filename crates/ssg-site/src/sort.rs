//! Ordering of sibling lists and section members.
//!
//! Sort keys are read from each file's data bag. Values compare within
//! their kind (numbers numerically, strings lexicographically, `false`
//! before `true`); across kinds numbers come first, then strings, then
//! booleans, then arrays and objects. Missing keys sort last. All sorts
//! are stable, so ties keep input order.

use std::cmp::Ordering;

use serde_json::Value;
use ssg_storage::DataBag;

use crate::record::{FileId, FileRecord};

/// Sorting configuration for one build.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SortPolicy {
    key: Option<String>,
}

impl SortPolicy {
    /// Sort by the data bag value under `key`, or keep input order for `None`.
    #[must_use]
    pub fn new(key: Option<String>) -> Self {
        Self { key }
    }

    /// Data bag key used for ordering, if sorting is enabled.
    #[must_use]
    pub fn key(&self) -> Option<&str> {
        self.key.as_deref()
    }

    /// Read a file's sort key (`null` if missing or sorting is disabled).
    #[must_use]
    pub fn sort_key(&self, data: &DataBag) -> Value {
        self.key
            .as_deref()
            .and_then(|key| data.get(key))
            .cloned()
            .unwrap_or(Value::Null)
    }

    /// Order a list of files by sort key. A no-op when sorting is disabled.
    pub(crate) fn sort_ids(&self, ids: &mut [FileId], records: &[FileRecord]) {
        if self.key.is_none() {
            return;
        }
        ids.sort_by(|a, b| compare_values(&records[a.0].sort_key, &records[b.0].sort_key));
    }

    /// Order used for section assembly: shallower files first, then index
    /// files, then by sort key.
    pub(crate) fn tree_order(&self, a: &FileRecord, b: &FileRecord) -> Ordering {
        a.depth
            .cmp(&b.depth)
            .then_with(|| b.is_index().cmp(&a.is_index()))
            .then_with(|| {
                if self.key.is_some() {
                    compare_values(&a.sort_key, &b.sort_key)
                } else {
                    Ordering::Equal
                }
            })
    }
}

/// Rank of a value's kind in cross-kind comparisons.
fn kind_rank(value: &Value) -> u8 {
    match value {
        Value::Number(_) => 0,
        Value::String(_) => 1,
        Value::Bool(_) => 2,
        Value::Array(_) | Value::Object(_) => 3,
        Value::Null => 4,
    }
}

/// Total order over sort key values.
pub(crate) fn compare_values(a: &Value, b: &Value) -> Ordering {
    match (a, b) {
        (Value::Number(x), Value::Number(y)) => match (x.as_f64(), y.as_f64()) {
            (Some(x), Some(y)) => x.total_cmp(&y),
            _ => Ordering::Equal,
        },
        (Value::String(x), Value::String(y)) => x.cmp(y),
        (Value::Bool(x), Value::Bool(y)) => x.cmp(y),
        _ => kind_rank(a).cmp(&kind_rank(b)),
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn test_compare_numbers_numerically() {
        assert_eq!(compare_values(&json!(2), &json!(12)), Ordering::Less);
        assert_eq!(compare_values(&json!(1.5), &json!(1)), Ordering::Greater);
        assert_eq!(compare_values(&json!(-3), &json!(0)), Ordering::Less);
        assert_eq!(compare_values(&json!(7), &json!(7)), Ordering::Equal);
    }

    #[test]
    fn test_compare_strings_lexicographically() {
        assert_eq!(
            compare_values(&json!("/abc.html"), &json!("/foo/")),
            Ordering::Less
        );
        assert_eq!(compare_values(&json!("12"), &json!("2")), Ordering::Less);
    }

    #[test]
    fn test_compare_bools() {
        assert_eq!(compare_values(&json!(false), &json!(true)), Ordering::Less);
    }

    #[test]
    fn test_compare_mixed_kinds() {
        assert_eq!(compare_values(&json!(100), &json!("a")), Ordering::Less);
        assert_eq!(compare_values(&json!("a"), &json!(true)), Ordering::Less);
        assert_eq!(compare_values(&json!(true), &json!([1])), Ordering::Less);
    }

    #[test]
    fn test_missing_sorts_last() {
        assert_eq!(compare_values(&Value::Null, &json!(1)), Ordering::Greater);
        assert_eq!(compare_values(&json!({}), &Value::Null), Ordering::Less);
        assert_eq!(compare_values(&Value::Null, &Value::Null), Ordering::Equal);
    }

    #[test]
    fn test_sort_key_reads_bag() {
        let mut data = DataBag::new();
        data.insert("order", 3);

        assert_eq!(SortPolicy::new(Some("order".to_owned())).sort_key(&data), json!(3));
        assert_eq!(
            SortPolicy::new(Some("weight".to_owned())).sort_key(&data),
            Value::Null
        );
        assert_eq!(SortPolicy::new(None).sort_key(&data), Value::Null);
    }
}
