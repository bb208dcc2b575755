//! Records - the schema-less unit of storage.
//!
//! A [`Record`] is an ordered mapping from field name to [`Value`]. The store only
//! interprets two fields of it (the resource's identity and modification fields);
//! everything else is carried opaquely.
//!
//! ## Example
//!
//! ```ignore
//! use record_store::{Record, Value};
//!
//! let record: Record = [("title", Value::from("A")), ("unread", Value::from(true))]
//!     .into_iter()
//!     .collect();
//! assert_eq!(record.get_str("title"), Some("A"));
//! ```

mod value;

use std::collections::btree_map;
use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

pub use value::Value;

/// A schema-less record: field name to value.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Record {
    fields: BTreeMap<String, Value>,
}

impl Record {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a record from a JSON object.
    pub fn from_json(json: serde_json::Value) -> Result<Self, serde_json::Error> {
        serde_json::from_value(json)
    }

    pub fn to_json(&self) -> serde_json::Value {
        self.clone().into()
    }

    pub fn get(&self, field: &str) -> Option<&Value> {
        self.fields.get(field)
    }

    /// Field value if present and a string.
    pub fn get_str(&self, field: &str) -> Option<&str> {
        self.fields.get(field).and_then(Value::as_str)
    }

    /// Identity value rendered as a string. Non-string identities use their
    /// debug form; a missing or null identity is `None`.
    pub fn identity(&self, id_field: &str) -> Option<String> {
        match self.fields.get(id_field)? {
            Value::String(id) => Some(id.clone()),
            Value::Null => None,
            other => Some(format!("{:?}", other)),
        }
    }

    /// Field value, with a missing field reading as `Null`.
    pub fn value_or_null(&self, field: &str) -> &Value {
        static NULL: Value = Value::Null;
        self.fields.get(field).unwrap_or(&NULL)
    }

    pub fn insert(&mut self, field: impl Into<String>, value: impl Into<Value>) -> Option<Value> {
        self.fields.insert(field.into(), value.into())
    }

    pub fn remove(&mut self, field: &str) -> Option<Value> {
        self.fields.remove(field)
    }

    pub fn contains_key(&self, field: &str) -> bool {
        self.fields.contains_key(field)
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn iter(&self) -> btree_map::Iter<'_, String, Value> {
        self.fields.iter()
    }
}

impl<K: Into<String>, V: Into<Value>> FromIterator<(K, V)> for Record {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            fields: iter
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }
}

impl<'a> IntoIterator for &'a Record {
    type Item = (&'a String, &'a Value);
    type IntoIter = btree_map::Iter<'a, String, Value>;

    fn into_iter(self) -> Self::IntoIter {
        self.fields.iter()
    }
}

impl IntoIterator for Record {
    type Item = (String, Value);
    type IntoIter = btree_map::IntoIter<String, Value>;

    fn into_iter(self) -> Self::IntoIter {
        self.fields.into_iter()
    }
}

impl From<Record> for serde_json::Value {
    fn from(record: Record) -> Self {
        serde_json::Value::Object(
            record
                .fields
                .into_iter()
                .map(|(k, v)| (k, v.into()))
                .collect(),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn from_json_object() {
        let record = Record::from_json(json!({"title": "A", "count": 3})).unwrap();
        assert_eq!(record.get_str("title"), Some("A"));
        assert_eq!(record.get("count"), Some(&Value::Integer(3)));
        assert_eq!(record.len(), 2);
    }

    #[test]
    fn from_json_rejects_non_objects() {
        assert!(Record::from_json(json!(["not", "an", "object"])).is_err());
    }

    #[test]
    fn missing_field_reads_as_null() {
        let record = Record::new();
        assert!(record.value_or_null("anything").is_null());
    }

    #[test]
    fn serializes_as_plain_object() {
        let record: Record = [("b", Value::from(2)), ("a", Value::from("x"))]
            .into_iter()
            .collect();
        assert_eq!(serde_json::to_string(&record).unwrap(), r#"{"a":"x","b":2}"#);
        assert_eq!(record.to_json(), json!({"a": "x", "b": 2}));
    }

    #[test]
    fn clones_are_independent() {
        let mut original = Record::from_json(json!({"title": "A"})).unwrap();
        let copy = original.clone();
        original.insert("title", "B");
        assert_eq!(copy.get_str("title"), Some("A"));
    }
}
