use std::cmp::Ordering;

use serde::{Deserialize, Serialize};

use super::Record;

/// A single field value inside a [`Record`].
///
/// Serializes untagged, so records read and write as plain JSON.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Value {
    Null,
    Bool(bool),
    Integer(i64),
    Float(f64),
    String(String),
    Array(Vec<Value>),
    Object(Record),
}

impl Value {
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Value::Integer(i) => Some(*i),
            _ => None,
        }
    }

    /// Numeric view of integers and floats alike.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Integer(i) => Some(*i as f64),
            Value::Float(f) => Some(*f),
            _ => None,
        }
    }

    pub fn as_array(&self) -> Option<&[Value]> {
        match self {
            Value::Array(values) => Some(values),
            _ => None,
        }
    }

    /// Equality where `Integer(1)` and `Float(1.0)` are the same value.
    pub fn loose_eq(&self, other: &Value) -> bool {
        match (self, other) {
            (Value::Integer(_) | Value::Float(_), Value::Integer(_) | Value::Float(_)) => {
                self.numeric_cmp(other) == Some(Ordering::Equal)
            }
            (Value::Array(a), Value::Array(b)) => {
                a.len() == b.len() && a.iter().zip(b).all(|(x, y)| x.loose_eq(y))
            }
            _ => self == other,
        }
    }

    /// Ordering used by range comparisons. Only numbers, strings and booleans
    /// are ordered against values of their own kind; everything else is `None`.
    pub fn partial_compare(&self, other: &Value) -> Option<Ordering> {
        match (self, other) {
            (Value::Integer(_) | Value::Float(_), Value::Integer(_) | Value::Float(_)) => {
                self.numeric_cmp(other)
            }
            (Value::String(a), Value::String(b)) => Some(a.cmp(b)),
            (Value::Bool(a), Value::Bool(b)) => Some(a.cmp(b)),
            _ => None,
        }
    }

    /// Total order used for sorting:
    /// `Null < Bool < numbers < String < Array < Object`.
    pub fn total_cmp(&self, other: &Value) -> Ordering {
        match (self, other) {
            (Value::Integer(_) | Value::Float(_), Value::Integer(_) | Value::Float(_)) => {
                self.numeric_cmp(other).unwrap_or_else(|| {
                    let (a, b) = (self.as_f64().unwrap_or(0.0), other.as_f64().unwrap_or(0.0));
                    a.total_cmp(&b)
                })
            }
            (Value::String(a), Value::String(b)) => a.cmp(b),
            (Value::Bool(a), Value::Bool(b)) => a.cmp(b),
            (Value::Array(a), Value::Array(b)) => {
                for (x, y) in a.iter().zip(b) {
                    let ord = x.total_cmp(y);
                    if ord != Ordering::Equal {
                        return ord;
                    }
                }
                a.len().cmp(&b.len())
            }
            (Value::Object(a), Value::Object(b)) => {
                for ((ka, va), (kb, vb)) in a.iter().zip(b.iter()) {
                    let ord = ka.cmp(kb).then_with(|| va.total_cmp(vb));
                    if ord != Ordering::Equal {
                        return ord;
                    }
                }
                a.len().cmp(&b.len())
            }
            _ => self.rank().cmp(&other.rank()),
        }
    }

    /// Exact comparison between numbers of either kind. `None` for NaN or
    /// non-numbers.
    fn numeric_cmp(&self, other: &Value) -> Option<Ordering> {
        match (self, other) {
            (Value::Integer(a), Value::Integer(b)) => Some(a.cmp(b)),
            (Value::Float(a), Value::Float(b)) => a.partial_cmp(b),
            (Value::Integer(a), Value::Float(b)) => int_float_cmp(*a, *b),
            (Value::Float(a), Value::Integer(b)) => int_float_cmp(*b, *a).map(Ordering::reverse),
            _ => None,
        }
    }

    fn rank(&self) -> u8 {
        match self {
            Value::Null => 0,
            Value::Bool(_) => 1,
            Value::Integer(_) | Value::Float(_) => 2,
            Value::String(_) => 3,
            Value::Array(_) => 4,
            Value::Object(_) => 5,
        }
    }
}

// 2^63, the first float past i64::MAX.
const I64_UPPER: f64 = 9_223_372_036_854_775_808.0;

/// Compares an integer with a float without rounding the integer.
fn int_float_cmp(i: i64, f: f64) -> Option<Ordering> {
    if f.is_nan() {
        return None;
    }
    if f >= I64_UPPER {
        return Some(Ordering::Less);
    }
    if f < -I64_UPPER {
        return Some(Ordering::Greater);
    }
    let whole = f.trunc();
    Some(i.cmp(&(whole as i64)).then_with(|| {
        let fract = f - whole;
        if fract > 0.0 {
            Ordering::Less
        } else if fract < 0.0 {
            Ordering::Greater
        } else {
            Ordering::Equal
        }
    }))
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<i64> for Value {
    fn from(i: i64) -> Self {
        Value::Integer(i)
    }
}

impl From<i32> for Value {
    fn from(i: i32) -> Self {
        Value::Integer(i as i64)
    }
}

impl From<u64> for Value {
    fn from(u: u64) -> Self {
        i64::try_from(u)
            .map(Value::Integer)
            .unwrap_or(Value::Float(u as f64))
    }
}

impl From<f64> for Value {
    fn from(f: f64) -> Self {
        Value::Float(f)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::String(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::String(s)
    }
}

impl From<Vec<Value>> for Value {
    fn from(values: Vec<Value>) -> Self {
        Value::Array(values)
    }
}

impl From<Record> for Value {
    fn from(record: Record) -> Self {
        Value::Object(record)
    }
}

impl From<serde_json::Value> for Value {
    fn from(json: serde_json::Value) -> Self {
        match json {
            serde_json::Value::Null => Value::Null,
            serde_json::Value::Bool(b) => Value::Bool(b),
            serde_json::Value::Number(n) => match n.as_i64() {
                Some(i) => Value::Integer(i),
                None => Value::Float(n.as_f64().unwrap_or(f64::NAN)),
            },
            serde_json::Value::String(s) => Value::String(s),
            serde_json::Value::Array(values) => {
                Value::Array(values.into_iter().map(Value::from).collect())
            }
            serde_json::Value::Object(map) => Value::Object(
                map.into_iter()
                    .map(|(k, v)| (k, Value::from(v)))
                    .collect(),
            ),
        }
    }
}

impl From<Value> for serde_json::Value {
    fn from(value: Value) -> Self {
        match value {
            Value::Null => serde_json::Value::Null,
            Value::Bool(b) => serde_json::Value::Bool(b),
            Value::Integer(i) => serde_json::Value::from(i),
            // JSON has no NaN/inf; those become null.
            Value::Float(f) => serde_json::Number::from_f64(f)
                .map(serde_json::Value::Number)
                .unwrap_or(serde_json::Value::Null),
            Value::String(s) => serde_json::Value::String(s),
            Value::Array(values) => {
                serde_json::Value::Array(values.into_iter().map(Into::into).collect())
            }
            Value::Object(record) => record.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn integers_and_floats_compare_numerically() {
        assert!(Value::Integer(3).loose_eq(&Value::Float(3.0)));
        assert_eq!(
            Value::Integer(2).partial_compare(&Value::Float(2.5)),
            Some(Ordering::Less)
        );
    }

    #[test]
    fn large_integers_compare_exactly_against_floats() {
        let two_53 = 1_i64 << 53;
        let above = Value::Integer(two_53 + 1);
        let float = Value::Float(two_53 as f64);

        assert!(!above.loose_eq(&float));
        assert!(Value::Integer(two_53).loose_eq(&float));
        assert_eq!(above.partial_compare(&float), Some(Ordering::Greater));
        assert_eq!(float.partial_compare(&above), Some(Ordering::Less));
        assert_eq!(above.total_cmp(&float), Ordering::Greater);
        assert_eq!(
            Value::Integer(i64::MAX).partial_compare(&Value::Float(I64_UPPER)),
            Some(Ordering::Less)
        );
        assert_eq!(
            Value::Integer(-3).partial_compare(&Value::Float(-2.5)),
            Some(Ordering::Less)
        );
        assert_eq!(
            Value::Integer(-2).partial_compare(&Value::Float(-2.5)),
            Some(Ordering::Greater)
        );
        assert_eq!(Value::Integer(1).partial_compare(&Value::Float(f64::NAN)), None);
    }

    #[test]
    fn mixed_kinds_are_not_range_comparable() {
        assert_eq!(Value::from("10").partial_compare(&Value::Integer(9)), None);
        assert_eq!(Value::Null.partial_compare(&Value::Null), None);
    }

    #[test]
    fn total_order_ranks_kinds() {
        let mut values = vec![
            Value::from("b"),
            Value::Integer(7),
            Value::Null,
            Value::Bool(true),
            Value::from("a"),
            Value::Float(1.5),
        ];
        values.sort_by(|a, b| a.total_cmp(b));
        assert_eq!(
            values,
            vec![
                Value::Null,
                Value::Bool(true),
                Value::Float(1.5),
                Value::Integer(7),
                Value::from("a"),
                Value::from("b"),
            ]
        );
    }

    #[test]
    fn deserializes_untagged_json() {
        let value: Value = serde_json::from_value(json!([1, 2.5, "x", null, {"k": true}])).unwrap();
        let items = value.as_array().unwrap();
        assert_eq!(items[0], Value::Integer(1));
        assert_eq!(items[1], Value::Float(2.5));
        assert_eq!(items[2], Value::from("x"));
        assert!(items[3].is_null());
        assert!(matches!(items[4], Value::Object(_)));
    }

    #[test]
    fn json_conversion_keeps_structure() {
        let json = json!({"title": "A", "tags": ["x", "y"], "score": 4});
        let value = Value::from(json.clone());
        assert_eq!(serde_json::Value::from(value), json);
    }
}
