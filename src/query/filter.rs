use std::cmp::Ordering;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::StoreError;
use crate::record::{Record, Value};

/// Comparison operator of a [`Filter`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Comparison {
    Eq,
    Ne,
    Lt,
    Lte,
    Gt,
    Gte,
    In,
    Exclude,
}

impl FromStr for Comparison {
    type Err = StoreError;

    /// Accepts the querystring prefixes (`eq`, `not`, `lt`, `gt`, `min`, `max`,
    /// `in`, `exclude`) as well as symbolic operators.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "eq" | "==" => Ok(Comparison::Eq),
            "not" | "ne" | "!=" => Ok(Comparison::Ne),
            "lt" | "<" => Ok(Comparison::Lt),
            "max" | "lte" | "<=" => Ok(Comparison::Lte),
            "gt" | ">" => Ok(Comparison::Gt),
            "min" | "gte" | ">=" => Ok(Comparison::Gte),
            "in" => Ok(Comparison::In),
            "exclude" => Ok(Comparison::Exclude),
            other => Err(StoreError::InvalidFilter(format!(
                "unknown operator {:?}",
                other
            ))),
        }
    }
}

/// A `field <comparison> value` predicate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Filter {
    pub field: String,
    #[serde(rename = "op")]
    pub comparison: Comparison,
    pub value: Value,
}

impl Filter {
    pub fn new(field: impl Into<String>, comparison: Comparison, value: impl Into<Value>) -> Self {
        Self {
            field: field.into(),
            comparison,
            value: value.into(),
        }
    }

    pub fn eq(field: impl Into<String>, value: impl Into<Value>) -> Self {
        Self::new(field, Comparison::Eq, value)
    }

    pub fn ne(field: impl Into<String>, value: impl Into<Value>) -> Self {
        Self::new(field, Comparison::Ne, value)
    }

    pub fn gt(field: impl Into<String>, value: impl Into<Value>) -> Self {
        Self::new(field, Comparison::Gt, value)
    }

    pub fn lt(field: impl Into<String>, value: impl Into<Value>) -> Self {
        Self::new(field, Comparison::Lt, value)
    }

    /// Reject descriptors that cannot be evaluated.
    pub fn validate(&self) -> Result<(), StoreError> {
        if self.field.is_empty() {
            return Err(StoreError::InvalidFilter("empty field name".into()));
        }
        if matches!(self.comparison, Comparison::In | Comparison::Exclude)
            && self.value.as_array().is_none()
        {
            return Err(StoreError::InvalidFilter(format!(
                "{:?} on {} needs a list of values",
                self.comparison, self.field
            )));
        }
        Ok(())
    }

    /// Evaluate against a record. A missing field reads as `Null`; range
    /// comparisons between values of different kinds never match.
    pub fn matches(&self, record: &Record) -> bool {
        let actual = record.value_or_null(&self.field);
        let expected = &self.value;
        match self.comparison {
            Comparison::Eq => actual.loose_eq(expected),
            Comparison::Ne => !actual.loose_eq(expected),
            Comparison::Lt => actual.partial_compare(expected) == Some(Ordering::Less),
            Comparison::Gt => actual.partial_compare(expected) == Some(Ordering::Greater),
            Comparison::Lte => matches!(
                actual.partial_compare(expected),
                Some(Ordering::Less | Ordering::Equal)
            ),
            Comparison::Gte => matches!(
                actual.partial_compare(expected),
                Some(Ordering::Greater | Ordering::Equal)
            ),
            Comparison::In => expected
                .as_array()
                .is_some_and(|candidates| candidates.iter().any(|c| actual.loose_eq(c))),
            Comparison::Exclude => expected
                .as_array()
                .is_some_and(|candidates| !candidates.iter().any(|c| actual.loose_eq(c))),
        }
    }
}

/// True when the record satisfies every filter. Filters must already be validated.
pub fn matches_all(record: &Record, filters: &[Filter]) -> bool {
    filters.iter().all(|filter| filter.matches(record))
}

/// Keep the records satisfying every filter, preserving order.
pub fn apply_filters(records: Vec<Record>, filters: &[Filter]) -> Result<Vec<Record>, StoreError> {
    for filter in filters {
        filter.validate()?;
    }
    Ok(records
        .into_iter()
        .filter(|record| matches_all(record, filters))
        .collect())
}
