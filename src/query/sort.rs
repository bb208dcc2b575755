use std::cmp::Ordering;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::StoreError;
use crate::record::Record;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Asc,
    Desc,
}

/// One sort key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Sort {
    pub field: String,
    pub direction: Direction,
}

impl Sort {
    pub fn asc(field: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            direction: Direction::Asc,
        }
    }

    pub fn desc(field: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            direction: Direction::Desc,
        }
    }

    fn compare(&self, a: &Record, b: &Record) -> Ordering {
        let ord = a
            .value_or_null(&self.field)
            .total_cmp(b.value_or_null(&self.field));
        match self.direction {
            Direction::Asc => ord,
            Direction::Desc => ord.reverse(),
        }
    }
}

impl FromStr for Sort {
    type Err = StoreError;

    /// `field` sorts ascending, `-field` descending.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let sort = match s.strip_prefix('-') {
            Some(field) => Sort::desc(field),
            None => Sort::asc(s),
        };
        if sort.field.is_empty() {
            return Err(StoreError::InvalidSort(format!("no field in {:?}", s)));
        }
        Ok(sort)
    }
}

/// Stable multi-key sort: the first key decides, later keys break ties, and
/// records equal on every key keep their input order.
pub fn apply_sorting(records: &mut [Record], sorting: &[Sort]) -> Result<(), StoreError> {
    if let Some(bad) = sorting.iter().find(|sort| sort.field.is_empty()) {
        return Err(StoreError::InvalidSort(format!(
            "empty field name ({:?})",
            bad.direction
        )));
    }
    if sorting.is_empty() {
        return Ok(());
    }
    records.sort_by(|a, b| {
        sorting
            .iter()
            .map(|sort| sort.compare(a, b))
            .find(|ord| *ord != Ordering::Equal)
            .unwrap_or(Ordering::Equal)
    });
    Ok(())
}
