//! Query engine - filtering, sorting and cursor pagination over a record snapshot.
//!
//! The engine never touches the record table; it works on the copies handed to it
//! and returns the ordered page together with the filter-scoped total count.
//!
//! Pagination rules are a disjunction of filter groups. A page is made of the
//! filtered records matching at least one group. When no record matches any
//! group, the whole filtered set is used instead of an empty page.

mod filter;
mod sort;

use std::collections::HashSet;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::StoreError;
use crate::record::Record;

pub use filter::{apply_filters, matches_all, Comparison, Filter};
pub use sort::{apply_sorting, Direction, Sort};

/// Listing parameters as produced by the resource layer.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Query {
    /// Conjunction applied before counting.
    pub filters: Vec<Filter>,
    /// Sort keys, most significant first.
    pub sorting: Vec<Sort>,
    /// Disjunction of conjunctive cursor conditions.
    pub pagination_rules: Vec<Vec<Filter>>,
    /// Maximum number of records returned; `None` or `0` means no limit.
    pub limit: Option<usize>,
}

impl Query {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn filter(mut self, filter: Filter) -> Self {
        self.filters.push(filter);
        self
    }

    pub fn sort(mut self, sort: Sort) -> Self {
        self.sorting.push(sort);
        self
    }

    pub fn pagination_rule(mut self, rule: Vec<Filter>) -> Self {
        self.pagination_rules.push(rule);
        self
    }

    pub fn limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }

    fn validate(&self) -> Result<(), StoreError> {
        self.filters
            .iter()
            .chain(self.pagination_rules.iter().flatten())
            .try_for_each(Filter::validate)
    }
}

/// Run a query over a record snapshot.
///
/// Returns the ordered, possibly truncated page and the number of records that
/// passed `query.filters`. Records are deduplicated by `id_field` when
/// pagination rules apply.
pub fn list(
    records: Vec<Record>,
    query: &Query,
    id_field: &str,
) -> Result<(Vec<Record>, usize), StoreError> {
    query.validate()?;

    let filtered: Vec<Record> = records
        .into_iter()
        .filter(|record| matches_all(record, &query.filters))
        .collect();
    let total = filtered.len();

    let mut page = paginate(filtered, &query.pagination_rules, id_field);
    apply_sorting(&mut page, &query.sorting)?;

    if let Some(limit) = query.limit.filter(|limit| *limit > 0) {
        page.truncate(limit);
    }
    Ok((page, total))
}

fn paginate(filtered: Vec<Record>, rules: &[Vec<Filter>], id_field: &str) -> Vec<Record> {
    if rules.is_empty() {
        return filtered;
    }

    let mut seen = HashSet::new();
    let page: Vec<Record> = filtered
        .iter()
        .filter(|record| rules.iter().any(|rule| matches_all(record, rule)))
        .filter(|record| match record.identity(id_field) {
            Some(id) => seen.insert(id),
            None => true,
        })
        .cloned()
        .collect();

    if page.is_empty() {
        debug!(
            rules = rules.len(),
            "pagination rules matched nothing, using full filtered set"
        );
        return filtered;
    }
    page
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn fixtures() -> Vec<Record> {
        [
            json!({"_id": "a", "x": 1, "status": "read"}),
            json!({"_id": "b", "x": 2, "status": "unread"}),
            json!({"_id": "c", "x": 3, "status": "read"}),
            json!({"_id": "d", "x": 4, "status": "read"}),
        ]
        .into_iter()
        .map(|v| Record::from_json(v).unwrap())
        .collect()
    }

    fn ids(records: &[Record]) -> Vec<&str> {
        records.iter().filter_map(|r| r.get_str("_id")).collect()
    }

    #[test]
    fn empty_query_returns_everything() {
        let (records, total) = list(fixtures(), &Query::new(), "_id").unwrap();
        assert_eq!(total, 4);
        assert_eq!(ids(&records), vec!["a", "b", "c", "d"]);
    }

    #[test]
    fn total_is_counted_before_limit() {
        let query = Query::new().filter(Filter::eq("status", "read")).limit(1);
        let (records, total) = list(fixtures(), &query, "_id").unwrap();
        assert_eq!(total, 3);
        assert_eq!(records.len(), 1);
    }

    #[test]
    fn zero_limit_means_unlimited() {
        let (records, _) = list(fixtures(), &Query::new().limit(0), "_id").unwrap();
        assert_eq!(records.len(), 4);
    }

    #[test]
    fn pagination_rules_narrow_the_page_not_the_total() {
        let query = Query::new()
            .filter(Filter::eq("status", "read"))
            .sort(Sort::asc("x"))
            .pagination_rule(vec![Filter::gt("x", 1)]);
        let (records, total) = list(fixtures(), &query, "_id").unwrap();
        assert_eq!(total, 3);
        assert_eq!(ids(&records), vec!["c", "d"]);
    }

    #[test]
    fn pagination_rules_are_a_union_without_duplicates() {
        let query = Query::new()
            .pagination_rule(vec![Filter::gt("x", 2)])
            .pagination_rule(vec![Filter::gt("x", 3)])
            .pagination_rule(vec![Filter::eq("_id", "a")]);
        let (records, total) = list(fixtures(), &query, "_id").unwrap();
        assert_eq!(total, 4);
        assert_eq!(ids(&records), vec!["a", "c", "d"]);
    }

    #[test]
    fn duplicate_identities_in_input_are_collapsed() {
        let mut input = fixtures();
        input.push(input[0].clone());
        let query = Query::new().pagination_rule(vec![Filter::lt("x", 2)]);
        let (records, _) = list(input, &query, "_id").unwrap();
        assert_eq!(ids(&records), vec!["a"]);
    }

    #[test]
    fn unmatched_pagination_falls_back_to_filtered_set() {
        let query = Query::new().pagination_rule(vec![Filter::gt("x", 999)]);
        let (records, total) = list(fixtures(), &query, "_id").unwrap();
        assert_eq!(total, 4);
        assert_eq!(ids(&records), vec!["a", "b", "c", "d"]);
    }

    #[test]
    fn sort_then_limit() {
        let query = Query::new().sort(Sort::desc("x")).limit(2);
        let (records, _) = list(fixtures(), &query, "_id").unwrap();
        assert_eq!(ids(&records), vec!["d", "c"]);
    }

    #[test]
    fn invalid_pagination_rule_is_rejected() {
        let query = Query::new().pagination_rule(vec![Filter::new("x", Comparison::In, 1)]);
        let err = list(fixtures(), &query, "_id").unwrap_err();
        assert!(matches!(err, StoreError::InvalidFilter(_)));
    }

    #[test]
    fn query_deserializes_with_defaults() {
        let query: Query = serde_json::from_value(json!({
            "filters": [{"field": "status", "op": "eq", "value": "read"}],
            "sorting": [{"field": "x", "direction": "desc"}],
            "limit": 2
        }))
        .unwrap();
        assert!(query.pagination_rules.is_empty());
        let (records, total) = list(fixtures(), &query, "_id").unwrap();
        assert_eq!(total, 3);
        assert_eq!(ids(&records), vec!["d", "c"]);
    }
}
