//! RecordTable - records keyed by (resource, tenant) then id.
//!
//! Partitions are created explicitly on write. Reads of a missing partition
//! return nothing and leave the table untouched.

use std::collections::{BTreeMap, HashMap};

use crate::error::StoreError;
use crate::record::Record;

/// Identifies one partition: a resource as seen by one tenant.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PartitionKey {
    pub resource: String,
    pub tenant: String,
}

impl PartitionKey {
    pub fn new(resource: impl Into<String>, tenant: impl Into<String>) -> Self {
        Self {
            resource: resource.into(),
            tenant: tenant.into(),
        }
    }
}

/// Two-level keyed record storage.
///
/// Within a partition records are ordered by id, so snapshots come out in a
/// deterministic order.
#[derive(Debug, Default)]
pub struct RecordTable {
    partitions: HashMap<PartitionKey, BTreeMap<String, Record>>,
}

impl RecordTable {
    pub fn new() -> Self {
        Self::default()
    }

    fn partition(&self, resource: &str, tenant: &str) -> Option<&BTreeMap<String, Record>> {
        self.partitions.get(&PartitionKey::new(resource, tenant))
    }

    /// Insert or overwrite a record, creating the partition if needed.
    pub fn put(&mut self, resource: &str, tenant: &str, id: &str, record: Record) {
        self.partitions
            .entry(PartitionKey::new(resource, tenant))
            .or_default()
            .insert(id.to_string(), record);
    }

    pub fn get(&self, resource: &str, tenant: &str, id: &str) -> Result<Record, StoreError> {
        self.partition(resource, tenant)
            .and_then(|records| records.get(id))
            .cloned()
            .ok_or_else(|| not_found(resource, id))
    }

    /// Remove a record and hand it back.
    pub fn delete(&mut self, resource: &str, tenant: &str, id: &str) -> Result<Record, StoreError> {
        self.partitions
            .get_mut(&PartitionKey::new(resource, tenant))
            .and_then(|records| records.remove(id))
            .ok_or_else(|| not_found(resource, id))
    }

    pub fn contains(&self, resource: &str, tenant: &str, id: &str) -> bool {
        self.partition(resource, tenant)
            .is_some_and(|records| records.contains_key(id))
    }

    /// Copy of every record in the partition, ordered by id.
    pub fn all(&self, resource: &str, tenant: &str) -> Vec<Record> {
        self.partition(resource, tenant)
            .map(|records| records.values().cloned().collect())
            .unwrap_or_default()
    }

    /// Borrowing iterator over a partition, ordered by id.
    pub fn iter(&self, resource: &str, tenant: &str) -> impl Iterator<Item = &Record> + '_ {
        self.partition(resource, tenant)
            .into_iter()
            .flat_map(BTreeMap::values)
    }

    pub fn len(&self, resource: &str, tenant: &str) -> usize {
        self.partition(resource, tenant).map_or(0, BTreeMap::len)
    }

    pub fn partition_count(&self) -> usize {
        self.partitions.len()
    }

    /// Drop every partition.
    pub fn flush(&mut self) {
        self.partitions.clear();
    }
}

fn not_found(resource: &str, id: &str) -> StoreError {
    StoreError::NotFound {
        resource: resource.to_string(),
        id: id.to_string(),
    }
}
