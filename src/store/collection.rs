//! Collection - a store view bound to one resource and tenant.

use crate::error::StoreError;
use crate::query::Query;
use crate::record::Record;
use crate::resource::Resource;
use crate::timestamp::Timestamp;

use super::Store;

/// Partition-scoped accessor, so callers don't repeat the resource and tenant.
pub struct Collection<'a, S: ?Sized> {
    store: &'a S,
    resource: &'a Resource,
    user_id: &'a str,
}

impl<'a, S: Store + ?Sized> Collection<'a, S> {
    pub fn new(store: &'a S, resource: &'a Resource, user_id: &'a str) -> Self {
        Self {
            store,
            resource,
            user_id,
        }
    }

    pub fn resource(&self) -> &Resource {
        self.resource
    }

    pub fn user_id(&self) -> &str {
        self.user_id
    }

    pub fn create(&self, record: Record) -> Result<Record, StoreError> {
        self.store.create(self.resource, self.user_id, record)
    }

    pub fn get(&self, record_id: &str) -> Result<Record, StoreError> {
        self.store.get(self.resource, self.user_id, record_id)
    }

    pub fn update(&self, record_id: &str, record: Record) -> Result<Record, StoreError> {
        self.store.update(self.resource, self.user_id, record_id, record)
    }

    pub fn delete(&self, record_id: &str) -> Result<Record, StoreError> {
        self.store.delete(self.resource, self.user_id, record_id)
    }

    pub fn list(&self, query: &Query) -> Result<(Vec<Record>, usize), StoreError> {
        self.store.get_all(self.resource, self.user_id, query)
    }

    pub fn timestamp(&self) -> Result<Timestamp, StoreError> {
        self.store.collection_timestamp(self.resource, self.user_id)
    }
}

/// Extension trait for partition-scoped access on any [`Store`].
pub trait CollectionsExt: Store {
    fn collection<'a>(&'a self, resource: &'a Resource, user_id: &'a str) -> Collection<'a, Self> {
        Collection::new(self, resource, user_id)
    }
}

impl<S: Store + ?Sized> CollectionsExt for S {}
