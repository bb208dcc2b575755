//! Store - CRUD and listing over (resource, tenant) partitions.
//!
//! [`Store`] is the contract the resource layer talks to. [`MemoryStore`] is the
//! in-memory implementation and the reference behaviour for other backends.
//!
//! ## Example
//!
//! ```ignore
//! use record_store::{CollectionsExt, MemoryStore, Query, Record, Resource, Sort, Store};
//!
//! let store = MemoryStore::new();
//! let articles = Resource::new("articles");
//! let created = store.create(&articles, "u1", record)?;
//!
//! let mine = store.collection(&articles, "u1");
//! let (page, total) = mine.list(&Query::new().sort(Sort::desc("last_modified")).limit(10))?;
//! ```

mod collaborators;
mod collection;
#[cfg(feature = "emitter")]
mod events;
mod memory;
mod settings;

use crate::error::StoreError;
use crate::query::Query;
use crate::record::Record;
use crate::resource::Resource;
use crate::timestamp::Timestamp;

pub use collaborators::{IdGenerator, UnicityCheck, UniqueFields, UuidGenerator};
pub use collection::{Collection, CollectionsExt};
#[cfg(feature = "emitter")]
pub use events::{Action, ChangeNotice, RECORD_CREATED, RECORD_DELETED, RECORD_UPDATED};
pub use memory::MemoryStore;
pub use settings::{load_from_config, StoreSettings};

/// Storage contract for multi-tenant records.
///
/// Every operation is addressed by a resource and a tenant (`user_id`); tenants
/// never see each other's records. Records go in and come out by value.
pub trait Store: Send + Sync {
    /// Store a new record under a freshly generated id and timestamp.
    fn create(&self, resource: &Resource, user_id: &str, record: Record)
        -> Result<Record, StoreError>;

    /// Fetch one record. Reading never bumps the collection timestamp.
    fn get(&self, resource: &Resource, user_id: &str, record_id: &str)
        -> Result<Record, StoreError>;

    /// Replace (or create) the record stored under `record_id`.
    fn update(
        &self,
        resource: &Resource,
        user_id: &str,
        record_id: &str,
        record: Record,
    ) -> Result<Record, StoreError>;

    /// Remove a record and return it as it was.
    fn delete(&self, resource: &Resource, user_id: &str, record_id: &str)
        -> Result<Record, StoreError>;

    /// List records with filters, sorting and pagination. The count is the
    /// number of records matching the filters, regardless of paging.
    fn get_all(
        &self,
        resource: &Resource,
        user_id: &str,
        query: &Query,
    ) -> Result<(Vec<Record>, usize), StoreError>;

    /// Last timestamp issued for the partition.
    fn collection_timestamp(&self, resource: &Resource, user_id: &str)
        -> Result<Timestamp, StoreError>;

    /// Drop every record and timestamp.
    fn flush(&self) -> Result<(), StoreError>;

    /// Liveness probe.
    fn ping(&self) -> bool;
}
