//! MemoryStore - lock-guarded in-memory store.

use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};

use tracing::{debug, info, trace};

use crate::error::StoreError;
use crate::query::{self, Query};
use crate::record::Record;
use crate::resource::Resource;
use crate::table::RecordTable;
use crate::timestamp::{Clock, SystemClock, Timestamp, TimestampAuthority};

#[cfg(feature = "emitter")]
use super::events::{Action, ChangeNotice, Notifier};
use super::{IdGenerator, Store, UnicityCheck, UniqueFields, UuidGenerator};

/// Records and their timestamps. Kept under one lock so that a write and the
/// timestamp it is stamped with are applied together.
struct MemoryState {
    table: RecordTable,
    timestamps: TimestampAuthority,
}

impl MemoryState {
    fn new(clock: Arc<dyn Clock>) -> Self {
        Self {
            table: RecordTable::new(),
            timestamps: TimestampAuthority::new(clock),
        }
    }
}

/// In-memory [`Store`] backed by `Arc<RwLock<..>>`.
///
/// Writes take the lock exclusively, reads share it. Clone-friendly: clones
/// share the same records, timestamps and listeners.
#[derive(Clone)]
pub struct MemoryStore {
    state: Arc<RwLock<MemoryState>>,
    id_generator: Arc<dyn IdGenerator>,
    unicity: Arc<dyn UnicityCheck>,
    max_fetch_size: Option<usize>,
    #[cfg(feature = "emitter")]
    notifier: Notifier,
}

impl std::fmt::Debug for MemoryStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MemoryStore")
            .field("max_fetch_size", &self.max_fetch_size)
            .finish_non_exhaustive()
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryStore {
    /// Empty store with UUID ids, unique-field checks and the system clock.
    pub fn new() -> Self {
        Self {
            state: Arc::new(RwLock::new(MemoryState::new(Arc::new(SystemClock)))),
            id_generator: Arc::new(UuidGenerator),
            unicity: Arc::new(UniqueFields),
            max_fetch_size: None,
            #[cfg(feature = "emitter")]
            notifier: Notifier::default(),
        }
    }

    pub fn with_id_generator(mut self, generator: impl IdGenerator + 'static) -> Self {
        self.id_generator = Arc::new(generator);
        self
    }

    pub fn with_unicity_check(mut self, check: impl UnicityCheck + 'static) -> Self {
        self.unicity = Arc::new(check);
        self
    }

    /// Use another clock for timestamps. Starts from empty state, so call it
    /// while building the store.
    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.state = Arc::new(RwLock::new(MemoryState::new(clock)));
        self
    }

    /// Cap on the number of records a single `get_all` returns.
    pub fn with_max_fetch_size(mut self, max: Option<usize>) -> Self {
        self.max_fetch_size = max;
        self
    }

    /// Register a listener for `record.created`, `record.updated` or
    /// `record.deleted`. It receives a JSON [`ChangeNotice`]. Returns the
    /// listener id.
    #[cfg(feature = "emitter")]
    pub fn on<F>(&self, event: &str, listener: F) -> Result<String, StoreError>
    where
        F: Fn(String) + Send + Sync + 'static,
    {
        self.notifier.on(event, listener)
    }

    fn read(&self, operation: &'static str) -> Result<RwLockReadGuard<'_, MemoryState>, StoreError> {
        self.state
            .read()
            .map_err(|_| StoreError::LockPoisoned(operation))
    }

    fn write(
        &self,
        operation: &'static str,
    ) -> Result<RwLockWriteGuard<'_, MemoryState>, StoreError> {
        self.state
            .write()
            .map_err(|_| StoreError::LockPoisoned(operation))
    }

    fn check_unicity(
        &self,
        state: &MemoryState,
        resource: &Resource,
        user_id: &str,
        record: &Record,
    ) -> Result<(), StoreError> {
        let existing: Vec<&Record> = state.table.iter(resource.name(), user_id).collect();
        self.unicity
            .check_unicity(resource, user_id, record, &existing)
    }

    /// Bump the partition timestamp and write it into the record.
    fn stamp(
        state: &mut MemoryState,
        resource: &Resource,
        user_id: &str,
        record: &mut Record,
    ) -> Timestamp {
        let timestamp = state.timestamps.bump(resource.name(), user_id);
        record.insert(resource.modified_field(), timestamp);
        timestamp
    }

    #[cfg(feature = "emitter")]
    fn notify(
        &self,
        action: Action,
        resource: &Resource,
        user_id: &str,
        timestamp: Timestamp,
        record: &Record,
    ) {
        self.notifier.notify(&ChangeNotice {
            action,
            resource: resource.name().to_string(),
            user_id: user_id.to_string(),
            timestamp,
            record: record.clone(),
        });
    }
}

impl Store for MemoryStore {
    fn create(
        &self,
        resource: &Resource,
        user_id: &str,
        mut record: Record,
    ) -> Result<Record, StoreError> {
        let id = self.id_generator.next_id();
        let timestamp = {
            let mut state = self.write("create")?;
            record.insert(resource.id_field(), id.as_str());
            self.check_unicity(&state, resource, user_id, &record)?;
            if state.table.contains(resource.name(), user_id, &id) {
                return Err(StoreError::UnicityConflict {
                    resource: resource.name().to_string(),
                    field: resource.id_field().to_string(),
                    existing: id,
                });
            }
            let timestamp = Self::stamp(&mut state, resource, user_id, &mut record);
            state.table.put(resource.name(), user_id, &id, record.clone());
            timestamp
        };
        debug!(resource = resource.name(), user_id, id = %id, timestamp, "record created");
        #[cfg(feature = "emitter")]
        self.notify(Action::Created, resource, user_id, timestamp, &record);
        Ok(record)
    }

    fn get(
        &self,
        resource: &Resource,
        user_id: &str,
        record_id: &str,
    ) -> Result<Record, StoreError> {
        trace!(resource = resource.name(), user_id, id = record_id, "get record");
        self.read("get")?.table.get(resource.name(), user_id, record_id)
    }

    fn update(
        &self,
        resource: &Resource,
        user_id: &str,
        record_id: &str,
        mut record: Record,
    ) -> Result<Record, StoreError> {
        record.insert(resource.id_field(), record_id);
        let timestamp = {
            let mut state = self.write("update")?;
            self.check_unicity(&state, resource, user_id, &record)?;
            let timestamp = Self::stamp(&mut state, resource, user_id, &mut record);
            state
                .table
                .put(resource.name(), user_id, record_id, record.clone());
            timestamp
        };
        debug!(resource = resource.name(), user_id, id = record_id, timestamp, "record updated");
        #[cfg(feature = "emitter")]
        self.notify(Action::Updated, resource, user_id, timestamp, &record);
        Ok(record)
    }

    fn delete(
        &self,
        resource: &Resource,
        user_id: &str,
        record_id: &str,
    ) -> Result<Record, StoreError> {
        let (existing, timestamp) = {
            let mut state = self.write("delete")?;
            let existing = state.table.delete(resource.name(), user_id, record_id)?;
            let timestamp = state.timestamps.bump(resource.name(), user_id);
            (existing, timestamp)
        };
        debug!(resource = resource.name(), user_id, id = record_id, timestamp, "record deleted");
        #[cfg(feature = "emitter")]
        self.notify(Action::Deleted, resource, user_id, timestamp, &existing);
        Ok(existing)
    }

    fn get_all(
        &self,
        resource: &Resource,
        user_id: &str,
        query: &Query,
    ) -> Result<(Vec<Record>, usize), StoreError> {
        let records = self.read("get_all")?.table.all(resource.name(), user_id);
        trace!(
            resource = resource.name(),
            user_id,
            candidates = records.len(),
            "listing records"
        );

        match self.max_fetch_size {
            Some(max) => {
                let mut capped = query.clone();
                capped.limit = Some(match query.limit {
                    Some(limit) if limit > 0 => limit.min(max),
                    _ => max,
                });
                query::list(records, &capped, resource.id_field())
            }
            None => query::list(records, query, resource.id_field()),
        }
    }

    fn collection_timestamp(
        &self,
        resource: &Resource,
        user_id: &str,
    ) -> Result<Timestamp, StoreError> {
        Ok(self
            .read("collection_timestamp")?
            .timestamps
            .current(resource.name(), user_id))
    }

    fn flush(&self) -> Result<(), StoreError> {
        let mut state = self.write("flush")?;
        state.table.flush();
        state.timestamps.clear();
        info!("store flushed");
        Ok(())
    }

    fn ping(&self) -> bool {
        self.state.read().is_ok()
    }
}
