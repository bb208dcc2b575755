//! Change notifications for successful writes.
//!
//! Listeners receive a JSON-encoded [`ChangeNotice`] and run on their own
//! threads, after the store lock has been released.

use std::sync::{Arc, Mutex};

use event_emitter_rs::EventEmitter;
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::error::StoreError;
use crate::record::Record;
use crate::timestamp::Timestamp;

pub const RECORD_CREATED: &str = "record.created";
pub const RECORD_UPDATED: &str = "record.updated";
pub const RECORD_DELETED: &str = "record.deleted";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Action {
    Created,
    Updated,
    Deleted,
}

impl Action {
    pub fn event_name(&self) -> &'static str {
        match self {
            Action::Created => RECORD_CREATED,
            Action::Updated => RECORD_UPDATED,
            Action::Deleted => RECORD_DELETED,
        }
    }
}

/// Payload delivered to listeners.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChangeNotice {
    pub action: Action,
    pub resource: String,
    pub user_id: String,
    /// Collection timestamp issued by the write.
    pub timestamp: Timestamp,
    /// The stored record, or the removed one for deletions.
    pub record: Record,
}

impl ChangeNotice {
    pub fn from_json(payload: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(payload)
    }
}

/// Shared emitter; clones of a store notify the same listeners.
#[derive(Clone)]
pub(crate) struct Notifier {
    emitter: Arc<Mutex<EventEmitter>>,
}

impl Default for Notifier {
    fn default() -> Self {
        Self {
            emitter: Arc::new(Mutex::new(EventEmitter::new())),
        }
    }
}

impl Notifier {
    pub(crate) fn on<F>(&self, event: &str, listener: F) -> Result<String, StoreError>
    where
        F: Fn(String) + Send + Sync + 'static,
    {
        let mut emitter = self
            .emitter
            .lock()
            .map_err(|_| StoreError::LockPoisoned("listener registration"))?;
        Ok(emitter.on(event, listener))
    }

    pub(crate) fn notify(&self, notice: &ChangeNotice) {
        let payload = match serde_json::to_string(notice) {
            Ok(payload) => payload,
            Err(e) => {
                warn!(error = %e, resource = %notice.resource, "could not encode change notice");
                return;
            }
        };
        match self.emitter.lock() {
            Ok(mut emitter) => {
                emitter.emit(notice.action.event_name(), payload);
            }
            Err(_) => warn!(resource = %notice.resource, "change emitter poisoned, notice dropped"),
        }
    }
}
