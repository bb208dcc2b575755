//! Timestamp authority - per-partition revision counters.
//!
//! Timestamps start from the wall clock in milliseconds but are never allowed to
//! repeat or go backwards for a (resource, tenant) pair: when the clock has not
//! moved past the last issued value, the next value is `previous + 1`. Under
//! bursts of writes the timestamp therefore slides ahead of real time and acts as
//! an opaque revision number.

mod clock;

use std::collections::HashMap;
use std::sync::Arc;

use crate::table::PartitionKey;

pub use clock::{msec_time, Clock, ManualClock, SystemClock};

/// Revision counter issued by the [`TimestampAuthority`].
pub type Timestamp = u64;

/// Issues strictly increasing timestamps per (resource, tenant).
///
/// Not synchronized on its own; the store keeps it behind the same lock as the
/// record table so a bump and the write it stamps are one step.
pub struct TimestampAuthority {
    clock: Arc<dyn Clock>,
    issued: HashMap<PartitionKey, Timestamp>,
}

impl TimestampAuthority {
    pub fn new(clock: Arc<dyn Clock>) -> Self {
        Self {
            clock,
            issued: HashMap::new(),
        }
    }

    /// Latest issued timestamp, or the current clock value when nothing has
    /// been issued for the pair yet. Never records anything.
    pub fn current(&self, resource: &str, tenant: &str) -> Timestamp {
        self.issued
            .get(&PartitionKey::new(resource, tenant))
            .copied()
            .unwrap_or_else(|| self.clock.now_millis())
    }

    /// Issue a timestamp strictly greater than any previous one for the pair.
    pub fn bump(&mut self, resource: &str, tenant: &str) -> Timestamp {
        let now = self.clock.now_millis();
        let slot = self
            .issued
            .entry(PartitionKey::new(resource, tenant))
            .or_insert(0);
        let next = if *slot >= now { *slot + 1 } else { now };
        *slot = next;
        next
    }

    /// Forget every issued timestamp.
    pub fn clear(&mut self) {
        self.issued.clear();
    }
}

impl Default for TimestampAuthority {
    fn default() -> Self {
        Self::new(Arc::new(SystemClock))
    }
}
