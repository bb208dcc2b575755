#![allow(dead_code)]

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use record_store::{IdGenerator, ManualClock, MemoryStore, Record, Resource};

/// Ids "rec-1", "rec-2", ... in call order.
#[derive(Default)]
pub struct SequentialIds {
    next: AtomicU64,
}

impl IdGenerator for SequentialIds {
    fn next_id(&self) -> String {
        format!("rec-{}", self.next.fetch_add(1, Ordering::SeqCst) + 1)
    }
}

pub fn articles() -> Resource {
    Resource::new("articles")
}

pub fn record(json: serde_json::Value) -> Record {
    Record::from_json(json).expect("fixture must be a JSON object")
}

/// Store with sequential ids and a clock frozen at 1_000ms.
pub fn frozen_store() -> (Arc<ManualClock>, MemoryStore) {
    let clock = Arc::new(ManualClock::new(1_000));
    let store = MemoryStore::new()
        .with_clock(clock.clone())
        .with_id_generator(SequentialIds::default());
    (clock, store)
}

pub fn ids(records: &[Record]) -> Vec<String> {
    records
        .iter()
        .filter_map(|r| r.get_str("_id").map(str::to_string))
        .collect()
}

pub fn timestamp_of(record: &Record) -> u64 {
    record
        .get("last_modified")
        .and_then(|v| v.as_i64())
        .expect("record carries last_modified") as u64
}
