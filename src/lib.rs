mod error;
mod query;
mod record;
mod resource;
mod store;
mod table;
mod timestamp;

pub use error::StoreError;
pub use query::{
    apply_filters, apply_sorting, list, matches_all, Comparison, Direction, Filter, Query, Sort,
};
pub use record::{Record, Value};
pub use resource::{Resource, DEFAULT_ID_FIELD, DEFAULT_MODIFIED_FIELD};
#[cfg(feature = "emitter")]
pub use store::{Action, ChangeNotice, RECORD_CREATED, RECORD_DELETED, RECORD_UPDATED};
pub use store::{
    load_from_config, Collection, CollectionsExt, IdGenerator, MemoryStore, Store, StoreSettings,
    UnicityCheck, UniqueFields, UuidGenerator,
};
pub use table::{PartitionKey, RecordTable};
pub use timestamp::{msec_time, Clock, ManualClock, SystemClock, Timestamp, TimestampAuthority};
