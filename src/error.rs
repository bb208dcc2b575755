use std::fmt;

/// Error type for record store operations.
///
/// Every failure is per-operation: checks run before any mutation, so an error
/// always leaves the store as it was.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreError {
    /// The record id does not exist in the addressed partition.
    NotFound { resource: String, id: String },
    /// A create/update would duplicate a unique field value.
    UnicityConflict {
        resource: String,
        field: String,
        existing: String,
    },
    /// Malformed filter or pagination rule.
    InvalidFilter(String),
    /// Malformed sort descriptor.
    InvalidSort(String),
    /// The internal lock was poisoned by a panicking writer.
    LockPoisoned(&'static str),
    /// Settings that cannot produce a working store.
    Configuration(String),
}

impl fmt::Display for StoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StoreError::NotFound { resource, id } => {
                write!(f, "record not found: {}:{}", resource, id)
            }
            StoreError::UnicityConflict {
                resource,
                field,
                existing,
            } => write!(
                f,
                "unicity conflict on {}.{} (already used by record {})",
                resource, field, existing
            ),
            StoreError::InvalidFilter(msg) => write!(f, "invalid filter: {}", msg),
            StoreError::InvalidSort(msg) => write!(f, "invalid sort: {}", msg),
            StoreError::LockPoisoned(operation) => {
                write!(f, "store lock poisoned during {}", operation)
            }
            StoreError::Configuration(msg) => write!(f, "invalid store configuration: {}", msg),
        }
    }
}

impl std::error::Error for StoreError {}
