use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::StoreError;

use super::MemoryStore;

/// Backend name accepted by [`load_from_config`].
pub const MEMORY_BACKEND: &str = "memory";

/// Store settings as read from the host application's configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StoreSettings {
    /// Storage backend; only `"memory"` is available.
    pub backend: String,
    /// Upper bound on the records returned by one listing.
    pub max_fetch_size: Option<usize>,
}

impl Default for StoreSettings {
    fn default() -> Self {
        Self {
            backend: MEMORY_BACKEND.to_string(),
            max_fetch_size: None,
        }
    }
}

impl StoreSettings {
    pub fn from_json(raw: &str) -> Result<Self, StoreError> {
        serde_json::from_str(raw).map_err(|e| StoreError::Configuration(e.to_string()))
    }
}

/// Build the store described by `settings`.
pub fn load_from_config(settings: &StoreSettings) -> Result<MemoryStore, StoreError> {
    if settings.backend != MEMORY_BACKEND {
        return Err(StoreError::Configuration(format!(
            "unknown backend {:?}",
            settings.backend
        )));
    }
    if settings.max_fetch_size == Some(0) {
        return Err(StoreError::Configuration(
            "max_fetch_size must be positive".into(),
        ));
    }
    debug!(backend = %settings.backend, max_fetch_size = ?settings.max_fetch_size, "loading store");
    Ok(MemoryStore::new().with_max_fetch_size(settings.max_fetch_size))
}
