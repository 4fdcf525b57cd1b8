pub mod file_store;
pub mod memory_store;
pub mod snapshot_store;

use serde::Serialize;
use serde::de::DeserializeOwned;
use std::io;
use thiserror::Error;
use tracing::{error, warn};

pub use file_store::FileStore;
pub use memory_store::MemoryStore;
pub use snapshot_store::{SnapshotStore, should_autosave};

/// Custom error types for the storage backends
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Store unavailable: {0}")]
    Unavailable(String),
}

/// Persisted key-value store holding JSON text.
///
/// Implementors provide raw reads and writes; `get`/`set` add the JSON layer and
/// turn failures into the fallback value or `false`.
pub trait KeyValueStore {
    fn read(&self, key: &str) -> Result<Option<String>, StoreError>;

    fn write(&self, key: &str, raw: &str) -> Result<(), StoreError>;

    fn get<T: DeserializeOwned>(&self, key: &str, fallback: T) -> T
    where
        Self: Sized,
    {
        match self.read(key) {
            Ok(Some(raw)) => serde_json::from_str(&raw).unwrap_or_else(|e| {
                warn!("Failed to parse stored value for {}: {}", key, e);
                fallback
            }),
            Ok(None) => fallback,
            Err(e) => {
                warn!("Failed to read {}: {}", key, e);
                fallback
            }
        }
    }

    fn set<T: Serialize + ?Sized>(&self, key: &str, value: &T) -> bool
    where
        Self: Sized,
    {
        let result = serde_json::to_string(value)
            .map_err(StoreError::from)
            .and_then(|raw| self.write(key, &raw));
        match result {
            Ok(()) => true,
            Err(e) => {
                error!("Failed to write {}: {}", key, e);
                false
            }
        }
    }
}
