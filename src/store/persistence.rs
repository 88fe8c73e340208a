//! Persistence adapters
//!
//! The store calls [`Persistence::save`] after every successful mutation.
//! In the browser the host keeps the snapshot itself, so no adapter is
//! attached there.

use std::sync::Mutex;

use crate::models::{Collection, PlannerError, PlannerResult};

pub trait Persistence: Send {
    fn load(&self) -> PlannerResult<Collection>;

    fn save(&self, collection: &Collection) -> PlannerResult<()>;
}

/// Parse a JSON snapshot and repair it
pub fn collection_from_json(json: &str) -> PlannerResult<Collection> {
    let mut collection: Collection = serde_json::from_str(json)?;
    collection.normalize()?;
    Ok(collection)
}

pub fn collection_to_json(collection: &Collection) -> PlannerResult<String> {
    Ok(serde_json::to_string_pretty(collection)?)
}

/// Keeps the latest snapshot as a JSON string
#[derive(Debug, Default)]
pub struct MemoryPersistence {
    snapshot: Mutex<Option<String>>,
}

impl MemoryPersistence {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn snapshot(&self) -> Option<String> {
        self.snapshot.lock().ok().and_then(|guard| guard.clone())
    }
}

impl Persistence for MemoryPersistence {
    fn load(&self) -> PlannerResult<Collection> {
        match self.snapshot() {
            Some(json) => collection_from_json(&json),
            None => Ok(Collection::new()),
        }
    }

    fn save(&self, collection: &Collection) -> PlannerResult<()> {
        let json = collection_to_json(collection)?;
        let mut guard = self
            .snapshot
            .lock()
            .map_err(|e| PlannerError::Persistence(format!("snapshot lock poisoned: {}", e)))?;
        *guard = Some(json);
        Ok(())
    }
}

/// Stores the collection as pretty-printed JSON on disk
#[cfg(not(target_arch = "wasm32"))]
#[derive(Debug, Clone)]
pub struct JsonFilePersistence {
    path: std::path::PathBuf,
}

#[cfg(not(target_arch = "wasm32"))]
impl JsonFilePersistence {
    pub fn new(path: impl Into<std::path::PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

#[cfg(not(target_arch = "wasm32"))]
impl Persistence for JsonFilePersistence {
    /// A missing file loads as an empty collection
    fn load(&self) -> PlannerResult<Collection> {
        match std::fs::read_to_string(&self.path) {
            Ok(json) => collection_from_json(&json),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(Collection::new()),
            Err(e) => Err(PlannerError::Persistence(format!(
                "failed to read {}: {}",
                self.path.display(),
                e
            ))),
        }
    }

    fn save(&self, collection: &Collection) -> PlannerResult<()> {
        let json = collection_to_json(collection)?;
        std::fs::write(&self.path, json).map_err(|e| {
            PlannerError::Persistence(format!("failed to write {}: {}", self.path.display(), e))
        })
    }
}
