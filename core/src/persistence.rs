//! Persistence backends: a mapping store keyed by collection name.
//!
//! Each collection (`events`, `reservations`, `sentEmails`, `users`) holds a
//! JSON array. Collections are read entirely when the store opens and written
//! entirely on each mutation, mirroring the original browser-storage flow.
//! The contract is minimal: reads return the last successfully written value
//! for a key, and writes are visible to subsequent reads from the same
//! process. Failures surface to the caller and are never retried.

use async_trait::async_trait;
use serde_json::Value;
use std::collections::HashMap;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use thiserror::Error;
use tracing::debug;

/// Names of the persisted collections.
pub mod collections {
    /// Event catalog collection.
    pub const EVENTS: &str = "events";
    /// Reservation ledger collection.
    pub const RESERVATIONS: &str = "reservations";
    /// Notification log collection.
    pub const SENT_EMAILS: &str = "sentEmails";
    /// User directory collection.
    pub const USERS: &str = "users";
}

/// Failure of the underlying persistence medium.
#[derive(Debug, Error)]
pub enum BackendError {
    /// Filesystem failure.
    #[error("storage i/o error: {0}")]
    Io(#[from] io::Error),
    /// A stored collection is not valid JSON.
    #[error("stored collection is corrupt: {0}")]
    Corrupt(#[from] serde_json::Error),
    /// Backend-specific failure.
    #[error("{0}")]
    Other(String),
}

/// A mapping store keyed by collection name.
///
/// The core does not care whether this is an in-process map, a directory of
/// JSON files or a remote database.
#[async_trait]
pub trait Backend: Send + Sync {
    /// Reads a collection. `Ok(None)` means the collection was never written.
    ///
    /// # Errors
    ///
    /// Returns [`BackendError`] when the medium is unavailable or the stored
    /// data is corrupt.
    async fn load(&self, collection: &str) -> Result<Option<Value>, BackendError>;

    /// Replaces a collection with `value`.
    ///
    /// # Errors
    ///
    /// Returns [`BackendError`] when the write fails; the previous value is
    /// then still what subsequent reads observe.
    async fn save(&self, collection: &str, value: Value) -> Result<(), BackendError>;
}

// ============================================================================
// In-memory backend
// ============================================================================

/// In-process backend. Default for tests and the demo binary; the analogue of
/// the original's per-session browser storage.
#[derive(Debug, Default)]
pub struct MemoryBackend {
    collections: Mutex<HashMap<String, Value>>,
}

impl MemoryBackend {
    /// Creates an empty backend.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl Backend for MemoryBackend {
    async fn load(&self, collection: &str) -> Result<Option<Value>, BackendError> {
        let collections = self
            .collections
            .lock()
            .map_err(|_| BackendError::Other("storage mutex poisoned".into()))?;
        Ok(collections.get(collection).cloned())
    }

    async fn save(&self, collection: &str, value: Value) -> Result<(), BackendError> {
        let mut collections = self
            .collections
            .lock()
            .map_err(|_| BackendError::Other("storage mutex poisoned".into()))?;
        collections.insert(collection.to_string(), value);
        Ok(())
    }
}

// ============================================================================
// JSON file backend
// ============================================================================

/// Directory-of-JSON-files backend: one `<collection>.json` per collection.
///
/// Writes go through a temporary file and a rename, so a crash mid-write
/// leaves the previous value intact.
#[derive(Debug)]
pub struct JsonFileBackend {
    dir: PathBuf,
}

impl JsonFileBackend {
    /// Opens a backend rooted at `dir`, creating the directory if needed.
    ///
    /// # Errors
    ///
    /// Returns [`BackendError::Io`] when the directory cannot be created.
    pub fn open(dir: impl Into<PathBuf>) -> Result<Self, BackendError> {
        let dir = dir.into();
        std::fs::create_dir_all(&dir)?;
        Ok(Self { dir })
    }

    fn path_for(&self, collection: &str) -> PathBuf {
        self.dir.join(format!("{collection}.json"))
    }
}

#[async_trait]
impl Backend for JsonFileBackend {
    async fn load(&self, collection: &str) -> Result<Option<Value>, BackendError> {
        let path = self.path_for(collection);
        match tokio::fs::read_to_string(&path).await {
            Ok(contents) => Ok(Some(serde_json::from_str(&contents)?)),
            Err(error) if error.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(error) => Err(error.into()),
        }
    }

    async fn save(&self, collection: &str, value: Value) -> Result<(), BackendError> {
        let path = self.path_for(collection);
        let tmp = self.dir.join(format!("{collection}.json.tmp"));
        let contents = serde_json::to_string_pretty(&value)?;
        tokio::fs::write(&tmp, contents).await?;
        tokio::fs::rename(&tmp, &path).await?;
        debug!(collection, path = %display_path(&path), "collection persisted");
        Ok(())
    }
}

fn display_path(path: &Path) -> String {
    path.display().to_string()
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use super::*;
    use serde_json::json;

    fn scratch_dir(label: &str) -> PathBuf {
        std::env::temp_dir().join(format!("eventhub-{label}-{}", uuid::Uuid::new_v4()))
    }

    #[tokio::test]
    async fn memory_backend_reads_last_written_value() {
        let backend = MemoryBackend::new();
        assert!(backend.load(collections::EVENTS).await.unwrap().is_none());

        backend
            .save(collections::EVENTS, json!([{"title": "a"}]))
            .await
            .unwrap();
        backend
            .save(collections::EVENTS, json!([{"title": "b"}]))
            .await
            .unwrap();

        let loaded = backend.load(collections::EVENTS).await.unwrap().unwrap();
        assert_eq!(loaded[0]["title"], "b");
    }

    #[tokio::test]
    async fn file_backend_round_trips_collections() {
        let dir = scratch_dir("file-backend");
        let backend = JsonFileBackend::open(&dir).unwrap();

        backend
            .save(collections::USERS, json!([{"email": "ada@example.com"}]))
            .await
            .unwrap();

        // A second backend over the same directory sees the write.
        let reopened = JsonFileBackend::open(&dir).unwrap();
        let loaded = reopened.load(collections::USERS).await.unwrap().unwrap();
        assert_eq!(loaded[0]["email"], "ada@example.com");

        assert!(reopened
            .load(collections::RESERVATIONS)
            .await
            .unwrap()
            .is_none());

        std::fs::remove_dir_all(&dir).unwrap();
    }

    #[tokio::test]
    async fn file_backend_reports_corrupt_collections() {
        let dir = scratch_dir("corrupt");
        let backend = JsonFileBackend::open(&dir).unwrap();
        std::fs::write(dir.join("events.json"), "not json").unwrap();

        let result = backend.load(collections::EVENTS).await;
        assert!(matches!(result, Err(BackendError::Corrupt(_))));

        std::fs::remove_dir_all(&dir).unwrap();
    }
}
