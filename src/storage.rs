//! Persistence for the parsed track between requests.
//!
//! A store is a small async key-value space; the pipeline only ever uses the
//! [`TRACK_SLOT`] key, overwriting it on every successful parse.

use crate::Sample;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::io::ErrorKind;
use std::path::PathBuf;
use thiserror::Error;
use tracing::debug;

/// Key under which the last parsed track is kept.
pub const TRACK_SLOT: &str = "gpxData";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoredTrack {
    pub points: Vec<Sample>,
}

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type StorageResult<T> = Result<T, StorageError>;

#[allow(async_fn_in_trait)]
pub trait TrackStore {
    /// Replaces whatever is stored under `key`.
    async fn set(&mut self, key: &str, value: &StoredTrack) -> StorageResult<()>;

    /// Returns `Ok(None)` when nothing was ever stored under `key`.
    async fn get(&self, key: &str) -> StorageResult<Option<StoredTrack>>;
}

/// Process-local store; contents vanish with the value.
#[derive(Debug, Default)]
pub struct MemoryStore {
    slots: HashMap<String, StoredTrack>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl TrackStore for MemoryStore {
    async fn set(&mut self, key: &str, value: &StoredTrack) -> StorageResult<()> {
        self.slots.insert(key.to_string(), value.clone());
        Ok(())
    }

    async fn get(&self, key: &str) -> StorageResult<Option<StoredTrack>> {
        Ok(self.slots.get(key).cloned())
    }
}

/// Single JSON file holding a map of key to stored track.
///
/// The file is read on every `get` and rewritten whole on every `set`, so
/// separate processes sharing a path see each other's writes.
#[derive(Debug, Clone)]
pub struct FileStore {
    path: PathBuf,
}

impl FileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        FileStore { path: path.into() }
    }

    async fn read_map(&self) -> StorageResult<HashMap<String, StoredTrack>> {
        let contents = match tokio::fs::read_to_string(&self.path).await {
            Ok(contents) => contents,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(HashMap::new()),
            Err(e) => return Err(e.into()),
        };
        if contents.trim().is_empty() {
            return Ok(HashMap::new());
        }
        Ok(serde_json::from_str(&contents)?)
    }
}

impl TrackStore for FileStore {
    async fn set(&mut self, key: &str, value: &StoredTrack) -> StorageResult<()> {
        let mut map = self.read_map().await?;
        map.insert(key.to_string(), value.clone());

        if let Some(parent) = self.path.parent()
            && !parent.as_os_str().is_empty()
        {
            tokio::fs::create_dir_all(parent).await?;
        }
        tokio::fs::write(&self.path, serde_json::to_vec(&map)?).await?;
        debug!("stored {} points under {key:?} in {}", value.points.len(), self.path.display());
        Ok(())
    }

    async fn get(&self, key: &str) -> StorageResult<Option<StoredTrack>> {
        Ok(self.read_map().await?.remove(key))
    }
}
