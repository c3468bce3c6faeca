// ABOUTME: File-system key-value store with atomic replace-on-write
// ABOUTME: Each key maps to `<dir>/<key>.json`; writes go through a temp file and rename
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use async_trait::async_trait;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::debug;

use trackline_core::errors::{TrackingError, TrackingResult};

use super::KeyValueStore;

/// Store rooted at a directory
#[derive(Debug, Clone)]
pub struct FileStore {
    root: PathBuf,
}

impl FileStore {
    /// Open (and create if needed) the store directory
    ///
    /// # Errors
    ///
    /// Returns `TrackingError::Storage` if the directory cannot be created
    pub async fn open(root: impl Into<PathBuf>) -> TrackingResult<Self> {
        let root = root.into();
        fs::create_dir_all(&root).await.map_err(|e| {
            TrackingError::storage(format!("cannot create {}: {e}", root.display()))
        })?;
        debug!(store.root = %root.display(), "File store opened");
        Ok(Self { root })
    }

    /// Directory holding the slots
    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    fn slot_path(&self, key: &str) -> TrackingResult<PathBuf> {
        let valid = !key.is_empty()
            && key
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-');
        if !valid {
            return Err(TrackingError::storage(format!("invalid storage key: {key:?}")));
        }
        Ok(self.root.join(format!("{key}.json")))
    }
}

#[async_trait]
impl KeyValueStore for FileStore {
    async fn get(&self, key: &str) -> TrackingResult<Option<Vec<u8>>> {
        let path = self.slot_path(key)?;
        match fs::read(&path).await {
            Ok(bytes) => Ok(Some(bytes)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(TrackingError::storage(format!(
                "cannot read {}: {e}",
                path.display()
            ))),
        }
    }

    async fn set(&self, key: &str, value: &[u8]) -> TrackingResult<()> {
        let path = self.slot_path(key)?;
        let tmp = path.with_extension("json.tmp");
        fs::write(&tmp, value).await.map_err(|e| {
            TrackingError::storage(format!("cannot write {}: {e}", tmp.display()))
        })?;
        fs::rename(&tmp, &path).await.map_err(|e| {
            TrackingError::storage(format!("cannot replace {}: {e}", path.display()))
        })
    }

    async fn remove(&self, key: &str) -> TrackingResult<()> {
        let path = self.slot_path(key)?;
        match fs::remove_file(&path).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(TrackingError::storage(format!(
                "cannot remove {}: {e}",
                path.display()
            ))),
        }
    }
}
