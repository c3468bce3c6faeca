// ABOUTME: In-memory key-value store backed by a shared HashMap
// ABOUTME: Clones share the same map, so a test can inspect what the engine wrote
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tokio::sync::RwLock;

use trackline_core::errors::{TrackingError, TrackingResult};

use super::KeyValueStore;

/// In-memory store
///
/// Uses `Arc<RwLock<HashMap>>` so clones observe each other's writes. Writes
/// can be made to fail to exercise storage error paths.
#[derive(Debug, Clone, Default)]
pub struct InMemoryStore {
    slots: Arc<RwLock<HashMap<String, Vec<u8>>>>,
    fail_writes: Arc<AtomicBool>,
}

impl InMemoryStore {
    /// Create an empty store
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Make subsequent `set`/`remove` calls fail (or succeed again)
    pub fn set_fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::SeqCst);
    }

    /// Number of occupied slots
    pub async fn len(&self) -> usize {
        self.slots.read().await.len()
    }

    /// Whether no slot is occupied
    pub async fn is_empty(&self) -> bool {
        self.slots.read().await.is_empty()
    }

    fn check_writable(&self) -> TrackingResult<()> {
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(TrackingError::storage("in-memory store is read-only"));
        }
        Ok(())
    }
}

#[async_trait]
impl KeyValueStore for InMemoryStore {
    async fn get(&self, key: &str) -> TrackingResult<Option<Vec<u8>>> {
        Ok(self.slots.read().await.get(key).cloned())
    }

    async fn set(&self, key: &str, value: &[u8]) -> TrackingResult<()> {
        self.check_writable()?;
        self.slots
            .write()
            .await
            .insert(key.to_owned(), value.to_vec());
        Ok(())
    }

    async fn remove(&self, key: &str) -> TrackingResult<()> {
        self.check_writable()?;
        self.slots.write().await.remove(key);
        Ok(())
    }
}
