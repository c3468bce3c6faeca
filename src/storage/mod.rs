// ABOUTME: Durable key-value storage abstraction for the snapshot slot and the sync queue
// ABOUTME: Pluggable backends (in-memory, file system) behind one async trait
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

/// File-system store, one file per key
pub mod file;
/// In-memory store for tests and ephemeral sessions
pub mod memory;

pub use file::FileStore;
pub use memory::InMemoryStore;

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::Serialize;

use trackline_core::errors::TrackingResult;

/// Durable byte store keyed by string
///
/// Each key is a single slot: `set` overwrites, `remove` of an absent key is
/// a no-op.
#[async_trait]
pub trait KeyValueStore: Send + Sync {
    /// Read a slot
    ///
    /// # Errors
    ///
    /// Returns `TrackingError::Storage` if the backend cannot be read
    async fn get(&self, key: &str) -> TrackingResult<Option<Vec<u8>>>;

    /// Overwrite a slot
    ///
    /// # Errors
    ///
    /// Returns `TrackingError::Storage` if the backend cannot be written
    async fn set(&self, key: &str, value: &[u8]) -> TrackingResult<()>;

    /// Delete a slot
    ///
    /// # Errors
    ///
    /// Returns `TrackingError::Storage` if the backend cannot be written
    async fn remove(&self, key: &str) -> TrackingResult<()>;
}

/// Serialize `value` as JSON into `key`
///
/// # Errors
///
/// Returns an error if serialization or the write fails
pub async fn put_json<T: Serialize + Sync>(
    store: &dyn KeyValueStore,
    key: &str,
    value: &T,
) -> TrackingResult<()> {
    let bytes = serde_json::to_vec(value)?;
    store.set(key, &bytes).await
}

/// Read and deserialize the JSON value stored under `key`
///
/// # Errors
///
/// Returns `TrackingError::Serialization` if the slot holds invalid JSON and
/// `TrackingError::Storage` if it cannot be read
pub async fn get_json<T: DeserializeOwned>(
    store: &dyn KeyValueStore,
    key: &str,
) -> TrackingResult<Option<T>> {
    match store.get(key).await? {
        Some(bytes) => Ok(Some(serde_json::from_slice(&bytes)?)),
        None => Ok(None),
    }
}
