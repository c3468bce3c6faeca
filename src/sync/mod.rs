// ABOUTME: Offline-first sync queue delivering finalized sessions to the remote service
// ABOUTME: Immediate attempt, durable queue on failure, bounded retries with exponential backoff
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! # Sync Queue
//!
//! A finalized session gets one immediate delivery attempt. If that fails it
//! is appended to a durable queue with `retry_count = 0`. Each later flush
//! retries eligible items in order; an item whose `retry_count` reaches the
//! maximum is dropped without a further attempt.
//!
//! Only one flush runs at a time. A flush requested while another is in
//! flight returns [`SyncOutcome::AlreadySyncing`] immediately.

/// Background worker reacting to connectivity and a periodic timer
pub mod worker;

pub use worker::{ConnectivityHandle, SyncWorker};

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

use trackline_core::constants::storage_keys;
use trackline_core::errors::TrackingResult;
use trackline_core::models::{PendingSyncItem, SessionPayload};
use trackline_core::Clock;
use trackline_remote::RemoteSessionService;

use crate::config::SyncPolicy;
use crate::logging::TrackingLogger;
use crate::storage::{self, KeyValueStore};

/// Result of handing a finalized session to the queue
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// Delivered by the immediate attempt
    Delivered,
    /// Immediate attempt failed; queued for retry
    Queued {
        /// Why the immediate attempt failed
        reason: String,
    },
}

/// Counters of one flush pass
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FlushReport {
    /// Delivered and removed
    pub synced: usize,
    /// Failed, still queued
    pub failed: usize,
    /// Removed after reaching the retry limit
    pub dropped: usize,
    /// Still inside their backoff window
    pub skipped: usize,
}

/// Result of a flush request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyncOutcome {
    /// A pass ran
    Completed(FlushReport),
    /// Another pass was in flight; this request was coalesced into it
    AlreadySyncing,
}

/// Resets the in-flight flag when a flush pass ends, including on early return
struct SyncingGuard<'a>(&'a AtomicBool);

impl Drop for SyncingGuard<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::SeqCst);
    }
}

/// Durable queue of finalized sessions awaiting delivery
pub struct SyncQueue {
    store: Arc<dyn KeyValueStore>,
    remote: Arc<dyn RemoteSessionService>,
    clock: Arc<dyn Clock>,
    policy: SyncPolicy,
    is_syncing: AtomicBool,
    // Serializes read-modify-write of the queue slot
    queue_lock: Mutex<()>,
}

impl SyncQueue {
    /// Queue over the given store and remote service
    #[must_use]
    pub fn new(
        store: Arc<dyn KeyValueStore>,
        remote: Arc<dyn RemoteSessionService>,
        clock: Arc<dyn Clock>,
        policy: SyncPolicy,
    ) -> Self {
        Self {
            store,
            remote,
            clock,
            policy,
            is_syncing: AtomicBool::new(false),
            queue_lock: Mutex::new(()),
        }
    }

    /// Retry policy in use
    #[must_use]
    pub const fn policy(&self) -> &SyncPolicy {
        &self.policy
    }

    /// Whether a flush pass is currently running
    #[must_use]
    pub fn is_syncing(&self) -> bool {
        self.is_syncing.load(Ordering::SeqCst)
    }

    /// Attempt delivery once, queueing the payload if it fails
    ///
    /// # Errors
    ///
    /// Returns an error only if the payload could not be queued after a
    /// failed attempt
    pub async fn submit(&self, payload: SessionPayload) -> TrackingResult<SubmitOutcome> {
        match self
            .remote
            .finalize_session(&payload.session_id, &payload)
            .await
        {
            Ok(()) => {
                TrackingLogger::log_sync_attempt(&payload.session_id, 0, true, None);
                Ok(SubmitOutcome::Delivered)
            }
            Err(e) => {
                let reason = e.to_string();
                TrackingLogger::log_sync_attempt(&payload.session_id, 0, false, Some(&reason));
                self.enqueue(payload).await?;
                Ok(SubmitOutcome::Queued { reason })
            }
        }
    }

    /// Append a payload to the durable queue with `retry_count = 0`
    ///
    /// # Errors
    ///
    /// Returns an error if the queue cannot be read or written
    pub async fn enqueue(&self, payload: SessionPayload) -> TrackingResult<PendingSyncItem> {
        let item = PendingSyncItem::new(payload, self.clock.now());
        let _guard = self.queue_lock.lock().await;
        let mut items = self.load().await?;
        items.push(item.clone());
        self.save(&items).await?;
        info!(session.id = %item.session_id, queue.len = items.len(), "Session queued for sync");
        Ok(item)
    }

    /// Items currently queued, in order
    ///
    /// # Errors
    ///
    /// Returns an error if the queue cannot be read
    pub async fn pending(&self) -> TrackingResult<Vec<PendingSyncItem>> {
        self.load().await
    }

    /// Retry every eligible queued item once
    ///
    /// # Errors
    ///
    /// Returns an error if the queue cannot be read or written
    pub async fn flush(&self) -> TrackingResult<SyncOutcome> {
        if self
            .is_syncing
            .compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst)
            .is_err()
        {
            debug!("Sync already in flight, coalescing request");
            return Ok(SyncOutcome::AlreadySyncing);
        }
        let _syncing = SyncingGuard(&self.is_syncing);

        let items = self.load().await?;
        let mut report = FlushReport::default();
        let mut attempted = false;

        for item in items {
            if item.retry_count >= self.policy.max_retries {
                TrackingLogger::log_sync_abandoned(&item.session_id, item.retry_count);
                self.update(&item, None).await?;
                report.dropped += 1;
                continue;
            }
            if !self.is_eligible(&item) {
                report.skipped += 1;
                continue;
            }

            if attempted && !self.policy.item_delay.is_zero() {
                tokio::time::sleep(self.policy.item_delay).await;
            }
            attempted = true;

            match self
                .remote
                .finalize_session(&item.session_id, &item.payload)
                .await
            {
                Ok(()) => {
                    TrackingLogger::log_sync_attempt(&item.session_id, item.retry_count, true, None);
                    self.update(&item, None).await?;
                    report.synced += 1;
                }
                Err(e) => {
                    let mut retried = item.clone();
                    retried.retry_count += 1;
                    retried.last_attempt_at = Some(self.clock.now());
                    TrackingLogger::log_sync_attempt(
                        &item.session_id,
                        retried.retry_count,
                        false,
                        Some(&e.to_string()),
                    );
                    if retried.retry_count >= self.policy.max_retries {
                        TrackingLogger::log_sync_abandoned(&item.session_id, retried.retry_count);
                        self.update(&item, None).await?;
                        report.dropped += 1;
                    } else {
                        self.update(&item, Some(retried)).await?;
                        report.failed += 1;
                    }
                }
            }
        }

        Ok(SyncOutcome::Completed(report))
    }

    fn is_eligible(&self, item: &PendingSyncItem) -> bool {
        let Some(last_attempt_at) = item.last_attempt_at else {
            return true;
        };
        let backoff = self.policy.backoff_for(item.retry_count);
        chrono::Duration::from_std(backoff)
            .map_or(true, |backoff| self.clock.now() >= last_attempt_at + backoff)
    }

    /// Replace (or remove, with `None`) the queued entry with `item.id`
    async fn update(
        &self,
        item: &PendingSyncItem,
        replacement: Option<PendingSyncItem>,
    ) -> TrackingResult<()> {
        let _guard = self.queue_lock.lock().await;
        let mut items = self.load().await?;
        match replacement {
            Some(updated) => {
                if let Some(slot) = items.iter_mut().find(|i| i.id == item.id) {
                    *slot = updated;
                }
            }
            None => items.retain(|i| i.id != item.id),
        }
        self.save(&items).await
    }

    /// Read the queue; an unreadable slot is quarantined and read as empty
    async fn load(&self) -> TrackingResult<Vec<PendingSyncItem>> {
        let Some(bytes) = self.store.get(storage_keys::SYNC_QUEUE).await? else {
            return Ok(Vec::new());
        };
        match serde_json::from_slice(&bytes) {
            Ok(items) => Ok(items),
            Err(e) => {
                warn!(error = %e, "Sync queue is corrupt, moving it aside and starting empty");
                self.store
                    .set(storage_keys::SYNC_QUEUE_QUARANTINE, &bytes)
                    .await?;
                self.store.remove(storage_keys::SYNC_QUEUE).await?;
                Ok(Vec::new())
            }
        }
    }

    async fn save(&self, items: &[PendingSyncItem]) -> TrackingResult<()> {
        if items.is_empty() {
            return self.store.remove(storage_keys::SYNC_QUEUE).await;
        }
        storage::put_json(self.store.as_ref(), storage_keys::SYNC_QUEUE, &items).await
    }
}
