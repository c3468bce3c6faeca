// ABOUTME: Integration tests for the offline-first sync queue and its background worker
// ABOUTME: Immediate delivery, bounded retries, backoff windows, flush coalescing and connectivity edges
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
#![allow(missing_docs)]

mod common;

use anyhow::Result;
use async_trait::async_trait;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Notify;

use common::{init_test_logging, manual_clock, sample_payload, sync_queue, ScriptedRemoteService};
use trackline::config::SyncPolicy;
use trackline::storage::{InMemoryStore, KeyValueStore};
use trackline::sync::{
    ConnectivityHandle, FlushReport, SubmitOutcome, SyncOutcome, SyncQueue, SyncWorker,
};
use trackline_core::constants::storage_keys;
use trackline_core::errors::RemoteError;
use trackline_core::models::{SessionPayload, SportKind, TrackPoint};
use trackline_remote::RemoteSessionService;

fn report(outcome: SyncOutcome) -> FlushReport {
    match outcome {
        SyncOutcome::Completed(report) => report,
        SyncOutcome::AlreadySyncing => panic!("no other flush should be running"),
    }
}

#[tokio::test]
async fn test_online_submit_is_delivered_without_queueing() -> Result<()> {
    init_test_logging();
    let store = InMemoryStore::new();
    let remote = Arc::new(ScriptedRemoteService::online());
    let queue = sync_queue(&store, &remote, &manual_clock(), SyncPolicy::immediate());

    let outcome = queue.submit(sample_payload("run-1")).await?;

    assert_eq!(outcome, SubmitOutcome::Delivered);
    assert_eq!(remote.finalized().len(), 1);
    assert_eq!(remote.finalized()[0].session_id, "run-1");
    assert!(queue.pending().await?.is_empty());
    assert!(store.get(storage_keys::SYNC_QUEUE).await?.is_none());
    Ok(())
}

#[tokio::test]
async fn test_scenario_e_three_failed_retries_then_dropped() -> Result<()> {
    init_test_logging();
    let store = InMemoryStore::new();
    let remote = Arc::new(ScriptedRemoteService::offline());
    let queue = sync_queue(&store, &remote, &manual_clock(), SyncPolicy::immediate());

    let outcome = queue.submit(sample_payload("offline-run")).await?;
    assert!(matches!(outcome, SubmitOutcome::Queued { .. }));
    let pending = queue.pending().await?;
    assert_eq!(pending.len(), 1);
    assert_eq!(pending[0].retry_count, 0);
    assert_eq!(remote.finalize_attempts(), 1);

    let first = report(queue.flush().await?);
    assert_eq!(first.failed, 1);
    assert_eq!(queue.pending().await?[0].retry_count, 1);

    let second = report(queue.flush().await?);
    assert_eq!(second.failed, 1);
    assert_eq!(queue.pending().await?[0].retry_count, 2);

    let third = report(queue.flush().await?);
    assert_eq!(third.dropped, 1);
    assert!(queue.pending().await?.is_empty());
    assert!(store.get(storage_keys::SYNC_QUEUE).await?.is_none());

    // One immediate attempt plus three retries, never a fourth retry
    assert_eq!(remote.finalize_attempts(), 4);
    assert_eq!(report(queue.flush().await?), FlushReport::default());
    assert_eq!(remote.finalize_attempts(), 4);
    Ok(())
}

#[tokio::test]
async fn test_queued_item_is_delivered_once_back_online() -> Result<()> {
    let store = InMemoryStore::new();
    let remote = Arc::new(ScriptedRemoteService::offline());
    let queue = sync_queue(&store, &remote, &manual_clock(), SyncPolicy::immediate());

    queue.submit(sample_payload("a")).await?;
    queue.submit(sample_payload("b")).await?;
    remote.set_online(true);

    let flushed = report(queue.flush().await?);
    assert_eq!(flushed.synced, 2);
    let delivered: Vec<String> = remote
        .finalized()
        .into_iter()
        .map(|p| p.session_id)
        .collect();
    assert_eq!(delivered, vec!["a".to_owned(), "b".to_owned()]);
    assert!(store.is_empty().await);
    Ok(())
}

#[tokio::test]
async fn test_corrupt_queue_is_quarantined_and_submit_still_queues() -> Result<()> {
    init_test_logging();
    let store = InMemoryStore::new();
    store.set(storage_keys::SYNC_QUEUE, b"{not json").await?;
    let remote = Arc::new(ScriptedRemoteService::offline());
    let queue = sync_queue(&store, &remote, &manual_clock(), SyncPolicy::immediate());

    let outcome = queue.submit(sample_payload("after-crash")).await?;

    assert!(matches!(outcome, SubmitOutcome::Queued { .. }));
    let pending = queue.pending().await?;
    assert_eq!(pending.len(), 1);
    assert_eq!(pending[0].payload.session_id, "after-crash");
    assert_eq!(
        store.get(storage_keys::SYNC_QUEUE_QUARANTINE).await?,
        Some(b"{not json".to_vec())
    );
    Ok(())
}

#[tokio::test]
async fn test_flush_over_corrupt_queue_completes_empty() -> Result<()> {
    let store = InMemoryStore::new();
    store.set(storage_keys::SYNC_QUEUE, b"[{\"truncated\"").await?;
    let remote = Arc::new(ScriptedRemoteService::online());
    let queue = sync_queue(&store, &remote, &manual_clock(), SyncPolicy::immediate());

    assert_eq!(report(queue.flush().await?), FlushReport::default());
    assert!(store.get(storage_keys::SYNC_QUEUE).await?.is_none());
    assert!(queue.pending().await?.is_empty());
    assert_eq!(remote.finalize_attempts(), 0);
    Ok(())
}

#[tokio::test]
async fn test_backoff_window_skips_item() -> Result<()> {
    let store = InMemoryStore::new();
    let remote = Arc::new(ScriptedRemoteService::offline());
    let clock = manual_clock();
    let policy = SyncPolicy {
        item_delay: Duration::ZERO,
        ..SyncPolicy::default()
    };
    let queue = sync_queue(&store, &remote, &clock, policy);

    queue.enqueue(sample_payload("slow")).await?;
    assert_eq!(report(queue.flush().await?).failed, 1);
    assert_eq!(remote.finalize_attempts(), 1);

    // First backoff step is 5 s
    assert_eq!(report(queue.flush().await?).skipped, 1);
    clock.advance_ms(4_000);
    assert_eq!(report(queue.flush().await?).skipped, 1);
    assert_eq!(remote.finalize_attempts(), 1);

    clock.advance_ms(1_000);
    assert_eq!(report(queue.flush().await?).failed, 1);
    assert_eq!(remote.finalize_attempts(), 2);

    // Second step doubles to 10 s
    clock.advance_ms(9_000);
    assert_eq!(report(queue.flush().await?).skipped, 1);
    clock.advance_ms(1_000);
    assert_eq!(report(queue.flush().await?).dropped, 1);
    assert_eq!(remote.finalize_attempts(), 3);
    Ok(())
}

/// Remote whose finalize call blocks until released
struct GatedRemote {
    entered: Notify,
    release: Notify,
}

#[async_trait]
impl RemoteSessionService for GatedRemote {
    async fn create_session(
        &self,
        local_id: &str,
        _sport: SportKind,
        _initial_position: Option<&TrackPoint>,
    ) -> Result<String, RemoteError> {
        Ok(local_id.to_owned())
    }

    async fn finalize_session(
        &self,
        _session_id: &str,
        _payload: &SessionPayload,
    ) -> Result<(), RemoteError> {
        self.entered.notify_one();
        self.release.notified().await;
        Ok(())
    }
}

#[tokio::test]
async fn test_concurrent_flush_is_coalesced() -> Result<()> {
    let store = InMemoryStore::new();
    let remote = Arc::new(GatedRemote {
        entered: Notify::new(),
        release: Notify::new(),
    });
    let queue = Arc::new(SyncQueue::new(
        Arc::new(store.clone()),
        remote.clone(),
        manual_clock(),
        SyncPolicy::immediate(),
    ));
    queue.enqueue(sample_payload("gated")).await?;

    let running = {
        let queue = Arc::clone(&queue);
        tokio::spawn(async move { queue.flush().await })
    };
    remote.entered.notified().await;

    assert!(queue.is_syncing());
    assert_eq!(queue.flush().await?, SyncOutcome::AlreadySyncing);

    remote.release.notify_one();
    let first = report(running.await??);
    assert_eq!(first.synced, 1);
    assert!(!queue.is_syncing());
    assert!(queue.pending().await?.is_empty());
    Ok(())
}

#[tokio::test]
async fn test_unwritable_store_fails_submit_after_failed_attempt() {
    let store = InMemoryStore::new();
    store.set_fail_writes(true);
    let remote = Arc::new(ScriptedRemoteService::offline());
    let queue = sync_queue(&store, &remote, &manual_clock(), SyncPolicy::immediate());

    assert!(queue.submit(sample_payload("lost")).await.is_err());
    assert_eq!(remote.finalize_attempts(), 1);
}

#[tokio::test(start_paused = true)]
async fn test_worker_flushes_when_connectivity_returns() -> Result<()> {
    init_test_logging();
    let store = InMemoryStore::new();
    let remote = Arc::new(ScriptedRemoteService::offline());
    let queue = sync_queue(&store, &remote, &manual_clock(), SyncPolicy::immediate());
    queue.submit(sample_payload("edge")).await?;

    let connectivity = ConnectivityHandle::new(false);
    let worker = SyncWorker::spawn(Arc::clone(&queue), connectivity.subscribe());

    remote.set_online(true);
    connectivity.set_online(true);

    for _ in 0..100 {
        if queue.pending().await?.is_empty() {
            break;
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
    }

    assert!(queue.pending().await?.is_empty());
    assert_eq!(remote.finalized().len(), 1);
    worker.shutdown().await;
    Ok(())
}

#[tokio::test(start_paused = true)]
async fn test_worker_stays_idle_while_offline() -> Result<()> {
    let store = InMemoryStore::new();
    let remote = Arc::new(ScriptedRemoteService::offline());
    let queue = sync_queue(&store, &remote, &manual_clock(), SyncPolicy::immediate());
    queue.submit(sample_payload("idle")).await?;

    let connectivity = ConnectivityHandle::new(false);
    let worker = SyncWorker::spawn(Arc::clone(&queue), connectivity.subscribe());

    // Several periodic checks elapse while offline
    tokio::time::sleep(Duration::from_secs(95)).await;

    assert_eq!(remote.finalize_attempts(), 1);
    assert_eq!(queue.pending().await?.len(), 1);
    worker.shutdown().await;
    Ok(())
}
