// ABOUTME: Background sync worker driven by connectivity changes and a periodic timer
// ABOUTME: Connectivity is a watch channel; the worker flushes on offline -> online edges
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use std::sync::Arc;
use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tracing::{debug, warn};

use super::{SyncOutcome, SyncQueue};

/// Sender side of the connectivity notifier
#[derive(Debug, Clone)]
pub struct ConnectivityHandle {
    tx: Arc<watch::Sender<bool>>,
}

impl ConnectivityHandle {
    /// Notifier with an initial connectivity state
    #[must_use]
    pub fn new(online: bool) -> Self {
        let (tx, _rx) = watch::channel(online);
        Self { tx: Arc::new(tx) }
    }

    /// Publish the current connectivity state
    pub fn set_online(&self, online: bool) {
        self.tx.send_replace(online);
    }

    /// Last published state
    #[must_use]
    pub fn is_online(&self) -> bool {
        *self.tx.borrow()
    }

    /// New receiver for the worker
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<bool> {
        self.tx.subscribe()
    }
}

/// Running background worker
pub struct SyncWorker {
    shutdown_tx: mpsc::Sender<()>,
    task: JoinHandle<()>,
}

impl SyncWorker {
    /// Spawn the worker on the current runtime
    #[must_use]
    pub fn spawn(queue: Arc<SyncQueue>, mut connectivity: watch::Receiver<bool>) -> Self {
        let (shutdown_tx, mut shutdown_rx) = mpsc::channel::<()>(1);
        let check_interval = queue.policy().check_interval;

        let task = tokio::spawn(async move {
            let mut interval = tokio::time::interval(check_interval);
            interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
            // The first tick completes immediately; consume it so the timer is periodic only
            interval.tick().await;

            let mut was_online = *connectivity.borrow_and_update();
            let mut notifier_open = true;

            loop {
                tokio::select! {
                    changed = connectivity.changed(), if notifier_open => {
                        if changed.is_err() {
                            debug!("Connectivity notifier closed, relying on periodic checks");
                            notifier_open = false;
                            continue;
                        }
                        let online = *connectivity.borrow_and_update();
                        let restored = online && !was_online;
                        was_online = online;
                        if restored {
                            debug!("Connectivity restored, flushing sync queue");
                            Self::flush_if_pending(&queue).await;
                        }
                    }
                    _ = interval.tick() => {
                        if *connectivity.borrow() {
                            Self::flush_if_pending(&queue).await;
                        }
                    }
                    _ = shutdown_rx.recv() => {
                        debug!("Sync worker received shutdown signal");
                        break;
                    }
                }
            }
        });

        Self { shutdown_tx, task }
    }

    async fn flush_if_pending(queue: &SyncQueue) {
        match queue.pending().await {
            Ok(items) if items.is_empty() => return,
            Ok(_) => {}
            Err(e) => {
                warn!(error = %e, "Cannot read sync queue");
                return;
            }
        }
        match queue.flush().await {
            Ok(SyncOutcome::Completed(report)) => debug!(?report, "Sync pass finished"),
            Ok(SyncOutcome::AlreadySyncing) => {}
            Err(e) => warn!(error = %e, "Sync pass failed"),
        }
    }

    /// Stop the worker and wait for it to exit
    pub async fn shutdown(self) {
        let _ = self.shutdown_tx.send(()).await;
        if let Err(e) = self.task.await {
            warn!(error = %e, "Sync worker task ended abnormally");
        }
    }
}
