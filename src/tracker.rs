// ABOUTME: Async orchestrator wiring the tracking engine to acquisition, snapshots and sync
// ABOUTME: Single owner of the live session; every I/O edge is a trait object so tests can script it
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! # Tracker
//!
//! The [`Tracker`] owns the one live [`TrackingEngine`] and performs the side
//! effects around it:
//!
//! - starts and stops the acquisition loop with the session
//! - asks the remote service for a session id at start, keeping the local id
//!   when that fails
//! - writes the crash-recovery snapshot after every meaningful change
//! - hands the finished session to the sync queue and clears the slot
//!
//! Location, storage and network faults are logged and never block a
//! lifecycle transition.

use std::sync::Arc;
use tracing::{debug, info, warn};

use trackline_core::errors::{InvalidTransition, SessionAction, TrackingError, TrackingResult};
use trackline_core::models::{Fix, SessionStatus, SportKind, Split, TrackPoint};
use trackline_core::Clock;
use trackline_remote::RemoteSessionService;

use crate::acquisition::{AcquisitionHandle, AcquisitionLoop, AcquisitionStatus, LocationService};
use crate::config::AcquisitionConfig;
use crate::logging::TrackingLogger;
use crate::snapshot::{Restore, SnapshotManager};
use crate::storage::KeyValueStore;
use crate::sync::{SubmitOutcome, SyncQueue};
use crate::tracking::{FixOutcome, TrackingEngine, TrackingView};

/// What `start` achieved beyond the state transition
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StartReport {
    /// Identifier the session runs under
    pub session_id: String,
    /// Whether the identifier was issued by the remote service
    pub remote_id: bool,
    /// Acquisition loop status right after start
    pub location: AcquisitionStatus,
}

/// Async owner of the live session
pub struct Tracker {
    engine: TrackingEngine,
    snapshots: SnapshotManager,
    sync: Arc<SyncQueue>,
    remote: Arc<dyn RemoteSessionService>,
    location: Option<Arc<dyn LocationService>>,
    acquisition: Option<AcquisitionHandle>,
    acquisition_config: AcquisitionConfig,
    location_status: AcquisitionStatus,
    last_position: Option<TrackPoint>,
}

impl Tracker {
    /// Idle tracker without a location service; fixes are fed with [`Tracker::handle_fix`]
    #[must_use]
    pub fn new(
        clock: Arc<dyn Clock>,
        store: Arc<dyn KeyValueStore>,
        remote: Arc<dyn RemoteSessionService>,
        sync: Arc<SyncQueue>,
        acquisition_config: AcquisitionConfig,
    ) -> Self {
        Self {
            engine: TrackingEngine::new(clock),
            snapshots: SnapshotManager::new(store),
            sync,
            remote,
            location: None,
            acquisition: None,
            acquisition_config,
            location_status: AcquisitionStatus::Stopped,
            last_position: None,
        }
    }

    /// Poll this location service while a session is live
    #[must_use]
    pub fn with_location_service(mut self, service: Arc<dyn LocationService>) -> Self {
        self.location = Some(service);
        self
    }

    /// The engine behind the tracker
    #[must_use]
    pub const fn engine(&self) -> &TrackingEngine {
        &self.engine
    }

    /// Current lifecycle status
    #[must_use]
    pub const fn status(&self) -> SessionStatus {
        self.engine.state().status
    }

    /// Acquisition loop status
    #[must_use]
    pub fn location_status(&self) -> AcquisitionStatus {
        self.acquisition
            .as_ref()
            .map_or(self.location_status, AcquisitionHandle::status)
    }

    /// Read-only projection with derived metrics
    #[must_use]
    pub fn view(&self) -> TrackingView {
        self.engine.view()
    }

    /// Hydrate from the snapshot slot at launch
    ///
    /// A Running or Paused session restarts acquisition; a Stopped session is
    /// restored for display only.
    ///
    /// # Errors
    ///
    /// Returns an error if the store cannot be read
    pub async fn restore(&mut self) -> TrackingResult<Restore> {
        let restored = self.snapshots.restore().await?;
        match &restored {
            Restore::Empty => debug!("No session to restore"),
            Restore::Live(snapshot) => {
                info!(
                    session.id = snapshot.session_id.as_deref().unwrap_or("none"),
                    session.status = %snapshot.state.status,
                    path_len = snapshot.state.path.len(),
                    "Restoring live session"
                );
                self.engine = TrackingEngine::from_snapshot(self.engine.clock(), snapshot.clone());
                self.start_acquisition().await;
            }
            Restore::Finished(snapshot) => {
                info!(
                    session.id = snapshot.session_id.as_deref().unwrap_or("none"),
                    "Restoring finished session"
                );
                self.engine = TrackingEngine::from_snapshot(self.engine.clock(), snapshot.clone());
            }
        }
        Ok(restored)
    }

    /// Choose the sport of the next session
    ///
    /// # Errors
    ///
    /// Refused while a session is Running or Paused
    pub fn select_sport(&mut self, sport: SportKind) -> Result<(), InvalidTransition> {
        self.engine.select_sport(sport)
    }

    /// Start a session for `sport`
    ///
    /// A refused location permission is reported in the returned status but
    /// does not block the session; the track simply stays empty.
    ///
    /// # Errors
    ///
    /// Refused while a session is already Running or Paused
    pub async fn start(&mut self, sport: SportKind) -> Result<StartReport, InvalidTransition> {
        self.engine.select_sport(sport)?;
        let local_id = TrackingEngine::generate_session_id(sport, self.engine.now());
        self.engine.start(local_id.clone())?;

        self.start_acquisition().await;

        let (session_id, remote_id) = match self
            .remote
            .create_session(&local_id, sport, self.last_position.as_ref())
            .await
        {
            Ok(server_id) => {
                self.engine.set_session_id(server_id.clone());
                (server_id, true)
            }
            Err(e) => {
                warn!(error = %e, session.id = %local_id, "Remote session create failed, keeping local id");
                (local_id, false)
            }
        };

        TrackingLogger::log_session_started(&session_id, sport, remote_id);
        self.persist().await;

        Ok(StartReport {
            session_id,
            remote_id,
            location: self.location_status(),
        })
    }

    async fn start_acquisition(&mut self) {
        if self
            .acquisition
            .as_ref()
            .is_some_and(AcquisitionHandle::is_running)
        {
            debug!("Location acquisition already running");
            return;
        }
        self.stop_acquisition().await;
        let Some(service) = self.location.clone() else {
            return;
        };
        match AcquisitionLoop::start(service, self.engine.profile(), &self.acquisition_config).await
        {
            Ok(handle) => self.acquisition = Some(handle),
            Err(TrackingError::PermissionDenied) => {
                self.location_status = AcquisitionStatus::PermissionDenied;
            }
            Err(e) => {
                warn!(error = %e, "Location acquisition failed to start");
                self.location_status = AcquisitionStatus::Stopped;
            }
        }
    }

    async fn stop_acquisition(&mut self) {
        if let Some(mut handle) = self.acquisition.take() {
            handle.stop().await;
            while let Some(fix) = handle.try_recv_fix() {
                debug!(timestamp = %fix.timestamp, "Dropping fix buffered at stop");
            }
            self.location_status = AcquisitionStatus::Stopped;
        }
    }

    /// Process one fix in acquisition order
    pub async fn handle_fix(&mut self, fix: &Fix) -> FixOutcome {
        self.last_position = Some(TrackPoint::from(fix));
        let outcome = self.engine.ingest_fix(fix);
        if outcome.is_accepted() {
            self.persist().await;
        }
        outcome
    }

    /// Process every fix the acquisition loop has buffered, without waiting
    pub async fn pump(&mut self) -> usize {
        let mut processed = 0;
        loop {
            let Some(fix) = self.acquisition.as_mut().and_then(AcquisitionHandle::try_recv_fix)
            else {
                break;
            };
            self.handle_fix(&fix).await;
            processed += 1;
        }
        processed
    }

    /// Wait for the next fix from the acquisition loop and process it
    ///
    /// Returns `None` when no loop is running.
    pub async fn next_fix(&mut self) -> Option<FixOutcome> {
        let fix = self.acquisition.as_mut()?.recv_fix().await?;
        Some(self.handle_fix(&fix).await)
    }

    /// Running -> Paused
    ///
    /// # Errors
    ///
    /// Refused unless Running
    pub async fn pause(&mut self) -> Result<(), InvalidTransition> {
        self.engine.pause()?;
        self.persist().await;
        Ok(())
    }

    /// Paused -> Running
    ///
    /// # Errors
    ///
    /// Refused unless Paused
    pub async fn resume(&mut self) -> Result<(), InvalidTransition> {
        self.engine.resume()?;
        self.persist().await;
        Ok(())
    }

    /// Running or Paused -> Stopped; acquisition stops with the session
    ///
    /// # Errors
    ///
    /// Refused unless Running or Paused
    pub async fn stop(&mut self) -> Result<(), InvalidTransition> {
        self.engine.stop()?;
        self.stop_acquisition().await;
        self.persist().await;
        Ok(())
    }

    /// Record a manual split
    ///
    /// # Errors
    ///
    /// Refused unless Running
    pub async fn manual_split(&mut self) -> Result<Split, InvalidTransition> {
        let split = self.engine.manual_split()?;
        self.persist().await;
        Ok(split)
    }

    /// Hand the stopped session to the sync queue, then clear the slot and go Idle
    ///
    /// # Errors
    ///
    /// Refused unless Stopped. Returns a storage error if the session could
    /// neither be delivered nor queued; the stopped session is kept in that case.
    pub async fn finalize(&mut self) -> TrackingResult<SubmitOutcome> {
        let Some(payload) = self.engine.payload() else {
            return Err(InvalidTransition {
                from: self.status(),
                action: SessionAction::Finalize,
            }
            .into());
        };

        let outcome = self.sync.submit(payload).await?;
        if let Err(e) = self.snapshots.clear().await {
            warn!(error = %e, "Failed to clear snapshot after finalize");
        }
        self.engine.reset()?;
        Ok(outcome)
    }

    /// Throw away the current session in any state
    ///
    /// # Errors
    ///
    /// Returns an error if the snapshot slot cannot be cleared
    pub async fn discard(&mut self) -> TrackingResult<()> {
        self.stop_acquisition().await;
        if self.status().is_live() {
            self.engine.stop()?;
        }
        self.engine.reset()?;
        self.snapshots.clear().await?;
        info!("Session discarded");
        Ok(())
    }

    /// Stop background acquisition without touching the session
    pub async fn shutdown(&mut self) {
        self.stop_acquisition().await;
    }

    async fn persist(&self) {
        if let Err(e) = self.snapshots.save(&self.engine.snapshot()).await {
            warn!(error = %e, code = ?e.code(), "Snapshot write failed");
        }
    }
}
