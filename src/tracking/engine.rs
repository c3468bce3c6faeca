// ABOUTME: Synchronous tracking engine owning the live TrackingState for one session
// ABOUTME: Routes fixes through filter, elevation and split detection; guards lifecycle transitions
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use uuid::Uuid;

use trackline_core::constants::units::METERS_PER_KM;
use trackline_core::errors::{InvalidTransition, SessionAction};
use trackline_core::models::{
    Fix, RejectReason, SessionPayload, SessionStatus, SportKind, Split, SplitStats, TrackPoint,
    TrackingState, COMPLETED_STATUS,
};
use trackline_core::{profile_for, Clock, SportProfile};

use super::filter::{self, FilterDecision};
use super::{elevation, metrics, session, splits};
use crate::logging::TrackingLogger;
use crate::snapshot::Snapshot;

/// Per-reason counters of filter decisions, not persisted
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct FilterDiagnostics {
    /// Fixes folded into the path
    pub accepted: u64,
    /// Rejected for poor accuracy
    pub accuracy: u64,
    /// Rejected as jitter
    pub jitter: u64,
    /// Rejected as a GPS jump
    pub teleport: u64,
    /// Rejected for a non-advancing timestamp
    pub stale: u64,
    /// Received while not Running
    pub not_running: u64,
}

impl FilterDiagnostics {
    fn record(&mut self, reason: RejectReason) {
        let counter = match reason {
            RejectReason::Accuracy => &mut self.accuracy,
            RejectReason::Jitter => &mut self.jitter,
            RejectReason::Teleport => &mut self.teleport,
            RejectReason::Stale => &mut self.stale,
            RejectReason::NotRunning => &mut self.not_running,
        };
        *counter += 1;
    }

    /// Total rejected fixes
    #[must_use]
    pub const fn rejected(&self) -> u64 {
        self.accuracy + self.jitter + self.teleport + self.stale + self.not_running
    }
}

/// What happened to one ingested fix
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FixOutcome {
    /// The fix extended the path
    Accepted {
        /// Distance added, in meters
        distance_m: f64,
        /// Auto splits emitted by this fix
        new_splits: usize,
    },
    /// The fix was dropped
    Rejected(RejectReason),
}

impl FixOutcome {
    /// Whether the tracking state changed in a way worth persisting
    #[must_use]
    pub const fn is_accepted(&self) -> bool {
        matches!(self, Self::Accepted { .. })
    }
}

/// Read-only projection of the live session with derived metrics
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrackingView {
    /// Session identifier, once started
    pub session_id: Option<String>,
    /// Selected sport
    pub sport: SportKind,
    /// Lifecycle status
    pub status: SessionStatus,
    /// Elapsed duration in milliseconds, pauses included
    pub duration_ms: i64,
    /// Elapsed duration excluding completed pauses
    pub moving_time_ms: i64,
    /// Accumulated distance in meters
    pub distance_m: f64,
    /// Last instantaneous speed in km/h
    pub instant_speed_kmh: f64,
    /// Moving-average speed in km/h
    pub average_speed_kmh: f64,
    /// Maximum speed in km/h
    pub max_speed_kmh: f64,
    /// Elevation gain in meters
    pub elevation_gain_m: f64,
    /// Elevation loss in meters
    pub elevation_loss_m: f64,
    /// Lowest altitude seen
    pub min_altitude_m: Option<f64>,
    /// Highest altitude seen
    pub max_altitude_m: Option<f64>,
    /// Estimated calories
    pub calories: u32,
    /// Estimated steps
    pub steps: u32,
    /// Accepted positions
    pub path_len: usize,
    /// Recorded splits
    pub splits: Vec<Split>,
    /// Auto split statistics
    pub split_stats: Option<SplitStats>,
}

/// Owner of the single live `TrackingState`
///
/// The engine is synchronous; I/O (acquisition, storage, network) happens in
/// the async `Tracker` around it.
pub struct TrackingEngine {
    clock: Arc<dyn Clock>,
    profile: SportProfile,
    session_id: Option<String>,
    state: TrackingState,
    diagnostics: FilterDiagnostics,
}

impl TrackingEngine {
    /// Empty Idle engine with the generic profile
    #[must_use]
    pub fn new(clock: Arc<dyn Clock>) -> Self {
        Self {
            clock,
            profile: SportProfile::default(),
            session_id: None,
            state: TrackingState::new(),
            diagnostics: FilterDiagnostics::default(),
        }
    }

    /// Rebuild an engine from a restored snapshot
    #[must_use]
    pub fn from_snapshot(clock: Arc<dyn Clock>, snapshot: Snapshot) -> Self {
        Self {
            clock,
            profile: snapshot.profile,
            session_id: snapshot.session_id,
            state: snapshot.state,
            diagnostics: FilterDiagnostics::default(),
        }
    }

    /// Locally generated session identifier: `<sport>-<millis>-<uuid>`
    #[must_use]
    pub fn generate_session_id(sport: SportKind, now: DateTime<Utc>) -> String {
        format!("{sport}-{}-{}", now.timestamp_millis(), Uuid::new_v4().simple())
    }

    /// Current time from the engine clock
    #[must_use]
    pub fn now(&self) -> DateTime<Utc> {
        self.clock.now()
    }

    /// Live state
    #[must_use]
    pub const fn state(&self) -> &TrackingState {
        &self.state
    }

    /// Profile in use
    #[must_use]
    pub const fn profile(&self) -> &SportProfile {
        &self.profile
    }

    /// Selected sport
    #[must_use]
    pub const fn sport(&self) -> SportKind {
        self.profile.sport
    }

    /// Session identifier, once started
    #[must_use]
    pub fn session_id(&self) -> Option<&str> {
        self.session_id.as_deref()
    }

    /// Replace the session identifier (server-issued id after creation)
    pub fn set_session_id(&mut self, session_id: String) {
        self.session_id = Some(session_id);
    }

    /// Clock all readings are taken from
    #[must_use]
    pub fn clock(&self) -> Arc<dyn Clock> {
        Arc::clone(&self.clock)
    }

    /// Filter counters since the engine was built or reset
    #[must_use]
    pub const fn diagnostics(&self) -> &FilterDiagnostics {
        &self.diagnostics
    }

    /// Choose the sport (and therefore the profile) of the next session
    ///
    /// # Errors
    ///
    /// Refused while a session is Running or Paused
    pub fn select_sport(&mut self, sport: SportKind) -> Result<(), InvalidTransition> {
        if self.state.status.is_live() {
            return Err(InvalidTransition {
                from: self.state.status,
                action: SessionAction::SelectSport,
            });
        }
        self.profile = profile_for(sport);
        Ok(())
    }

    /// Start a new session; accumulated data of a previous stopped session is discarded
    ///
    /// # Errors
    ///
    /// Refused while Running or Paused
    pub fn start(&mut self, session_id: String) -> Result<(), InvalidTransition> {
        if self.state.status.is_live() {
            return Err(InvalidTransition {
                from: self.state.status,
                action: SessionAction::Start,
            });
        }
        let from = self.state.status;
        let mut fresh = TrackingState::new();
        session::start(&mut fresh, self.now())?;
        self.state = fresh;
        self.session_id = Some(session_id);
        self.diagnostics = FilterDiagnostics::default();
        TrackingLogger::log_transition(self.session_id(), from, SessionStatus::Running, 0.0);
        Ok(())
    }

    /// Running -> Paused
    ///
    /// # Errors
    ///
    /// Refused unless Running
    pub fn pause(&mut self) -> Result<(), InvalidTransition> {
        let now = self.now();
        self.transition(|state| session::pause(state, now))
    }

    /// Paused -> Running
    ///
    /// # Errors
    ///
    /// Refused unless Paused
    pub fn resume(&mut self) -> Result<(), InvalidTransition> {
        let now = self.now();
        self.transition(|state| session::resume(state, now))
    }

    /// Running or Paused -> Stopped
    ///
    /// # Errors
    ///
    /// Refused unless Running or Paused
    pub fn stop(&mut self) -> Result<(), InvalidTransition> {
        let now = self.now();
        self.transition(|state| session::stop(state, now))
    }

    /// Stopped or Idle -> Idle, clearing all session data
    ///
    /// # Errors
    ///
    /// Refused while Running or Paused
    pub fn reset(&mut self) -> Result<(), InvalidTransition> {
        self.transition(session::reset)?;
        self.state = TrackingState::new();
        self.session_id = None;
        self.diagnostics = FilterDiagnostics::default();
        Ok(())
    }

    fn transition(
        &mut self,
        apply: impl FnOnce(&mut TrackingState) -> Result<(), InvalidTransition>,
    ) -> Result<(), InvalidTransition> {
        let from = self.state.status;
        apply(&mut self.state)?;
        TrackingLogger::log_transition(
            self.session_id(),
            from,
            self.state.status,
            self.state.total_distance_m,
        );
        Ok(())
    }

    /// Feed one fix from the acquisition loop
    pub fn ingest_fix(&mut self, fix: &Fix) -> FixOutcome {
        match self.state.status {
            SessionStatus::Running => self.ingest_running(fix),
            SessionStatus::Paused => {
                self.track_reference_while_paused(fix);
                self.reject(RejectReason::NotRunning, fix, 0.0)
            }
            SessionStatus::Idle | SessionStatus::Stopped => {
                self.reject(RejectReason::NotRunning, fix, 0.0)
            }
        }
    }

    fn ingest_running(&mut self, fix: &Fix) -> FixOutcome {
        match filter::evaluate(&self.profile, self.state.reference_point.as_ref(), fix) {
            FilterDecision::Reject(reason) => {
                let distance = self
                    .state
                    .reference_point
                    .as_ref()
                    .map_or(0.0, |reference| fix.distance_to(reference));
                self.reject(reason, fix, distance)
            }
            FilterDecision::Accept(sample) => {
                filter::accumulate(&mut self.state, &self.profile, fix, sample);
                if let Some(altitude) = fix.altitude {
                    elevation::record_altitude(&mut self.state, altitude);
                }
                let now = self.now();
                let elapsed = self.state.duration_ms(now);
                let new_splits = splits::detect_auto_splits(&mut self.state, elapsed, now);
                self.diagnostics.accepted += 1;
                FixOutcome::Accepted {
                    distance_m: sample.distance_m,
                    new_splits,
                }
            }
        }
    }

    /// Movement while paused must not count after resume
    ///
    /// Only an existing reference is moved; before the first accepted fix
    /// there is nothing to measure from, and the first fix after resume is
    /// accepted unconditionally.
    fn track_reference_while_paused(&mut self, fix: &Fix) {
        let Some(reference) = self.state.reference_point.as_ref() else {
            return;
        };
        let accurate = fix
            .accuracy
            .is_none_or(|accuracy| accuracy <= self.profile.accuracy_threshold_m);
        if accurate && fix.timestamp > reference.timestamp {
            self.state.reference_point = Some(TrackPoint::from(fix));
        }
    }

    fn reject(&mut self, reason: RejectReason, fix: &Fix, distance_m: f64) -> FixOutcome {
        self.diagnostics.record(reason);
        TrackingLogger::log_rejected_sample(reason, fix.accuracy, distance_m);
        FixOutcome::Rejected(reason)
    }

    /// Record a manual split
    ///
    /// # Errors
    ///
    /// Refused unless Running
    pub fn manual_split(&mut self) -> Result<Split, InvalidTransition> {
        if self.state.status != SessionStatus::Running {
            return Err(InvalidTransition {
                from: self.state.status,
                action: SessionAction::ManualSplit,
            });
        }
        let now = self.now();
        let elapsed = self.state.duration_ms(now);
        Ok(splits::manual_split(&mut self.state, elapsed, now))
    }

    /// Elapsed session duration in milliseconds
    #[must_use]
    pub fn duration_ms(&self) -> i64 {
        self.state.duration_ms(self.now())
    }

    /// Elapsed duration excluding completed pauses
    #[must_use]
    pub fn moving_time_ms(&self) -> i64 {
        self.state.moving_time_ms(self.now())
    }

    /// Calorie estimate for the distance so far
    #[must_use]
    pub fn calories(&self) -> u32 {
        metrics::calories(
            self.state.total_distance_m,
            self.sport(),
            self.state.instant_speed_kmh,
        )
    }

    /// Step estimate for the distance so far
    #[must_use]
    pub fn steps(&self) -> u32 {
        metrics::steps(self.state.total_distance_m, self.sport())
    }

    /// Read-only projection with derived metrics
    #[must_use]
    pub fn view(&self) -> TrackingView {
        let state = &self.state;
        TrackingView {
            session_id: self.session_id.clone(),
            sport: self.sport(),
            status: state.status,
            duration_ms: self.duration_ms(),
            moving_time_ms: self.moving_time_ms(),
            distance_m: state.total_distance_m,
            instant_speed_kmh: state.instant_speed_kmh,
            average_speed_kmh: state.moving_average_speed_kmh(),
            max_speed_kmh: state.max_speed_kmh,
            elevation_gain_m: state.elevation_gain_m,
            elevation_loss_m: state.elevation_loss_m,
            min_altitude_m: state.min_altitude_m,
            max_altitude_m: state.max_altitude_m,
            calories: self.calories(),
            steps: self.steps(),
            path_len: state.path.len(),
            splits: state.splits.clone(),
            split_stats: SplitStats::from_splits(&state.splits),
        }
    }

    /// Finalized payload of a stopped session
    #[must_use]
    pub fn payload(&self) -> Option<SessionPayload> {
        if self.state.status != SessionStatus::Stopped {
            return None;
        }
        let session_id = self.session_id.clone()?;
        let state = &self.state;
        Some(SessionPayload {
            session_id,
            sport: self.sport(),
            distance: state.total_distance_m / METERS_PER_KM,
            duration: self.duration_ms(),
            calories: self.calories(),
            avg_speed: state.moving_average_speed_kmh(),
            max_speed: state.max_speed_kmh,
            steps: self.steps(),
            elevation_gain: state.elevation_gain_m,
            elevation_loss: state.elevation_loss_m,
            min_altitude: state.min_altitude_m,
            max_altitude: state.max_altitude_m,
            tracking_path: state.path.clone(),
            splits: state.splits.clone(),
            started_at: state.started_at,
            ended_at: state.ended_at,
            status: COMPLETED_STATUS.to_owned(),
        })
    }

    /// Full serializable copy for crash recovery
    #[must_use]
    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            session_id: self.session_id.clone(),
            profile: self.profile.clone(),
            state: self.state.clone(),
            saved_at: self.now(),
        }
    }
}
