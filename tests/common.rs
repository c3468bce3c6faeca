// ABOUTME: Shared test utilities and setup functions for integration tests
// ABOUTME: Provides quiet logging, synthetic fix builders and scripted location/remote services
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence
#![allow(
    dead_code,
    clippy::missing_errors_doc,
    clippy::missing_panics_doc,
    clippy::must_use_candidate,
    clippy::unwrap_used,
    clippy::expect_used
)]
//! Shared test utilities for `trackline`

use async_trait::async_trait;
use chrono::{DateTime, Duration as ChronoDuration, TimeZone, Utc};
use std::collections::VecDeque;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, Once};
use std::time::Duration;

use trackline::acquisition::{LocationService, PermissionStatus};
use trackline::config::SyncPolicy;
use trackline::storage::InMemoryStore;
use trackline::sync::SyncQueue;
use trackline_core::errors::{RemoteError, TrackingError, TrackingResult};
use trackline_core::geo::meters_to_latitude_degrees;
use trackline_core::models::{Fix, SessionPayload, SportKind, TrackPoint};
use trackline_core::ManualClock;
use trackline_remote::RemoteSessionService;

static INIT_LOGGER: Once = Once::new();

/// Initialize quiet logging for tests (call once per test process)
pub fn init_test_logging() {
    INIT_LOGGER.call_once(|| {
        // TEST_LOG raises the level when debugging a failing test
        let log_level = match std::env::var("TEST_LOG").as_deref() {
            Ok("TRACE") => tracing::Level::TRACE,
            Ok("DEBUG") => tracing::Level::DEBUG,
            Ok("INFO") => tracing::Level::INFO,
            Ok("WARN" | "ERROR") | _ => tracing::Level::WARN,
        };

        tracing_subscriber::fmt()
            .with_max_level(log_level)
            .with_test_writer()
            .init();
    });
}

/// Latitude of the synthetic tracks
pub const BASE_LAT: f64 = -21.0;
/// Longitude of the synthetic tracks
pub const BASE_LON: f64 = 55.5;

/// Fixed start instant for deterministic sessions
pub fn t0() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 6, 1, 7, 0, 0).unwrap()
}

/// Manual clock frozen at [`t0`]
pub fn manual_clock() -> Arc<ManualClock> {
    Arc::new(ManualClock::new(t0()))
}

/// Fix `meters_north` of the base point, `secs` after [`t0`], with good accuracy
pub fn fix_north(meters_north: f64, secs: i64) -> Fix {
    Fix::new(
        BASE_LAT + meters_to_latitude_degrees(meters_north),
        BASE_LON,
        t0() + ChronoDuration::seconds(secs),
    )
    .with_accuracy(5.0)
}

/// Track point at the base position
pub fn base_point() -> TrackPoint {
    TrackPoint {
        latitude: BASE_LAT,
        longitude: BASE_LON,
        altitude: None,
        timestamp: t0(),
    }
}

/// Minimal finished payload
pub fn sample_payload(session_id: &str) -> SessionPayload {
    SessionPayload {
        session_id: session_id.to_owned(),
        sport: SportKind::Running,
        distance: 5.0,
        duration: 1_800_000,
        calories: 310,
        avg_speed: 10.0,
        max_speed: 14.2,
        steps: 6500,
        elevation_gain: 42.0,
        elevation_loss: 40.0,
        min_altitude: Some(10.0),
        max_altitude: Some(52.0),
        tracking_path: vec![base_point()],
        splits: Vec::new(),
        started_at: Some(t0()),
        ended_at: Some(t0() + ChronoDuration::minutes(30)),
        status: "completed".to_owned(),
    }
}

/// One scripted answer of the location service
#[derive(Debug, Clone)]
pub enum FixScript {
    /// Answer with this fix
    Fix(Fix),
    /// Fail immediately
    Fail,
    /// Never answer (the loop's own timeout fires)
    Hang,
}

/// Location service answering from a script; hangs once the script is exhausted
pub struct ScriptedLocationService {
    permission: PermissionStatus,
    script: Mutex<VecDeque<FixScript>>,
    requests: AtomicUsize,
    permission_requests: AtomicUsize,
}

impl ScriptedLocationService {
    pub fn new(script: Vec<FixScript>) -> Self {
        Self {
            permission: PermissionStatus::Granted,
            script: Mutex::new(script.into()),
            requests: AtomicUsize::new(0),
            permission_requests: AtomicUsize::new(0),
        }
    }

    pub fn denied() -> Self {
        Self {
            permission: PermissionStatus::Denied,
            ..Self::new(Vec::new())
        }
    }

    /// Fix requests issued so far
    pub fn requests(&self) -> usize {
        self.requests.load(Ordering::SeqCst)
    }

    /// Permission prompts shown so far
    pub fn permission_requests(&self) -> usize {
        self.permission_requests.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl LocationService for ScriptedLocationService {
    async fn request_permission(&self) -> PermissionStatus {
        self.permission_requests.fetch_add(1, Ordering::SeqCst);
        self.permission
    }

    async fn get_fix(&self, _timeout: Duration) -> TrackingResult<Fix> {
        self.requests.fetch_add(1, Ordering::SeqCst);
        let next = self.script.lock().unwrap().pop_front();
        match next {
            Some(FixScript::Fix(fix)) => Ok(fix),
            Some(FixScript::Fail) => Err(TrackingError::LocationUnavailable("scripted".into())),
            Some(FixScript::Hang) | None => std::future::pending().await,
        }
    }
}

/// Remote service that is either reachable or not, recording every call
pub struct ScriptedRemoteService {
    online: AtomicBool,
    create_calls: AtomicUsize,
    finalized: Mutex<Vec<SessionPayload>>,
    finalize_attempts: AtomicUsize,
}

impl ScriptedRemoteService {
    pub fn online() -> Self {
        Self {
            online: AtomicBool::new(true),
            create_calls: AtomicUsize::new(0),
            finalized: Mutex::new(Vec::new()),
            finalize_attempts: AtomicUsize::new(0),
        }
    }

    pub fn offline() -> Self {
        let service = Self::online();
        service.set_online(false);
        service
    }

    pub fn set_online(&self, online: bool) {
        self.online.store(online, Ordering::SeqCst);
    }

    pub fn create_calls(&self) -> usize {
        self.create_calls.load(Ordering::SeqCst)
    }

    /// Every finalize call, successful or not
    pub fn finalize_attempts(&self) -> usize {
        self.finalize_attempts.load(Ordering::SeqCst)
    }

    /// Payloads the server accepted
    pub fn finalized(&self) -> Vec<SessionPayload> {
        self.finalized.lock().unwrap().clone()
    }

    fn check_online(&self) -> Result<(), RemoteError> {
        if self.online.load(Ordering::SeqCst) {
            Ok(())
        } else {
            Err(RemoteError::Network("connection refused".into()))
        }
    }
}

#[async_trait]
impl RemoteSessionService for ScriptedRemoteService {
    async fn create_session(
        &self,
        local_id: &str,
        _sport: SportKind,
        _initial_position: Option<&TrackPoint>,
    ) -> Result<String, RemoteError> {
        let n = self.create_calls.fetch_add(1, Ordering::SeqCst) + 1;
        self.check_online()?;
        Ok(format!("srv-{n}-{local_id}"))
    }

    async fn finalize_session(
        &self,
        _session_id: &str,
        payload: &SessionPayload,
    ) -> Result<(), RemoteError> {
        self.finalize_attempts.fetch_add(1, Ordering::SeqCst);
        self.check_online()?;
        self.finalized.lock().unwrap().push(payload.clone());
        Ok(())
    }
}

/// Sync queue over an in-memory store and a scripted remote
pub fn sync_queue(
    store: &InMemoryStore,
    remote: &Arc<ScriptedRemoteService>,
    clock: &Arc<ManualClock>,
    policy: SyncPolicy,
) -> Arc<SyncQueue> {
    Arc::new(SyncQueue::new(
        Arc::new(store.clone()),
        remote.clone(),
        clock.clone(),
        policy,
    ))
}
