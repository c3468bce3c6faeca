// ABOUTME: Logging configuration and structured logging setup for the tracking engine
// ABOUTME: Configures log levels, formatters, and structured session/sync event helpers
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! Structured logging configuration

use anyhow::Result;
use std::env;
use std::io;
use tracing::{debug, info, warn};
use tracing_subscriber::{
    fmt::{self, format::FmtSpan},
    layer::SubscriberExt,
    util::SubscriberInitExt,
    EnvFilter,
};

use trackline_core::constants::service_names;
use trackline_core::models::{RejectReason, SessionStatus, SportKind};

/// Logging configuration
#[derive(Debug, Clone)]
#[allow(clippy::struct_excessive_bools)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    pub level: String,
    /// Output format (json, pretty, compact)
    pub format: LogFormat,
    /// Include source file and line numbers
    pub include_location: bool,
    /// Include thread information
    pub include_thread: bool,
    /// Include span information for tracing
    pub include_spans: bool,
    /// Write to stderr instead of stdout (keeps CLI output clean)
    pub use_stderr: bool,
    /// Service name for structured logging
    pub service_name: String,
    /// Service version
    pub service_version: String,
    /// Environment (development, staging, production)
    pub environment: String,
}

/// Log output format options
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    /// `JSON` format for production logging
    Json,
    /// Pretty format for development
    Pretty,
    /// Compact format for space-constrained environments
    Compact,
}

impl LogFormat {
    /// Parse from string with fallback to `Pretty`
    #[must_use]
    pub fn from_str_or_default(s: &str) -> Self {
        match s.to_lowercase().as_str() {
            "json" => Self::Json,
            "compact" => Self::Compact,
            _ => Self::Pretty,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".into(),
            format: LogFormat::Pretty,
            include_location: false,
            include_thread: false,
            include_spans: false,
            use_stderr: false,
            service_name: service_names::TRACKLINE.into(),
            service_version: env!("CARGO_PKG_VERSION").to_owned(),
            environment: "development".into(),
        }
    }
}

impl LoggingConfig {
    /// Create logging configuration from environment variables
    #[must_use]
    pub fn from_env() -> Self {
        let level = env::var("RUST_LOG").unwrap_or_else(|_| "info".into());
        let format = LogFormat::from_str_or_default(&env::var("LOG_FORMAT").unwrap_or_default());
        let environment = env::var("ENVIRONMENT").unwrap_or_else(|_| "development".into());

        // In production, use more detailed logging
        let is_production = environment == "production";

        Self {
            level,
            format,
            include_location: is_production || env::var("LOG_INCLUDE_LOCATION").is_ok(),
            include_thread: is_production || env::var("LOG_INCLUDE_THREAD").is_ok(),
            include_spans: is_production || env::var("LOG_INCLUDE_SPANS").is_ok(),
            use_stderr: false,
            service_name: env::var("SERVICE_NAME")
                .unwrap_or_else(|_| service_names::TRACKLINE.into()),
            service_version: env::var("SERVICE_VERSION")
                .unwrap_or_else(|_| env!("CARGO_PKG_VERSION").to_owned()),
            environment,
        }
    }

    /// Send log output to stderr
    #[must_use]
    pub const fn with_stderr(mut self) -> Self {
        self.use_stderr = true;
        self
    }

    fn env_filter(&self) -> EnvFilter {
        env::var("RUST_LOG")
            .map_or_else(
                |_| EnvFilter::new(&self.level),
                |env_directive| EnvFilter::new(&env_directive),
            )
            // Always apply noise reduction regardless of RUST_LOG setting
            .add_directive(
                "hyper=warn"
                    .parse()
                    .unwrap_or_else(|_| tracing::Level::WARN.into()),
            )
            .add_directive(
                "hyper_util=warn"
                    .parse()
                    .unwrap_or_else(|_| tracing::Level::WARN.into()),
            )
            .add_directive(
                "reqwest=warn"
                    .parse()
                    .unwrap_or_else(|_| tracing::Level::WARN.into()),
            )
            .add_directive(
                format!("trackline={}", self.level)
                    .parse()
                    .unwrap_or_else(|_| tracing::Level::INFO.into()),
            )
    }

    /// Initialize the global tracing subscriber
    ///
    /// # Errors
    ///
    /// Returns an error if a global subscriber is already installed
    pub fn init(&self) -> Result<()> {
        let registry = tracing_subscriber::registry().with(self.env_filter());
        let span_events = if self.include_spans {
            FmtSpan::NEW | FmtSpan::CLOSE
        } else {
            FmtSpan::NONE
        };

        let to_stderr = self.use_stderr;

        match self.format {
            LogFormat::Json => {
                let layer = fmt::layer()
                    .with_file(self.include_location)
                    .with_line_number(self.include_location)
                    .with_thread_ids(self.include_thread)
                    .with_thread_names(self.include_thread)
                    .with_target(true)
                    .with_span_events(span_events)
                    .json();
                if to_stderr {
                    registry.with(layer.with_writer(io::stderr)).try_init()?;
                } else {
                    registry.with(layer.with_writer(io::stdout)).try_init()?;
                }
            }
            LogFormat::Pretty => {
                let layer = fmt::layer()
                    .with_file(self.include_location)
                    .with_line_number(self.include_location)
                    .with_thread_ids(self.include_thread)
                    .with_thread_names(self.include_thread)
                    .with_target(true)
                    .with_span_events(span_events);
                if to_stderr {
                    registry.with(layer.with_writer(io::stderr)).try_init()?;
                } else {
                    registry.with(layer.with_writer(io::stdout)).try_init()?;
                }
            }
            LogFormat::Compact => {
                let layer = fmt::layer()
                    .compact()
                    .with_file(false)
                    .with_line_number(false)
                    .with_thread_ids(false)
                    .with_thread_names(false)
                    .with_target(false)
                    .with_span_events(FmtSpan::NONE);
                if to_stderr {
                    registry.with(layer.with_writer(io::stderr)).try_init()?;
                } else {
                    registry.with(layer.with_writer(io::stdout)).try_init()?;
                }
            }
        }

        self.log_startup_info();
        Ok(())
    }

    fn log_startup_info(&self) {
        debug!(
            service.name = %self.service_name,
            service.version = %self.service_version,
            environment = %self.environment,
            log.level = %self.level,
            log.format = ?self.format,
            "Trackline logging initialized"
        );
    }
}

/// Initialize logging from environment
///
/// # Errors
///
/// Returns an error if logging initialization fails
pub fn init_from_env() -> Result<()> {
    LoggingConfig::from_env().init()
}

/// Structured event loggers for the tracking engine
pub struct TrackingLogger;

impl TrackingLogger {
    /// Log a session lifecycle transition
    pub fn log_transition(
        session_id: Option<&str>,
        from: SessionStatus,
        to: SessionStatus,
        distance_m: f64,
    ) {
        info!(
            session.id = session_id.unwrap_or("none"),
            session.from = %from,
            session.to = %to,
            session.distance_m = distance_m,
            "Session transition"
        );
    }

    /// Log a session start with its sport
    pub fn log_session_started(session_id: &str, sport: SportKind, remote_id: bool) {
        info!(
            session.id = %session_id,
            session.sport = %sport,
            session.remote_id = remote_id,
            "Session started"
        );
    }

    /// Log a rejected location sample (a filtering decision, not a fault)
    pub fn log_rejected_sample(reason: RejectReason, accuracy: Option<f64>, distance_m: f64) {
        debug!(
            fix.reject_reason = %reason,
            fix.accuracy = accuracy.unwrap_or(-1.0),
            fix.distance_m = distance_m,
            "Fix rejected"
        );
    }

    /// Log a snapshot write
    pub fn log_snapshot_write(session_id: Option<&str>, status: SessionStatus, path_len: usize) {
        debug!(
            session.id = session_id.unwrap_or("none"),
            session.status = %status,
            snapshot.path_len = path_len,
            "Snapshot written"
        );
    }

    /// Log one sync attempt
    pub fn log_sync_attempt(session_id: &str, retry_count: u32, success: bool, error: Option<&str>) {
        if success {
            info!(
                session.id = %session_id,
                sync.retry_count = retry_count,
                "Session synced"
            );
        } else {
            warn!(
                session.id = %session_id,
                sync.retry_count = retry_count,
                sync.error = error.unwrap_or(""),
                "Session sync failed"
            );
        }
    }

    /// Log a pending item abandoned after exhausting its retries
    pub fn log_sync_abandoned(session_id: &str, retry_count: u32) {
        warn!(
            session.id = %session_id,
            sync.retry_count = retry_count,
            "Pending session dropped after max retries"
        );
    }
}
