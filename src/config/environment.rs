// ABOUTME: Environment configuration management for deployment-specific settings
// ABOUTME: Parses TRACKLINE_* variables into typed remote, storage, sync and acquisition configs
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! Environment-based configuration

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::env;
use std::path::PathBuf;
use std::time::Duration;
use tracing::info;

use trackline_core::constants::{acquisition, remote, service_names, sync};
use trackline_remote::RemoteSettings;

/// Environment type
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    #[default]
    Development,
    Production,
    Testing,
}

impl Environment {
    /// Parse from string with fallback
    #[must_use]
    pub fn from_str_or_default(s: &str) -> Self {
        match s.to_lowercase().as_str() {
            "production" | "prod" => Self::Production,
            "testing" | "test" => Self::Testing,
            _ => Self::Development,
        }
    }

    /// Check if this is a production environment
    #[must_use]
    pub const fn is_production(&self) -> bool {
        matches!(self, Self::Production)
    }
}

impl std::fmt::Display for Environment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Development => write!(f, "development"),
            Self::Production => write!(f, "production"),
            Self::Testing => write!(f, "testing"),
        }
    }
}

/// Remote session service connection settings
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemoteConfig {
    /// API base URL
    pub api_url: String,
    /// Optional bearer token
    pub api_token: Option<String>,
    /// Request timeout in seconds
    pub timeout_secs: u64,
    /// Connection timeout in seconds
    pub connect_timeout_secs: u64,
}

impl Default for RemoteConfig {
    fn default() -> Self {
        Self {
            api_url: remote::DEFAULT_API_URL.to_owned(),
            api_token: None,
            timeout_secs: remote::DEFAULT_TIMEOUT_SECS,
            connect_timeout_secs: remote::DEFAULT_CONNECT_TIMEOUT_SECS,
        }
    }
}

impl RemoteConfig {
    /// Settings for the HTTP session service
    #[must_use]
    pub fn to_settings(&self) -> RemoteSettings {
        RemoteSettings {
            base_url: self.api_url.clone(),
            api_token: self.api_token.clone(),
            timeout_secs: self.timeout_secs,
            connect_timeout_secs: self.connect_timeout_secs,
        }
    }
}

/// Local durable storage settings
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StorageConfig {
    /// Directory holding the snapshot slot and the sync queue
    pub data_dir: PathBuf,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
        }
    }
}

/// Retry policy of the sync queue
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SyncPolicy {
    /// Failed retries after which an item is dropped
    pub max_retries: u32,
    /// Wait between two items of one flush pass
    pub item_delay: Duration,
    /// Periodic re-check interval of the background worker
    pub check_interval: Duration,
    /// Backoff after the first failed retry
    pub backoff_base: Duration,
    /// Backoff upper bound
    pub backoff_cap: Duration,
}

impl Default for SyncPolicy {
    fn default() -> Self {
        Self {
            max_retries: sync::MAX_RETRIES,
            item_delay: Duration::from_millis(sync::ITEM_DELAY_MS),
            check_interval: Duration::from_secs(sync::CHECK_INTERVAL_SECS),
            backoff_base: Duration::from_secs(sync::BACKOFF_BASE_SECS),
            backoff_cap: Duration::from_secs(sync::BACKOFF_CAP_SECS),
        }
    }
}

impl SyncPolicy {
    /// Policy without delays or backoff, for tests and one-shot CLI flushes
    #[must_use]
    pub fn immediate() -> Self {
        Self {
            item_delay: Duration::ZERO,
            backoff_base: Duration::ZERO,
            backoff_cap: Duration::ZERO,
            ..Self::default()
        }
    }

    /// Wait required after the `retry_count`-th failed retry
    ///
    /// `base * 2^(retry_count - 1)`, capped; zero before any failed retry.
    #[must_use]
    pub fn backoff_for(&self, retry_count: u32) -> Duration {
        if retry_count == 0 {
            return Duration::ZERO;
        }
        let factor = 1_u32.checked_shl(retry_count - 1).unwrap_or(u32::MAX);
        self.backoff_base
            .checked_mul(factor)
            .map_or(self.backoff_cap, |backoff| backoff.min(self.backoff_cap))
    }
}

/// Location acquisition loop tuning
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AcquisitionConfig {
    /// Ceiling for one fix request
    pub fix_timeout: Duration,
    /// Step by which the polling interval moves
    pub interval_step: Duration,
    /// Consecutive failures before slowing down and reporting inactivity
    pub slow_polling_threshold: u32,
}

impl Default for AcquisitionConfig {
    fn default() -> Self {
        Self {
            fix_timeout: Duration::from_millis(acquisition::FIX_REQUEST_TIMEOUT_MS),
            interval_step: Duration::from_millis(acquisition::INTERVAL_STEP_MS),
            slow_polling_threshold: acquisition::SLOW_POLLING_THRESHOLD,
        }
    }
}

/// Complete engine configuration
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct EngineConfig {
    /// Deployment environment
    pub environment: Environment,
    /// Remote session service
    pub remote: RemoteConfig,
    /// Durable storage
    pub storage: StorageConfig,
    /// Sync queue retry policy
    pub sync: SyncPolicy,
    /// Acquisition loop tuning
    pub acquisition: AcquisitionConfig,
}

impl EngineConfig {
    /// Load configuration from environment variables
    ///
    /// # Errors
    ///
    /// Returns an error if a numeric variable cannot be parsed or the
    /// resulting configuration is invalid
    pub fn from_env() -> Result<Self> {
        let defaults = Self::default();

        let config = Self {
            environment: Environment::from_str_or_default(&env_var_or("ENVIRONMENT", "development")),
            remote: RemoteConfig {
                api_url: env_var_or("TRACKLINE_API_URL", remote::DEFAULT_API_URL),
                api_token: env::var("TRACKLINE_API_TOKEN").ok().filter(|t| !t.is_empty()),
                timeout_secs: env_var_or(
                    "TRACKLINE_HTTP_TIMEOUT_SECS",
                    &remote::DEFAULT_TIMEOUT_SECS.to_string(),
                )
                .parse()
                .context("Invalid TRACKLINE_HTTP_TIMEOUT_SECS value")?,
                connect_timeout_secs: env_var_or(
                    "TRACKLINE_HTTP_CONNECT_TIMEOUT_SECS",
                    &remote::DEFAULT_CONNECT_TIMEOUT_SECS.to_string(),
                )
                .parse()
                .context("Invalid TRACKLINE_HTTP_CONNECT_TIMEOUT_SECS value")?,
            },
            storage: StorageConfig {
                data_dir: env::var("TRACKLINE_DATA_DIR")
                    .map_or_else(|_| default_data_dir(), PathBuf::from),
            },
            sync: SyncPolicy {
                check_interval: Duration::from_secs(
                    env_var_or(
                        "TRACKLINE_SYNC_INTERVAL_SECS",
                        &sync::CHECK_INTERVAL_SECS.to_string(),
                    )
                    .parse()
                    .context("Invalid TRACKLINE_SYNC_INTERVAL_SECS value")?,
                ),
                ..defaults.sync
            },
            acquisition: defaults.acquisition,
        };

        config.validate()?;
        info!(
            environment = %config.environment,
            api_url = %config.remote.api_url,
            data_dir = %config.storage.data_dir.display(),
            "Configuration loaded"
        );
        Ok(config)
    }

    /// Validate configuration values
    ///
    /// # Errors
    ///
    /// Returns an error when a timeout or interval is zero or the API URL is
    /// not an http(s) URL
    pub fn validate(&self) -> Result<()> {
        if self.remote.timeout_secs == 0 {
            return Err(anyhow::anyhow!("TRACKLINE_HTTP_TIMEOUT_SECS must be positive"));
        }
        if !(self.remote.api_url.starts_with("http://") || self.remote.api_url.starts_with("https://"))
        {
            return Err(anyhow::anyhow!(
                "TRACKLINE_API_URL must start with http:// or https://"
            ));
        }
        if self.sync.check_interval.is_zero() {
            return Err(anyhow::anyhow!("TRACKLINE_SYNC_INTERVAL_SECS must be positive"));
        }
        if self.sync.max_retries == 0 {
            return Err(anyhow::anyhow!("sync max_retries must be at least 1"));
        }
        Ok(())
    }

    /// Get a summary of the configuration for display (without secrets)
    #[must_use]
    pub fn summary(&self) -> String {
        format!(
            "Trackline Configuration:\n\
             - Environment: {}\n\
             - API URL: {}\n\
             - API Token: {}\n\
             - Data Dir: {}\n\
             - Sync Interval: {}s\n\
             - Max Retries: {}",
            self.environment,
            self.remote.api_url,
            if self.remote.api_token.is_some() {
                "Set"
            } else {
                "Not set"
            },
            self.storage.data_dir.display(),
            self.sync.check_interval.as_secs(),
            self.sync.max_retries,
        )
    }
}

/// Get environment variable or default value
fn env_var_or(key: &str, default: &str) -> String {
    env::var(key).unwrap_or_else(|_| default.to_owned())
}

fn default_data_dir() -> PathBuf {
    dirs::data_local_dir()
        .unwrap_or_else(env::temp_dir)
        .join(service_names::TRACKLINE)
}
