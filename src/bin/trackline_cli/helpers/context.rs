// ABOUTME: Wiring of configuration, storage, remote service and sync queue for CLI commands
// ABOUTME: Every command shares one file store under the configured data directory
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use anyhow::{Context, Result};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::info;

use trackline::config::EngineConfig;
use trackline::storage::FileStore;
use trackline::sync::SyncQueue;
use trackline::tracker::Tracker;
use trackline_core::{Clock, SystemClock};
use trackline_remote::HttpSessionService;

/// Shared collaborators of one CLI invocation
pub struct CliContext {
    pub config: EngineConfig,
    pub store: Arc<FileStore>,
    pub remote: Arc<HttpSessionService>,
    pub sync: Arc<SyncQueue>,
}

impl CliContext {
    pub async fn load(data_dir: Option<PathBuf>) -> Result<Self> {
        let mut config = EngineConfig::from_env()?;
        if let Some(dir) = data_dir {
            config.storage.data_dir = dir;
        }

        let store = Arc::new(
            FileStore::open(&config.storage.data_dir)
                .await
                .with_context(|| {
                    format!("Cannot open data directory {}", config.storage.data_dir.display())
                })?,
        );
        info!(data_dir = %config.storage.data_dir.display(), "Using data directory");

        let remote = Arc::new(HttpSessionService::new(config.remote.to_settings()));
        let sync = Arc::new(SyncQueue::new(
            store.clone(),
            remote.clone(),
            Arc::new(SystemClock),
            config.sync,
        ));

        Ok(Self {
            config,
            store,
            remote,
            sync,
        })
    }

    /// Tracker over the shared store, reading time from `clock`
    pub fn tracker(&self, clock: Arc<dyn Clock>) -> Tracker {
        Tracker::new(
            clock,
            self.store.clone(),
            self.remote.clone(),
            self.sync.clone(),
            self.config.acquisition,
        )
    }
}
