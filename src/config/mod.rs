// ABOUTME: Configuration management module for engine settings
// ABOUTME: Environment-driven remote, storage, sync and acquisition configuration
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! Configuration module
//!
//! Compile-time defaults live in `trackline_core::constants`; this module
//! overlays them with environment variables. Sport profiles are not
//! configurable at runtime and come from `trackline_core::config`.

/// Environment-based engine configuration
pub mod environment;

pub use environment::{
    AcquisitionConfig, EngineConfig, Environment, RemoteConfig, StorageConfig, SyncPolicy,
};
