// ABOUTME: Remote session service contract and reqwest-backed implementation
// ABOUTME: Creates sessions at start and delivers finalized payloads at the end
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! Remote session service.
//!
//! The engine needs exactly two calls from the backend: create a session when
//! tracking starts and deliver the finalized payload when it ends. Both are
//! behind the [`RemoteSessionService`] trait so the tracker and sync queue can
//! be driven by scripted doubles in tests.

/// Shared HTTP client with timeout configuration
pub mod http_client;
/// HTTP implementation of the session service
pub mod sessions;

pub use http_client::{create_client_with_timeout, shared_client};
pub use sessions::{HttpSessionService, RemoteSettings};

use async_trait::async_trait;
use trackline_core::errors::RemoteError;
use trackline_core::models::{SessionPayload, SportKind, TrackPoint};

/// Contract with the remote session backend
#[async_trait]
pub trait RemoteSessionService: Send + Sync {
    /// Register a new session and return the server-issued identifier
    ///
    /// # Errors
    ///
    /// Returns `RemoteError` on network failure, timeout, non-success status
    /// or a response without an identifier.
    async fn create_session(
        &self,
        local_id: &str,
        sport: SportKind,
        initial_position: Option<&TrackPoint>,
    ) -> Result<String, RemoteError>;

    /// Deliver a finalized session
    ///
    /// # Errors
    ///
    /// Returns `RemoteError` on network failure, timeout or non-success status.
    async fn finalize_session(
        &self,
        session_id: &str,
        payload: &SessionPayload,
    ) -> Result<(), RemoteError>;
}
