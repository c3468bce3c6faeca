// ABOUTME: Error types for calls to the remote session service
// ABOUTME: Classifies network, timeout and HTTP status failures for retry decisions
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use thiserror::Error;

/// Failure of a create/finalize call against the remote session service
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RemoteError {
    /// Connection could not be established or was dropped
    #[error("network error: {0}")]
    Network(String),

    /// The call exceeded its timeout
    #[error("request timed out after {timeout_secs}s")]
    Timeout {
        /// Timeout that was exceeded
        timeout_secs: u64,
    },

    /// The server answered with a non-success status
    #[error("server returned HTTP {status}")]
    Status {
        /// HTTP status code
        status: u16,
    },

    /// The server answered but the body was not understood
    #[error("invalid response: {0}")]
    InvalidResponse(String),
}

impl RemoteError {
    /// Whether a later retry may succeed
    ///
    /// Client errors other than 408/429 are permanent; everything else is
    /// worth another attempt.
    #[must_use]
    pub const fn is_retryable(&self) -> bool {
        match self {
            Self::Network(_) | Self::Timeout { .. } => true,
            Self::Status { status } => *status >= 500 || *status == 408 || *status == 429,
            Self::InvalidResponse(_) => false,
        }
    }
}
