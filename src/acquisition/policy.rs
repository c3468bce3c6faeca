// ABOUTME: Adaptive polling policy of the location acquisition loop
// ABOUTME: Pure state: interval shrinks on fixes, grows after sustained timeouts, duplicates are dropped
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use chrono::{DateTime, Utc};
use std::time::Duration;

use trackline_core::SportProfile;

use crate::config::AcquisitionConfig;

/// What the loop should do with a fix it just received
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FixVerdict {
    /// New fix, forward it downstream
    Emit,
    /// Same or older timestamp than the previous fix: a cached platform result
    Duplicate,
}

/// Backoff and recovery state of one acquisition loop
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PollState {
    min_interval: Duration,
    max_interval: Duration,
    step: Duration,
    threshold: u32,
    allow_slow_polling: bool,
    current_interval: Duration,
    consecutive_timeouts: u32,
    last_fix_at: Option<DateTime<Utc>>,
}

impl PollState {
    /// Initial state at `min_poll_interval`
    #[must_use]
    pub fn new(profile: &SportProfile, config: &AcquisitionConfig) -> Self {
        let min_interval = Duration::from_millis(profile.min_poll_interval_ms);
        Self {
            min_interval,
            max_interval: Duration::from_millis(profile.max_poll_interval_ms).max(min_interval),
            step: config.interval_step,
            threshold: config.slow_polling_threshold,
            allow_slow_polling: profile.allow_slow_polling,
            current_interval: min_interval,
            consecutive_timeouts: 0,
            last_fix_at: None,
        }
    }

    /// Wait before the next request
    #[must_use]
    pub const fn current_interval(&self) -> Duration {
        self.current_interval
    }

    /// Failures since the last emitted fix
    #[must_use]
    pub const fn consecutive_timeouts(&self) -> u32 {
        self.consecutive_timeouts
    }

    /// Whether failures have lasted long enough to report the loop inactive
    #[must_use]
    pub const fn is_inactive(&self) -> bool {
        self.consecutive_timeouts >= self.threshold
    }

    /// A fix arrived
    pub fn on_fix(&mut self, timestamp: DateTime<Utc>) -> FixVerdict {
        if self.last_fix_at.is_some_and(|last| timestamp <= last) {
            return FixVerdict::Duplicate;
        }
        self.last_fix_at = Some(timestamp);
        self.consecutive_timeouts = 0;
        if self.current_interval > self.min_interval {
            self.current_interval = self
                .current_interval
                .saturating_sub(self.step)
                .max(self.min_interval);
        }
        FixVerdict::Emit
    }

    /// A request timed out or failed
    pub fn on_failure(&mut self) {
        self.consecutive_timeouts = self.consecutive_timeouts.saturating_add(1);
        if self.is_inactive()
            && self.allow_slow_polling
            && self.current_interval < self.max_interval
        {
            self.current_interval = (self.current_interval + self.step).min(self.max_interval);
        }
    }
}
