// ABOUTME: Session state machine guarding lifecycle transitions
// ABOUTME: Idle -> Running <-> Paused -> Stopped -> Idle, refusals never mutate state
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use chrono::{DateTime, Utc};

use trackline_core::errors::{InvalidTransition, SessionAction};
use trackline_core::models::{SessionStatus, TrackingState};

const fn refuse(state: &TrackingState, action: SessionAction) -> Result<(), InvalidTransition> {
    Err(InvalidTransition {
        from: state.status,
        action,
    })
}

fn close_pause(state: &mut TrackingState, now: DateTime<Utc>) {
    if let Some(paused_at) = state.paused_at.take() {
        state.paused_ms += (now - paused_at).num_milliseconds().max(0);
    }
}

/// Idle or Stopped -> Running
///
/// # Errors
///
/// Returns `InvalidTransition` from Running or Paused
pub fn start(state: &mut TrackingState, now: DateTime<Utc>) -> Result<(), InvalidTransition> {
    match state.status {
        SessionStatus::Idle | SessionStatus::Stopped => {
            state.status = SessionStatus::Running;
            state.started_at = Some(now);
            state.ended_at = None;
            state.paused_at = None;
            state.paused_ms = 0;
            Ok(())
        }
        SessionStatus::Running | SessionStatus::Paused => refuse(state, SessionAction::Start),
    }
}

/// Running -> Paused
///
/// # Errors
///
/// Returns `InvalidTransition` unless Running
pub fn pause(state: &mut TrackingState, now: DateTime<Utc>) -> Result<(), InvalidTransition> {
    if state.status != SessionStatus::Running {
        return refuse(state, SessionAction::Pause);
    }
    state.status = SessionStatus::Paused;
    state.paused_at = Some(now);
    Ok(())
}

/// Paused -> Running
///
/// # Errors
///
/// Returns `InvalidTransition` unless Paused
pub fn resume(state: &mut TrackingState, now: DateTime<Utc>) -> Result<(), InvalidTransition> {
    if state.status != SessionStatus::Paused {
        return refuse(state, SessionAction::Resume);
    }
    close_pause(state, now);
    state.status = SessionStatus::Running;
    Ok(())
}

/// Running or Paused -> Stopped
///
/// # Errors
///
/// Returns `InvalidTransition` unless Running or Paused
pub fn stop(state: &mut TrackingState, now: DateTime<Utc>) -> Result<(), InvalidTransition> {
    if !state.status.is_live() {
        return refuse(state, SessionAction::Stop);
    }
    close_pause(state, now);
    state.status = SessionStatus::Stopped;
    state.ended_at = Some(now);
    Ok(())
}

/// Stopped or Idle -> Idle
///
/// # Errors
///
/// Returns `InvalidTransition` from Running or Paused
pub fn reset(state: &mut TrackingState) -> Result<(), InvalidTransition> {
    if state.status.is_live() {
        return refuse(state, SessionAction::Reset);
    }
    state.status = SessionStatus::Idle;
    state.started_at = None;
    state.ended_at = None;
    state.paused_at = None;
    state.paused_ms = 0;
    Ok(())
}
