// ABOUTME: Command modules for the trackline CLI
// ABOUTME: Replay of recorded fixes and management of the stored session
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

pub mod replay;
pub mod session;
