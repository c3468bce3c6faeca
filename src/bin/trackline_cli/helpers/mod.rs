// ABOUTME: Helper modules for the trackline CLI
// ABOUTME: Engine wiring and output formatting
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

pub mod context;
pub mod display;
