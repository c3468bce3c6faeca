// ABOUTME: Export formats for finished sessions
// ABOUTME: Currently GPX 1.1 track export
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

/// GPX 1.1 writer
pub mod gpx;

pub use gpx::GpxDocument;
