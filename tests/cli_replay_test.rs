// ABOUTME: End-to-end tests of the trackline binary against a temporary data directory
// ABOUTME: Replay refuses to overwrite a stored session until it is finalized or discarded
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
#![allow(missing_docs)]

mod common;

use anyhow::Result;
use std::path::Path;
use std::process::{Command, Output};

use common::fix_north;

/// Run the CLI against `data_dir` with an unreachable server
fn trackline(data_dir: &Path, args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_trackline"))
        .arg("--data-dir")
        .arg(data_dir)
        .args(args)
        .env("TRACKLINE_API_URL", "http://127.0.0.1:9")
        .env("TRACKLINE_HTTP_TIMEOUT_SECS", "2")
        .env("TRACKLINE_HTTP_CONNECT_TIMEOUT_SECS", "1")
        .env_remove("TRACKLINE_DATA_DIR")
        .output()
        .unwrap()
}

fn write_fixes(path: &Path) -> Result<()> {
    let lines = (0..4)
        .map(|i| serde_json::to_string(&fix_north(20.0 * f64::from(i), 10 * i64::from(i))))
        .collect::<Result<Vec<_>, _>>()?;
    std::fs::write(path, lines.join("\n"))?;
    Ok(())
}

#[test]
fn test_replay_refuses_stopped_session_until_finalized() -> Result<()> {
    let dir = tempfile::tempdir()?;
    let data_dir = dir.path().join("data");
    let fixes = dir.path().join("fixes.jsonl");
    write_fixes(&fixes)?;
    let fixes = fixes.to_str().unwrap();

    let first = trackline(&data_dir, &["replay", fixes]);
    assert!(first.status.success(), "{}", String::from_utf8_lossy(&first.stderr));

    let second = trackline(&data_dir, &["replay", fixes]);
    assert!(!second.status.success());
    assert!(String::from_utf8_lossy(&second.stderr).contains("not finalized"));

    let finalized = trackline(&data_dir, &["finalize"]);
    assert!(finalized.status.success(), "{}", String::from_utf8_lossy(&finalized.stderr));
    assert!(String::from_utf8_lossy(&finalized.stdout).contains("queued for retry"));

    let third = trackline(&data_dir, &["replay", fixes]);
    assert!(third.status.success(), "{}", String::from_utf8_lossy(&third.stderr));
    Ok(())
}

#[test]
fn test_finalize_without_stored_session_fails() -> Result<()> {
    let dir = tempfile::tempdir()?;

    let output = trackline(dir.path(), &["finalize"]);

    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("No stored session"));
    Ok(())
}
