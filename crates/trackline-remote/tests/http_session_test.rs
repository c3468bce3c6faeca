// ABOUTME: Integration tests for the HTTP session service against a canned local server
// ABOUTME: Verifies request shape, server id extraction and error classification
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]

use chrono::{TimeZone, Utc};
use serde_json::Value;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;
use tokio::sync::oneshot;

use trackline_core::errors::RemoteError;
use trackline_core::models::{SessionPayload, SportKind, TrackPoint, COMPLETED_STATUS};
use trackline_remote::{HttpSessionService, RemoteSessionService, RemoteSettings};

struct Captured {
    head: String,
    body: Value,
}

/// Serve exactly one request with the given status line and JSON body
async fn serve_once(
    status: &'static str,
    body: &'static str,
) -> (String, oneshot::Receiver<Captured>) {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let base_url = format!("http://{}", listener.local_addr().unwrap());
    let (tx, rx) = oneshot::channel();

    tokio::spawn(async move {
        let (mut socket, _) = listener.accept().await.unwrap();
        let mut buffer = Vec::new();
        let mut chunk = [0_u8; 4096];
        let (head, body_start) = loop {
            let read = socket.read(&mut chunk).await.unwrap();
            buffer.extend_from_slice(&chunk[..read]);
            if let Some(pos) = buffer.windows(4).position(|w| w == b"\r\n\r\n") {
                break (String::from_utf8_lossy(&buffer[..pos]).to_string(), pos + 4);
            }
        };
        let content_length = head
            .lines()
            .find_map(|line| {
                let (name, value) = line.split_once(':')?;
                name.eq_ignore_ascii_case("content-length")
                    .then(|| value.trim().parse::<usize>().ok())
                    .flatten()
            })
            .unwrap_or(0);
        while buffer.len() < body_start + content_length {
            let read = socket.read(&mut chunk).await.unwrap();
            buffer.extend_from_slice(&chunk[..read]);
        }
        let request_body: Value =
            serde_json::from_slice(&buffer[body_start..body_start + content_length]).unwrap();

        let response = format!(
            "HTTP/1.1 {status}\r\ncontent-type: application/json\r\ncontent-length: {}\r\nconnection: close\r\n\r\n{body}",
            body.len()
        );
        let _ = tx.send(Captured {
            head,
            body: request_body,
        });
        socket.write_all(response.as_bytes()).await.unwrap();
        socket.shutdown().await.ok();
    });

    (base_url, rx)
}

fn service(base_url: String) -> HttpSessionService {
    HttpSessionService::new(RemoteSettings {
        base_url,
        api_token: Some("secret-token".to_owned()),
        timeout_secs: 5,
        connect_timeout_secs: 2,
    })
}

fn payload() -> SessionPayload {
    let t0 = Utc.with_ymd_and_hms(2025, 6, 1, 7, 0, 0).unwrap();
    SessionPayload {
        session_id: "local-1".to_owned(),
        sport: SportKind::Hiking,
        distance: 4.2,
        duration: 3_600_000,
        calories: 210,
        avg_speed: 4.1,
        max_speed: 6.3,
        steps: 5040,
        elevation_gain: 320.0,
        elevation_loss: 110.0,
        min_altitude: Some(1200.0),
        max_altitude: Some(1410.0),
        tracking_path: vec![TrackPoint {
            latitude: -21.1,
            longitude: 55.5,
            altitude: Some(1200.0),
            timestamp: t0,
        }],
        splits: Vec::new(),
        started_at: Some(t0),
        ended_at: Some(t0 + chrono::Duration::hours(1)),
        status: COMPLETED_STATUS.to_owned(),
    }
}

#[tokio::test]
async fn create_session_returns_server_id() {
    let (base_url, captured) = serve_once("201 Created", r#"{"data":{"id":"srv-42"}}"#).await;
    let point = TrackPoint {
        latitude: -21.0,
        longitude: 55.4,
        altitude: None,
        timestamp: Utc::now(),
    };

    let id = service(base_url)
        .create_session("local-1", SportKind::Running, Some(&point))
        .await
        .unwrap();
    assert_eq!(id, "srv-42");

    let request = captured.await.unwrap();
    assert!(request.head.starts_with("POST /api/sessions "));
    assert!(request
        .head
        .to_lowercase()
        .contains("authorization: bearer secret-token"));
    assert_eq!(request.body["sessionId"], "local-1");
    assert_eq!(request.body["sport"], "running");
    assert_eq!(request.body["status"], "active");
    assert_eq!(request.body["startCoordinates"]["latitude"], -21.0);
}

#[tokio::test]
async fn create_session_without_id_is_invalid_response() {
    let (base_url, _captured) = serve_once("200 OK", r#"{"success":true}"#).await;
    let result = service(base_url)
        .create_session("local-1", SportKind::Walking, None)
        .await;
    assert!(matches!(result, Err(RemoteError::InvalidResponse(_))));
}

#[tokio::test]
async fn finalize_session_posts_completed_payload() {
    let (base_url, captured) = serve_once("200 OK", r#"{"success":true}"#).await;
    service(base_url)
        .finalize_session("srv-42", &payload())
        .await
        .unwrap();

    let request = captured.await.unwrap();
    assert_eq!(request.body["sessionId"], "srv-42");
    assert_eq!(request.body["status"], "completed");
    assert_eq!(request.body["elevationGain"], 320.0);
    assert_eq!(request.body["trackingPath"].as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn server_error_is_retryable_status() {
    let (base_url, _captured) = serve_once("503 Service Unavailable", "{}").await;
    let err = service(base_url)
        .finalize_session("srv-42", &payload())
        .await
        .unwrap_err();
    assert_eq!(err, RemoteError::Status { status: 503 });
    assert!(err.is_retryable());
}

#[tokio::test]
async fn refused_connection_is_network_error() {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let base_url = format!("http://{}", listener.local_addr().unwrap());
    drop(listener);

    let err = service(base_url)
        .finalize_session("srv-42", &payload())
        .await
        .unwrap_err();
    assert!(matches!(err, RemoteError::Network(_)));
    assert!(err.is_retryable());
}
