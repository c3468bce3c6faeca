// ABOUTME: HTTP implementation of the remote session service
// ABOUTME: POSTs session creation and finalized payloads to the sessions endpoint
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use async_trait::async_trait;
use reqwest::{Client, RequestBuilder};
use serde::Serialize;
use serde_json::Value;
use tracing::{debug, warn};

use trackline_core::constants::remote::{
    DEFAULT_API_URL, DEFAULT_CONNECT_TIMEOUT_SECS, DEFAULT_TIMEOUT_SECS, SESSIONS_PATH,
};
use trackline_core::errors::RemoteError;
use trackline_core::models::{SessionPayload, SportKind, TrackPoint};

use crate::http_client::create_client_with_timeout;
use crate::RemoteSessionService;

/// Connection settings for the sessions API
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemoteSettings {
    /// API base URL, without trailing slash
    pub base_url: String,
    /// Optional bearer token
    pub api_token: Option<String>,
    /// Request timeout in seconds
    pub timeout_secs: u64,
    /// Connection timeout in seconds
    pub connect_timeout_secs: u64,
}

impl Default for RemoteSettings {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_API_URL.to_owned(),
            api_token: None,
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            connect_timeout_secs: DEFAULT_CONNECT_TIMEOUT_SECS,
        }
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct StartCoordinates {
    latitude: f64,
    longitude: f64,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct CreateSessionBody<'a> {
    session_id: &'a str,
    sport: SportKind,
    distance: f64,
    duration: i64,
    start_coordinates: Option<StartCoordinates>,
    tracking_path: &'a [TrackPoint],
    status: &'static str,
}

/// Sessions API client
#[derive(Debug, Clone)]
pub struct HttpSessionService {
    client: Client,
    settings: RemoteSettings,
}

impl HttpSessionService {
    /// Build a client bounded by the configured timeouts
    #[must_use]
    pub fn new(settings: RemoteSettings) -> Self {
        let client = create_client_with_timeout(settings.timeout_secs, settings.connect_timeout_secs);
        Self { client, settings }
    }

    fn sessions_url(&self) -> String {
        format!(
            "{}{SESSIONS_PATH}",
            self.settings.base_url.trim_end_matches('/')
        )
    }

    fn authorize(&self, request: RequestBuilder) -> RequestBuilder {
        match &self.settings.api_token {
            Some(token) => request.bearer_auth(token),
            None => request,
        }
    }

    fn map_send_error(&self, error: &reqwest::Error) -> RemoteError {
        if error.is_timeout() {
            RemoteError::Timeout {
                timeout_secs: self.settings.timeout_secs,
            }
        } else {
            RemoteError::Network(error.to_string())
        }
    }

    async fn post_json<T: Serialize + Sync>(&self, body: &T) -> Result<Value, RemoteError> {
        let url = self.sessions_url();
        let response = self
            .authorize(self.client.post(&url))
            .json(body)
            .send()
            .await
            .map_err(|e| self.map_send_error(&e))?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_else(|e| {
                warn!("Failed to read error response body: {}", e);
                String::new()
            });
            warn!(
                http.status = status.as_u16(),
                body = %error_text,
                "Sessions API returned an error"
            );
            return Err(RemoteError::Status {
                status: status.as_u16(),
            });
        }

        // Empty or non-JSON bodies are fine for finalize; create checks the id itself
        Ok(response.json::<Value>().await.unwrap_or(Value::Null))
    }
}

/// Extract the server-issued id from `{"data": {"id" | "sessionId": ...}}`
fn server_session_id(body: &Value) -> Option<String> {
    let data = body.get("data")?;
    ["id", "sessionId"]
        .iter()
        .filter_map(|key| data.get(*key))
        .find_map(|value| match value {
            Value::String(id) if !id.is_empty() => Some(id.clone()),
            Value::Number(id) => Some(id.to_string()),
            _ => None,
        })
}

#[async_trait]
impl RemoteSessionService for HttpSessionService {
    async fn create_session(
        &self,
        local_id: &str,
        sport: SportKind,
        initial_position: Option<&TrackPoint>,
    ) -> Result<String, RemoteError> {
        let body = CreateSessionBody {
            session_id: local_id,
            sport,
            distance: 0.0,
            duration: 0,
            start_coordinates: initial_position.map(|p| StartCoordinates {
                latitude: p.latitude,
                longitude: p.longitude,
            }),
            tracking_path: &[],
            status: "active",
        };

        let response = self.post_json(&body).await?;
        let id = server_session_id(&response).ok_or_else(|| {
            RemoteError::InvalidResponse("response carries no session id".to_owned())
        })?;
        debug!(session.local_id = local_id, session.id = %id, "Remote session created");
        Ok(id)
    }

    async fn finalize_session(
        &self,
        session_id: &str,
        payload: &SessionPayload,
    ) -> Result<(), RemoteError> {
        let mut body = serde_json::to_value(payload)
            .map_err(|e| RemoteError::InvalidResponse(format!("unserializable payload: {e}")))?;
        if let Some(object) = body.as_object_mut() {
            object.insert("sessionId".to_owned(), Value::String(session_id.to_owned()));
        }

        self.post_json(&body).await?;
        debug!(session.id = session_id, "Session finalized remotely");
        Ok(())
    }
}
