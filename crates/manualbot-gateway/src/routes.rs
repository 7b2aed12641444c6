//! Webhook route handlers for the gateway.

use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use manualbot_core::types::ChannelEvent;
use std::collections::HashMap;

use super::server::AppState;

/// Health check endpoint.
pub async fn health_check() -> Json<serde_json::Value> {
    Json(serde_json::json!({
        "status": "ok",
        "service": "manualbot-gateway",
        "version": env!("CARGO_PKG_VERSION"),
    }))
}

/// Meta webhook verification handshake (GET).
///
/// Meta calls this once when the webhook URL is registered; echoing
/// `hub.challenge` confirms ownership.
pub async fn verify_webhook(
    State(state): State<AppState>,
    Query(params): Query<HashMap<String, String>>,
) -> Response {
    match verification_reply(&params, state.channel.verify_token()) {
        Some(challenge) => {
            tracing::info!("Webhook verification handshake accepted");
            (StatusCode::OK, challenge).into_response()
        }
        None => {
            tracing::warn!("Webhook verification handshake rejected");
            StatusCode::FORBIDDEN.into_response()
        }
    }
}

/// The challenge to echo back, if the handshake parameters check out.
fn verification_reply(params: &HashMap<String, String>, expected_token: &str) -> Option<String> {
    if expected_token.is_empty() {
        return None;
    }
    let mode = params.get("hub.mode").map(String::as_str);
    let token = params.get("hub.verify_token").map(String::as_str);
    if mode != Some("subscribe") || token != Some(expected_token) {
        return None;
    }
    params.get("hub.challenge").cloned()
}

/// Message notifications from the Cloud API (POST).
///
/// Always answers 200 — Meta retries non-2xx deliveries, and a payload we
/// cannot use is not worth a retry storm.
pub async fn receive_webhook(
    State(state): State<AppState>,
    Json(payload): Json<serde_json::Value>,
) -> StatusCode {
    let messages = state.channel.parse_webhook(&payload);
    if !messages.is_empty() {
        tracing::debug!("Webhook delivered {} message(s)", messages.len());
    }
    for msg in messages {
        state.events.push(ChannelEvent::Message(msg));
    }
    StatusCode::OK
}
