//! HTTP server implementation using Axum.

use axum::{
    Router,
    routing::{get, post},
};
use manualbot_channels::{WebhookHandle, WhatsAppChannel};
use manualbot_core::error::{ManualBotError, Result};
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

/// Shared state for the gateway server.
#[derive(Clone)]
pub struct AppState {
    /// The channel — parses webhook payloads and knows the verify token.
    pub channel: Arc<WhatsAppChannel>,
    /// Push side of the channel's event stream.
    pub events: WebhookHandle,
}

impl AppState {
    pub fn new(channel: Arc<WhatsAppChannel>) -> Self {
        let events = channel.webhook_handle();
        Self { channel, events }
    }
}

/// Build the Axum router with all routes.
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(super::routes::health_check))
        .route("/webhook", get(super::routes::verify_webhook))
        .route("/webhook", post(super::routes::receive_webhook))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::new().allow_origin(Any))
        .with_state(state)
}

/// Bind and serve until the process exits.
pub async fn serve(host: &str, port: u16, state: AppState) -> Result<()> {
    let addr = format!("{host}:{port}");
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .map_err(|e| ManualBotError::Config(format!("Cannot bind gateway to {addr}: {e}")))?;

    tracing::info!("Webhook gateway listening on http://{addr}");
    axum::serve(listener, build_router(state))
        .await
        .map_err(|e| ManualBotError::Http(format!("Gateway server error: {e}")))?;
    Ok(())
}
