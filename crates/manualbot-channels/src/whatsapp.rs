//! WhatsApp Business Cloud API channel.
//!
//! Outgoing messages go straight to the Graph API. Incoming messages arrive
//! via webhook (HTTP POST): the gateway parses each notification through
//! [`WhatsAppChannel::parse_webhook`] and pushes the results onto the event
//! stream with a [`WebhookHandle`].
//!
//! Requires: Access Token + Phone Number ID from Meta Business Suite.

use async_trait::async_trait;
use futures::stream::Stream;
use manualbot_core::config::WhatsAppConfig;
use manualbot_core::error::{ManualBotError, Result};
use manualbot_core::traits::Channel;
use manualbot_core::types::{ChannelEvent, IncomingMessage, OutgoingMessage, ThreadType};
use std::pin::Pin;
use std::task::{Context, Poll};
use tokio::sync::mpsc;

const GRAPH_API_BASE: &str = "https://graph.facebook.com/v21.0";

/// WhatsApp Business channel implementation.
pub struct WhatsAppChannel {
    config: WhatsAppConfig,
    client: reqwest::Client,
    connected: bool,
    events_tx: mpsc::UnboundedSender<ChannelEvent>,
    events_rx: std::sync::Mutex<Option<mpsc::UnboundedReceiver<ChannelEvent>>>,
}

impl WhatsAppChannel {
    pub fn new(config: WhatsAppConfig) -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        Self {
            config,
            client: reqwest::Client::new(),
            connected: false,
            events_tx: tx,
            events_rx: std::sync::Mutex::new(Some(rx)),
        }
    }

    /// Handle for the webhook endpoint to feed events into the stream.
    pub fn webhook_handle(&self) -> WebhookHandle {
        WebhookHandle {
            tx: self.events_tx.clone(),
        }
    }

    /// Token Meta must echo during the webhook verification handshake.
    pub fn verify_token(&self) -> &str {
        &self.config.webhook_verify_token
    }

    /// Parse a Cloud API webhook notification into incoming messages.
    ///
    /// Only text messages are surfaced; delivery statuses, reactions and
    /// media notifications are inert traffic.
    pub fn parse_webhook(&self, payload: &serde_json::Value) -> Vec<IncomingMessage> {
        let mut messages = Vec::new();
        let Some(entries) = payload["entry"].as_array() else {
            return messages;
        };

        for entry in entries {
            let Some(changes) = entry["changes"].as_array() else {
                continue;
            };
            for change in changes {
                let value = &change["value"];
                let Some(incoming) = value["messages"].as_array() else {
                    continue;
                };
                // Meta sends the sender profile alongside, in contacts[].
                let sender_name = value["contacts"][0]["profile"]["name"]
                    .as_str()
                    .map(String::from);

                for msg in incoming {
                    if msg["type"].as_str() != Some("text") {
                        continue;
                    }
                    let Some(text) = msg["text"]["body"].as_str() else {
                        continue;
                    };
                    let from = msg["from"].as_str().unwrap_or("");
                    messages.push(IncomingMessage {
                        channel: "whatsapp".into(),
                        thread_id: from.into(),
                        sender_id: from.into(),
                        sender_name: sender_name.clone(),
                        content: text.into(),
                        thread_type: ThreadType::Direct,
                        timestamp: chrono::Utc::now(),
                    });
                }
            }
        }
        messages
    }

    /// Send a text message via the Cloud API.
    async fn send_text_message(&self, to: &str, text: &str) -> Result<String> {
        let url = format!("{GRAPH_API_BASE}/{}/messages", self.config.phone_number_id);

        let body = serde_json::json!({
            "messaging_product": "whatsapp",
            "recipient_type": "individual",
            "to": to,
            "type": "text",
            "text": {
                "preview_url": false,
                "body": text
            }
        });

        let response = self
            .client
            .post(&url)
            .header("Authorization", format!("Bearer {}", self.config.access_token))
            .header("Content-Type", "application/json")
            .json(&body)
            .send()
            .await
            .map_err(|e| ManualBotError::Channel(format!("WhatsApp API request failed: {e}")))?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response.text().await.unwrap_or_default();
            return Err(ManualBotError::Channel(format!(
                "WhatsApp API error {status}: {error_text}"
            )));
        }

        let result: serde_json::Value = response
            .json()
            .await
            .map_err(|e| ManualBotError::Channel(format!("Invalid WhatsApp response: {e}")))?;

        let msg_id = result["messages"][0]["id"]
            .as_str()
            .unwrap_or("unknown")
            .to_string();

        tracing::debug!("WhatsApp message sent: {} → {}", msg_id, to);
        Ok(msg_id)
    }
}

#[async_trait]
impl Channel for WhatsAppChannel {
    fn name(&self) -> &str {
        "whatsapp"
    }

    async fn connect(&mut self) -> Result<()> {
        if self.config.access_token.is_empty() {
            return Err(ManualBotError::Config(
                "WhatsApp access_token not configured".into(),
            ));
        }
        if self.config.phone_number_id.is_empty() {
            return Err(ManualBotError::Config(
                "WhatsApp phone_number_id not configured".into(),
            ));
        }

        // Verify the token by fetching the phone number object.
        let url = format!("{GRAPH_API_BASE}/{}", self.config.phone_number_id);
        let response = self
            .client
            .get(&url)
            .header("Authorization", format!("Bearer {}", self.config.access_token))
            .send()
            .await
            .map_err(|e| ManualBotError::Channel(format!("WhatsApp verification failed: {e}")))?;

        if !response.status().is_success() {
            let text = response.text().await.unwrap_or_default();
            let _ = self.events_tx.send(ChannelEvent::AuthFailure(text.clone()));
            return Err(ManualBotError::AuthFailed(format!(
                "WhatsApp token verification failed: {text}"
            )));
        }

        self.connected = true;
        tracing::info!(
            "WhatsApp Business: connected (phone_id={})",
            self.config.phone_number_id
        );
        let _ = self.events_tx.send(ChannelEvent::Ready);
        Ok(())
    }

    async fn disconnect(&mut self) -> Result<()> {
        self.connected = false;
        let _ = self
            .events_tx
            .send(ChannelEvent::Disconnected("client shutdown".into()));
        tracing::info!("WhatsApp Business: disconnected");
        Ok(())
    }

    fn is_connected(&self) -> bool {
        self.connected
    }

    async fn send(&self, message: OutgoingMessage) -> Result<()> {
        self.send_text_message(&message.thread_id, &message.content)
            .await?;
        Ok(())
    }

    async fn listen(&self) -> Result<Box<dyn Stream<Item = ChannelEvent> + Send + Unpin>> {
        let rx = self
            .events_rx
            .lock()
            .expect("event receiver lock poisoned")
            .take()
            .ok_or_else(|| ManualBotError::Channel("listen() already called".into()))?;
        Ok(Box::new(ChannelEventStream { rx }))
    }
}

/// Push side of the channel's event stream, held by the webhook gateway.
#[derive(Clone)]
pub struct WebhookHandle {
    tx: mpsc::UnboundedSender<ChannelEvent>,
}

impl WebhookHandle {
    pub fn push(&self, event: ChannelEvent) {
        if self.tx.send(event).is_err() {
            tracing::warn!("Channel event dropped — listener is gone");
        }
    }
}

/// Stream of channel events backed by the webhook receiver.
pub struct ChannelEventStream {
    rx: mpsc::UnboundedReceiver<ChannelEvent>,
}

impl Stream for ChannelEventStream {
    type Item = ChannelEvent;

    fn poll_next(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        self.rx.poll_recv(cx)
    }
}

impl Unpin for ChannelEventStream {}

#[cfg(test)]
mod tests {
    use super::*;
    use futures::StreamExt;

    fn channel() -> WhatsAppChannel {
        WhatsAppChannel::new(WhatsAppConfig {
            access_token: "test-token".into(),
            phone_number_id: "1234567890".into(),
            webhook_verify_token: "hub-secret".into(),
        })
    }

    fn text_message_payload() -> serde_json::Value {
        serde_json::json!({
            "object": "whatsapp_business_account",
            "entry": [{
                "id": "WABA_ID",
                "changes": [{
                    "field": "messages",
                    "value": {
                        "messaging_product": "whatsapp",
                        "contacts": [{ "profile": { "name": "Ana" }, "wa_id": "5511999990000" }],
                        "messages": [{
                            "from": "5511999990000",
                            "id": "wamid.ABC",
                            "type": "text",
                            "text": { "body": "!ask how do I reset the router?" }
                        }]
                    }
                }]
            }]
        })
    }

    #[test]
    fn test_parse_text_message() {
        let msgs = channel().parse_webhook(&text_message_payload());
        assert_eq!(msgs.len(), 1);
        assert_eq!(msgs[0].content, "!ask how do I reset the router?");
        assert_eq!(msgs[0].sender_id, "5511999990000");
        assert_eq!(msgs[0].thread_id, "5511999990000");
        assert_eq!(msgs[0].sender_name, Some("Ana".into()));
    }

    #[test]
    fn test_parse_ignores_non_text_messages() {
        let payload = serde_json::json!({
            "entry": [{
                "changes": [{
                    "value": {
                        "messages": [{
                            "from": "5511999990000",
                            "type": "image",
                            "image": { "id": "media-id" }
                        }]
                    }
                }]
            }]
        });
        assert!(channel().parse_webhook(&payload).is_empty());
    }

    #[test]
    fn test_parse_ignores_status_notifications() {
        let payload = serde_json::json!({
            "entry": [{
                "changes": [{
                    "value": {
                        "statuses": [{ "id": "wamid.ABC", "status": "delivered" }]
                    }
                }]
            }]
        });
        assert!(channel().parse_webhook(&payload).is_empty());
    }

    #[test]
    fn test_parse_empty_payload() {
        assert!(channel().parse_webhook(&serde_json::json!({})).is_empty());
    }

    #[tokio::test]
    async fn test_webhook_handle_feeds_listen_stream() {
        let ch = channel();
        let handle = ch.webhook_handle();
        let mut stream = ch.listen().await.unwrap();

        let msgs = ch.parse_webhook(&text_message_payload());
        handle.push(ChannelEvent::Message(msgs[0].clone()));

        match stream.next().await {
            Some(ChannelEvent::Message(msg)) => {
                assert_eq!(msg.content, "!ask how do I reset the router?")
            }
            other => panic!("unexpected event: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_listen_can_only_be_taken_once() {
        let ch = channel();
        assert!(ch.listen().await.is_ok());
        assert!(ch.listen().await.is_err());
    }
}
