//! Message and lifecycle event types shared across channels and the agent.

use serde::{Deserialize, Serialize};

/// Kind of conversation a message belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ThreadType {
    Direct,
    Group,
}

/// A message received from a channel.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IncomingMessage {
    /// Channel the message arrived on (e.g., "whatsapp").
    pub channel: String,
    /// Conversation identifier — replies go back here.
    pub thread_id: String,
    /// Sender identifier within the channel.
    pub sender_id: String,
    /// Display name of the sender, when the channel provides one.
    pub sender_name: Option<String>,
    /// Message body text.
    pub content: String,
    pub thread_type: ThreadType,
    pub timestamp: chrono::DateTime<chrono::Utc>,
}

/// A message to send out over a channel.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutgoingMessage {
    /// Conversation to deliver to.
    pub thread_id: String,
    /// Message body text.
    pub content: String,
}

impl OutgoingMessage {
    /// Build a reply targeting the thread an incoming message came from.
    pub fn reply_to(msg: &IncomingMessage, content: impl Into<String>) -> Self {
        Self {
            thread_id: msg.thread_id.clone(),
            content: content.into(),
        }
    }
}

/// Everything a channel can report, on one stream, to one handler.
///
/// Lifecycle signals and messages share the stream so the orchestration layer
/// has a single entry point instead of scattered callbacks.
#[derive(Debug, Clone)]
pub enum ChannelEvent {
    /// The channel is connected and ready to send/receive.
    Ready,
    /// A message arrived.
    Message(IncomingMessage),
    /// Authentication with the channel backend failed.
    AuthFailure(String),
    /// The channel lost its connection.
    Disconnected(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_incoming() -> IncomingMessage {
        IncomingMessage {
            channel: "whatsapp".into(),
            thread_id: "5511999990000".into(),
            sender_id: "5511999990000".into(),
            sender_name: Some("Ana".into()),
            content: "!ask how do I reset the router?".into(),
            thread_type: ThreadType::Direct,
            timestamp: chrono::Utc::now(),
        }
    }

    #[test]
    fn test_reply_targets_same_thread() {
        let incoming = sample_incoming();
        let reply = OutgoingMessage::reply_to(&incoming, "working on it");
        assert_eq!(reply.thread_id, incoming.thread_id);
        assert_eq!(reply.content, "working on it");
    }
}
