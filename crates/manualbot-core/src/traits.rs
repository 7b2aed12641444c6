//! Trait seams between the core pipelines and their external collaborators.

use async_trait::async_trait;
use futures::stream::Stream;

use crate::error::Result;
use crate::types::{ChannelEvent, OutgoingMessage};

/// A messaging channel: delivers incoming messages and lifecycle signals,
/// accepts outgoing replies.
#[async_trait]
pub trait Channel: Send + Sync {
    fn name(&self) -> &str;

    /// Establish the connection / verify credentials.
    async fn connect(&mut self) -> Result<()>;

    async fn disconnect(&mut self) -> Result<()>;

    fn is_connected(&self) -> bool;

    /// Send a message out over the channel.
    async fn send(&self, message: OutgoingMessage) -> Result<()>;

    /// Stream of messages and lifecycle events. Can be taken once.
    async fn listen(&self) -> Result<Box<dyn Stream<Item = ChannelEvent> + Send + Unpin>>;
}

/// A generative language model service.
#[async_trait]
pub trait Provider: Send + Sync {
    fn name(&self) -> &str;

    /// One request, one response: grounding instruction + user content in,
    /// model text out.
    async fn generate(&self, system_instruction: &str, content: &str) -> Result<String>;
}

/// Turns raw document bytes into text. Fails per document.
#[async_trait]
pub trait DocumentExtractor: Send + Sync {
    fn name(&self) -> &str;

    async fn extract(&self, bytes: &[u8]) -> Result<String>;
}
