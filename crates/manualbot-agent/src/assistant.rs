//! Per-message orchestration tying the dispatcher and generator to a channel.

use std::path::PathBuf;
use std::sync::Arc;

use futures::{Stream, StreamExt};
use manualbot_core::traits::Channel;
use manualbot_core::types::{ChannelEvent, IncomingMessage, OutgoingMessage};
use manualbot_knowledge::{KnowledgeIngestor, KnowledgeStore};

use crate::answer::AnswerGenerator;
use crate::command::{CommandDispatcher, Dispatch};

/// Sent immediately on a recognized question, before generation starts.
pub const ACK_REPLY: &str = "Checking the manuals and preparing your answer... 🤖";

/// The assistant's single entry point: consumes the channel's event stream
/// and handles each message as an independent task.
pub struct Assistant {
    dispatcher: CommandDispatcher,
    generator: AnswerGenerator,
    ingestor: KnowledgeIngestor,
    store: Arc<KnowledgeStore>,
    docs_dir: PathBuf,
    channel: Arc<dyn Channel>,
}

impl Assistant {
    pub fn new(
        dispatcher: CommandDispatcher,
        generator: AnswerGenerator,
        ingestor: KnowledgeIngestor,
        store: Arc<KnowledgeStore>,
        docs_dir: PathBuf,
        channel: Arc<dyn Channel>,
    ) -> Self {
        Self {
            dispatcher,
            generator,
            ingestor,
            store,
            docs_dir,
            channel,
        }
    }

    /// Drive the assistant until the event stream ends.
    pub async fn run(
        self: Arc<Self>,
        mut events: Box<dyn Stream<Item = ChannelEvent> + Send + Unpin>,
    ) {
        while let Some(event) = events.next().await {
            match event {
                ChannelEvent::Ready => self.on_ready().await,
                ChannelEvent::Message(msg) => {
                    let assistant = Arc::clone(&self);
                    tokio::spawn(async move {
                        assistant.handle_message(msg).await;
                    });
                }
                ChannelEvent::AuthFailure(detail) => {
                    tracing::error!("Channel authentication failure: {detail}");
                }
                ChannelEvent::Disconnected(reason) => {
                    tracing::warn!("Channel disconnected: {reason}");
                }
            }
        }
        tracing::info!("Channel event stream ended");
    }

    /// Channel is up: run the one-time ingestion pass and publish the context.
    pub async fn on_ready(&self) {
        tracing::info!("Channel ready — building the knowledge context");
        let context = self.ingestor.ingest(&self.docs_dir).await;
        tracing::info!(
            "Knowledge context loaded ({} document(s), {} bytes)",
            context.document_count(),
            context.text().len()
        );
        self.store.set(context).await;
    }

    /// Handle one incoming message to a terminal state.
    pub async fn handle_message(&self, msg: IncomingMessage) {
        match self.dispatcher.dispatch(&msg.content) {
            Dispatch::Ignore => {}
            Dispatch::EmptyArgument => {
                self.reply(&msg, self.empty_argument_reply()).await;
            }
            Dispatch::Command(question) => {
                tracing::info!("Question from {}: {question}", msg.sender_id);
                // Acknowledge before the (potentially slow) generation call.
                self.reply(&msg, ACK_REPLY).await;
                let answer = self.generator.generate(&question).await;
                self.reply(&msg, answer).await;
            }
        }
    }

    fn empty_argument_reply(&self) -> String {
        format!(
            "Please provide a question after the `{}` command.",
            self.dispatcher.prefix()
        )
    }

    async fn reply(&self, msg: &IncomingMessage, content: impl Into<String>) {
        let out = OutgoingMessage::reply_to(msg, content);
        if let Err(e) = self.channel.send(out).await {
            tracing::error!("Failed to send reply to {}: {e}", msg.thread_id);
        }
    }
}
