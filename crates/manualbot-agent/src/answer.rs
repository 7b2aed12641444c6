//! Answer generation — one model round trip, every failure absorbed into a
//! fixed fallback reply.

use std::sync::Arc;

use manualbot_core::traits::Provider;
use manualbot_knowledge::KnowledgeStore;

/// Returned while ingestion has not completed yet.
pub const STILL_INITIALIZING_REPLY: &str =
    "The knowledge base has not finished loading yet. Please try again in a moment.";

/// Returned when the model call fails for any reason.
pub const GENERATION_FAILED_REPLY: &str =
    "Sorry, I could not process your question right now. The AI service returned an error.";

/// Grounds questions in the current knowledge context and asks the model.
pub struct AnswerGenerator {
    store: Arc<KnowledgeStore>,
    provider: Arc<dyn Provider>,
}

impl AnswerGenerator {
    pub fn new(store: Arc<KnowledgeStore>, provider: Arc<dyn Provider>) -> Self {
        Self { store, provider }
    }

    /// Answer a question. Every outcome is a ready-to-send string.
    pub async fn generate(&self, question: &str) -> String {
        let Some(context) = self.store.get().await else {
            return STILL_INITIALIZING_REPLY.to_string();
        };

        match self.provider.generate(context.text(), question).await {
            Ok(text) => text,
            Err(e) => {
                tracing::error!("Answer generation failed: {e}");
                GENERATION_FAILED_REPLY.to_string()
            }
        }
    }
}
