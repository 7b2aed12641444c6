//! Process-wide holder of the current knowledge context.

use std::sync::Arc;
use tokio::sync::RwLock;

/// The single grounding text supplied to the model alongside each question.
///
/// Either fully formed (every document that extracted successfully is
/// included) or the placeholder produced when no documents were available.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KnowledgeContext {
    text: String,
    document_count: usize,
}

impl KnowledgeContext {
    pub fn new(text: String, document_count: usize) -> Self {
        Self {
            text,
            document_count,
        }
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    /// Number of documents whose text made it into the context.
    pub fn document_count(&self) -> usize {
        self.document_count
    }
}

/// Holds exactly one [`KnowledgeContext`], with an explicit unloaded state.
///
/// `set` swaps the whole value under the write lock, so readers observe
/// either the previous context or the new one — never a partial write.
/// The intended lifecycle is a single `set` after ingestion completes;
/// nothing re-ingests afterwards.
#[derive(Debug, Default)]
pub struct KnowledgeStore {
    inner: RwLock<Option<Arc<KnowledgeContext>>>,
}

impl KnowledgeStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Current context, or `None` while ingestion has not completed.
    pub async fn get(&self) -> Option<Arc<KnowledgeContext>> {
        self.inner.read().await.clone()
    }

    pub async fn is_loaded(&self) -> bool {
        self.inner.read().await.is_some()
    }

    /// Replace the stored context wholesale.
    pub async fn set(&self, context: KnowledgeContext) {
        let mut guard = self.inner.write().await;
        if guard.is_some() {
            tracing::warn!("Knowledge context replaced — re-ingestion is not part of the normal lifecycle");
        }
        *guard = Some(Arc::new(context));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_store_starts_unloaded() {
        let store = KnowledgeStore::new();
        assert!(!store.is_loaded().await);
        assert!(store.get().await.is_none());
    }

    #[tokio::test]
    async fn test_set_then_get() {
        let store = KnowledgeStore::new();
        store
            .set(KnowledgeContext::new("preamble\n\nmanual text\n\n".into(), 1))
            .await;

        let ctx = store.get().await.expect("loaded");
        assert_eq!(ctx.text(), "preamble\n\nmanual text\n\n");
        assert_eq!(ctx.document_count(), 1);
    }

    #[tokio::test]
    async fn test_set_replaces_wholesale() {
        let store = KnowledgeStore::new();
        store.set(KnowledgeContext::new("first".into(), 1)).await;
        store.set(KnowledgeContext::new("second".into(), 2)).await;

        let ctx = store.get().await.expect("loaded");
        assert_eq!(ctx.text(), "second");
        assert_eq!(ctx.document_count(), 2);
    }

    #[tokio::test]
    async fn test_readers_keep_old_arc_across_replace() {
        let store = KnowledgeStore::new();
        store.set(KnowledgeContext::new("old".into(), 1)).await;
        let held = store.get().await.expect("loaded");

        store.set(KnowledgeContext::new("new".into(), 1)).await;
        // An in-flight reader keeps a consistent snapshot.
        assert_eq!(held.text(), "old");
        assert_eq!(store.get().await.unwrap().text(), "new");
    }
}
