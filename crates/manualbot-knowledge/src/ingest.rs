//! One-shot ingestion: document directory in, knowledge context out.

use std::path::Path;

use manualbot_core::traits::DocumentExtractor;

use crate::store::KnowledgeContext;

/// Instruction prefixed to every knowledge context so the model answers
/// strictly from the supplied material.
pub const PREAMBLE: &str = "You are an expert technical assistant. Answer the user's question \
strictly based on the following knowledge extracted from technical manuals:";

/// Marker used when the docs directory is missing or holds no PDFs.
pub const NO_DOCUMENTS_MARKER: &str = "(no documents have been loaded)";

const DOCUMENT_EXTENSION: &str = "pdf";

/// Scans a directory of documents and builds one [`KnowledgeContext`].
///
/// `ingest` never fails: a missing directory is created, an empty one yields
/// the placeholder context, and a document the extractor chokes on is skipped
/// while the rest of the pass continues.
pub struct KnowledgeIngestor {
    extractor: Box<dyn DocumentExtractor>,
}

impl KnowledgeIngestor {
    pub fn new(extractor: Box<dyn DocumentExtractor>) -> Self {
        Self { extractor }
    }

    pub async fn ingest(&self, dir: &Path) -> KnowledgeContext {
        tracing::info!("Ingesting documents from {}", dir.display());

        if !dir.exists() {
            tracing::warn!("Docs directory {} not found — creating it", dir.display());
            if let Err(e) = tokio::fs::create_dir_all(dir).await {
                tracing::error!("Could not create docs directory: {e}");
            }
            return placeholder_context();
        }

        let files = match self.list_documents(dir).await {
            Ok(files) => files,
            Err(e) => {
                tracing::error!("Could not list docs directory {}: {e}", dir.display());
                return placeholder_context();
            }
        };

        if files.is_empty() {
            tracing::warn!("No PDF files found in {}", dir.display());
            return placeholder_context();
        }

        tracing::info!("Found {} PDF file(s), processing...", files.len());
        let mut combined = String::new();
        let mut included = 0usize;

        for path in &files {
            let bytes = match tokio::fs::read(path).await {
                Ok(bytes) => bytes,
                Err(e) => {
                    tracing::error!("Failed to read {}: {e} — skipping", path.display());
                    continue;
                }
            };

            match self.extractor.extract(&bytes).await {
                Ok(text) => {
                    combined.push_str(&text);
                    combined.push_str("\n\n");
                    included += 1;
                    tracing::info!("Processed {}", path.display());
                }
                Err(e) => {
                    tracing::error!("Failed to extract {}: {e} — skipping", path.display());
                }
            }
        }

        if included == 0 {
            // Every document failed extraction.
            return placeholder_context();
        }

        tracing::info!("Knowledge context built from {included} document(s)");
        KnowledgeContext::new(format!("{PREAMBLE}\n\n{combined}"), included)
    }

    /// Eligible documents in the directory, sorted by file name so the
    /// context is deterministic across runs.
    async fn list_documents(&self, dir: &Path) -> std::io::Result<Vec<std::path::PathBuf>> {
        let mut entries = tokio::fs::read_dir(dir).await?;
        let mut files = Vec::new();
        while let Some(entry) = entries.next_entry().await? {
            let path = entry.path();
            let is_document = path.is_file()
                && path
                    .extension()
                    .is_some_and(|ext| ext.eq_ignore_ascii_case(DOCUMENT_EXTENSION));
            if is_document {
                files.push(path);
            }
        }
        files.sort();
        Ok(files)
    }
}

fn placeholder_context() -> KnowledgeContext {
    KnowledgeContext::new(format!("{PREAMBLE} {NO_DOCUMENTS_MARKER}"), 0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use manualbot_core::error::{ManualBotError, Result};
    use std::path::PathBuf;

    /// Treats file bytes as UTF-8 text; invalid UTF-8 fails like a corrupt PDF.
    struct Utf8Extractor;

    #[async_trait]
    impl DocumentExtractor for Utf8Extractor {
        fn name(&self) -> &str {
            "utf8"
        }

        async fn extract(&self, bytes: &[u8]) -> Result<String> {
            String::from_utf8(bytes.to_vec())
                .map_err(|e| ManualBotError::Extraction(format!("not valid text: {e}")))
        }
    }

    fn ingestor() -> KnowledgeIngestor {
        KnowledgeIngestor::new(Box::new(Utf8Extractor))
    }

    fn scratch_dir(name: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!("manualbot-ingest-{name}"));
        let _ = std::fs::remove_dir_all(&dir);
        dir
    }

    #[tokio::test]
    async fn test_missing_directory_is_created_and_yields_placeholder() {
        let dir = scratch_dir("missing");
        assert!(!dir.exists());

        let ctx = ingestor().ingest(&dir).await;

        assert!(dir.exists());
        assert!(std::fs::read_dir(&dir).unwrap().next().is_none());
        assert_eq!(ctx.document_count(), 0);
        assert!(ctx.text().contains(NO_DOCUMENTS_MARKER));
        assert!(ctx.text().starts_with(PREAMBLE));
    }

    #[tokio::test]
    async fn test_empty_directory_yields_placeholder() {
        let dir = scratch_dir("empty");
        std::fs::create_dir_all(&dir).unwrap();

        let ctx = ingestor().ingest(&dir).await;
        assert_eq!(ctx.document_count(), 0);
        assert!(ctx.text().contains(NO_DOCUMENTS_MARKER));
    }

    #[tokio::test]
    async fn test_concatenates_in_name_order_with_blank_line_separators() {
        let dir = scratch_dir("order");
        std::fs::create_dir_all(&dir).unwrap();
        std::fs::write(dir.join("b.pdf"), "second manual").unwrap();
        std::fs::write(dir.join("a.pdf"), "first manual").unwrap();

        let ctx = ingestor().ingest(&dir).await;

        assert_eq!(ctx.document_count(), 2);
        assert_eq!(
            ctx.text(),
            format!("{PREAMBLE}\n\nfirst manual\n\nsecond manual\n\n")
        );
    }

    #[tokio::test]
    async fn test_non_document_files_are_ignored() {
        let dir = scratch_dir("filter");
        std::fs::create_dir_all(&dir).unwrap();
        std::fs::write(dir.join("manual.pdf"), "real content").unwrap();
        std::fs::write(dir.join("readme.txt"), "not a manual").unwrap();
        std::fs::write(dir.join("notes"), "no extension").unwrap();

        let ctx = ingestor().ingest(&dir).await;

        assert_eq!(ctx.document_count(), 1);
        assert!(ctx.text().contains("real content"));
        assert!(!ctx.text().contains("not a manual"));
    }

    #[tokio::test]
    async fn test_extension_match_is_case_insensitive() {
        let dir = scratch_dir("case");
        std::fs::create_dir_all(&dir).unwrap();
        std::fs::write(dir.join("UPPER.PDF"), "upper case extension").unwrap();

        let ctx = ingestor().ingest(&dir).await;
        assert_eq!(ctx.document_count(), 1);
    }

    #[tokio::test]
    async fn test_one_bad_document_does_not_abort_the_pass() {
        let dir = scratch_dir("partial");
        std::fs::create_dir_all(&dir).unwrap();
        std::fs::write(dir.join("good.pdf"), "valid text").unwrap();
        std::fs::write(dir.join("bad.pdf"), [0xFF, 0xFE, 0xFD]).unwrap();

        let ctx = ingestor().ingest(&dir).await;

        assert_eq!(ctx.document_count(), 1);
        assert!(ctx.text().contains("valid text"));
    }

    #[tokio::test]
    async fn test_all_documents_failing_yields_placeholder() {
        let dir = scratch_dir("allbad");
        std::fs::create_dir_all(&dir).unwrap();
        std::fs::write(dir.join("bad.pdf"), [0xFF, 0xFE]).unwrap();

        let ctx = ingestor().ingest(&dir).await;
        assert_eq!(ctx.document_count(), 0);
        assert!(ctx.text().contains(NO_DOCUMENTS_MARKER));
    }
}
