//! PDF text extraction behind the `DocumentExtractor` seam.

use async_trait::async_trait;
use manualbot_core::error::{ManualBotError, Result};
use manualbot_core::traits::DocumentExtractor;

/// Extracts plain text from PDF bytes using the `pdf-extract` crate.
///
/// Extraction is CPU-bound, so it runs on the blocking pool rather than
/// stalling the event loop.
#[derive(Debug, Default)]
pub struct PdfExtractor;

impl PdfExtractor {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl DocumentExtractor for PdfExtractor {
    fn name(&self) -> &str {
        "pdf"
    }

    async fn extract(&self, bytes: &[u8]) -> Result<String> {
        let bytes = bytes.to_vec();
        let text = tokio::task::spawn_blocking(move || pdf_extract::extract_text_from_mem(&bytes))
            .await
            .map_err(|e| ManualBotError::Extraction(format!("extraction task failed: {e}")))?
            .map_err(|e| ManualBotError::Extraction(format!("PDF parse error: {e}")))?;
        Ok(text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_garbage_bytes_fail_per_document() {
        let extractor = PdfExtractor::new();
        let result = extractor.extract(b"not a pdf at all").await;
        assert!(matches!(result, Err(ManualBotError::Extraction(_))));
    }
}
