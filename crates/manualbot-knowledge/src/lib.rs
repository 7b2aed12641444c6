//! # ManualBot Knowledge
//!
//! The ingestion pipeline: a directory of PDF manuals in, one knowledge
//! context blob out.
//!
//! ## How it works
//! ```text
//! ~/.manualbot/manuals/*.pdf
//!   ↓ PdfExtractor (per file, failures skipped)
//! extracted texts, in name order
//!   ↓ KnowledgeIngestor (preamble + blank-line concatenation)
//! KnowledgeContext
//!   ↓ KnowledgeStore.set (single write, at channel-ready time)
//! read concurrently by every answer task
//! ```
//!
//! The context is built once per process and replaced wholesale, never
//! mutated in place.

pub mod extractor;
pub mod ingest;
pub mod store;

pub use extractor::PdfExtractor;
pub use ingest::KnowledgeIngestor;
pub use store::{KnowledgeContext, KnowledgeStore};
