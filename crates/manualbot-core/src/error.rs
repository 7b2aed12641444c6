//! ManualBot error taxonomy.

use thiserror::Error;

/// Errors produced across the ManualBot workspace.
#[derive(Error, Debug)]
pub enum ManualBotError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Channel error: {0}")]
    Channel(String),

    #[error("Channel authentication failed: {0}")]
    AuthFailed(String),

    #[error("Provider error: {0}")]
    Provider(String),

    #[error("HTTP error: {0}")]
    Http(String),

    #[error("Document extraction failed: {0}")]
    Extraction(String),

    #[error(
        "Gemini API key missing — set `api_key` in the config file or the GEMINI_API_KEY environment variable"
    )]
    ApiKeyMissing,

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, ManualBotError>;
