//! # ManualBot Providers
//!
//! Language model provider implementations. Gemini is the only provider the
//! assistant ships with; the `Provider` trait in `manualbot-core` is the seam
//! a different backend would plug into.

pub mod gemini;

use manualbot_core::config::ManualBotConfig;
use manualbot_core::error::Result;
use manualbot_core::traits::Provider;

/// Create the configured provider.
pub fn create_provider(config: &ManualBotConfig) -> Result<Box<dyn Provider>> {
    Ok(Box::new(gemini::GeminiProvider::from_config(config)?))
}
