//! ManualBot configuration system.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::Result;

/// Environment variables checked for the Gemini API key, in order.
pub const API_KEY_ENV_VARS: &[&str] = &["GEMINI_API_KEY", "GOOGLE_API_KEY"];

/// Root configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ManualBotConfig {
    /// Gemini API key. Falls back to env vars when empty — see [`API_KEY_ENV_VARS`].
    #[serde(default = "default_api_key")]
    pub api_key: String,
    #[serde(default = "default_model")]
    pub model: String,
    /// Directory scanned for PDF manuals at ingestion time.
    #[serde(default = "default_docs_dir")]
    pub docs_dir: String,
    /// Token a message must start with to be treated as a question.
    #[serde(default = "default_command_prefix")]
    pub command_prefix: String,
    #[serde(default)]
    pub gateway: GatewayConfig,
    #[serde(default)]
    pub whatsapp: WhatsAppConfig,
}

fn default_api_key() -> String { String::new() }
fn default_model() -> String { "gemini-2.5-flash".into() }
fn default_docs_dir() -> String { "~/.manualbot/manuals".into() }
fn default_command_prefix() -> String { "!ask".into() }

impl Default for ManualBotConfig {
    fn default() -> Self {
        Self {
            api_key: default_api_key(),
            model: default_model(),
            docs_dir: default_docs_dir(),
            command_prefix: default_command_prefix(),
            gateway: GatewayConfig::default(),
            whatsapp: WhatsAppConfig::default(),
        }
    }
}

impl ManualBotConfig {
    /// Load config from the default path (~/.manualbot/config.toml).
    pub fn load() -> Result<Self> {
        let path = Self::default_path();
        if path.exists() {
            Self::load_from(&path)
        } else {
            Ok(Self::default())
        }
    }

    /// Load config from a specific path.
    pub fn load_from(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| crate::error::ManualBotError::Config(format!("Failed to read config: {e}")))?;
        let config: Self = toml::from_str(&content)
            .map_err(|e| crate::error::ManualBotError::Config(format!("Failed to parse config: {e}")))?;
        Ok(config)
    }

    /// Save config to the default path.
    pub fn save(&self) -> Result<()> {
        let path = Self::default_path();
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self)
            .map_err(|e| crate::error::ManualBotError::Config(format!("Failed to serialize config: {e}")))?;
        std::fs::write(&path, content)?;
        Ok(())
    }

    /// Get the default config path.
    pub fn default_path() -> PathBuf {
        Self::home_dir().join("config.toml")
    }

    /// Get the ManualBot home directory.
    pub fn home_dir() -> PathBuf {
        dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(".manualbot")
    }

    /// Resolve the Gemini API key: config field first, then env vars.
    /// `None` means the fatal startup precondition is not met.
    pub fn resolve_api_key(&self) -> Option<String> {
        if !self.api_key.is_empty() {
            return Some(self.api_key.clone());
        }
        API_KEY_ENV_VARS
            .iter()
            .find_map(|key| std::env::var(key).ok())
            .filter(|v| !v.is_empty())
    }

    /// The docs directory with `~` expanded.
    pub fn docs_path(&self) -> PathBuf {
        PathBuf::from(shellexpand::tilde(&self.docs_dir).to_string())
    }
}

/// Webhook gateway configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GatewayConfig {
    #[serde(default = "default_port")]
    pub port: u16,
    #[serde(default = "default_host")]
    pub host: String,
}

fn default_port() -> u16 { 3000 }
fn default_host() -> String { "127.0.0.1".into() }

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            port: default_port(),
            host: default_host(),
        }
    }
}

/// WhatsApp Business Cloud API configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct WhatsAppConfig {
    /// Facebook Graph API access token.
    #[serde(default)]
    pub access_token: String,
    /// WhatsApp Phone Number ID.
    #[serde(default)]
    pub phone_number_id: String,
    /// Token Meta echoes back during the webhook verification handshake.
    #[serde(default)]
    pub webhook_verify_token: String,
}
