//! Gemini provider — Google Generative Language API `generateContent`.
//!
//! One request per question: the knowledge context travels as the
//! `system_instruction`, the question as the single user turn. No streaming,
//! no retries; callers decide what a failure means.

use async_trait::async_trait;
use manualbot_core::config::ManualBotConfig;
use manualbot_core::error::{ManualBotError, Result};
use manualbot_core::traits::Provider;
use serde_json::{Value, json};

const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";

/// Client for the Gemini `generateContent` endpoint.
pub struct GeminiProvider {
    api_key: String,
    base_url: String,
    model: String,
    client: reqwest::Client,
}

impl GeminiProvider {
    /// Build from config. Missing API key is the fatal startup precondition.
    pub fn from_config(config: &ManualBotConfig) -> Result<Self> {
        let api_key = config
            .resolve_api_key()
            .ok_or(ManualBotError::ApiKeyMissing)?;

        Ok(Self {
            api_key,
            base_url: DEFAULT_BASE_URL.to_string(),
            model: config.model.clone(),
            client: reqwest::Client::new(),
        })
    }

    #[cfg(test)]
    fn for_tests(model: &str) -> Self {
        Self {
            api_key: "test-key".into(),
            base_url: DEFAULT_BASE_URL.into(),
            model: model.into(),
            client: reqwest::Client::new(),
        }
    }

    fn request_url(&self) -> String {
        format!("{}/models/{}:generateContent", self.base_url, self.model)
    }

    /// Build the `generateContent` request body.
    fn build_request_body(system_instruction: &str, content: &str) -> Value {
        json!({
            "system_instruction": {
                "parts": [{ "text": system_instruction }]
            },
            "contents": [{
                "role": "user",
                "parts": [{ "text": content }]
            }]
        })
    }

    /// Pull the answer text out of a `generateContent` response.
    fn extract_text(response: &Value) -> Result<String> {
        response["candidates"][0]["content"]["parts"][0]["text"]
            .as_str()
            .map(String::from)
            .ok_or_else(|| ManualBotError::Provider("No candidates in response".into()))
    }
}

#[async_trait]
impl Provider for GeminiProvider {
    fn name(&self) -> &str {
        "gemini"
    }

    async fn generate(&self, system_instruction: &str, content: &str) -> Result<String> {
        let url = self.request_url();
        let body = Self::build_request_body(system_instruction, content);

        let resp = self
            .client
            .post(&url)
            .header("x-goog-api-key", &self.api_key)
            .header("Content-Type", "application/json")
            .json(&body)
            .send()
            .await
            .map_err(|e| ManualBotError::Http(format!("gemini connection failed ({url}): {e}")))?;

        if !resp.status().is_success() {
            let status = resp.status();
            let text = resp.text().await.unwrap_or_default();
            return Err(ManualBotError::Provider(format!(
                "Gemini API error {status}: {text}"
            )));
        }

        let json: Value = resp
            .json()
            .await
            .map_err(|e| ManualBotError::Http(e.to_string()))?;

        let text = Self::extract_text(&json)?;
        tracing::debug!("Gemini answered with {} chars", text.len());
        Ok(text)
    }
}
