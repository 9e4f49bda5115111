// src/provider/anthropic.rs — Anthropic Messages API adapter

use super::{ProviderAdapter, ProviderRequest};
use crate::infra::errors::ProviderError;

const DEFAULT_MODEL: &str = "claude-3-sonnet-20240229";
const API_VERSION: &str = "2023-06-01";

pub struct AnthropicAdapter {
    api_key: Option<String>,
    model: String,
}

impl AnthropicAdapter {
    pub fn new(api_key: Option<String>) -> Self {
        Self {
            api_key,
            model: DEFAULT_MODEL.into(),
        }
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }
}

impl ProviderAdapter for AnthropicAdapter {
    fn is_available(&self) -> bool {
        self.api_key.as_deref().is_some_and(|k| !k.is_empty())
    }

    fn build_request(&self, scenario: &str) -> ProviderRequest {
        let body = serde_json::json!({
            "model": self.model,
            "max_tokens": 1000,
            "messages": [{
                "role": "user",
                "content": format!(
                    "As a strategic business analyst, analyze this scenario and provide comprehensive insights: {scenario}"
                ),
            }],
        });
        ProviderRequest::new(body)
            .header("x-api-key", self.api_key.as_deref().unwrap_or_default())
            .header("anthropic-version", API_VERSION)
    }

    fn extract_text(&self, body: &serde_json::Value) -> Result<String, ProviderError> {
        let blocks = body["content"]
            .as_array()
            .ok_or_else(|| ProviderError::malformed("content missing"))?;

        let text = blocks
            .iter()
            .filter(|c| c["type"] == "text")
            .filter_map(|c| c["text"].as_str())
            .collect::<Vec<_>>()
            .join("");

        if text.trim().is_empty() {
            return Err(ProviderError::malformed("no text blocks in content"));
        }
        Ok(text.trim().to_string())
    }
}
