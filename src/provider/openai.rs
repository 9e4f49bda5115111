// src/provider/openai.rs — OpenAI Chat Completions adapter

use super::{non_empty_text, ProviderAdapter, ProviderRequest};
use crate::infra::errors::ProviderError;

const SYSTEM_PROMPT: &str = "You are a strategic business analyst. Analyze the given scenario and provide comprehensive insights including risks, opportunities, and recommendations.";
const DEFAULT_MODEL: &str = "gpt-4";

pub struct OpenAIAdapter {
    api_key: Option<String>,
    model: String,
}

impl OpenAIAdapter {
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

impl ProviderAdapter for OpenAIAdapter {
    fn is_available(&self) -> bool {
        self.api_key.as_deref().is_some_and(|k| !k.is_empty())
    }

    fn build_request(&self, scenario: &str) -> ProviderRequest {
        let body = serde_json::json!({
            "model": self.model,
            "messages": [
                { "role": "system", "content": SYSTEM_PROMPT },
                { "role": "user", "content": format!("Analyze this business scenario: {scenario}") },
            ],
            "max_tokens": 1000,
            "temperature": 0.7,
        });
        ProviderRequest::new(body).header(
            "authorization",
            format!("Bearer {}", self.api_key.as_deref().unwrap_or_default()),
        )
    }

    fn extract_text(&self, body: &serde_json::Value) -> Result<String, ProviderError> {
        non_empty_text(
            body["choices"][0]["message"]["content"].as_str(),
            "choices[0].message.content",
        )
    }
}
