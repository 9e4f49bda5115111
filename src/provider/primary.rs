// src/provider/primary.rs — Self-hosted scenario analysis service
//
// POST {"scenario": ...} → {"ai_analysis": ...}. Needs no credential.

use super::{non_empty_text, ProviderAdapter, ProviderRequest};
use crate::infra::errors::ProviderError;

pub struct PrimaryAdapter {
    enabled: bool,
}

impl PrimaryAdapter {
    pub fn new(enabled: bool) -> Self {
        Self { enabled }
    }
}

impl ProviderAdapter for PrimaryAdapter {
    fn is_available(&self) -> bool {
        self.enabled
    }

    fn build_request(&self, scenario: &str) -> ProviderRequest {
        ProviderRequest::new(serde_json::json!({ "scenario": scenario }))
    }

    fn extract_text(&self, body: &serde_json::Value) -> Result<String, ProviderError> {
        non_empty_text(body["ai_analysis"].as_str(), "ai_analysis")
    }
}
