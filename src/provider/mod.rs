// src/provider/mod.rs — AI provider layer

pub mod anthropic;
pub mod openai;
pub mod orchestrator;
pub mod primary;
pub mod registry;
pub mod retry;
pub mod transport;

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use crate::infra::errors::ProviderError;

pub use orchestrator::{AnalysisText, OrchestrationClient};
pub use registry::ProviderRegistry;
pub use transport::{HttpTransport, ReqwestTransport};

/// Wire contract of a single provider. Adding a provider means adding one
/// implementation of this trait.
pub trait ProviderAdapter: Send + Sync {
    /// Whether the provider is configured well enough to be called. Must be
    /// cheap and free of side effects; it runs before every attempt.
    fn is_available(&self) -> bool;

    fn build_request(&self, scenario: &str) -> ProviderRequest;

    fn extract_text(&self, body: &serde_json::Value) -> Result<String, ProviderError>;
}

/// An outbound JSON POST, minus the endpoint (which lives on the descriptor).
#[derive(Debug, Clone, PartialEq)]
pub struct ProviderRequest {
    pub headers: Vec<(String, String)>,
    pub body: serde_json::Value,
}

impl ProviderRequest {
    pub fn new(body: serde_json::Value) -> Self {
        Self {
            headers: Vec::new(),
            body,
        }
    }

    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }
}

/// One registered backend. Immutable after startup.
#[derive(Clone)]
pub struct ProviderDescriptor {
    pub name: String,
    pub endpoint: String,
    /// Lower is tried first.
    pub priority: i32,
    pub timeout: Duration,
    /// Total attempts allowed for this provider, including the first.
    pub max_retries: u32,
    pub adapter: Arc<dyn ProviderAdapter>,
}

impl ProviderDescriptor {
    pub fn new(
        name: impl Into<String>,
        endpoint: impl Into<String>,
        priority: i32,
        adapter: Arc<dyn ProviderAdapter>,
    ) -> Self {
        Self {
            name: name.into(),
            endpoint: endpoint.into(),
            priority,
            timeout: Duration::from_secs(30),
            max_retries: 2,
            adapter,
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_max_retries(mut self, max_retries: u32) -> Self {
        self.max_retries = max_retries.max(1);
        self
    }
}

impl fmt::Debug for ProviderDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ProviderDescriptor")
            .field("name", &self.name)
            .field("endpoint", &self.endpoint)
            .field("priority", &self.priority)
            .field("timeout", &self.timeout)
            .field("max_retries", &self.max_retries)
            .finish_non_exhaustive()
    }
}

/// Pull a non-empty string out of a JSON body, or report what was missing.
pub(crate) fn non_empty_text(value: Option<&str>, what: &str) -> Result<String, ProviderError> {
    match value.map(str::trim) {
        Some(text) if !text.is_empty() => Ok(text.to_string()),
        Some(_) => Err(ProviderError::malformed(format!("{what} is empty"))),
        None => Err(ProviderError::malformed(format!("{what} missing"))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Dummy;

    impl ProviderAdapter for Dummy {
        fn is_available(&self) -> bool {
            true
        }

        fn build_request(&self, scenario: &str) -> ProviderRequest {
            ProviderRequest::new(serde_json::json!({ "q": scenario }))
        }

        fn extract_text(&self, _body: &serde_json::Value) -> Result<String, ProviderError> {
            Ok("ok".into())
        }
    }

    #[test]
    fn test_request_builder_headers() {
        let req = ProviderRequest::new(serde_json::json!({}))
            .header("x-api-key", "k")
            .header("content-type", "application/json");
        assert_eq!(req.headers.len(), 2);
        assert_eq!(req.headers[0], ("x-api-key".to_string(), "k".to_string()));
    }

    #[test]
    fn test_descriptor_retries_never_zero() {
        let d = ProviderDescriptor::new("d", "http://x", 1, Arc::new(Dummy)).with_max_retries(0);
        assert_eq!(d.max_retries, 1);
    }

    #[test]
    fn test_descriptor_debug_omits_adapter() {
        let d = ProviderDescriptor::new("d", "http://x", 1, Arc::new(Dummy));
        let debug = format!("{d:?}");
        assert!(debug.contains("\"d\""));
        assert!(!debug.contains("adapter"));
    }

    #[test]
    fn test_non_empty_text() {
        assert_eq!(non_empty_text(Some(" hi "), "x").unwrap(), "hi");
        assert!(matches!(
            non_empty_text(Some("  "), "x"),
            Err(ProviderError::Malformed(_))
        ));
        assert!(matches!(
            non_empty_text(None, "x"),
            Err(ProviderError::Malformed(m)) if m == "x missing"
        ));
    }
}
