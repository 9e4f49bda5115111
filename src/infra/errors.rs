// src/infra/errors.rs — Error types for Lucidra

use std::time::Duration;

use thiserror::Error;

/// A single failed provider attempt. Every variant is retryable within the
/// provider's own budget; none of them cross the orchestration boundary.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ProviderError {
    #[error("request timed out after {}ms", .0.as_millis())]
    Timeout(Duration),

    #[error("transport error: {0}")]
    Transport(String),

    #[error("HTTP {status}: {body}")]
    Status { status: u16, body: String },

    #[error("malformed response: {0}")]
    Malformed(String),
}

impl ProviderError {
    pub fn malformed(message: impl Into<String>) -> Self {
        Self::Malformed(message.into())
    }
}

/// The last error observed before orchestration gave up, tagged with the
/// provider that produced it.
#[derive(Error, Debug, Clone, PartialEq)]
#[error("{provider}: {error}")]
pub struct ProviderFailure {
    pub provider: String,
    pub error: ProviderError,
}

/// Raised by the orchestration client when no provider produced a result.
/// Callers treat it as one opaque "AI unavailable" signal; the fields exist
/// for logging.
#[derive(Error, Debug, Clone, PartialEq)]
#[error("{}", self.describe())]
pub struct AllProvidersFailed {
    /// Providers that were actually invoked, in attempt order.
    pub attempted: Vec<String>,
    /// Providers skipped because their availability check failed.
    pub skipped: Vec<String>,
    pub last_error: Option<ProviderFailure>,
}

impl AllProvidersFailed {
    fn describe(&self) -> String {
        match &self.last_error {
            Some(last) => format!(
                "all providers failed (attempted: {}); last error from {}",
                self.attempted.join(", "),
                last
            ),
            None => "no providers available".to_string(),
        }
    }

    /// True when nothing was attempted at all.
    pub fn nothing_available(&self) -> bool {
        self.attempted.is_empty()
    }
}

#[derive(Error, Debug)]
pub enum LucidraError {
    #[error("Session '{id}' already exists")]
    DuplicateSession { id: String },

    // Deployment blockers
    #[error("No AI providers configured")]
    NoProvidersConfigured,

    #[error("Provider '{name}' registered more than once")]
    DuplicateProvider { name: String },

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}
