// src/provider/orchestrator.rs — Priority-ordered provider calls with retry and fallthrough

use std::sync::Arc;

use serde::Serialize;

use super::registry::ProviderRegistry;
use super::retry::{AttemptOutcome, BackoffPolicy};
use super::transport::HttpTransport;
use super::ProviderDescriptor;
use crate::infra::errors::{AllProvidersFailed, ProviderError, ProviderFailure};

/// Text produced by a provider, and which provider produced it.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AnalysisText {
    pub text: String,
    pub provider: String,
    /// Attempts made against the winning provider, including the successful one.
    pub attempts: u32,
}

/// Walks the registry in priority order. Each provider gets up to its own
/// `max_retries` attempts with exponential backoff between them; the first
/// non-empty response wins.
#[derive(Clone)]
pub struct OrchestrationClient {
    registry: Arc<ProviderRegistry>,
    transport: Arc<dyn HttpTransport>,
    backoff: BackoffPolicy,
}

impl OrchestrationClient {
    pub fn new(registry: Arc<ProviderRegistry>, transport: Arc<dyn HttpTransport>) -> Self {
        Self {
            registry,
            transport,
            backoff: BackoffPolicy::default(),
        }
    }

    pub fn with_backoff(mut self, backoff: BackoffPolicy) -> Self {
        self.backoff = backoff;
        self
    }

    pub fn registry(&self) -> &ProviderRegistry {
        &self.registry
    }

    pub fn backoff(&self) -> &BackoffPolicy {
        &self.backoff
    }

    pub async fn analyze(
        &self,
        scenario: &str,
        preferred: Option<&str>,
    ) -> Result<AnalysisText, AllProvidersFailed> {
        let mut attempted = Vec::new();
        let mut skipped = Vec::new();
        let mut last_error = None;

        for provider in self.registry.list_ordered(preferred) {
            if !self.registry.is_available(provider) {
                tracing::info!(provider = %provider.name, "Provider unavailable, skipping");
                skipped.push(provider.name.clone());
                continue;
            }
            attempted.push(provider.name.clone());

            match self.try_provider(provider, scenario).await {
                Ok(text) => return Ok(text),
                Err(error) => {
                    tracing::warn!(
                        provider = %provider.name,
                        attempts = provider.max_retries,
                        "Provider exhausted, falling through: {}",
                        error
                    );
                    last_error = Some(ProviderFailure {
                        provider: provider.name.clone(),
                        error,
                    });
                }
            }
        }

        let failure = AllProvidersFailed {
            attempted,
            skipped,
            last_error,
        };
        tracing::warn!("{}", failure);
        Err(failure)
    }

    async fn try_provider(
        &self,
        provider: &ProviderDescriptor,
        scenario: &str,
    ) -> Result<AnalysisText, ProviderError> {
        let mut attempt = 1;
        loop {
            let result = self.attempt(provider, scenario).await;
            match AttemptOutcome::classify(result, attempt, provider.max_retries) {
                AttemptOutcome::Success(text) => {
                    tracing::debug!(provider = %provider.name, attempt, "Provider responded");
                    return Ok(AnalysisText {
                        text,
                        provider: provider.name.clone(),
                        attempts: attempt,
                    });
                }
                AttemptOutcome::Retryable(e) => {
                    let delay = self.backoff.delay_for_attempt(attempt);
                    tracing::warn!(
                        provider = %provider.name,
                        attempt,
                        max_retries = provider.max_retries,
                        delay_ms = delay.as_millis() as u64,
                        "Attempt failed, retrying: {}",
                        e
                    );
                    if !delay.is_zero() {
                        tokio::time::sleep(delay).await;
                    }
                    attempt += 1;
                }
                AttemptOutcome::Exhausted(e) => return Err(e),
            }
        }
    }

    async fn attempt(
        &self,
        provider: &ProviderDescriptor,
        scenario: &str,
    ) -> Result<String, ProviderError> {
        let request = provider.adapter.build_request(scenario);
        let call = self
            .transport
            .post_json(&provider.endpoint, &request, provider.timeout);
        let body = tokio::time::timeout(provider.timeout, call)
            .await
            .map_err(|_| ProviderError::Timeout(provider.timeout))??;
        provider.adapter.extract_text(&body)
    }
}
