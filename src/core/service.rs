// src/core/service.rs — Quota gate → orchestration → fallback decision protocol
//
// `analyze_scenario` has two terminal paths (AI text or fallback analysis)
// and no error path. AI is an optimization, never a dependency.

use std::sync::Arc;

use serde::Serialize;

use super::cost::{CharRatioEstimator, TokenEstimator};
use crate::coach::{FallbackAnalysis, FallbackAnalyzer};
use crate::infra::config::Config;
use crate::infra::errors::LucidraError;
use crate::provider::retry::BackoffPolicy;
use crate::provider::{OrchestrationClient, ProviderRegistry, ReqwestTransport};
use crate::usage::{AiAccess, UsageLedger, UsageStats};

/// Provider name reported when the analysis came from the fallback path.
pub const FALLBACK_PROVIDER: &str = "fallback";

/// Reason reported when AI was permitted but no provider produced a result.
pub const PROVIDERS_UNAVAILABLE: &str = "AI providers unavailable";

#[derive(Debug, Clone, Serialize)]
pub struct AnalysisOutcome {
    pub analysis: String,
    pub used_ai: bool,
    /// Name of the provider that produced `analysis`, or `FALLBACK_PROVIDER`.
    pub provider: String,
    /// Snapshot taken after this request was accounted for.
    pub usage: UsageStats,
    pub reason: String,
    /// Full structured analysis when the fallback path ran.
    pub fallback: Option<FallbackAnalysis>,
}

pub struct ScenarioAnalysisService {
    ledger: Arc<UsageLedger>,
    client: OrchestrationClient,
    fallback: FallbackAnalyzer,
    estimator: Arc<dyn TokenEstimator>,
}

impl ScenarioAnalysisService {
    pub fn new(ledger: Arc<UsageLedger>, client: OrchestrationClient) -> Self {
        Self {
            ledger,
            client,
            fallback: FallbackAnalyzer::new(),
            estimator: Arc::new(CharRatioEstimator::default()),
        }
    }

    /// Wire the production stack from config: registry, reqwest transport,
    /// configured backoff and plan limits. Fails only when no provider is
    /// configured at all.
    pub fn from_config(config: &Config) -> Result<Self, LucidraError> {
        let registry = Arc::new(ProviderRegistry::from_config(&config.providers)?);
        let client = OrchestrationClient::new(registry, Arc::new(ReqwestTransport::new()))
            .with_backoff(BackoffPolicy::new(config.providers.base_delay()));
        let ledger = Arc::new(UsageLedger::new(config.usage.plans.to_limits()));

        Ok(Self::new(ledger, client).with_estimator(Arc::new(CharRatioEstimator::new(
            config.usage.chars_per_token,
        ))))
    }

    pub fn with_estimator(mut self, estimator: Arc<dyn TokenEstimator>) -> Self {
        self.estimator = estimator;
        self
    }

    pub fn ledger(&self) -> &Arc<UsageLedger> {
        &self.ledger
    }

    pub fn client(&self) -> &OrchestrationClient {
        &self.client
    }

    /// Gate, then AI, then fallback. Never fails.
    ///
    /// The gate check and the charge are separate steps. Concurrent requests
    /// on one session that all pass the gate are each charged, so the plan
    /// limits are a soft ceiling under concurrency; sequential requests never
    /// exceed them and individual increments never race.
    pub async fn analyze_scenario(
        &self,
        session_id: &str,
        scenario: &str,
        preferred: Option<&str>,
    ) -> AnalysisOutcome {
        self.ledger.ensure_session(session_id);

        let access = self.ledger.can_use_ai(session_id);
        if !access.can_use {
            tracing::debug!(session_id, reason = %access.status(), "AI gated, using fallback");
            return self.fallback_outcome(session_id, scenario, &access.status());
        }

        match self.client.analyze(scenario, preferred).await {
            Ok(result) => {
                let tokens = self.estimator.estimate(scenario, &result.text);
                self.ledger.record_usage(session_id, tokens);
                tracing::info!(
                    session_id,
                    provider = %result.provider,
                    attempts = result.attempts,
                    tokens,
                    "Scenario analyzed with AI"
                );
                AnalysisOutcome {
                    analysis: result.text,
                    used_ai: true,
                    provider: result.provider,
                    usage: self.ledger.ensure_usage_stats(session_id),
                    reason: access.status(),
                    fallback: None,
                }
            }
            Err(e) => {
                tracing::info!(session_id, "Falling back to keyword analysis: {}", e);
                self.fallback_outcome(session_id, scenario, PROVIDERS_UNAVAILABLE)
            }
        }
    }

    /// Run the fallback analyzer without touching quota. Also used by the
    /// HTTP layer when a request deadline elapses.
    pub fn fallback_outcome(
        &self,
        session_id: &str,
        scenario: &str,
        reason: &str,
    ) -> AnalysisOutcome {
        let analysis = self.fallback.analyze(scenario);
        AnalysisOutcome {
            analysis: analysis.analysis.clone(),
            used_ai: false,
            provider: FALLBACK_PROVIDER.to_string(),
            usage: self.ledger.ensure_usage_stats(session_id),
            reason: reason.to_string(),
            fallback: Some(analysis),
        }
    }

    pub fn usage_stats(&self, session_id: &str) -> UsageStats {
        self.ledger.ensure_usage_stats(session_id)
    }

    pub fn opt_in(&self, session_id: &str) -> bool {
        self.ledger.ensure_session(session_id);
        self.ledger.opt_in(session_id)
    }

    pub fn opt_out(&self, session_id: &str) -> bool {
        self.ledger.ensure_session(session_id);
        self.ledger.opt_out(session_id)
    }

    pub fn can_use_ai(&self, session_id: &str) -> AiAccess {
        self.ledger.can_use_ai(session_id)
    }

    pub fn coaching_tips(&self) -> Vec<String> {
        self.fallback.coaching_tips()
    }

    pub fn upgrade_message(&self, session_id: &str) -> &'static str {
        let plan = self.ledger.ensure_session(session_id).plan;
        self.fallback.upgrade_message(plan)
    }
}
