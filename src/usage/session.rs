// src/usage/session.rs — Per-caller quota state

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::plan::{PlanTier, QuotaLimits};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Session {
    pub id: String,
    pub tokens_used: u64,
    pub calls_used: u64,
    pub ai_enabled: bool,
    pub plan: PlanTier,
    pub created_at: DateTime<Utc>,
    pub last_used_at: DateTime<Utc>,
}

impl Session {
    pub fn new(id: impl Into<String>, plan: PlanTier, now: DateTime<Utc>) -> Self {
        Self {
            id: id.into(),
            tokens_used: 0,
            calls_used: 0,
            ai_enabled: false,
            plan,
            created_at: now,
            last_used_at: now,
        }
    }

    pub(crate) fn record(&mut self, tokens: u64, now: DateTime<Utc>) {
        self.tokens_used = self.tokens_used.saturating_add(tokens);
        self.calls_used = self.calls_used.saturating_add(1);
        self.last_used_at = now;
    }

    pub fn tokens_exhausted(&self, limits: QuotaLimits) -> bool {
        self.tokens_used >= limits.max_tokens
    }

    pub fn calls_exhausted(&self, limits: QuotaLimits) -> bool {
        self.calls_used >= limits.max_calls
    }
}

/// Snapshot of a session's consumption against its plan.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UsageStats {
    pub session_id: String,
    pub plan: PlanTier,
    pub tokens_used: u64,
    pub tokens_remaining: u64,
    pub tokens_limit: u64,
    pub calls_used: u64,
    pub calls_remaining: u64,
    pub calls_limit: u64,
    pub ai_enabled: bool,
    /// Opted in and strictly under both limits.
    pub ai_active: bool,
    pub token_usage_percentage: f64,
    pub call_usage_percentage: f64,
    pub created_at: DateTime<Utc>,
    pub last_used_at: DateTime<Utc>,
}

impl UsageStats {
    pub fn from_session(session: &Session, limits: QuotaLimits) -> Self {
        Self {
            session_id: session.id.clone(),
            plan: session.plan,
            tokens_used: session.tokens_used,
            tokens_remaining: limits.max_tokens.saturating_sub(session.tokens_used),
            tokens_limit: limits.max_tokens,
            calls_used: session.calls_used,
            calls_remaining: limits.max_calls.saturating_sub(session.calls_used),
            calls_limit: limits.max_calls,
            ai_enabled: session.ai_enabled,
            ai_active: session.ai_enabled
                && !session.tokens_exhausted(limits)
                && !session.calls_exhausted(limits),
            token_usage_percentage: percentage(session.tokens_used, limits.max_tokens),
            call_usage_percentage: percentage(session.calls_used, limits.max_calls),
            created_at: session.created_at,
            last_used_at: session.last_used_at,
        }
    }
}

fn percentage(used: u64, limit: u64) -> f64 {
    if limit == 0 {
        return 100.0;
    }
    (used as f64 / limit as f64 * 100.0).min(100.0)
}
