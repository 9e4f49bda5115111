// src/usage/ledger.rs — Per-session AI quota accounting
//
// The session table is the only mutable state shared across requests. The
// map itself sits behind an RwLock that is write-locked only to insert or
// remove sessions; each session has its own Mutex, so increments for one
// session serialize while different sessions never contend.

use std::collections::HashMap;
use std::fmt;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError, RwLock};

use chrono::Duration as ChronoDuration;
use serde::Serialize;

use super::plan::{PlanLimits, PlanTier};
use super::session::{Session, UsageStats};
use crate::infra::clock::{Clock, SystemClock};
use crate::infra::errors::LucidraError;

/// Why a session may not spend AI quota right now.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case", tag = "kind")]
pub enum Denial {
    NoSession,
    NotOptedIn,
    TokenQuotaExhausted { limit: u64 },
    CallQuotaExhausted { limit: u64 },
}

impl fmt::Display for Denial {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Denial::NoSession => f.write_str("no session"),
            Denial::NotOptedIn => f.write_str("not opted in"),
            Denial::TokenQuotaExhausted { limit } => {
                write!(f, "token quota exhausted ({limit} tokens)")
            }
            Denial::CallQuotaExhausted { limit } => {
                write!(f, "call quota exhausted ({limit} calls)")
            }
        }
    }
}

/// Outcome of the AI gate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct AiAccess {
    pub can_use: bool,
    pub reason: Option<Denial>,
}

impl AiAccess {
    fn allowed() -> Self {
        Self {
            can_use: true,
            reason: None,
        }
    }

    fn denied(reason: Denial) -> Self {
        Self {
            can_use: false,
            reason: Some(reason),
        }
    }

    /// Human-readable status: the denial reason, or "Available".
    pub fn status(&self) -> String {
        match self.reason {
            Some(reason) => reason.to_string(),
            None => "Available".to_string(),
        }
    }
}

type SessionCell = Arc<Mutex<Session>>;

pub struct UsageLedger {
    sessions: RwLock<HashMap<String, SessionCell>>,
    limits: PlanLimits,
    clock: Arc<dyn Clock>,
}

impl Default for UsageLedger {
    fn default() -> Self {
        Self::new(PlanLimits::default())
    }
}

impl UsageLedger {
    pub fn new(limits: PlanLimits) -> Self {
        Self::with_clock(limits, Arc::new(SystemClock))
    }

    pub fn with_clock(limits: PlanLimits, clock: Arc<dyn Clock>) -> Self {
        Self {
            sessions: RwLock::new(HashMap::new()),
            limits,
            clock,
        }
    }

    pub fn limits(&self) -> &PlanLimits {
        &self.limits
    }

    /// A fresh server-assigned session identifier.
    pub fn generate_session_id() -> String {
        format!("session_{}", uuid::Uuid::new_v4().simple())
    }

    fn cell(&self, id: &str) -> Option<SessionCell> {
        self.sessions
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(id)
            .cloned()
    }

    /// Insert a zeroed session. Fails if `id` is already present.
    pub fn create_session(&self, id: &str, plan: PlanTier) -> Result<Session, LucidraError> {
        let mut sessions = self.sessions.write().unwrap_or_else(PoisonError::into_inner);
        if sessions.contains_key(id) {
            return Err(LucidraError::DuplicateSession { id: id.to_string() });
        }
        let session = Session::new(id, plan, self.clock.now());
        sessions.insert(id.to_string(), Arc::new(Mutex::new(session.clone())));
        tracing::debug!(session_id = id, plan = %plan, "Session created");
        Ok(session)
    }

    /// Look up `id`, creating a free-tier session if it doesn't exist.
    pub fn ensure_session(&self, id: &str) -> Session {
        if let Some(session) = self.get_session(id) {
            return session;
        }
        let mut sessions = self.sessions.write().unwrap_or_else(PoisonError::into_inner);
        let cell = sessions.entry(id.to_string()).or_insert_with(|| {
            tracing::debug!(session_id = id, "Session created lazily");
            Arc::new(Mutex::new(Session::new(id, PlanTier::Free, self.clock.now())))
        });
        let session = lock(cell).clone();
        session
    }

    pub fn get_session(&self, id: &str) -> Option<Session> {
        let cell = self.cell(id)?;
        let session = lock(&cell).clone();
        Some(session)
    }

    pub fn opt_in(&self, id: &str) -> bool {
        self.set_ai_enabled(id, true)
    }

    pub fn opt_out(&self, id: &str) -> bool {
        self.set_ai_enabled(id, false)
    }

    fn set_ai_enabled(&self, id: &str, enabled: bool) -> bool {
        let Some(cell) = self.cell(id) else {
            return false;
        };
        let mut session = lock(&cell);
        session.ai_enabled = enabled;
        session.last_used_at = self.clock.now();
        true
    }

    /// Gate in fixed priority order: no session, not opted in, token quota,
    /// call quota.
    pub fn can_use_ai(&self, id: &str) -> AiAccess {
        let Some(cell) = self.cell(id) else {
            return AiAccess::denied(Denial::NoSession);
        };
        let session = lock(&cell);
        let limits = self.limits.get(session.plan);

        if !session.ai_enabled {
            AiAccess::denied(Denial::NotOptedIn)
        } else if session.tokens_exhausted(limits) {
            AiAccess::denied(Denial::TokenQuotaExhausted {
                limit: limits.max_tokens,
            })
        } else if session.calls_exhausted(limits) {
            AiAccess::denied(Denial::CallQuotaExhausted {
                limit: limits.max_calls,
            })
        } else {
            AiAccess::allowed()
        }
    }

    /// Charge one successful provider response. Returns false for an
    /// unknown session.
    pub fn record_usage(&self, id: &str, tokens: u64) -> bool {
        let Some(cell) = self.cell(id) else {
            return false;
        };
        let mut session = lock(&cell);
        session.record(tokens, self.clock.now());
        tracing::debug!(
            session_id = id,
            tokens,
            tokens_used = session.tokens_used,
            calls_used = session.calls_used,
            "Usage recorded"
        );
        true
    }

    pub fn usage_stats(&self, id: &str) -> Option<UsageStats> {
        let cell = self.cell(id)?;
        let session = lock(&cell);
        Some(UsageStats::from_session(&session, self.limits.get(session.plan)))
    }

    /// Stats for `id`, creating the session first if needed.
    pub fn ensure_usage_stats(&self, id: &str) -> UsageStats {
        let session = self.ensure_session(id);
        UsageStats::from_session(&session, self.limits.get(session.plan))
    }

    /// Drop sessions idle for longer than `max_age_hours`. Returns how many
    /// were removed.
    pub fn sweep_expired(&self, max_age_hours: u64) -> usize {
        let Some(max_age) = i64::try_from(max_age_hours)
            .ok()
            .and_then(ChronoDuration::try_hours)
        else {
            return 0;
        };
        let Some(cutoff) = self.clock.now().checked_sub_signed(max_age) else {
            return 0;
        };

        let mut sessions = self.sessions.write().unwrap_or_else(PoisonError::into_inner);
        let before = sessions.len();
        sessions.retain(|_, cell| lock(cell).last_used_at >= cutoff);
        let removed = before - sessions.len();

        if removed > 0 {
            tracing::info!(removed, remaining = sessions.len(), "Expired sessions swept");
        }
        removed
    }

    pub fn list_sessions(&self) -> Vec<Session> {
        self.sessions
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .values()
            .map(|cell| lock(cell).clone())
            .collect()
    }

    pub fn len(&self) -> usize {
        self.sessions
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

fn lock(cell: &Mutex<Session>) -> MutexGuard<'_, Session> {
    cell.lock().unwrap_or_else(PoisonError::into_inner)
}
