// src/api/session.rs

use axum::http::HeaderMap;

use crate::api::ApiState;
use crate::usage::UsageLedger;

pub const SESSION_HEADER: &str = "x-session-id";

/// Response header echoing the resolved session id back to the client.
pub type SessionHeader = [(&'static str, String); 1];

/// Resolve the caller's session. A missing or unknown `X-Session-Id` gets
/// a freshly generated session; clients must keep the echoed id.
pub fn resolve_session(state: &ApiState, headers: &HeaderMap) -> String {
    let ledger = state.service.ledger();

    let supplied = headers
        .get(SESSION_HEADER)
        .and_then(|v| v.to_str().ok())
        .map(str::trim)
        .filter(|id| !id.is_empty());

    if let Some(id) = supplied {
        if ledger.get_session(id).is_some() {
            return id.to_string();
        }
        tracing::debug!(session_id = id, "Unknown session id, issuing a new one");
    }

    let id = UsageLedger::generate_session_id();
    ledger.ensure_session(&id);
    id
}

pub fn session_header(id: &str) -> SessionHeader {
    [(SESSION_HEADER, id.to_string())]
}
