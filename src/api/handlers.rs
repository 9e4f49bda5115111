// src/api/handlers.rs

use axum::extract::State;
use axum::http::{HeaderMap, StatusCode};
use axum::Json;

use crate::api::session::{resolve_session, session_header, SessionHeader};
use crate::api::{types::*, ApiState};

/// Reason reported when the whole request outlived its deadline.
const DEADLINE_EXCEEDED: &str = "AI request deadline exceeded";

/// POST /api/scenario/suggest — Analyze a scenario with AI when permitted,
/// otherwise with the keyword fallback.
pub async fn suggest(
    State(state): State<ApiState>,
    headers: HeaderMap,
    Json(body): Json<SuggestRequest>,
) -> Result<(SessionHeader, Json<SuggestResponse>), (StatusCode, Json<ErrorResponse>)> {
    let scenario = body.scenario.trim();
    if scenario.is_empty() {
        return Err((
            StatusCode::BAD_REQUEST,
            Json(ErrorResponse {
                error: "Scenario is required".into(),
            }),
        ));
    }

    let session_id = resolve_session(&state, &headers);
    let service = &state.service;

    let analysis = service.analyze_scenario(&session_id, scenario, body.provider.as_deref());
    let outcome = match tokio::time::timeout(state.deadline, analysis).await {
        Ok(outcome) => outcome,
        Err(_) => {
            tracing::warn!(
                session_id = %session_id,
                deadline_ms = state.deadline.as_millis() as u64,
                "Analysis deadline exceeded, using fallback"
            );
            service.fallback_outcome(&session_id, scenario, DEADLINE_EXCEEDED)
        }
    };

    Ok((
        session_header(&session_id),
        Json(SuggestResponse {
            scenario: scenario.to_string(),
            ai_analysis: outcome.analysis,
            used_ai: outcome.used_ai,
            provider: outcome.provider,
            usage: outcome.usage,
            ai_status: outcome.reason,
            coaching: outcome.fallback,
        }),
    ))
}

/// POST /api/scenario/opt-in
pub async fn opt_in(
    State(state): State<ApiState>,
    headers: HeaderMap,
) -> (SessionHeader, Json<OptResponse>) {
    let session_id = resolve_session(&state, &headers);
    let success = state.service.opt_in(&session_id);
    (
        session_header(&session_id),
        Json(OptResponse {
            success,
            message: "AI assistance enabled. Your scenarios will be analyzed with AI while your plan allows it.".into(),
            usage: state.service.usage_stats(&session_id),
        }),
    )
}

/// POST /api/scenario/opt-out
pub async fn opt_out(
    State(state): State<ApiState>,
    headers: HeaderMap,
) -> (SessionHeader, Json<OptResponse>) {
    let session_id = resolve_session(&state, &headers);
    let success = state.service.opt_out(&session_id);
    (
        session_header(&session_id),
        Json(OptResponse {
            success,
            message: "AI assistance disabled. Scenarios will use built-in coaching analysis.".into(),
            usage: state.service.usage_stats(&session_id),
        }),
    )
}

/// GET /api/scenario/usage — Current quota position for the session.
pub async fn usage(
    State(state): State<ApiState>,
    headers: HeaderMap,
) -> (SessionHeader, Json<UsageResponse>) {
    let session_id = resolve_session(&state, &headers);
    let access = state.service.can_use_ai(&session_id);

    let upgrade_message = if access.can_use {
        None
    } else {
        Some(state.service.upgrade_message(&session_id).to_string())
    };

    (
        session_header(&session_id),
        Json(UsageResponse {
            usage: state.service.usage_stats(&session_id),
            ai_status: access.status(),
            can_use_ai: access.can_use,
            upgrade_message,
        }),
    )
}

/// GET /api/scenario/coaching-tips
pub async fn coaching_tips(State(state): State<ApiState>) -> Json<TipsResponse> {
    Json(TipsResponse {
        tips: state.service.coaching_tips(),
    })
}

/// GET /health
pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".into(),
        service: "lucidra".into(),
        version: env!("CARGO_PKG_VERSION").into(),
    })
}
