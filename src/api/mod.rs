// src/api/mod.rs — HTTP surface for scenario analysis

pub mod handlers;
pub mod session;
pub mod types;

use std::sync::Arc;
use std::time::Duration;

use axum::http::HeaderName;
use axum::routing::{get, post};
use axum::Router;
use tower_http::cors::{Any, CorsLayer};

use crate::core::ScenarioAnalysisService;
use crate::infra::config::ServerConfig;
pub use types::SuggestRequest;

/// Shared state for API handlers.
#[derive(Clone)]
pub struct ApiState {
    pub service: Arc<ScenarioAnalysisService>,
    /// Upper bound on one `/suggest` request, after which the fallback
    /// analysis is returned instead.
    pub deadline: Duration,
}

impl ApiState {
    /// State whose deadline is the configured override, or else the
    /// registry's worst-case retry latency.
    pub fn new(service: Arc<ScenarioAnalysisService>, config: &ServerConfig) -> Self {
        let deadline = match config.request_deadline_secs {
            Some(secs) => Duration::from_secs(secs),
            None => {
                let client = service.client();
                client.registry().worst_case_latency(client.backoff())
            }
        };
        Self { service, deadline }
    }
}

/// Build the axum router with all API routes.
pub fn build_router(state: ApiState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any)
        .expose_headers([HeaderName::from_static(session::SESSION_HEADER)]);

    Router::new()
        .route("/api/scenario/suggest", post(handlers::suggest))
        .route("/api/scenario/opt-in", post(handlers::opt_in))
        .route("/api/scenario/opt-out", post(handlers::opt_out))
        .route("/api/scenario/usage", get(handlers::usage))
        .route("/api/scenario/coaching-tips", get(handlers::coaching_tips))
        .route("/health", get(handlers::health))
        .layer(cors)
        .with_state(state)
}

/// Serve the API until Ctrl-C.
pub async fn start_server(config: &ServerConfig, state: ApiState) -> anyhow::Result<()> {
    let addr = format!("{}:{}", config.host, config.port);
    let router = build_router(state);

    tracing::info!("API server listening on http://{addr}");
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, router)
        .with_graceful_shutdown(async {
            let _ = tokio::signal::ctrl_c().await;
            tracing::info!("Shutting down");
        })
        .await?;
    Ok(())
}
