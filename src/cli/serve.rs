// src/cli/serve.rs — HTTP server with background session expiry

use std::sync::Arc;
use std::time::Duration;

use tokio::task::JoinHandle;

use crate::api::{self, ApiState};
use crate::core::ScenarioAnalysisService;
use crate::infra::config::{Config, UsageConfig};
use crate::usage::UsageLedger;

pub async fn run_serve(
    mut config: Config,
    host: Option<String>,
    port: Option<u16>,
) -> anyhow::Result<()> {
    if let Some(host) = host {
        config.server.host = host;
    }
    if let Some(port) = port {
        config.server.port = port;
    }

    let service = Arc::new(ScenarioAnalysisService::from_config(&config)?);
    let state = ApiState::new(service.clone(), &config.server);
    tracing::info!(
        providers = service.client().registry().len(),
        deadline_secs = state.deadline.as_secs(),
        "Scenario service ready"
    );

    let sweeper = spawn_sweeper(service.ledger().clone(), &config.usage);
    let result = api::start_server(&config.server, state).await;
    sweeper.abort();
    result
}

/// Periodically drop idle sessions. The first tick fires immediately and is
/// skipped.
pub fn spawn_sweeper(ledger: Arc<UsageLedger>, usage: &UsageConfig) -> JoinHandle<()> {
    let period = Duration::from_secs(usage.sweep_interval_secs.max(1));
    let max_age_hours = usage.session_max_age_hours;

    tokio::spawn(async move {
        let mut interval = tokio::time::interval(period);
        interval.tick().await;
        loop {
            interval.tick().await;
            let removed = ledger.sweep_expired(max_age_hours);
            tracing::debug!(removed, active = ledger.len(), "Session sweep complete");
        }
    })
}
