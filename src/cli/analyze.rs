// src/cli/analyze.rs — One-shot scenario analysis

use crate::core::{AnalysisOutcome, ScenarioAnalysisService};
use crate::infra::config::Config;
use crate::usage::{PlanTier, UsageLedger};

pub async fn run_analyze(
    config: &Config,
    scenario: &str,
    provider: Option<&str>,
    plan: PlanTier,
    opt_in: bool,
    json: bool,
) -> anyhow::Result<()> {
    let service = ScenarioAnalysisService::from_config(config)?;

    let session_id = UsageLedger::generate_session_id();
    service.ledger().create_session(&session_id, plan)?;
    if opt_in {
        service.opt_in(&session_id);
    }

    let outcome = service.analyze_scenario(&session_id, scenario, provider).await;

    if json {
        println!("{}", serde_json::to_string_pretty(&outcome)?);
    } else {
        print_outcome(&outcome);
    }
    Ok(())
}

fn print_outcome(outcome: &AnalysisOutcome) {
    if outcome.used_ai {
        println!("[{}]", outcome.provider);
    } else {
        println!("[{}: {}]", outcome.provider, outcome.reason);
    }
    println!();
    println!("{}", outcome.analysis);

    if let Some(ref fb) = outcome.fallback {
        println!();
        println!(
            "Category: {}  (confidence: {:?})",
            fb.primary_category, fb.confidence
        );
        print_section("Recommendations", &fb.recommendations);
        print_section("Risk factors", &fb.risk_factors);
        print_section("Opportunities", &fb.opportunities);
        print_section("Next steps", &fb.next_steps);
    }

    let usage = &outcome.usage;
    println!();
    println!(
        "Usage: {}/{} tokens, {}/{} calls ({} plan)",
        usage.tokens_used, usage.tokens_limit, usage.calls_used, usage.calls_limit, usage.plan
    );
}

fn print_section(title: &str, items: &[String]) {
    println!();
    println!("{title}:");
    for item in items {
        println!("  - {item}");
    }
}
