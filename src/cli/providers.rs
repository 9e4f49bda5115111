// src/cli/providers.rs — Provider and tip listings

use crate::coach::FallbackAnalyzer;
use crate::infra::config::Config;
use crate::provider::retry::BackoffPolicy;
use crate::provider::ProviderRegistry;

pub fn show_providers(config: &Config) -> anyhow::Result<()> {
    let registry = ProviderRegistry::from_config(&config.providers)?;

    println!("Providers (attempt order):");
    for p in registry.iter() {
        let status = if registry.is_available(p) {
            "available"
        } else {
            "unavailable"
        };
        println!(
            "  {:>3}  {:<10} {:<12} {} attempts, {}s timeout  {}",
            p.priority,
            p.name,
            status,
            p.max_retries,
            p.timeout.as_secs(),
            p.endpoint
        );
    }

    let backoff = BackoffPolicy::new(config.providers.base_delay());
    println!();
    println!(
        "  Worst-case latency: {}s",
        registry.worst_case_latency(&backoff).as_secs()
    );
    Ok(())
}

pub fn show_tips() {
    for (i, tip) in FallbackAnalyzer::new().coaching_tips().iter().enumerate() {
        println!("{:>2}. {tip}", i + 1);
    }
}
