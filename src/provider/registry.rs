// src/provider/registry.rs — Immutable, priority-ordered provider set

use std::collections::HashSet;
use std::sync::Arc;
use std::time::Duration;

use super::anthropic::AnthropicAdapter;
use super::openai::OpenAIAdapter;
use super::primary::PrimaryAdapter;
use super::retry::BackoffPolicy;
use super::ProviderDescriptor;
use crate::infra::config::{ProviderEntry, ProvidersConfig};
use crate::infra::errors::LucidraError;

#[derive(Debug)]
pub struct ProviderRegistry {
    /// Sorted by ascending priority; equal priorities keep insertion order.
    providers: Vec<ProviderDescriptor>,
}

impl ProviderRegistry {
    pub fn new(mut providers: Vec<ProviderDescriptor>) -> Result<Self, LucidraError> {
        if providers.is_empty() {
            return Err(LucidraError::NoProvidersConfigured);
        }
        let mut seen = HashSet::new();
        for p in &providers {
            if !seen.insert(p.name.as_str()) {
                return Err(LucidraError::DuplicateProvider {
                    name: p.name.clone(),
                });
            }
        }
        providers.sort_by_key(|p| p.priority);
        Ok(Self { providers })
    }

    /// Build the standard three-provider registry from config. Disabled
    /// entries are left out entirely.
    pub fn from_config(config: &ProvidersConfig) -> Result<Self, LucidraError> {
        let mut providers = Vec::new();

        if config.primary.enabled {
            providers.push(describe(
                "primary",
                config,
                &config.primary,
                Arc::new(PrimaryAdapter::new(true)),
            ));
        }
        if config.openai.enabled {
            let mut adapter = OpenAIAdapter::new(config.openai_api_key.clone());
            if let Some(model) = &config.openai.model {
                adapter = adapter.with_model(model.clone());
            }
            providers.push(describe("openai", config, &config.openai, Arc::new(adapter)));
        }
        if config.anthropic.enabled {
            let mut adapter = AnthropicAdapter::new(config.anthropic_api_key.clone());
            if let Some(model) = &config.anthropic.model {
                adapter = adapter.with_model(model.clone());
            }
            providers.push(describe(
                "anthropic",
                config,
                &config.anthropic,
                Arc::new(adapter),
            ));
        }

        Self::new(providers)
    }

    /// Providers in attempt order. A `preferred` name that matches a
    /// registered provider moves it to the front; anything else is ignored.
    pub fn list_ordered(&self, preferred: Option<&str>) -> Vec<&ProviderDescriptor> {
        let mut ordered: Vec<&ProviderDescriptor> = self.providers.iter().collect();
        if let Some(name) = preferred {
            if let Some(idx) = ordered.iter().position(|p| p.name == name) {
                let chosen = ordered.remove(idx);
                ordered.insert(0, chosen);
            }
        }
        ordered
    }

    pub fn is_available(&self, provider: &ProviderDescriptor) -> bool {
        !provider.endpoint.trim().is_empty() && provider.adapter.is_available()
    }

    pub fn get(&self, name: &str) -> Option<&ProviderDescriptor> {
        self.providers.iter().find(|p| p.name == name)
    }

    pub fn iter(&self) -> impl Iterator<Item = &ProviderDescriptor> {
        self.providers.iter()
    }

    pub fn len(&self) -> usize {
        self.providers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.providers.is_empty()
    }

    /// Upper bound on one orchestration run: every available provider
    /// timing out on every attempt, plus the backoff sleeps in between.
    pub fn worst_case_latency(&self, backoff: &BackoffPolicy) -> Duration {
        self.providers
            .iter()
            .filter(|p| self.is_available(p))
            .map(|p| p.timeout * p.max_retries + backoff.total_delay(p.max_retries))
            .sum()
    }
}

fn describe(
    name: &str,
    config: &ProvidersConfig,
    entry: &ProviderEntry,
    adapter: Arc<dyn super::ProviderAdapter>,
) -> ProviderDescriptor {
    ProviderDescriptor::new(name, entry.endpoint.clone(), entry.priority, adapter)
        .with_timeout(config.timeout_for(entry))
        .with_max_retries(config.max_retries_for(entry))
}
