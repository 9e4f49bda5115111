// src/infra/config.rs — Configuration loading (TOML + environment overlay)

use serde::{Deserialize, Deserializer, Serialize};
use std::path::Path;
use std::time::Duration;

use crate::infra::paths;
use crate::usage::{PlanLimits, PlanTier, QuotaLimits};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,

    #[serde(default)]
    pub providers: ProvidersConfig,

    #[serde(default)]
    pub usage: UsageConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// Hard ceiling for one analysis request. When unset, the registry's
    /// worst-case retry latency is used.
    #[serde(default)]
    pub request_deadline_secs: Option<u64>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".into(),
            port: 4000,
            request_deadline_secs: None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ProvidersConfig {
    /// Applies to every provider whose table doesn't set `max_retries`.
    /// When unset, each provider keeps its built-in budget.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default_max_retries: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default_timeout_secs: Option<u64>,
    #[serde(default = "default_base_delay_ms")]
    pub base_delay_ms: u64,
    #[serde(default = "ProviderEntry::primary", deserialize_with = "primary_entry")]
    pub primary: ProviderEntry,
    #[serde(default = "ProviderEntry::openai", deserialize_with = "openai_entry")]
    pub openai: ProviderEntry,
    #[serde(default = "ProviderEntry::anthropic", deserialize_with = "anthropic_entry")]
    pub anthropic: ProviderEntry,
    /// Credentials are never read from the file; they come from the environment.
    #[serde(skip)]
    pub openai_api_key: Option<String>,
    #[serde(skip)]
    pub anthropic_api_key: Option<String>,
}

impl Default for ProvidersConfig {
    fn default() -> Self {
        Self {
            default_max_retries: None,
            default_timeout_secs: None,
            base_delay_ms: default_base_delay_ms(),
            primary: ProviderEntry::primary(),
            openai: ProviderEntry::openai(),
            anthropic: ProviderEntry::anthropic(),
            openai_api_key: None,
            anthropic_api_key: None,
        }
    }
}

impl ProvidersConfig {
    pub fn base_delay(&self) -> Duration {
        Duration::from_millis(self.base_delay_ms)
    }

    /// Entry value, then the global default, then the provider's built-in.
    pub fn max_retries_for(&self, entry: &ProviderEntry) -> u32 {
        entry
            .max_retries
            .or(self.default_max_retries)
            .unwrap_or(entry.builtin.max_retries)
            .max(1)
    }

    pub fn timeout_for(&self, entry: &ProviderEntry) -> Duration {
        let secs = entry
            .timeout_secs
            .or(self.default_timeout_secs)
            .unwrap_or(entry.builtin.timeout_secs);
        Duration::from_secs(secs)
    }
}

fn default_base_delay_ms() -> u64 {
    1_000
}

/// Retry budget and timeout a provider ships with.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BuiltinLimits {
    pub max_retries: u32,
    pub timeout_secs: u64,
}

impl Default for BuiltinLimits {
    fn default() -> Self {
        Self {
            max_retries: 2,
            timeout_secs: 30,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ProviderEntry {
    pub enabled: bool,
    pub endpoint: String,
    pub priority: i32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_retries: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timeout_secs: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,
    #[serde(skip)]
    pub builtin: BuiltinLimits,
}

impl ProviderEntry {
    pub fn primary() -> Self {
        Self {
            enabled: true,
            endpoint: "http://localhost:5000/analyze_scenario".into(),
            priority: 1,
            max_retries: None,
            timeout_secs: None,
            model: None,
            builtin: BuiltinLimits {
                max_retries: 2,
                timeout_secs: 30,
            },
        }
    }

    pub fn openai() -> Self {
        Self {
            enabled: true,
            endpoint: "https://api.openai.com/v1/chat/completions".into(),
            priority: 2,
            max_retries: None,
            timeout_secs: None,
            model: Some("gpt-4".into()),
            builtin: BuiltinLimits {
                max_retries: 3,
                timeout_secs: 45,
            },
        }
    }

    pub fn anthropic() -> Self {
        Self {
            enabled: true,
            endpoint: "https://api.anthropic.com/v1/messages".into(),
            priority: 3,
            max_retries: None,
            timeout_secs: None,
            model: Some("claude-3-sonnet-20240229".into()),
            builtin: BuiltinLimits {
                max_retries: 2,
                timeout_secs: 60,
            },
        }
    }
}

/// A `[providers.<name>]` table as written. Missing keys keep the
/// provider's built-in values.
#[derive(Debug, Default, Deserialize)]
struct ProviderTable {
    enabled: Option<bool>,
    endpoint: Option<String>,
    priority: Option<i32>,
    max_retries: Option<u32>,
    timeout_secs: Option<u64>,
    model: Option<String>,
}

impl ProviderTable {
    fn merge_onto(self, mut base: ProviderEntry) -> ProviderEntry {
        if let Some(enabled) = self.enabled {
            base.enabled = enabled;
        }
        if let Some(endpoint) = self.endpoint {
            base.endpoint = endpoint;
        }
        if let Some(priority) = self.priority {
            base.priority = priority;
        }
        if self.max_retries.is_some() {
            base.max_retries = self.max_retries;
        }
        if self.timeout_secs.is_some() {
            base.timeout_secs = self.timeout_secs;
        }
        if self.model.is_some() {
            base.model = self.model;
        }
        base
    }
}

fn primary_entry<'de, D: Deserializer<'de>>(d: D) -> Result<ProviderEntry, D::Error> {
    Ok(ProviderTable::deserialize(d)?.merge_onto(ProviderEntry::primary()))
}

fn openai_entry<'de, D: Deserializer<'de>>(d: D) -> Result<ProviderEntry, D::Error> {
    Ok(ProviderTable::deserialize(d)?.merge_onto(ProviderEntry::openai()))
}

fn anthropic_entry<'de, D: Deserializer<'de>>(d: D) -> Result<ProviderEntry, D::Error> {
    Ok(ProviderTable::deserialize(d)?.merge_onto(ProviderEntry::anthropic()))
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct UsageConfig {
    pub session_max_age_hours: u64,
    pub sweep_interval_secs: u64,
    /// Divisor of the placeholder token estimator.
    pub chars_per_token: u32,
    #[serde(default)]
    pub plans: PlansConfig,
}

impl Default for UsageConfig {
    fn default() -> Self {
        Self {
            session_max_age_hours: 24,
            sweep_interval_secs: 3_600,
            chars_per_token: 4,
            plans: PlansConfig::default(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlansConfig {
    #[serde(default = "default_free")]
    pub free: QuotaLimits,
    #[serde(default = "default_basic")]
    pub basic: QuotaLimits,
    #[serde(default = "default_premium")]
    pub premium: QuotaLimits,
}

impl Default for PlansConfig {
    fn default() -> Self {
        Self {
            free: default_free(),
            basic: default_basic(),
            premium: default_premium(),
        }
    }
}

impl PlansConfig {
    pub fn to_limits(&self) -> PlanLimits {
        PlanLimits::new(self.free, self.basic, self.premium)
    }
}

fn default_free() -> QuotaLimits {
    PlanLimits::default().get(PlanTier::Free)
}

fn default_basic() -> QuotaLimits {
    PlanLimits::default().get(PlanTier::Basic)
}

fn default_premium() -> QuotaLimits {
    PlanLimits::default().get(PlanTier::Premium)
}

impl Config {
    /// Load config from the default location (falling back to defaults),
    /// then apply the environment overlay.
    pub fn load() -> anyhow::Result<Self> {
        let path = paths::config_file_path();
        let mut config = if path.exists() {
            Self::read_file(&path)?
        } else {
            Self::default()
        };
        config.apply_env(|key| std::env::var(key).ok());
        Ok(config)
    }

    pub fn load_from(path: &Path) -> anyhow::Result<Self> {
        let mut config = Self::read_file(path)?;
        config.apply_env(|key| std::env::var(key).ok());
        Ok(config)
    }

    fn read_file(path: &Path) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content)?;
        Ok(config)
    }

    /// Overlay environment-supplied settings. `lookup` is injected so tests
    /// don't have to mutate the process environment.
    pub fn apply_env<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        let lookup = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        if let Some(url) = lookup("AI_SERVICE_URL") {
            self.providers.primary.endpoint =
                format!("{}/analyze_scenario", url.trim_end_matches('/'));
        }
        if let Some(endpoint) = lookup("LUCIDRA_OPENAI_ENDPOINT") {
            self.providers.openai.endpoint = endpoint;
        }
        if let Some(endpoint) = lookup("LUCIDRA_ANTHROPIC_ENDPOINT") {
            self.providers.anthropic.endpoint = endpoint;
        }
        self.providers.openai_api_key = lookup("OPENAI_API_KEY");
        self.providers.anthropic_api_key = lookup("ANTHROPIC_API_KEY");

        if let Some(n) = lookup("LUCIDRA_MAX_RETRIES").and_then(|v| v.parse().ok()) {
            self.providers.default_max_retries = Some(n);
        }
        if let Some(n) = lookup("LUCIDRA_TIMEOUT_SECS").and_then(|v| v.parse().ok()) {
            self.providers.default_timeout_secs = Some(n);
        }
        if let Some(port) = lookup("LUCIDRA_PORT").and_then(|v| v.parse().ok()) {
            self.server.port = port;
        }
    }
}
