// src/usage/plan.rs — Plan tiers and their quotas

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PlanTier {
    #[default]
    Free,
    Basic,
    Premium,
}

impl PlanTier {
    pub fn as_str(&self) -> &'static str {
        match self {
            PlanTier::Free => "free",
            PlanTier::Basic => "basic",
            PlanTier::Premium => "premium",
        }
    }
}

impl fmt::Display for PlanTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PlanTier {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "free" => Ok(PlanTier::Free),
            "basic" => Ok(PlanTier::Basic),
            "premium" => Ok(PlanTier::Premium),
            other => Err(format!("unknown plan tier '{other}'")),
        }
    }
}

/// Token and call ceilings for one tier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuotaLimits {
    pub max_tokens: u64,
    pub max_calls: u64,
}

impl QuotaLimits {
    pub const fn new(max_tokens: u64, max_calls: u64) -> Self {
        Self {
            max_tokens,
            max_calls,
        }
    }
}

/// Tier → quota mapping. Fixed once the ledger is constructed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlanLimits {
    free: QuotaLimits,
    basic: QuotaLimits,
    premium: QuotaLimits,
}

impl PlanLimits {
    pub fn new(free: QuotaLimits, basic: QuotaLimits, premium: QuotaLimits) -> Self {
        Self {
            free,
            basic,
            premium,
        }
    }

    pub fn get(&self, tier: PlanTier) -> QuotaLimits {
        match tier {
            PlanTier::Free => self.free,
            PlanTier::Basic => self.basic,
            PlanTier::Premium => self.premium,
        }
    }
}

impl Default for PlanLimits {
    fn default() -> Self {
        Self {
            free: QuotaLimits::new(1_000, 5),
            basic: QuotaLimits::new(10_000, 50),
            premium: QuotaLimits::new(100_000, 500),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_tier() {
        assert_eq!("free".parse::<PlanTier>().unwrap(), PlanTier::Free);
        assert_eq!(" Premium ".parse::<PlanTier>().unwrap(), PlanTier::Premium);
        assert!("gold".parse::<PlanTier>().is_err());
    }

    #[test]
    fn test_tier_serde_lowercase() {
        let json = serde_json::to_string(&PlanTier::Basic).unwrap();
        assert_eq!(json, "\"basic\"");
    }

    #[test]
    fn test_limits_grow_with_tier() {
        let limits = PlanLimits::default();
        let free = limits.get(PlanTier::Free);
        let basic = limits.get(PlanTier::Basic);
        let premium = limits.get(PlanTier::Premium);
        assert!(free.max_tokens < basic.max_tokens && basic.max_tokens < premium.max_tokens);
        assert!(free.max_calls < basic.max_calls && basic.max_calls < premium.max_calls);
    }
}
