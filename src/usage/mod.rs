// src/usage/mod.rs — Per-session quota gating and accounting

pub mod ledger;
pub mod plan;
pub mod session;

pub use ledger::{AiAccess, Denial, UsageLedger};
pub use plan::{PlanLimits, PlanTier, QuotaLimits};
pub use session::{Session, UsageStats};
