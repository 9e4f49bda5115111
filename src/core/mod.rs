// src/core/mod.rs — Scenario analysis service

pub mod cost;
pub mod service;

pub use cost::{CharRatioEstimator, TokenEstimator};
pub use service::{AnalysisOutcome, ScenarioAnalysisService, FALLBACK_PROVIDER};
