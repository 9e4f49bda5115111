// src/api/types.rs

use serde::{Deserialize, Serialize};

use crate::coach::FallbackAnalysis;
use crate::usage::UsageStats;

/// Request body for scenario analysis.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SuggestRequest {
    #[serde(default)]
    pub scenario: String,
    /// Provider to try first; unknown names are ignored.
    #[serde(default)]
    pub provider: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct SuggestResponse {
    pub scenario: String,
    pub ai_analysis: String,
    pub used_ai: bool,
    pub provider: String,
    pub usage: UsageStats,
    pub ai_status: String,
    /// Structured keyword analysis, present only when AI was not used.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub coaching: Option<FallbackAnalysis>,
}

/// Response for opt-in / opt-out.
#[derive(Debug, Serialize, Deserialize)]
pub struct OptResponse {
    pub success: bool,
    pub message: String,
    pub usage: UsageStats,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct UsageResponse {
    pub usage: UsageStats,
    pub ai_status: String,
    pub can_use_ai: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub upgrade_message: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct TipsResponse {
    pub tips: Vec<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub service: String,
    pub version: String,
}

/// Error response body.
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
}
