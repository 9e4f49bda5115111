// src/coach/fallback.rs — Deterministic keyword-driven scenario analysis
//
// This is the path of last resort, so it has no failure mode: any input,
// including the empty string, yields a complete analysis.

use serde::{Deserialize, Serialize};

use super::templates::{Category, COACHING_TIPS, UNIVERSAL_STEPS};
use crate::usage::PlanTier;

/// Scenarios longer than this get a "break it down" hint.
const LONG_SCENARIO_CHARS: usize = 200;
/// Scenarios shorter than this get a "tell me more" hint.
const SHORT_SCENARIO_CHARS: usize = 50;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Confidence {
    Low,
    Medium,
    High,
}

impl Confidence {
    fn from_score(score: usize) -> Self {
        if score > 2 {
            Confidence::High
        } else if score > 0 {
            Confidence::Medium
        } else {
            Confidence::Low
        }
    }
}

/// Structured analysis in the same shape a provider-backed analysis would
/// be presented in.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FallbackAnalysis {
    pub analysis: String,
    pub primary_category: Category,
    pub matched_keywords: Vec<String>,
    pub recommendations: Vec<String>,
    pub risk_factors: Vec<String>,
    pub opportunities: Vec<String>,
    pub next_steps: Vec<String>,
    pub confidence: Confidence,
    pub is_fallback: bool,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct FallbackAnalyzer;

impl FallbackAnalyzer {
    pub fn new() -> Self {
        Self
    }

    pub fn analyze(&self, scenario: &str) -> FallbackAnalysis {
        let (primary, matches) = classify(scenario);
        let template = primary.template();

        FallbackAnalysis {
            analysis: customize(template.analysis, scenario, &matches),
            primary_category: primary,
            confidence: Confidence::from_score(matches.len()),
            matched_keywords: matches.iter().map(|m| m.to_string()).collect(),
            recommendations: to_owned(template.recommendations),
            risk_factors: to_owned(template.risk_factors),
            opportunities: to_owned(template.opportunities),
            next_steps: UNIVERSAL_STEPS
                .iter()
                .chain(primary.next_steps())
                .map(|s| s.to_string())
                .collect(),
            is_fallback: true,
        }
    }

    pub fn coaching_tips(&self) -> Vec<String> {
        to_owned(&COACHING_TIPS)
    }

    pub fn upgrade_message(&self, plan: PlanTier) -> &'static str {
        match plan {
            PlanTier::Free => "Upgrade to Basic plan for AI-powered insights and analysis. Get personalized recommendations from AI-assisted analysis.",
            PlanTier::Basic => "Upgrade to Premium for expanded AI analysis and advanced strategic planning tools.",
            PlanTier::Premium => "You're on our Premium plan! Contact support if you need additional capacity.",
        }
    }
}

/// Highest-scoring category and its matched keywords. Ties go to the
/// earlier-declared category.
fn classify(scenario: &str) -> (Category, Vec<&'static str>) {
    let lower = scenario.to_lowercase();
    let mut best = (Category::ALL[0], Vec::new());

    for category in Category::ALL {
        let matches: Vec<&'static str> = category
            .keywords()
            .iter()
            .copied()
            .filter(|kw| lower.contains(kw))
            .collect();
        if matches.len() > best.1.len() {
            best = (category, matches);
        }
    }
    best
}

fn customize(base: &str, scenario: &str, matches: &[&str]) -> String {
    let mut analysis = base.to_string();

    if !matches.is_empty() {
        analysis.push_str(&format!(
            " Key areas identified in your scenario include: {}.",
            matches.join(", ")
        ));
    }

    let length = scenario.chars().count();
    if length > LONG_SCENARIO_CHARS {
        analysis.push_str(" Given the complexity of your scenario, consider breaking it down into smaller, manageable components for better analysis.");
    } else if length < SHORT_SCENARIO_CHARS {
        analysis.push_str(" Consider providing more details about your scenario to enable more comprehensive analysis.");
    }

    analysis
}

fn to_owned(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}
