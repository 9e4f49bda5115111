// src/coach/templates.rs — Static keyword lists and narrative templates

use serde::{Deserialize, Serialize};
use std::fmt;

/// Business area a scenario is classified into. Declaration order is the
/// tie-break order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Financial,
    Market,
    Operational,
    Strategic,
    Risk,
}

impl Category {
    pub const ALL: [Category; 5] = [
        Category::Financial,
        Category::Market,
        Category::Operational,
        Category::Strategic,
        Category::Risk,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Financial => "financial",
            Category::Market => "market",
            Category::Operational => "operational",
            Category::Strategic => "strategic",
            Category::Risk => "risk",
        }
    }

    pub fn keywords(&self) -> &'static [&'static str] {
        match self {
            Category::Financial => &[
                "revenue",
                "profit",
                "cost",
                "budget",
                "expense",
                "investment",
                "roi",
                "cash flow",
                "funding",
            ],
            Category::Market => &[
                "competitor",
                "market share",
                "customer",
                "demand",
                "pricing",
                "product",
                "service",
                "brand",
            ],
            Category::Operational => &[
                "process",
                "efficiency",
                "automation",
                "workflow",
                "team",
                "hiring",
                "training",
                "technology",
            ],
            Category::Strategic => &[
                "growth",
                "expansion",
                "partnership",
                "acquisition",
                "innovation",
                "disruption",
                "transformation",
            ],
            Category::Risk => &[
                "compliance",
                "regulation",
                "security",
                "liability",
                "reputation",
                "crisis",
                "contingency",
            ],
        }
    }

    pub fn template(&self) -> &'static Template {
        match self {
            Category::Financial => &FINANCIAL,
            Category::Market => &MARKET,
            Category::Operational => &OPERATIONAL,
            Category::Strategic => &STRATEGIC,
            Category::Risk => &RISK,
        }
    }

    pub fn next_steps(&self) -> &'static [&'static str] {
        match self {
            Category::Financial => &[
                "Review your financial statements and cash flow projections",
                "Consult with financial advisors or accountants if needed",
            ],
            Category::Market => &[
                "Conduct market research to validate your assumptions",
                "Gather customer feedback and competitive intelligence",
            ],
            Category::Operational => &[
                "Map out current processes and identify bottlenecks",
                "Assess team capabilities and training needs",
            ],
            Category::Strategic => &[
                "Align the scenario with your organization's mission and values",
                "Consider long-term implications and strategic fit",
            ],
            Category::Risk => &[
                "Identify potential risks and their likelihood/impact",
                "Develop contingency plans for high-risk scenarios",
            ],
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

pub struct Template {
    pub analysis: &'static str,
    pub recommendations: &'static [&'static str],
    pub risk_factors: &'static [&'static str],
    pub opportunities: &'static [&'static str],
}

pub const UNIVERSAL_STEPS: [&str; 3] = [
    "Document your current situation and desired outcomes",
    "Identify key stakeholders who should be involved in decision-making",
    "Set clear timelines and milestones for implementation",
];

pub const COACHING_TIPS: [&str; 8] = [
    "Break complex scenarios into smaller, manageable components",
    "Always consider multiple perspectives and stakeholder viewpoints",
    "Focus on actionable insights rather than theoretical analysis",
    "Regularly review and adjust your strategies based on outcomes",
    "Document lessons learned for future scenario planning",
    "Consider both short-term and long-term implications",
    "Involve subject matter experts when dealing with specialized areas",
    "Use data and evidence to support your decision-making process",
];

static FINANCIAL: Template = Template {
    analysis: "This scenario involves financial considerations that could impact your organization's fiscal health.",
    recommendations: &[
        "Conduct a thorough financial analysis including cash flow projections",
        "Review budget allocations and identify potential cost savings",
        "Consider diversifying revenue streams to reduce financial risk",
        "Establish clear financial KPIs to track performance",
    ],
    risk_factors: &[
        "Potential budget overruns or unexpected expenses",
        "Cash flow disruptions during implementation",
        "Market volatility affecting financial projections",
    ],
    opportunities: &[
        "Improved financial efficiency and cost management",
        "New revenue generation possibilities",
        "Enhanced financial planning and forecasting capabilities",
    ],
};

static MARKET: Template = Template {
    analysis: "This scenario relates to market dynamics and competitive positioning that could affect your business strategy.",
    recommendations: &[
        "Conduct comprehensive market research and competitive analysis",
        "Develop customer feedback mechanisms and satisfaction surveys",
        "Create differentiation strategies to stand out from competitors",
        "Monitor market trends and adjust strategies accordingly",
    ],
    risk_factors: &[
        "Increased competition and market saturation",
        "Changing customer preferences and demands",
        "Potential loss of market share to competitors",
    ],
    opportunities: &[
        "Market expansion and new customer acquisition",
        "Innovation opportunities to meet unmet needs",
        "Strategic partnerships and collaboration possibilities",
    ],
};

static OPERATIONAL: Template = Template {
    analysis: "This scenario involves operational aspects that could impact your organization's efficiency and productivity.",
    recommendations: &[
        "Evaluate current processes and identify improvement opportunities",
        "Invest in training and development for your team",
        "Consider technology solutions to enhance operational efficiency",
        "Establish clear performance metrics and monitoring systems",
    ],
    risk_factors: &[
        "Operational disruptions during transition periods",
        "Resistance to change from team members",
        "Technology integration challenges and learning curves",
    ],
    opportunities: &[
        "Improved operational efficiency and productivity",
        "Enhanced team capabilities and skill development",
        "Streamlined processes and reduced operational costs",
    ],
};

static STRATEGIC: Template = Template {
    analysis: "This scenario involves strategic decisions that could significantly impact your organization's future direction.",
    recommendations: &[
        "Develop a comprehensive strategic plan with clear objectives",
        "Engage stakeholders in strategic planning discussions",
        "Create implementation timelines with measurable milestones",
        "Regularly review and adjust strategies based on outcomes",
    ],
    risk_factors: &[
        "Strategic misalignment with organizational capabilities",
        "Resource constraints limiting strategic execution",
        "Market changes rendering strategies obsolete",
    ],
    opportunities: &[
        "Significant growth and expansion possibilities",
        "Competitive advantages through strategic positioning",
        "Long-term sustainability and market leadership",
    ],
};

static RISK: Template = Template {
    analysis: "This scenario involves risk management considerations that require careful planning and mitigation strategies.",
    recommendations: &[
        "Conduct thorough risk assessment and impact analysis",
        "Develop comprehensive risk mitigation and contingency plans",
        "Establish monitoring systems for early risk detection",
        "Create crisis management protocols and response procedures",
    ],
    risk_factors: &[
        "Regulatory compliance challenges and penalties",
        "Reputation damage from poor risk management",
        "Operational disruptions from unforeseen events",
    ],
    opportunities: &[
        "Enhanced organizational resilience and preparedness",
        "Improved risk management capabilities",
        "Competitive advantage through superior risk management",
    ],
};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_category_has_content() {
        for category in Category::ALL {
            let t = category.template();
            assert!(!t.analysis.is_empty());
            assert!(t.recommendations.len() >= 3, "{category}");
            assert!(!t.risk_factors.is_empty());
            assert!(!t.opportunities.is_empty());
            assert!(!category.keywords().is_empty());
            assert!(!category.next_steps().is_empty());
        }
    }

    #[test]
    fn test_keywords_are_lowercase() {
        for category in Category::ALL {
            for kw in category.keywords() {
                assert_eq!(*kw, kw.to_lowercase());
            }
        }
    }
}
