//! Simulated AI threat assessment attached to every new incident.
//!
//! The tables stand in for a real model: risk and confidence are a fixed
//! function of the category, and so are the recommended response actions.

use crate::incident::Category;
use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Risk {
    Unknown,
    Medium,
    High,
    Critical,
}

impl Risk {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Unknown => "unknown",
            Self::Medium => "medium",
            Self::High => "high",
            Self::Critical => "critical",
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct ThreatAssessment {
    pub risk: Risk,
    /// Model confidence in `0.0..=1.0`.
    pub confidence: f64,
}

pub fn assess(category: Category) -> ThreatAssessment {
    let (risk, confidence) = match category {
        Category::Phishing => (Risk::High, 0.85),
        Category::DeepfakeAttack => (Risk::Critical, 0.92),
        Category::SocialEngineering => (Risk::Medium, 0.78),
        Category::Malware => (Risk::High, 0.88),
        Category::DataBreach => (Risk::Critical, 0.95),
        Category::Espionage => (Risk::Critical, 0.90),
        Category::NetworkIntrusion => (Risk::High, 0.87),
        Category::InsiderThreat => (Risk::High, 0.82),
        Category::UnauthorizedAccess | Category::Ddos => (Risk::Unknown, 0.5),
    };
    ThreatAssessment { risk, confidence }
}

pub fn recommended_actions(category: Category) -> Vec<String> {
    let actions: &[&str] = match category {
        Category::Phishing => &[
            "Isolate affected systems",
            "Block sender domain",
            "Initiate email trace",
            "Update phishing filters",
        ],
        Category::DeepfakeAttack => &[
            "Authenticate communication channels",
            "Deploy deepfake detection tools",
            "Issue command verification protocols",
            "Alert senior command",
        ],
        Category::SocialEngineering => &[
            "Enhance access controls",
            "Conduct immediate staff briefing",
            "Review security protocols",
            "Monitor suspicious activities",
        ],
        _ => &["Escalate to cyber response team"],
    };
    actions.iter().map(ToString::to_string).collect()
}
