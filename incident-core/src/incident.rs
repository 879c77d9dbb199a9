use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::assessment::ThreatAssessment;

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct IncidentId(pub u64);

impl fmt::Display for IncidentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for IncidentId {
    type Err = std::num::ParseIntError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.trim().trim_start_matches('#').parse().map(Self)
    }
}

/// Priority rank fixed at creation. Ordered from least to most urgent.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Low,
    #[default]
    Medium,
    High,
    Critical,
}

impl Severity {
    pub const ALL: [Severity; 4] = [Self::Low, Self::Medium, Self::High, Self::Critical];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Low => "low",
            Self::Medium => "medium",
            Self::High => "high",
            Self::Critical => "critical",
        }
    }
}

/// Lifecycle stage. Any status may follow any other.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Status {
    New,
    Open,
    Investigating,
    Mitigating,
    Resolved,
    Closed,
}

impl Status {
    pub const ALL: [Status; 6] = [
        Self::New,
        Self::Open,
        Self::Investigating,
        Self::Mitigating,
        Self::Resolved,
        Self::Closed,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::New => "new",
            Self::Open => "open",
            Self::Investigating => "investigating",
            Self::Mitigating => "mitigating",
            Self::Resolved => "resolved",
            Self::Closed => "closed",
        }
    }

    pub fn is_resolved(self) -> bool {
        matches!(self, Self::Resolved)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Category {
    UnauthorizedAccess,
    Phishing,
    Malware,
    Espionage,
    NetworkIntrusion,
    DataBreach,
    InsiderThreat,
    SocialEngineering,
    DeepfakeAttack,
    Ddos,
}

impl Category {
    /// Categories in the order the report form offers them.
    pub const ALL: [Category; 10] = [
        Self::UnauthorizedAccess,
        Self::Phishing,
        Self::Malware,
        Self::Espionage,
        Self::NetworkIntrusion,
        Self::DataBreach,
        Self::InsiderThreat,
        Self::SocialEngineering,
        Self::DeepfakeAttack,
        Self::Ddos,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::UnauthorizedAccess => "unauthorized-access",
            Self::Phishing => "phishing",
            Self::Malware => "malware",
            Self::Espionage => "espionage",
            Self::NetworkIntrusion => "network-intrusion",
            Self::DataBreach => "data-breach",
            Self::InsiderThreat => "insider-threat",
            Self::SocialEngineering => "social-engineering",
            Self::DeepfakeAttack => "deepfake-attack",
            Self::Ddos => "ddos",
        }
    }

    /// Human-readable label, e.g. `"Data Breach"`.
    pub fn label(self) -> String {
        if matches!(self, Self::Ddos) {
            return "DDoS".into();
        }
        self.as_str()
            .split('-')
            .map(|word| {
                let mut chars = word.chars();
                match chars.next() {
                    Some(first) => first.to_ascii_uppercase().to_string() + chars.as_str(),
                    None => String::new(),
                }
            })
            .collect::<Vec<_>>()
            .join(" ")
    }
}

macro_rules! impl_enum_text {
    ($ty:ty, $what:literal) => {
        impl_enum_text!($ty, $what, []);
    };
    ($ty:ty, $what:literal, [$(($alias:literal, $target:expr)),*]) => {
        impl fmt::Display for $ty {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl FromStr for $ty {
            type Err = ParseEnumError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                let wanted = normalize(s);
                $(
                    if wanted == $alias {
                        return Ok($target);
                    }
                )*
                Self::ALL
                    .into_iter()
                    .find(|v| v.as_str() == wanted)
                    .ok_or_else(|| ParseEnumError {
                        kind: $what,
                        value: s.to_string(),
                    })
            }
        }
    };
}

impl_enum_text!(Severity, "severity");
impl_enum_text!(Status, "status");
// Type names the report API has historically sent.
impl_enum_text!(
    Category,
    "category",
    [
        ("spear-phishing", Category::Phishing),
        ("malware-infection", Category::Malware),
        ("espionage-attempt", Category::Espionage)
    ]
);

/// Accepts `DATA_BREACH`, `Data Breach` and `data-breach` alike.
fn normalize(s: &str) -> String {
    s.trim()
        .to_ascii_lowercase()
        .replace(['_', ' '], "-")
}

#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[error("invalid {kind} '{value}'")]
pub struct ParseEnumError {
    pub kind: &'static str,
    pub value: String,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Incident {
    pub id: IncidentId,
    pub title: String,
    pub category: Category,
    pub description: String,
    pub severity: Severity,
    pub status: Status,
    pub timestamp: DateTime<Utc>,
    pub ai_confidence: u8,
    pub threat_analysis: ThreatAssessment,
    pub recommended_actions: Vec<String>,
    pub updated_at: Option<DateTime<Utc>>,
}

/// Fields supplied by the report form. Everything else is assigned by the store.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewIncident {
    pub title: String,
    pub category: Category,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub severity: Option<Severity>,
}

impl NewIncident {
    pub fn new(title: impl Into<String>, category: Category) -> Self {
        Self {
            title: title.into(),
            category,
            description: String::new(),
            severity: None,
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn with_severity(mut self, severity: Severity) -> Self {
        self.severity = Some(severity);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_every_spelling_the_portal_used() {
        assert_eq!("DATA_BREACH".parse::<Category>(), Ok(Category::DataBreach));
        assert_eq!("data-breach".parse::<Category>(), Ok(Category::DataBreach));
        assert_eq!(" Insider Threat ".parse::<Category>(), Ok(Category::InsiderThreat));
        assert_eq!("HIGH".parse::<Severity>(), Ok(Severity::High));
        assert_eq!("Investigating".parse::<Status>(), Ok(Status::Investigating));
    }

    #[test]
    fn legacy_type_names_map_onto_categories() {
        assert_eq!("SPEAR_PHISHING".parse::<Category>(), Ok(Category::Phishing));
        assert_eq!("spear-phishing".parse::<Category>(), Ok(Category::Phishing));
        assert_eq!("MALWARE_INFECTION".parse::<Category>(), Ok(Category::Malware));
        assert_eq!("ESPIONAGE_ATTEMPT".parse::<Category>(), Ok(Category::Espionage));
        assert_eq!("DEEPFAKE_ATTACK".parse::<Category>(), Ok(Category::DeepfakeAttack));
        assert_eq!(Category::DeepfakeAttack.label(), "Deepfake Attack");
    }

    #[test]
    fn rejects_unknown_values() {
        let err = "urgent".parse::<Severity>().unwrap_err();
        assert_eq!(err.to_string(), "invalid severity 'urgent'");
        assert!("archived".parse::<Status>().is_err());
    }

    #[test]
    fn severity_orders_by_urgency() {
        assert!(Severity::Critical > Severity::High);
        assert!(Severity::Low < Severity::Medium);
        assert_eq!(Severity::default(), Severity::Medium);
    }

    #[test]
    fn category_serializes_kebab_case() {
        let json = serde_json::to_string(&Category::UnauthorizedAccess).expect("serialize");
        assert_eq!(json, "\"unauthorized-access\"");
        assert_eq!(Category::NetworkIntrusion.label(), "Network Intrusion");
        assert_eq!(Category::Ddos.label(), "DDoS");
    }

    #[test]
    fn incident_id_accepts_hash_prefix() {
        assert_eq!("#12".parse::<IncidentId>(), Ok(IncidentId(12)));
        assert_eq!(IncidentId(3).to_string(), "3");
    }
}
