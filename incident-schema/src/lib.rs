//! JSON shapes exchanged over `/api/incidents` and friends.
//!
//! These types carry plain strings so that any client can talk to the
//! service; conversion into domain types happens at the server edge.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

pub const SEVERITIES: [&str; 4] = ["low", "medium", "high", "critical"];
pub const STATUSES: [&str; 6] = [
    "new",
    "open",
    "investigating",
    "mitigating",
    "resolved",
    "closed",
];

/// Body of `POST /api/incidents`.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct CreateIncidentV1 {
    #[serde(rename = "type")]
    pub incident_type: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default)]
    pub description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub severity: Option<String>,
}

/// Body of `PUT /api/incidents/:id`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct UpdateIncidentV1 {
    pub status: String,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ThreatAnalysisV1 {
    pub risk: String,
    pub confidence: f64,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct IncidentV1 {
    pub id: u64,
    pub title: String,
    pub category: String,
    pub description: String,
    pub severity: String,
    pub status: String,
    /// RFC 3339, UTC.
    pub timestamp: String,
    pub ai_confidence: u8,
    pub threat_analysis: ThreatAnalysisV1,
    pub automated_response: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ActivityV1 {
    pub seq: u64,
    pub incident_id: u64,
    pub event_type: String,
    pub description: String,
    pub timestamp: String,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatsV1 {
    pub total: usize,
    pub active_count: usize,
    pub resolved_count: usize,
    /// Keyed by status name; statuses with no incidents are omitted.
    #[serde(default)]
    pub by_status: BTreeMap<String, usize>,
    #[serde(default)]
    pub by_severity: BTreeMap<String, usize>,
}

/// One entry of `GET /api/threats`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ThreatTrendV1 {
    pub id: u32,
    #[serde(rename = "type")]
    pub threat_type: String,
    pub count: u32,
    pub trend: String,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct HealthV1 {
    pub status: String,
    pub message: String,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorV1 {
    pub error: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum SchemaError {
    #[error("{field} is required")]
    Missing { field: &'static str },

    #[error("invalid {field} '{value}'")]
    Invalid { field: &'static str, value: String },
}

pub fn validate_create_v1(body: &CreateIncidentV1) -> Result<(), SchemaError> {
    if body.incident_type.trim().is_empty() {
        return Err(SchemaError::Missing { field: "type" });
    }
    if let Some(title) = &body.title {
        if title.trim().is_empty() {
            return Err(SchemaError::Missing { field: "title" });
        }
    }
    if let Some(severity) = &body.severity {
        check_one_of("severity", severity, &SEVERITIES)?;
    }
    Ok(())
}

pub fn validate_update_v1(body: &UpdateIncidentV1) -> Result<(), SchemaError> {
    if body.status.trim().is_empty() {
        return Err(SchemaError::Missing { field: "status" });
    }
    check_one_of("status", &body.status, &STATUSES)
}

fn check_one_of(field: &'static str, value: &str, allowed: &[&str]) -> Result<(), SchemaError> {
    let lower = value.trim().to_lowercase();
    if allowed.contains(&lower.as_str()) {
        Ok(())
    } else {
        Err(SchemaError::Invalid {
            field,
            value: value.to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validates_create_v1() {
        let body = CreateIncidentV1 {
            incident_type: "phishing".into(),
            title: None,
            description: "spoofed payroll email".into(),
            severity: Some("HIGH".into()),
        };
        assert!(validate_create_v1(&body).is_ok());
    }

    #[test]
    fn create_requires_type_and_known_severity() {
        let missing = CreateIncidentV1::default();
        assert_eq!(
            validate_create_v1(&missing),
            Err(SchemaError::Missing { field: "type" })
        );

        let bad = CreateIncidentV1 {
            incident_type: "malware".into(),
            severity: Some("urgent".into()),
            ..CreateIncidentV1::default()
        };
        assert_eq!(
            validate_create_v1(&bad).unwrap_err().to_string(),
            "invalid severity 'urgent'"
        );
    }

    #[test]
    fn create_body_uses_type_key() {
        let body: CreateIncidentV1 = serde_json::from_str(
            r#"{"type":"DATA_BREACH","description":"db dump on forum","severity":"CRITICAL"}"#,
        )
        .expect("parse");
        assert_eq!(body.incident_type, "DATA_BREACH");
        assert_eq!(body.title, None);
        assert!(validate_create_v1(&body).is_ok());
    }

    #[test]
    fn update_requires_known_status() {
        assert!(validate_update_v1(&UpdateIncidentV1 { status: "resolved".into() }).is_ok());
        assert_eq!(
            validate_update_v1(&UpdateIncidentV1 { status: String::new() }),
            Err(SchemaError::Missing { field: "status" })
        );
        assert!(validate_update_v1(&UpdateIncidentV1 { status: "archived".into() }).is_err());
    }
}
