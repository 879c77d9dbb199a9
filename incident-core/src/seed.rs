use crate::assessment;
use crate::incident::{Category, Incident, IncidentId, Severity, Status};
use crate::threats::{ThreatTrend, Trend};
use chrono::{DateTime, Duration, Utc};

/// The four incidents the portal shows on first load, aged relative to `now`.
pub fn sample_incidents(now: DateTime<Utc>) -> Vec<Incident> {
    [
        (
            1,
            "Suspicious Login Attempt",
            Category::UnauthorizedAccess,
            Severity::High,
            Status::Investigating,
            15,
            94,
        ),
        (
            2,
            "Phishing Email Campaign Detected",
            Category::Phishing,
            Severity::Critical,
            Status::Mitigating,
            45,
            98,
        ),
        (
            3,
            "Malware Signature Found",
            Category::Malware,
            Severity::High,
            Status::Resolved,
            120,
            87,
        ),
        (
            4,
            "Data Exfiltration Attempt",
            Category::Espionage,
            Severity::Critical,
            Status::Investigating,
            30,
            91,
        ),
    ]
    .into_iter()
    .map(|(id, title, category, severity, status, minutes_ago, confidence)| Incident {
        id: IncidentId(id),
        title: title.to_string(),
        category,
        description: String::new(),
        severity,
        status,
        timestamp: now - Duration::minutes(minutes_ago),
        ai_confidence: confidence,
        threat_analysis: assessment::assess(category),
        recommended_actions: assessment::recommended_actions(category),
        updated_at: None,
    })
    .collect()
}

/// Threat-type counts the dashboard feed starts with.
pub fn sample_threats() -> Vec<ThreatTrend> {
    vec![
        ThreatTrend::new(1, "Spear Phishing", 12, Trend::Up),
        ThreatTrend::new(2, "Malware", 8, Trend::Down),
        ThreatTrend::new(3, "DDoS Attack", 5, Trend::Up),
        ThreatTrend::new(4, "Data Breach", 3, Trend::Stable),
    ]
}
