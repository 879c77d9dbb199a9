//! Read-only view derivations over a store snapshot.
//!
//! Nothing here mutates incidents. Every function recomputes from its
//! inputs, so the same snapshot and view state always give the same view.

use crate::incident::{Incident, IncidentId, ParseEnumError, Severity, Status};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StatusFilter {
    #[default]
    All,
    Only(Status),
}

impl StatusFilter {
    pub fn admits(self, status: Status) -> bool {
        match self {
            Self::All => true,
            Self::Only(wanted) => wanted == status,
        }
    }
}

impl FromStr for StatusFilter {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.trim().eq_ignore_ascii_case("all") {
            return Ok(Self::All);
        }
        s.parse().map(Self::Only)
    }
}

impl fmt::Display for StatusFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::All => f.write_str("all"),
            Self::Only(status) => f.write_str(status.as_str()),
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Tab {
    #[default]
    Dashboard,
    Incidents,
    Report,
    Analytics,
}

impl Tab {
    pub const ALL: [Tab; 4] = [Self::Dashboard, Self::Incidents, Self::Report, Self::Analytics];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Dashboard => "dashboard",
            Self::Incidents => "incidents",
            Self::Report => "report",
            Self::Analytics => "analytics",
        }
    }
}

impl FromStr for Tab {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_ascii_lowercase();
        Self::ALL
            .into_iter()
            .find(|t| t.as_str() == wanted)
            .ok_or_else(|| ParseEnumError {
                kind: "tab",
                value: s.to_string(),
            })
    }
}

/// Transient UI state. Never stored with the incidents.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ViewState {
    pub search: String,
    pub filter: StatusFilter,
    pub tab: Tab,
}

/// Incidents whose title or category contains `search` (case-insensitive)
/// and whose status passes `filter`, in input order.
///
/// The returned iterator is `Clone`; cloning it restarts the same walk.
pub fn visible_incidents<'a>(
    all: &'a [Incident],
    search: &str,
    filter: StatusFilter,
) -> impl Iterator<Item = &'a Incident> + Clone + 'a {
    let needle = search.to_lowercase();
    all.iter()
        .filter(move |incident| matches_search(incident, &needle) && filter.admits(incident.status))
}

fn matches_search(incident: &Incident, needle: &str) -> bool {
    needle.is_empty()
        || incident.title.to_lowercase().contains(needle)
        || incident.category.as_str().contains(needle)
}

/// Buckets elapsed time with floor division: `"Nm ago"`, `"Nh ago"`, `"Nd ago"`.
pub fn format_relative_time(timestamp: DateTime<Utc>, now: DateTime<Utc>) -> String {
    let minutes = (now - timestamp).num_minutes().max(0);
    if minutes < 60 {
        return format!("{minutes}m ago");
    }
    let hours = minutes / 60;
    if hours < 24 {
        return format!("{hours}h ago");
    }
    format!("{}d ago", hours / 24)
}

pub fn severity_badge(severity: &str) -> &'static str {
    match severity.trim().to_ascii_lowercase().as_str() {
        "critical" => "bg-red-500",
        "high" => "bg-orange-500",
        "medium" => "bg-yellow-500",
        "low" => "bg-blue-500",
        _ => "bg-gray-500",
    }
}

pub fn status_icon(status: &str) -> &'static str {
    match status.trim().to_ascii_lowercase().as_str() {
        "investigating" => "eye",
        "mitigating" => "zap",
        "resolved" => "check-circle",
        _ => "clock",
    }
}

pub fn format_confidence(percent: u8) -> String {
    format!("{percent}%")
}

/// For scores reported on a 0..1 scale.
pub fn format_ratio_confidence(ratio: f64) -> String {
    format!("{:.1}%", ratio * 100.0)
}

/// Everything one incident row needs, already formatted.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct IncidentCard {
    pub id: IncidentId,
    pub title: String,
    pub category: String,
    pub severity: Severity,
    pub severity_badge: &'static str,
    pub status: Status,
    pub status_icon: &'static str,
    pub time_ago: String,
    pub confidence: String,
}

impl IncidentCard {
    pub fn new(incident: &Incident, now: DateTime<Utc>) -> Self {
        Self {
            id: incident.id,
            title: incident.title.clone(),
            category: incident.category.label(),
            severity: incident.severity,
            severity_badge: severity_badge(incident.severity.as_str()),
            status: incident.status,
            status_icon: status_icon(incident.status.as_str()),
            time_ago: format_relative_time(incident.timestamp, now),
            confidence: format_confidence(incident.ai_confidence),
        }
    }
}
