//! Domain <-> wire mapping for the HTTP edge.

use crate::error::ApiError;
use incident_core::store::{ActivityEvent, ActivityKind};
use incident_core::threats::ThreatTrend;
use incident_core::{Aggregate, Category, Incident, NewIncident, Severity, Status};
use incident_schema::{
    validate_create_v1, validate_update_v1, ActivityV1, CreateIncidentV1, IncidentV1, StatsV1,
    ThreatAnalysisV1, ThreatTrendV1, UpdateIncidentV1,
};

pub fn incident_v1(incident: &Incident) -> IncidentV1 {
    IncidentV1 {
        id: incident.id.0,
        title: incident.title.clone(),
        category: incident.category.to_string(),
        description: incident.description.clone(),
        severity: incident.severity.to_string(),
        status: incident.status.to_string(),
        timestamp: incident.timestamp.to_rfc3339(),
        ai_confidence: incident.ai_confidence,
        threat_analysis: ThreatAnalysisV1 {
            risk: incident.threat_analysis.risk.as_str().into(),
            confidence: incident.threat_analysis.confidence,
        },
        automated_response: incident.recommended_actions.clone(),
        updated_at: incident.updated_at.map(|t| t.to_rfc3339()),
    }
}

pub fn activity_v1(event: &ActivityEvent) -> ActivityV1 {
    let event_type = match event.kind {
        ActivityKind::Created => "created",
        ActivityKind::StatusChanged { .. } => "status_changed",
    };
    ActivityV1 {
        seq: event.seq,
        incident_id: event.incident_id.0,
        event_type: event_type.into(),
        description: event.description.clone(),
        timestamp: event.timestamp.to_rfc3339(),
    }
}

pub fn stats_v1(agg: &Aggregate) -> StatsV1 {
    StatsV1 {
        total: agg.total,
        active_count: agg.active_count,
        resolved_count: agg.resolved_count,
        by_status: agg
            .by_status
            .iter()
            .map(|(status, n)| (status.to_string(), *n))
            .collect(),
        by_severity: agg
            .by_severity
            .iter()
            .map(|(severity, n)| (severity.to_string(), *n))
            .collect(),
    }
}

pub fn threat_v1(threat: &ThreatTrend) -> ThreatTrendV1 {
    ThreatTrendV1 {
        id: threat.id,
        threat_type: threat.kind.clone(),
        count: threat.count,
        trend: threat.trend.to_string(),
    }
}

/// Validates a create body and maps it onto store input. A missing title
/// falls back to the category label, as the incident-management form never
/// asked for one.
pub fn new_incident(body: CreateIncidentV1) -> Result<NewIncident, ApiError> {
    validate_create_v1(&body)?;
    let category: Category = body.incident_type.parse()?;
    let severity = body
        .severity
        .as_deref()
        .map(str::parse::<Severity>)
        .transpose()?;
    let title = body
        .title
        .map(|t| t.trim().to_string())
        .unwrap_or_else(|| category.label());

    Ok(NewIncident {
        title,
        category,
        description: body.description,
        severity,
    })
}

pub fn status_update(body: &UpdateIncidentV1) -> Result<Status, ApiError> {
    validate_update_v1(body)?;
    Ok(body.status.parse()?)
}
