//! Session-scoped incident collection.
//!
//! Records are appended in creation order and never removed. Every create
//! and status change is also written to an append-only activity log.

use crate::assessment;
use crate::clock::{Clock, SystemClock};
use crate::error::StoreError;
use crate::incident::{Category, Incident, IncidentId, NewIncident, Severity, Status};
use chrono::{DateTime, Utc};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Largest id a client can hold without loss in an IEEE-754 double.
pub const MAX_INCIDENT_ID: u64 = (1 << 53) - 1;

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ActivityKind {
    Created,
    StatusChanged { from: Status, to: Status },
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActivityEvent {
    pub seq: u64,
    pub incident_id: IncidentId,
    pub kind: ActivityKind,
    pub description: String,
    pub timestamp: DateTime<Utc>,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Aggregate {
    pub total: usize,
    pub active_count: usize,
    pub resolved_count: usize,
    pub by_status: BTreeMap<Status, usize>,
    pub by_severity: BTreeMap<Severity, usize>,
}

/// Counts over any slice of incidents. `active_count + resolved_count == total`.
pub fn aggregate(incidents: &[Incident]) -> Aggregate {
    let mut out = Aggregate {
        total: incidents.len(),
        ..Aggregate::default()
    };
    for incident in incidents {
        if incident.status.is_resolved() {
            out.resolved_count += 1;
        } else {
            out.active_count += 1;
        }
        *out.by_status.entry(incident.status).or_default() += 1;
        *out.by_severity.entry(incident.severity).or_default() += 1;
    }
    out
}

pub struct IncidentStore {
    incidents: Vec<Incident>,
    events: Vec<ActivityEvent>,
    next_id: u64,
    clock: Box<dyn Clock>,
    rng: StdRng,
}

impl Default for IncidentStore {
    fn default() -> Self {
        Self::new()
    }
}

impl IncidentStore {
    pub fn new() -> Self {
        Self::with_parts(Box::new(SystemClock), StdRng::from_entropy())
    }

    /// Deterministic confidence scores, for tests and reproducible demos.
    pub fn with_seed(seed: u64) -> Self {
        Self::with_parts(Box::new(SystemClock), StdRng::seed_from_u64(seed))
    }

    pub fn with_clock(mut self, clock: impl Clock) -> Self {
        self.clock = Box::new(clock);
        self
    }

    fn with_parts(clock: Box<dyn Clock>, rng: StdRng) -> Self {
        Self {
            incidents: Vec::new(),
            events: Vec::new(),
            next_id: 1,
            clock,
            rng,
        }
    }

    pub fn now(&self) -> DateTime<Utc> {
        self.clock.now()
    }

    pub fn create(&mut self, input: NewIncident) -> Incident {
        let now = self.clock.now();
        let id = IncidentId(self.next_id);
        self.next_id += 1;

        let incident = Incident {
            id,
            title: input.title,
            category: input.category,
            description: input.description,
            severity: input.severity.unwrap_or_default(),
            status: Status::New,
            timestamp: now,
            ai_confidence: self.rng.gen_range(80..100),
            threat_analysis: assessment::assess(input.category),
            recommended_actions: assessment::recommended_actions(input.category),
            updated_at: None,
        };

        tracing::debug!(
            incident_id = %id,
            category = %incident.category,
            severity = %incident.severity,
            "incident created"
        );
        self.record(
            id,
            ActivityKind::Created,
            format!("reported: {}", incident.title),
            now,
        );
        self.incidents.push(incident.clone());
        incident
    }

    /// Adds a pre-built record, e.g. sample data loaded at startup.
    pub fn insert(&mut self, incident: Incident) -> Result<(), StoreError> {
        if !(1..=MAX_INCIDENT_ID).contains(&incident.id.0) {
            return Err(StoreError::IdOutOfRange { id: incident.id });
        }
        if self.get(incident.id).is_some() {
            return Err(StoreError::DuplicateId { id: incident.id });
        }
        self.next_id = self.next_id.max(incident.id.0 + 1);
        self.record(
            incident.id,
            ActivityKind::Created,
            format!("reported: {}", incident.title),
            incident.timestamp,
        );
        self.incidents.push(incident);
        Ok(())
    }

    /// Setting the status an incident already has changes nothing.
    pub fn update_status(
        &mut self,
        id: IncidentId,
        status: Status,
    ) -> Result<Incident, StoreError> {
        let now = self.clock.now();
        let incident = self
            .incidents
            .iter_mut()
            .find(|i| i.id == id)
            .ok_or(StoreError::NotFound { id })?;

        let from = incident.status;
        if from == status {
            return Ok(incident.clone());
        }
        incident.status = status;
        incident.updated_at = Some(now);
        let updated = incident.clone();

        tracing::debug!(incident_id = %id, %from, to = %status, "incident status changed");
        self.record(
            id,
            ActivityKind::StatusChanged { from, to: status },
            format!("status {from} -> {status}"),
            now,
        );
        Ok(updated)
    }

    pub fn get(&self, id: IncidentId) -> Option<&Incident> {
        self.incidents.iter().find(|i| i.id == id)
    }

    /// All incidents in insertion order.
    pub fn incidents(&self) -> &[Incident] {
        &self.incidents
    }

    /// Newest first.
    pub fn recent(&self, n: usize) -> impl Iterator<Item = &Incident> {
        self.incidents.iter().rev().take(n)
    }

    pub fn len(&self) -> usize {
        self.incidents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.incidents.is_empty()
    }

    pub fn aggregate(&self) -> Aggregate {
        aggregate(&self.incidents)
    }

    pub fn categories(&self) -> &'static [Category] {
        &Category::ALL
    }

    pub fn events_for_incident(&self, id: IncidentId) -> Vec<ActivityEvent> {
        self.events
            .iter()
            .filter(|e| e.incident_id == id)
            .cloned()
            .collect()
    }

    pub fn events_after(&self, after_seq: u64) -> Vec<ActivityEvent> {
        self.events
            .iter()
            .filter(|e| e.seq > after_seq)
            .cloned()
            .collect()
    }

    pub fn latest_event_seq(&self) -> Option<u64> {
        self.events.last().map(|e| e.seq)
    }

    fn record(
        &mut self,
        incident_id: IncidentId,
        kind: ActivityKind,
        description: String,
        at: DateTime<Utc>,
    ) {
        let seq = self.events.len() as u64 + 1;
        self.events.push(ActivityEvent {
            seq,
            incident_id,
            kind,
            description,
            timestamp: at,
        });
    }
}
