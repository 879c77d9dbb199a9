//! One portal session: an incident store plus the transient view state,
//! driven by discrete UI events.

use crate::error::{PortalError, StoreError};
use crate::incident::{Category, IncidentId, NewIncident, Severity, Status};
use crate::projection::{self, IncidentCard, StatusFilter, Tab, ViewState};
use crate::store::{Aggregate, IncidentStore};
use crate::threats::ThreatTrend;
use serde::{Deserialize, Serialize};

const RECENT_ON_DASHBOARD: usize = 3;

/// The report form as submitted.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportForm {
    pub title: String,
    pub category: Category,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub severity: Option<Severity>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum PortalEvent {
    Search(String),
    Filter(StatusFilter),
    SelectTab(Tab),
    SubmitReport(ReportForm),
    ChangeStatus { id: IncidentId, status: Status },
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Dashboard {
    pub stats: Aggregate,
    pub recent: Vec<IncidentCard>,
    pub threats: Vec<ThreatTrend>,
}

pub struct Portal {
    store: IncidentStore,
    threats: Vec<ThreatTrend>,
    view: ViewState,
    error: Option<String>,
}

impl Portal {
    pub fn new(store: IncidentStore) -> Self {
        Self {
            store,
            threats: Vec::new(),
            view: ViewState::default(),
            error: None,
        }
    }

    pub fn with_threats(mut self, threats: Vec<ThreatTrend>) -> Self {
        self.threats = threats;
        self
    }

    pub fn threats(&self) -> &[ThreatTrend] {
        &self.threats
    }

    pub fn store(&self) -> &IncidentStore {
        &self.store
    }

    pub fn view(&self) -> &ViewState {
        &self.view
    }

    /// Last user-facing failure, cleared by the next successful event.
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn handle(&mut self, event: PortalEvent) -> Result<(), PortalError> {
        let result = self.apply(event);
        match &result {
            Ok(()) => self.error = None,
            Err(PortalError::Store(StoreError::NotFound { id })) => {
                tracing::warn!(incident_id = %id, "status change for unknown incident");
                self.error = Some("Failed to update incident status".into());
            }
            Err(err) => {
                tracing::warn!(error = %err, "portal event rejected");
                self.error = Some(err.to_string());
            }
        }
        result
    }

    fn apply(&mut self, event: PortalEvent) -> Result<(), PortalError> {
        match event {
            PortalEvent::Search(text) => self.view.search = text,
            PortalEvent::Filter(filter) => self.view.filter = filter,
            PortalEvent::SelectTab(tab) => self.view.tab = tab,
            PortalEvent::SubmitReport(form) => {
                if form.title.trim().is_empty() {
                    return Err(PortalError::MissingField { field: "title" });
                }
                let input = NewIncident {
                    title: form.title,
                    category: form.category,
                    description: form.description,
                    severity: form.severity,
                };
                self.store.create(input);
                self.view.tab = Tab::Incidents;
            }
            PortalEvent::ChangeStatus { id, status } => {
                self.store.update_status(id, status)?;
            }
        }
        Ok(())
    }

    /// Cards for the incidents tab under the current search and filter.
    pub fn visible(&self) -> Vec<IncidentCard> {
        let now = self.store.now();
        projection::visible_incidents(self.store.incidents(), &self.view.search, self.view.filter)
            .map(|incident| IncidentCard::new(incident, now))
            .collect()
    }

    pub fn dashboard(&self) -> Dashboard {
        let now = self.store.now();
        Dashboard {
            stats: self.store.aggregate(),
            recent: self
                .store
                .recent(RECENT_ON_DASHBOARD)
                .map(|incident| IncidentCard::new(incident, now))
                .collect(),
            threats: self.threats.clone(),
        }
    }
}
