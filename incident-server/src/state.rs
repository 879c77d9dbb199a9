use incident_core::threats::ThreatTrend;
use incident_core::IncidentStore;
use std::sync::Arc;
use tokio::sync::Mutex;

pub type SharedStore = Arc<Mutex<IncidentStore>>;

#[derive(Clone)]
pub struct AppState {
    pub store: SharedStore,
    /// Read-only for the life of the server.
    pub threats: Arc<Vec<ThreatTrend>>,
}

impl AppState {
    pub fn new(store: IncidentStore) -> Self {
        Self {
            store: Arc::new(Mutex::new(store)),
            threats: Arc::new(Vec::new()),
        }
    }

    pub fn with_threats(mut self, threats: Vec<ThreatTrend>) -> Self {
        self.threats = Arc::new(threats);
        self
    }
}
