pub mod assessment;
pub mod clock;
pub mod error;
pub mod incident;
pub mod portal;
pub mod projection;
pub mod seed;
pub mod store;
pub mod threats;

pub use error::{PortalError, StoreError};
pub use incident::{Category, Incident, IncidentId, NewIncident, Severity, Status};
pub use store::{Aggregate, IncidentStore};
