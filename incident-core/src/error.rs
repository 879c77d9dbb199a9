use crate::incident::IncidentId;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum StoreError {
    #[error("incident {id} not found")]
    NotFound { id: IncidentId },

    #[error("incident {id} already exists")]
    DuplicateId { id: IncidentId },

    #[error("incident id {id} is out of range")]
    IdOutOfRange { id: IncidentId },
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PortalError {
    #[error(transparent)]
    Store(#[from] StoreError),

    #[error("report is missing a {field}")]
    MissingField { field: &'static str },
}
