use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use incident_core::incident::ParseEnumError;
use incident_core::StoreError;
use incident_schema::{ErrorV1, SchemaError};

#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("Incident not found")]
    NotFound,

    #[error("{0}")]
    BadRequest(String),
}

impl From<StoreError> for ApiError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::NotFound { .. } => Self::NotFound,
            StoreError::DuplicateId { .. } | StoreError::IdOutOfRange { .. } => {
                Self::BadRequest(err.to_string())
            }
        }
    }
}

impl From<SchemaError> for ApiError {
    fn from(err: SchemaError) -> Self {
        Self::BadRequest(err.to_string())
    }
}

impl From<ParseEnumError> for ApiError {
    fn from(err: ParseEnumError) -> Self {
        Self::BadRequest(err.to_string())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, body) = match self {
            Self::NotFound => (
                StatusCode::NOT_FOUND,
                ErrorV1 {
                    error: "Incident not found".into(),
                    message: None,
                },
            ),
            Self::BadRequest(message) => (
                StatusCode::BAD_REQUEST,
                ErrorV1 {
                    error: "Bad request".into(),
                    message: Some(message),
                },
            ),
        };
        (status, Json(body)).into_response()
    }
}
