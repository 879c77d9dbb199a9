//! Typed client for the portal API.
//!
//! Every failure keeps its cause for diagnostics, but callers showing it to
//! a user should use [`ClientError::user_message`], which collapses
//! transport, HTTP status and decode failures into one line per operation.
//! No retries.

use crate::config::ServerConfig;
use incident_schema::{CreateIncidentV1, ErrorV1, IncidentV1, UpdateIncidentV1};
use serde::de::DeserializeOwned;
use std::fmt;
use std::time::Duration;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Operation {
    LoadIncidents,
    LoadCategories,
    CreateIncident,
    UpdateStatus,
}

impl Operation {
    pub fn user_message(self) -> &'static str {
        match self {
            Self::LoadIncidents => "Failed to load incidents",
            Self::LoadCategories => "Failed to load incident categories",
            Self::CreateIncident => "Failed to create incident",
            Self::UpdateStatus => "Failed to update incident status",
        }
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::LoadIncidents => "load incidents",
            Self::LoadCategories => "load categories",
            Self::CreateIncident => "create incident",
            Self::UpdateStatus => "update status",
        };
        f.write_str(name)
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    #[error("{op}: request failed: {source}")]
    Transport {
        op: Operation,
        #[source]
        source: reqwest::Error,
    },

    #[error("{op}: server returned HTTP {status}")]
    Status {
        op: Operation,
        status: u16,
        body: Option<ErrorV1>,
    },

    #[error("{op}: could not decode response: {source}")]
    Decode {
        op: Operation,
        #[source]
        source: reqwest::Error,
    },
}

impl ClientError {
    pub fn operation(&self) -> Operation {
        match self {
            Self::Transport { op, .. } | Self::Status { op, .. } | Self::Decode { op, .. } => *op,
        }
    }

    pub fn user_message(&self) -> &'static str {
        self.operation().user_message()
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::Status { status: 404, .. })
    }
}

#[derive(Clone, Debug)]
pub struct PortalClient {
    http: reqwest::Client,
    base_url: String,
}

impl PortalClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: trim_base(base_url.into()),
        }
    }

    pub fn with_timeout(
        base_url: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self, reqwest::Error> {
        let http = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            http,
            base_url: trim_base(base_url.into()),
        })
    }

    /// Client for the server `config` describes, with its request timeout.
    pub fn for_config(config: &ServerConfig) -> Result<Self, reqwest::Error> {
        Self::with_timeout(
            format!("http://{}", config.bind_addr()),
            Duration::from_secs(config.request_timeout_secs),
        )
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub async fn fetch_incidents(&self) -> Result<Vec<IncidentV1>, ClientError> {
        let req = self.http.get(self.url("/api/incidents"));
        self.send(Operation::LoadIncidents, req).await
    }

    pub async fn fetch_categories(&self) -> Result<Vec<String>, ClientError> {
        let req = self.http.get(self.url("/api/categories"));
        self.send(Operation::LoadCategories, req).await
    }

    pub async fn create_incident(
        &self,
        body: &CreateIncidentV1,
    ) -> Result<IncidentV1, ClientError> {
        let req = self.http.post(self.url("/api/incidents")).json(body);
        self.send(Operation::CreateIncident, req).await
    }

    pub async fn update_status(&self, id: u64, status: &str) -> Result<IncidentV1, ClientError> {
        let body = UpdateIncidentV1 {
            status: status.to_string(),
        };
        let req = self
            .http
            .put(self.url(&format!("/api/incidents/{id}")))
            .json(&body);
        self.send(Operation::UpdateStatus, req).await
    }

    fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }

    async fn send<T: DeserializeOwned>(
        &self,
        op: Operation,
        req: reqwest::RequestBuilder,
    ) -> Result<T, ClientError> {
        let result = execute(op, req).await;
        if let Err(err) = &result {
            tracing::error!(error = %err, base_url = %self.base_url, "{}", op.user_message());
        }
        result
    }
}

async fn execute<T: DeserializeOwned>(
    op: Operation,
    req: reqwest::RequestBuilder,
) -> Result<T, ClientError> {
    let resp = req
        .send()
        .await
        .map_err(|source| ClientError::Transport { op, source })?;

    let status = resp.status();
    if !status.is_success() {
        let body = resp.json::<ErrorV1>().await.ok();
        return Err(ClientError::Status {
            op,
            status: status.as_u16(),
            body,
        });
    }

    resp.json::<T>()
        .await
        .map_err(|source| ClientError::Decode { op, source })
}

fn trim_base(mut base: String) -> String {
    while base.ends_with('/') {
        base.pop();
    }
    base
}
