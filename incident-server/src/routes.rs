use crate::convert;
use crate::error::ApiError;
use crate::state::AppState;
use axum::extract::rejection::{JsonRejection, PathRejection};
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::get;
use axum::{Json, Router};
use incident_core::projection::{self, StatusFilter};
use incident_core::IncidentId;
use incident_schema::{
    ActivityV1, CreateIncidentV1, HealthV1, IncidentV1, StatsV1, ThreatTrendV1,
    UpdateIncidentV1,
};
use serde::Deserialize;

const ENDPOINTS: [(&str, &str); 10] = [
    ("GET /", "API documentation"),
    ("GET /api/health", "Health check"),
    ("GET /api/categories", "List incident categories"),
    ("GET /api/stats", "Incident counts"),
    ("GET /api/threats", "Active threat feed"),
    ("GET /api/incidents", "List incidents (?search=&status=)"),
    ("POST /api/incidents", "Create incident"),
    ("GET /api/incidents/:id", "Get incident by ID"),
    ("PUT /api/incidents/:id", "Update incident status by ID"),
    ("GET /api/incidents/:id/activity", "Incident activity log"),
];

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(index))
        .route("/api/health", get(health))
        .route("/api/categories", get(categories))
        .route("/api/stats", get(stats))
        .route("/api/threats", get(threats))
        .route("/api/incidents", get(list_incidents).post(create_incident))
        .route("/api/incidents/:id", get(get_incident).put(update_incident))
        .route("/api/incidents/:id/activity", get(incident_activity))
        .fallback(not_found)
        .with_state(state)
}

fn endpoint_map() -> serde_json::Value {
    ENDPOINTS
        .iter()
        .map(|(route, what)| (route.to_string(), serde_json::Value::from(*what)))
        .collect::<serde_json::Map<_, _>>()
        .into()
}

async fn index() -> Json<serde_json::Value> {
    Json(serde_json::json!({
        "message": "AI-Enabled Cyber Incident Portal API",
        "version": env!("CARGO_PKG_VERSION"),
        "available_endpoints": endpoint_map(),
    }))
}

async fn not_found() -> impl IntoResponse {
    (
        StatusCode::NOT_FOUND,
        Json(serde_json::json!({
            "error": "Not found",
            "message": "The requested URL was not found on the server.",
            "available_endpoints": endpoint_map(),
        })),
    )
}

async fn health() -> Json<HealthV1> {
    Json(HealthV1 {
        status: "healthy".into(),
        message: "Backend service is running".into(),
    })
}

async fn categories(State(state): State<AppState>) -> Json<Vec<String>> {
    let store = state.store.lock().await;
    Json(store.categories().iter().map(ToString::to_string).collect())
}

async fn stats(State(state): State<AppState>) -> Json<StatsV1> {
    let store = state.store.lock().await;
    Json(convert::stats_v1(&store.aggregate()))
}

async fn threats(State(state): State<AppState>) -> Json<Vec<ThreatTrendV1>> {
    Json(state.threats.iter().map(convert::threat_v1).collect())
}

#[derive(Debug, Default, Deserialize)]
struct ListQuery {
    search: Option<String>,
    status: Option<String>,
}

async fn list_incidents(
    State(state): State<AppState>,
    Query(query): Query<ListQuery>,
) -> Result<Json<Vec<IncidentV1>>, ApiError> {
    let filter = match query.status.as_deref() {
        Some(status) => status.parse::<StatusFilter>()?,
        None => StatusFilter::All,
    };
    let search = query.search.unwrap_or_default();

    let store = state.store.lock().await;
    let out = projection::visible_incidents(store.incidents(), &search, filter)
        .map(convert::incident_v1)
        .collect();
    Ok(Json(out))
}

async fn get_incident(
    State(state): State<AppState>,
    id: Result<Path<u64>, PathRejection>,
) -> Result<Json<IncidentV1>, ApiError> {
    let id = incident_id(id)?;
    let store = state.store.lock().await;
    store
        .get(id)
        .map(|incident| Json(convert::incident_v1(incident)))
        .ok_or(ApiError::NotFound)
}

async fn incident_activity(
    State(state): State<AppState>,
    id: Result<Path<u64>, PathRejection>,
) -> Result<Json<Vec<ActivityV1>>, ApiError> {
    let id = incident_id(id)?;
    let store = state.store.lock().await;
    if store.get(id).is_none() {
        return Err(ApiError::NotFound);
    }
    Ok(Json(
        store
            .events_for_incident(id)
            .iter()
            .map(convert::activity_v1)
            .collect(),
    ))
}

async fn create_incident(
    State(state): State<AppState>,
    body: Result<Json<CreateIncidentV1>, JsonRejection>,
) -> Result<(StatusCode, Json<IncidentV1>), ApiError> {
    let Json(body) = body.map_err(|e| ApiError::BadRequest(e.body_text()))?;
    let input = convert::new_incident(body)?;

    let mut store = state.store.lock().await;
    let incident = store.create(input);
    tracing::info!(
        incident_id = %incident.id,
        category = %incident.category,
        severity = %incident.severity,
        "incident reported"
    );
    Ok((StatusCode::CREATED, Json(convert::incident_v1(&incident))))
}

async fn update_incident(
    State(state): State<AppState>,
    id: Result<Path<u64>, PathRejection>,
    body: Result<Json<UpdateIncidentV1>, JsonRejection>,
) -> Result<Json<IncidentV1>, ApiError> {
    let id = incident_id(id)?;
    let Json(body) = body.map_err(|e| ApiError::BadRequest(e.body_text()))?;
    let status = convert::status_update(&body)?;

    let mut store = state.store.lock().await;
    let incident = store.update_status(id, status).inspect_err(|_| {
        tracing::warn!(incident_id = %id, "status update for unknown incident");
    })?;
    tracing::info!(incident_id = %id, status = %status, "incident status updated");
    Ok(Json(convert::incident_v1(&incident)))
}

fn incident_id(path: Result<Path<u64>, PathRejection>) -> Result<IncidentId, ApiError> {
    path.map(|Path(id)| IncidentId(id))
        .map_err(|e| ApiError::BadRequest(format!("invalid incident id: {}", e.body_text())))
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::Request;
    use chrono::{TimeZone, Utc};
    use incident_core::clock::FixedClock;
    use incident_core::seed::{sample_incidents, sample_threats};
    use incident_core::IncidentStore;
    use pretty_assertions::assert_eq;
    use tower::ServiceExt;

    fn app() -> Router {
        let now = Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).single().expect("valid time");
        let mut store = IncidentStore::with_seed(3).with_clock(FixedClock(now));
        for incident in sample_incidents(now) {
            store.insert(incident).expect("insert");
        }
        router(AppState::new(store).with_threats(sample_threats()))
    }

    async fn send(app: Router, req: Request<Body>) -> (StatusCode, serde_json::Value) {
        let resp = app.oneshot(req).await.expect("response");
        let status = resp.status();
        let body = axum::body::to_bytes(resp.into_body(), 64 * 1024)
            .await
            .expect("body");
        let json = serde_json::from_slice(&body).unwrap_or(serde_json::Value::Null);
        (status, json)
    }

    fn get(uri: &str) -> Request<Body> {
        Request::builder().uri(uri).body(Body::empty()).expect("request")
    }

    fn json(method: &str, uri: &str, body: serde_json::Value) -> Request<Body> {
        Request::builder()
            .method(method)
            .uri(uri)
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .expect("request")
    }

    #[tokio::test]
    async fn health_reports_healthy() {
        let (status, body) = send(app(), get("/api/health")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "healthy");
    }

    #[tokio::test]
    async fn categories_lists_every_category() {
        let (status, body) = send(app(), get("/api/categories")).await;
        assert_eq!(status, StatusCode::OK);
        let list = body.as_array().expect("array");
        assert_eq!(list.len(), 10);
        assert!(list.contains(&serde_json::Value::from("deepfake-attack")));
        assert_eq!(list[0], "unauthorized-access");
        assert!(list.contains(&serde_json::Value::from("social-engineering")));
    }

    #[tokio::test]
    async fn list_returns_store_order_and_filters() {
        let (_, all) = send(app(), get("/api/incidents")).await;
        let ids: Vec<u64> = all
            .as_array()
            .expect("array")
            .iter()
            .map(|i| i["id"].as_u64().expect("id"))
            .collect();
        assert_eq!(ids, vec![1, 2, 3, 4]);

        let (status, filtered) =
            send(app(), get("/api/incidents?search=attempt&status=investigating")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(filtered.as_array().map(Vec::len), Some(2));

        let (status, _) = send(app(), get("/api/incidents?status=pending")).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn create_returns_201_with_new_status() {
        let (status, body) = send(
            app(),
            json(
                "POST",
                "/api/incidents",
                serde_json::json!({
                    "type": "PHISHING",
                    "description": "CFO impersonation",
                    "severity": "HIGH"
                }),
            ),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(body["id"], 5);
        assert_eq!(body["status"], "new");
        assert_eq!(body["severity"], "high");
        assert_eq!(body["category"], "phishing");
        assert_eq!(body["threat_analysis"]["risk"], "high");
        assert_eq!(body["automated_response"].as_array().map(Vec::len), Some(4));
    }

    #[tokio::test]
    async fn create_accepts_legacy_deepfake_and_spear_phishing_types() {
        let (status, body) = send(
            app(),
            json(
                "POST",
                "/api/incidents",
                serde_json::json!({"type": "DEEPFAKE_ATTACK", "description": "cloned CO voice"}),
            ),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(body["category"], "deepfake-attack");
        assert_eq!(body["threat_analysis"]["risk"], "critical");
        assert_eq!(body["automated_response"][3], "Alert senior command");

        let (status, body) = send(
            app(),
            json(
                "POST",
                "/api/incidents",
                serde_json::json!({"type": "SPEAR_PHISHING", "description": "payroll lure"}),
            ),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(body["category"], "phishing");
        assert_eq!(body["automated_response"][1], "Block sender domain");
    }

    #[tokio::test]
    async fn threats_lists_feed() {
        let (status, body) = send(app(), get("/api/threats")).await;
        assert_eq!(status, StatusCode::OK);
        let feed = body.as_array().expect("array");
        assert_eq!(feed.len(), 4);
        assert_eq!(feed[0]["type"], "Spear Phishing");
        assert_eq!(feed[0]["count"], 12);
        assert_eq!(feed[3]["trend"], "stable");
    }

    #[tokio::test]
    async fn create_rejects_invalid_payloads() {
        let (status, body) = send(
            app(),
            json(
                "POST",
                "/api/incidents",
                serde_json::json!({"type": "malware", "severity": "urgent"}),
            ),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "Bad request");
        assert_eq!(body["message"], "invalid severity 'urgent'");

        let malformed = Request::builder()
            .method("POST")
            .uri("/api/incidents")
            .header("content-type", "application/json")
            .body(Body::from("{not json"))
            .expect("request");
        let (status, _) = send(app(), malformed).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn update_changes_status_and_logs_activity() {
        let app = app();
        let (status, body) = send(
            app.clone(),
            json("PUT", "/api/incidents/1", serde_json::json!({"status": "resolved"})),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "resolved");
        assert!(body["updated_at"].is_string());

        let (_, stats) = send(app.clone(), get("/api/stats")).await;
        assert_eq!(stats["total"], 4);
        assert_eq!(stats["resolved_count"], 2);
        assert_eq!(stats["active_count"], 2);
        assert_eq!(stats["by_status"]["resolved"], 2);
        assert_eq!(stats["by_status"]["mitigating"], 1);
        assert_eq!(stats["by_severity"]["critical"], 2);
        assert_eq!(stats["by_severity"]["high"], 2);

        let (_, activity) = send(app, get("/api/incidents/1/activity")).await;
        let events = activity.as_array().expect("array");
        assert_eq!(events.len(), 2);
        assert_eq!(events[1]["event_type"], "status_changed");
    }

    #[tokio::test]
    async fn update_unknown_id_is_404() {
        let (status, body) = send(
            app(),
            json("PUT", "/api/incidents/99", serde_json::json!({"status": "closed"})),
        )
        .await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["error"], "Incident not found");

        let (status, _) = send(app(), get("/api/incidents/99")).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn non_numeric_id_is_bad_request() {
        let (status, _) = send(app(), get("/api/incidents/abc")).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn unknown_route_lists_endpoints() {
        let (status, body) = send(app(), get("/api/nope")).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["error"], "Not found");
        assert!(body["available_endpoints"]["GET /api/incidents"].is_string());
    }
}
