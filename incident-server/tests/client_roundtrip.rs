use incident_schema::CreateIncidentV1;
use incident_server::client::Operation;
use incident_server::config::ServerConfig;
use incident_server::{server, PortalClient};
use pretty_assertions::assert_eq;
use std::time::Duration;

async fn spawn_portal() -> PortalClient {
    let mut config = ServerConfig {
        confidence_seed: Some(11),
        request_timeout_secs: 5,
        ..ServerConfig::default()
    };
    let state = server::build_state(&config).expect("state");
    let app = server::app(state, &config);

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind");
    config.port = listener.local_addr().expect("addr").port();
    tokio::spawn(async move {
        let _ = server::serve(listener, app).await;
    });

    PortalClient::for_config(&config).expect("client")
}

#[tokio::test]
async fn create_update_and_list_through_the_client() {
    let client = spawn_portal().await;

    let categories = client.fetch_categories().await.expect("categories");
    assert_eq!(categories.len(), 10);
    assert!(categories.iter().any(|c| c == "espionage"));

    let created = client
        .create_incident(&CreateIncidentV1 {
            incident_type: "data-breach".into(),
            title: Some("Customer table dumped".into()),
            description: "Dump offered for sale on a forum".into(),
            severity: Some("critical".into()),
        })
        .await
        .expect("create");
    assert_eq!(created.id, 5);
    assert_eq!(created.status, "new");
    assert_eq!(created.threat_analysis.risk, "critical");
    assert!((80..100).contains(&created.ai_confidence));

    let updated = client
        .update_status(created.id, "investigating")
        .await
        .expect("update");
    assert_eq!(updated.status, "investigating");
    assert!(updated.updated_at.is_some());

    let all = client.fetch_incidents().await.expect("list");
    let ids: Vec<u64> = all.iter().map(|i| i.id).collect();
    assert_eq!(ids, vec![1, 2, 3, 4, 5]);
    assert_eq!(all[4].status, "investigating");
}

#[tokio::test]
async fn unknown_incident_update_is_not_found() {
    let client = spawn_portal().await;

    let err = client
        .update_status(404, "closed")
        .await
        .expect_err("unknown id");
    assert!(err.is_not_found());
    assert_eq!(err.operation(), Operation::UpdateStatus);
    assert_eq!(err.user_message(), "Failed to update incident status");
    match err {
        incident_server::ClientError::Status { body: Some(body), .. } => {
            assert_eq!(body.error, "Incident not found");
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[tokio::test]
async fn unreachable_backend_maps_to_generic_message() {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind");
    let addr = listener.local_addr().expect("addr");
    drop(listener);

    let client = PortalClient::with_timeout(format!("http://{addr}"), Duration::from_secs(2))
        .expect("client");
    let err = client.fetch_incidents().await.expect_err("nothing listening");
    assert!(matches!(
        err,
        incident_server::ClientError::Transport { .. }
    ));
    assert_eq!(err.user_message(), "Failed to load incidents");
}
