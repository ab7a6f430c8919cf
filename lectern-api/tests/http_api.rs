//! Integration tests for the HTTP surface of the signaling relay
//!
//! Drives the router directly with `tower::ServiceExt::oneshot`; the
//! WebSocket state machine itself is covered in `lectern-core`.
//!
//! Run with: cargo test --test http_api

use std::sync::Arc;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use http_body_util::BodyExt;
use tower::ServiceExt;

use lectern_core::{Config, SessionHub};

fn test_router() -> axum::Router {
    lectern_api::http::create_router(Arc::new(SessionHub::new()), Arc::new(Config::default()))
}

async fn body_json(response: axum::response::Response) -> serde_json::Value {
    let bytes = response
        .into_body()
        .collect()
        .await
        .expect("body should be readable")
        .to_bytes();
    serde_json::from_slice(&bytes).expect("body should be JSON")
}

#[tokio::test]
async fn test_get_turn_credentials_returns_stun_only_servers() {
    let response = test_router()
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/signaling")
                .header("content-type", "application/json")
                .body(Body::from(r#"{"action":"get-turn-credentials"}"#))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(response).await;
    let servers = json["iceServers"]
        .as_array()
        .expect("iceServers should be an array");
    assert!(!servers.is_empty());
    for server in servers {
        let urls = server["urls"].as_str().expect("urls should be a string");
        assert!(urls.starts_with("stun:"), "unexpected entry: {urls}");
    }
}

#[tokio::test]
async fn test_unknown_action_yields_400() {
    let response = test_router()
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/signaling")
                .header("content-type", "application/json")
                .body(Body::from(r#"{"action":"allocate-relay"}"#))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(
        body_json(response).await,
        serde_json::json!({"error": "Unknown action"})
    );
}

#[tokio::test]
async fn test_non_json_body_yields_400() {
    let response = test_router()
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/signaling")
                .body(Body::from("not json at all"))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(
        body_json(response).await,
        serde_json::json!({"error": "Unknown action"})
    );
}

#[tokio::test]
async fn test_unconfigured_stun_list_is_flagged() {
    let config = Config {
        webrtc: lectern_core::config::WebRtcConfig {
            stun_servers: vec![],
        },
        ..Config::default()
    };
    let router =
        lectern_api::http::create_router(Arc::new(SessionHub::new()), Arc::new(config));

    let response = router
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/signaling")
                .body(Body::from(r#"{"action":"get-turn-credentials"}"#))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
    let json = body_json(response).await;
    assert_eq!(json["notConfigured"], true);
}

#[tokio::test]
async fn test_cors_preflight_is_accepted() {
    let response = test_router()
        .oneshot(
            Request::builder()
                .method("OPTIONS")
                .uri("/signaling")
                .header("origin", "https://app.example.com")
                .header("access-control-request-method", "POST")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert!(response
        .headers()
        .contains_key("access-control-allow-origin"));
}

#[tokio::test]
async fn test_health_probe() {
    let response = test_router()
        .oneshot(
            Request::builder()
                .uri("/health")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_stats_reflects_hub_occupancy() {
    let hub = Arc::new(SessionHub::new());

    let (tx, _rx) = tokio::sync::mpsc::unbounded_channel();
    hub.join(
        "s1".into(),
        "alice".into(),
        true,
        lectern_core::ConnectionId::generate(),
        tx,
    );

    let router = lectern_api::http::create_router(hub, Arc::new(Config::default()));
    let response = router
        .oneshot(
            Request::builder()
                .uri("/stats")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        body_json(response).await,
        serde_json::json!({"sessions": 1, "connections": 1})
    );
}
