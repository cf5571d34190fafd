//! End-to-end console bootstrap flow against an in-process backend.

use axum::extract::Path;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::post;
use axum::{Json, Router};
use serde_json::json;

use clouddeck_client::{ApiClient, ApiContext};
use clouddeck_common::Error;
use clouddeck_console::{ConsoleBridge, ConsolePhase};

async fn request_console(Path((_project, server)): Path<(i64, i64)>) -> impl IntoResponse {
    match server {
        999 => (
            StatusCode::NOT_FOUND,
            Json(json!({"detail": "Server not found: 999"})),
        )
            .into_response(),
        998 => Json(json!({
            "wss_url": "ftp://console.example.com/ws",
            "password": "pw"
        }))
        .into_response(),
        _ => Json(json!({
            "wss_url": "wss://console.example.com:6080/websockify?token=abc123",
            "password": "one-time-pw"
        }))
        .into_response(),
    }
}

async fn spawn_backend() -> String {
    let app = Router::new().route(
        "/projects/:project/servers/:id/request_console",
        post(request_console),
    );
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind test listener");
    let addr = listener.local_addr().expect("local addr");
    tokio::spawn(async move {
        axum::serve(listener, app).await.expect("serve");
    });
    format!("http://{}", addr)
}

fn client(base: &str) -> ApiClient {
    ApiClient::new(ApiContext::new(base).with_token("test-token")).expect("client")
}

#[tokio::test]
async fn test_bootstrap_reaches_ready_and_embeds() {
    let base = spawn_backend().await;
    let mut bridge = ConsoleBridge::new();

    bridge
        .request_session(&client(&base), 1, 101)
        .await
        .expect("bootstrap");
    assert_eq!(bridge.phase(), ConsolePhase::Ready);

    let target = bridge.embed().expect("embed");
    assert_eq!(bridge.phase(), ConsolePhase::Embedded);
    assert!(target.contains("host=console.example.com"));
    assert!(target.contains("port=6080"));
    assert!(target.contains("encrypt=1"));
}

#[tokio::test]
async fn test_backend_404_closes_with_detail() {
    let base = spawn_backend().await;
    let mut bridge = ConsoleBridge::new();

    let err = bridge
        .request_session(&client(&base), 1, 999)
        .await
        .unwrap_err();
    match err {
        Error::Api { status, detail } => {
            assert_eq!(status, 404);
            assert!(detail.contains("Server not found"));
        }
        other => panic!("expected Api error, got {}", other),
    }
    // Never reached Ready.
    assert_eq!(bridge.phase(), ConsolePhase::Closed);
    assert!(bridge.session().is_none());
}

#[tokio::test]
async fn test_unusable_signaling_url_closes_generically() {
    let base = spawn_backend().await;
    let mut bridge = ConsoleBridge::new();

    let err = bridge
        .request_session(&client(&base), 1, 998)
        .await
        .unwrap_err();
    assert_eq!(err.to_string(), "invalid console URL format");
    assert_eq!(bridge.phase(), ConsolePhase::Closed);
}

#[tokio::test]
async fn test_second_request_rejected_structurally() {
    let base = spawn_backend().await;
    let mut bridge = ConsoleBridge::new();

    bridge
        .request_session(&client(&base), 1, 101)
        .await
        .expect("bootstrap");

    let err = bridge
        .request_session(&client(&base), 1, 101)
        .await
        .unwrap_err();
    assert!(matches!(err, Error::InvalidStateTransition { .. }));
    // The first session is untouched.
    assert_eq!(bridge.phase(), ConsolePhase::Ready);
}
