//! Client integration tests against an in-process backend serving canned
//! responses over real HTTP.

use axum::extract::{Form, Path};
use axum::http::{HeaderMap, StatusCode};
use axum::response::IntoResponse;
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::Deserialize;
use serde_json::json;

use clouddeck_client::{ApiClient, ApiContext};
use clouddeck_common::{Error, ServerStatus};

const TOKEN: &str = "test-token";

fn authorized(headers: &HeaderMap) -> bool {
    headers
        .get("authorization")
        .and_then(|v| v.to_str().ok())
        .map(|v| v == format!("Bearer {}", TOKEN))
        .unwrap_or(false)
}

fn unauthorized() -> impl IntoResponse {
    (
        StatusCode::UNAUTHORIZED,
        Json(json!({"detail": "Not authenticated"})),
    )
}

async fn list_servers(headers: HeaderMap) -> impl IntoResponse {
    if !authorized(&headers) {
        return unauthorized().into_response();
    }
    Json(json!({
        "servers": [
            {
                "id": 101,
                "name": "web-1",
                "status": "running",
                "ip": "203.0.113.10",
                "location": "fsn1",
                "server_type": "cx22",
                "image": "debian-12",
                "created": "2025-02-01T09:00:00Z"
            },
            {
                "id": 102,
                "name": "web-2",
                "status": "off",
                "ip": null,
                "location": null,
                "server_type": null,
                "image": null,
                "created": null
            }
        ]
    }))
    .into_response()
}

async fn request_console(
    headers: HeaderMap,
    Path((_project, server)): Path<(i64, i64)>,
) -> impl IntoResponse {
    if !authorized(&headers) {
        return unauthorized().into_response();
    }
    if server == 999 {
        return (
            StatusCode::NOT_FOUND,
            Json(json!({"detail": "Server not found: 999"})),
        )
            .into_response();
    }
    Json(json!({
        "wss_url": "wss://console.example.com:6080/websockify?token=abc123",
        "password": "one-time-pw",
        "expires_at": "2025-02-01T10:00:00Z"
    }))
    .into_response()
}

#[derive(Deserialize)]
struct LoginForm {
    username: String,
    password: String,
}

async fn token(Form(form): Form<LoginForm>) -> impl IntoResponse {
    if form.username == "admin" && form.password == "pw" {
        Json(json!({"access_token": "fresh-token", "token_type": "bearer"})).into_response()
    } else {
        (
            StatusCode::UNAUTHORIZED,
            Json(json!({"detail": "Incorrect username or password"})),
        )
            .into_response()
    }
}

async fn logs(headers: HeaderMap) -> impl IntoResponse {
    if !authorized(&headers) {
        return unauthorized().into_response();
    }
    Json(json!([
        {
            "id": 1,
            "action": "SERVER_LIST",
            "details": "Retrieved 2 servers",
            "status": "success",
            "created_at": "2025-02-01T09:05:00Z"
        }
    ]))
    .into_response()
}

async fn spawn_backend() -> String {
    let app = Router::new()
        .route("/auth/token", post(token))
        .route("/projects/:project/servers", get(list_servers))
        .route(
            "/projects/:project/servers/:id/request_console",
            post(request_console),
        )
        .route("/projects/:project/logs", get(logs));

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
    ApiClient::new(ApiContext::new(base).with_token(TOKEN)).expect("client")
}

#[tokio::test]
async fn test_list_servers_decodes_typed_payload() {
    let base = spawn_backend().await;
    let servers = client(&base).list_servers(1).await.expect("list servers");

    assert_eq!(servers.len(), 2);
    assert_eq!(servers[0].name, "web-1");
    assert_eq!(servers[0].status, ServerStatus::Running);
    assert_eq!(servers[0].ip.as_deref(), Some("203.0.113.10"));
    assert_eq!(servers[1].status, ServerStatus::Off);
    assert!(servers[1].ip.is_none());
}

#[tokio::test]
async fn test_bearer_token_required() {
    let base = spawn_backend().await;
    let unauthenticated = ApiClient::new(ApiContext::new(&base)).expect("client");

    match unauthenticated.list_servers(1).await {
        Err(Error::Api { status, detail }) => {
            assert_eq!(status, 401);
            assert_eq!(detail, "Not authenticated");
        }
        other => panic!("expected 401 Api error, got {:?}", other.map(|v| v.len())),
    }
}

#[tokio::test]
async fn test_console_grant_bootstrap() {
    let base = spawn_backend().await;
    let grant = client(&base)
        .request_console(1, 101)
        .await
        .expect("console grant");

    assert_eq!(
        grant.wss_url,
        "wss://console.example.com:6080/websockify?token=abc123"
    );
    assert_eq!(grant.password, "one-time-pw");
    assert!(grant.expires_at.is_some());
}

#[tokio::test]
async fn test_console_bootstrap_failure_surfaces_backend_detail() {
    let base = spawn_backend().await;
    match client(&base).request_console(1, 999).await {
        Err(Error::Api { status, detail }) => {
            assert_eq!(status, 404);
            assert!(detail.contains("Server not found"));
        }
        other => panic!("expected 404 Api error, got {:?}", other.is_ok()),
    }
}

#[tokio::test]
async fn test_login_is_form_encoded() {
    let base = spawn_backend().await;
    let anonymous = ApiClient::new(ApiContext::new(&base)).expect("client");

    let session = anonymous.login("admin", "pw").await.expect("login");
    assert_eq!(session.access_token, "fresh-token");

    match anonymous.login("admin", "wrong").await {
        Err(Error::Api { status, detail }) => {
            assert_eq!(status, 401);
            assert!(detail.contains("Incorrect username"));
        }
        other => panic!("expected 401, got {:?}", other.is_ok()),
    }
}

#[tokio::test]
async fn test_logs_decode_as_bare_array() {
    let base = spawn_backend().await;
    let entries = client(&base).list_logs(1, 0, 50).await.expect("logs");
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0].action, "SERVER_LIST");
    assert_eq!(entries[0].status, "success");
}

#[tokio::test]
async fn test_unreachable_backend_is_network_error() {
    // Nothing listens here.
    let client = ApiClient::new(ApiContext::new("http://127.0.0.1:1").with_token(TOKEN))
        .expect("client");
    match client.list_servers(1).await {
        Err(Error::Network(_)) => {}
        other => panic!("expected network error, got {:?}", other.is_ok()),
    }
}
