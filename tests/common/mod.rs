//! Shared utilities for integration testing.

use std::net::SocketAddr;
use std::time::Duration;

use axum::{
    body::{Body, Bytes},
    http::{HeaderMap, Method, StatusCode, Uri},
    response::Response,
    routing::{any, get, post},
    Json, Router,
};
use serde_json::{json, Map, Value};
use tokio::net::TcpListener;

use scout_proxy::config::ProxyConfig;
use scout_proxy::http::HttpServer;
use scout_proxy::lifecycle::Shutdown;

/// Serve `app` on an ephemeral port and return its address.
pub async fn serve(app: Router) -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        let _ = axum::serve(listener, app).await;
    });
    addr
}

/// Start the proxy with `config` on an ephemeral port.
pub async fn start_proxy(config: ProxyConfig) -> (SocketAddr, Shutdown) {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let shutdown = Shutdown::new();
    let server = HttpServer::new(config).unwrap();
    let server_shutdown = shutdown.subscribe();

    tokio::spawn(async move {
        let _ = server.run(listener, server_shutdown).await;
    });

    (addr, shutdown)
}

/// An address nothing listens on.
#[allow(dead_code)]
pub async fn closed_addr() -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    addr
}

pub fn client() -> reqwest::Client {
    reqwest::Client::builder().no_proxy().build().unwrap()
}

/// Mock upstream data API.
///
/// - `/echo/*`: JSON description of the received request
/// - `/raw`: fixed bytes without a content type
/// - `/teapot`: 418 with a plain-text body
/// - `/slow`: answers after five seconds
#[allow(dead_code)]
pub async fn start_upstream() -> SocketAddr {
    let app = Router::new()
        .route("/echo", any(echo))
        .route("/echo/{*rest}", any(echo))
        .route("/raw", get(raw))
        .route("/teapot", get(teapot))
        .route("/slow", get(slow));
    serve(app).await
}

async fn echo(method: Method, uri: Uri, headers: HeaderMap, body: Bytes) -> Json<Value> {
    let headers: Map<String, Value> = headers
        .iter()
        .map(|(name, value)| {
            (
                name.as_str().to_string(),
                Value::String(value.to_str().unwrap_or_default().to_string()),
            )
        })
        .collect();

    Json(json!({
        "method": method.as_str(),
        "path": uri.path(),
        "query": uri.query(),
        "headers": headers,
        "body": String::from_utf8_lossy(&body),
    }))
}

pub const RAW_BODY: &[u8] = b"\x00\x01binary\xffpayload";

async fn raw() -> Response {
    Response::new(Body::from(RAW_BODY))
}

async fn teapot() -> (StatusCode, [(&'static str, &'static str); 1], &'static str) {
    (StatusCode::IM_A_TEAPOT, [("content-type", "text/plain")], "short and stout")
}

async fn slow() -> &'static str {
    tokio::time::sleep(Duration::from_secs(5)).await;
    "too late"
}

/// Mock chat-completions backend.
///
/// Replies with the model, the Authorization header and the prompt joined by
/// ` | `, so tests can see what was sent. `/fail` always answers 500.
#[allow(dead_code)]
pub async fn start_generation_backend() -> SocketAddr {
    let app = Router::new()
        .route("/v1/chat/completions", post(completions))
        .route("/fail", post(fail))
        .route("/empty", post(empty));
    serve(app).await
}

async fn completions(headers: HeaderMap, Json(request): Json<Value>) -> Json<Value> {
    let auth = headers
        .get("authorization")
        .and_then(|v| v.to_str().ok())
        .unwrap_or("none");
    let model = request["model"].as_str().unwrap_or("none");
    let prompt = request["messages"][0]["content"].as_str().unwrap_or("none");
    let content = format!("{} | {} | {}", model, auth, prompt);

    Json(json!({
        "id": "chatcmpl-test",
        "choices": [{ "index": 0, "message": { "role": "assistant", "content": content } }]
    }))
}

async fn fail() -> (StatusCode, Json<Value>) {
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(json!({ "error": { "message": "backend exploded" } })),
    )
}

async fn empty() -> Json<Value> {
    Json(json!({ "choices": [{ "message": { "content": "" } }] }))
}
