//! End-to-end forwarding tests against mock upstreams.

use std::net::SocketAddr;
use std::time::{Duration, Instant};

use reqwest::{Method, StatusCode};
use serde_json::Value;

use scout_proxy::config::ProxyConfig;
use scout_proxy::profile::headers::BROWSER_USER_AGENT;

mod common;

fn config_for(upstream: SocketAddr) -> ProxyConfig {
    let mut config = ProxyConfig::default();
    config.listener.bind_address = "127.0.0.1:0".into();
    config.forwarder.base_url = format!("http://{}", upstream);
    config
}

fn encoded(url: &str) -> String {
    url::form_urlencoded::byte_serialize(url.as_bytes()).collect()
}

fn assert_cors(response: &reqwest::Response) {
    let headers = response.headers();
    assert_eq!(headers["access-control-allow-origin"], "*");
    assert_eq!(headers["access-control-allow-methods"], "GET, POST, OPTIONS");
    let allowed = headers["access-control-allow-headers"].to_str().unwrap().to_lowercase();
    assert!(allowed.contains("content-type"));
    assert!(allowed.contains("x-auth-token"));
}

#[tokio::test]
async fn test_preflight_on_any_path() {
    let upstream = common::start_upstream().await;
    let (proxy, shutdown) = common::start_proxy(config_for(upstream)).await;
    let client = common::client();

    for path in ["/", "/proxy/players/1", "/generate-description", "/health", "/does/not/exist"] {
        let res = client
            .request(Method::OPTIONS, format!("http://{}{}", proxy, path))
            .send()
            .await
            .expect("Proxy unreachable");

        assert!(res.status().is_success(), "{} -> {}", path, res.status());
        assert_cors(&res);
        assert!(res.bytes().await.unwrap().is_empty(), "{} returned a body", path);
    }

    shutdown.trigger();
}

#[tokio::test]
async fn test_fixed_route_rewrites_path_and_keeps_query() {
    let upstream = common::start_upstream().await;
    let (proxy, shutdown) = common::start_proxy(config_for(upstream)).await;

    let res = common::client()
        .get(format!("http://{}/proxy/echo/players/search?name=m%C3%BCller&page=2", proxy))
        .header("x-auth-token", "secret-token")
        .header("cookie", "session=1")
        .send()
        .await
        .unwrap();

    assert_eq!(res.status(), StatusCode::OK);
    assert_cors(&res);
    let echo: Value = res.json().await.unwrap();
    assert_eq!(echo["method"], "GET");
    assert_eq!(echo["path"], "/echo/players/search");
    assert_eq!(echo["query"], "name=m%C3%BCller&page=2");
    assert_eq!(echo["headers"]["x-auth-token"], "secret-token");
    assert_eq!(echo["headers"]["content-type"], "application/json");
    assert!(echo["headers"].get("cookie").is_none());

    shutdown.trigger();
}

#[tokio::test]
async fn test_body_relayed_byte_for_byte() {
    let upstream = common::start_upstream().await;
    let (proxy, shutdown) = common::start_proxy(config_for(upstream)).await;
    let client = common::client();

    let direct = client
        .get(format!("http://{}/raw", upstream))
        .send()
        .await
        .unwrap()
        .bytes()
        .await
        .unwrap();

    let res = client
        .get(format!("http://{}/proxy/raw", proxy))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    // Upstream sent no content type.
    assert_eq!(res.headers()["content-type"], "application/json");
    let proxied = res.bytes().await.unwrap();

    assert_eq!(&proxied[..], common::RAW_BODY);
    assert_eq!(proxied, direct);

    let target = format!("http://{}/raw", upstream);
    let res = client
        .get(format!("http://{}/?url={}", proxy, encoded(&target)))
        .send()
        .await
        .unwrap();
    assert_eq!(res.bytes().await.unwrap(), direct);

    shutdown.trigger();
}

#[tokio::test]
async fn test_post_body_is_forwarded() {
    let upstream = common::start_upstream().await;
    let (proxy, shutdown) = common::start_proxy(config_for(upstream)).await;

    let payload = r#"{"query":"wonderkids","filters":{"maxAge":21}}"#;
    let res = common::client()
        .post(format!("http://{}/proxy/echo/search", proxy))
        .header("content-type", "application/json")
        .body(payload)
        .send()
        .await
        .unwrap();

    let echo: Value = res.json().await.unwrap();
    assert_eq!(echo["method"], "POST");
    assert_eq!(echo["body"], payload);

    shutdown.trigger();
}

#[tokio::test]
async fn test_upstream_status_and_content_type_relayed() {
    let upstream = common::start_upstream().await;
    let (proxy, shutdown) = common::start_proxy(config_for(upstream)).await;

    let res = common::client()
        .get(format!("http://{}/proxy/teapot", proxy))
        .send()
        .await
        .unwrap();

    assert_eq!(res.status(), StatusCode::IM_A_TEAPOT);
    assert_eq!(res.headers()["content-type"], "text/plain");
    assert_cors(&res);
    assert_eq!(res.text().await.unwrap(), "short and stout");

    shutdown.trigger();
}

#[tokio::test]
async fn test_missing_url_parameter() {
    let upstream = common::start_upstream().await;
    let (proxy, shutdown) = common::start_proxy(config_for(upstream)).await;
    let client = common::client();

    for query in ["", "?type=token", "?type=browser&url="] {
        let res = client
            .get(format!("http://{}/{}", proxy, query))
            .send()
            .await
            .unwrap();

        assert_eq!(res.status(), StatusCode::BAD_REQUEST, "query {:?}", query);
        assert_cors(&res);
        let body: Value = res.json().await.unwrap();
        assert!(body["error"].as_str().unwrap().contains("Missing"));
    }

    shutdown.trigger();
}

#[tokio::test]
async fn test_invalid_url_parameter() {
    let upstream = common::start_upstream().await;
    let (proxy, shutdown) = common::start_proxy(config_for(upstream)).await;

    let res = common::client()
        .get(format!("http://{}/fetch?url=not%20a%20url", proxy))
        .send()
        .await
        .unwrap();

    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    let body: Value = res.json().await.unwrap();
    assert!(body["error"].as_str().unwrap().starts_with("Invalid url parameter"));

    shutdown.trigger();
}

#[tokio::test]
async fn test_timeout_returns_504_within_bound() {
    let upstream = common::start_upstream().await;
    let mut config = config_for(upstream);
    config.forwarder.timeout_secs = 1;
    let (proxy, shutdown) = common::start_proxy(config).await;

    let start = Instant::now();
    let res = common::client()
        .get(format!("http://{}/proxy/slow", proxy))
        .timeout(Duration::from_secs(10))
        .send()
        .await
        .expect("Proxy must answer instead of hanging");
    let elapsed = start.elapsed();

    assert_eq!(res.status(), StatusCode::GATEWAY_TIMEOUT);
    assert!(elapsed >= Duration::from_secs(1), "answered too early: {:?}", elapsed);
    assert!(elapsed < Duration::from_secs(3), "answered too late: {:?}", elapsed);
    assert_cors(&res);
    let body: Value = res.json().await.unwrap();
    assert!(body["error"].as_str().unwrap().contains("timed out"));

    shutdown.trigger();
}

#[tokio::test]
async fn test_network_failure_returns_500() {
    let upstream = common::start_upstream().await;
    let (proxy, shutdown) = common::start_proxy(config_for(upstream)).await;
    let dead = common::closed_addr().await;

    let target = format!("http://{}/anything", dead);
    let res = common::client()
        .get(format!("http://{}/?type=token&url={}", proxy, encoded(&target)))
        .send()
        .await
        .unwrap();

    assert_eq!(res.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let body: Value = res.json().await.unwrap();
    assert!(!body["error"].as_str().unwrap().is_empty());

    shutdown.trigger();
}

#[tokio::test]
async fn test_token_forwarding_passes_token_only_when_present() {
    let upstream = common::start_upstream().await;
    let (proxy, shutdown) = common::start_proxy(config_for(upstream)).await;
    let client = common::client();
    let target = encoded(&format!("http://{}/echo/profile", upstream));

    let res = client
        .get(format!("http://{}/?type=token&url={}", proxy, target))
        .header("X-Auth-Token", "abc.def.ghi")
        .send()
        .await
        .unwrap();
    let echo: Value = res.json().await.unwrap();
    assert_eq!(echo["headers"]["x-auth-token"], "abc.def.ghi");
    assert_eq!(echo["headers"]["content-type"], "application/json");

    let res = client
        .get(format!("http://{}/?type=token&url={}", proxy, target))
        .send()
        .await
        .unwrap();
    let echo: Value = res.json().await.unwrap();
    assert!(echo["headers"].get("x-auth-token").is_none());

    shutdown.trigger();
}

#[tokio::test]
async fn test_browser_profile_headers() {
    let upstream = common::start_upstream().await;
    let (proxy, shutdown) = common::start_proxy(config_for(upstream)).await;
    let target = encoded(&format!("http://{}/echo/page", upstream));

    // No `type`: the default profile (browser) applies.
    let res = common::client()
        .get(format!("http://{}/?url={}", proxy, target))
        .header("x-auth-token", "should-not-leak")
        .send()
        .await
        .unwrap();
    let echo: Value = res.json().await.unwrap();

    assert_eq!(echo["path"], "/echo/page");
    assert_eq!(echo["headers"]["user-agent"], BROWSER_USER_AGENT);
    assert_eq!(echo["headers"]["cache-control"], "no-cache");
    assert!(echo["headers"]["accept-language"].is_string());
    assert!(echo["headers"].get("x-auth-token").is_none());

    shutdown.trigger();
}

#[tokio::test]
async fn test_unknown_type_falls_back_to_default_profile() {
    let upstream = common::start_upstream().await;
    let mut config = config_for(upstream);
    config.forwarder.default_profile = scout_proxy::profile::ProfileKind::TokenForwarding;
    let (proxy, shutdown) = common::start_proxy(config).await;
    let target = encoded(&format!("http://{}/echo", upstream));

    let res = common::client()
        .get(format!("http://{}/?type=graphql&url={}", proxy, target))
        .header("x-auth-token", "t0k3n")
        .send()
        .await
        .unwrap();

    assert_eq!(res.status(), StatusCode::OK);
    let echo: Value = res.json().await.unwrap();
    assert_eq!(echo["headers"]["x-auth-token"], "t0k3n");

    shutdown.trigger();
}

#[tokio::test]
async fn test_request_id_is_echoed() {
    let upstream = common::start_upstream().await;
    let (proxy, shutdown) = common::start_proxy(config_for(upstream)).await;
    let client = common::client();

    let res = client
        .get(format!("http://{}/health", proxy))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let generated = res.headers()["x-request-id"].to_str().unwrap().to_string();
    assert!(uuid::Uuid::parse_str(&generated).is_ok());
    let status: Value = res.json().await.unwrap();
    assert_eq!(status["status"], "ok");

    let res = client
        .get(format!("http://{}/health", proxy))
        .header("x-request-id", "caller-chosen")
        .send()
        .await
        .unwrap();
    assert_eq!(res.headers()["x-request-id"], "caller-chosen");

    shutdown.trigger();
}

#[tokio::test]
async fn test_oversized_body_is_json_400() {
    let upstream = common::start_upstream().await;
    let mut config = config_for(upstream);
    config.listener.max_body_size = 64;
    let (proxy, shutdown) = common::start_proxy(config).await;

    let payload = format!(r#"{{"query":"{}"}}"#, "x".repeat(200));
    let res = common::client()
        .post(format!("http://{}/proxy/echo/search", proxy))
        .header("content-type", "application/json")
        .body(payload)
        .send()
        .await
        .unwrap();

    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    assert_eq!(res.headers()["content-type"], "application/json");
    assert_cors(&res);
    let body: Value = res.json().await.unwrap();
    assert!(body["error"].as_str().unwrap().starts_with("Failed to read request body"));

    shutdown.trigger();
}

#[tokio::test]
async fn test_type_param_is_not_forwarded_on_fixed_profile() {
    let upstream = common::start_upstream().await;
    let mut config = config_for(upstream);
    config.forwarder.base_url = format!("http://{}/echo", upstream);
    let (proxy, shutdown) = common::start_proxy(config).await;

    let res = common::client()
        .get(format!("http://{}/fetch?type=fixed&name=m%C3%BCller&page=2", proxy))
        .send()
        .await
        .unwrap();

    assert_eq!(res.status(), StatusCode::OK);
    let echo: Value = res.json().await.unwrap();
    assert_eq!(echo["path"], "/echo/fetch");
    assert_eq!(echo["query"], "name=m%C3%BCller&page=2");

    shutdown.trigger();
}
