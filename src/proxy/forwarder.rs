//! One request/response forwarding cycle.
//!
//! ```text
//! Received ─┬─ OPTIONS ──────────────────────────────▶ PreflightHandled
//!           └─ resolve target ─▶ Forwarding ─┬─ response ─▶ Relayed
//!                                            ├─ deadline ─▶ TimedOut (504)
//!                                            └─ error ────▶ Failed (500)
//! ```
//!
//! Exactly one outbound attempt is made per inbound request.

use std::time::{Duration, Instant};

use axum::{
    body::{Body, Bytes},
    http::{
        header::{HeaderValue, CONTENT_TYPE},
        HeaderMap, Method, Request, StatusCode, Uri,
    },
    response::{IntoResponse, Response},
};

use crate::config::ForwarderConfig;
use crate::http::cors::preflight_response;
use crate::http::request::request_id;
use crate::observability::metrics;
use crate::profile::headers::DEFAULT_CONTENT_TYPE;
use crate::profile::Profile;
use crate::proxy::error::ProxyError;
use crate::proxy::target::ForwardTarget;
use crate::resilience::{Bounded, Deadline};

/// A fully buffered inbound request.
#[derive(Debug, Clone)]
pub struct InboundRequest {
    pub method: Method,
    pub uri: Uri,
    pub headers: HeaderMap,
    pub body: Bytes,
}

impl InboundRequest {
    /// Read the request, buffering up to `limit` body bytes for methods that
    /// carry one.
    ///
    /// May suspend while the body is received.
    pub async fn read(request: Request<Body>, limit: usize) -> Result<Self, ProxyError> {
        let (parts, body) = request.into_parts();
        let body = if carries_body(&parts.method) {
            axum::body::to_bytes(body, limit)
                .await
                .map_err(|e| ProxyError::InvalidInput(format!("Failed to read request body: {}", e)))?
        } else {
            Bytes::new()
        };

        Ok(Self {
            method: parts.method,
            uri: parts.uri,
            headers: parts.headers,
            body,
        })
    }
}

fn carries_body(method: &Method) -> bool {
    matches!(*method, Method::POST | Method::PUT | Method::PATCH)
}

/// What came back from upstream, relayed as-is.
#[derive(Debug, Clone)]
pub struct OutboundResponse {
    pub status: StatusCode,
    pub content_type: Option<HeaderValue>,
    pub body: Bytes,
}

impl IntoResponse for OutboundResponse {
    fn into_response(self) -> Response {
        let content_type = self
            .content_type
            .unwrap_or_else(|| HeaderValue::from_static(DEFAULT_CONTENT_TYPE));
        (self.status, [(CONTENT_TYPE, content_type)], self.body).into_response()
    }
}

/// Relays requests to upstream hosts according to a profile.
#[derive(Debug, Clone)]
pub struct Forwarder {
    client: reqwest::Client,
    deadline: Deadline,
    connect_timeout: Duration,
    body_limit: usize,
}

impl Forwarder {
    /// Build a forwarder with its own connection pool.
    ///
    /// `body_limit` caps how much of an inbound body is buffered.
    pub fn new(config: &ForwarderConfig, body_limit: usize) -> Result<Self, reqwest::Error> {
        let connect_timeout = Duration::from_secs(config.connect_timeout_secs);
        let client = reqwest::Client::builder()
            .connect_timeout(connect_timeout)
            .build()?;
        Ok(Self {
            client,
            deadline: Deadline::from_secs(config.timeout_secs),
            connect_timeout,
            body_limit,
        })
    }

    /// Run one forwarding cycle. Never fails: errors become JSON responses.
    pub async fn forward(&self, request: Request<Body>, profile: &Profile) -> Response {
        if request.method() == Method::OPTIONS {
            return preflight_response();
        }

        let start = Instant::now();
        let method = request.method().to_string();
        let request_id = request_id(request.headers()).to_string();

        let result = match InboundRequest::read(request, self.body_limit).await {
            Ok(inbound) => self.relay(inbound, profile, &request_id).await,
            Err(e) => Err(e),
        };

        let response = match result {
            Ok(outbound) => outbound.into_response(),
            Err(e) => {
                match &e {
                    ProxyError::Timeout(limit) | ProxyError::ConnectTimeout(limit) => {
                        tracing::warn!(request_id = %request_id, limit = ?limit, error = %e, "Upstream timed out")
                    }
                    ProxyError::NetworkFailure(message) => {
                        tracing::error!(request_id = %request_id, error = %message, "Upstream error")
                    }
                    ProxyError::InvalidInput(message) => {
                        tracing::debug!(request_id = %request_id, error = %message, "Rejected request")
                    }
                }
                e.into_response()
            }
        };

        metrics::record_request(&method, response.status().as_u16(), profile.kind.as_str(), start);
        response
    }

    /// Resolve, send and buffer the upstream reply under the deadline.
    pub async fn relay(
        &self,
        inbound: InboundRequest,
        profile: &Profile,
        request_id: &str,
    ) -> Result<OutboundResponse, ProxyError> {
        let target = ForwardTarget::resolve(&profile.target, &inbound.uri)?;
        let headers = profile.headers.build(&inbound.headers);

        tracing::info!(
            request_id = %request_id,
            method = %inbound.method,
            profile = %profile.kind,
            target = %target,
            "Forwarding request"
        );

        let start = Instant::now();
        let mut builder = self
            .client
            .request(inbound.method.clone(), target.into_url())
            .headers(headers);
        if carries_body(&inbound.method) {
            builder = builder.body(inbound.body);
        }

        let exchange = async {
            let response = builder.send().await?;
            let status = response.status();
            let content_type = response.headers().get(CONTENT_TYPE).cloned();
            let body = response.bytes().await?;
            Ok::<_, reqwest::Error>(OutboundResponse {
                status,
                content_type,
                body,
            })
        };

        match self.deadline.run(exchange).await {
            Ok(outbound) => {
                tracing::info!(
                    request_id = %request_id,
                    status = outbound.status.as_u16(),
                    elapsed_ms = start.elapsed().as_millis() as u64,
                    "Upstream responded"
                );
                Ok(outbound)
            }
            Err(Bounded::Elapsed(limit)) => Err(ProxyError::Timeout(limit)),
            // The client only sets a connect timeout; the deadline covers the rest.
            Err(Bounded::Failed(e)) if e.is_timeout() => Err(ProxyError::ConnectTimeout(self.connect_timeout)),
            Err(Bounded::Failed(e)) => Err(ProxyError::network(&e)),
        }
    }
}
