//! HTTP server setup and configuration.
//!
//! # Responsibilities
//! - Create Axum Router with all handlers
//! - Wire up middleware (tracing, request ID, body limit, CORS, preflight)
//! - Bind server to listener
//! - Dispatch requests to the forwarder with the selected profile
//! - Serve the description generator
//!
//! # Design Decisions
//! - The body limit is `DefaultBodyLimit`, read by the handlers themselves, so
//!   an oversized body becomes the handler's own JSON error, never a bare 413

use std::sync::Arc;

use axum::{
    body::Body,
    extract::{DefaultBodyLimit, State},
    http::{header::HeaderName, Request, Uri},
    middleware,
    response::Response,
    routing::{any, get, post},
    Router,
};
use tokio::net::TcpListener;
use tokio::sync::broadcast;
use tower::ServiceBuilder;
use tower_http::{
    request_id::{PropagateRequestIdLayer, SetRequestIdLayer},
    set_header::SetResponseHeaderLayer,
    trace::TraceLayer,
};

use crate::config::ProxyConfig;
use crate::generation::TextGenerator;
use crate::http::cors::{self, cors_headers};
use crate::http::generate::generate_description;
use crate::http::request::{MakeRequestUuidV4, X_REQUEST_ID};
use crate::http::response::{health, not_found};
use crate::profile::ProfileSet;
use crate::proxy::forwarder::Forwarder;
use crate::proxy::target::{query_param, strip_query_param};

/// Discriminator parameter on the explicit-target routes.
pub const TYPE_PARAM: &str = "type";

/// Application state injected into handlers.
#[derive(Clone)]
pub struct AppState {
    pub forwarder: Arc<Forwarder>,
    pub profiles: Arc<ProfileSet>,
    pub generator: Arc<TextGenerator>,
}

impl AppState {
    pub fn from_config(config: &ProxyConfig) -> Result<Self, reqwest::Error> {
        Ok(Self {
            forwarder: Arc::new(Forwarder::new(&config.forwarder, config.listener.max_body_size)?),
            profiles: Arc::new(ProfileSet::from_config(&config.forwarder)),
            generator: Arc::new(TextGenerator::new(&config.generation)?),
        })
    }
}

/// HTTP server for the forwarding service.
pub struct HttpServer {
    router: Router,
    config: ProxyConfig,
}

impl HttpServer {
    /// Create a new HTTP server with the given configuration.
    pub fn new(config: ProxyConfig) -> Result<Self, reqwest::Error> {
        let state = AppState::from_config(&config)?;

        if !state.generator.has_credential() {
            tracing::warn!(
                env = %config.generation.api_key_env,
                "No generation API key found; /generate-description will report errors"
            );
        }

        let router = Self::build_router(&config, state);
        Ok(Self { router, config })
    }

    /// Build the Axum router with all middleware layers.
    pub fn build_router(config: &ProxyConfig, state: AppState) -> Router {
        let x_request_id = HeaderName::from_static(X_REQUEST_ID);
        let [origin, methods, allowed_headers] = cors_headers();

        Router::new()
            .route("/health", get(health))
            .route("/generate-description", post(generate_description))
            .route("/proxy", any(fixed_route_handler))
            .route("/proxy/{*rest}", any(fixed_route_handler))
            .route("/", any(explicit_target_handler))
            .route("/fetch", any(explicit_target_handler))
            .fallback(not_found)
            .with_state(state)
            .layer(
                ServiceBuilder::new()
                    .layer(SetRequestIdLayer::new(x_request_id.clone(), MakeRequestUuidV4))
                    .layer(TraceLayer::new_for_http())
                    .layer(PropagateRequestIdLayer::new(x_request_id))
                    .layer(SetResponseHeaderLayer::overriding(origin.0, origin.1))
                    .layer(SetResponseHeaderLayer::overriding(methods.0, methods.1))
                    .layer(SetResponseHeaderLayer::overriding(
                        allowed_headers.0,
                        allowed_headers.1,
                    ))
                    .layer(middleware::from_fn(cors::preflight))
                    .layer(DefaultBodyLimit::max(config.listener.max_body_size)),
            )
    }

    /// Run the server until `shutdown` fires.
    pub async fn run(
        self,
        listener: TcpListener,
        mut shutdown: broadcast::Receiver<()>,
    ) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(
            address = %addr,
            upstream = %self.config.forwarder.base_url,
            timeout_secs = self.config.forwarder.timeout_secs,
            "HTTP server starting"
        );

        axum::serve(listener, self.router)
            .with_graceful_shutdown(async move {
                let _ = shutdown.recv().await;
                tracing::info!("Shutdown signal received");
            })
            .await?;

        tracing::info!("HTTP server stopped");
        Ok(())
    }

}

/// `/proxy/*`: the profile is implied by the route.
async fn fixed_route_handler(State(state): State<AppState>, request: Request<Body>) -> Response {
    let profile = state.profiles.fixed_route();
    state.forwarder.forward(request, profile).await
}

/// `/` and `/fetch`: the profile comes from the `type` parameter.
///
/// `type` is consumed here and never reaches the upstream. With `type=fixed`
/// the inbound path (`/` or `/fetch`) is appended to the fixed base, so
/// deeper fixed-base paths are only reachable through `/proxy/*`.
async fn explicit_target_handler(
    State(state): State<AppState>,
    mut request: Request<Body>,
) -> Response {
    let discriminator = query_param(request.uri().query(), TYPE_PARAM);
    let profile = state.profiles.select(discriminator.as_deref());
    if discriminator.is_some() {
        if let Some(uri) = without_type_param(request.uri()) {
            *request.uri_mut() = uri;
        }
    }
    state.forwarder.forward(request, profile).await
}

fn without_type_param(uri: &Uri) -> Option<Uri> {
    let rest = strip_query_param(uri.query()?, TYPE_PARAM);
    let path_and_query = match rest {
        Some(query) => format!("{}?{}", uri.path(), query),
        None => uri.path().to_string(),
    };
    path_and_query.parse().ok()
}
