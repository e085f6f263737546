//! Scout Proxy Library
//!
//! A single-route HTTP forwarder with upstream profiles, plus a scouting
//! description generator backed by an external text-generation API.

pub mod config;
pub mod generation;
pub mod http;
pub mod lifecycle;
pub mod observability;
pub mod profile;
pub mod proxy;
pub mod resilience;

pub use config::schema::ProxyConfig;
pub use http::HttpServer;
pub use lifecycle::Shutdown;
