//! HTTP protocol handling subsystem.
//!
//! # Data Flow
//! ```text
//! TCP connection
//!     → server.rs (Axum setup, middleware stack)
//!     → request.rs (request ID)
//!     → cors.rs (OPTIONS answered here; CORS headers on every response)
//!     → profile selection → proxy::Forwarder
//!     → generate.rs for POST /generate-description
//!     → Send to client
//! ```

pub mod cors;
pub mod generate;
pub mod request;
pub mod response;
pub mod server;

pub use request::{MakeRequestUuidV4, X_REQUEST_ID};
pub use server::{AppState, HttpServer};
