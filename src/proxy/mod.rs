//! Request forwarding subsystem.
//!
//! # Data Flow
//! ```text
//! Request<Body> + Profile
//!     → forwarder.rs (buffer body, build headers)
//!     → target.rs (fixed base + rewritten path, or explicit `url`)
//!     → bounded outbound call (resilience::Deadline)
//!     → relay status, content type and body, or error.rs JSON
//! ```

pub mod error;
pub mod forwarder;
pub mod target;

pub use error::ProxyError;
pub use forwarder::{Forwarder, InboundRequest, OutboundResponse};
pub use target::ForwardTarget;
