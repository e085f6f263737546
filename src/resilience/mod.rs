//! Resilience subsystem.
//!
//! # Data Flow
//! ```text
//! Request to upstream:
//!     → timeouts.rs (enforce the per-exchange ceiling)
//!     → On expiry: caller maps Bounded::Elapsed to its timeout error
//! ```
//!
//! # Design Decisions
//! - Timeouts are non-negotiable; every external call has a deadline
//! - No retries: each inbound request yields exactly one outbound attempt

pub mod timeouts;

pub use timeouts::{Bounded, Deadline};
