//! Timeout enforcement.
//!
//! # Responsibilities
//! - Wrap outbound calls with a deadline
//! - Cancel operations cleanly on timeout
//!
//! # Design Decisions
//! - Uses Tokio's timeout facilities
//! - Timeout errors are distinct from other errors
//! - The wrapped future is dropped on expiry, which aborts the call and
//!   releases its connection

use std::future::Future;
use std::time::Duration;

/// Outcome of a bounded operation that did not succeed.
#[derive(Debug)]
pub enum Bounded<E> {
    /// The deadline passed before the operation finished.
    Elapsed(Duration),
    /// The operation finished with its own error.
    Failed(E),
}

/// A fixed ceiling applied to one outbound exchange.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Deadline(Duration);

impl Deadline {
    pub fn new(limit: Duration) -> Self {
        Self(limit)
    }

    pub fn from_secs(secs: u64) -> Self {
        Self(Duration::from_secs(secs))
    }

    pub fn limit(&self) -> Duration {
        self.0
    }

    /// Run `operation`, giving up once the deadline passes.
    ///
    /// May suspend until the operation completes or the deadline expires.
    pub async fn run<F, T, E>(&self, operation: F) -> Result<T, Bounded<E>>
    where
        F: Future<Output = Result<T, E>>,
    {
        match tokio::time::timeout(self.0, operation).await {
            Ok(Ok(value)) => Ok(value),
            Ok(Err(e)) => Err(Bounded::Failed(e)),
            Err(_) => Err(Bounded::Elapsed(self.0)),
        }
    }
}

impl Default for Deadline {
    fn default() -> Self {
        Self::from_secs(10)
    }
}
