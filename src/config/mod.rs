//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! config file (TOML), or built-in defaults
//!     → loader.rs (parse & deserialize)
//!     → validation.rs (semantic checks)
//!     → secrets resolved from the environment
//!     → ProxyConfig (validated, immutable)
//!     → handed to the forwarder and generator at construction
//! ```
//!
//! # Design Decisions
//! - Config is immutable once loaded; changes require a restart
//! - All fields have defaults to allow minimal configs
//! - Validation separates syntactic (serde) from semantic checks

pub mod loader;
pub mod schema;
pub mod validation;

pub use loader::{default_config, load_config, ConfigError};
pub use schema::{
    ForwarderConfig, GenerationConfig, ListenerConfig, LogFormat, ObservabilityConfig,
    ProxyConfig,
};
