//! Upstream profile selection.
//!
//! # Data Flow
//! ```text
//! Inbound request
//!     → route decides the discriminator (implicit for /proxy/*, `type` otherwise)
//!     → ProfileKind::from_discriminator (closed mapping, never fails)
//!     → ProfileSet::get → Profile { header rule, target rule }
//!     → forwarder builds target + outbound headers
//! ```
//!
//! # Design Decisions
//! - Profiles are a closed enum; unknown names fall back to the configured default
//! - Profiles are built once from config and shared read-only

pub mod headers;

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::config::ForwarderConfig;

pub use headers::HeaderRule;

/// The known upstream profiles.
///
/// Config files and the `type` parameter accept the same names.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize, Serialize)]
#[serde(try_from = "String", into = "String")]
pub enum ProfileKind {
    /// Fixed base host, JSON content type, auth token passed through.
    FixedApi,
    /// Explicit `url` target fetched with desktop-browser headers.
    Browser,
    /// Explicit `url` target, JSON content type, auth token passed through.
    TokenForwarding,
}

impl ProfileKind {
    /// Every accepted spelling, case-insensitive.
    pub const NAMES: [(&'static str, ProfileKind); 10] = [
        ("fixed", ProfileKind::FixedApi),
        ("fixed-api", ProfileKind::FixedApi),
        ("api", ProfileKind::FixedApi),
        ("browser", ProfileKind::Browser),
        ("browser-like", ProfileKind::Browser),
        ("fetch", ProfileKind::Browser),
        ("scrape", ProfileKind::Browser),
        ("token", ProfileKind::TokenForwarding),
        ("token-forwarding", ProfileKind::TokenForwarding),
        ("auth", ProfileKind::TokenForwarding),
    ];

    pub fn parse(value: &str) -> Option<ProfileKind> {
        let value = value.trim();
        Self::NAMES
            .iter()
            .find(|(name, _)| name.eq_ignore_ascii_case(value))
            .map(|(_, kind)| *kind)
    }

    /// Map a `type` discriminator onto a profile.
    ///
    /// Absent, `default` or unrecognised values select `fallback`.
    pub fn from_discriminator(value: Option<&str>, fallback: ProfileKind) -> ProfileKind {
        value.and_then(Self::parse).unwrap_or(fallback)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ProfileKind::FixedApi => "fixed-api",
            ProfileKind::Browser => "browser",
            ProfileKind::TokenForwarding => "token-forwarding",
        }
    }
}

impl TryFrom<String> for ProfileKind {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value).ok_or_else(|| format!("unknown profile '{}'", value))
    }
}

impl From<ProfileKind> for String {
    fn from(kind: ProfileKind) -> Self {
        kind.as_str().to_string()
    }
}

impl fmt::Display for ProfileKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// How the forward target is derived for a profile.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TargetRule {
    /// `base` + inbound path without `strip_prefix` + original query.
    FixedBase { base: String, strip_prefix: String },
    /// The `url` query parameter, used verbatim.
    QueryParam,
}

/// Header construction and target resolution for one upstream flavour.
#[derive(Debug, Clone)]
pub struct Profile {
    pub kind: ProfileKind,
    pub headers: HeaderRule,
    pub target: TargetRule,
}

/// All profiles, built once from configuration.
#[derive(Debug, Clone)]
pub struct ProfileSet {
    fixed_api: Profile,
    browser: Profile,
    token_forwarding: Profile,
    default_kind: ProfileKind,
    fixed_route_kind: ProfileKind,
}

impl ProfileSet {
    pub fn from_config(config: &ForwarderConfig) -> Self {
        let fixed_api = Profile {
            kind: ProfileKind::FixedApi,
            headers: HeaderRule::json_with_token(&config.auth_header),
            target: TargetRule::FixedBase {
                base: config.base_url.trim_end_matches('/').to_string(),
                strip_prefix: config.strip_prefix.clone(),
            },
        };

        let browser = Profile {
            kind: ProfileKind::Browser,
            headers: HeaderRule::browser(config.user_agent.as_deref()),
            target: TargetRule::QueryParam,
        };

        let token_forwarding = Profile {
            kind: ProfileKind::TokenForwarding,
            headers: HeaderRule::json_with_token(&config.auth_header),
            target: TargetRule::QueryParam,
        };

        Self {
            fixed_api,
            browser,
            token_forwarding,
            default_kind: config.default_profile,
            fixed_route_kind: config.fixed_route_profile,
        }
    }

    pub fn get(&self, kind: ProfileKind) -> &Profile {
        match kind {
            ProfileKind::FixedApi => &self.fixed_api,
            ProfileKind::Browser => &self.browser,
            ProfileKind::TokenForwarding => &self.token_forwarding,
        }
    }

    /// Select by an explicit `type` discriminator.
    pub fn select(&self, discriminator: Option<&str>) -> &Profile {
        self.get(ProfileKind::from_discriminator(
            discriminator,
            self.default_kind,
        ))
    }

    /// Profile hard-wired to the fixed forwarding route.
    pub fn fixed_route(&self) -> &Profile {
        self.get(self.fixed_route_kind)
    }
}
