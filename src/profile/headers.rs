//! Outbound header construction.
//!
//! # Responsibilities
//! - Set the profile's fixed headers unconditionally
//! - Copy named inbound headers only when present
//! - Drop every other inbound header
//!
//! # Design Decisions
//! - Outbound headers are built from scratch, never copied wholesale
//! - Pass-through names are matched case-insensitively (HeaderName is lowercase)
//! - Absent pass-through headers are omitted, never sent empty

use axum::http::header::{
    HeaderMap, HeaderName, HeaderValue, ACCEPT, ACCEPT_LANGUAGE, CACHE_CONTROL, CONTENT_TYPE,
    USER_AGENT,
};

pub const DEFAULT_CONTENT_TYPE: &str = "application/json";

pub const BROWSER_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) \
    AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36";
pub const BROWSER_ACCEPT: &str =
    "text/html,application/xhtml+xml,application/xml;q=0.9,application/json;q=0.8,*/*;q=0.7";
pub const BROWSER_ACCEPT_LANGUAGE: &str = "en-US,en;q=0.9,de;q=0.8";

/// Which headers a profile sends upstream.
#[derive(Debug, Clone, Default)]
pub struct HeaderRule {
    fixed: Vec<(HeaderName, HeaderValue)>,
    pass_through: Vec<HeaderName>,
}

impl HeaderRule {
    /// JSON content type plus the auth token header when the caller sent one.
    pub fn json_with_token(auth_header: &str) -> Self {
        let mut rule = Self::default().with_fixed(
            CONTENT_TYPE,
            HeaderValue::from_static(DEFAULT_CONTENT_TYPE),
        );
        match HeaderName::from_bytes(auth_header.as_bytes()) {
            Ok(name) => rule.pass_through.push(name),
            Err(_) => tracing::warn!(header = %auth_header, "Ignoring invalid auth header name"),
        }
        rule
    }

    /// Desktop-browser emulation. No inbound header is passed through.
    pub fn browser(user_agent: Option<&str>) -> Self {
        let user_agent = match user_agent.map(HeaderValue::from_str) {
            Some(Ok(value)) => value,
            Some(Err(_)) => {
                tracing::warn!("Configured user agent is not a valid header value, using default");
                HeaderValue::from_static(BROWSER_USER_AGENT)
            }
            None => HeaderValue::from_static(BROWSER_USER_AGENT),
        };

        Self::default()
            .with_fixed(CONTENT_TYPE, HeaderValue::from_static(DEFAULT_CONTENT_TYPE))
            .with_fixed(USER_AGENT, user_agent)
            .with_fixed(ACCEPT, HeaderValue::from_static(BROWSER_ACCEPT))
            .with_fixed(ACCEPT_LANGUAGE, HeaderValue::from_static(BROWSER_ACCEPT_LANGUAGE))
            .with_fixed(CACHE_CONTROL, HeaderValue::from_static("no-cache"))
    }

    pub fn with_fixed(mut self, name: HeaderName, value: HeaderValue) -> Self {
        self.fixed.retain(|(existing, _)| *existing != name);
        self.fixed.push((name, value));
        self
    }

    pub fn pass_through(&self) -> &[HeaderName] {
        &self.pass_through
    }

    /// Build the outbound header map for one request.
    pub fn build(&self, inbound: &HeaderMap) -> HeaderMap {
        let mut outbound = HeaderMap::with_capacity(self.fixed.len() + self.pass_through.len());

        for (name, value) in &self.fixed {
            outbound.insert(name.clone(), value.clone());
        }

        for name in &self.pass_through {
            if let Some(value) = inbound.get(name) {
                outbound.insert(name.clone(), value.clone());
            }
        }

        if !outbound.contains_key(CONTENT_TYPE) {
            outbound.insert(CONTENT_TYPE, HeaderValue::from_static(DEFAULT_CONTENT_TYPE));
        }

        outbound
    }
}
