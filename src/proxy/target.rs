//! Forward target resolution.
//!
//! # Responsibilities
//! - Rewrite the inbound path onto the fixed upstream base
//! - Read an explicit target from the `url` query parameter
//! - Reject missing or malformed targets as client errors
//!
//! # Design Decisions
//! - The original query string is preserved byte-for-byte on the fixed route
//! - Only absolute http/https URLs are accepted

use std::fmt;

use axum::http::Uri;
use url::Url;

use crate::profile::TargetRule;
use crate::proxy::error::ProxyError;

/// Query parameter carrying the explicit target.
pub const URL_PARAM: &str = "url";

/// A resolved absolute upstream URL.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ForwardTarget(Url);

impl ForwardTarget {
    /// Resolve the target for `uri` according to `rule`.
    pub fn resolve(rule: &TargetRule, uri: &Uri) -> Result<Self, ProxyError> {
        match rule {
            TargetRule::FixedBase { base, strip_prefix } => {
                let path = uri.path();
                let rest = path.strip_prefix(strip_prefix.as_str()).unwrap_or(path);
                let mut raw = String::with_capacity(base.len() + rest.len() + 1);
                raw.push_str(base);
                if !rest.is_empty() && !rest.starts_with('/') {
                    raw.push('/');
                }
                raw.push_str(rest);
                if let Some(query) = uri.query() {
                    raw.push('?');
                    raw.push_str(query);
                }
                Self::parse(&raw)
                    .map_err(|reason| ProxyError::InvalidInput(format!("Invalid forward target: {}", reason)))
            }
            TargetRule::QueryParam => {
                let raw = query_param(uri.query(), URL_PARAM)
                    .filter(|value| !value.trim().is_empty())
                    .ok_or_else(|| ProxyError::missing_param(URL_PARAM))?;
                Self::parse(raw.trim())
                    .map_err(|reason| ProxyError::InvalidInput(format!("Invalid url parameter: {}", reason)))
            }
        }
    }

    fn parse(raw: &str) -> Result<Self, String> {
        let url = Url::parse(raw).map_err(|e| e.to_string())?;
        match url.scheme() {
            "http" | "https" => Ok(Self(url)),
            other => Err(format!("unsupported scheme '{}'", other)),
        }
    }

    pub fn into_url(self) -> Url {
        self.0
    }
}

impl fmt::Display for ForwardTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.0.as_str())
    }
}

/// First value of `name` in a raw query string, percent-decoded.
pub fn query_param(query: Option<&str>, name: &str) -> Option<String> {
    url::form_urlencoded::parse(query?.as_bytes())
        .find(|(key, _)| key == name)
        .map(|(_, value)| value.into_owned())
}

/// `query` without any `name` pair; other pairs keep their raw bytes.
///
/// Returns `None` when nothing remains.
pub fn strip_query_param(query: &str, name: &str) -> Option<String> {
    let kept: Vec<&str> = query
        .split('&')
        .filter(|pair| !pair.is_empty())
        .filter(|pair| {
            let key = pair.split('=').next().unwrap_or_default();
            url::form_urlencoded::parse(key.as_bytes())
                .next()
                .map_or(true, |(decoded, _)| decoded != name)
        })
        .collect();

    (!kept.is_empty()).then(|| kept.join("&"))
}
