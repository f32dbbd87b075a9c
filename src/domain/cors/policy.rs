//! Origin evaluation.
//!
//! A [`CorsPolicy`] is compiled once from [`CorsOptions`](super::CorsOptions)
//! and never mutated afterwards, so it can be shared behind an `Arc` by every
//! request without locking.

use std::fmt;

use axum::http::HeaderValue;
use regex::Regex;

use super::header_set::StaticHeaderSet;

/// Which request origins are accepted.
#[derive(Clone)]
pub enum AllowPolicy {
    /// Any origin is accepted
    Wildcard,
    /// Only an origin equal to this value is accepted
    Exact(String),
    /// Origins fully matching this pattern are accepted
    Regex(Regex),
}

impl AllowPolicy {
    /// Exact-origin policy; `"*"` collapses to [`AllowPolicy::Wildcard`].
    pub fn exact(origin: impl Into<String>) -> Self {
        let origin = origin.into();
        if origin == "*" {
            AllowPolicy::Wildcard
        } else {
            AllowPolicy::Exact(origin)
        }
    }

    /// Whether the origin is accepted by this policy.
    pub fn permits(&self, origin: &HeaderValue) -> bool {
        match self {
            AllowPolicy::Wildcard => true,
            AllowPolicy::Exact(allowed) => origin.as_bytes() == allowed.as_bytes(),
            AllowPolicy::Regex(pattern) => origin
                .to_str()
                .map(|origin| pattern.is_match(origin))
                .unwrap_or(false),
        }
    }
}

impl fmt::Debug for AllowPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AllowPolicy::Wildcard => f.write_str("Wildcard"),
            AllowPolicy::Exact(origin) => f.debug_tuple("Exact").field(origin).finish(),
            AllowPolicy::Regex(pattern) => f.debug_tuple("Regex").field(&pattern.as_str()).finish(),
        }
    }
}

impl fmt::Display for AllowPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AllowPolicy::Wildcard => f.write_str("*"),
            AllowPolicy::Exact(origin) => f.write_str(origin),
            AllowPolicy::Regex(pattern) => write!(f, "/{}/i", pattern.as_str()),
        }
    }
}

/// Why a request was not granted CORS headers
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DenyReason {
    /// The request carries no `Origin` header
    MissingOrigin,
    /// The `Origin` header is present but not accepted by the policy
    OriginMismatch,
}

impl fmt::Display for DenyReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DenyReason::MissingOrigin => f.write_str("no origin header for request"),
            DenyReason::OriginMismatch => {
                f.write_str("origin header is present but does not match the allowed origin")
            }
        }
    }
}

/// Outcome of evaluating one request
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Decision {
    /// Cross-origin access is granted; carries the request origin to echo back
    Allowed(HeaderValue),
    /// No CORS headers may be emitted
    Denied(DenyReason),
}

impl Decision {
    pub fn is_allowed(&self) -> bool {
        matches!(self, Decision::Allowed(_))
    }
}

/// Immutable, compiled CORS configuration.
#[derive(Debug, Clone)]
pub struct CorsPolicy {
    allow: AllowPolicy,
    preflight_headers: StaticHeaderSet,
    expose_headers: Option<HeaderValue>,
    log_rejections: bool,
}

impl CorsPolicy {
    pub fn new(
        allow: AllowPolicy,
        preflight_headers: StaticHeaderSet,
        expose_headers: Option<HeaderValue>,
        log_rejections: bool,
    ) -> Self {
        Self {
            allow,
            preflight_headers,
            expose_headers,
            log_rejections,
        }
    }

    /// Accept every origin with the default preflight headers.
    pub fn permissive() -> Self {
        Self::new(AllowPolicy::Wildcard, StaticHeaderSet::default(), None, false)
    }

    /// Decide whether the request origin is granted cross-origin access.
    ///
    /// The granted value is always the literal request origin, never `*`,
    /// because the response also carries `Access-Control-Allow-Credentials`.
    pub fn evaluate(&self, origin: Option<&HeaderValue>) -> Decision {
        match origin {
            None => Decision::Denied(DenyReason::MissingOrigin),
            Some(origin) if self.allow.permits(origin) => Decision::Allowed(origin.clone()),
            Some(_) => Decision::Denied(DenyReason::OriginMismatch),
        }
    }

    pub fn allow(&self) -> &AllowPolicy {
        &self.allow
    }

    pub fn preflight_headers(&self) -> &StaticHeaderSet {
        &self.preflight_headers
    }

    pub fn expose_headers(&self) -> Option<&HeaderValue> {
        self.expose_headers.as_ref()
    }

    pub fn log_rejections(&self) -> bool {
        self.log_rejections
    }
}
