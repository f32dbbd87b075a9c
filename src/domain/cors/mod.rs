//! CORS Decision Core
//!
//! Pure origin evaluation and preflight header composition, independent of
//! any HTTP server. The tower glue lives in
//! [`presentation::middleware::cors`](crate::presentation::middleware::cors).

mod header_set;
mod options;
mod policy;

pub use header_set::{
    StaticHeaderSet, DEFAULT_ALLOW_HEADERS, DEFAULT_ALLOW_METHODS, DEFAULT_MAX_AGE_SECS,
};
pub use options::{
    CorsOptions, PARAM_ALLOW_ORIGIN_REGEX, PARAM_ENABLE_LOGGING, PARAM_EXPOSE_HEADERS,
    PARAM_HEADER_PREFIX,
};
pub use policy::{AllowPolicy, CorsPolicy, Decision, DenyReason};
