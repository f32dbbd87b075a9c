//! Middleware
//!
//! Tower middleware for request processing.

pub mod auth;
pub mod cors;
pub mod logging;

pub use auth::{
    authenticate, basic_auth_middleware, AuthChallenge, AuthFailure, AuthUser,
    BasicAuthChallenge, PreflightSafeChallenge,
};
pub use cors::{create_cors_layer, CorsLayer, CorsMiddleware};
pub use logging::create_trace_layer;
