//! Presentation Layer
//!
//! HTTP routes and the middleware that guards them.

pub mod http;
pub mod middleware;
