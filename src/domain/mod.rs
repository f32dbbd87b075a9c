//! Domain Layer
//!
//! Request-independent decision logic with no HTTP server dependencies.

pub mod cors;
