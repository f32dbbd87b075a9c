//! # CORS Filter Library
//!
//! This crate provides Cross-Origin Resource Sharing enforcement for axum
//! services:
//! - A tower layer that decides, per request, whether the `Origin` is
//!   allowed, answers allowed preflights itself and annotates allowed
//!   actual requests with the credential headers
//! - A preflight-safe authentication challenge so `OPTIONS` requests never
//!   receive a `401`
//!
//! ## Module Structure
//!
//! ```text
//! cors_filter/
//! +-- config/        Configuration management
//! +-- domain/        Origin evaluation and preflight headers
//! +-- presentation/  HTTP routes and middleware
//! +-- shared/        Common utilities (errors)
//! ```

// Configuration module
pub mod config;

// Domain layer - CORS decision logic
pub mod domain;

// Presentation layer - HTTP routes and middleware
pub mod presentation;

// Shared utilities
pub mod shared;

// Application startup and state management
pub mod startup;

// Telemetry and observability
pub mod telemetry;
