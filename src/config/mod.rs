//! # Configuration Module
//!
//! This module handles application configuration loading and management.
//! Configuration can be loaded from:
//! - Environment variables (prefixed with APP__)
//! - Configuration files (config/default.toml, config/{environment}.toml)
//! - .env files (via dotenvy)
//!
//! ## Usage
//!
//! ```rust,ignore
//! use cors_filter::config::Settings;
//!
//! let settings = Settings::load()?;
//! let policy = settings.cors.to_options().build()?;
//! ```

mod settings;

pub use settings::*;
