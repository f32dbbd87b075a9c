//! Application settings and configuration structures.

use std::collections::BTreeMap;

use config::{Config, ConfigBuilder, ConfigError, Environment, File};
use config::builder::DefaultState;
use serde::Deserialize;

use crate::domain::cors::CorsOptions;

/// Root configuration structure containing all application settings.
#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    /// Server configuration (host, port)
    pub server: ServerSettings,

    /// Basic authentication for protected routes
    pub auth: AuthSettings,

    /// CORS configuration
    pub cors: CorsSettings,

    /// Current environment (development, staging, production)
    pub environment: String,
}

/// Server binding configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct ServerSettings {
    /// Host address to bind to (e.g., "0.0.0.0")
    pub host: String,

    /// Port number to listen on
    pub port: u16,
}

/// Basic authentication configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct AuthSettings {
    /// Realm announced in `WWW-Authenticate`
    pub realm: String,

    pub username: String,

    pub password: String,
}

/// CORS configuration.
///
/// `allow_origin_regex` wins over `allow_origin`; with neither set every
/// origin is accepted.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct CorsSettings {
    /// Single allowed origin ("*" accepts any)
    pub allow_origin: Option<String>,

    /// Case-insensitive pattern the whole origin must match
    pub allow_origin_regex: Option<String>,

    /// Value of `Access-Control-Expose-Headers` on actual requests
    pub expose_headers: Option<String>,

    /// Log requests that are denied CORS headers
    pub enable_logging: bool,

    /// Extra preflight headers, overriding the built-in defaults
    pub headers: BTreeMap<String, String>,
}

/// Minimum required length for the basic auth password
pub const MIN_PASSWORD_LENGTH: usize = 8;

impl Settings {
    /// Load settings from environment variables and configuration files.
    ///
    /// The loading order is:
    /// 1. config/default.toml (base configuration)
    /// 2. config/{RUN_ENV}.toml (environment-specific overrides)
    /// 3. Environment variables (highest priority)
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if configuration cannot be loaded or parsed,
    /// or if the auth password is too short.
    pub fn load() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        // Determine the running environment
        let environment = std::env::var("RUN_ENV").unwrap_or_else(|_| "development".into());

        Self::defaults(&environment)?
            // Load from config files
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name(&format!("config/{}", environment)).required(false))
            // Load from environment variables
            // APP__CORS__ALLOW_ORIGIN_REGEX=... -> cors.allow_origin_regex
            .add_source(
                Environment::default()
                    .prefix("APP")
                    .separator("__")
                    .try_parsing(true),
            )
            // Map simple environment variables
            .set_override_option("server.host", std::env::var("SERVER_HOST").ok())?
            .set_override_option("server.port", std::env::var("SERVER_PORT").ok())?
            .set_override_option("auth.password", std::env::var("AUTH_PASSWORD").ok())?
            .set_override_option(
                "cors.allow_origin_regex",
                std::env::var("CORS_ALLOW_ORIGIN_REGEX").ok(),
            )?
            .build()?
            .try_deserialize()
            .and_then(Self::validate)
    }

    /// Builder pre-populated with the built-in defaults.
    pub fn defaults(environment: &str) -> Result<ConfigBuilder<DefaultState>, ConfigError> {
        Config::builder()
            .set_default("environment", environment)?
            .set_default("server.host", "0.0.0.0")?
            .set_default("server.port", 3000)?
            .set_default("auth.realm", "cors-filter")?
            .set_default("auth.username", "admin")?
            .set_default("cors.enable_logging", false)
    }

    fn validate(self) -> Result<Self, ConfigError> {
        if self.auth.password.len() < MIN_PASSWORD_LENGTH {
            return Err(ConfigError::Message(format!(
                "Auth password must be at least {} characters. Current length: {}",
                MIN_PASSWORD_LENGTH,
                self.auth.password.len()
            )));
        }
        Ok(self)
    }

    /// Get the full server address as a string.
    pub fn server_addr(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }
}

impl CorsSettings {
    /// Convert into the raw option set consumed by the CORS policy.
    pub fn to_options(&self) -> CorsOptions {
        let mut options = self
            .headers
            .iter()
            .fold(CorsOptions::new(), |options, (name, value)| {
                options.header(name, value.clone())
            });
        // An explicit `allow_origin` wins over one given as a header entry
        if let Some(origin) = &self.allow_origin {
            options = options.allow_origin(origin.clone());
        }
        if let Some(pattern) = &self.allow_origin_regex {
            options = options.allow_origin_regex(pattern.clone());
        }
        if let Some(expose) = &self.expose_headers {
            options = options.expose_headers(expose.clone());
        }
        options.enable_logging(self.enable_logging)
    }
}
