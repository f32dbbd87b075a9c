//! CORS option set and its compilation into a [`CorsPolicy`].

use axum::http::{header, HeaderName, HeaderValue};
use regex::RegexBuilder;

use super::header_set::StaticHeaderSet;
use super::policy::{AllowPolicy, CorsPolicy};
use crate::shared::error::CorsConfigError;

/// Init parameter holding the origin pattern
pub const PARAM_ALLOW_ORIGIN_REGEX: &str = "allow.origin.regex";

/// Init parameter holding the `Access-Control-Expose-Headers` value
pub const PARAM_EXPOSE_HEADERS: &str = "expose.headers";

/// Init parameter enabling rejection logging
pub const PARAM_ENABLE_LOGGING: &str = "enable.logging";

/// Prefix of init parameters naming a static preflight header
pub const PARAM_HEADER_PREFIX: &str = "header:";

/// Raw, unvalidated CORS options.
///
/// Precedence when building: `allow_origin_regex`, then `allow_origin`,
/// then wildcard.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CorsOptions {
    pub allow_origin: Option<String>,
    pub allow_origin_regex: Option<String>,
    pub extra_headers: Vec<(String, String)>,
    pub expose_headers: Option<String>,
    pub enable_logging: bool,
}

impl CorsOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse flat init parameters (`allow.origin.regex`, `header:<Name>`,
    /// `expose.headers`, `enable.logging`). Unknown names are ignored.
    pub fn from_init_params<I, K, V>(params: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: Into<String>,
    {
        let mut options = Self::default();
        for (name, value) in params {
            let name = name.as_ref();
            let value: String = value.into();
            if let Some(header_name) = name.strip_prefix(PARAM_HEADER_PREFIX) {
                options = options.header(header_name, value);
                continue;
            }
            match name {
                PARAM_ALLOW_ORIGIN_REGEX => options.allow_origin_regex = Some(value),
                PARAM_EXPOSE_HEADERS => options.expose_headers = Some(value),
                PARAM_ENABLE_LOGGING => options.enable_logging = value.eq_ignore_ascii_case("true"),
                _ => {}
            }
        }
        options
    }

    /// Accept only this origin (`"*"` accepts any).
    pub fn allow_origin(mut self, origin: impl Into<String>) -> Self {
        self.allow_origin = Some(origin.into());
        self
    }

    /// Accept origins matching this pattern, case-insensitively.
    pub fn allow_origin_regex(mut self, pattern: impl Into<String>) -> Self {
        self.allow_origin_regex = Some(pattern.into());
        self
    }

    /// Add or override a static preflight header.
    ///
    /// `Access-Control-Allow-Origin` is not a preflight header: it sets the
    /// exact allowed origin instead.
    pub fn header(mut self, name: impl AsRef<str>, value: impl Into<String>) -> Self {
        let name = name.as_ref().trim();
        if name.eq_ignore_ascii_case(header::ACCESS_CONTROL_ALLOW_ORIGIN.as_str()) {
            self.allow_origin = Some(value.into());
        } else {
            self.extra_headers.push((name.to_string(), value.into()));
        }
        self
    }

    pub fn expose_headers(mut self, value: impl Into<String>) -> Self {
        self.expose_headers = Some(value.into());
        self
    }

    pub fn enable_logging(mut self, enabled: bool) -> Self {
        self.enable_logging = enabled;
        self
    }

    /// Validate the options and compile them into an immutable policy.
    ///
    /// # Errors
    ///
    /// Returns [`CorsConfigError`] for an invalid pattern, header name or
    /// header value.
    pub fn build(&self) -> Result<CorsPolicy, CorsConfigError> {
        let allow = self.allow_policy()?;

        let mut preflight_headers = StaticHeaderSet::default();
        for (name, value) in &self.extra_headers {
            let header_name = HeaderName::from_bytes(name.trim().as_bytes()).map_err(|_| {
                CorsConfigError::InvalidHeaderName { name: name.clone() }
            })?;
            // Credential headers are computed per request, never configured
            if is_credential_header(&header_name) {
                tracing::warn!(header = %header_name, "Ignoring reserved CORS header in preflight set");
                continue;
            }
            let header_value = HeaderValue::from_str(value).map_err(|_| {
                CorsConfigError::InvalidHeaderValue { name: name.clone() }
            })?;
            preflight_headers.insert(header_name, header_value);
        }

        let expose_headers = self
            .expose_headers
            .as_deref()
            .map(|value| {
                HeaderValue::from_str(value).map_err(|_| CorsConfigError::InvalidHeaderValue {
                    name: header::ACCESS_CONTROL_EXPOSE_HEADERS.to_string(),
                })
            })
            .transpose()?;

        tracing::info!(
            allow = %allow,
            preflight_headers = preflight_headers.len(),
            expose_headers = ?self.expose_headers,
            log_rejections = self.enable_logging,
            "CORS policy configured"
        );

        Ok(CorsPolicy::new(
            allow,
            preflight_headers,
            expose_headers,
            self.enable_logging,
        ))
    }

    fn allow_policy(&self) -> Result<AllowPolicy, CorsConfigError> {
        if let Some(pattern) = &self.allow_origin_regex {
            let regex = RegexBuilder::new(&format!("^(?:{})$", pattern))
                .case_insensitive(true)
                .build()
                .map_err(|source| CorsConfigError::InvalidOriginRegex {
                    pattern: pattern.clone(),
                    source,
                })?;
            return Ok(AllowPolicy::Regex(regex));
        }

        Ok(match &self.allow_origin {
            Some(origin) => AllowPolicy::exact(origin.clone()),
            None => AllowPolicy::Wildcard,
        })
    }
}

fn is_credential_header(name: &HeaderName) -> bool {
    name == header::ACCESS_CONTROL_ALLOW_ORIGIN || name == header::ACCESS_CONTROL_ALLOW_CREDENTIALS
}
