//! Authentication Middleware
//!
//! Basic authentication for protected routes. Failed authentication is
//! answered by an [`AuthChallenge`]; wrapping it in a
//! [`PreflightSafeChallenge`] keeps `OPTIONS` preflights from ever receiving
//! a `401`, which browsers would treat as a failed CORS handshake.

use axum::{
    body::Body,
    extract::{Request, State},
    http::{
        header::{self, InvalidHeaderValue},
        HeaderMap, HeaderValue, Method,
    },
    middleware::Next,
    response::{IntoResponse, Response},
};
use base64::{engine::general_purpose::STANDARD, Engine as _};

use crate::config::AuthSettings;
use crate::shared::error::AppError;
use crate::startup::AppState;

/// Why a request could not be authenticated
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum AuthFailure {
    #[error("Missing authorization header")]
    MissingCredentials,

    #[error("Invalid authorization header format")]
    MalformedCredentials,

    #[error("Invalid username or password")]
    InvalidCredentials,
}

/// Authenticated user extension
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthUser {
    pub username: String,
}

/// Writes the response for a request that failed authentication.
#[cfg_attr(test, mockall::automock)]
pub trait AuthChallenge: Send + Sync {
    fn commence(&self, method: &Method, response: &mut Response, failure: &AuthFailure);
}

/// `401` with a `WWW-Authenticate: Basic` challenge
#[derive(Debug, Clone)]
pub struct BasicAuthChallenge {
    www_authenticate: HeaderValue,
}

impl BasicAuthChallenge {
    /// Create a challenge for the given realm
    pub fn new(realm: &str) -> Result<Self, InvalidHeaderValue> {
        let www_authenticate = HeaderValue::from_str(&format!("Basic realm=\"{}\"", realm))?;
        Ok(Self { www_authenticate })
    }
}

impl AuthChallenge for BasicAuthChallenge {
    fn commence(&self, _method: &Method, response: &mut Response, failure: &AuthFailure) {
        *response = AppError::Unauthorized(failure.to_string()).into_response();
        response
            .headers_mut()
            .insert(header::WWW_AUTHENTICATE, self.www_authenticate.clone());
    }
}

/// Suppresses the wrapped challenge for `OPTIONS` requests.
#[derive(Debug, Clone)]
pub struct PreflightSafeChallenge<C> {
    inner: C,
}

impl<C> PreflightSafeChallenge<C> {
    pub fn new(inner: C) -> Self {
        Self { inner }
    }
}

impl<C: AuthChallenge> AuthChallenge for PreflightSafeChallenge<C> {
    fn commence(&self, method: &Method, response: &mut Response, failure: &AuthFailure) {
        if *method == Method::OPTIONS {
            return;
        }
        self.inner.commence(method, response, failure);
    }
}

/// Check `Authorization: Basic ...` against the configured credentials.
pub fn authenticate(headers: &HeaderMap, auth: &AuthSettings) -> Result<AuthUser, AuthFailure> {
    let value = headers
        .get(header::AUTHORIZATION)
        .ok_or(AuthFailure::MissingCredentials)?
        .to_str()
        .map_err(|_| AuthFailure::MalformedCredentials)?;

    let (scheme, encoded) = value
        .trim()
        .split_once(' ')
        .ok_or(AuthFailure::MalformedCredentials)?;
    if !scheme.eq_ignore_ascii_case("basic") {
        return Err(AuthFailure::MalformedCredentials);
    }

    let decoded = STANDARD
        .decode(encoded.trim())
        .map_err(|_| AuthFailure::MalformedCredentials)?;
    let decoded = String::from_utf8(decoded).map_err(|_| AuthFailure::MalformedCredentials)?;
    let (username, password) = decoded
        .split_once(':')
        .ok_or(AuthFailure::MalformedCredentials)?;

    if username != auth.username || password != auth.password {
        return Err(AuthFailure::InvalidCredentials);
    }

    Ok(AuthUser {
        username: username.to_string(),
    })
}

/// Authentication middleware that validates basic credentials
pub async fn basic_auth_middleware(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Response {
    match authenticate(request.headers(), &state.settings.auth) {
        Ok(user) => {
            request.extensions_mut().insert(user);
            next.run(request).await
        }
        Err(failure) => {
            tracing::debug!(
                %failure,
                method = %request.method(),
                uri = %request.uri(),
                "Authentication failed"
            );
            let mut response = Response::new(Body::empty());
            state
                .challenge
                .commence(request.method(), &mut response, &failure);
            response
        }
    }
}
