//! CORS Middleware
//!
//! Tower layer that applies a [`CorsPolicy`] to every request. Allowed
//! preflights are answered here and never reach the wrapped service; every
//! other request is forwarded, and allowed ones get the credential headers
//! added to the response.

use std::{
    future::Future,
    pin::Pin,
    sync::Arc,
    task::{Context, Poll},
};

use axum::{
    body::Body,
    http::{header, HeaderMap, HeaderValue, Method, Request, Response, StatusCode},
};
use tower::{Layer, Service};

use crate::config::CorsSettings;
use crate::domain::cors::{CorsPolicy, Decision, DenyReason};
use crate::shared::error::CorsConfigError;

/// Layer that applies a CORS policy
#[derive(Clone)]
pub struct CorsLayer {
    policy: Arc<CorsPolicy>,
}

impl CorsLayer {
    /// Create a layer from a compiled policy
    pub fn new(policy: CorsPolicy) -> Self {
        Self {
            policy: Arc::new(policy),
        }
    }

    /// Accept every origin with the default preflight headers
    pub fn permissive() -> Self {
        Self::new(CorsPolicy::permissive())
    }

    pub fn policy(&self) -> &CorsPolicy {
        &self.policy
    }
}

impl<S> Layer<S> for CorsLayer {
    type Service = CorsMiddleware<S>;

    fn layer(&self, inner: S) -> Self::Service {
        CorsMiddleware {
            inner,
            policy: self.policy.clone(),
        }
    }
}

/// Middleware service that applies a CORS policy
#[derive(Clone)]
pub struct CorsMiddleware<S> {
    inner: S,
    policy: Arc<CorsPolicy>,
}

impl<S> Service<Request<Body>> for CorsMiddleware<S>
where
    S: Service<Request<Body>, Response = Response<Body>> + Clone + Send + 'static,
    S::Future: Send + 'static,
{
    type Response = S::Response;
    type Error = S::Error;
    type Future = Pin<Box<dyn Future<Output = Result<Self::Response, Self::Error>> + Send>>;

    fn poll_ready(&mut self, cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.inner.poll_ready(cx)
    }

    fn call(&mut self, request: Request<Body>) -> Self::Future {
        let decision = self.policy.evaluate(request.headers().get(header::ORIGIN));

        let origin = match decision {
            Decision::Allowed(origin) => Some(origin),
            Decision::Denied(reason) => {
                if self.policy.log_rejections() {
                    log_rejection(&request, reason);
                }
                None
            }
        };

        if request.method() == Method::OPTIONS {
            if let Some(origin) = origin {
                tracing::debug!(origin = ?origin, uri = %request.uri(), "Answering CORS preflight");
                let response = preflight_response(&self.policy, origin);
                return Box::pin(async move { Ok(response) });
            }
        }

        let clone = self.inner.clone();
        let mut inner = std::mem::replace(&mut self.inner, clone);
        let expose_headers = self.policy.expose_headers().cloned();

        Box::pin(async move {
            let mut response = inner.call(request).await?;

            if let Some(origin) = origin {
                let headers = response.headers_mut();
                insert_credential_headers(headers, origin);
                if let Some(value) = expose_headers {
                    headers.insert(header::ACCESS_CONTROL_EXPOSE_HEADERS, value);
                }
            }

            Ok(response)
        })
    }
}

/// Build the short-circuit response for an allowed preflight
fn preflight_response(policy: &CorsPolicy, origin: HeaderValue) -> Response<Body> {
    let mut response = Response::new(Body::empty());
    *response.status_mut() = StatusCode::OK;

    let headers = response.headers_mut();
    policy.preflight_headers().apply_to(headers);
    insert_credential_headers(headers, origin);

    response
}

fn insert_credential_headers(headers: &mut HeaderMap, origin: HeaderValue) {
    headers.insert(header::ACCESS_CONTROL_ALLOW_ORIGIN, origin);
    headers.insert(
        header::ACCESS_CONTROL_ALLOW_CREDENTIALS,
        HeaderValue::from_static("true"),
    );
}

fn log_rejection(request: &Request<Body>, reason: DenyReason) {
    tracing::warn!(
        reason = %reason,
        method = %request.method(),
        uri = %request.uri(),
        headers = ?redacted_headers(request.headers()),
        "CORS request rejected"
    );
}

/// Copy of `headers` whose credential values debug-print as `Sensitive`
fn redacted_headers(headers: &HeaderMap) -> HeaderMap {
    let mut redacted = headers.clone();
    for name in [header::AUTHORIZATION, header::PROXY_AUTHORIZATION, header::COOKIE] {
        if let header::Entry::Occupied(mut entry) = redacted.entry(name) {
            for value in entry.iter_mut() {
                value.set_sensitive(true);
            }
        }
    }
    redacted
}

/// Create CORS layer from settings
///
/// # Errors
///
/// Returns [`CorsConfigError`] if the settings do not compile into a policy.
pub fn create_cors_layer(settings: &CorsSettings) -> Result<CorsLayer, CorsConfigError> {
    settings.to_options().build().map(CorsLayer::new)
}
