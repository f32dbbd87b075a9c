//! CORS API Tests
//!
//! Exercise the CORS layer through the full application router.

use std::collections::BTreeMap;

use axum::http::{header, Method, StatusCode};
use pretty_assertions::assert_eq;

use cors_filter::config::CorsSettings;

use crate::common::{basic_auth, cors_header_names, TestApp};

fn names(expected: &[&str]) -> Vec<String> {
    let mut names: Vec<String> = expected.iter().map(|name| name.to_string()).collect();
    names.sort();
    names
}

#[tokio::test]
async fn test_preflight_is_answered_before_authentication() {
    let app = TestApp::new(CorsSettings::default());

    let response = app
        .send(Method::OPTIONS, "/api/v1/me", Some("https://a.com"), None)
        .await;

    assert_eq!(response.status(), StatusCode::OK);
    assert!(response.headers().get(header::WWW_AUTHENTICATE).is_none());
    assert_eq!(
        cors_header_names(&response),
        names(&[
            "access-control-allow-origin",
            "access-control-allow-credentials",
            "access-control-allow-headers",
            "access-control-allow-methods",
            "access-control-max-age",
        ])
    );
    assert_eq!(
        response.headers().get(header::ACCESS_CONTROL_ALLOW_ORIGIN).unwrap(),
        "https://a.com"
    );
}

#[tokio::test]
async fn test_denied_preflight_continues_to_router() {
    let app = TestApp::new(CorsSettings {
        allow_origin: Some("https://a.com".into()),
        ..Default::default()
    });

    let response = app
        .send(Method::OPTIONS, "/health", Some("https://b.com"), None)
        .await;

    // The router answers: /health only serves GET
    assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED);
    assert!(cors_header_names(&response).is_empty());
}

#[tokio::test]
async fn test_actual_request_with_expose_headers() {
    let app = TestApp::new(CorsSettings {
        expose_headers: Some("X-Total-Count".into()),
        ..Default::default()
    });

    let response = app
        .send(Method::GET, "/health", Some("https://a.com"), None)
        .await;

    assert_eq!(response.status(), StatusCode::OK);
    let headers = response.headers();
    assert_eq!(headers.get(header::ACCESS_CONTROL_ALLOW_ORIGIN).unwrap(), "https://a.com");
    assert_eq!(headers.get(header::ACCESS_CONTROL_ALLOW_CREDENTIALS).unwrap(), "true");
    assert_eq!(
        headers.get(header::ACCESS_CONTROL_EXPOSE_HEADERS).unwrap(),
        "X-Total-Count"
    );
    assert!(headers.get(header::ACCESS_CONTROL_ALLOW_METHODS).is_none());
}

#[tokio::test]
async fn test_request_without_origin_gets_no_cors_headers() {
    let app = TestApp::new(CorsSettings::default());

    let response = app.send(Method::GET, "/health", None, None).await;

    assert_eq!(response.status(), StatusCode::OK);
    assert!(cors_header_names(&response).is_empty());
}

#[tokio::test]
async fn test_regex_policy() {
    let app = TestApp::new(CorsSettings {
        allow_origin_regex: Some(r"^https://.*\.a\.com$".into()),
        allow_origin: Some("https://ignored.com".into()),
        ..Default::default()
    });

    let allowed = app
        .send(Method::GET, "/health", Some("https://X.A.com"), None)
        .await;
    assert_eq!(
        allowed.headers().get(header::ACCESS_CONTROL_ALLOW_ORIGIN).unwrap(),
        "https://X.A.com"
    );

    let scheme_mismatch = app
        .send(Method::GET, "/health", Some("http://x.a.com"), None)
        .await;
    assert_eq!(scheme_mismatch.status(), StatusCode::OK);
    assert!(cors_header_names(&scheme_mismatch).is_empty());

    let exact_ignored = app
        .send(Method::GET, "/health", Some("https://ignored.com"), None)
        .await;
    assert!(cors_header_names(&exact_ignored).is_empty());
}

#[tokio::test]
async fn test_configured_headers_override_defaults() {
    let app = TestApp::new(CorsSettings {
        headers: BTreeMap::from([
            ("Access-Control-Max-Age".to_string(), "60".to_string()),
            ("Access-Control-Allow-Origin".to_string(), "https://a.com".to_string()),
        ]),
        ..Default::default()
    });

    let allowed = app
        .send(Method::OPTIONS, "/api/v1/me", Some("https://a.com"), None)
        .await;
    assert_eq!(allowed.status(), StatusCode::OK);
    assert_eq!(
        allowed.headers().get(header::ACCESS_CONTROL_MAX_AGE).unwrap(),
        "60"
    );
    assert_eq!(
        allowed.headers().get(header::ACCESS_CONTROL_ALLOW_ORIGIN).unwrap(),
        "https://a.com"
    );

    let denied = app
        .send(Method::OPTIONS, "/api/v1/me", Some("https://b.com"), None)
        .await;
    assert!(cors_header_names(&denied).is_empty());
}

#[tokio::test]
async fn test_auth_challenge_carries_cors_headers() {
    let app = TestApp::new(CorsSettings::default());

    let response = app
        .send(Method::GET, "/api/v1/me", Some("https://a.com"), None)
        .await;

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    assert!(response.headers().get(header::WWW_AUTHENTICATE).is_some());
    assert_eq!(
        response.headers().get(header::ACCESS_CONTROL_ALLOW_ORIGIN).unwrap(),
        "https://a.com"
    );

    let authorized = app
        .send(
            Method::GET,
            "/api/v1/me",
            Some("https://a.com"),
            Some(&basic_auth()),
        )
        .await;
    assert_eq!(authorized.status(), StatusCode::OK);
    assert_eq!(
        authorized
            .headers()
            .get(header::ACCESS_CONTROL_ALLOW_CREDENTIALS)
            .unwrap(),
        "true"
    );
}
