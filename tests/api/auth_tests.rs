//! Authentication API Tests

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use axum::{
    body::Body,
    http::{header, Method, Request, StatusCode},
    middleware,
    routing::any,
    Router,
};
use tower::ServiceExt;

use cors_filter::config::CorsSettings;
use cors_filter::presentation::middleware::basic_auth_middleware;
use cors_filter::startup::AppState;

use crate::common::{basic_auth, json_body, test_settings, TestApp};

/// Protected route whose handler counts how often it runs
fn protected_app() -> (Router, Arc<AtomicUsize>) {
    let state = AppState::new(test_settings(CorsSettings::default())).unwrap();
    let hits = Arc::new(AtomicUsize::new(0));
    let counter = hits.clone();

    let app = Router::new()
        .route(
            "/protected",
            any(move || {
                let counter = counter.clone();
                async move {
                    counter.fetch_add(1, Ordering::SeqCst);
                    "OK"
                }
            }),
        )
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            basic_auth_middleware,
        ))
        .with_state(state);

    (app, hits)
}

fn request(method: Method) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri("/protected")
        .body(Body::empty())
        .unwrap()
}

#[tokio::test]
async fn test_me_with_valid_credentials() {
    let app = TestApp::new(CorsSettings::default());

    let response = app
        .send(Method::GET, "/api/v1/me", None, Some(&basic_auth()))
        .await;

    assert_eq!(response.status(), StatusCode::OK);
    let body = json_body(response).await;
    assert_eq!(body["username"], "admin");
}

#[tokio::test]
async fn test_me_without_credentials() {
    let app = TestApp::new(CorsSettings::default());

    let response = app.send(Method::GET, "/api/v1/me", None, None).await;

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(
        response.headers().get(header::WWW_AUTHENTICATE).unwrap(),
        "Basic realm=\"test\""
    );
    let body = json_body(response).await;
    assert_eq!(body["code"], 10003);
    assert_eq!(body["message"], "Missing authorization header");
}

#[tokio::test]
async fn test_me_with_wrong_password() {
    let app = TestApp::new(CorsSettings::default());

    let response = app
        .send(Method::GET, "/api/v1/me", None, Some("Basic YWRtaW46d3Jvbmc="))
        .await;

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_unauthenticated_options_is_not_challenged() {
    let (app, hits) = protected_app();

    let response = app.oneshot(request(Method::OPTIONS)).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert!(response.headers().get(header::WWW_AUTHENTICATE).is_none());
    assert_eq!(hits.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn test_unauthenticated_get_is_challenged() {
    let (app, hits) = protected_app();

    let response = app.oneshot(request(Method::GET)).await.unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    assert!(response.headers().get(header::WWW_AUTHENTICATE).is_some());
    assert_eq!(hits.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn test_denied_preflight_is_not_challenged() {
    let app = TestApp::new(CorsSettings {
        allow_origin: Some("https://a.com".into()),
        ..Default::default()
    });

    let response = app
        .send(Method::OPTIONS, "/api/v1/me", Some("https://b.com"), None)
        .await;

    assert_ne!(response.status(), StatusCode::UNAUTHORIZED);
    assert!(response.headers().get(header::WWW_AUTHENTICATE).is_none());
}
