//! Application Startup
//!
//! Application building and server initialization.

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Result;
use axum::http::header::InvalidHeaderValue;
use axum::Router;
use tokio::net::TcpListener;

use crate::config::Settings;
use crate::presentation::http::routes;
use crate::presentation::middleware::{
    create_cors_layer, create_trace_layer, AuthChallenge, BasicAuthChallenge,
    PreflightSafeChallenge,
};
use crate::shared::error::CorsConfigError;

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub settings: Arc<Settings>,
    pub challenge: Arc<dyn AuthChallenge>,
}

impl AppState {
    /// Build state with a preflight-safe basic auth challenge
    pub fn new(settings: Settings) -> Result<Self, InvalidHeaderValue> {
        let challenge = PreflightSafeChallenge::new(BasicAuthChallenge::new(&settings.auth.realm)?);
        Ok(Self {
            settings: Arc::new(settings),
            challenge: Arc::new(challenge),
        })
    }
}

/// Build the router with all middleware applied.
///
/// The CORS layer is outermost so it runs before any other processing,
/// authentication included.
pub fn build_router(state: AppState) -> Result<Router, CorsConfigError> {
    let cors = create_cors_layer(&state.settings.cors)?;

    Ok(routes::create_router(state)
        .layer(create_trace_layer())
        .layer(cors))
}

/// Application instance
pub struct Application {
    listener: TcpListener,
    router: Router,
}

impl Application {
    /// Build the application from settings
    pub async fn build(settings: Settings) -> Result<Self> {
        let addr = settings.server_addr();
        let state = AppState::new(settings)?;

        // An unusable CORS policy aborts startup
        let router = build_router(state)?;

        // Bind to address
        let listener = TcpListener::bind(&addr).await?;
        tracing::info!("Listening on {}", listener.local_addr()?);

        Ok(Self { listener, router })
    }

    /// Run the server until stopped
    pub async fn run_until_stopped(self) -> Result<()> {
        axum::serve(self.listener, self.router).await?;
        Ok(())
    }

    /// Get the bound address
    pub fn local_addr(&self) -> std::io::Result<SocketAddr> {
        self.listener.local_addr()
    }
}
