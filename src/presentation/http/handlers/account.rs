//! Account Handlers
//!
//! Endpoints that require an authenticated user.

use axum::{Extension, Json};
use serde::Serialize;

use crate::presentation::middleware::AuthUser;
use crate::shared::error::AppError;

/// Current user response
#[derive(Debug, Serialize)]
pub struct MeResponse {
    pub username: String,
}

/// Return the authenticated user
///
/// Must be routed behind `basic_auth_middleware`.
pub async fn me(user: Option<Extension<AuthUser>>) -> Result<Json<MeResponse>, AppError> {
    let Extension(user) =
        user.ok_or_else(|| AppError::Internal("route is not behind the auth layer".into()))?;

    Ok(Json(MeResponse {
        username: user.username,
    }))
}
