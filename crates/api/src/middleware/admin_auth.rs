//! Admin authentication middleware.

use axum::{
    body::Body,
    extract::State,
    http::Request,
    middleware::Next,
    response::{IntoResponse, Response},
};

use crate::app::AppState;
use crate::error::ApiError;

const ADMIN_KEY_HEADER: &str = "X-Admin-Key";

/// Requires the configured admin key in the `X-Admin-Key` header. With no
/// key configured the admin surface is disabled outright.
pub async fn require_admin(
    State(state): State<AppState>,
    req: Request<Body>,
    next: Next,
) -> Response {
    let configured = &state.config.security.admin_api_key;
    if configured.is_empty() {
        return ApiError::ServiceUnavailable("Admin access is not configured".into())
            .into_response();
    }

    let provided = req
        .headers()
        .get(ADMIN_KEY_HEADER)
        .and_then(|v| v.to_str().ok());

    match provided {
        Some(key) if key == configured => next.run(req).await,
        Some(_) => ApiError::Unauthorized("Invalid admin key".into()).into_response(),
        None => ApiError::Unauthorized("Missing X-Admin-Key header".into()).into_response(),
    }
}
