//! Middleware for session token validation and authentication
//!
//! Booking and listing are only reachable through this gate: the requester
//! identity always comes from a verified session, never from the request
//! body.

use axum::{
    body::Body,
    extract::State,
    http::{Request, StatusCode},
    middleware::Next,
    response::Response,
};
use tracing::error;
use uuid::Uuid;

use crate::AppState;

/// Verified session attached to a request after authentication
#[derive(Debug, Clone, Copy)]
pub struct AuthSession {
    pub user_id: Uuid,
    pub token: Uuid,
}

/// Extract and validate the session token from the Authorization header
pub async fn auth_middleware(
    State(state): State<AppState>,
    mut req: Request<Body>,
    next: Next,
) -> Result<Response, StatusCode> {
    // Extract the Authorization header
    let auth_header = req
        .headers()
        .get(axum::http::header::AUTHORIZATION)
        .and_then(|header| header.to_str().ok())
        .ok_or(StatusCode::UNAUTHORIZED)?;

    // Check if the header starts with "Bearer "
    if !auth_header.starts_with("Bearer ") {
        return Err(StatusCode::UNAUTHORIZED);
    }

    // Extract the token
    let token: Uuid = auth_header[7..]
        .parse()
        .map_err(|_| StatusCode::UNAUTHORIZED)?;

    // Resolve the token to a live session user
    let user = state
        .session_repository
        .find_user_by_token(token)
        .await
        .map_err(|e| {
            error!("Failed to look up session: {}", e);
            StatusCode::INTERNAL_SERVER_ERROR
        })?
        .ok_or(StatusCode::UNAUTHORIZED)?;

    // Add the verified session to request extensions for use in handlers
    req.extensions_mut().insert(AuthSession {
        user_id: user.id,
        token,
    });

    // Continue with the request
    Ok(next.run(req).await)
}
