use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};

use crate::error::AppError;
use crate::AppState;

pub const ADMIN_TOKEN_HEADER: &str = "x-admin-token";

/// Shared-secret gate for the admin surface: the X-Admin-Token header must
/// match the configured secret exactly. Missing or mismatched -> 401.
pub async fn admin_auth(
    State(state): State<AppState>,
    req: Request,
    next: Next,
) -> Result<Response, AppError> {
    let supplied = req
        .headers()
        .get(ADMIN_TOKEN_HEADER)
        .and_then(|h| h.to_str().ok());

    match supplied {
        Some(token) if !state.config.admin_token.is_empty() && token == state.config.admin_token => {
            Ok(next.run(req).await)
        }
        _ => Err(AppError::Unauthorized),
    }
}
