//! Authentication Middleware

use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};
use subtle::ConstantTimeEq;

use crate::core::ServerState;
use crate::security_log;
use crate::utils::AppError;

/// Header carrying the admin secret
pub const ADMIN_SECRET_HEADER: &str = "x-admin-secret";

/// Require the configured admin secret on every request
pub async fn require_admin_secret(
    State(state): State<ServerState>,
    req: Request,
    next: Next,
) -> Result<Response, AppError> {
    // Allow OPTIONS requests for CORS preflight
    if req.method() == http::Method::OPTIONS {
        return Ok(next.run(req).await);
    }

    let verdict = req
        .headers()
        .get(ADMIN_SECRET_HEADER)
        .and_then(|h| h.to_str().ok())
        .map(|secret| secrets_match(secret, &state.config.admin_secret));

    match verdict {
        Some(true) => Ok(next.run(req).await),
        Some(false) => {
            security_log!(WARN, "auth_failed", uri = ?req.uri());
            Err(AppError::invalid_credentials())
        }
        None => {
            security_log!(WARN, "auth_missing", uri = ?req.uri());
            Err(AppError::not_authenticated())
        }
    }
}

/// Constant-time comparison of the presented secret
fn secrets_match(provided: &str, expected: &str) -> bool {
    bool::from(provided.as_bytes().ct_eq(expected.as_bytes()))
}
