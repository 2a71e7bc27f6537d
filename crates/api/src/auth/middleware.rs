//! Request authentication middleware

use axum::{
    extract::{Request, State},
    http::header::AUTHORIZATION,
    middleware::Next,
    response::Response,
};

use crate::auth::token::TokenPurpose;
use crate::error::ApiError;
use crate::state::AppState;

/// Identity attached to a request once the gate has accepted its token.
///
/// Handlers take this as a typed extension, so a missing or foreign value is
/// an extraction failure rather than a silently-wrong user ID.
#[derive(Debug, Clone, Copy)]
pub struct AuthUser {
    pub user_id: i64,
}

/// Gate for routes that require an authenticated subject
///
/// Accepts the session token from the Authorization header, with or without
/// a `Bearer ` prefix. Verification failures all collapse to the same
/// unauthenticated response; the failure kind is only logged server-side.
pub async fn require_auth(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let header = request
        .headers()
        .get(AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .unwrap_or("")
        .trim();

    if header.is_empty() {
        tracing::debug!("Rejecting request: token empty");
        return Err(ApiError::Unauthorized);
    }

    let token = header.strip_prefix("Bearer ").unwrap_or(header);

    let subject_id = state
        .tokens
        .verify(token, TokenPurpose::Access)
        .map_err(|e| {
            tracing::debug!(error = %e, "Rejecting request: token verification failed");
            ApiError::Unauthorized
        })?;

    // IDs are assigned from 1; a non-positive subject is as good as absent
    if subject_id <= 0 {
        tracing::warn!(subject_id, "Rejecting request: token subject out of range");
        return Err(ApiError::Unauthorized);
    }

    request.extensions_mut().insert(AuthUser {
        user_id: subject_id,
    });

    Ok(next.run(request).await)
}
