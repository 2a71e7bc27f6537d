//! Administrative user handlers

use axum::{extract::State, Extension, Json};
use serde::Serialize;

use gatehouse_shared::User;

use crate::auth::middleware::AuthUser;
use crate::error::{ApiError, ApiResult};
use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct ListUsersResponse {
    pub users: Vec<User>,
    pub total: usize,
}

/// List every account (admin only)
///
/// The role check happens here rather than in middleware; the auth gate only
/// proves the caller holds a valid access token.
pub async fn list_users(
    State(state): State<AppState>,
    Extension(auth_user): Extension<AuthUser>,
) -> ApiResult<Json<ListUsersResponse>> {
    let caller = state
        .repo
        .find_by_id(auth_user.user_id)
        .await?
        .ok_or(ApiError::NotFound)?;

    if !caller.has_role("admin") {
        tracing::warn!(
            user_id = caller.id,
            role = %caller.role,
            "Non-admin attempted to list users"
        );
        return Err(ApiError::Forbidden);
    }

    let users = state.repo.list_all().await?;
    let total = users.len();

    Ok(Json(ListUsersResponse { users, total }))
}
