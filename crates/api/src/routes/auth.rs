//! Authentication and account flow handlers

use axum::{
    extract::{Query, State},
    http::{HeaderMap, StatusCode},
    Extension, Json,
};
use serde::{Deserialize, Serialize};

use gatehouse_shared::User;

use crate::auth::middleware::AuthUser;
use crate::auth::password::{hash_password, validate_new_password, verify_password};
use crate::auth::token::TokenPurpose;
use crate::error::{ApiError, ApiResult};
use crate::repository::NewUser;
use crate::routes::extract_client_ip;
use crate::state::AppState;

// =============================================================================
// Request/Response Types
// =============================================================================

#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    pub email: String,
    pub password: String,
    #[serde(default)]
    pub first_name: String,
    #[serde(default)]
    pub last_name: String,
}

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Deserialize)]
pub struct VerifyEmailQuery {
    pub token: String,
}

#[derive(Debug, Deserialize)]
pub struct ResendVerificationRequest {
    pub email: String,
}

#[derive(Debug, Deserialize)]
pub struct ForgotPasswordRequest {
    pub email: String,
}

#[derive(Debug, Deserialize)]
pub struct ResetPasswordRequest {
    pub token: String,
    pub password: String,
}

#[derive(Debug, Deserialize)]
pub struct ChangePasswordRequest {
    pub current_password: String,
    pub new_password: String,
}

#[derive(Debug, Deserialize)]
pub struct UpdateProfileRequest {
    pub first_name: String,
    pub last_name: String,
}

#[derive(Debug, Serialize)]
pub struct AuthResponse {
    pub access_token: String,
    pub token_type: String,
    pub expires_in: i64,
    pub user: User,
}

#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: String,
}

// =============================================================================
// Helpers
// =============================================================================

fn is_valid_email(email: &str) -> bool {
    let Some((local, domain)) = email.split_once('@') else {
        return false;
    };
    !local.is_empty() && domain.contains('.') && !domain.starts_with('.') && !domain.ends_with('.')
}

/// Sleep until at least `min` has elapsed since `start`
///
/// Keeps the forgot-password family of endpoints from leaking account
/// existence through response timing.
async fn enforce_min_response_time(start: std::time::Instant, min: std::time::Duration) {
    let elapsed = start.elapsed();
    if elapsed < min {
        tokio::time::sleep(min - elapsed).await;
    }
}

const ANTI_ENUMERATION_FLOOR: std::time::Duration = std::time::Duration::from_millis(500);

// =============================================================================
// Handlers
// =============================================================================

/// Register a new account
///
/// The account starts unverified; a verification link is emailed and no
/// tokens are returned until it is redeemed.
pub async fn register(
    State(state): State<AppState>,
    Json(req): Json<RegisterRequest>,
) -> ApiResult<(StatusCode, Json<MessageResponse>)> {
    if !state.config.enable_signup {
        return Err(ApiError::BadRequest(
            "Registration is currently disabled".to_string(),
        ));
    }

    if !is_valid_email(&req.email) {
        return Err(ApiError::Validation("Invalid email format".to_string()));
    }

    validate_new_password(&req.password)?;

    if req.first_name.len() > 100 || req.last_name.len() > 100 {
        return Err(ApiError::Validation(
            "Name must be at most 100 characters".to_string(),
        ));
    }

    // The unique index still catches a concurrent insert; this check just
    // gives the common case a clean error
    if state.repo.find_by_email(&req.email).await?.is_some() {
        return Err(ApiError::EmailAlreadyExists);
    }

    let password_hash = hash_password(&req.password)?;

    let user_id = state
        .repo
        .create(&NewUser {
            email: req.email.clone(),
            password_hash,
            first_name: req.first_name.trim().to_string(),
            last_name: req.last_name.trim().to_string(),
        })
        .await?;

    let verify_token = state.tokens.issue_email_verify_token(user_id)?;
    state
        .mailer
        .send_email_verification(&req.email, &verify_token)
        .await?;

    tracing::info!(user_id, "New account registered");

    Ok((
        StatusCode::CREATED,
        Json(MessageResponse {
            message: "Account created. Check your email to verify your address.".to_string(),
        }),
    ))
}

/// Log in with email and password
///
/// Unknown email and wrong password produce the same error so the endpoint
/// cannot be used to enumerate accounts.
pub async fn login(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(req): Json<LoginRequest>,
) -> ApiResult<Json<AuthResponse>> {
    let ip_address = extract_client_ip(&headers);

    let user = match state.repo.find_by_email(&req.email).await? {
        Some(user) => user,
        None => {
            tracing::info!(ip = ?ip_address, "Login failed: unknown email");
            return Err(ApiError::InvalidCredentials);
        }
    };

    if !verify_password(&req.password, &user.password_hash) {
        tracing::info!(user_id = user.id, ip = ?ip_address, "Login failed: wrong password");
        return Err(ApiError::InvalidCredentials);
    }

    if !user.email_verified {
        return Err(ApiError::EmailNotVerified);
    }

    let access_token = state.tokens.issue_access_token(user.id)?;

    tracing::info!(user_id = user.id, "Login successful");

    Ok(Json(AuthResponse {
        access_token,
        token_type: "Bearer".to_string(),
        expires_in: state.tokens.access_token_expiry_seconds(),
        user,
    }))
}

/// Redeem an email verification token
///
/// The token arrives as a query parameter because the link is clicked from
/// an email client. Redeeming a second time is a conflict, not a re-verify.
pub async fn verify_email(
    State(state): State<AppState>,
    Query(query): Query<VerifyEmailQuery>,
) -> ApiResult<Json<MessageResponse>> {
    let subject_id = state
        .tokens
        .verify(&query.token, TokenPurpose::EmailVerify)
        .map_err(|e| {
            tracing::warn!(error = %e, "Invalid email verification token");
            ApiError::InvalidToken
        })?;

    let user = state
        .repo
        .find_by_id(subject_id)
        .await?
        .ok_or(ApiError::NotFound)?;

    if user.email_verified {
        return Err(ApiError::Conflict("Email already verified".to_string()));
    }

    state.repo.set_email_verified(user.id).await?;

    tracing::info!(user_id = user.id, "Email verified");

    Ok(Json(MessageResponse {
        message: "Email verified successfully.".to_string(),
    }))
}

/// Resend the verification email
///
/// Responds identically whether or not the address belongs to an account.
pub async fn resend_verification_email(
    State(state): State<AppState>,
    Json(req): Json<ResendVerificationRequest>,
) -> ApiResult<Json<MessageResponse>> {
    let start = std::time::Instant::now();

    match state.repo.find_by_email(&req.email).await? {
        Some(user) if !user.email_verified => {
            let verify_token = state.tokens.issue_email_verify_token(user.id)?;
            state
                .mailer
                .send_email_verification(&user.email, &verify_token)
                .await?;
            tracing::info!(user_id = user.id, "Verification email resent");
        }
        Some(user) => {
            tracing::debug!(user_id = user.id, "Verification resend for verified account");
        }
        None => {
            tracing::debug!("Verification resend for unknown email");
        }
    }

    enforce_min_response_time(start, ANTI_ENUMERATION_FLOOR).await;

    Ok(Json(MessageResponse {
        message: "If an account exists with that email and is not yet verified, a new verification link has been sent.".to_string(),
    }))
}

/// Request a password reset link
///
/// Responds identically whether or not the address belongs to an account;
/// the distinction is only visible in server logs.
pub async fn forgot_password(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(req): Json<ForgotPasswordRequest>,
) -> ApiResult<Json<MessageResponse>> {
    let start = std::time::Instant::now();
    let ip_address = extract_client_ip(&headers);

    match state.repo.find_by_email(&req.email).await? {
        Some(user) => {
            let reset_token = state.tokens.issue_password_reset_token(user.id)?;
            state
                .mailer
                .send_password_reset(&user.email, &reset_token)
                .await?;
            tracing::info!(user_id = user.id, ip = ?ip_address, "Password reset email sent");
        }
        None => {
            tracing::debug!(ip = ?ip_address, "Password reset requested for unknown email");
        }
    }

    enforce_min_response_time(start, ANTI_ENUMERATION_FLOOR).await;

    Ok(Json(MessageResponse {
        message: "If an account exists with that email, a password reset link has been sent."
            .to_string(),
    }))
}

/// Reset the password with an emailed token
pub async fn reset_password(
    State(state): State<AppState>,
    Json(req): Json<ResetPasswordRequest>,
) -> ApiResult<Json<MessageResponse>> {
    validate_new_password(&req.password)?;

    let subject_id = state
        .tokens
        .verify(&req.token, TokenPurpose::PasswordReset)
        .map_err(|e| {
            tracing::warn!(error = %e, "Invalid password reset token");
            ApiError::InvalidToken
        })?;

    let user = state
        .repo
        .find_by_id(subject_id)
        .await?
        .ok_or(ApiError::NotFound)?;

    let password_hash = hash_password(&req.password)?;
    state
        .repo
        .update_password_hash(user.id, &password_hash)
        .await?;

    tracing::info!(user_id = user.id, "Password reset completed");

    // Notification only; the reset already succeeded
    if let Err(e) = state.mailer.send_password_changed(&user.email).await {
        tracing::warn!(user_id = user.id, error = %e, "Password changed notification failed");
    }

    Ok(Json(MessageResponse {
        message: "Password has been reset successfully.".to_string(),
    }))
}

/// Change the password of the authenticated account
pub async fn change_password(
    State(state): State<AppState>,
    Extension(auth_user): Extension<AuthUser>,
    Json(req): Json<ChangePasswordRequest>,
) -> ApiResult<Json<MessageResponse>> {
    let user = state
        .repo
        .find_by_id(auth_user.user_id)
        .await?
        .ok_or(ApiError::NotFound)?;

    if !verify_password(&req.current_password, &user.password_hash) {
        tracing::info!(user_id = user.id, "Password change failed: wrong current password");
        return Err(ApiError::InvalidCredentials);
    }

    validate_new_password(&req.new_password)?;

    let password_hash = hash_password(&req.new_password)?;
    state
        .repo
        .update_password_hash(user.id, &password_hash)
        .await?;

    tracing::info!(user_id = user.id, "Password changed");

    if let Err(e) = state.mailer.send_password_changed(&user.email).await {
        tracing::warn!(user_id = user.id, error = %e, "Password changed notification failed");
    }

    Ok(Json(MessageResponse {
        message: "Password changed successfully.".to_string(),
    }))
}

/// Return the authenticated account
pub async fn me(
    State(state): State<AppState>,
    Extension(auth_user): Extension<AuthUser>,
) -> ApiResult<Json<User>> {
    let user = state
        .repo
        .find_by_id(auth_user.user_id)
        .await?
        .ok_or(ApiError::NotFound)?;

    Ok(Json(user))
}

/// Update the authenticated account's profile
pub async fn update_me(
    State(state): State<AppState>,
    Extension(auth_user): Extension<AuthUser>,
    Json(req): Json<UpdateProfileRequest>,
) -> ApiResult<Json<User>> {
    if req.first_name.trim().is_empty() {
        return Err(ApiError::Validation(
            "First name must not be empty".to_string(),
        ));
    }
    if req.first_name.len() > 100 || req.last_name.len() > 100 {
        return Err(ApiError::Validation(
            "Name must be at most 100 characters".to_string(),
        ));
    }

    state
        .repo
        .update_profile(auth_user.user_id, req.first_name.trim(), req.last_name.trim())
        .await?;

    let user = state
        .repo
        .find_by_id(auth_user.user_id)
        .await?
        .ok_or(ApiError::NotFound)?;

    Ok(Json(user))
}
