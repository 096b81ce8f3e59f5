//! Registration, login, logout and email-token flows.

use axum::{extract::State, http::StatusCode, Json};
use chrono::Utc;
use serde::Deserialize;
use tracing::{info, warn};

use fittrack_core::defaults::ACCESS_TOKEN_PREFIX;
use fittrack_core::validation::is_valid_email;
use fittrack_core::{
    AccessTokenRepository, CreateUserRequest, Error, LoginForm, MessageResponse,
    ResetPasswordRequest, TokenResponse, User, UserRepository,
};
use fittrack_crypto::{
    generate_prefixed_token, hash_password_with, hash_token, verify_password, PasswordParams,
};

use crate::extract::{ApiForm, ApiQuery, Auth, ValidJson};
use crate::services::TokenPurpose;
use crate::{ApiError, AppState};

const INCORRECT_LOGIN: &str = "Incorrect username or password";
const GENERIC_VERIFICATION_REPLY: &str = "If the email exists, a verification link has been sent.";
const GENERIC_RESET_REPLY: &str = "If the email exists, a password reset link has been sent.";

#[derive(Debug, Deserialize)]
pub struct TokenQuery {
    pub token: String,
}

#[derive(Debug, Deserialize)]
pub struct EmailQuery {
    pub email: String,
}

impl EmailQuery {
    fn checked(&self) -> Result<&str, ApiError> {
        let email = self.email.trim();
        if !is_valid_email(email) {
            return Err(ApiError::bad_request("email must be a valid email address"));
        }
        Ok(email)
    }
}

/// Argon2 is CPU-bound; keep it off the async workers.
async fn hash_in_background(params: PasswordParams, password: String) -> Result<String, ApiError> {
    let hash = tokio::task::spawn_blocking(move || hash_password_with(&password, &params))
        .await
        .map_err(|e| ApiError::Internal(Error::Internal(format!("Hashing task failed: {e}"))))??;
    Ok(hash)
}

async fn verify_in_background(password: String, hash: String) -> Result<bool, ApiError> {
    let ok = tokio::task::spawn_blocking(move || verify_password(&password, &hash))
        .await
        .map_err(|e| ApiError::Internal(Error::Internal(format!("Hashing task failed: {e}"))))??;
    Ok(ok)
}

/// `POST /register`
pub async fn register(
    State(state): State<AppState>,
    ValidJson(req): ValidJson<CreateUserRequest>,
) -> Result<(StatusCode, Json<User>), ApiError> {
    if state.db.users.find_by_username(&req.username).await?.is_some() {
        return Err(ApiError::bad_request("Username already registered"));
    }
    if state.db.users.find_by_email(&req.email).await?.is_some() {
        return Err(ApiError::bad_request("Email already registered"));
    }

    let hash = hash_in_background(state.password_params.clone(), req.password).await?;
    let user = state
        .db
        .users
        .insert(&req.username, &req.email, &hash)
        .await?;

    let token = state
        .verification
        .issue(user.id, TokenPurpose::VerifyEmail)
        .await;
    if !state
        .email
        .send_verification_email(&user.email, &user.username, &token)
        .await
    {
        warn!(subsystem = "api", op = "register", user_id = %user.id, "Verification email not sent");
    }

    info!(subsystem = "api", op = "register", user_id = %user.id, "User registered");
    Ok((StatusCode::CREATED, Json(user)))
}

/// `POST /token` (form encoded `username` / `password`)
pub async fn login(
    State(state): State<AppState>,
    ApiForm(form): ApiForm<LoginForm>,
) -> Result<Json<TokenResponse>, ApiError> {
    let credentials = state
        .db
        .users
        .fetch_credentials(&form.username)
        .await?
        .ok_or_else(|| ApiError::Unauthorized(INCORRECT_LOGIN.to_string()))?;

    if !verify_in_background(form.password, credentials.password_hash).await? {
        warn!(subsystem = "api", op = "login", user_id = %credentials.user.id, "Password mismatch");
        return Err(ApiError::Unauthorized(INCORRECT_LOGIN.to_string()));
    }

    let access_token = generate_prefixed_token(ACCESS_TOKEN_PREFIX);
    let expires_at = Utc::now() + state.token_ttl;
    state
        .db
        .access_tokens
        .insert(credentials.user.id, &hash_token(&access_token), expires_at)
        .await?;

    info!(subsystem = "api", op = "login", user_id = %credentials.user.id, "Access token issued");
    Ok(Json(TokenResponse {
        access_token,
        token_type: "bearer".to_string(),
        expires_at,
    }))
}

/// `POST /logout`
pub async fn logout(State(state): State<AppState>, auth: Auth) -> Result<StatusCode, ApiError> {
    state.db.access_tokens.revoke(&auth.token_hash).await?;
    info!(subsystem = "api", op = "logout", user_id = %auth.user.id, "Access token revoked");
    Ok(StatusCode::NO_CONTENT)
}

/// `GET /users/me`
pub async fn current_user(auth: Auth) -> Json<User> {
    Json(auth.user)
}

/// `GET /verify?token=`
pub async fn verify_email(
    State(state): State<AppState>,
    ApiQuery(query): ApiQuery<TokenQuery>,
) -> Result<Json<MessageResponse>, ApiError> {
    let user_id = state
        .verification
        .consume(&query.token, TokenPurpose::VerifyEmail)
        .await
        .ok_or_else(|| ApiError::bad_request("Invalid or expired verification token"))?;

    let user = state
        .db
        .users
        .fetch(user_id)
        .await?
        .ok_or_else(|| ApiError::not_found("User not found"))?;

    if user.is_verified {
        return Ok(Json(MessageResponse::verified("Email already verified")));
    }

    state.db.users.mark_verified(user.id).await?;
    info!(subsystem = "api", op = "verify_email", user_id = %user.id, "Email verified");
    Ok(Json(MessageResponse::verified("Email verified successfully!")))
}

/// `POST /resend-verification?email=`
pub async fn resend_verification(
    State(state): State<AppState>,
    ApiQuery(query): ApiQuery<EmailQuery>,
) -> Result<Json<MessageResponse>, ApiError> {
    let email = query.checked()?;
    let Some(user) = state.db.users.find_by_email(email).await? else {
        return Ok(Json(MessageResponse::new(GENERIC_VERIFICATION_REPLY)));
    };

    if user.is_verified {
        return Err(ApiError::bad_request("Email already verified"));
    }

    let token = state
        .verification
        .issue(user.id, TokenPurpose::VerifyEmail)
        .await;
    if !state
        .email
        .send_verification_email(&user.email, &user.username, &token)
        .await
    {
        warn!(subsystem = "api", op = "resend_verification", user_id = %user.id, "Verification email not sent");
    }

    Ok(Json(MessageResponse::new(
        "Verification email sent successfully!",
    )))
}

/// `POST /forgot-password?email=`
///
/// Answers the same way whether or not the address is registered.
pub async fn forgot_password(
    State(state): State<AppState>,
    ApiQuery(query): ApiQuery<EmailQuery>,
) -> Result<Json<MessageResponse>, ApiError> {
    let email = query.checked()?;
    if let Some(user) = state.db.users.find_by_email(email).await? {
        let token = state
            .verification
            .issue(user.id, TokenPurpose::ResetPassword)
            .await;
        if !state
            .email
            .send_password_reset_email(&user.email, &user.username, &token)
            .await
        {
            warn!(subsystem = "api", op = "forgot_password", user_id = %user.id, "Reset email not sent");
        }
    }
    Ok(Json(MessageResponse::new(GENERIC_RESET_REPLY)))
}

/// `POST /reset-password`
pub async fn reset_password(
    State(state): State<AppState>,
    ValidJson(req): ValidJson<ResetPasswordRequest>,
) -> Result<Json<MessageResponse>, ApiError> {
    let user_id = state
        .verification
        .consume(&req.token, TokenPurpose::ResetPassword)
        .await
        .ok_or_else(|| ApiError::bad_request("Invalid or expired reset token"))?;

    let hash = hash_in_background(state.password_params.clone(), req.new_password).await?;
    state.db.users.update_password(user_id, &hash).await?;
    let revoked = state.db.access_tokens.revoke_all_for_user(user_id).await?;

    info!(
        subsystem = "api",
        op = "reset_password",
        user_id = %user_id,
        revoked_tokens = revoked,
        "Password reset"
    );
    Ok(Json(MessageResponse::new("Password reset successfully")))
}
