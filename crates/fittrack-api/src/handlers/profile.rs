//! The caller's profile (at most one per user).

use axum::{extract::State, http::StatusCode, Json};
use tracing::info;

use fittrack_core::{CreateProfileRequest, ProfileRepository, UpdateProfileRequest, UserProfile};

use crate::extract::{Auth, ValidJson};
use crate::{ApiError, AppState};

pub async fn get_profile(
    State(state): State<AppState>,
    auth: Auth,
) -> Result<Json<UserProfile>, ApiError> {
    let profile = state
        .db
        .profiles
        .fetch_for_user(auth.user.id)
        .await?
        .ok_or_else(|| ApiError::not_found("Profile not found"))?;
    Ok(Json(profile))
}

pub async fn create_profile(
    State(state): State<AppState>,
    auth: Auth,
    ValidJson(req): ValidJson<CreateProfileRequest>,
) -> Result<(StatusCode, Json<UserProfile>), ApiError> {
    if state
        .db
        .profiles
        .fetch_for_user(auth.user.id)
        .await?
        .is_some()
    {
        return Err(ApiError::bad_request(
            "Profile already exists. Use PUT to update.",
        ));
    }

    let profile = state.db.profiles.insert(auth.user.id, &req).await?;
    info!(subsystem = "api", op = "create_profile", user_id = %auth.user.id, "Profile created");
    Ok((StatusCode::CREATED, Json(profile)))
}

/// Partial update: omitted fields are kept, explicit nulls clear the field.
pub async fn update_profile(
    State(state): State<AppState>,
    auth: Auth,
    ValidJson(req): ValidJson<UpdateProfileRequest>,
) -> Result<Json<UserProfile>, ApiError> {
    let mut profile = state
        .db
        .profiles
        .fetch_for_user(auth.user.id)
        .await?
        .ok_or_else(|| ApiError::not_found("Profile not found. Create one first."))?;

    req.apply_to(&mut profile);
    let saved = state.db.profiles.save(&profile).await?;
    Ok(Json(saved))
}
