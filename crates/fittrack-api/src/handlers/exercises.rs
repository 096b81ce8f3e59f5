//! Exercise library.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use tracing::info;
use uuid::Uuid;

use fittrack_core::defaults::clamp_search_limit;
use fittrack_core::{
    CreateExerciseRequest, Exercise, ExerciseCategory, ExerciseRepository, ExerciseSearch,
};

use crate::extract::{ApiQuery, Auth, ValidJson};
use crate::{ApiError, AppState};

/// `GET /exercises?search=&category=&limit=`
///
/// An unknown `category` is a 400 rather than an empty list.
pub async fn search_exercises(
    State(state): State<AppState>,
    _auth: Auth,
    ApiQuery(query): ApiQuery<ExerciseSearch>,
) -> Result<Json<Vec<Exercise>>, ApiError> {
    let category = query
        .category
        .as_deref()
        .map(str::trim)
        .filter(|c| !c.is_empty())
        .map(|c| c.to_lowercase().parse::<ExerciseCategory>())
        .transpose()?;

    let search = query
        .search
        .as_deref()
        .map(str::trim)
        .filter(|s| !s.is_empty());

    let exercises = state
        .db
        .exercises
        .search(search, category, clamp_search_limit(query.limit))
        .await?;
    Ok(Json(exercises))
}

pub async fn create_exercise(
    State(state): State<AppState>,
    auth: Auth,
    ValidJson(mut req): ValidJson<CreateExerciseRequest>,
) -> Result<(StatusCode, Json<Exercise>), ApiError> {
    req.is_custom = true;
    let exercise = state.db.exercises.insert(&req).await?;
    info!(
        subsystem = "api",
        op = "create_exercise",
        user_id = %auth.user.id,
        exercise_id = %exercise.id,
        "Custom exercise added"
    );
    Ok((StatusCode::CREATED, Json(exercise)))
}

pub async fn get_exercise(
    State(state): State<AppState>,
    _auth: Auth,
    Path(id): Path<Uuid>,
) -> Result<Json<Exercise>, ApiError> {
    state
        .db
        .exercises
        .fetch(id)
        .await?
        .map(Json)
        .ok_or_else(|| ApiError::not_found("Exercise not found"))
}
