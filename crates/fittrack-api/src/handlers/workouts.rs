//! Workout sessions with exercises and sets.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use tracing::info;
use uuid::Uuid;

use fittrack_core::{CreateWorkoutRequest, DateRange, WorkoutRepository, WorkoutSession};

use crate::extract::{ApiQuery, Auth, ValidJson};
use crate::{ApiError, AppState};

pub async fn list_workouts(
    State(state): State<AppState>,
    auth: Auth,
    ApiQuery(range): ApiQuery<DateRange>,
) -> Result<Json<Vec<WorkoutSession>>, ApiError> {
    Ok(Json(state.db.workouts.list(auth.user.id, range).await?))
}

pub async fn create_workout(
    State(state): State<AppState>,
    auth: Auth,
    ValidJson(req): ValidJson<CreateWorkoutRequest>,
) -> Result<(StatusCode, Json<WorkoutSession>), ApiError> {
    let workout = state.db.workouts.create(auth.user.id, &req).await?;
    info!(
        subsystem = "api",
        op = "create_workout",
        user_id = %auth.user.id,
        workout_id = %workout.id,
        exercise_count = workout.exercises.len(),
        "Workout logged"
    );
    Ok((StatusCode::CREATED, Json(workout)))
}

pub async fn get_workout(
    State(state): State<AppState>,
    auth: Auth,
    Path(id): Path<Uuid>,
) -> Result<Json<WorkoutSession>, ApiError> {
    state
        .db
        .workouts
        .fetch(auth.user.id, id)
        .await?
        .map(Json)
        .ok_or_else(|| ApiError::not_found("Workout not found"))
}

pub async fn delete_workout(
    State(state): State<AppState>,
    auth: Auth,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, ApiError> {
    if !state.db.workouts.delete(auth.user.id, id).await? {
        return Err(ApiError::not_found("Workout not found"));
    }
    Ok(StatusCode::NO_CONTENT)
}
