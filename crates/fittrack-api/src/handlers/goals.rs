//! Fitness goals.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use uuid::Uuid;

use fittrack_core::{CreateGoalRequest, Goal, GoalFilter, GoalRepository, UpdateGoalRequest};

use crate::extract::{ApiQuery, Auth, ValidJson};
use crate::{ApiError, AppState};

/// `GET /goals?active_only=`; `active_only` defaults to true.
pub async fn list_goals(
    State(state): State<AppState>,
    auth: Auth,
    ApiQuery(filter): ApiQuery<GoalFilter>,
) -> Result<Json<Vec<Goal>>, ApiError> {
    Ok(Json(state.db.goals.list(auth.user.id, filter).await?))
}

pub async fn create_goal(
    State(state): State<AppState>,
    auth: Auth,
    ValidJson(req): ValidJson<CreateGoalRequest>,
) -> Result<(StatusCode, Json<Goal>), ApiError> {
    let goal = state.db.goals.insert(auth.user.id, &req).await?;
    Ok((StatusCode::CREATED, Json(goal)))
}

pub async fn update_goal(
    State(state): State<AppState>,
    auth: Auth,
    Path(id): Path<Uuid>,
    ValidJson(req): ValidJson<UpdateGoalRequest>,
) -> Result<Json<Goal>, ApiError> {
    let mut goal = state
        .db
        .goals
        .fetch(auth.user.id, id)
        .await?
        .ok_or_else(|| ApiError::not_found("Goal not found"))?;

    req.apply_to(&mut goal);
    if goal.target_date.is_some_and(|t| t < goal.start_date) {
        return Err(ApiError::bad_request(
            "target_date must not be before start_date",
        ));
    }

    Ok(Json(state.db.goals.save(&goal).await?))
}

pub async fn delete_goal(
    State(state): State<AppState>,
    auth: Auth,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, ApiError> {
    if !state.db.goals.delete(auth.user.id, id).await? {
        return Err(ApiError::not_found("Goal not found"));
    }
    Ok(StatusCode::NO_CONTENT)
}
