//! Meal logs with their food lines.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use tracing::info;
use uuid::Uuid;

use fittrack_core::{CreateMealRequest, MealFilter, MealLog, MealRepository};

use crate::extract::{ApiQuery, Auth, ValidJson};
use crate::{ApiError, AppState};

/// `GET /meals?start_date=&end_date=&meal_type=`, newest first.
pub async fn list_meals(
    State(state): State<AppState>,
    auth: Auth,
    ApiQuery(filter): ApiQuery<MealFilter>,
) -> Result<Json<Vec<MealLog>>, ApiError> {
    Ok(Json(state.db.meals.list(auth.user.id, filter).await?))
}

/// Every referenced food must exist, otherwise nothing is stored.
pub async fn create_meal(
    State(state): State<AppState>,
    auth: Auth,
    ValidJson(req): ValidJson<CreateMealRequest>,
) -> Result<(StatusCode, Json<MealLog>), ApiError> {
    let meal = state.db.meals.create(auth.user.id, &req).await?;
    info!(
        subsystem = "api",
        op = "create_meal",
        user_id = %auth.user.id,
        meal_id = %meal.id,
        food_count = meal.foods.len(),
        "Meal logged"
    );
    Ok((StatusCode::CREATED, Json(meal)))
}

pub async fn get_meal(
    State(state): State<AppState>,
    auth: Auth,
    Path(id): Path<Uuid>,
) -> Result<Json<MealLog>, ApiError> {
    state
        .db
        .meals
        .fetch(auth.user.id, id)
        .await?
        .map(Json)
        .ok_or_else(|| ApiError::not_found("Meal not found"))
}

pub async fn delete_meal(
    State(state): State<AppState>,
    auth: Auth,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, ApiError> {
    if !state.db.meals.delete(auth.user.id, id).await? {
        return Err(ApiError::not_found("Meal not found"));
    }
    Ok(StatusCode::NO_CONTENT)
}
