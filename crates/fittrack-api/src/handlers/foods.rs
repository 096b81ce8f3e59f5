//! Food reference catalogue.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use tracing::info;
use uuid::Uuid;

use fittrack_core::{CreateFoodRequest, FoodItem, FoodRepository, FoodSearch};

use crate::extract::{ApiQuery, Auth, ValidJson};
use crate::{ApiError, AppState};

/// `GET /foods?search=&limit=`, name order.
pub async fn search_foods(
    State(state): State<AppState>,
    _auth: Auth,
    ApiQuery(query): ApiQuery<FoodSearch>,
) -> Result<Json<Vec<FoodItem>>, ApiError> {
    Ok(Json(state.db.foods.search(&query).await?))
}

/// Foods added through the API are always custom.
pub async fn create_food(
    State(state): State<AppState>,
    auth: Auth,
    ValidJson(mut req): ValidJson<CreateFoodRequest>,
) -> Result<(StatusCode, Json<FoodItem>), ApiError> {
    req.is_custom = true;
    let food = state.db.foods.insert(&req).await?;
    info!(
        subsystem = "api",
        op = "create_food",
        user_id = %auth.user.id,
        food_id = %food.id,
        "Custom food added"
    );
    Ok((StatusCode::CREATED, Json(food)))
}

pub async fn get_food(
    State(state): State<AppState>,
    _auth: Auth,
    Path(id): Path<Uuid>,
) -> Result<Json<FoodItem>, ApiError> {
    state
        .db
        .foods
        .fetch(id)
        .await?
        .map(Json)
        .ok_or_else(|| ApiError::not_found("Food not found"))
}
