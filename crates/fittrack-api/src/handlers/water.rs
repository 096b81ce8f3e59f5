//! Water intake entries.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use uuid::Uuid;

use fittrack_core::{CreateWaterRequest, DateRange, WaterIntake, WaterRepository};

use crate::extract::{ApiQuery, Auth, ValidJson};
use crate::{ApiError, AppState};

pub async fn list_water(
    State(state): State<AppState>,
    auth: Auth,
    ApiQuery(range): ApiQuery<DateRange>,
) -> Result<Json<Vec<WaterIntake>>, ApiError> {
    Ok(Json(state.db.water.list(auth.user.id, range).await?))
}

pub async fn log_water(
    State(state): State<AppState>,
    auth: Auth,
    ValidJson(req): ValidJson<CreateWaterRequest>,
) -> Result<(StatusCode, Json<WaterIntake>), ApiError> {
    let entry = state.db.water.insert(auth.user.id, &req).await?;
    Ok((StatusCode::CREATED, Json(entry)))
}

pub async fn delete_water(
    State(state): State<AppState>,
    auth: Auth,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, ApiError> {
    if !state.db.water.delete(auth.user.id, id).await? {
        return Err(ApiError::not_found("Water intake not found"));
    }
    Ok(StatusCode::NO_CONTENT)
}
