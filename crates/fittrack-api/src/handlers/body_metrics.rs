//! Weight and body-fat history.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use uuid::Uuid;

use fittrack_core::{BodyMetric, BodyMetricRepository, CreateBodyMetricRequest, DateRange};

use crate::extract::{ApiQuery, Auth, ValidJson};
use crate::{ApiError, AppState};

pub async fn list_body_metrics(
    State(state): State<AppState>,
    auth: Auth,
    ApiQuery(range): ApiQuery<DateRange>,
) -> Result<Json<Vec<BodyMetric>>, ApiError> {
    let metrics = state.db.body_metrics.list(auth.user.id, range).await?;
    Ok(Json(metrics))
}

pub async fn create_body_metric(
    State(state): State<AppState>,
    auth: Auth,
    ValidJson(req): ValidJson<CreateBodyMetricRequest>,
) -> Result<(StatusCode, Json<BodyMetric>), ApiError> {
    let metric = state.db.body_metrics.insert(auth.user.id, &req).await?;
    Ok((StatusCode::CREATED, Json(metric)))
}

pub async fn delete_body_metric(
    State(state): State<AppState>,
    auth: Auth,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, ApiError> {
    if !state.db.body_metrics.delete(auth.user.id, id).await? {
        return Err(ApiError::not_found("Body metric not found"));
    }
    Ok(StatusCode::NO_CONTENT)
}
