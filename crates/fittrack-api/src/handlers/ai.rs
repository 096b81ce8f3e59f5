//! Model-assisted parsing and suggestions.
//!
//! Nothing here is persisted; the client reviews the result and then uses
//! the regular create endpoints.

use axum::{extract::State, Json};
use tracing::info;

use fittrack_core::{
    MealSuggestionQuery, MealSuggestionsResponse, ParseFoodResponse, ParseTextRequest,
    ParseWorkoutResponse,
};

use crate::extract::{ApiQuery, Auth, ValidJson};
use crate::{ApiError, AppState};

pub async fn parse_food(
    State(state): State<AppState>,
    auth: Auth,
    ValidJson(req): ValidJson<ParseTextRequest>,
) -> Result<Json<ParseFoodResponse>, ApiError> {
    let food_items = state
        .parser
        .parse_food(&req.text)
        .await
        .map_err(|e| ApiError::inference("AI parsing error", e))?;

    info!(
        subsystem = "api",
        op = "parse_food",
        user_id = %auth.user.id,
        model = state.parser.model_name(),
        item_count = food_items.len(),
        "Food text parsed"
    );
    Ok(Json(ParseFoodResponse { food_items }))
}

pub async fn parse_workout(
    State(state): State<AppState>,
    auth: Auth,
    ValidJson(req): ValidJson<ParseTextRequest>,
) -> Result<Json<ParseWorkoutResponse>, ApiError> {
    let exercises = state
        .parser
        .parse_workout(&req.text)
        .await
        .map_err(|e| ApiError::inference("AI parsing error", e))?;

    info!(
        subsystem = "api",
        op = "parse_workout",
        user_id = %auth.user.id,
        model = state.parser.model_name(),
        exercise_count = exercises.len(),
        "Workout text parsed"
    );
    Ok(Json(ParseWorkoutResponse { exercises }))
}

pub async fn meal_suggestions(
    State(state): State<AppState>,
    _auth: Auth,
    ApiQuery(query): ApiQuery<MealSuggestionQuery>,
) -> Result<Json<MealSuggestionsResponse>, ApiError> {
    let suggestions = state
        .parser
        .meal_suggestions(
            query.preferences.as_deref(),
            query.dietary_restrictions.as_deref(),
        )
        .await
        .map_err(|e| ApiError::inference("AI error", e))?;
    Ok(Json(MealSuggestionsResponse { suggestions }))
}
