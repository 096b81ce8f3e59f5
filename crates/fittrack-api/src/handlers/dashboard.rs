//! Daily summary.

use axum::{extract::State, Json};
use chrono::{Duration, Local, NaiveDate};
use serde::Deserialize;

use fittrack_core::defaults::DASHBOARD_WEEK_DAYS;
use fittrack_core::{
    summarize, DashboardInputs, DashboardSummary, DateRange, MealRepository, ProfileRepository,
    WaterRepository, WorkoutRepository,
};

use crate::extract::{ApiQuery, Auth};
use crate::{ApiError, AppState};

#[derive(Debug, Default, Deserialize)]
pub struct DashboardQuery {
    /// Day to summarise; the server's local date when absent.
    pub date: Option<NaiveDate>,
}

/// `GET /dashboard`
///
/// Workouts count from `date - 7 days` onward with no upper bound.
pub async fn get_dashboard(
    State(state): State<AppState>,
    auth: Auth,
    ApiQuery(query): ApiQuery<DashboardQuery>,
) -> Result<Json<DashboardSummary>, ApiError> {
    let user_id = auth.user.id;
    let day = query.date.unwrap_or_else(|| Local::now().date_naive());
    let week_start = day - Duration::days(DASHBOARD_WEEK_DAYS);

    let (lines, water, workouts_this_week, profile) = futures::try_join!(
        state.db.meals.nutrition_lines(user_id, day),
        state.db.water.list(user_id, DateRange::new(Some(day), Some(day))),
        state.db.workouts.count_since(user_id, week_start),
        state.db.profiles.fetch_for_user(user_id),
    )?;

    let summary = summarize(&DashboardInputs {
        lines,
        water_ml: water.iter().map(|w| w.amount_ml).collect(),
        workouts_this_week,
        profile,
    });
    Ok(Json(summary))
}
