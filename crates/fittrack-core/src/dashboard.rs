//! Dashboard aggregation.
//!
//! The repositories load the raw rows for a day; [`summarize`] folds them
//! into a [`DashboardSummary`] in-process.

use crate::models::{DashboardSummary, UserProfile};

/// A single meal line reduced to what the dashboard needs.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NutritionLine {
    pub calories: i32,
    pub protein_g: f64,
    pub carbs_g: f64,
    pub fats_g: f64,
    pub servings: f64,
}

/// Raw inputs for one user's dashboard.
#[derive(Debug, Clone, Default)]
pub struct DashboardInputs {
    /// Every food line of every meal logged on the day.
    pub lines: Vec<NutritionLine>,
    /// Water entries for the day, in millilitres.
    pub water_ml: Vec<i32>,
    /// Workouts dated on or after the start of the week window.
    pub workouts_this_week: i64,
    pub profile: Option<UserProfile>,
}

/// Round to one decimal place.
pub fn round_one_decimal(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

pub fn summarize(inputs: &DashboardInputs) -> DashboardSummary {
    let mut calories = 0.0;
    let mut protein = 0.0;
    let mut carbs = 0.0;
    let mut fats = 0.0;

    for line in &inputs.lines {
        calories += f64::from(line.calories) * line.servings;
        protein += line.protein_g * line.servings;
        carbs += line.carbs_g * line.servings;
        fats += line.fats_g * line.servings;
    }

    let water: i64 = inputs.water_ml.iter().map(|ml| i64::from(*ml)).sum();
    let profile = inputs.profile.as_ref();

    DashboardSummary {
        // truncation, not rounding
        total_calories_today: calories as i64,
        total_protein_today: round_one_decimal(protein),
        total_carbs_today: round_one_decimal(carbs),
        total_fats_today: round_one_decimal(fats),
        total_water_today: water,
        workouts_this_week: inputs.workouts_this_week,
        current_weight: profile.and_then(|p| p.current_weight_kg),
        goal_weight: profile.and_then(|p| p.goal_weight_kg),
        calories_target: profile.and_then(|p| p.daily_calorie_target),
    }
}
