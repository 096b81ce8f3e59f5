//! Field-level validation for request bodies.
//!
//! Handlers call [`Validate::validate`] before touching the database. The
//! first failing rule is reported as [`Error::InvalidInput`].

use once_cell::sync::Lazy;
use regex::Regex;

use crate::defaults::AI_TEXT_MAX_LEN;
use crate::models::*;
use crate::{Error, Result};

static EMAIL_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[A-Za-z0-9.!#$%&'*+/=?^_`{|}~-]+@[A-Za-z0-9](?:[A-Za-z0-9-]{0,61}[A-Za-z0-9])?(?:\.[A-Za-z0-9](?:[A-Za-z0-9-]{0,61}[A-Za-z0-9])?)+$")
        .expect("email regex is valid")
});

/// A request body that can check its own field constraints.
pub trait Validate {
    fn validate(&self) -> Result<()>;
}

fn invalid(msg: impl Into<String>) -> Error {
    Error::InvalidInput(msg.into())
}

/// Check a string's length in characters lies in `min..=max`.
pub fn check_len(field: &str, value: &str, min: usize, max: usize) -> Result<()> {
    let len = value.chars().count();
    if len < min {
        if min == 1 {
            return Err(invalid(format!("{field} must not be empty")));
        }
        return Err(invalid(format!(
            "{field} must be at least {min} characters"
        )));
    }
    if len > max {
        return Err(invalid(format!("{field} must be at most {max} characters")));
    }
    Ok(())
}

fn check_opt_len(field: &str, value: Option<&str>, max: usize) -> Result<()> {
    match value {
        Some(v) if v.chars().count() > max => Err(invalid(format!(
            "{field} must be at most {max} characters"
        ))),
        _ => Ok(()),
    }
}

/// `0 < value <= max`
pub fn check_positive_max(field: &str, value: f64, max: f64) -> Result<()> {
    if !value.is_finite() || value <= 0.0 {
        return Err(invalid(format!("{field} must be greater than 0")));
    }
    if value > max {
        return Err(invalid(format!("{field} must be at most {max}")));
    }
    Ok(())
}

/// `value >= 0`
pub fn check_non_negative(field: &str, value: f64) -> Result<()> {
    if !value.is_finite() || value < 0.0 {
        return Err(invalid(format!("{field} must not be negative")));
    }
    Ok(())
}

pub fn is_valid_email(email: &str) -> bool {
    email.len() <= 254 && EMAIL_RE.is_match(email)
}

impl Validate for CreateUserRequest {
    fn validate(&self) -> Result<()> {
        check_len("username", &self.username, 3, 50)?;
        if !is_valid_email(&self.email) {
            return Err(invalid("email is not a valid email address"));
        }
        validate_password(&self.password)
    }
}

/// Minimum password policy shared by registration and password reset.
pub fn validate_password(password: &str) -> Result<()> {
    if password.chars().count() < 6 {
        return Err(invalid("password must be at least 6 characters"));
    }
    Ok(())
}

impl Validate for ResetPasswordRequest {
    fn validate(&self) -> Result<()> {
        if self.token.is_empty() {
            return Err(invalid("token must not be empty"));
        }
        validate_password(&self.new_password)
    }
}

fn check_profile_fields(
    height_cm: Option<f64>,
    current_weight_kg: Option<f64>,
    goal_weight_kg: Option<f64>,
    daily_calorie_target: Option<i32>,
) -> Result<()> {
    if let Some(h) = height_cm {
        check_positive_max("height_cm", h, 300.0)?;
    }
    if let Some(w) = current_weight_kg {
        check_positive_max("current_weight_kg", w, 500.0)?;
    }
    if let Some(w) = goal_weight_kg {
        check_positive_max("goal_weight_kg", w, 500.0)?;
    }
    if let Some(c) = daily_calorie_target {
        check_positive_max("daily_calorie_target", f64::from(c), 10_000.0)?;
    }
    Ok(())
}

impl Validate for CreateProfileRequest {
    fn validate(&self) -> Result<()> {
        check_profile_fields(
            self.height_cm,
            self.current_weight_kg,
            self.goal_weight_kg,
            self.daily_calorie_target,
        )
    }
}

impl Validate for UpdateProfileRequest {
    fn validate(&self) -> Result<()> {
        check_profile_fields(
            self.height_cm.flatten(),
            self.current_weight_kg.flatten(),
            self.goal_weight_kg.flatten(),
            self.daily_calorie_target.flatten(),
        )
    }
}

impl Validate for CreateBodyMetricRequest {
    fn validate(&self) -> Result<()> {
        check_positive_max("weight_kg", self.weight_kg, 500.0)?;
        if let Some(bf) = self.body_fat_percentage {
            check_non_negative("body_fat_percentage", bf)?;
            if bf > 100.0 {
                return Err(invalid("body_fat_percentage must be at most 100"));
            }
        }
        Ok(())
    }
}

impl Validate for CreateFoodRequest {
    fn validate(&self) -> Result<()> {
        check_len("name", &self.name, 1, 200)?;
        check_opt_len("brand", self.brand.as_deref(), 100)?;
        if !self.serving_size.is_finite() || self.serving_size <= 0.0 {
            return Err(invalid("serving_size must be greater than 0"));
        }
        check_len("serving_unit", &self.serving_unit, 1, 50)?;
        if self.calories < 0 {
            return Err(invalid("calories must not be negative"));
        }
        check_non_negative("protein_g", self.protein_g)?;
        check_non_negative("carbs_g", self.carbs_g)?;
        check_non_negative("fats_g", self.fats_g)?;
        check_non_negative("fiber_g", self.fiber_g)
    }
}

impl Validate for CreateExerciseRequest {
    fn validate(&self) -> Result<()> {
        check_len("name", &self.name, 1, 200)?;
        check_opt_len("muscle_group", self.muscle_group.as_deref(), 100)?;
        check_non_negative("calories_per_minute", self.calories_per_minute)
    }
}

impl Validate for CreateMealRequest {
    fn validate(&self) -> Result<()> {
        for item in &self.foods {
            if !item.servings.is_finite() || item.servings <= 0.0 {
                return Err(invalid("servings must be greater than 0"));
            }
        }
        Ok(())
    }
}

impl Validate for ExerciseSetInput {
    fn validate(&self) -> Result<()> {
        if self.set_number <= 0 {
            return Err(invalid("set_number must be greater than 0"));
        }
        if self.reps.is_some_and(|r| r < 0) {
            return Err(invalid("reps must not be negative"));
        }
        if let Some(w) = self.weight_kg {
            check_non_negative("weight_kg", w)?;
        }
        if self.duration_seconds.is_some_and(|d| d < 0) {
            return Err(invalid("duration_seconds must not be negative"));
        }
        Ok(())
    }
}

impl Validate for CreateWorkoutRequest {
    fn validate(&self) -> Result<()> {
        check_len("name", &self.name, 1, 200)?;
        if self.duration_minutes.is_some_and(|d| d < 0) {
            return Err(invalid("duration_minutes must not be negative"));
        }
        if self.total_calories_burned < 0 {
            return Err(invalid("total_calories_burned must not be negative"));
        }
        for exercise in &self.exercises {
            for set in &exercise.sets {
                set.validate()?;
            }
        }
        Ok(())
    }
}

impl Validate for CreateWaterRequest {
    fn validate(&self) -> Result<()> {
        check_positive_max("amount_ml", f64::from(self.amount_ml), 10_000.0)
    }
}

impl Validate for CreateGoalRequest {
    fn validate(&self) -> Result<()> {
        check_len("goal_type", &self.goal_type, 1, 100)?;
        if !self.target_value.is_finite() || !self.current_value.is_finite() {
            return Err(invalid("goal values must be finite numbers"));
        }
        if let Some(target) = self.target_date {
            if target < self.start_date {
                return Err(invalid("target_date must not be before start_date"));
            }
        }
        Ok(())
    }
}

impl Validate for UpdateGoalRequest {
    fn validate(&self) -> Result<()> {
        let finite = |v: Option<f64>| v.map_or(true, f64::is_finite);
        if !finite(self.target_value) || !finite(self.current_value) {
            return Err(invalid("goal values must be finite numbers"));
        }
        Ok(())
    }
}

impl Validate for ParseTextRequest {
    fn validate(&self) -> Result<()> {
        check_len("text", &self.text, 1, AI_TEXT_MAX_LEN)
    }
}
