//! Core data models for fittrack.
//!
//! These types are shared across all fittrack crates: the persisted
//! entities, the request bodies accepted by the API and the response shapes
//! it returns.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

use crate::defaults::DEFAULT_CALORIES_PER_MINUTE;
use crate::Error;

/// Declares a closed set of string values persisted as TEXT.
macro_rules! text_enum {
    (
        $(#[$meta:meta])*
        pub enum $name:ident {
            $( $(#[$vmeta:meta])* $variant:ident => $text:literal ),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, utoipa::ToSchema)]
        #[serde(rename_all = "snake_case")]
        pub enum $name {
            $( $(#[$vmeta])* $variant ),+
        }

        impl $name {
            /// All values, in declaration order.
            pub const ALL: &'static [$name] = &[$($name::$variant),+];

            /// Stored / serialized form.
            pub fn as_str(&self) -> &'static str {
                match self {
                    $($name::$variant => $text),+
                }
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl FromStr for $name {
            type Err = Error;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s {
                    $($text => Ok($name::$variant),)+
                    other => Err(Error::InvalidInput(format!(
                        "invalid {} '{}'",
                        stringify!($name),
                        other
                    ))),
                }
            }
        }
    };
}

text_enum! {
    /// Self-reported daily activity level.
    pub enum ActivityLevel {
        Sedentary => "sedentary",
        Light => "light",
        Moderate => "moderate",
        Active => "active",
        VeryActive => "very_active",
    }
}

impl Default for ActivityLevel {
    fn default() -> Self {
        ActivityLevel::Moderate
    }
}

text_enum! {
    /// Overall direction of a user's profile.
    pub enum GoalType {
        LoseWeight => "lose_weight",
        GainWeight => "gain_weight",
        Maintain => "maintain",
        BuildMuscle => "build_muscle",
    }
}

impl Default for GoalType {
    fn default() -> Self {
        GoalType::Maintain
    }
}

text_enum! {
    /// Exercise library category.
    pub enum ExerciseCategory {
        Strength => "strength",
        Cardio => "cardio",
        Flexibility => "flexibility",
        Sports => "sports",
    }
}

text_enum! {
    /// Meal slot within a day.
    pub enum MealType {
        Breakfast => "breakfast",
        Lunch => "lunch",
        Dinner => "dinner",
        Snack => "snack",
    }
}

text_enum! {
    /// Lifecycle of a tracked goal.
    pub enum GoalStatus {
        Active => "active",
        Completed => "completed",
        Abandoned => "abandoned",
    }
}

impl Default for GoalStatus {
    fn default() -> Self {
        GoalStatus::Active
    }
}

/// Distinguishes an absent field from an explicit `null` in partial updates.
///
/// Absent → `None`, `null` → `Some(None)`, value → `Some(Some(v))`.
fn double_option<'de, T, D>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    T: Deserialize<'de>,
    D: Deserializer<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

// =============================================================================
// ACCOUNT TYPES
// =============================================================================

/// A registered account. The password hash is never part of this type.
#[derive(Debug, Clone, Serialize, Deserialize, utoipa::ToSchema)]
pub struct User {
    pub id: Uuid,
    pub username: String,
    pub email: String,
    pub is_verified: bool,
    pub created_at: DateTime<Utc>,
}

/// A user together with the stored password hash, used only for login.
#[derive(Debug, Clone)]
pub struct UserCredentials {
    pub user: User,
    pub password_hash: String,
}

/// Registration body for `POST /register`.
#[derive(Debug, Clone, Deserialize, utoipa::ToSchema)]
pub struct CreateUserRequest {
    pub username: String,
    pub email: String,
    pub password: String,
}

/// Form body for `POST /token`.
#[derive(Debug, Clone, Deserialize)]
pub struct LoginForm {
    pub username: String,
    pub password: String,
    /// Accepted for OAuth2 password-flow compatibility; ignored.
    #[serde(default)]
    pub grant_type: Option<String>,
}

/// Bearer token handed out at login.
#[derive(Debug, Clone, Serialize, Deserialize, utoipa::ToSchema)]
pub struct TokenResponse {
    pub access_token: String,
    pub token_type: String,
    pub expires_at: DateTime<Utc>,
}

/// Password reset body for `POST /reset-password`.
#[derive(Debug, Clone, Deserialize, utoipa::ToSchema)]
pub struct ResetPasswordRequest {
    pub token: String,
    pub new_password: String,
}

/// Generic `{message}` reply used by the account endpoints.
#[derive(Debug, Clone, Serialize, Deserialize, utoipa::ToSchema)]
pub struct MessageResponse {
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub verified: Option<bool>,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            verified: None,
        }
    }

    pub fn verified(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            verified: Some(true),
        }
    }
}

// =============================================================================
// PROFILE TYPES
// =============================================================================

/// Per-user profile (at most one per user).
#[derive(Debug, Clone, Serialize, Deserialize, utoipa::ToSchema)]
pub struct UserProfile {
    pub id: Uuid,
    pub user_id: Uuid,
    pub date_of_birth: Option<NaiveDate>,
    pub height_cm: Option<f64>,
    pub current_weight_kg: Option<f64>,
    pub goal_weight_kg: Option<f64>,
    pub activity_level: ActivityLevel,
    pub goal_type: GoalType,
    pub daily_calorie_target: Option<i32>,
}

/// Body for `POST /profile`.
#[derive(Debug, Clone, Default, Deserialize, utoipa::ToSchema)]
pub struct CreateProfileRequest {
    #[serde(default)]
    pub date_of_birth: Option<NaiveDate>,
    #[serde(default)]
    pub height_cm: Option<f64>,
    #[serde(default)]
    pub current_weight_kg: Option<f64>,
    #[serde(default)]
    pub goal_weight_kg: Option<f64>,
    #[serde(default)]
    pub activity_level: ActivityLevel,
    #[serde(default)]
    pub goal_type: GoalType,
    #[serde(default)]
    pub daily_calorie_target: Option<i32>,
}

/// Body for `PUT /profile`. Only fields present in the body are changed;
/// nullable fields may be cleared with an explicit `null`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateProfileRequest {
    #[serde(default, deserialize_with = "double_option")]
    pub date_of_birth: Option<Option<NaiveDate>>,
    #[serde(default, deserialize_with = "double_option")]
    pub height_cm: Option<Option<f64>>,
    #[serde(default, deserialize_with = "double_option")]
    pub current_weight_kg: Option<Option<f64>>,
    #[serde(default, deserialize_with = "double_option")]
    pub goal_weight_kg: Option<Option<f64>>,
    #[serde(default)]
    pub activity_level: Option<ActivityLevel>,
    #[serde(default)]
    pub goal_type: Option<GoalType>,
    #[serde(default, deserialize_with = "double_option")]
    pub daily_calorie_target: Option<Option<i32>>,
}

impl UpdateProfileRequest {
    /// Apply the present fields onto an existing profile.
    pub fn apply_to(&self, profile: &mut UserProfile) {
        if let Some(v) = self.date_of_birth {
            profile.date_of_birth = v;
        }
        if let Some(v) = self.height_cm {
            profile.height_cm = v;
        }
        if let Some(v) = self.current_weight_kg {
            profile.current_weight_kg = v;
        }
        if let Some(v) = self.goal_weight_kg {
            profile.goal_weight_kg = v;
        }
        if let Some(v) = self.activity_level {
            profile.activity_level = v;
        }
        if let Some(v) = self.goal_type {
            profile.goal_type = v;
        }
        if let Some(v) = self.daily_calorie_target {
            profile.daily_calorie_target = v;
        }
    }
}

// =============================================================================
// BODY METRIC TYPES
// =============================================================================

/// A dated weight / body-fat measurement.
#[derive(Debug, Clone, Serialize, Deserialize, utoipa::ToSchema)]
pub struct BodyMetric {
    pub id: Uuid,
    pub user_id: Uuid,
    pub date: NaiveDate,
    pub weight_kg: f64,
    pub body_fat_percentage: Option<f64>,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Body for `POST /body-metrics`.
#[derive(Debug, Clone, Deserialize, utoipa::ToSchema)]
pub struct CreateBodyMetricRequest {
    pub date: NaiveDate,
    pub weight_kg: f64,
    #[serde(default)]
    pub body_fat_percentage: Option<f64>,
    #[serde(default)]
    pub notes: Option<String>,
}

/// Inclusive calendar range used by every history listing.
#[derive(Debug, Clone, Copy, Default, Deserialize)]
pub struct DateRange {
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
}

impl DateRange {
    pub fn new(start_date: Option<NaiveDate>, end_date: Option<NaiveDate>) -> Self {
        Self {
            start_date,
            end_date,
        }
    }
}

// =============================================================================
// FOOD CATALOGUE TYPES
// =============================================================================

/// A food in the reference database (seeded or user-created).
#[derive(Debug, Clone, Serialize, Deserialize, utoipa::ToSchema)]
pub struct FoodItem {
    pub id: Uuid,
    pub name: String,
    pub brand: Option<String>,
    pub serving_size: f64,
    pub serving_unit: String,
    pub calories: i32,
    pub protein_g: f64,
    pub carbs_g: f64,
    pub fats_g: f64,
    pub fiber_g: f64,
    pub is_custom: bool,
}

/// Body for `POST /foods`, also the shape of an AI-parsed food item.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, utoipa::ToSchema)]
pub struct CreateFoodRequest {
    pub name: String,
    #[serde(default)]
    pub brand: Option<String>,
    pub serving_size: f64,
    pub serving_unit: String,
    pub calories: i32,
    #[serde(default)]
    pub protein_g: f64,
    #[serde(default)]
    pub carbs_g: f64,
    #[serde(default)]
    pub fats_g: f64,
    #[serde(default)]
    pub fiber_g: f64,
    #[serde(default)]
    pub is_custom: bool,
}

/// Query for `GET /foods`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct FoodSearch {
    pub search: Option<String>,
    pub limit: Option<i64>,
}

// =============================================================================
// EXERCISE LIBRARY TYPES
// =============================================================================

/// An exercise in the reference library.
#[derive(Debug, Clone, Serialize, Deserialize, utoipa::ToSchema)]
pub struct Exercise {
    pub id: Uuid,
    pub name: String,
    pub category: ExerciseCategory,
    pub muscle_group: Option<String>,
    pub description: Option<String>,
    pub calories_per_minute: f64,
    pub is_custom: bool,
}

fn default_calories_per_minute() -> f64 {
    DEFAULT_CALORIES_PER_MINUTE
}

/// Body for `POST /exercises`.
#[derive(Debug, Clone, Deserialize, utoipa::ToSchema)]
pub struct CreateExerciseRequest {
    pub name: String,
    pub category: ExerciseCategory,
    #[serde(default)]
    pub muscle_group: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default = "default_calories_per_minute")]
    pub calories_per_minute: f64,
    #[serde(default)]
    pub is_custom: bool,
}

/// Query for `GET /exercises`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ExerciseSearch {
    pub search: Option<String>,
    pub category: Option<String>,
    pub limit: Option<i64>,
}

// =============================================================================
// MEAL LOG TYPES
// =============================================================================

/// One food line of a logged meal, with the food expanded.
#[derive(Debug, Clone, Serialize, Deserialize, utoipa::ToSchema)]
pub struct MealFood {
    pub id: Uuid,
    pub food_id: Uuid,
    pub servings: f64,
    pub food: FoodItem,
}

/// A logged meal with its food lines.
#[derive(Debug, Clone, Serialize, Deserialize, utoipa::ToSchema)]
pub struct MealLog {
    pub id: Uuid,
    pub user_id: Uuid,
    pub date: NaiveDate,
    pub meal_type: MealType,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
    pub foods: Vec<MealFood>,
}

fn default_servings() -> f64 {
    1.0
}

/// A food line in a meal creation request.
#[derive(Debug, Clone, Deserialize, utoipa::ToSchema)]
pub struct MealFoodInput {
    pub food_id: Uuid,
    #[serde(default = "default_servings")]
    pub servings: f64,
}

/// Body for `POST /meals`.
#[derive(Debug, Clone, Deserialize, utoipa::ToSchema)]
pub struct CreateMealRequest {
    pub date: NaiveDate,
    pub meal_type: MealType,
    #[serde(default)]
    pub notes: Option<String>,
    #[serde(default)]
    pub foods: Vec<MealFoodInput>,
}

/// Query for `GET /meals`.
#[derive(Debug, Clone, Copy, Default, Deserialize)]
pub struct MealFilter {
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    pub meal_type: Option<MealType>,
}

// =============================================================================
// WORKOUT TYPES
// =============================================================================

/// One set of a workout exercise.
#[derive(Debug, Clone, Serialize, Deserialize, utoipa::ToSchema)]
pub struct ExerciseSet {
    pub id: Uuid,
    pub set_number: i32,
    pub reps: Option<i32>,
    pub weight_kg: Option<f64>,
    pub duration_seconds: Option<i32>,
}

/// An exercise performed within a session, with the library entry expanded.
#[derive(Debug, Clone, Serialize, Deserialize, utoipa::ToSchema)]
pub struct WorkoutExercise {
    pub id: Uuid,
    pub exercise_id: Uuid,
    pub order: i32,
    pub notes: Option<String>,
    pub exercise: Exercise,
    pub sets: Vec<ExerciseSet>,
}

/// A logged workout session.
#[derive(Debug, Clone, Serialize, Deserialize, utoipa::ToSchema)]
pub struct WorkoutSession {
    pub id: Uuid,
    pub user_id: Uuid,
    pub name: String,
    pub date: NaiveDate,
    pub duration_minutes: Option<i32>,
    pub total_calories_burned: i32,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
    pub exercises: Vec<WorkoutExercise>,
}

/// A set in a workout creation request.
#[derive(Debug, Clone, Deserialize, utoipa::ToSchema)]
pub struct ExerciseSetInput {
    pub set_number: i32,
    #[serde(default)]
    pub reps: Option<i32>,
    #[serde(default)]
    pub weight_kg: Option<f64>,
    #[serde(default)]
    pub duration_seconds: Option<i32>,
}

/// An exercise in a workout creation request.
#[derive(Debug, Clone, Deserialize, utoipa::ToSchema)]
pub struct WorkoutExerciseInput {
    pub exercise_id: Uuid,
    #[serde(default)]
    pub order: i32,
    #[serde(default)]
    pub notes: Option<String>,
    #[serde(default)]
    pub sets: Vec<ExerciseSetInput>,
}

/// Body for `POST /workouts`.
#[derive(Debug, Clone, Deserialize, utoipa::ToSchema)]
pub struct CreateWorkoutRequest {
    pub name: String,
    pub date: NaiveDate,
    #[serde(default)]
    pub duration_minutes: Option<i32>,
    #[serde(default)]
    pub total_calories_burned: i32,
    #[serde(default)]
    pub notes: Option<String>,
    #[serde(default)]
    pub exercises: Vec<WorkoutExerciseInput>,
}

// =============================================================================
// WATER TYPES
// =============================================================================

/// A single water intake entry.
#[derive(Debug, Clone, Serialize, Deserialize, utoipa::ToSchema)]
pub struct WaterIntake {
    pub id: Uuid,
    pub user_id: Uuid,
    pub date: NaiveDate,
    pub amount_ml: i32,
    pub created_at: DateTime<Utc>,
}

/// Body for `POST /water`.
#[derive(Debug, Clone, Deserialize, utoipa::ToSchema)]
pub struct CreateWaterRequest {
    pub date: NaiveDate,
    pub amount_ml: i32,
}

// =============================================================================
// GOAL TYPES
// =============================================================================

/// A tracked goal. `goal_type` is free text ("weight_loss", "5k_time", ...).
#[derive(Debug, Clone, Serialize, Deserialize, utoipa::ToSchema)]
pub struct Goal {
    pub id: Uuid,
    pub user_id: Uuid,
    pub goal_type: String,
    pub target_value: f64,
    pub current_value: f64,
    pub start_date: NaiveDate,
    pub target_date: Option<NaiveDate>,
    pub status: GoalStatus,
    pub created_at: DateTime<Utc>,
}

/// Body for `POST /goals`.
#[derive(Debug, Clone, Deserialize, utoipa::ToSchema)]
pub struct CreateGoalRequest {
    pub goal_type: String,
    pub target_value: f64,
    #[serde(default)]
    pub current_value: f64,
    pub start_date: NaiveDate,
    #[serde(default)]
    pub target_date: Option<NaiveDate>,
}

/// Body for `PATCH /goals/{id}`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateGoalRequest {
    #[serde(default)]
    pub target_value: Option<f64>,
    #[serde(default)]
    pub current_value: Option<f64>,
    #[serde(default, deserialize_with = "double_option")]
    pub target_date: Option<Option<NaiveDate>>,
    #[serde(default)]
    pub status: Option<GoalStatus>,
}

impl UpdateGoalRequest {
    pub fn apply_to(&self, goal: &mut Goal) {
        if let Some(v) = self.target_value {
            goal.target_value = v;
        }
        if let Some(v) = self.current_value {
            goal.current_value = v;
        }
        if let Some(v) = self.target_date {
            goal.target_date = v;
        }
        if let Some(v) = self.status {
            goal.status = v;
        }
    }
}

fn default_active_only() -> bool {
    true
}

/// Query for `GET /goals`.
#[derive(Debug, Clone, Copy, Deserialize)]
pub struct GoalFilter {
    #[serde(default = "default_active_only")]
    pub active_only: bool,
}

impl Default for GoalFilter {
    fn default() -> Self {
        Self { active_only: true }
    }
}

// =============================================================================
// DASHBOARD TYPES
// =============================================================================

/// Today's totals and profile figures for the dashboard.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, utoipa::ToSchema)]
pub struct DashboardSummary {
    pub total_calories_today: i64,
    pub total_protein_today: f64,
    pub total_carbs_today: f64,
    pub total_fats_today: f64,
    pub total_water_today: i64,
    pub workouts_this_week: i64,
    pub current_weight: Option<f64>,
    pub goal_weight: Option<f64>,
    pub calories_target: Option<i32>,
}

// =============================================================================
// AI PARSING TYPES
// =============================================================================

/// Body for the AI parsing endpoints.
#[derive(Debug, Clone, Deserialize, utoipa::ToSchema)]
pub struct ParseTextRequest {
    pub text: String,
}

/// Reply of `POST /ai/parse-food`.
#[derive(Debug, Clone, Serialize, Deserialize, utoipa::ToSchema)]
pub struct ParseFoodResponse {
    pub food_items: Vec<CreateFoodRequest>,
}

/// Unknown category strings from the model are dropped rather than failing
/// the whole reply.
fn lenient_category<'de, D>(deserializer: D) -> Result<Option<ExerciseCategory>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<String>::deserialize(deserializer)?;
    Ok(raw.and_then(|s| s.trim().to_lowercase().parse().ok()))
}

/// An exercise extracted from free text by the model.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, utoipa::ToSchema)]
pub struct ParsedExercise {
    pub name: String,
    #[serde(default, deserialize_with = "lenient_category")]
    pub category: Option<ExerciseCategory>,
    #[serde(default)]
    pub muscle_group: Option<String>,
    #[serde(default)]
    pub sets: Option<i32>,
    #[serde(default)]
    pub reps: Option<i32>,
    #[serde(default)]
    pub duration_minutes: Option<i32>,
    #[serde(default)]
    pub weight_kg: Option<f64>,
}

/// Reply of `POST /ai/parse-workout`.
#[derive(Debug, Clone, Serialize, Deserialize, utoipa::ToSchema)]
pub struct ParseWorkoutResponse {
    pub exercises: Vec<ParsedExercise>,
}

/// Query for `GET /ai/meal-suggestions`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct MealSuggestionQuery {
    pub preferences: Option<String>,
    pub dietary_restrictions: Option<String>,
}

/// Reply of `GET /ai/meal-suggestions`.
#[derive(Debug, Clone, Serialize, Deserialize, utoipa::ToSchema)]
pub struct MealSuggestionsResponse {
    pub suggestions: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_enum_text_roundtrip() {
        for level in ActivityLevel::ALL {
            assert_eq!(level.as_str().parse::<ActivityLevel>().unwrap(), *level);
        }
        for meal in MealType::ALL {
            assert_eq!(meal.to_string().parse::<MealType>().unwrap(), *meal);
        }
    }

    #[test]
    fn test_enum_serde_snake_case() {
        assert_eq!(
            serde_json::to_value(ActivityLevel::VeryActive).unwrap(),
            json!("very_active")
        );
        assert_eq!(
            serde_json::from_value::<GoalType>(json!("build_muscle")).unwrap(),
            GoalType::BuildMuscle
        );
    }

    #[test]
    fn test_enum_from_str_rejects_unknown() {
        let err = "yoga".parse::<ExerciseCategory>().unwrap_err();
        assert!(err.to_string().contains("yoga"));
    }

    #[test]
    fn test_profile_defaults() {
        let req: CreateProfileRequest = serde_json::from_value(json!({})).unwrap();
        assert_eq!(req.activity_level, ActivityLevel::Moderate);
        assert_eq!(req.goal_type, GoalType::Maintain);
        assert!(req.height_cm.is_none());
    }

    #[test]
    fn test_update_profile_distinguishes_null_from_absent() {
        let req: UpdateProfileRequest =
            serde_json::from_value(json!({"height_cm": null, "goal_weight_kg": 70.0})).unwrap();
        assert_eq!(req.height_cm, Some(None));
        assert_eq!(req.goal_weight_kg, Some(Some(70.0)));
        assert_eq!(req.current_weight_kg, None);

        let mut profile = UserProfile {
            id: Uuid::nil(),
            user_id: Uuid::nil(),
            date_of_birth: None,
            height_cm: Some(180.0),
            current_weight_kg: Some(82.0),
            goal_weight_kg: None,
            activity_level: ActivityLevel::Light,
            goal_type: GoalType::LoseWeight,
            daily_calorie_target: Some(2200),
        };
        req.apply_to(&mut profile);
        assert_eq!(profile.height_cm, None);
        assert_eq!(profile.current_weight_kg, Some(82.0));
        assert_eq!(profile.goal_weight_kg, Some(70.0));
        assert_eq!(profile.activity_level, ActivityLevel::Light);
    }

    #[test]
    fn test_meal_request_defaults() {
        let req: CreateMealRequest = serde_json::from_value(json!({
            "date": "2025-12-14",
            "meal_type": "breakfast",
            "notes": "Healthy breakfast"
        }))
        .unwrap();
        assert_eq!(req.meal_type, MealType::Breakfast);
        assert_eq!(req.date.to_string(), "2025-12-14");
        assert!(req.foods.is_empty());

        let item: MealFoodInput =
            serde_json::from_value(json!({"food_id": Uuid::nil()})).unwrap();
        assert_eq!(item.servings, 1.0);
    }

    #[test]
    fn test_workout_request_defaults() {
        let req: CreateWorkoutRequest = serde_json::from_value(json!({
            "name": "Morning Run",
            "date": "2025-12-14",
            "duration_minutes": 30,
            "total_calories_burned": 300
        }))
        .unwrap();
        assert_eq!(req.name, "Morning Run");
        assert_eq!(req.duration_minutes, Some(30));
        assert_eq!(req.total_calories_burned, 300);
        assert!(req.exercises.is_empty());
    }

    #[test]
    fn test_exercise_request_default_burn_rate() {
        let req: CreateExerciseRequest =
            serde_json::from_value(json!({"name": "Plank", "category": "strength"})).unwrap();
        assert_eq!(req.calories_per_minute, DEFAULT_CALORIES_PER_MINUTE);
    }

    #[test]
    fn test_food_request_macro_defaults() {
        let req: CreateFoodRequest = serde_json::from_value(json!({
            "name": "Banana",
            "serving_size": 1,
            "serving_unit": "medium",
            "calories": 105
        }))
        .unwrap();
        assert_eq!(req.protein_g, 0.0);
        assert_eq!(req.fiber_g, 0.0);
        assert!(req.brand.is_none());
        assert!(!req.is_custom);
    }

    #[test]
    fn test_parsed_exercise_drops_unknown_category() {
        let parsed: ParsedExercise = serde_json::from_value(json!({
            "name": "Kettlebell swings",
            "category": "hiit",
            "sets": 3
        }))
        .unwrap();
        assert_eq!(parsed.category, None);
        assert_eq!(parsed.sets, Some(3));

        let parsed: ParsedExercise =
            serde_json::from_value(json!({"name": "Run", "category": "Cardio"})).unwrap();
        assert_eq!(parsed.category, Some(ExerciseCategory::Cardio));
    }

    #[test]
    fn test_goal_filter_defaults_to_active_only() {
        let filter: GoalFilter = serde_json::from_value(json!({})).unwrap();
        assert!(filter.active_only);
    }

    #[test]
    fn test_update_goal_apply() {
        let mut goal = Goal {
            id: Uuid::nil(),
            user_id: Uuid::nil(),
            goal_type: "weight_loss".to_string(),
            target_value: 65.0,
            current_value: 70.0,
            start_date: NaiveDate::from_ymd_opt(2025, 12, 14).unwrap(),
            target_date: NaiveDate::from_ymd_opt(2026, 2, 14),
            status: GoalStatus::Active,
            created_at: Utc::now(),
        };
        let req: UpdateGoalRequest = serde_json::from_value(json!({
            "current_value": 66.5,
            "target_date": null,
            "status": "completed"
        }))
        .unwrap();
        req.apply_to(&mut goal);
        assert_eq!(goal.current_value, 66.5);
        assert_eq!(goal.target_date, None);
        assert_eq!(goal.status, GoalStatus::Completed);
        assert_eq!(goal.target_value, 65.0);
    }

    #[test]
    fn test_user_serialization_has_no_password() {
        let user = User {
            id: Uuid::nil(),
            username: "testuser".to_string(),
            email: "test@example.com".to_string(),
            is_verified: false,
            created_at: Utc::now(),
        };
        let value = serde_json::to_value(&user).unwrap();
        assert!(value.get("password").is_none());
        assert!(value.get("password_hash").is_none());
        assert_eq!(value["is_verified"], json!(false));
    }
}
