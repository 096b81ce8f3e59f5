//! Core traits for fittrack abstractions.
//!
//! The API layer talks to storage and to the language model only through
//! these traits, so handlers can be exercised against in-memory or mock
//! implementations.

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use uuid::Uuid;

use crate::dashboard::NutritionLine;
use crate::error::Result;
use crate::models::*;

// =============================================================================
// ACCOUNT TRAITS
// =============================================================================

/// Repository for user accounts.
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Insert a new user with an already hashed password.
    async fn insert(&self, username: &str, email: &str, password_hash: &str) -> Result<User>;

    async fn fetch(&self, id: Uuid) -> Result<Option<User>>;

    async fn find_by_username(&self, username: &str) -> Result<Option<User>>;

    async fn find_by_email(&self, email: &str) -> Result<Option<User>>;

    /// Fetch a user together with the password hash, for login.
    async fn fetch_credentials(&self, username: &str) -> Result<Option<UserCredentials>>;

    async fn mark_verified(&self, id: Uuid) -> Result<()>;

    async fn update_password(&self, id: Uuid, password_hash: &str) -> Result<()>;
}

/// Repository for issued bearer tokens. Only hashes are stored.
#[async_trait]
pub trait AccessTokenRepository: Send + Sync {
    async fn insert(&self, user_id: Uuid, token_hash: &str, expires_at: DateTime<Utc>)
        -> Result<()>;

    /// Resolve a token hash to its user, ignoring expired and revoked tokens.
    async fn resolve_user(&self, token_hash: &str) -> Result<Option<User>>;

    /// Revoke one token. Returns whether a live token was revoked.
    async fn revoke(&self, token_hash: &str) -> Result<bool>;

    /// Revoke every live token of a user. Returns the number revoked.
    async fn revoke_all_for_user(&self, user_id: Uuid) -> Result<u64>;

    /// Delete expired and revoked tokens.
    async fn purge_expired(&self) -> Result<u64>;
}

// =============================================================================
// PROFILE & METRIC TRAITS
// =============================================================================

#[async_trait]
pub trait ProfileRepository: Send + Sync {
    async fn insert(&self, user_id: Uuid, req: &CreateProfileRequest) -> Result<UserProfile>;

    async fn fetch_for_user(&self, user_id: Uuid) -> Result<Option<UserProfile>>;

    /// Persist every field of `profile`.
    async fn save(&self, profile: &UserProfile) -> Result<UserProfile>;
}

#[async_trait]
pub trait BodyMetricRepository: Send + Sync {
    async fn insert(&self, user_id: Uuid, req: &CreateBodyMetricRequest) -> Result<BodyMetric>;

    /// Newest date first.
    async fn list(&self, user_id: Uuid, range: DateRange) -> Result<Vec<BodyMetric>>;

    /// Returns false when no row owned by the user matched.
    async fn delete(&self, user_id: Uuid, id: Uuid) -> Result<bool>;
}

// =============================================================================
// REFERENCE CATALOGUE TRAITS
// =============================================================================

#[async_trait]
pub trait FoodRepository: Send + Sync {
    async fn insert(&self, req: &CreateFoodRequest) -> Result<FoodItem>;

    async fn search(&self, query: &FoodSearch) -> Result<Vec<FoodItem>>;

    async fn fetch(&self, id: Uuid) -> Result<Option<FoodItem>>;
}

#[async_trait]
pub trait ExerciseRepository: Send + Sync {
    async fn insert(&self, req: &CreateExerciseRequest) -> Result<Exercise>;

    async fn search(
        &self,
        search: Option<&str>,
        category: Option<ExerciseCategory>,
        limit: i64,
    ) -> Result<Vec<Exercise>>;

    async fn fetch(&self, id: Uuid) -> Result<Option<Exercise>>;
}

// =============================================================================
// LOGGING TRAITS
// =============================================================================

#[async_trait]
pub trait MealRepository: Send + Sync {
    /// Insert the meal and its food lines atomically.
    async fn create(&self, user_id: Uuid, req: &CreateMealRequest) -> Result<MealLog>;

    async fn list(&self, user_id: Uuid, filter: MealFilter) -> Result<Vec<MealLog>>;

    async fn fetch(&self, user_id: Uuid, id: Uuid) -> Result<Option<MealLog>>;

    async fn delete(&self, user_id: Uuid, id: Uuid) -> Result<bool>;

    /// Every food line of the user's meals on `date`.
    async fn nutrition_lines(&self, user_id: Uuid, date: NaiveDate)
        -> Result<Vec<NutritionLine>>;
}

#[async_trait]
pub trait WorkoutRepository: Send + Sync {
    /// Insert the session, its exercises and their sets atomically.
    async fn create(&self, user_id: Uuid, req: &CreateWorkoutRequest) -> Result<WorkoutSession>;

    async fn list(&self, user_id: Uuid, range: DateRange) -> Result<Vec<WorkoutSession>>;

    async fn fetch(&self, user_id: Uuid, id: Uuid) -> Result<Option<WorkoutSession>>;

    async fn delete(&self, user_id: Uuid, id: Uuid) -> Result<bool>;

    /// Count sessions dated on or after `since`.
    async fn count_since(&self, user_id: Uuid, since: NaiveDate) -> Result<i64>;
}

#[async_trait]
pub trait WaterRepository: Send + Sync {
    async fn insert(&self, user_id: Uuid, req: &CreateWaterRequest) -> Result<WaterIntake>;

    async fn list(&self, user_id: Uuid, range: DateRange) -> Result<Vec<WaterIntake>>;

    async fn delete(&self, user_id: Uuid, id: Uuid) -> Result<bool>;
}

#[async_trait]
pub trait GoalRepository: Send + Sync {
    async fn insert(&self, user_id: Uuid, req: &CreateGoalRequest) -> Result<Goal>;

    async fn list(&self, user_id: Uuid, filter: GoalFilter) -> Result<Vec<Goal>>;

    async fn fetch(&self, user_id: Uuid, id: Uuid) -> Result<Option<Goal>>;

    async fn save(&self, goal: &Goal) -> Result<Goal>;

    async fn delete(&self, user_id: Uuid, id: Uuid) -> Result<bool>;
}

// =============================================================================
// INFERENCE TRAITS
// =============================================================================

/// Sampling options for a single generation call.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct GenerationOptions {
    /// Sampling temperature. `None` leaves the provider default.
    pub temperature: Option<f32>,
}

impl GenerationOptions {
    pub fn with_temperature(temperature: f32) -> Self {
        Self {
            temperature: Some(temperature),
        }
    }
}

/// Backend for chat-completion style text generation.
#[async_trait]
pub trait GenerationBackend: Send + Sync {
    /// Generate a reply to `prompt` with `system` as the system message.
    async fn generate_with_system(
        &self,
        system: &str,
        prompt: &str,
        options: GenerationOptions,
    ) -> Result<String>;

    /// Get the model name being used.
    fn model_name(&self) -> &str;
}
