//! # fittrack-db
//!
//! PostgreSQL database layer for fittrack.
//!
//! This crate provides:
//! - Connection pool management
//! - Repository implementations for every fittrack entity
//! - Schema migrations (feature `migrations`)
//! - Reference catalogue seeding
//!
//! ## Example
//!
//! ```rust,ignore
//! use fittrack_db::{Database, FoodRepository, FoodSearch};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let db = Database::connect("postgres://localhost/fittrack").await?;
//!     db.migrate().await?;
//!
//!     let foods = db.foods.search(&FoodSearch {
//!         search: Some("rice".to_string()),
//!         limit: None,
//!     }).await?;
//!     println!("{} foods", foods.len());
//!     Ok(())
//! }
//! ```

pub mod access_tokens;
pub mod body_metrics;
pub mod exercises;
pub mod foods;
pub mod goals;
pub mod meals;
pub mod pool;
pub mod profiles;
pub mod seed;
pub mod users;
pub mod water;
pub mod workouts;

// Always compiled so integration tests (in tests/) can share the helpers.
pub mod test_fixtures;

// Re-export core types
pub use fittrack_core::*;

use std::str::FromStr;

use sqlx::postgres::PgRow;
use sqlx::Row;

pub use access_tokens::PgAccessTokenRepository;
pub use body_metrics::PgBodyMetricRepository;
pub use exercises::PgExerciseRepository;
pub use foods::PgFoodRepository;
pub use goals::PgGoalRepository;
pub use meals::PgMealRepository;
pub use pool::{
    create_lazy_pool, create_pool, create_pool_with_config, log_pool_metrics, PoolConfig,
};
pub use profiles::PgProfileRepository;
pub use seed::{seed_reference_data, SeedReport};
pub use users::PgUserRepository;
pub use water::PgWaterRepository;
pub use workouts::PgWorkoutRepository;

/// Escape LIKE/ILIKE wildcard characters (`%`, `_`, `\`) in user input.
pub fn escape_like(input: &str) -> String {
    input
        .replace('\\', "\\\\")
        .replace('%', "\\%")
        .replace('_', "\\_")
}

/// Read a TEXT column holding one of the closed enum values.
pub(crate) fn get_text_enum<T>(row: &PgRow, column: &str) -> Result<T>
where
    T: FromStr<Err = Error>,
{
    let raw: String = row.try_get(column).map_err(Error::Database)?;
    raw.parse()
}

/// Combined database context with all repositories.
#[derive(Clone)]
pub struct Database {
    /// The underlying connection pool.
    pub pool: sqlx::Pool<sqlx::Postgres>,
    pub users: PgUserRepository,
    /// Issued bearer tokens (hashes only).
    pub access_tokens: PgAccessTokenRepository,
    pub profiles: PgProfileRepository,
    pub body_metrics: PgBodyMetricRepository,
    /// Food reference catalogue.
    pub foods: PgFoodRepository,
    /// Exercise reference library.
    pub exercises: PgExerciseRepository,
    pub meals: PgMealRepository,
    pub workouts: PgWorkoutRepository,
    pub water: PgWaterRepository,
    pub goals: PgGoalRepository,
}

impl Database {
    /// Create a new Database instance from a connection pool.
    pub fn new(pool: sqlx::Pool<sqlx::Postgres>) -> Self {
        Self {
            users: PgUserRepository::new(pool.clone()),
            access_tokens: PgAccessTokenRepository::new(pool.clone()),
            profiles: PgProfileRepository::new(pool.clone()),
            body_metrics: PgBodyMetricRepository::new(pool.clone()),
            foods: PgFoodRepository::new(pool.clone()),
            exercises: PgExerciseRepository::new(pool.clone()),
            meals: PgMealRepository::new(pool.clone()),
            workouts: PgWorkoutRepository::new(pool.clone()),
            water: PgWaterRepository::new(pool.clone()),
            goals: PgGoalRepository::new(pool.clone()),
            pool,
        }
    }

    /// Create a new Database instance by connecting to the given URL.
    pub async fn connect(url: &str) -> Result<Self> {
        let pool = create_pool(url).await?;
        Ok(Self::new(pool))
    }

    /// Create with custom pool configuration.
    pub async fn connect_with_config(url: &str, config: PoolConfig) -> Result<Self> {
        let pool = create_pool_with_config(url, config).await?;
        Ok(Self::new(pool))
    }

    /// Run pending migrations.
    #[cfg(feature = "migrations")]
    pub async fn migrate(&self) -> Result<()> {
        sqlx::migrate!("../../migrations")
            .run(&self.pool)
            .await
            .map_err(|e| Error::Database(sqlx::Error::Migrate(Box::new(e))))?;
        Ok(())
    }

    /// Get the underlying connection pool.
    pub fn pool(&self) -> &sqlx::Pool<sqlx::Postgres> {
        &self.pool
    }

    /// Insert the built-in food and exercise catalogue.
    pub async fn seed_reference_data(&self) -> Result<SeedReport> {
        seed_reference_data(&self.pool).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_escape_like() {
        assert_eq!(escape_like("rice"), "rice");
        assert_eq!(escape_like("100%"), "100\\%");
        assert_eq!(escape_like("a_b"), "a\\_b");
        assert_eq!(escape_like("c:\\"), "c:\\\\");
    }
}
