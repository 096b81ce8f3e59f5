//! Exercise reference library.

use async_trait::async_trait;
use sqlx::postgres::PgRow;
use sqlx::{Pool, Postgres, Row};
use uuid::Uuid;

use fittrack_core::{
    new_v7, CreateExerciseRequest, Error, Exercise, ExerciseCategory, ExerciseRepository, Result,
};

use crate::{escape_like, get_text_enum};

pub(crate) const EXERCISE_COLUMNS: &str =
    "id, name, category, muscle_group, description, calories_per_minute, is_custom";

/// PostgreSQL implementation of ExerciseRepository.
#[derive(Clone)]
pub struct PgExerciseRepository {
    pool: Pool<Postgres>,
}

impl PgExerciseRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }
}

/// Map an exercise row whose columns carry `prefix`.
pub(crate) fn exercise_from_row(r: &PgRow, prefix: &str) -> Result<Exercise> {
    let col = |name: &str| format!("{prefix}{name}");
    Ok(Exercise {
        id: r.get(col("id").as_str()),
        name: r.get(col("name").as_str()),
        category: get_text_enum(r, &col("category"))?,
        muscle_group: r.get(col("muscle_group").as_str()),
        description: r.get(col("description").as_str()),
        calories_per_minute: r.get(col("calories_per_minute").as_str()),
        is_custom: r.get(col("is_custom").as_str()),
    })
}

#[async_trait]
impl ExerciseRepository for PgExerciseRepository {
    async fn insert(&self, req: &CreateExerciseRequest) -> Result<Exercise> {
        let sql = format!(
            r#"
            INSERT INTO exercise_library ({EXERCISE_COLUMNS})
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING {EXERCISE_COLUMNS}
            "#
        );
        let row = sqlx::query(&sql)
            .bind(new_v7())
            .bind(&req.name)
            .bind(req.category.as_str())
            .bind(&req.muscle_group)
            .bind(&req.description)
            .bind(req.calories_per_minute)
            .bind(req.is_custom)
            .fetch_one(&self.pool)
            .await
            .map_err(Error::Database)?;

        exercise_from_row(&row, "")
    }

    async fn search(
        &self,
        search: Option<&str>,
        category: Option<ExerciseCategory>,
        limit: i64,
    ) -> Result<Vec<Exercise>> {
        let pattern = search
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(|s| format!("%{}%", escape_like(s)));

        let sql = format!(
            r#"
            SELECT {EXERCISE_COLUMNS}
            FROM exercise_library
            WHERE ($1::text IS NULL OR name ILIKE $1 ESCAPE '\')
              AND ($2::text IS NULL OR category = $2)
            ORDER BY name, id
            LIMIT $3
            "#
        );
        let rows = sqlx::query(&sql)
            .bind(pattern)
            .bind(category.map(|c| c.as_str()))
            .bind(limit)
            .fetch_all(&self.pool)
            .await
            .map_err(Error::Database)?;

        rows.iter().map(|r| exercise_from_row(r, "")).collect()
    }

    async fn fetch(&self, id: Uuid) -> Result<Option<Exercise>> {
        let sql = format!("SELECT {EXERCISE_COLUMNS} FROM exercise_library WHERE id = $1");
        let row = sqlx::query(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(Error::Database)?;
        row.map(|r| exercise_from_row(&r, "")).transpose()
    }
}
