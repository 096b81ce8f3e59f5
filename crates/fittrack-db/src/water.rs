//! Water intake repository.

use async_trait::async_trait;
use chrono::Utc;
use sqlx::{Pool, Postgres, Row};
use uuid::Uuid;

use fittrack_core::{
    new_v7, CreateWaterRequest, DateRange, Error, Result, WaterIntake, WaterRepository,
};

/// PostgreSQL implementation of WaterRepository.
#[derive(Clone)]
pub struct PgWaterRepository {
    pool: Pool<Postgres>,
}

impl PgWaterRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl WaterRepository for PgWaterRepository {
    async fn insert(&self, user_id: Uuid, req: &CreateWaterRequest) -> Result<WaterIntake> {
        let entry = WaterIntake {
            id: new_v7(),
            user_id,
            date: req.date,
            amount_ml: req.amount_ml,
            created_at: Utc::now(),
        };

        sqlx::query(
            r#"
            INSERT INTO water_intake (id, user_id, date, amount_ml, created_at)
            VALUES ($1, $2, $3, $4, $5)
            "#,
        )
        .bind(entry.id)
        .bind(entry.user_id)
        .bind(entry.date)
        .bind(entry.amount_ml)
        .bind(entry.created_at)
        .execute(&self.pool)
        .await
        .map_err(Error::Database)?;

        Ok(entry)
    }

    async fn list(&self, user_id: Uuid, range: DateRange) -> Result<Vec<WaterIntake>> {
        let rows = sqlx::query(
            r#"
            SELECT id, user_id, date, amount_ml, created_at
            FROM water_intake
            WHERE user_id = $1
              AND ($2::date IS NULL OR date >= $2)
              AND ($3::date IS NULL OR date <= $3)
            ORDER BY date DESC, created_at DESC
            "#,
        )
        .bind(user_id)
        .bind(range.start_date)
        .bind(range.end_date)
        .fetch_all(&self.pool)
        .await
        .map_err(Error::Database)?;

        Ok(rows
            .into_iter()
            .map(|r| WaterIntake {
                id: r.get("id"),
                user_id: r.get("user_id"),
                date: r.get("date"),
                amount_ml: r.get("amount_ml"),
                created_at: r.get("created_at"),
            })
            .collect())
    }

    async fn delete(&self, user_id: Uuid, id: Uuid) -> Result<bool> {
        let result = sqlx::query("DELETE FROM water_intake WHERE id = $1 AND user_id = $2")
            .bind(id)
            .bind(user_id)
            .execute(&self.pool)
            .await
            .map_err(Error::Database)?;
        Ok(result.rows_affected() > 0)
    }
}
