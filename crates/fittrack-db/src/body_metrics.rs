//! Body metric repository.

use async_trait::async_trait;
use chrono::Utc;
use sqlx::postgres::PgRow;
use sqlx::{Pool, Postgres, Row};
use uuid::Uuid;

use fittrack_core::{
    new_v7, BodyMetric, BodyMetricRepository, CreateBodyMetricRequest, DateRange, Error, Result,
};

/// PostgreSQL implementation of BodyMetricRepository.
#[derive(Clone)]
pub struct PgBodyMetricRepository {
    pool: Pool<Postgres>,
}

impl PgBodyMetricRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }
}

fn metric_from_row(r: &PgRow) -> BodyMetric {
    BodyMetric {
        id: r.get("id"),
        user_id: r.get("user_id"),
        date: r.get("date"),
        weight_kg: r.get("weight_kg"),
        body_fat_percentage: r.get("body_fat_percentage"),
        notes: r.get("notes"),
        created_at: r.get("created_at"),
    }
}

#[async_trait]
impl BodyMetricRepository for PgBodyMetricRepository {
    async fn insert(&self, user_id: Uuid, req: &CreateBodyMetricRequest) -> Result<BodyMetric> {
        let metric = BodyMetric {
            id: new_v7(),
            user_id,
            date: req.date,
            weight_kg: req.weight_kg,
            body_fat_percentage: req.body_fat_percentage,
            notes: req.notes.clone(),
            created_at: Utc::now(),
        };

        sqlx::query(
            r#"
            INSERT INTO body_metric (id, user_id, date, weight_kg, body_fat_percentage, notes, created_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            "#,
        )
        .bind(metric.id)
        .bind(metric.user_id)
        .bind(metric.date)
        .bind(metric.weight_kg)
        .bind(metric.body_fat_percentage)
        .bind(&metric.notes)
        .bind(metric.created_at)
        .execute(&self.pool)
        .await
        .map_err(Error::Database)?;

        Ok(metric)
    }

    async fn list(&self, user_id: Uuid, range: DateRange) -> Result<Vec<BodyMetric>> {
        let rows = sqlx::query(
            r#"
            SELECT id, user_id, date, weight_kg, body_fat_percentage, notes, created_at
            FROM body_metric
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

        Ok(rows.iter().map(metric_from_row).collect())
    }

    async fn delete(&self, user_id: Uuid, id: Uuid) -> Result<bool> {
        let result = sqlx::query("DELETE FROM body_metric WHERE id = $1 AND user_id = $2")
            .bind(id)
            .bind(user_id)
            .execute(&self.pool)
            .await
            .map_err(Error::Database)?;
        Ok(result.rows_affected() > 0)
    }
}
