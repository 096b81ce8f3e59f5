//! Goal repository.

use async_trait::async_trait;
use sqlx::postgres::PgRow;
use sqlx::{Pool, Postgres, Row};
use uuid::Uuid;

use fittrack_core::{
    new_v7, CreateGoalRequest, Error, Goal, GoalFilter, GoalRepository, GoalStatus, Result,
};

use crate::get_text_enum;

const GOAL_COLUMNS: &str = "id, user_id, goal_type, target_value, current_value, start_date, \
     target_date, status, created_at";

/// PostgreSQL implementation of GoalRepository.
#[derive(Clone)]
pub struct PgGoalRepository {
    pool: Pool<Postgres>,
}

impl PgGoalRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }
}

fn goal_from_row(r: &PgRow) -> Result<Goal> {
    Ok(Goal {
        id: r.get("id"),
        user_id: r.get("user_id"),
        goal_type: r.get("goal_type"),
        target_value: r.get("target_value"),
        current_value: r.get("current_value"),
        start_date: r.get("start_date"),
        target_date: r.get("target_date"),
        status: get_text_enum(r, "status")?,
        created_at: r.get("created_at"),
    })
}

#[async_trait]
impl GoalRepository for PgGoalRepository {
    async fn insert(&self, user_id: Uuid, req: &CreateGoalRequest) -> Result<Goal> {
        let sql = format!(
            r#"
            INSERT INTO goal ({GOAL_COLUMNS})
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, NOW())
            RETURNING {GOAL_COLUMNS}
            "#
        );
        let row = sqlx::query(&sql)
            .bind(new_v7())
            .bind(user_id)
            .bind(&req.goal_type)
            .bind(req.target_value)
            .bind(req.current_value)
            .bind(req.start_date)
            .bind(req.target_date)
            .bind(GoalStatus::Active.as_str())
            .fetch_one(&self.pool)
            .await
            .map_err(Error::Database)?;

        goal_from_row(&row)
    }

    async fn list(&self, user_id: Uuid, filter: GoalFilter) -> Result<Vec<Goal>> {
        let status = filter.active_only.then(|| GoalStatus::Active.as_str());
        let sql = format!(
            r#"
            SELECT {GOAL_COLUMNS}
            FROM goal
            WHERE user_id = $1
              AND ($2::text IS NULL OR status = $2)
            ORDER BY created_at DESC, id DESC
            "#
        );
        let rows = sqlx::query(&sql)
            .bind(user_id)
            .bind(status)
            .fetch_all(&self.pool)
            .await
            .map_err(Error::Database)?;

        rows.iter().map(goal_from_row).collect()
    }

    async fn fetch(&self, user_id: Uuid, id: Uuid) -> Result<Option<Goal>> {
        let sql = format!("SELECT {GOAL_COLUMNS} FROM goal WHERE id = $1 AND user_id = $2");
        let row = sqlx::query(&sql)
            .bind(id)
            .bind(user_id)
            .fetch_optional(&self.pool)
            .await
            .map_err(Error::Database)?;
        row.as_ref().map(goal_from_row).transpose()
    }

    async fn save(&self, goal: &Goal) -> Result<Goal> {
        let sql = format!(
            r#"
            UPDATE goal SET
                target_value = $3,
                current_value = $4,
                target_date = $5,
                status = $6
            WHERE id = $1 AND user_id = $2
            RETURNING {GOAL_COLUMNS}
            "#
        );
        let row = sqlx::query(&sql)
            .bind(goal.id)
            .bind(goal.user_id)
            .bind(goal.target_value)
            .bind(goal.current_value)
            .bind(goal.target_date)
            .bind(goal.status.as_str())
            .fetch_optional(&self.pool)
            .await
            .map_err(Error::Database)?
            .ok_or_else(|| Error::NotFound("Goal not found".to_string()))?;

        goal_from_row(&row)
    }

    async fn delete(&self, user_id: Uuid, id: Uuid) -> Result<bool> {
        let result = sqlx::query("DELETE FROM goal WHERE id = $1 AND user_id = $2")
            .bind(id)
            .bind(user_id)
            .execute(&self.pool)
            .await
            .map_err(Error::Database)?;
        Ok(result.rows_affected() > 0)
    }
}
