//! Meal log repository.
//!
//! A meal and its food lines are written in one transaction. Listings load the
//! lines of every returned meal with a single joined query.

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::{NaiveDate, Utc};
use sqlx::postgres::PgRow;
use sqlx::{Pool, Postgres, Row, Transaction};
use tracing::debug;
use uuid::Uuid;

use fittrack_core::{
    new_v7, CreateMealRequest, Error, MealFilter, MealFood, MealLog, MealRepository, NutritionLine,
    Result,
};

use crate::foods::food_from_row;
use crate::get_text_enum;

/// PostgreSQL implementation of MealRepository.
#[derive(Clone)]
pub struct PgMealRepository {
    pool: Pool<Postgres>,
}

const MEAL_FOOD_SELECT: &str = r#"
    SELECT mf.id, mf.meal_log_id, mf.food_id, mf.servings,
           f.name AS food_name, f.brand AS food_brand,
           f.serving_size AS food_serving_size, f.serving_unit AS food_serving_unit,
           f.calories AS food_calories, f.protein_g AS food_protein_g,
           f.carbs_g AS food_carbs_g, f.fats_g AS food_fats_g,
           f.fiber_g AS food_fiber_g, f.is_custom AS food_is_custom
    FROM meal_food mf
    JOIN food_item f ON f.id = mf.food_id
"#;

impl PgMealRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }

    /// Load food lines for the given meals, grouped by meal id.
    async fn load_foods(&self, meal_ids: &[Uuid]) -> Result<HashMap<Uuid, Vec<MealFood>>> {
        let mut grouped: HashMap<Uuid, Vec<MealFood>> = HashMap::new();
        if meal_ids.is_empty() {
            return Ok(grouped);
        }

        let sql = format!("{MEAL_FOOD_SELECT} WHERE mf.meal_log_id = ANY($1) ORDER BY mf.id");
        let rows = sqlx::query(&sql)
            .bind(meal_ids)
            .fetch_all(&self.pool)
            .await
            .map_err(Error::Database)?;

        for row in &rows {
            let meal_id: Uuid = row.get("meal_log_id");
            grouped.entry(meal_id).or_default().push(meal_food_from_row(row));
        }
        Ok(grouped)
    }

    async fn attach_foods(&self, rows: Vec<PgRow>) -> Result<Vec<MealLog>> {
        let ids: Vec<Uuid> = rows.iter().map(|r| r.get("id")).collect();
        let mut foods = self.load_foods(&ids).await?;

        rows.iter()
            .map(|r| {
                let mut meal = meal_from_row(r)?;
                meal.foods = foods.remove(&meal.id).unwrap_or_default();
                Ok(meal)
            })
            .collect()
    }

    /// Fail with `InvalidInput` when any referenced food does not exist.
    async fn ensure_foods_exist(
        tx: &mut Transaction<'_, Postgres>,
        food_ids: &[Uuid],
    ) -> Result<()> {
        if food_ids.is_empty() {
            return Ok(());
        }
        let found: Vec<Uuid> = sqlx::query_scalar("SELECT id FROM food_item WHERE id = ANY($1)")
            .bind(food_ids)
            .fetch_all(&mut **tx)
            .await
            .map_err(Error::Database)?;

        if let Some(missing) = food_ids.iter().find(|id| !found.contains(id)) {
            return Err(Error::InvalidInput(format!("Food {missing} not found")));
        }
        Ok(())
    }
}

// `food_id` doubles as the prefixed id column of the joined food.
fn meal_food_from_row(r: &PgRow) -> MealFood {
    MealFood {
        id: r.get("id"),
        food_id: r.get("food_id"),
        servings: r.get("servings"),
        food: food_from_row(r, "food_"),
    }
}

fn meal_from_row(r: &PgRow) -> Result<MealLog> {
    Ok(MealLog {
        id: r.get("id"),
        user_id: r.get("user_id"),
        date: r.get("date"),
        meal_type: get_text_enum(r, "meal_type")?,
        notes: r.get("notes"),
        created_at: r.get("created_at"),
        foods: Vec::new(),
    })
}

#[async_trait]
impl MealRepository for PgMealRepository {
    async fn create(&self, user_id: Uuid, req: &CreateMealRequest) -> Result<MealLog> {
        let id = new_v7();
        let now = Utc::now();

        let mut tx = self.pool.begin().await.map_err(Error::Database)?;

        let food_ids: Vec<Uuid> = req.foods.iter().map(|f| f.food_id).collect();
        Self::ensure_foods_exist(&mut tx, &food_ids).await?;

        sqlx::query(
            r#"
            INSERT INTO meal_log (id, user_id, date, meal_type, notes, created_at)
            VALUES ($1, $2, $3, $4, $5, $6)
            "#,
        )
        .bind(id)
        .bind(user_id)
        .bind(req.date)
        .bind(req.meal_type.as_str())
        .bind(&req.notes)
        .bind(now)
        .execute(&mut *tx)
        .await
        .map_err(Error::Database)?;

        for item in &req.foods {
            sqlx::query(
                "INSERT INTO meal_food (id, meal_log_id, food_id, servings) VALUES ($1, $2, $3, $4)",
            )
            .bind(new_v7())
            .bind(id)
            .bind(item.food_id)
            .bind(item.servings)
            .execute(&mut *tx)
            .await
            .map_err(Error::Database)?;
        }

        tx.commit().await.map_err(Error::Database)?;

        debug!(
            subsystem = "db",
            db_table = "meal_log",
            user_id = %user_id,
            result_count = req.foods.len(),
            "Meal created"
        );

        self.fetch(user_id, id)
            .await?
            .ok_or_else(|| Error::Internal("meal vanished after insert".to_string()))
    }

    async fn list(&self, user_id: Uuid, filter: MealFilter) -> Result<Vec<MealLog>> {
        let rows = sqlx::query(
            r#"
            SELECT id, user_id, date, meal_type, notes, created_at
            FROM meal_log
            WHERE user_id = $1
              AND ($2::date IS NULL OR date >= $2)
              AND ($3::date IS NULL OR date <= $3)
              AND ($4::text IS NULL OR meal_type = $4)
            ORDER BY date DESC, created_at DESC
            "#,
        )
        .bind(user_id)
        .bind(filter.start_date)
        .bind(filter.end_date)
        .bind(filter.meal_type.map(|m| m.as_str()))
        .fetch_all(&self.pool)
        .await
        .map_err(Error::Database)?;

        self.attach_foods(rows).await
    }

    async fn fetch(&self, user_id: Uuid, id: Uuid) -> Result<Option<MealLog>> {
        let row = sqlx::query(
            r#"
            SELECT id, user_id, date, meal_type, notes, created_at
            FROM meal_log
            WHERE id = $1 AND user_id = $2
            "#,
        )
        .bind(id)
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(Error::Database)?;

        match row {
            Some(row) => Ok(self.attach_foods(vec![row]).await?.pop()),
            None => Ok(None),
        }
    }

    async fn delete(&self, user_id: Uuid, id: Uuid) -> Result<bool> {
        let result = sqlx::query("DELETE FROM meal_log WHERE id = $1 AND user_id = $2")
            .bind(id)
            .bind(user_id)
            .execute(&self.pool)
            .await
            .map_err(Error::Database)?;
        Ok(result.rows_affected() > 0)
    }

    async fn nutrition_lines(&self, user_id: Uuid, date: NaiveDate) -> Result<Vec<NutritionLine>> {
        let rows = sqlx::query(
            r#"
            SELECT f.calories, f.protein_g, f.carbs_g, f.fats_g, mf.servings
            FROM meal_log m
            JOIN meal_food mf ON mf.meal_log_id = m.id
            JOIN food_item f ON f.id = mf.food_id
            WHERE m.user_id = $1 AND m.date = $2
            "#,
        )
        .bind(user_id)
        .bind(date)
        .fetch_all(&self.pool)
        .await
        .map_err(Error::Database)?;

        Ok(rows
            .iter()
            .map(|r| NutritionLine {
                calories: r.get("calories"),
                protein_g: r.get("protein_g"),
                carbs_g: r.get("carbs_g"),
                fats_g: r.get("fats_g"),
                servings: r.get("servings"),
            })
            .collect())
    }
}
