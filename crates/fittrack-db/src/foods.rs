//! Food reference catalogue.

use async_trait::async_trait;
use sqlx::postgres::PgRow;
use sqlx::{Pool, Postgres, Row};
use uuid::Uuid;

use fittrack_core::defaults::clamp_search_limit;
use fittrack_core::{new_v7, CreateFoodRequest, Error, FoodItem, FoodRepository, FoodSearch, Result};

use crate::escape_like;

pub(crate) const FOOD_COLUMNS: &str = "id, name, brand, serving_size, serving_unit, calories, \
     protein_g, carbs_g, fats_g, fiber_g, is_custom";

/// PostgreSQL implementation of FoodRepository.
#[derive(Clone)]
pub struct PgFoodRepository {
    pool: Pool<Postgres>,
}

impl PgFoodRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }
}

/// Map a food row whose columns carry `prefix` (empty for plain selects).
pub(crate) fn food_from_row(r: &PgRow, prefix: &str) -> FoodItem {
    let col = |name: &str| format!("{prefix}{name}");
    FoodItem {
        id: r.get(col("id").as_str()),
        name: r.get(col("name").as_str()),
        brand: r.get(col("brand").as_str()),
        serving_size: r.get(col("serving_size").as_str()),
        serving_unit: r.get(col("serving_unit").as_str()),
        calories: r.get(col("calories").as_str()),
        protein_g: r.get(col("protein_g").as_str()),
        carbs_g: r.get(col("carbs_g").as_str()),
        fats_g: r.get(col("fats_g").as_str()),
        fiber_g: r.get(col("fiber_g").as_str()),
        is_custom: r.get(col("is_custom").as_str()),
    }
}

#[async_trait]
impl FoodRepository for PgFoodRepository {
    /// Stores the food exactly as given, including `is_custom`.
    async fn insert(&self, req: &CreateFoodRequest) -> Result<FoodItem> {
        let sql = format!(
            r#"
            INSERT INTO food_item ({FOOD_COLUMNS})
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)
            RETURNING {FOOD_COLUMNS}
            "#
        );
        let row = sqlx::query(&sql)
            .bind(new_v7())
            .bind(&req.name)
            .bind(&req.brand)
            .bind(req.serving_size)
            .bind(&req.serving_unit)
            .bind(req.calories)
            .bind(req.protein_g)
            .bind(req.carbs_g)
            .bind(req.fats_g)
            .bind(req.fiber_g)
            .bind(req.is_custom)
            .fetch_one(&self.pool)
            .await
            .map_err(Error::Database)?;

        Ok(food_from_row(&row, ""))
    }

    async fn search(&self, query: &FoodSearch) -> Result<Vec<FoodItem>> {
        let pattern = query
            .search
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(|s| format!("%{}%", escape_like(s)));

        let sql = format!(
            r#"
            SELECT {FOOD_COLUMNS}
            FROM food_item
            WHERE ($1::text IS NULL OR name ILIKE $1 ESCAPE '\')
            ORDER BY name, id
            LIMIT $2
            "#
        );
        let rows = sqlx::query(&sql)
            .bind(pattern)
            .bind(clamp_search_limit(query.limit))
            .fetch_all(&self.pool)
            .await
            .map_err(Error::Database)?;

        Ok(rows.iter().map(|r| food_from_row(r, "")).collect())
    }

    async fn fetch(&self, id: Uuid) -> Result<Option<FoodItem>> {
        let sql = format!("SELECT {FOOD_COLUMNS} FROM food_item WHERE id = $1");
        let row = sqlx::query(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(Error::Database)?;
        Ok(row.map(|r| food_from_row(&r, "")))
    }
}
