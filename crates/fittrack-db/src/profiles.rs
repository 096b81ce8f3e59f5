//! User profile repository.

use async_trait::async_trait;
use sqlx::postgres::PgRow;
use sqlx::{Pool, Postgres, Row};
use uuid::Uuid;

use fittrack_core::{
    new_v7, CreateProfileRequest, Error, ProfileRepository, Result, UserProfile,
};

use crate::get_text_enum;

const PROFILE_COLUMNS: &str = "id, user_id, date_of_birth, height_cm, current_weight_kg, \
     goal_weight_kg, activity_level, goal_type, daily_calorie_target";

/// PostgreSQL implementation of ProfileRepository.
#[derive(Clone)]
pub struct PgProfileRepository {
    pool: Pool<Postgres>,
}

impl PgProfileRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }
}

fn profile_from_row(r: &PgRow) -> Result<UserProfile> {
    Ok(UserProfile {
        id: r.get("id"),
        user_id: r.get("user_id"),
        date_of_birth: r.get("date_of_birth"),
        height_cm: r.get("height_cm"),
        current_weight_kg: r.get("current_weight_kg"),
        goal_weight_kg: r.get("goal_weight_kg"),
        activity_level: get_text_enum(r, "activity_level")?,
        goal_type: get_text_enum(r, "goal_type")?,
        daily_calorie_target: r.get("daily_calorie_target"),
    })
}

#[async_trait]
impl ProfileRepository for PgProfileRepository {
    async fn insert(&self, user_id: Uuid, req: &CreateProfileRequest) -> Result<UserProfile> {
        let sql = format!(
            r#"
            INSERT INTO user_profile ({PROFILE_COLUMNS})
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            RETURNING {PROFILE_COLUMNS}
            "#
        );
        let row = sqlx::query(&sql)
            .bind(new_v7())
            .bind(user_id)
            .bind(req.date_of_birth)
            .bind(req.height_cm)
            .bind(req.current_weight_kg)
            .bind(req.goal_weight_kg)
            .bind(req.activity_level.as_str())
            .bind(req.goal_type.as_str())
            .bind(req.daily_calorie_target)
            .fetch_one(&self.pool)
            .await
            .map_err(Error::Database)?;

        profile_from_row(&row)
    }

    async fn fetch_for_user(&self, user_id: Uuid) -> Result<Option<UserProfile>> {
        let sql = format!("SELECT {PROFILE_COLUMNS} FROM user_profile WHERE user_id = $1");
        let row = sqlx::query(&sql)
            .bind(user_id)
            .fetch_optional(&self.pool)
            .await
            .map_err(Error::Database)?;

        row.as_ref().map(profile_from_row).transpose()
    }

    async fn save(&self, profile: &UserProfile) -> Result<UserProfile> {
        let sql = format!(
            r#"
            UPDATE user_profile SET
                date_of_birth = $2,
                height_cm = $3,
                current_weight_kg = $4,
                goal_weight_kg = $5,
                activity_level = $6,
                goal_type = $7,
                daily_calorie_target = $8
            WHERE id = $1
            RETURNING {PROFILE_COLUMNS}
            "#
        );
        let row = sqlx::query(&sql)
            .bind(profile.id)
            .bind(profile.date_of_birth)
            .bind(profile.height_cm)
            .bind(profile.current_weight_kg)
            .bind(profile.goal_weight_kg)
            .bind(profile.activity_level.as_str())
            .bind(profile.goal_type.as_str())
            .bind(profile.daily_calorie_target)
            .fetch_optional(&self.pool)
            .await
            .map_err(Error::Database)?
            .ok_or_else(|| Error::NotFound("Profile not found".to_string()))?;

        profile_from_row(&row)
    }
}
