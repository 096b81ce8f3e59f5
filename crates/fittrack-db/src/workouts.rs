//! Workout session repository.
//!
//! Sessions, their exercises and the sets of each exercise are written in one
//! transaction and read back with one query per level.

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::{NaiveDate, Utc};
use sqlx::postgres::PgRow;
use sqlx::{Pool, Postgres, Row, Transaction};
use tracing::debug;
use uuid::Uuid;

use fittrack_core::{
    new_v7, CreateWorkoutRequest, DateRange, Error, ExerciseSet, Result, WorkoutExercise,
    WorkoutRepository, WorkoutSession,
};

use crate::exercises::exercise_from_row;

const SESSION_COLUMNS: &str =
    "id, user_id, name, date, duration_minutes, total_calories_burned, notes, created_at";

/// PostgreSQL implementation of WorkoutRepository.
#[derive(Clone)]
pub struct PgWorkoutRepository {
    pool: Pool<Postgres>,
}

impl PgWorkoutRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }

    async fn load_sets(&self, exercise_ids: &[Uuid]) -> Result<HashMap<Uuid, Vec<ExerciseSet>>> {
        let mut grouped: HashMap<Uuid, Vec<ExerciseSet>> = HashMap::new();
        if exercise_ids.is_empty() {
            return Ok(grouped);
        }

        let rows = sqlx::query(
            r#"
            SELECT id, workout_exercise_id, set_number, reps, weight_kg, duration_seconds
            FROM exercise_set
            WHERE workout_exercise_id = ANY($1)
            ORDER BY set_number, id
            "#,
        )
        .bind(exercise_ids)
        .fetch_all(&self.pool)
        .await
        .map_err(Error::Database)?;

        for r in &rows {
            grouped
                .entry(r.get("workout_exercise_id"))
                .or_default()
                .push(ExerciseSet {
                    id: r.get("id"),
                    set_number: r.get("set_number"),
                    reps: r.get("reps"),
                    weight_kg: r.get("weight_kg"),
                    duration_seconds: r.get("duration_seconds"),
                });
        }
        Ok(grouped)
    }

    async fn load_exercises(
        &self,
        session_ids: &[Uuid],
    ) -> Result<HashMap<Uuid, Vec<WorkoutExercise>>> {
        let mut grouped: HashMap<Uuid, Vec<WorkoutExercise>> = HashMap::new();
        if session_ids.is_empty() {
            return Ok(grouped);
        }

        let rows = sqlx::query(
            r#"
            SELECT we.id, we.workout_session_id, we.exercise_id, we."order", we.notes,
                   e.id AS ex_id, e.name AS ex_name, e.category AS ex_category,
                   e.muscle_group AS ex_muscle_group, e.description AS ex_description,
                   e.calories_per_minute AS ex_calories_per_minute,
                   e.is_custom AS ex_is_custom
            FROM workout_exercise we
            JOIN exercise_library e ON e.id = we.exercise_id
            WHERE we.workout_session_id = ANY($1)
            ORDER BY we."order", we.id
            "#,
        )
        .bind(session_ids)
        .fetch_all(&self.pool)
        .await
        .map_err(Error::Database)?;

        let exercise_ids: Vec<Uuid> = rows.iter().map(|r| r.get("id")).collect();
        let mut sets = self.load_sets(&exercise_ids).await?;

        for r in &rows {
            let id: Uuid = r.get("id");
            grouped
                .entry(r.get("workout_session_id"))
                .or_default()
                .push(WorkoutExercise {
                    id,
                    exercise_id: r.get("exercise_id"),
                    order: r.get("order"),
                    notes: r.get("notes"),
                    exercise: exercise_from_row(r, "ex_")?,
                    sets: sets.remove(&id).unwrap_or_default(),
                });
        }
        Ok(grouped)
    }

    async fn attach_exercises(&self, rows: Vec<PgRow>) -> Result<Vec<WorkoutSession>> {
        let ids: Vec<Uuid> = rows.iter().map(|r| r.get("id")).collect();
        let mut exercises = self.load_exercises(&ids).await?;

        Ok(rows
            .iter()
            .map(|r| {
                let mut session = session_from_row(r);
                session.exercises = exercises.remove(&session.id).unwrap_or_default();
                session
            })
            .collect())
    }

    async fn ensure_exercises_exist(
        tx: &mut Transaction<'_, Postgres>,
        exercise_ids: &[Uuid],
    ) -> Result<()> {
        if exercise_ids.is_empty() {
            return Ok(());
        }
        let found: Vec<Uuid> =
            sqlx::query_scalar("SELECT id FROM exercise_library WHERE id = ANY($1)")
                .bind(exercise_ids)
                .fetch_all(&mut **tx)
                .await
                .map_err(Error::Database)?;

        if let Some(missing) = exercise_ids.iter().find(|id| !found.contains(id)) {
            return Err(Error::InvalidInput(format!("Exercise {missing} not found")));
        }
        Ok(())
    }
}

fn session_from_row(r: &PgRow) -> WorkoutSession {
    WorkoutSession {
        id: r.get("id"),
        user_id: r.get("user_id"),
        name: r.get("name"),
        date: r.get("date"),
        duration_minutes: r.get("duration_minutes"),
        total_calories_burned: r.get("total_calories_burned"),
        notes: r.get("notes"),
        created_at: r.get("created_at"),
        exercises: Vec::new(),
    }
}

#[async_trait]
impl WorkoutRepository for PgWorkoutRepository {
    async fn create(&self, user_id: Uuid, req: &CreateWorkoutRequest) -> Result<WorkoutSession> {
        let id = new_v7();
        let now = Utc::now();

        let mut tx = self.pool.begin().await.map_err(Error::Database)?;

        let exercise_ids: Vec<Uuid> = req.exercises.iter().map(|e| e.exercise_id).collect();
        Self::ensure_exercises_exist(&mut tx, &exercise_ids).await?;

        sqlx::query(&format!(
            "INSERT INTO workout_session ({SESSION_COLUMNS}) VALUES ($1, $2, $3, $4, $5, $6, $7, $8)"
        ))
        .bind(id)
        .bind(user_id)
        .bind(&req.name)
        .bind(req.date)
        .bind(req.duration_minutes)
        .bind(req.total_calories_burned)
        .bind(&req.notes)
        .bind(now)
        .execute(&mut *tx)
        .await
        .map_err(Error::Database)?;

        let mut set_count = 0usize;
        for exercise in &req.exercises {
            let workout_exercise_id = new_v7();
            sqlx::query(
                r#"
                INSERT INTO workout_exercise (id, workout_session_id, exercise_id, "order", notes)
                VALUES ($1, $2, $3, $4, $5)
                "#,
            )
            .bind(workout_exercise_id)
            .bind(id)
            .bind(exercise.exercise_id)
            .bind(exercise.order)
            .bind(&exercise.notes)
            .execute(&mut *tx)
            .await
            .map_err(Error::Database)?;

            for set in &exercise.sets {
                sqlx::query(
                    r#"
                    INSERT INTO exercise_set
                        (id, workout_exercise_id, set_number, reps, weight_kg, duration_seconds)
                    VALUES ($1, $2, $3, $4, $5, $6)
                    "#,
                )
                .bind(new_v7())
                .bind(workout_exercise_id)
                .bind(set.set_number)
                .bind(set.reps)
                .bind(set.weight_kg)
                .bind(set.duration_seconds)
                .execute(&mut *tx)
                .await
                .map_err(Error::Database)?;
                set_count += 1;
            }
        }

        tx.commit().await.map_err(Error::Database)?;

        debug!(
            subsystem = "db",
            db_table = "workout_session",
            user_id = %user_id,
            exercise_count = req.exercises.len(),
            set_count,
            "Workout created"
        );

        self.fetch(user_id, id)
            .await?
            .ok_or_else(|| Error::Internal("workout vanished after insert".to_string()))
    }

    async fn list(&self, user_id: Uuid, range: DateRange) -> Result<Vec<WorkoutSession>> {
        let sql = format!(
            r#"
            SELECT {SESSION_COLUMNS}
            FROM workout_session
            WHERE user_id = $1
              AND ($2::date IS NULL OR date >= $2)
              AND ($3::date IS NULL OR date <= $3)
            ORDER BY date DESC, created_at DESC
            "#
        );
        let rows = sqlx::query(&sql)
            .bind(user_id)
            .bind(range.start_date)
            .bind(range.end_date)
            .fetch_all(&self.pool)
            .await
            .map_err(Error::Database)?;

        self.attach_exercises(rows).await
    }

    async fn fetch(&self, user_id: Uuid, id: Uuid) -> Result<Option<WorkoutSession>> {
        let sql = format!(
            "SELECT {SESSION_COLUMNS} FROM workout_session WHERE id = $1 AND user_id = $2"
        );
        let row = sqlx::query(&sql)
            .bind(id)
            .bind(user_id)
            .fetch_optional(&self.pool)
            .await
            .map_err(Error::Database)?;

        match row {
            Some(row) => Ok(self.attach_exercises(vec![row]).await?.pop()),
            None => Ok(None),
        }
    }

    async fn delete(&self, user_id: Uuid, id: Uuid) -> Result<bool> {
        let result = sqlx::query("DELETE FROM workout_session WHERE id = $1 AND user_id = $2")
            .bind(id)
            .bind(user_id)
            .execute(&self.pool)
            .await
            .map_err(Error::Database)?;
        Ok(result.rows_affected() > 0)
    }

    async fn count_since(&self, user_id: Uuid, since: NaiveDate) -> Result<i64> {
        let count: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM workout_session WHERE user_id = $1 AND date >= $2",
        )
        .bind(user_id)
        .bind(since)
        .fetch_one(&self.pool)
        .await
        .map_err(Error::Database)?;
        Ok(count)
    }
}
