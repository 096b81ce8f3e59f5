//! Built-in reference catalogue.
//!
//! Seeding is idempotent: an entry is skipped when a food or exercise with the
//! same name already exists.

use sqlx::{PgPool, Postgres, Transaction};
use tracing::info;

use fittrack_core::{new_v7, Error, ExerciseCategory, Result};

/// Rows added by [`seed_reference_data`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SeedReport {
    pub foods_added: u64,
    pub exercises_added: u64,
}

struct SeedFood {
    name: &'static str,
    brand: Option<&'static str>,
    serving_size: f64,
    serving_unit: &'static str,
    calories: i32,
    protein_g: f64,
    carbs_g: f64,
    fats_g: f64,
    fiber_g: f64,
}

struct SeedExercise {
    name: &'static str,
    category: ExerciseCategory,
    muscle_group: Option<&'static str>,
    description: &'static str,
    calories_per_minute: f64,
}

macro_rules! food {
    ($name:expr, $brand:expr, $size:expr, $unit:expr, $cal:expr, $p:expr, $c:expr, $f:expr, $fib:expr) => {
        SeedFood {
            name: $name,
            brand: $brand,
            serving_size: $size,
            serving_unit: $unit,
            calories: $cal,
            protein_g: $p,
            carbs_g: $c,
            fats_g: $f,
            fiber_g: $fib,
        }
    };
}

macro_rules! exercise {
    ($name:expr, $cat:ident, $muscle:expr, $desc:expr, $cpm:expr) => {
        SeedExercise {
            name: $name,
            category: ExerciseCategory::$cat,
            muscle_group: $muscle,
            description: $desc,
            calories_per_minute: $cpm,
        }
    };
}

#[rustfmt::skip]
const FOODS: &[SeedFood] = &[
    // Proteins
    food!("Chicken Breast", None, 100.0, "grams", 165, 31.0, 0.0, 3.6, 0.0),
    food!("Eggs", None, 1.0, "large egg", 70, 6.0, 0.5, 5.0, 0.0),
    food!("Salmon", None, 100.0, "grams", 208, 20.0, 0.0, 13.0, 0.0),
    food!("Greek Yogurt", None, 170.0, "grams", 100, 17.0, 6.0, 0.0, 0.0),
    food!("Tofu", None, 100.0, "grams", 76, 8.0, 2.0, 4.8, 0.3),
    // Carbs
    food!("Brown Rice", None, 100.0, "grams cooked", 111, 2.6, 23.0, 0.9, 1.8),
    food!("Oatmeal", None, 100.0, "grams", 389, 16.9, 66.0, 6.9, 10.6),
    food!("Whole Wheat Bread", None, 1.0, "slice", 80, 4.0, 13.0, 1.0, 2.0),
    food!("Sweet Potato", None, 100.0, "grams", 86, 1.6, 20.0, 0.1, 3.0),
    food!("Quinoa", None, 100.0, "grams cooked", 120, 4.4, 21.0, 1.9, 2.8),
    // Fruits
    food!("Banana", None, 1.0, "medium", 105, 1.3, 27.0, 0.4, 3.1),
    food!("Apple", None, 1.0, "medium", 95, 0.5, 25.0, 0.3, 4.4),
    food!("Blueberries", None, 100.0, "grams", 57, 0.7, 14.0, 0.3, 2.4),
    food!("Orange", None, 1.0, "medium", 62, 1.2, 15.0, 0.2, 3.1),
    // Vegetables
    food!("Broccoli", None, 100.0, "grams", 34, 2.8, 7.0, 0.4, 2.6),
    food!("Spinach", None, 100.0, "grams", 23, 2.9, 3.6, 0.4, 2.2),
    food!("Carrots", None, 100.0, "grams", 41, 0.9, 10.0, 0.2, 2.8),
    // Fats
    food!("Almonds", None, 28.0, "grams (1 oz)", 164, 6.0, 6.0, 14.0, 3.5),
    food!("Avocado", None, 100.0, "grams", 160, 2.0, 9.0, 15.0, 7.0),
    food!("Olive Oil", None, 1.0, "tablespoon", 119, 0.0, 0.0, 13.5, 0.0),
    food!("Peanut Butter", None, 2.0, "tablespoons", 188, 8.0, 7.0, 16.0, 2.0),
    // Beverages
    food!("Protein Shake", Some("Generic"), 1.0, "scoop (30g)", 120, 24.0, 3.0, 1.0, 0.0),
    food!("Milk", None, 240.0, "ml (1 cup)", 149, 8.0, 12.0, 8.0, 0.0),
];

#[rustfmt::skip]
const EXERCISES: &[SeedExercise] = &[
    // Upper body
    exercise!("Push-ups", Strength, Some("chest"), "Classic bodyweight chest exercise", 7.0),
    exercise!("Pull-ups", Strength, Some("back"), "Bodyweight back exercise", 8.0),
    exercise!("Bench Press", Strength, Some("chest"), "Barbell chest press", 6.0),
    exercise!("Dumbbell Rows", Strength, Some("back"), "Single arm dumbbell row", 5.5),
    exercise!("Shoulder Press", Strength, Some("shoulders"), "Overhead press", 5.0),
    exercise!("Bicep Curls", Strength, Some("arms"), "Dumbbell bicep curls", 4.0),
    exercise!("Tricep Dips", Strength, Some("arms"), "Bodyweight tricep exercise", 5.5),
    // Lower body
    exercise!("Squats", Strength, Some("legs"), "Barbell back squat", 8.0),
    exercise!("Deadlifts", Strength, Some("legs"), "Conventional deadlift", 9.0),
    exercise!("Lunges", Strength, Some("legs"), "Walking or stationary lunges", 6.0),
    exercise!("Leg Press", Strength, Some("legs"), "Machine leg press", 6.5),
    exercise!("Calf Raises", Strength, Some("calves"), "Standing calf raises", 4.0),
    // Core
    exercise!("Plank", Strength, Some("core"), "Isometric core hold", 5.0),
    exercise!("Crunches", Strength, Some("abs"), "Basic ab crunches", 4.5),
    exercise!("Russian Twists", Strength, Some("obliques"), "Seated twisting ab exercise", 5.0),
    // Cardio
    exercise!("Running", Cardio, None, "Outdoor or treadmill running", 11.0),
    exercise!("Cycling", Cardio, None, "Outdoor or stationary bike", 8.0),
    exercise!("Swimming", Cardio, None, "Lap swimming", 10.0),
    exercise!("Jumping Jacks", Cardio, None, "Full body cardio", 8.0),
    exercise!("Jump Rope", Cardio, None, "Skipping rope", 12.0),
    exercise!("Burpees", Cardio, None, "Full body explosive movement", 10.0),
    exercise!("Rowing Machine", Cardio, None, "Indoor rowing", 9.0),
    // Flexibility
    exercise!("Yoga Flow", Flexibility, None, "Vinyasa yoga", 4.0),
    exercise!("Static Stretching", Flexibility, None, "Hold stretches", 2.5),
    // Sports
    exercise!("Basketball", Sports, None, "Recreational basketball", 8.0),
    exercise!("Soccer", Sports, None, "Recreational soccer", 9.0),
    exercise!("Tennis", Sports, None, "Singles or doubles tennis", 7.0),
];

/// Number of built-in foods.
pub fn food_count() -> usize {
    FOODS.len()
}

/// Number of built-in exercises.
pub fn exercise_count() -> usize {
    EXERCISES.len()
}

async fn seed_foods(tx: &mut Transaction<'_, Postgres>) -> Result<u64> {
    let mut added = 0;
    for f in FOODS {
        let result = sqlx::query(
            r#"
            INSERT INTO food_item
                (id, name, brand, serving_size, serving_unit, calories,
                 protein_g, carbs_g, fats_g, fiber_g, is_custom)
            SELECT $1, $2, $3, $4, $5, $6, $7, $8, $9, $10, FALSE
            WHERE NOT EXISTS (SELECT 1 FROM food_item WHERE name = $2)
            "#,
        )
        .bind(new_v7())
        .bind(f.name)
        .bind(f.brand)
        .bind(f.serving_size)
        .bind(f.serving_unit)
        .bind(f.calories)
        .bind(f.protein_g)
        .bind(f.carbs_g)
        .bind(f.fats_g)
        .bind(f.fiber_g)
        .execute(&mut **tx)
        .await
        .map_err(Error::Database)?;
        added += result.rows_affected();
    }
    Ok(added)
}

async fn seed_exercises(tx: &mut Transaction<'_, Postgres>) -> Result<u64> {
    let mut added = 0;
    for e in EXERCISES {
        let result = sqlx::query(
            r#"
            INSERT INTO exercise_library
                (id, name, category, muscle_group, description, calories_per_minute, is_custom)
            SELECT $1, $2, $3, $4, $5, $6, FALSE
            WHERE NOT EXISTS (SELECT 1 FROM exercise_library WHERE name = $2)
            "#,
        )
        .bind(new_v7())
        .bind(e.name)
        .bind(e.category.as_str())
        .bind(e.muscle_group)
        .bind(e.description)
        .bind(e.calories_per_minute)
        .execute(&mut **tx)
        .await
        .map_err(Error::Database)?;
        added += result.rows_affected();
    }
    Ok(added)
}

/// Insert the built-in foods and exercises that are not yet present.
pub async fn seed_reference_data(pool: &PgPool) -> Result<SeedReport> {
    let mut tx = pool.begin().await.map_err(Error::Database)?;
    let foods_added = seed_foods(&mut tx).await?;
    let exercises_added = seed_exercises(&mut tx).await?;
    tx.commit().await.map_err(Error::Database)?;

    info!(
        subsystem = "db",
        component = "seed",
        foods_added,
        exercises_added,
        "Reference catalogue seeded"
    );

    Ok(SeedReport {
        foods_added,
        exercises_added,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_catalogue_sizes() {
        assert_eq!(food_count(), 23);
        assert_eq!(exercise_count(), 27);
    }

    #[test]
    fn test_catalogue_names_unique() {
        let foods: HashSet<_> = FOODS.iter().map(|f| f.name).collect();
        assert_eq!(foods.len(), FOODS.len());
        let exercises: HashSet<_> = EXERCISES.iter().map(|e| e.name).collect();
        assert_eq!(exercises.len(), EXERCISES.len());
    }

    #[test]
    fn test_catalogue_values_are_valid() {
        for f in FOODS {
            assert!(f.serving_size > 0.0, "{}", f.name);
            assert!(f.calories >= 0, "{}", f.name);
        }
        for e in EXERCISES {
            assert!(e.calories_per_minute >= 0.0, "{}", e.name);
        }
    }

    #[test]
    fn test_cardio_has_no_muscle_group() {
        assert!(EXERCISES
            .iter()
            .filter(|e| e.category == ExerciseCategory::Cardio)
            .all(|e| e.muscle_group.is_none()));
    }
}
