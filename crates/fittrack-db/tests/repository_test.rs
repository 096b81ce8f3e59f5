//! Integration tests for the PostgreSQL repositories.
//!
//! These tests need a reachable PostgreSQL at `DATABASE_URL`; they return
//! early when it is not set. Migrations are applied automatically.

use chrono::{Duration, Utc};
use fittrack_db::test_fixtures::{date, TestDatabase};
use fittrack_db::{
    AccessTokenRepository, ActivityLevel, BodyMetricRepository, CreateBodyMetricRequest,
    CreateGoalRequest, CreateMealRequest, CreateProfileRequest, CreateWaterRequest,
    CreateWorkoutRequest, DateRange, Error, ExerciseCategory, ExerciseRepository,
    ExerciseSetInput, FoodRepository, FoodSearch, GoalFilter, GoalRepository, GoalStatus,
    GoalType, MealFilter, MealFoodInput, MealRepository, MealType, ProfileRepository,
    UpdateGoalRequest, UpdateProfileRequest, UserRepository, WaterRepository,
    WorkoutExerciseInput, WorkoutRepository,
};
use uuid::Uuid;

#[tokio::test]
async fn test_user_lookup_and_verification() {
    let Some(mut t) = TestDatabase::from_env().await else {
        return;
    };
    let user = t.create_user().await;
    assert!(!user.is_verified);

    let by_name = t.db.users.find_by_username(&user.username).await.unwrap();
    assert_eq!(by_name.map(|u| u.id), Some(user.id));
    let by_email = t.db.users.find_by_email(&user.email).await.unwrap();
    assert_eq!(by_email.map(|u| u.id), Some(user.id));

    let creds = t
        .db
        .users
        .fetch_credentials(&user.username)
        .await
        .unwrap()
        .expect("credentials");
    assert!(creds.password_hash.starts_with("$argon2id$"));

    t.db.users.mark_verified(user.id).await.unwrap();
    let fetched = t.db.users.fetch(user.id).await.unwrap().unwrap();
    assert!(fetched.is_verified);

    let err = t.db.users.mark_verified(Uuid::nil()).await.unwrap_err();
    assert!(matches!(err, Error::NotFound(_)));

    t.cleanup().await;
}

#[tokio::test]
async fn test_duplicate_account_reports_which_field() {
    let Some(mut t) = TestDatabase::from_env().await else {
        return;
    };
    let user = t.create_user().await;
    let err = t
        .db
        .users
        .insert(&user.username, "other@example.com", "x")
        .await
        .unwrap_err();
    match err {
        Error::InvalidInput(msg) => assert_eq!(msg, "Username already registered"),
        other => panic!("unexpected {other:?}"),
    }

    let err = t
        .db
        .users
        .insert("someone_else_entirely", &user.email, "x")
        .await
        .unwrap_err();
    match err {
        Error::InvalidInput(msg) => assert_eq!(msg, "Email already registered"),
        other => panic!("unexpected {other:?}"),
    }
    t.cleanup().await;
}

#[tokio::test]
async fn test_access_token_lifecycle() {
    let Some(mut t) = TestDatabase::from_env().await else {
        return;
    };
    let user = t.create_user().await;
    let live = format!("live-{}", user.id);
    let expired = format!("expired-{}", user.id);

    t.db
        .access_tokens
        .insert(user.id, &live, Utc::now() + Duration::minutes(30))
        .await
        .unwrap();
    t.db
        .access_tokens
        .insert(user.id, &expired, Utc::now() - Duration::minutes(1))
        .await
        .unwrap();

    let resolved = t.db.access_tokens.resolve_user(&live).await.unwrap();
    assert_eq!(resolved.map(|u| u.id), Some(user.id));
    assert!(t.db.access_tokens.resolve_user(&expired).await.unwrap().is_none());
    assert!(t.db.access_tokens.resolve_user("unknown").await.unwrap().is_none());

    assert!(t.db.access_tokens.revoke(&live).await.unwrap());
    assert!(!t.db.access_tokens.revoke(&live).await.unwrap());
    assert!(t.db.access_tokens.resolve_user(&live).await.unwrap().is_none());

    // Revoking everything only touches live tokens of that user.
    let other = t.create_user().await;
    let first = format!("first-{}", user.id);
    let second = format!("second-{}", user.id);
    let others = format!("other-{}", other.id);
    for (owner, hash) in [(user.id, &first), (user.id, &second), (other.id, &others)] {
        t.db
            .access_tokens
            .insert(owner, hash, Utc::now() + Duration::minutes(30))
            .await
            .unwrap();
    }
    assert_eq!(
        t.db.access_tokens.revoke_all_for_user(user.id).await.unwrap(),
        2
    );
    assert!(t.db.access_tokens.resolve_user(&first).await.unwrap().is_none());
    assert!(t.db.access_tokens.resolve_user(&second).await.unwrap().is_none());
    assert_eq!(
        t.db.access_tokens
            .resolve_user(&others)
            .await
            .unwrap()
            .map(|u| u.id),
        Some(other.id)
    );
    assert_eq!(
        t.db.access_tokens.revoke_all_for_user(user.id).await.unwrap(),
        0
    );

    t.cleanup().await;
}

#[tokio::test]
async fn test_profile_create_and_partial_update() {
    let Some(mut t) = TestDatabase::from_env().await else {
        return;
    };
    let user = t.create_user().await;
    assert!(t.db.profiles.fetch_for_user(user.id).await.unwrap().is_none());

    let created = t
        .db
        .profiles
        .insert(
            user.id,
            &CreateProfileRequest {
                height_cm: Some(175.0),
                current_weight_kg: Some(75.0),
                goal_weight_kg: Some(70.0),
                goal_type: GoalType::LoseWeight,
                daily_calorie_target: Some(2000),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    assert_eq!(created.activity_level, ActivityLevel::Moderate);

    let mut profile = t.db.profiles.fetch_for_user(user.id).await.unwrap().unwrap();
    UpdateProfileRequest {
        current_weight_kg: Some(Some(73.0)),
        height_cm: Some(None),
        ..Default::default()
    }
    .apply_to(&mut profile);
    let saved = t.db.profiles.save(&profile).await.unwrap();
    assert_eq!(saved.current_weight_kg, Some(73.0));
    assert_eq!(saved.height_cm, None);
    assert_eq!(saved.goal_weight_kg, Some(70.0));
    assert_eq!(saved.goal_type, GoalType::LoseWeight);

    t.cleanup().await;
}

#[tokio::test]
async fn test_body_metrics_range_and_order() {
    let Some(mut t) = TestDatabase::from_env().await else {
        return;
    };
    let user = t.create_user().await;
    for (day, weight) in [(1, 80.0), (5, 79.0), (10, 78.0)] {
        t.db
            .body_metrics
            .insert(
                user.id,
                &CreateBodyMetricRequest {
                    date: date(2025, 12, day),
                    weight_kg: weight,
                    body_fat_percentage: Some(20.0),
                    notes: None,
                },
            )
            .await
            .unwrap();
    }

    let all = t.db.body_metrics.list(user.id, DateRange::default()).await.unwrap();
    assert_eq!(all.len(), 3);
    assert_eq!(all[0].date, date(2025, 12, 10));

    let ranged = t
        .db
        .body_metrics
        .list(
            user.id,
            DateRange::new(Some(date(2025, 12, 5)), Some(date(2025, 12, 10))),
        )
        .await
        .unwrap();
    assert_eq!(ranged.len(), 2);

    let other = t.create_user().await;
    assert!(!t.db.body_metrics.delete(other.id, all[0].id).await.unwrap());
    assert!(t.db.body_metrics.delete(user.id, all[0].id).await.unwrap());

    t.cleanup().await;
}

#[tokio::test]
async fn test_food_search_escapes_wildcards() {
    let Some(mut t) = TestDatabase::from_env().await else {
        return;
    };
    let food = t.create_food("Zesty_Lentil 100%", 120, 9.0).await;

    let hits = t
        .db
        .foods
        .search(&FoodSearch {
            search: Some("zesty_lentil 100%".to_string()),
            limit: None,
        })
        .await
        .unwrap();
    assert!(hits.iter().any(|f| f.id == food.id));

    let wildcard = t
        .db
        .foods
        .search(&FoodSearch {
            search: Some("Zesty%Lentil".to_string()),
            limit: None,
        })
        .await
        .unwrap();
    assert!(!wildcard.iter().any(|f| f.id == food.id));

    t.cleanup().await;
}

#[tokio::test]
async fn test_exercise_search_by_category() {
    let Some(mut t) = TestDatabase::from_env().await else {
        return;
    };
    let ex = t.create_exercise("Sled Push", ExerciseCategory::Sports).await;

    let hits = t
        .db
        .exercises
        .search(Some("sled push"), Some(ExerciseCategory::Sports), 50)
        .await
        .unwrap();
    assert!(hits.iter().any(|e| e.id == ex.id));

    let wrong = t
        .db
        .exercises
        .search(Some("sled push"), Some(ExerciseCategory::Cardio), 50)
        .await
        .unwrap();
    assert!(!wrong.iter().any(|e| e.id == ex.id));

    t.cleanup().await;
}

#[tokio::test]
async fn test_meal_with_foods_roundtrip_and_cascade() {
    let Some(mut t) = TestDatabase::from_env().await else {
        return;
    };
    let user = t.create_user().await;
    let rice = t.create_food("Rice", 130, 2.7).await;
    let chicken = t.create_food("Chicken", 165, 31.0).await;

    let meal = t
        .db
        .meals
        .create(
            user.id,
            &CreateMealRequest {
                date: date(2025, 12, 14),
                meal_type: MealType::Lunch,
                notes: Some("post-workout".to_string()),
                foods: vec![
                    MealFoodInput {
                        food_id: rice.id,
                        servings: 1.5,
                    },
                    MealFoodInput {
                        food_id: chicken.id,
                        servings: 1.0,
                    },
                ],
            },
        )
        .await
        .unwrap();
    assert_eq!(meal.foods.len(), 2);
    assert!(meal.foods.iter().any(|f| f.food.name == rice.name));

    let lines = t
        .db
        .meals
        .nutrition_lines(user.id, date(2025, 12, 14))
        .await
        .unwrap();
    assert_eq!(lines.len(), 2);

    let lunches = t
        .db
        .meals
        .list(
            user.id,
            MealFilter {
                meal_type: Some(MealType::Lunch),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    assert_eq!(lunches.len(), 1);
    assert_eq!(lunches[0].foods.len(), 2);

    let dinners = t
        .db
        .meals
        .list(
            user.id,
            MealFilter {
                meal_type: Some(MealType::Dinner),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    assert!(dinners.is_empty());

    assert!(t.db.meals.delete(user.id, meal.id).await.unwrap());
    assert!(t.db.meals.fetch(user.id, meal.id).await.unwrap().is_none());
    let orphaned: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM meal_food WHERE meal_log_id = $1")
        .bind(meal.id)
        .fetch_one(t.db.pool())
        .await
        .unwrap();
    assert_eq!(orphaned, 0);

    t.cleanup().await;
}

#[tokio::test]
async fn test_meal_with_unknown_food_rolls_back() {
    let Some(mut t) = TestDatabase::from_env().await else {
        return;
    };
    let user = t.create_user().await;
    let err = t
        .db
        .meals
        .create(
            user.id,
            &CreateMealRequest {
                date: date(2025, 12, 14),
                meal_type: MealType::Snack,
                notes: None,
                foods: vec![MealFoodInput {
                    food_id: Uuid::nil(),
                    servings: 1.0,
                }],
            },
        )
        .await
        .unwrap_err();
    assert!(matches!(err, Error::InvalidInput(_)));

    let meals = t.db.meals.list(user.id, MealFilter::default()).await.unwrap();
    assert!(meals.is_empty());
    t.cleanup().await;
}

#[tokio::test]
async fn test_workout_nested_order() {
    let Some(mut t) = TestDatabase::from_env().await else {
        return;
    };
    let user = t.create_user().await;
    let squat = t.create_exercise("Squat", ExerciseCategory::Strength).await;
    let row = t.create_exercise("Row", ExerciseCategory::Cardio).await;

    let set = |n, reps| ExerciseSetInput {
        set_number: n,
        reps: Some(reps),
        weight_kg: Some(60.0),
        duration_seconds: None,
    };

    let workout = t
        .db
        .workouts
        .create(
            user.id,
            &CreateWorkoutRequest {
                name: "Leg day".to_string(),
                date: date(2025, 12, 14),
                duration_minutes: Some(45),
                total_calories_burned: 300,
                notes: None,
                exercises: vec![
                    WorkoutExerciseInput {
                        exercise_id: row.id,
                        order: 2,
                        notes: None,
                        sets: vec![],
                    },
                    WorkoutExerciseInput {
                        exercise_id: squat.id,
                        order: 1,
                        notes: Some("heavy".to_string()),
                        sets: vec![set(2, 8), set(1, 10)],
                    },
                ],
            },
        )
        .await
        .unwrap();

    assert_eq!(workout.exercises.len(), 2);
    assert_eq!(workout.exercises[0].exercise_id, squat.id);
    assert_eq!(workout.exercises[0].exercise.category, ExerciseCategory::Strength);
    let numbers: Vec<i32> = workout.exercises[0].sets.iter().map(|s| s.set_number).collect();
    assert_eq!(numbers, vec![1, 2]);

    let since = t
        .db
        .workouts
        .count_since(user.id, date(2025, 12, 7))
        .await
        .unwrap();
    assert_eq!(since, 1);
    assert_eq!(
        t.db.workouts.count_since(user.id, date(2025, 12, 15)).await.unwrap(),
        0
    );

    assert!(t.db.workouts.delete(user.id, workout.id).await.unwrap());
    assert!(!t.db.workouts.delete(user.id, workout.id).await.unwrap());
    t.cleanup().await;
}

#[tokio::test]
async fn test_water_log_and_delete() {
    let Some(mut t) = TestDatabase::from_env().await else {
        return;
    };
    let user = t.create_user().await;
    let entry = t
        .db
        .water
        .insert(
            user.id,
            &CreateWaterRequest {
                date: date(2025, 12, 14),
                amount_ml: 500,
            },
        )
        .await
        .unwrap();
    let listed = t.db.water.list(user.id, DateRange::default()).await.unwrap();
    assert_eq!(listed.len(), 1);
    assert_eq!(listed[0].amount_ml, 500);
    assert!(t.db.water.delete(user.id, entry.id).await.unwrap());
    t.cleanup().await;
}

#[tokio::test]
async fn test_goal_filter_and_update() {
    let Some(mut t) = TestDatabase::from_env().await else {
        return;
    };
    let user = t.create_user().await;
    let goal = t
        .db
        .goals
        .insert(
            user.id,
            &CreateGoalRequest {
                goal_type: "weight_loss".to_string(),
                target_value: 65.0,
                current_value: 70.0,
                start_date: date(2025, 12, 14),
                target_date: Some(date(2026, 2, 14)),
            },
        )
        .await
        .unwrap();
    assert_eq!(goal.status, GoalStatus::Active);

    let mut stored = t.db.goals.fetch(user.id, goal.id).await.unwrap().unwrap();
    UpdateGoalRequest {
        status: Some(GoalStatus::Completed),
        ..Default::default()
    }
    .apply_to(&mut stored);
    t.db.goals.save(&stored).await.unwrap();

    let active = t
        .db
        .goals
        .list(user.id, GoalFilter { active_only: true })
        .await
        .unwrap();
    assert!(active.is_empty());
    let all = t
        .db
        .goals
        .list(user.id, GoalFilter { active_only: false })
        .await
        .unwrap();
    assert_eq!(all.len(), 1);
    assert_eq!(all[0].status, GoalStatus::Completed);

    t.cleanup().await;
}

#[tokio::test]
async fn test_seed_is_idempotent() {
    let Some(t) = TestDatabase::from_env().await else {
        return;
    };
    t.db.seed_reference_data().await.unwrap();
    let second = t.db.seed_reference_data().await.unwrap();
    assert_eq!(second.foods_added, 0);
    assert_eq!(second.exercises_added, 0);

    let hits = t
        .db
        .foods
        .search(&FoodSearch {
            search: Some("Chicken Breast".to_string()),
            limit: Some(5),
        })
        .await
        .unwrap();
    assert!(hits.iter().any(|f| f.name == "Chicken Breast" && !f.is_custom));
    t.cleanup().await;
}
