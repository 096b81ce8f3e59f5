//! fittrack-api - HTTP API server for fittrack

pub mod config;
pub mod error;
pub mod extract;
pub mod handlers;
pub mod services;

use std::num::NonZeroU32;
use std::sync::Arc;
use std::time::Duration;

use axum::{
    extract::State,
    http::{header, HeaderValue, Method, StatusCode},
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use governor::{Quota, RateLimiter};
use tower_http::{
    catch_panic::CatchPanicLayer,
    cors::{AllowOrigin, CorsLayer},
    limit::RequestBodyLimitLayer,
    request_id::{MakeRequestId, PropagateRequestIdLayer, RequestId, SetRequestIdLayer},
    services::{ServeDir, ServeFile},
    trace::TraceLayer,
};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;
use uuid::Uuid;

use fittrack_crypto::PasswordParams;
use fittrack_db::Database;
use fittrack_inference::NutritionParser;

pub use config::ApiConfig;
pub use error::ApiError;
pub use extract::Auth;
use services::email::EmailService;
use services::verification::VerificationTokenStore;

// =============================================================================
// REQUEST ID (UUIDv7)
// =============================================================================

/// Generates time-ordered UUIDv7 request correlation IDs.
#[derive(Clone, Default)]
pub struct MakeRequestUuidV7;

impl MakeRequestId for MakeRequestUuidV7 {
    fn make_request_id<B>(&mut self, _request: &axum::http::Request<B>) -> Option<RequestId> {
        let id = Uuid::now_v7().to_string().parse().ok()?;
        Some(RequestId::new(id))
    }
}

pub type GlobalRateLimiter = RateLimiter<
    governor::state::NotKeyed,
    governor::state::InMemoryState,
    governor::clock::DefaultClock,
>;

/// Application state shared across handlers.
#[derive(Clone)]
pub struct AppState {
    pub db: Database,
    pub parser: NutritionParser,
    pub email: Arc<EmailService>,
    /// Email verification and password reset tokens (in memory).
    pub verification: VerificationTokenStore,
    pub password_params: PasswordParams,
    pub token_ttl: chrono::Duration,
    /// Global rate limiter (None if rate limiting is disabled).
    pub rate_limiter: Option<Arc<GlobalRateLimiter>>,
}

impl AppState {
    pub fn new(
        db: Database,
        parser: NutritionParser,
        email: EmailService,
        config: &ApiConfig,
    ) -> Self {
        Self {
            db,
            parser,
            email: Arc::new(email),
            verification: VerificationTokenStore::new(),
            password_params: PasswordParams::default(),
            token_ttl: config.access_token_ttl(),
            rate_limiter: build_rate_limiter(&config.rate_limit),
        }
    }
}

pub fn build_rate_limiter(config: &config::RateLimitConfig) -> Option<Arc<GlobalRateLimiter>> {
    if !config.enabled {
        return None;
    }
    let burst = NonZeroU32::new(config.requests)?;
    let quota = Quota::with_period(Duration::from_secs(config.period_secs))?.allow_burst(burst);
    Some(Arc::new(RateLimiter::direct(quota)))
}

/// Schemas published at `/api-docs/openapi.json`.
#[derive(OpenApi)]
#[openapi(
    info(
        title = "FitTrack API",
        description = "Fitness and nutrition tracking with AI-assisted food and workout entry"
    ),
    components(schemas(
        fittrack_core::User,
        fittrack_core::CreateUserRequest,
        fittrack_core::TokenResponse,
        fittrack_core::ResetPasswordRequest,
        fittrack_core::MessageResponse,
        fittrack_core::UserProfile,
        fittrack_core::CreateProfileRequest,
        fittrack_core::ActivityLevel,
        fittrack_core::GoalType,
        fittrack_core::BodyMetric,
        fittrack_core::CreateBodyMetricRequest,
        fittrack_core::FoodItem,
        fittrack_core::CreateFoodRequest,
        fittrack_core::Exercise,
        fittrack_core::ExerciseCategory,
        fittrack_core::CreateExerciseRequest,
        fittrack_core::MealType,
        fittrack_core::MealFood,
        fittrack_core::MealLog,
        fittrack_core::MealFoodInput,
        fittrack_core::CreateMealRequest,
        fittrack_core::ExerciseSet,
        fittrack_core::WorkoutExercise,
        fittrack_core::WorkoutSession,
        fittrack_core::ExerciseSetInput,
        fittrack_core::WorkoutExerciseInput,
        fittrack_core::CreateWorkoutRequest,
        fittrack_core::WaterIntake,
        fittrack_core::CreateWaterRequest,
        fittrack_core::GoalStatus,
        fittrack_core::Goal,
        fittrack_core::CreateGoalRequest,
        fittrack_core::DashboardSummary,
        fittrack_core::ParseTextRequest,
        fittrack_core::ParseFoodResponse,
        fittrack_core::ParsedExercise,
        fittrack_core::ParseWorkoutResponse,
        fittrack_core::MealSuggestionsResponse,
    )),
    tags(
        (name = "Accounts", description = "Registration, login and email verification"),
        (name = "Tracking", description = "Profile, body metrics, meals, workouts, water and goals"),
        (name = "Catalogue", description = "Food database and exercise library"),
        (name = "AI", description = "Natural-language parsing and meal suggestions"),
        (name = "System", description = "Health checks")
    )
)]
pub struct ApiDoc;

// =============================================================================
// CORS CONFIGURATION HELPER
// =============================================================================

/// Parse a comma-separated origin whitelist, skipping invalid entries.
pub fn parse_allowed_origins(origins: &str) -> Vec<HeaderValue> {
    origins
        .split(',')
        .filter_map(|s| {
            let trimmed = s.trim();
            if trimmed.is_empty() {
                return None;
            }
            match trimmed.parse::<HeaderValue>() {
                Ok(v) => Some(v),
                Err(e) => {
                    tracing::warn!("Invalid CORS origin '{}': {}", trimmed, e);
                    None
                }
            }
        })
        .collect()
}

// =============================================================================
// RATE LIMITING MIDDLEWARE
// =============================================================================

async fn rate_limit_middleware(
    State(state): State<AppState>,
    request: axum::extract::Request,
    next: axum::middleware::Next,
) -> Result<impl IntoResponse, (StatusCode, Json<serde_json::Value>)> {
    if let Some(limiter) = &state.rate_limiter {
        if limiter.check().is_err() {
            tracing::warn!("Rate limit exceeded");
            return Err((
                StatusCode::TOO_MANY_REQUESTS,
                Json(serde_json::json!({
                    "error": "Too many requests. Please wait before retrying."
                })),
            ));
        }
    }
    Ok(next.run(request).await)
}

// =============================================================================
// ROUTER
// =============================================================================

/// Build the full application router.
pub fn build_router(state: AppState, config: &ApiConfig) -> Router {
    use handlers::{
        accounts, ai, body_metrics, dashboard, exercises, foods, goals, meals, profile, system,
        water, workouts,
    };

    let mut app = Router::new()
        .route("/health", get(system::health_check))
        .merge(SwaggerUi::new("/docs").url("/api-docs/openapi.json", ApiDoc::openapi()))
        // Accounts
        .route("/register", post(accounts::register))
        .route("/token", post(accounts::login))
        .route("/logout", post(accounts::logout))
        .route("/users/me", get(accounts::current_user))
        .route("/verify", get(accounts::verify_email))
        .route("/resend-verification", post(accounts::resend_verification))
        .route("/forgot-password", post(accounts::forgot_password))
        .route("/reset-password", post(accounts::reset_password))
        // Profile and body metrics
        .route(
            "/profile",
            get(profile::get_profile)
                .post(profile::create_profile)
                .put(profile::update_profile),
        )
        .route(
            "/body-metrics",
            get(body_metrics::list_body_metrics).post(body_metrics::create_body_metric),
        )
        .route(
            "/body-metrics/:id",
            axum::routing::delete(body_metrics::delete_body_metric),
        )
        // Catalogue
        .route("/foods", get(foods::search_foods).post(foods::create_food))
        .route("/foods/:id", get(foods::get_food))
        .route(
            "/exercises",
            get(exercises::search_exercises).post(exercises::create_exercise),
        )
        .route("/exercises/:id", get(exercises::get_exercise))
        // Logs
        .route("/meals", get(meals::list_meals).post(meals::create_meal))
        .route("/meals/:id", get(meals::get_meal).delete(meals::delete_meal))
        .route(
            "/workouts",
            get(workouts::list_workouts).post(workouts::create_workout),
        )
        .route(
            "/workouts/:id",
            get(workouts::get_workout).delete(workouts::delete_workout),
        )
        .route("/water", get(water::list_water).post(water::log_water))
        .route("/water/:id", axum::routing::delete(water::delete_water))
        .route("/goals", get(goals::list_goals).post(goals::create_goal))
        .route(
            "/goals/:id",
            axum::routing::patch(goals::update_goal).delete(goals::delete_goal),
        )
        .route("/dashboard", get(dashboard::get_dashboard))
        // AI
        .route("/ai/parse-food", post(ai::parse_food))
        .route("/ai/parse-workout", post(ai::parse_workout))
        .route("/ai/meal-suggestions", get(ai::meal_suggestions));

    if let Some(dir) = &config.static_dir {
        app = app
            .route_service("/", ServeFile::new(dir.join("index.html")))
            .nest_service("/static", ServeDir::new(dir));
    }

    app.layer(axum::middleware::from_fn_with_state(
        state.clone(),
        rate_limit_middleware,
    ))
    .layer(TraceLayer::new_for_http())
    .layer(PropagateRequestIdLayer::x_request_id())
    .layer(SetRequestIdLayer::x_request_id(MakeRequestUuidV7))
    .layer(CatchPanicLayer::new())
    .layer(
        CorsLayer::new()
            .allow_origin(AllowOrigin::list(parse_allowed_origins(
                &config.allowed_origins,
            )))
            .allow_methods([
                Method::GET,
                Method::POST,
                Method::PUT,
                Method::PATCH,
                Method::DELETE,
                Method::OPTIONS,
            ])
            .allow_headers([header::AUTHORIZATION, header::CONTENT_TYPE, header::ACCEPT])
            .allow_credentials(true)
            .max_age(Duration::from_secs(3600)),
    )
    .layer(RequestBodyLimitLayer::new(config::MAX_BODY_BYTES))
    .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_allowed_origins() {
        let origins = parse_allowed_origins("https://fit.example.com, http://localhost:3000,,");
        assert_eq!(origins.len(), 2);
        assert_eq!(origins[0], "https://fit.example.com");
        assert_eq!(origins[1], "http://localhost:3000");
    }

    #[test]
    fn test_parse_allowed_origins_skips_invalid() {
        let origins = parse_allowed_origins("http://bad\u{7f}.example,http://fine.example");
        assert_eq!(origins.len(), 1);
        assert_eq!(origins[0], "http://fine.example");
    }

    #[test]
    fn test_rate_limiter_disabled() {
        let config = config::RateLimitConfig {
            enabled: false,
            ..Default::default()
        };
        assert!(build_rate_limiter(&config).is_none());
    }

    #[test]
    fn test_rate_limiter_burst() {
        let config = config::RateLimitConfig {
            enabled: true,
            requests: 2,
            period_secs: 60,
        };
        let limiter = build_rate_limiter(&config).unwrap();
        assert!(limiter.check().is_ok());
        assert!(limiter.check().is_ok());
        assert!(limiter.check().is_err());
    }

    #[test]
    fn test_openapi_lists_schemas() {
        let doc = ApiDoc::openapi();
        let schemas = &doc.components.as_ref().unwrap().schemas;
        assert!(schemas.contains_key("MealLog"));
        assert!(schemas.contains_key("DashboardSummary"));
        assert!(schemas.contains_key("ExerciseCategory"));
    }
}
