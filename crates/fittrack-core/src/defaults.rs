//! Default values and limits shared across crates.

/// Default page size for catalogue searches.
pub const DEFAULT_SEARCH_LIMIT: i64 = 50;

/// Upper bound for a catalogue search page.
pub const MAX_SEARCH_LIMIT: i64 = 200;

/// Default access token lifetime in minutes.
pub const ACCESS_TOKEN_EXPIRE_MINUTES: i64 = 30;

/// Lifetime of email verification and password reset tokens, in hours.
pub const VERIFICATION_TOKEN_TTL_HOURS: i64 = 24;

/// Prefix carried by every issued access token.
pub const ACCESS_TOKEN_PREFIX: &str = "ft_at_";

/// Maximum length of free text sent to the AI parsing endpoints.
pub const AI_TEXT_MAX_LEN: usize = 1000;

/// Number of meal suggestions returned.
pub const MEAL_SUGGESTION_COUNT: usize = 5;

/// Dashboard "this week" window in days.
pub const DASHBOARD_WEEK_DAYS: i64 = 7;

/// Default calories burned per minute for a library exercise.
pub const DEFAULT_CALORIES_PER_MINUTE: f64 = 5.0;

/// Clamp a caller supplied search limit into `1..=MAX_SEARCH_LIMIT`.
pub fn clamp_search_limit(limit: Option<i64>) -> i64 {
    limit
        .unwrap_or(DEFAULT_SEARCH_LIMIT)
        .clamp(1, MAX_SEARCH_LIMIT)
}
