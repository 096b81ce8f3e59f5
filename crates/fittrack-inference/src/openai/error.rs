//! Mapping of chat completion API failures onto fittrack errors.

use fittrack_core::Error;

/// Error classes reported by OpenAI-compatible endpoints.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OpenAIErrorCode {
    /// Invalid or missing API key.
    AuthenticationError,
    RateLimitExceeded,
    ModelNotFound,
    /// Prompt plus completion exceed the model context.
    ContextLengthExceeded,
    ServerError,
    Unknown,
}

impl OpenAIErrorCode {
    /// Classify from HTTP status and the `error.type` field.
    pub fn from_response(status: u16, error_type: &str) -> Self {
        match (status, error_type) {
            (401, _) => Self::AuthenticationError,
            (429, _) => Self::RateLimitExceeded,
            (404, _) | (_, "model_not_found") => Self::ModelNotFound,
            (400, _) if error_type.contains("context_length") => Self::ContextLengthExceeded,
            (500..=599, _) => Self::ServerError,
            _ => Self::Unknown,
        }
    }
}

/// Every class surfaces as `Error::Inference` so callers report it uniformly;
/// the prefix keeps the cause readable.
pub fn to_fittrack_error(code: OpenAIErrorCode, status: u16, message: &str) -> Error {
    let prefix = match code {
        OpenAIErrorCode::AuthenticationError => "Authentication failed",
        OpenAIErrorCode::RateLimitExceeded => "Rate limit exceeded",
        OpenAIErrorCode::ModelNotFound => "Model not found",
        OpenAIErrorCode::ContextLengthExceeded => "Context too long",
        OpenAIErrorCode::ServerError => "Server error",
        OpenAIErrorCode::Unknown => "Request rejected",
    };
    Error::Inference(format!("{prefix} ({status}): {message}"))
}
