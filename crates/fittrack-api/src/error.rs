//! HTTP error mapping.

use axum::extract::rejection::{FormRejection, JsonRejection, PathRejection, QueryRejection};
use axum::http::{header, HeaderValue, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Json;
use tracing::error;

use fittrack_crypto::CryptoError;

pub const INVALID_CREDENTIALS: &str = "Could not validate credentials";

#[derive(Debug)]
pub enum ApiError {
    Internal(fittrack_core::Error),
    Unauthorized(String),
    NotFound(String),
    BadRequest(String),
    Conflict(String),
    /// Model call failed; the message already carries its public prefix.
    Inference(String),
}

impl ApiError {
    pub fn unauthorized() -> Self {
        ApiError::Unauthorized(INVALID_CREDENTIALS.to_string())
    }

    pub fn not_found(msg: impl Into<String>) -> Self {
        ApiError::NotFound(msg.into())
    }

    pub fn bad_request(msg: impl Into<String>) -> Self {
        ApiError::BadRequest(msg.into())
    }

    /// Wrap a model failure as `"{prefix}: {cause}"`.
    pub fn inference(prefix: &str, err: fittrack_core::Error) -> Self {
        let cause = match err {
            fittrack_core::Error::Inference(msg) => msg,
            other => other.to_string(),
        };
        ApiError::Inference(format!("{prefix}: {cause}"))
    }

    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::Internal(_) | ApiError::Inference(_) => StatusCode::INTERNAL_SERVER_ERROR,
            ApiError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::Conflict(_) => StatusCode::CONFLICT,
        }
    }
}

impl From<fittrack_core::Error> for ApiError {
    fn from(err: fittrack_core::Error) -> Self {
        use fittrack_core::Error;
        match err {
            Error::NotFound(msg) => ApiError::NotFound(msg),
            Error::InvalidInput(msg) => ApiError::BadRequest(msg),
            Error::Conflict(msg) => ApiError::Conflict(msg),
            Error::Unauthorized(msg) => ApiError::Unauthorized(msg),
            Error::Database(sqlx::Error::Database(ref db_err)) if db_err.is_unique_violation() => {
                ApiError::Conflict("Resource already exists".to_string())
            }
            Error::Database(sqlx::Error::Database(ref db_err))
                if db_err.is_foreign_key_violation() =>
            {
                ApiError::BadRequest("Referenced resource does not exist".to_string())
            }
            Error::Database(sqlx::Error::Database(ref db_err)) if db_err.is_check_violation() => {
                ApiError::BadRequest(db_err.message().to_string())
            }
            other => ApiError::Internal(other),
        }
    }
}

impl From<CryptoError> for ApiError {
    fn from(err: CryptoError) -> Self {
        ApiError::Internal(fittrack_core::Error::Internal(err.to_string()))
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::BadRequest(rejection.body_text())
    }
}

impl From<QueryRejection> for ApiError {
    fn from(rejection: QueryRejection) -> Self {
        ApiError::BadRequest(rejection.body_text())
    }
}

impl From<FormRejection> for ApiError {
    fn from(rejection: FormRejection) -> Self {
        ApiError::BadRequest(rejection.body_text())
    }
}

impl From<PathRejection> for ApiError {
    fn from(rejection: PathRejection) -> Self {
        ApiError::BadRequest(rejection.body_text())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let message = match self {
            ApiError::Internal(err) => {
                error!(subsystem = "api", error = %err, "Request failed");
                "Internal server error".to_string()
            }
            ApiError::Inference(msg) => {
                error!(subsystem = "api", component = "ai", error = %msg, "Model call failed");
                msg
            }
            ApiError::Unauthorized(msg)
            | ApiError::NotFound(msg)
            | ApiError::BadRequest(msg)
            | ApiError::Conflict(msg) => msg,
        };

        let body = Json(serde_json::json!({
            "error": message,
        }));

        let mut response = (status, body).into_response();
        if status == StatusCode::UNAUTHORIZED {
            response
                .headers_mut()
                .insert(header::WWW_AUTHENTICATE, HeaderValue::from_static("Bearer"));
        }
        response
    }
}
