//! Request extractors: bearer authentication and validated bodies.

use axum::async_trait;
use axum::extract::{FromRequest, FromRequestParts, Query, Request};
use axum::http::header;
use axum::http::request::Parts;
use axum::{Form, Json};
use serde::de::DeserializeOwned;
use tracing::debug;

use fittrack_core::defaults::ACCESS_TOKEN_PREFIX;
use fittrack_core::{AccessTokenRepository, User, Validate};
use fittrack_crypto::hash_token;

use crate::{ApiError, AppState};

/// Pull the token out of an `Authorization: Bearer <token>` header value.
pub fn bearer_token(value: &str) -> Option<&str> {
    let (scheme, token) = value.split_once(' ')?;
    if !scheme.eq_ignore_ascii_case("bearer") {
        return None;
    }
    let token = token.trim();
    (!token.is_empty()).then_some(token)
}

/// The authenticated caller.
///
/// Rejects with 401 "Could not validate credentials" when the header is
/// missing or the token is unknown, expired or revoked.
#[derive(Debug, Clone)]
pub struct Auth {
    pub user: User,
    /// SHA-256 of the presented token, used by logout.
    pub token_hash: String,
}

#[async_trait]
impl FromRequestParts<AppState> for Auth {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let token = parts
            .headers
            .get(header::AUTHORIZATION)
            .and_then(|v| v.to_str().ok())
            .and_then(bearer_token)
            .ok_or_else(ApiError::unauthorized)?;

        if !token.starts_with(ACCESS_TOKEN_PREFIX) {
            debug!(subsystem = "api", component = "auth", "Unrecognised token format");
            return Err(ApiError::unauthorized());
        }

        let token_hash = hash_token(token);
        let user = state
            .db
            .access_tokens
            .resolve_user(&token_hash)
            .await?
            .ok_or_else(ApiError::unauthorized)?;

        Ok(Auth { user, token_hash })
    }
}

/// JSON body that has passed [`Validate`].
pub struct ValidJson<T>(pub T);

#[async_trait]
impl<S, T> FromRequest<S> for ValidJson<T>
where
    S: Send + Sync,
    T: DeserializeOwned + Validate,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state).await?;
        value.validate()?;
        Ok(ValidJson(value))
    }
}

/// Form body whose parse failures answer 400 with a JSON body.
pub struct ApiForm<T>(pub T);

#[async_trait]
impl<S, T> FromRequest<S> for ApiForm<T>
where
    S: Send + Sync,
    T: DeserializeOwned,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Form(value) = Form::<T>::from_request(req, state).await?;
        Ok(ApiForm(value))
    }
}

/// Query string whose parse failures answer 400 with a JSON body.
pub struct ApiQuery<T>(pub T);

#[async_trait]
impl<S, T> FromRequestParts<S> for ApiQuery<T>
where
    S: Send + Sync,
    T: DeserializeOwned,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Query(value) = Query::<T>::from_request_parts(parts, state).await?;
        Ok(ApiQuery(value))
    }
}
