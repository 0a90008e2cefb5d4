//! Request extractors.

use async_trait::async_trait;
use axum::extract::{FromRequest, FromRequestParts, Request};
use axum::http::request::Parts;
use axum::Json;
use serde::de::DeserializeOwned;

use mismatch_core::defaults::USER_ID_HEADER;

use crate::error::ApiError;

/// Authenticated owner id, taken from the `X-User-Id` header that the
/// session layer in front of this service sets.
///
/// Rejects with 401 when the header is missing or blank. Wrap in `Option`
/// for routes where a user is optional.
#[derive(Debug, Clone)]
pub struct CurrentUser {
    pub owner_id: String,
}

#[async_trait]
impl<S> FromRequestParts<S> for CurrentUser
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let owner_id = parts
            .headers
            .get(USER_ID_HEADER)
            .and_then(|v| v.to_str().ok())
            .map(str::trim)
            .filter(|v| !v.is_empty())
            .ok_or_else(|| ApiError::Unauthorized("Not authenticated".to_string()))?;

        Ok(CurrentUser {
            owner_id: owner_id.to_string(),
        })
    }
}

/// JSON request body whose rejections render as `{"error": ...}` with 400.
///
/// Covers a missing content type, malformed JSON and fields of the wrong
/// type or missing entirely.
#[derive(Debug, Clone)]
pub struct JsonBody<T>(pub T);

#[async_trait]
impl<S, T> FromRequest<S> for JsonBody<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        match Json::<T>::from_request(req, state).await {
            Ok(Json(value)) => Ok(JsonBody(value)),
            Err(rejection) => Err(ApiError::BadRequest(rejection.body_text())),
        }
    }
}
