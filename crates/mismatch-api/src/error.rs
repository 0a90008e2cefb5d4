//! HTTP error mapping.

use axum::{http::StatusCode, response::IntoResponse, Json};
use tracing::{error, warn};

use mismatch_core::logging::SUBSYSTEM_API;

/// Error returned by handlers; rendered as `{"error": <message>}`.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("{0}")]
    BadRequest(String),
    #[error("{0}")]
    Unauthorized(String),
    #[error("{0}")]
    NotFound(String),
    #[error("{0}")]
    ServiceUnavailable(String),
    #[error(transparent)]
    Internal(mismatch_core::Error),
}

impl From<mismatch_core::Error> for ApiError {
    fn from(err: mismatch_core::Error) -> Self {
        use mismatch_core::Error;

        match err {
            Error::Validation(msg) => ApiError::BadRequest(msg),
            Error::NotFound(msg) => ApiError::NotFound(msg),
            Error::OutfitNotFound(_) | Error::MalformedOutfitId(_) => {
                ApiError::NotFound("Outfit not found".to_string())
            }
            Error::StoreUnavailable(msg) => ApiError::ServiceUnavailable(msg),
            Error::Unauthorized(msg) => ApiError::Unauthorized(msg),
            other => ApiError::Internal(other),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> axum::response::Response {
        let (status, message) = match self {
            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
            ApiError::Unauthorized(msg) => (StatusCode::UNAUTHORIZED, msg),
            ApiError::NotFound(msg) => (StatusCode::NOT_FOUND, msg),
            ApiError::ServiceUnavailable(msg) => {
                warn!(subsystem = SUBSYSTEM_API, error = %msg, "Store unavailable");
                (
                    StatusCode::SERVICE_UNAVAILABLE,
                    "Storage temporarily unavailable".to_string(),
                )
            }
            ApiError::Internal(err) => {
                error!(subsystem = SUBSYSTEM_API, error = %err, "Request failed");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal server error".to_string(),
                )
            }
        };

        let body = Json(serde_json::json!({
            "error": message,
        }));

        (status, body).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mismatch_core::Error;
    use uuid::Uuid;

    fn status_of(err: Error) -> StatusCode {
        ApiError::from(err).into_response().status()
    }

    #[test]
    fn test_status_mapping() {
        assert_eq!(
            status_of(Error::Validation("invalid top item".into())),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            status_of(Error::OutfitNotFound(Uuid::nil())),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            status_of(Error::NotFound("no top items in catalog".into())),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            status_of(Error::StoreUnavailable("outfits.insert exceeded 5000ms".into())),
            StatusCode::SERVICE_UNAVAILABLE
        );
        assert_eq!(
            status_of(Error::Unauthorized("Not authenticated".into())),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            status_of(Error::Internal("boom".into())),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_not_found_messages() {
        match ApiError::from(Error::OutfitNotFound(Uuid::nil())) {
            ApiError::NotFound(msg) => assert_eq!(msg, "Outfit not found"),
            other => panic!("unexpected {:?}", other),
        }
        match ApiError::from(Error::MalformedOutfitId("garbage".into())) {
            ApiError::NotFound(msg) => assert_eq!(msg, "Outfit not found"),
            other => panic!("unexpected {:?}", other),
        }
        match ApiError::from(Error::NotFound("no top items in catalog".into())) {
            ApiError::NotFound(msg) => assert_eq!(msg, "no top items in catalog"),
            other => panic!("unexpected {:?}", other),
        }
        // Catalog messages pass through even when they mention outfits.
        match ApiError::from(Error::NotFound("outfit catalog is empty".into())) {
            ApiError::NotFound(msg) => assert_eq!(msg, "outfit catalog is empty"),
            other => panic!("unexpected {:?}", other),
        }
    }
}
