//! HTTP handlers.

pub mod clothing;
pub mod outfits;

use axum::{response::IntoResponse, Json};
use utoipa::OpenApi;

use crate::ApiDoc;

/// Liveness probe.
pub async fn health_check() -> impl IntoResponse {
    Json(serde_json::json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION"),
    }))
}

/// Serve the OpenAPI document describing the public models.
pub async fn openapi_json() -> impl IntoResponse {
    Json(ApiDoc::openapi())
}
