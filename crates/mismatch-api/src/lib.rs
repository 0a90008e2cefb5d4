//! # mismatch-api
//!
//! HTTP surface and outfit composer for the MisMatch wardrobe service.
//!
//! The binary in `main.rs` wires configuration, logging and storage; this
//! library holds everything a test needs to drive the router in-process.

pub mod config;
pub mod error;
pub mod extract;
pub mod handlers;
pub mod services;

use std::sync::Arc;

use axum::{
    routing::{get, patch},
    Router,
};
use tower_http::request_id::{
    MakeRequestId, PropagateRequestIdLayer, RequestId, SetRequestIdLayer,
};
use tower_http::trace::TraceLayer;
use utoipa::OpenApi;
use uuid::Uuid;

pub use config::{AppConfig, StoreBackend};
pub use error::ApiError;
pub use extract::{CurrentUser, JsonBody};
pub use services::{ComposerConfig, OutfitComposer};

/// Application state shared across handlers.
#[derive(Clone)]
pub struct AppState {
    pub composer: Arc<OutfitComposer>,
}

impl AppState {
    pub fn new(composer: OutfitComposer) -> Self {
        Self {
            composer: Arc::new(composer),
        }
    }
}

/// OpenAPI component schemas of the public models.
#[derive(OpenApi)]
#[openapi(
    info(
        title = "MisMatch Wardrobe API",
        description = "Outfit composition and clothing catalog"
    ),
    components(schemas(
        mismatch_core::ClothingCategory,
        mismatch_core::ClothingItem,
        mismatch_core::Outfit,
        mismatch_core::EnrichedOutfit,
        mismatch_core::GeneratedOutfit,
        mismatch_core::SaveOutfitRequest,
        mismatch_core::UpdateOutfitRequest,
    )),
    tags(
        (name = "Outfits", description = "Saved outfit CRUD"),
        (name = "Catalog", description = "Clothing catalog browse and random outfits"),
        (name = "System", description = "Health checks")
    )
)]
pub struct ApiDoc;

#[derive(Clone, Default)]
struct MakeRequestUuidV7;

impl MakeRequestId for MakeRequestUuidV7 {
    fn make_request_id<B>(&mut self, _request: &axum::http::Request<B>) -> Option<RequestId> {
        let id = Uuid::now_v7().to_string().parse().ok()?;
        Some(RequestId::new(id))
    }
}

/// Build the application router.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        // System
        .route("/health", get(handlers::health_check))
        .route("/openapi.json", get(handlers::openapi_json))
        // Outfits
        .route(
            "/api/v1/outfits",
            get(handlers::outfits::list_outfits).post(handlers::outfits::save_outfit),
        )
        .route(
            "/api/v1/outfits/:id",
            get(handlers::outfits::get_outfit)
                .put(handlers::outfits::update_outfit)
                .delete(handlers::outfits::delete_outfit),
        )
        .route(
            "/api/v1/outfits/:id/name",
            patch(handlers::outfits::rename_outfit),
        )
        // Catalog
        .route("/api/v1/clothing", get(handlers::clothing::list_clothing))
        .route(
            "/api/v1/wardrobe/:category",
            get(handlers::clothing::wardrobe_category),
        )
        .route("/api/v1/generate", get(handlers::clothing::generate_outfit))
        // Middleware
        .layer(TraceLayer::new_for_http())
        .layer(PropagateRequestIdLayer::x_request_id())
        .layer(SetRequestIdLayer::x_request_id(MakeRequestUuidV7))
        .with_state(state)
}
