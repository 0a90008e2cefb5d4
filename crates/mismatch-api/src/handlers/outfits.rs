//! Outfit HTTP handlers.
//!
//! Every route here requires a [`CurrentUser`]; reads and writes of a single
//! outfit answer 404 when the outfit belongs to someone else.

use axum::{
    extract::{Path, Query, State},
    Json,
};
use serde::Deserialize;

use mismatch_core::defaults::DEFAULT_SORT;
use mismatch_core::{
    EnrichedOutfit, Outfit, OutfitSort, SaveOutfitRequest, UpdateOutfitRequest,
};

use crate::{ApiError, AppState, CurrentUser, JsonBody};

/// Query parameters for listing outfits.
#[derive(Debug, Deserialize)]
pub struct ListOutfitsQuery {
    /// `newest` (default), `oldest` or `az`.
    pub sort: Option<String>,
}

/// Request body for renaming an outfit.
#[derive(Debug, Deserialize)]
pub struct RenameOutfitRequest {
    pub outfit_name: String,
}

/// Save an outfit for the current user.
///
/// # Returns
/// - 200 OK with `{success, message, outfit_id}`
/// - 400 Bad Request when an item is missing or does not exist, or the
///   body is not a valid save request
pub async fn save_outfit(
    State(state): State<AppState>,
    user: CurrentUser,
    JsonBody(body): JsonBody<SaveOutfitRequest>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let outfit = state.composer.save_outfit(&user.owner_id, body).await?;
    Ok(Json(serde_json::json!({
        "success": true,
        "message": format!("{} saved successfully!", outfit.name),
        "outfit_id": outfit.id,
    })))
}

/// List the current user's outfits with their items attached.
pub async fn list_outfits(
    State(state): State<AppState>,
    user: CurrentUser,
    Query(query): Query<ListOutfitsQuery>,
) -> Result<Json<Vec<EnrichedOutfit>>, ApiError> {
    let sort = OutfitSort::from_param(query.sort.as_deref().unwrap_or(DEFAULT_SORT));
    let outfits = state.composer.user_outfits(&user.owner_id, sort).await?;
    Ok(Json(outfits))
}

/// Get one of the current user's outfits.
pub async fn get_outfit(
    State(state): State<AppState>,
    user: CurrentUser,
    Path(id): Path<String>,
) -> Result<Json<Outfit>, ApiError> {
    let outfit = owned_outfit(&state, &user, &id).await?;
    Ok(Json(outfit))
}

/// Replace name and items of one of the current user's outfits.
pub async fn update_outfit(
    State(state): State<AppState>,
    user: CurrentUser,
    Path(id): Path<String>,
    JsonBody(body): JsonBody<UpdateOutfitRequest>,
) -> Result<Json<serde_json::Value>, ApiError> {
    owned_outfit(&state, &user, &id).await?;

    if !state.composer.update_outfit(&id, body).await? {
        // Deleted between the ownership check and the write.
        return Err(not_found());
    }
    Ok(Json(serde_json::json!({
        "success": true,
        "message": "Outfit updated successfully",
    })))
}

/// Rename one of the current user's outfits.
pub async fn rename_outfit(
    State(state): State<AppState>,
    user: CurrentUser,
    Path(id): Path<String>,
    JsonBody(body): JsonBody<RenameOutfitRequest>,
) -> Result<Json<serde_json::Value>, ApiError> {
    state
        .composer
        .rename_outfit(&id, &user.owner_id, &body.outfit_name)
        .await?;
    Ok(Json(serde_json::json!({ "success": true })))
}

/// Delete one of the current user's outfits.
///
/// # Returns
/// - 200 OK with `{success: true}`
/// - 404 Not Found when the outfit is unknown, already deleted, or not owned
pub async fn delete_outfit(
    State(state): State<AppState>,
    user: CurrentUser,
    Path(id): Path<String>,
) -> Result<Json<serde_json::Value>, ApiError> {
    state.composer.delete_outfit(&id, &user.owner_id).await?;
    Ok(Json(serde_json::json!({ "success": true })))
}

async fn owned_outfit(
    state: &AppState,
    user: &CurrentUser,
    id: &str,
) -> Result<Outfit, ApiError> {
    match state.composer.get_outfit(id).await? {
        Some(outfit) if outfit.owner_id == user.owner_id => Ok(outfit),
        _ => Err(not_found()),
    }
}

fn not_found() -> ApiError {
    ApiError::NotFound("Outfit not found".to_string())
}
