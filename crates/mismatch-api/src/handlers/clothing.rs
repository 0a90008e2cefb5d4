//! Catalog HTTP handlers. These routes are public.

use axum::{
    extract::{Path, Query, State},
    Json,
};
use serde::Deserialize;

use mismatch_core::{CatalogFilter, ClothingCategory, ClothingItem, GeneratedOutfit};

use crate::{ApiError, AppState, CurrentUser};

/// Query parameters for browsing the catalog.
#[derive(Debug, Default, Deserialize)]
pub struct ClothingQuery {
    /// `top`, `bottom` or `footwear`
    pub category: Option<String>,
    pub color: Option<String>,
    /// Subcategory code or display name
    pub subcategory: Option<String>,
    /// Include placeholder items (default false)
    pub include_defaults: Option<bool>,
}

impl ClothingQuery {
    fn into_filter(self, owner_id: Option<String>) -> Result<CatalogFilter, ApiError> {
        let category = match non_blank(self.category) {
            Some(c) => Some(c.parse::<ClothingCategory>()?),
            None => None,
        };
        Ok(CatalogFilter {
            category,
            color: non_blank(self.color),
            subcategory: non_blank(self.subcategory),
            owner_id,
            include_defaults: self.include_defaults.unwrap_or(false),
        })
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// Browse the catalog.
///
/// When the caller is identified, other users' uploads are hidden.
///
/// # Returns
/// - 200 OK with matching items
/// - 400 Bad Request for an unknown category
pub async fn list_clothing(
    State(state): State<AppState>,
    user: Option<CurrentUser>,
    Query(query): Query<ClothingQuery>,
) -> Result<Json<Vec<ClothingItem>>, ApiError> {
    let filter = query.into_filter(user.map(|u| u.owner_id))?;
    let items = state.composer.catalog(&filter).await?;
    Ok(Json(items))
}

/// Every item in one category, placeholders included.
///
/// # Returns
/// - 200 OK with the items
/// - 404 Not Found for an unknown category
pub async fn wardrobe_category(
    State(state): State<AppState>,
    Path(category): Path<String>,
) -> Result<Json<Vec<ClothingItem>>, ApiError> {
    let category = category
        .parse::<ClothingCategory>()
        .map_err(|_| ApiError::NotFound(format!("Unknown category '{}'", category)))?;
    let items = state.composer.items_by_category(category).await?;
    Ok(Json(items))
}

/// Draw a random outfit from the catalog without saving it.
pub async fn generate_outfit(
    State(state): State<AppState>,
) -> Result<Json<GeneratedOutfit>, ApiError> {
    let outfit = state.composer.generate_mismatch().await?;
    Ok(Json(outfit))
}
