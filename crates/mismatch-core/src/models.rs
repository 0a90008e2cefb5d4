//! Core data models for the MisMatch wardrobe service.
//!
//! These types are shared across all MisMatch crates and represent the
//! catalog, outfit and view entities.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::{Error, Result};

// =============================================================================
// CLOTHING CATALOG TYPES
// =============================================================================

/// Wearable slot a clothing item fills.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
    utoipa::ToSchema,
)]
#[serde(rename_all = "lowercase")]
pub enum ClothingCategory {
    Top,
    Bottom,
    Footwear,
}

impl ClothingCategory {
    /// Every category, in outfit slot order.
    pub const ALL: [ClothingCategory; 3] = [
        ClothingCategory::Top,
        ClothingCategory::Bottom,
        ClothingCategory::Footwear,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ClothingCategory::Top => "top",
            ClothingCategory::Bottom => "bottom",
            ClothingCategory::Footwear => "footwear",
        }
    }
}

impl fmt::Display for ClothingCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ClothingCategory {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "top" | "tops" => Ok(ClothingCategory::Top),
            "bottom" | "bottoms" => Ok(ClothingCategory::Bottom),
            "footwear" => Ok(ClothingCategory::Footwear),
            other => Err(Error::Validation(format!(
                "unknown clothing category '{}'",
                other
            ))),
        }
    }
}

/// A wearable item in the catalog.
///
/// Created by ingestion (seed loader or upload handler); read-only to the
/// outfit composer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, utoipa::ToSchema)]
pub struct ClothingItem {
    pub id: Uuid,
    pub category: ClothingCategory,
    /// Short subcategory code, e.g. "1a" or "5".
    pub subcategory: String,
    /// Display name of the subcategory, e.g. "oversized_tshirt".
    pub subcategory_name: String,
    pub color: Option<String>,
    /// Tops only: "round", "v".
    pub neckline: Option<String>,
    /// Bottoms only: "mini", "long".
    pub length: Option<String>,
    pub image_path: String,
    /// Placeholder image shown before anything is picked.
    pub is_default: bool,
    /// Present only for user-uploaded items.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub owner_id: Option<String>,
    pub created_at_utc: DateTime<Utc>,
}

/// Request for adding an item to the catalog.
#[derive(Debug, Clone, Serialize, Deserialize, utoipa::ToSchema)]
pub struct CreateClothingItemRequest {
    pub category: ClothingCategory,
    pub subcategory: String,
    pub subcategory_name: String,
    #[serde(default)]
    pub color: Option<String>,
    #[serde(default)]
    pub neckline: Option<String>,
    #[serde(default)]
    pub length: Option<String>,
    pub image_path: String,
    #[serde(default)]
    pub is_default: bool,
    #[serde(default)]
    pub owner_id: Option<String>,
}

/// Browse filter over the catalog.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CatalogFilter {
    pub category: Option<ClothingCategory>,
    pub color: Option<String>,
    pub subcategory: Option<String>,
    /// When set, seed items plus this owner's uploads are returned; other
    /// owners' uploads are hidden. When unset, every item matches.
    pub owner_id: Option<String>,
    /// Include placeholder (`is_default`) items.
    pub include_defaults: bool,
}

impl CatalogFilter {
    /// Whether `item` passes this filter.
    pub fn matches(&self, item: &ClothingItem) -> bool {
        if let Some(category) = self.category {
            if item.category != category {
                return false;
            }
        }
        if let Some(color) = &self.color {
            if item.color.as_deref() != Some(color.as_str()) {
                return false;
            }
        }
        if let Some(subcategory) = &self.subcategory {
            if &item.subcategory != subcategory && &item.subcategory_name != subcategory {
                return false;
            }
        }
        if let Some(owner) = &self.owner_id {
            if let Some(item_owner) = &item.owner_id {
                if item_owner != owner {
                    return false;
                }
            }
        }
        self.include_defaults || !item.is_default
    }
}

// =============================================================================
// OUTFIT TYPES
// =============================================================================

/// A saved combination of one top, one bottom and one pair of footwear.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, utoipa::ToSchema)]
pub struct Outfit {
    pub id: Uuid,
    pub owner_id: String,
    pub name: String,
    pub top_id: Uuid,
    pub bottom_id: Uuid,
    pub footwear_id: Uuid,
    pub created_at_utc: DateTime<Utc>,
    pub updated_at_utc: Option<DateTime<Utc>>,
}

impl Outfit {
    /// The three item references in slot order.
    pub fn item_ids(&self) -> [Uuid; 3] {
        [self.top_id, self.bottom_id, self.footwear_id]
    }
}

/// Fully resolved outfit record handed to the repository for insertion.
#[derive(Debug, Clone)]
pub struct NewOutfit {
    pub owner_id: String,
    pub name: String,
    pub top_id: Uuid,
    pub bottom_id: Uuid,
    pub footwear_id: Uuid,
}

/// Full replacement of an outfit's mutable fields.
#[derive(Debug, Clone)]
pub struct OutfitUpdate {
    pub name: String,
    pub top_id: Uuid,
    pub bottom_id: Uuid,
    pub footwear_id: Uuid,
}

/// Save request as received from the web layer.
#[derive(Debug, Clone, Default, Serialize, Deserialize, utoipa::ToSchema)]
pub struct SaveOutfitRequest {
    #[serde(default)]
    pub top_id: Option<String>,
    #[serde(default)]
    pub bottom_id: Option<String>,
    #[serde(default)]
    pub footwear_id: Option<String>,
    /// Optional custom name; blank or the placeholder triggers auto-naming.
    #[serde(default)]
    pub outfit_name: Option<String>,
}

/// Update request as received from the web layer. All fields are replaced.
#[derive(Debug, Clone, Serialize, Deserialize, utoipa::ToSchema)]
pub struct UpdateOutfitRequest {
    pub outfit_name: String,
    pub top_id: String,
    pub bottom_id: String,
    pub footwear_id: String,
}

/// Display view: an outfit with its three references resolved.
///
/// A slot is `None` when its item no longer exists in the catalog.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, utoipa::ToSchema)]
pub struct EnrichedOutfit {
    pub outfit: Outfit,
    pub top: Option<ClothingItem>,
    pub bottom: Option<ClothingItem>,
    pub footwear: Option<ClothingItem>,
}

impl EnrichedOutfit {
    /// Number of slots whose item could not be resolved.
    pub fn missing_slots(&self) -> usize {
        [&self.top, &self.bottom, &self.footwear]
            .iter()
            .filter(|slot| slot.is_none())
            .count()
    }
}

/// A randomly drawn, unsaved outfit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, utoipa::ToSchema)]
pub struct GeneratedOutfit {
    pub top: ClothingItem,
    pub bottom: ClothingItem,
    pub footwear: ClothingItem,
}

/// Ordering of an owner's outfit listing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutfitSort {
    /// Creation time, most recent first.
    #[default]
    Newest,
    /// Creation time, oldest first.
    Oldest,
    /// Name, ordinal (case-sensitive) ascending.
    Alphabetical,
    /// Insertion order.
    Unspecified,
}

impl OutfitSort {
    /// Map a `sort` query value. Unsupported values fall back to
    /// [`OutfitSort::Unspecified`] rather than erroring.
    pub fn from_param(value: &str) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "newest" => OutfitSort::Newest,
            "oldest" => OutfitSort::Oldest,
            "az" | "alphabetical" | "name" => OutfitSort::Alphabetical,
            _ => OutfitSort::Unspecified,
        }
    }
}
