//! Outfit composition service.
//!
//! The composer is the only component that decides whether an outfit is
//! valid. It resolves item references against the catalog before saving,
//! names outfits, enriches stored outfits with their items for display, and
//! scopes destructive operations to the owning user.
//!
//! ## Write strictness, read robustness
//!
//! - Save: every reference must resolve, otherwise `Validation` and no write.
//! - Update: references are parsed but not looked up.
//! - List: a reference that no longer resolves becomes an empty slot.
//!
//! Every repository call is bounded by `ComposerConfig::store_timeout`; a
//! call that overruns fails with `StoreUnavailable` and is not retried.

use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use std::time::{Duration, Instant};

use rand::seq::SliceRandom;
use tracing::{debug, info};
use uuid::Uuid;

use mismatch_core::defaults::{
    MAX_OUTFIT_NAME_LEN, OUTFIT_NAME_PREFIX, OUTFIT_PLACEHOLDER_NAME, STORE_TIMEOUT_MS,
};
use mismatch_core::logging::SUBSYSTEM_COMPOSER;
use mismatch_core::{
    bounded, parse_id, CatalogFilter, ClothingCategory, ClothingItem, ClothingRepository,
    EnrichedOutfit, Error, GeneratedOutfit, NewOutfit, Outfit, OutfitRepository, OutfitSort,
    OutfitUpdate, Result, SaveOutfitRequest, UpdateOutfitRequest,
};

/// Message shown when a save request leaves a slot empty.
pub const INCOMPLETE_OUTFIT_MSG: &str = "Please select all clothing items before saving";

/// Composer behaviour knobs.
#[derive(Debug, Clone)]
pub struct ComposerConfig {
    /// Auto-generated names are `"<name_prefix> N"`.
    pub name_prefix: String,
    /// A save whose name equals this literal is treated as unnamed.
    pub placeholder_name: String,
    /// Deadline for each repository call.
    pub store_timeout: Duration,
    /// Require each reference to belong to its slot's category.
    pub enforce_categories: bool,
}

impl Default for ComposerConfig {
    fn default() -> Self {
        Self {
            name_prefix: OUTFIT_NAME_PREFIX.to_string(),
            placeholder_name: OUTFIT_PLACEHOLDER_NAME.to_string(),
            store_timeout: Duration::from_millis(STORE_TIMEOUT_MS),
            enforce_categories: false,
        }
    }
}

/// Validates, names, enriches and scopes outfit operations.
#[derive(Clone)]
pub struct OutfitComposer {
    clothing: Arc<dyn ClothingRepository>,
    outfits: Arc<dyn OutfitRepository>,
    config: ComposerConfig,
}

impl OutfitComposer {
    pub fn new(
        clothing: Arc<dyn ClothingRepository>,
        outfits: Arc<dyn OutfitRepository>,
        config: ComposerConfig,
    ) -> Self {
        Self {
            clothing,
            outfits,
            config,
        }
    }

    pub fn config(&self) -> &ComposerConfig {
        &self.config
    }

    // =========================================================================
    // SAVE
    // =========================================================================

    /// Validate and persist a new outfit for `owner_id`.
    ///
    /// Fails with `Validation` when the owner is empty, a slot is missing,
    /// a reference does not resolve, or the name is too long. Nothing is
    /// written on failure.
    pub async fn save_outfit(&self, owner_id: &str, req: SaveOutfitRequest) -> Result<Outfit> {
        let start = Instant::now();
        let owner_id = owner_id.trim();
        if owner_id.is_empty() {
            return Err(Error::Validation("owner id is required".to_string()));
        }

        let (Some(top_ref), Some(bottom_ref), Some(footwear_ref)) = (
            non_blank(req.top_id.as_deref()),
            non_blank(req.bottom_id.as_deref()),
            non_blank(req.footwear_id.as_deref()),
        ) else {
            return Err(Error::Validation(INCOMPLETE_OUTFIT_MSG.to_string()));
        };

        let custom_name = self.custom_name(req.outfit_name.as_deref())?;

        let top = self.resolve_slot(ClothingCategory::Top, top_ref).await?;
        let bottom = self.resolve_slot(ClothingCategory::Bottom, bottom_ref).await?;
        let footwear = self
            .resolve_slot(ClothingCategory::Footwear, footwear_ref)
            .await?;

        let name = match custom_name {
            Some(name) => name,
            None => self.next_auto_name(owner_id).await?,
        };

        let outfit = self
            .bounded(
                "outfits.insert",
                self.outfits.insert(NewOutfit {
                    owner_id: owner_id.to_string(),
                    name,
                    top_id: top.id,
                    bottom_id: bottom.id,
                    footwear_id: footwear.id,
                }),
            )
            .await?;

        info!(
            subsystem = SUBSYSTEM_COMPOSER,
            op = "save_outfit",
            outfit_id = %outfit.id,
            owner_id = %outfit.owner_id,
            name = %outfit.name,
            duration_ms = start.elapsed().as_millis() as u64,
            "Outfit saved"
        );
        Ok(outfit)
    }

    /// The user-chosen name, or `None` when auto-naming applies.
    fn custom_name(&self, name: Option<&str>) -> Result<Option<String>> {
        let Some(name) = non_blank(name) else {
            return Ok(None);
        };
        if name == self.config.placeholder_name {
            return Ok(None);
        }
        check_name_len(name)?;
        Ok(Some(name.to_string()))
    }

    /// `"<prefix> N"` with N one past the owner's current outfit count.
    ///
    /// Two concurrent saves by one owner can compute the same N. The names
    /// collide; the ids do not.
    async fn next_auto_name(&self, owner_id: &str) -> Result<String> {
        let count = self
            .bounded("outfits.count_by_owner", self.outfits.count_by_owner(owner_id))
            .await?;
        let name = format!("{} {}", self.config.name_prefix, count + 1);
        debug!(
            subsystem = SUBSYSTEM_COMPOSER,
            op = "auto_name",
            owner_id,
            existing = count,
            name = %name,
            "Generated outfit name"
        );
        Ok(name)
    }

    async fn resolve_slot(&self, slot: ClothingCategory, item_ref: &str) -> Result<ClothingItem> {
        let item = self
            .bounded("clothing.find_by_ref", self.clothing.find_by_ref(item_ref))
            .await?;

        match item {
            Some(item) if !self.config.enforce_categories || item.category == slot => Ok(item),
            Some(item) => {
                debug!(
                    subsystem = SUBSYSTEM_COMPOSER,
                    op = "resolve_slot",
                    slot = %slot,
                    item_id = %item.id,
                    category = %item.category,
                    "Rejected item from the wrong category"
                );
                Err(invalid_slot(slot))
            }
            None => {
                debug!(
                    subsystem = SUBSYSTEM_COMPOSER,
                    op = "resolve_slot",
                    slot = %slot,
                    item_ref,
                    "Item reference does not resolve"
                );
                Err(invalid_slot(slot))
            }
        }
    }

    // =========================================================================
    // READ
    // =========================================================================

    /// Every outfit owned by `owner_id`, with items attached.
    ///
    /// Items are fetched in one batch. A reference that no longer resolves
    /// leaves its slot `None` instead of failing the listing.
    pub async fn user_outfits(
        &self,
        owner_id: &str,
        sort: OutfitSort,
    ) -> Result<Vec<EnrichedOutfit>> {
        let start = Instant::now();
        let owner_id = owner_id.trim();
        if owner_id.is_empty() {
            return Err(Error::Validation("owner id is required".to_string()));
        }

        let outfits = self
            .bounded("outfits.list_by_owner", self.outfits.list_by_owner(owner_id, sort))
            .await?;

        let ids: Vec<Uuid> = outfits
            .iter()
            .flat_map(|o| o.item_ids())
            .collect::<HashSet<_>>()
            .into_iter()
            .collect();
        let items: HashMap<Uuid, ClothingItem> = if ids.is_empty() {
            HashMap::new()
        } else {
            self.bounded("clothing.get_many", self.clothing.get_many(&ids))
                .await?
                .into_iter()
                .map(|item| (item.id, item))
                .collect()
        };

        let enriched: Vec<EnrichedOutfit> = outfits
            .into_iter()
            .map(|outfit| EnrichedOutfit {
                top: items.get(&outfit.top_id).cloned(),
                bottom: items.get(&outfit.bottom_id).cloned(),
                footwear: items.get(&outfit.footwear_id).cloned(),
                outfit,
            })
            .collect();

        let missing_items: usize = enriched.iter().map(|e| e.missing_slots()).sum();
        debug!(
            subsystem = SUBSYSTEM_COMPOSER,
            op = "user_outfits",
            owner_id,
            sort = ?sort,
            result_count = enriched.len(),
            missing_items,
            duration_ms = start.elapsed().as_millis() as u64,
            "Listed outfits"
        );
        Ok(enriched)
    }

    /// Look an outfit up by id. No ownership check happens here.
    ///
    /// A malformed id is reported as absent.
    pub async fn get_outfit(&self, outfit_id: &str) -> Result<Option<Outfit>> {
        let Some(id) = parse_id(outfit_id) else {
            return Ok(None);
        };
        self.bounded("outfits.get", self.outfits.get(id)).await
    }

    // =========================================================================
    // UPDATE
    // =========================================================================

    /// Replace name and all three references.
    ///
    /// References are parsed but not checked against the catalog. Returns
    /// `false` when no outfit has this id.
    pub async fn update_outfit(&self, outfit_id: &str, req: UpdateOutfitRequest) -> Result<bool> {
        let name = req.outfit_name.trim();
        if name.is_empty() {
            return Err(Error::Validation("outfit name must not be empty".to_string()));
        }
        check_name_len(name)?;

        let update = OutfitUpdate {
            name: name.to_string(),
            top_id: parse_slot(ClothingCategory::Top, &req.top_id)?,
            bottom_id: parse_slot(ClothingCategory::Bottom, &req.bottom_id)?,
            footwear_id: parse_slot(ClothingCategory::Footwear, &req.footwear_id)?,
        };

        let Some(id) = parse_id(outfit_id) else {
            return Ok(false);
        };

        let matched = self
            .bounded("outfits.update", self.outfits.update(id, &update))
            .await?;
        if matched {
            info!(
                subsystem = SUBSYSTEM_COMPOSER,
                op = "update_outfit",
                outfit_id = %id,
                "Outfit updated"
            );
        } else {
            debug!(
                subsystem = SUBSYSTEM_COMPOSER,
                op = "update_outfit",
                outfit_id = %id,
                "Update matched no outfit"
            );
        }
        Ok(matched)
    }

    /// Rename an outfit owned by `owner_id`.
    pub async fn rename_outfit(&self, outfit_id: &str, owner_id: &str, name: &str) -> Result<()> {
        let owner_id = owner_id.trim();
        if owner_id.is_empty() {
            return Err(Error::Validation("owner id is required".to_string()));
        }
        let name = name.trim();
        if name.is_empty() {
            return Err(Error::Validation("outfit name must not be empty".to_string()));
        }
        check_name_len(name)?;

        let id = parse_id(outfit_id).ok_or_else(|| outfit_not_found(outfit_id))?;
        let renamed = self
            .bounded("outfits.rename_owned", self.outfits.rename_owned(id, owner_id, name))
            .await?;
        if !renamed {
            return Err(Error::OutfitNotFound(id));
        }
        Ok(())
    }

    // =========================================================================
    // DELETE
    // =========================================================================

    /// Delete an outfit only if it belongs to `owner_id`.
    ///
    /// A foreign, unknown or already-deleted outfit yields `NotFound` and
    /// leaves the store untouched.
    pub async fn delete_outfit(&self, outfit_id: &str, owner_id: &str) -> Result<()> {
        let owner_id = owner_id.trim();
        if owner_id.is_empty() {
            return Err(Error::Validation("owner id is required".to_string()));
        }
        let id = parse_id(outfit_id).ok_or_else(|| outfit_not_found(outfit_id))?;

        let deleted = self
            .bounded("outfits.delete_owned", self.outfits.delete_owned(id, owner_id))
            .await?;
        if !deleted {
            debug!(
                subsystem = SUBSYSTEM_COMPOSER,
                op = "delete_outfit",
                outfit_id = %id,
                owner_id,
                "No outfit with this id for this owner"
            );
            return Err(Error::OutfitNotFound(id));
        }

        info!(
            subsystem = SUBSYSTEM_COMPOSER,
            op = "delete_outfit",
            outfit_id = %id,
            owner_id,
            "Outfit deleted"
        );
        Ok(())
    }

    /// Delete by id alone, for callers that already authorized the request.
    ///
    /// Returns whether an outfit was removed.
    pub async fn delete_outfit_preauthorized(&self, outfit_id: &str) -> Result<bool> {
        let Some(id) = parse_id(outfit_id) else {
            return Ok(false);
        };
        let deleted = self
            .bounded("outfits.delete", self.outfits.delete(id))
            .await?;
        if deleted {
            info!(
                subsystem = SUBSYSTEM_COMPOSER,
                op = "delete_outfit_preauthorized",
                outfit_id = %id,
                "Outfit deleted without owner scope"
            );
        }
        Ok(deleted)
    }

    // =========================================================================
    // CATALOG
    // =========================================================================

    /// Catalog items matching `filter`.
    pub async fn catalog(&self, filter: &CatalogFilter) -> Result<Vec<ClothingItem>> {
        self.bounded("clothing.list", self.clothing.list(filter)).await
    }

    /// Every item in `category`, placeholders included.
    pub async fn items_by_category(&self, category: ClothingCategory) -> Result<Vec<ClothingItem>> {
        self.bounded(
            "clothing.list_by_category",
            self.clothing.list_by_category(category),
        )
        .await
    }

    /// Draw one random non-placeholder item per category. Nothing is saved.
    pub async fn generate_mismatch(&self) -> Result<GeneratedOutfit> {
        let top = self.random_item(ClothingCategory::Top).await?;
        let bottom = self.random_item(ClothingCategory::Bottom).await?;
        let footwear = self.random_item(ClothingCategory::Footwear).await?;

        debug!(
            subsystem = SUBSYSTEM_COMPOSER,
            op = "generate_mismatch",
            top_id = %top.id,
            bottom_id = %bottom.id,
            footwear_id = %footwear.id,
            "Generated mismatch outfit"
        );
        Ok(GeneratedOutfit {
            top,
            bottom,
            footwear,
        })
    }

    async fn random_item(&self, category: ClothingCategory) -> Result<ClothingItem> {
        let items = self.items_by_category(category).await?;
        pick_random(items)
            .ok_or_else(|| Error::NotFound(format!("no {} items in catalog", category)))
    }

    async fn bounded<T, F>(&self, op: &'static str, fut: F) -> Result<T>
    where
        F: std::future::Future<Output = Result<T>>,
    {
        bounded(op, self.config.store_timeout, fut).await
    }
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

fn check_name_len(name: &str) -> Result<()> {
    if name.chars().count() > MAX_OUTFIT_NAME_LEN {
        return Err(Error::Validation(format!(
            "outfit name must be at most {} characters",
            MAX_OUTFIT_NAME_LEN
        )));
    }
    Ok(())
}

fn invalid_slot(slot: ClothingCategory) -> Error {
    Error::Validation(format!("invalid {} item", slot))
}

fn parse_slot(slot: ClothingCategory, value: &str) -> Result<Uuid> {
    parse_id(value).ok_or_else(|| invalid_slot(slot))
}

fn outfit_not_found(raw: &str) -> Error {
    Error::MalformedOutfitId(raw.trim().to_string())
}

/// Uniform choice among non-placeholder items.
fn pick_random(items: Vec<ClothingItem>) -> Option<ClothingItem> {
    let candidates: Vec<ClothingItem> = items.into_iter().filter(|i| !i.is_default).collect();
    candidates.choose(&mut rand::thread_rng()).cloned()
}
