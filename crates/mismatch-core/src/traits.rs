//! Repository traits for the catalog and outfit stores.
//!
//! These traits define the persistence boundary. PostgreSQL and in-memory
//! backends implement them; the outfit composer only sees the traits.

use async_trait::async_trait;
use uuid::Uuid;

use crate::error::Result;
use crate::ids::parse_id;
use crate::models::*;

// =============================================================================
// CLOTHING CATALOG
// =============================================================================

/// Read path (plus ingestion hooks) of the clothing catalog.
#[async_trait]
pub trait ClothingRepository: Send + Sync {
    /// Add an item. Used by ingestion flows (seed loader, upload handler).
    async fn insert(&self, req: CreateClothingItemRequest) -> Result<Uuid>;

    /// Get an item by ID.
    async fn get(&self, id: Uuid) -> Result<Option<ClothingItem>>;

    /// Get every item whose id is in `ids`. Unknown ids are skipped.
    async fn get_many(&self, ids: &[Uuid]) -> Result<Vec<ClothingItem>>;

    /// All items in a category.
    async fn list_by_category(&self, category: ClothingCategory) -> Result<Vec<ClothingItem>>;

    /// Items matching a browse filter.
    async fn list(&self, filter: &CatalogFilter) -> Result<Vec<ClothingItem>>;

    /// Remove an item. Ingestion/admin only; the composer never deletes.
    async fn delete(&self, id: Uuid) -> Result<bool>;

    /// Look an item up by its boundary string form.
    ///
    /// A malformed id is reported as "does not exist", never as an error.
    async fn find_by_ref(&self, id: &str) -> Result<Option<ClothingItem>> {
        match parse_id(id) {
            Some(id) => self.get(id).await,
            None => Ok(None),
        }
    }
}

// =============================================================================
// OUTFITS
// =============================================================================

/// Persistence of outfit records. No business validation happens here.
#[async_trait]
pub trait OutfitRepository: Send + Sync {
    /// Insert an outfit, assigning its id and creation timestamp.
    async fn insert(&self, outfit: NewOutfit) -> Result<Outfit>;

    /// Get an outfit by ID.
    async fn get(&self, id: Uuid) -> Result<Option<Outfit>>;

    /// All outfits owned by `owner_id`, in the requested order.
    async fn list_by_owner(&self, owner_id: &str, sort: OutfitSort) -> Result<Vec<Outfit>>;

    /// Number of outfits owned by `owner_id`.
    async fn count_by_owner(&self, owner_id: &str) -> Result<i64>;

    /// Replace name and references, stamping the update time.
    ///
    /// Returns `false` when no outfit has this id.
    async fn update(&self, id: Uuid, update: &OutfitUpdate) -> Result<bool>;

    /// Rename an outfit only if it belongs to `owner_id`.
    async fn rename_owned(&self, id: Uuid, owner_id: &str, name: &str) -> Result<bool>;

    /// Delete by id alone.
    async fn delete(&self, id: Uuid) -> Result<bool>;

    /// Delete only if the outfit belongs to `owner_id`.
    async fn delete_owned(&self, id: Uuid, owner_id: &str) -> Result<bool>;
}
