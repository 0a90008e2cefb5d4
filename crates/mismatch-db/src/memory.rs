//! In-memory storage backend.
//!
//! Implements both repository traits over shared process memory. Used by the
//! `STORE_BACKEND=memory` server mode and by tests that need a store without
//! PostgreSQL.
//!
//! ## Usage
//!
//! ```rust
//! use std::sync::Arc;
//! use mismatch_db::MemoryStore;
//! use mismatch_core::{ClothingRepository, OutfitRepository};
//!
//! let store = MemoryStore::new();
//! let clothing: Arc<dyn ClothingRepository> = Arc::new(store.clone());
//! let outfits: Arc<dyn OutfitRepository> = Arc::new(store.clone());
//! ```

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tracing::debug;
use uuid::Uuid;

use mismatch_core::logging::{COMPONENT_MEMORY, SUBSYSTEM_DATABASE};
use mismatch_core::{
    new_v7, CatalogFilter, ClothingCategory, ClothingItem, ClothingRepository,
    CreateClothingItemRequest, Error, NewOutfit, Outfit, OutfitRepository, OutfitSort,
    OutfitUpdate, Result,
};

#[derive(Debug, Default)]
struct State {
    clothing: Vec<ClothingItem>,
    /// Kept in insertion order.
    outfits: Vec<Outfit>,
}

/// Shared in-memory store. Clones share the same data.
#[derive(Clone, Default)]
pub struct MemoryStore {
    state: Arc<Mutex<State>>,
    /// Present only when enabled with [`MemoryStore::with_call_log`].
    call_log: Option<Arc<Mutex<Vec<String>>>>,
    latency: Option<Duration>,
    unavailable: Arc<AtomicBool>,
}

impl MemoryStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Record the name of every operation, for [`MemoryStore::calls`].
    ///
    /// Off by default so a long-running server does not accumulate a log.
    pub fn with_call_log(mut self) -> Self {
        self.call_log = Some(Arc::new(Mutex::new(Vec::new())));
        self
    }

    /// Delay every operation by `latency` before it touches the data.
    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = Some(latency);
        self
    }

    /// Make every subsequent operation fail with `StoreUnavailable`.
    pub fn set_unavailable(&self, unavailable: bool) {
        self.unavailable.store(unavailable, Ordering::SeqCst);
    }

    /// Names of the operations called so far, e.g. `"outfits.insert"`.
    ///
    /// Always empty unless the store was built with the call log enabled.
    pub fn calls(&self) -> Vec<String> {
        self.call_log
            .as_ref()
            .and_then(|log| log.lock().ok().map(|log| log.clone()))
            .unwrap_or_default()
    }

    /// Number of calls to `op` so far.
    pub fn call_count(&self, op: &str) -> usize {
        self.calls().iter().filter(|c| c.as_str() == op).count()
    }

    /// Total outfits stored, across owners.
    pub fn outfit_count(&self) -> usize {
        self.lock().map(|s| s.outfits.len()).unwrap_or(0)
    }

    async fn enter(&self, op: &str) -> Result<()> {
        if let Some(Ok(mut log)) = self.call_log.as_ref().map(|log| log.lock()) {
            log.push(op.to_string());
        }
        if let Some(latency) = self.latency {
            tokio::time::sleep(latency).await;
        }
        if self.unavailable.load(Ordering::SeqCst) {
            return Err(Error::StoreUnavailable(format!(
                "memory store offline during {}",
                op
            )));
        }
        Ok(())
    }

    fn lock(&self) -> Result<MutexGuard<'_, State>> {
        self.state
            .lock()
            .map_err(|_| Error::Internal("memory store lock poisoned".to_string()))
    }
}

/// Stamp for an update: now, but never at or before creation.
fn update_stamp(created: DateTime<Utc>) -> DateTime<Utc> {
    let floor = created + chrono::Duration::microseconds(1);
    Utc::now().max(floor)
}

/// Catalog ordering: subcategory, then color with uncolored last, then age.
fn catalog_order(a: &ClothingItem, b: &ClothingItem) -> std::cmp::Ordering {
    a.subcategory
        .cmp(&b.subcategory)
        .then_with(|| match (&a.color, &b.color) {
            (Some(x), Some(y)) => x.cmp(y),
            (Some(_), None) => std::cmp::Ordering::Less,
            (None, Some(_)) => std::cmp::Ordering::Greater,
            (None, None) => std::cmp::Ordering::Equal,
        })
        .then_with(|| a.created_at_utc.cmp(&b.created_at_utc))
}

fn sort_outfits(mut outfits: Vec<Outfit>, sort: OutfitSort) -> Vec<Outfit> {
    match sort {
        OutfitSort::Newest => {
            // Reverse first so the stable sort breaks timestamp ties by
            // latest insertion.
            outfits.reverse();
            outfits.sort_by(|a, b| b.created_at_utc.cmp(&a.created_at_utc));
        }
        OutfitSort::Oldest => outfits.sort_by(|a, b| a.created_at_utc.cmp(&b.created_at_utc)),
        OutfitSort::Alphabetical => outfits.sort_by(|a, b| a.name.cmp(&b.name)),
        OutfitSort::Unspecified => {}
    }
    outfits
}

#[async_trait]
impl ClothingRepository for MemoryStore {
    async fn insert(&self, req: CreateClothingItemRequest) -> Result<Uuid> {
        self.enter("clothing.insert").await?;
        let item = ClothingItem {
            id: new_v7(),
            category: req.category,
            subcategory: req.subcategory,
            subcategory_name: req.subcategory_name,
            color: req.color,
            neckline: req.neckline,
            length: req.length,
            image_path: req.image_path,
            is_default: req.is_default,
            owner_id: req.owner_id,
            created_at_utc: Utc::now(),
        };
        let id = item.id;
        self.lock()?.clothing.push(item);
        Ok(id)
    }

    async fn get(&self, id: Uuid) -> Result<Option<ClothingItem>> {
        self.enter("clothing.get").await?;
        Ok(self.lock()?.clothing.iter().find(|i| i.id == id).cloned())
    }

    async fn get_many(&self, ids: &[Uuid]) -> Result<Vec<ClothingItem>> {
        self.enter("clothing.get_many").await?;
        Ok(self
            .lock()?
            .clothing
            .iter()
            .filter(|i| ids.contains(&i.id))
            .cloned()
            .collect())
    }

    async fn list_by_category(&self, category: ClothingCategory) -> Result<Vec<ClothingItem>> {
        self.enter("clothing.list_by_category").await?;
        let mut items: Vec<ClothingItem> = self
            .lock()?
            .clothing
            .iter()
            .filter(|i| i.category == category)
            .cloned()
            .collect();
        items.sort_by(catalog_order);
        Ok(items)
    }

    async fn list(&self, filter: &CatalogFilter) -> Result<Vec<ClothingItem>> {
        self.enter("clothing.list").await?;
        let mut items: Vec<ClothingItem> = self
            .lock()?
            .clothing
            .iter()
            .filter(|i| filter.matches(i))
            .cloned()
            .collect();
        items.sort_by(|a, b| a.category.cmp(&b.category).then_with(|| catalog_order(a, b)));
        Ok(items)
    }

    async fn delete(&self, id: Uuid) -> Result<bool> {
        self.enter("clothing.delete").await?;
        let mut state = self.lock()?;
        let before = state.clothing.len();
        state.clothing.retain(|i| i.id != id);
        Ok(state.clothing.len() < before)
    }
}

#[async_trait]
impl OutfitRepository for MemoryStore {
    async fn insert(&self, outfit: NewOutfit) -> Result<Outfit> {
        self.enter("outfits.insert").await?;
        let record = Outfit {
            id: new_v7(),
            owner_id: outfit.owner_id,
            name: outfit.name,
            top_id: outfit.top_id,
            bottom_id: outfit.bottom_id,
            footwear_id: outfit.footwear_id,
            created_at_utc: Utc::now(),
            updated_at_utc: None,
        };
        self.lock()?.outfits.push(record.clone());

        debug!(
            subsystem = SUBSYSTEM_DATABASE,
            component = COMPONENT_MEMORY,
            op = "outfits.insert",
            outfit_id = %record.id,
            "Outfit stored"
        );
        Ok(record)
    }

    async fn get(&self, id: Uuid) -> Result<Option<Outfit>> {
        self.enter("outfits.get").await?;
        Ok(self.lock()?.outfits.iter().find(|o| o.id == id).cloned())
    }

    async fn list_by_owner(&self, owner_id: &str, sort: OutfitSort) -> Result<Vec<Outfit>> {
        self.enter("outfits.list_by_owner").await?;
        let owned: Vec<Outfit> = self
            .lock()?
            .outfits
            .iter()
            .filter(|o| o.owner_id == owner_id)
            .cloned()
            .collect();
        Ok(sort_outfits(owned, sort))
    }

    async fn count_by_owner(&self, owner_id: &str) -> Result<i64> {
        self.enter("outfits.count_by_owner").await?;
        let count = self
            .lock()?
            .outfits
            .iter()
            .filter(|o| o.owner_id == owner_id)
            .count();
        Ok(count as i64)
    }

    async fn update(&self, id: Uuid, update: &OutfitUpdate) -> Result<bool> {
        self.enter("outfits.update").await?;
        let mut state = self.lock()?;
        match state.outfits.iter_mut().find(|o| o.id == id) {
            Some(outfit) => {
                outfit.name = update.name.clone();
                outfit.top_id = update.top_id;
                outfit.bottom_id = update.bottom_id;
                outfit.footwear_id = update.footwear_id;
                outfit.updated_at_utc = Some(update_stamp(outfit.created_at_utc));
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn rename_owned(&self, id: Uuid, owner_id: &str, name: &str) -> Result<bool> {
        self.enter("outfits.rename_owned").await?;
        let mut state = self.lock()?;
        match state
            .outfits
            .iter_mut()
            .find(|o| o.id == id && o.owner_id == owner_id)
        {
            Some(outfit) => {
                outfit.name = name.to_string();
                outfit.updated_at_utc = Some(update_stamp(outfit.created_at_utc));
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn delete(&self, id: Uuid) -> Result<bool> {
        self.enter("outfits.delete").await?;
        let mut state = self.lock()?;
        let before = state.outfits.len();
        state.outfits.retain(|o| o.id != id);
        Ok(state.outfits.len() < before)
    }

    async fn delete_owned(&self, id: Uuid, owner_id: &str) -> Result<bool> {
        self.enter("outfits.delete_owned").await?;
        let mut state = self.lock()?;
        let before = state.outfits.len();
        state.outfits.retain(|o| !(o.id == id && o.owner_id == owner_id));
        Ok(state.outfits.len() < before)
    }
}
