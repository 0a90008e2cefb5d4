//! Clothing catalog repository implementation.

use async_trait::async_trait;
use chrono::Utc;
use sqlx::postgres::PgRow;
use sqlx::{Pool, Postgres, Row};
use tracing::debug;
use uuid::Uuid;

use mismatch_core::logging::{COMPONENT_CLOTHING, SUBSYSTEM_DATABASE};
use mismatch_core::{
    new_v7, CatalogFilter, ClothingCategory, ClothingItem, ClothingRepository,
    CreateClothingItemRequest, Error, Result,
};

const CLOTHING_COLUMNS: &str = "id, category, subcategory, subcategory_name, color, neckline, \
     length, image_path, is_default, owner_id, created_at_utc";

/// PostgreSQL implementation of ClothingRepository.
pub struct PgClothingRepository {
    pool: Pool<Postgres>,
}

impl PgClothingRepository {
    /// Create a new PgClothingRepository with the given connection pool.
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }
}

fn row_to_item(r: &PgRow) -> Result<ClothingItem> {
    let category: String = r.get("category");
    let category = category.parse::<ClothingCategory>().map_err(|_| {
        Error::Internal(format!("unknown category '{}' in clothing row", category))
    })?;

    Ok(ClothingItem {
        id: r.get("id"),
        category,
        subcategory: r.get("subcategory"),
        subcategory_name: r.get("subcategory_name"),
        color: r.get("color"),
        neckline: r.get("neckline"),
        length: r.get("length"),
        image_path: r.get("image_path"),
        is_default: r.get("is_default"),
        owner_id: r.get("owner_id"),
        created_at_utc: r.get("created_at_utc"),
    })
}

#[async_trait]
impl ClothingRepository for PgClothingRepository {
    async fn insert(&self, req: CreateClothingItemRequest) -> Result<Uuid> {
        let id = new_v7();
        let now = Utc::now();

        sqlx::query(
            r#"
            INSERT INTO clothing (id, category, subcategory, subcategory_name, color, neckline,
                                  length, image_path, is_default, owner_id, created_at_utc)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)
            "#,
        )
        .bind(id)
        .bind(req.category.as_str())
        .bind(&req.subcategory)
        .bind(&req.subcategory_name)
        .bind(&req.color)
        .bind(&req.neckline)
        .bind(&req.length)
        .bind(&req.image_path)
        .bind(req.is_default)
        .bind(&req.owner_id)
        .bind(now)
        .execute(&self.pool)
        .await
        .map_err(Error::from_store)?;

        debug!(
            subsystem = SUBSYSTEM_DATABASE,
            component = COMPONENT_CLOTHING,
            op = "insert",
            item_id = %id,
            category = %req.category,
            "Clothing item inserted"
        );
        Ok(id)
    }

    async fn get(&self, id: Uuid) -> Result<Option<ClothingItem>> {
        let sql = format!("SELECT {} FROM clothing WHERE id = $1", CLOTHING_COLUMNS);
        let row = sqlx::query(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(Error::from_store)?;

        row.as_ref().map(row_to_item).transpose()
    }

    async fn get_many(&self, ids: &[Uuid]) -> Result<Vec<ClothingItem>> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }

        let sql = format!(
            "SELECT {} FROM clothing WHERE id = ANY($1)",
            CLOTHING_COLUMNS
        );
        let rows = sqlx::query(&sql)
            .bind(ids)
            .fetch_all(&self.pool)
            .await
            .map_err(Error::from_store)?;

        rows.iter().map(row_to_item).collect()
    }

    async fn list_by_category(&self, category: ClothingCategory) -> Result<Vec<ClothingItem>> {
        let sql = format!(
            r#"
            SELECT {}
            FROM clothing
            WHERE category = $1
            ORDER BY subcategory, color NULLS LAST, created_at_utc
            "#,
            CLOTHING_COLUMNS
        );
        let rows = sqlx::query(&sql)
            .bind(category.as_str())
            .fetch_all(&self.pool)
            .await
            .map_err(Error::from_store)?;

        rows.iter().map(row_to_item).collect()
    }

    async fn list(&self, filter: &CatalogFilter) -> Result<Vec<ClothingItem>> {
        // NULL parameters disable their predicate.
        let sql = format!(
            r#"
            SELECT {}
            FROM clothing
            WHERE ($1::text IS NULL OR category = $1)
              AND ($2::text IS NULL OR color = $2)
              AND ($3::text IS NULL OR subcategory = $3 OR subcategory_name = $3)
              AND ($4::text IS NULL OR owner_id IS NULL OR owner_id = $4)
              AND ($5 OR NOT is_default)
            ORDER BY category, subcategory, color NULLS LAST, created_at_utc
            "#,
            CLOTHING_COLUMNS
        );
        let rows = sqlx::query(&sql)
            .bind(filter.category.map(|c| c.as_str()))
            .bind(&filter.color)
            .bind(&filter.subcategory)
            .bind(&filter.owner_id)
            .bind(filter.include_defaults)
            .fetch_all(&self.pool)
            .await
            .map_err(Error::from_store)?;

        rows.iter().map(row_to_item).collect()
    }

    async fn delete(&self, id: Uuid) -> Result<bool> {
        let result = sqlx::query("DELETE FROM clothing WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(Error::from_store)?;
        Ok(result.rows_affected() > 0)
    }
}
