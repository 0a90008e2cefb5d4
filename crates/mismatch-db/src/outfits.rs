//! Outfit repository implementation.

use async_trait::async_trait;
use chrono::{SubsecRound, Utc};
use sqlx::postgres::PgRow;
use sqlx::{Pool, Postgres, Row};
use tracing::debug;
use uuid::Uuid;

use mismatch_core::logging::{COMPONENT_OUTFITS, SUBSYSTEM_DATABASE};
use mismatch_core::{
    new_v7, Error, NewOutfit, Outfit, OutfitRepository, OutfitSort, OutfitUpdate, Result,
};

const OUTFIT_COLUMNS: &str =
    "id, owner_id, name, top_id, bottom_id, footwear_id, created_at_utc, updated_at_utc";

/// PostgreSQL implementation of OutfitRepository.
pub struct PgOutfitRepository {
    pool: Pool<Postgres>,
}

impl PgOutfitRepository {
    /// Create a new PgOutfitRepository with the given connection pool.
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }
}

fn row_to_outfit(r: &PgRow) -> Outfit {
    Outfit {
        id: r.get("id"),
        owner_id: r.get("owner_id"),
        name: r.get("name"),
        top_id: r.get("top_id"),
        bottom_id: r.get("bottom_id"),
        footwear_id: r.get("footwear_id"),
        created_at_utc: r.get("created_at_utc"),
        updated_at_utc: r.get("updated_at_utc"),
    }
}

/// ORDER BY clause for a listing sort.
fn order_clause(sort: OutfitSort) -> &'static str {
    match sort {
        OutfitSort::Newest => "ORDER BY created_at_utc DESC, id DESC",
        OutfitSort::Oldest => "ORDER BY created_at_utc ASC, id ASC",
        OutfitSort::Alphabetical => "ORDER BY name COLLATE \"C\" ASC, created_at_utc ASC",
        // v7 ids are time-ordered, so id order is insertion order.
        OutfitSort::Unspecified => "ORDER BY id ASC",
    }
}

#[async_trait]
impl OutfitRepository for PgOutfitRepository {
    async fn insert(&self, outfit: NewOutfit) -> Result<Outfit> {
        let id = new_v7();
        // Postgres keeps microseconds; match it so the returned record equals a re-read.
        let now = Utc::now().trunc_subsecs(6);

        sqlx::query(
            r#"
            INSERT INTO outfit (id, owner_id, name, top_id, bottom_id, footwear_id, created_at_utc)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            "#,
        )
        .bind(id)
        .bind(&outfit.owner_id)
        .bind(&outfit.name)
        .bind(outfit.top_id)
        .bind(outfit.bottom_id)
        .bind(outfit.footwear_id)
        .bind(now)
        .execute(&self.pool)
        .await
        .map_err(Error::from_store)?;

        debug!(
            subsystem = SUBSYSTEM_DATABASE,
            component = COMPONENT_OUTFITS,
            op = "insert",
            outfit_id = %id,
            owner_id = %outfit.owner_id,
            "Outfit inserted"
        );

        Ok(Outfit {
            id,
            owner_id: outfit.owner_id,
            name: outfit.name,
            top_id: outfit.top_id,
            bottom_id: outfit.bottom_id,
            footwear_id: outfit.footwear_id,
            created_at_utc: now,
            updated_at_utc: None,
        })
    }

    async fn get(&self, id: Uuid) -> Result<Option<Outfit>> {
        let sql = format!("SELECT {} FROM outfit WHERE id = $1", OUTFIT_COLUMNS);
        let row = sqlx::query(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(Error::from_store)?;

        Ok(row.as_ref().map(row_to_outfit))
    }

    async fn list_by_owner(&self, owner_id: &str, sort: OutfitSort) -> Result<Vec<Outfit>> {
        let sql = format!(
            "SELECT {} FROM outfit WHERE owner_id = $1 {}",
            OUTFIT_COLUMNS,
            order_clause(sort)
        );
        let rows = sqlx::query(&sql)
            .bind(owner_id)
            .fetch_all(&self.pool)
            .await
            .map_err(Error::from_store)?;

        Ok(rows.iter().map(row_to_outfit).collect())
    }

    async fn count_by_owner(&self, owner_id: &str) -> Result<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM outfit WHERE owner_id = $1")
            .bind(owner_id)
            .fetch_one(&self.pool)
            .await
            .map_err(Error::from_store)?;
        Ok(count)
    }

    async fn update(&self, id: Uuid, update: &OutfitUpdate) -> Result<bool> {
        // updated_at_utc must land strictly after created_at_utc even when
        // the update races the insert within one clock tick.
        let result = sqlx::query(
            r#"
            UPDATE outfit
            SET name = $2,
                top_id = $3,
                bottom_id = $4,
                footwear_id = $5,
                updated_at_utc = GREATEST($6, created_at_utc + interval '1 microsecond')
            WHERE id = $1
            "#,
        )
        .bind(id)
        .bind(&update.name)
        .bind(update.top_id)
        .bind(update.bottom_id)
        .bind(update.footwear_id)
        .bind(Utc::now())
        .execute(&self.pool)
        .await
        .map_err(Error::from_store)?;

        Ok(result.rows_affected() > 0)
    }

    async fn rename_owned(&self, id: Uuid, owner_id: &str, name: &str) -> Result<bool> {
        let result = sqlx::query(
            r#"
            UPDATE outfit
            SET name = $3,
                updated_at_utc = GREATEST($4, created_at_utc + interval '1 microsecond')
            WHERE id = $1 AND owner_id = $2
            "#,
        )
        .bind(id)
        .bind(owner_id)
        .bind(name)
        .bind(Utc::now())
        .execute(&self.pool)
        .await
        .map_err(Error::from_store)?;

        Ok(result.rows_affected() > 0)
    }

    async fn delete(&self, id: Uuid) -> Result<bool> {
        let result = sqlx::query("DELETE FROM outfit WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(Error::from_store)?;
        Ok(result.rows_affected() > 0)
    }

    async fn delete_owned(&self, id: Uuid, owner_id: &str) -> Result<bool> {
        let result = sqlx::query("DELETE FROM outfit WHERE id = $1 AND owner_id = $2")
            .bind(id)
            .bind(owner_id)
            .execute(&self.pool)
            .await
            .map_err(Error::from_store)?;
        Ok(result.rows_affected() > 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_order_clause_per_sort() {
        assert!(order_clause(OutfitSort::Newest).contains("created_at_utc DESC"));
        assert!(order_clause(OutfitSort::Oldest).contains("created_at_utc ASC"));
        assert!(order_clause(OutfitSort::Alphabetical).contains("COLLATE \"C\""));
        assert_eq!(order_clause(OutfitSort::Unspecified), "ORDER BY id ASC");
    }
}
