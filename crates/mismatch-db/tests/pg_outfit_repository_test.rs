//! PostgreSQL integration tests for the outfit and clothing repositories.
//!
//! These need a migrated database at `DATABASE_URL` and are ignored by
//! default. Run with `cargo test -p mismatch-db -- --ignored`.

use mismatch_db::{
    ClothingCategory, ClothingRepository, CreateClothingItemRequest, Database, NewOutfit,
    OutfitRepository, OutfitSort, OutfitUpdate, DEFAULT_TEST_DATABASE_URL,
};
use uuid::Uuid;

async fn setup_test_db() -> Database {
    dotenvy::dotenv().ok();
    let database_url =
        std::env::var("DATABASE_URL").unwrap_or_else(|_| DEFAULT_TEST_DATABASE_URL.to_string());
    Database::connect(&database_url)
        .await
        .expect("Failed to connect to test database")
}

/// Owner id unique to one test run so tests never see each other's rows.
fn unique_owner(tag: &str) -> String {
    format!("test-{}-{}", tag, Uuid::new_v4())
}

fn new_outfit(owner: &str, name: &str) -> NewOutfit {
    NewOutfit {
        owner_id: owner.to_string(),
        name: name.to_string(),
        top_id: Uuid::new_v4(),
        bottom_id: Uuid::new_v4(),
        footwear_id: Uuid::new_v4(),
    }
}

#[tokio::test]
#[ignore = "requires a migrated PostgreSQL database"]
async fn test_insert_get_roundtrip() {
    let db = setup_test_db().await;
    let owner = unique_owner("roundtrip");

    let saved = db.outfits.insert(new_outfit(&owner, "Outfit 1")).await.unwrap();
    let fetched = db.outfits.get(saved.id).await.unwrap().unwrap();

    assert_eq!(fetched, saved);
    assert_eq!(db.outfits.count_by_owner(&owner).await.unwrap(), 1);

    db.outfits.delete(saved.id).await.unwrap();
}

#[tokio::test]
#[ignore = "requires a migrated PostgreSQL database"]
async fn test_list_by_owner_orders() {
    let db = setup_test_db().await;
    let owner = unique_owner("order");

    let mut ids = Vec::new();
    for name in ["beta", "Alpha", "alpha"] {
        ids.push(db.outfits.insert(new_outfit(&owner, name)).await.unwrap().id);
    }

    let newest = db
        .outfits
        .list_by_owner(&owner, OutfitSort::Newest)
        .await
        .unwrap();
    assert_eq!(newest.first().map(|o| o.id), ids.last().copied());

    let az = db
        .outfits
        .list_by_owner(&owner, OutfitSort::Alphabetical)
        .await
        .unwrap();
    let names: Vec<_> = az.iter().map(|o| o.name.as_str()).collect();
    assert_eq!(names, vec!["Alpha", "alpha", "beta"]);

    let other = db
        .outfits
        .list_by_owner(&unique_owner("nobody"), OutfitSort::Newest)
        .await
        .unwrap();
    assert!(other.is_empty());

    for id in ids {
        db.outfits.delete(id).await.unwrap();
    }
}

#[tokio::test]
#[ignore = "requires a migrated PostgreSQL database"]
async fn test_update_stamps_later_than_creation() {
    let db = setup_test_db().await;
    let owner = unique_owner("update");
    let saved = db.outfits.insert(new_outfit(&owner, "Outfit 1")).await.unwrap();

    let update = OutfitUpdate {
        name: "Weekend".to_string(),
        top_id: Uuid::new_v4(),
        bottom_id: saved.bottom_id,
        footwear_id: saved.footwear_id,
    };
    assert!(db.outfits.update(saved.id, &update).await.unwrap());

    let fetched = db.outfits.get(saved.id).await.unwrap().unwrap();
    assert_eq!(fetched.name, "Weekend");
    assert!(fetched.updated_at_utc.unwrap() > fetched.created_at_utc);

    assert!(!db.outfits.update(Uuid::new_v4(), &update).await.unwrap());
    db.outfits.delete(saved.id).await.unwrap();
}

#[tokio::test]
#[ignore = "requires a migrated PostgreSQL database"]
async fn test_owned_operations_check_owner() {
    let db = setup_test_db().await;
    let owner = unique_owner("owned");
    let saved = db.outfits.insert(new_outfit(&owner, "Outfit 1")).await.unwrap();

    assert!(!db.outfits.rename_owned(saved.id, "intruder", "Mine").await.unwrap());
    assert!(!db.outfits.delete_owned(saved.id, "intruder").await.unwrap());
    assert!(db.outfits.rename_owned(saved.id, &owner, "Renamed").await.unwrap());
    assert!(db.outfits.delete_owned(saved.id, &owner).await.unwrap());
    assert!(db.outfits.get(saved.id).await.unwrap().is_none());
}

#[tokio::test]
#[ignore = "requires a migrated PostgreSQL database"]
async fn test_clothing_get_many_skips_unknown_ids() {
    let db = setup_test_db().await;
    let id = db
        .clothing
        .insert(CreateClothingItemRequest {
            category: ClothingCategory::Top,
            subcategory: "1a".to_string(),
            subcategory_name: "oversized_tshirt".to_string(),
            color: Some("black".to_string()),
            neckline: Some("round".to_string()),
            length: None,
            image_path: "static/images/clothing/tops/1a_black_round.png".to_string(),
            is_default: false,
            owner_id: Some(unique_owner("upload")),
        })
        .await
        .unwrap();

    let found = db.clothing.get_many(&[id, Uuid::new_v4()]).await.unwrap();
    assert_eq!(found.len(), 1);
    assert_eq!(found[0].category, ClothingCategory::Top);
    assert!(db.clothing.find_by_ref("garbage").await.unwrap().is_none());

    assert!(db.clothing.delete(id).await.unwrap());
}
