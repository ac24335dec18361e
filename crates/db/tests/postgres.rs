//! PostgreSQL catalog and migration runner against a throwaway database.
//!
//! Needs `DATABASE_URL` pointing at a server where the test user may create
//! databases; `sqlx::test` provisions one per test.

use chrono::{DateTime, Duration, TimeZone, Utc};
use shelf_db::{books_migrations, run_migrations, BookPatch, CatalogStore, NewBook, PgCatalog};
use shelf_kernel::Migration;
use sqlx::PgPool;

fn migrations() -> Vec<(String, Migration)> {
    books_migrations()
        .into_iter()
        .map(|migration| ("books".to_string(), migration))
        .collect()
}

async fn catalog(pool: PgPool) -> PgCatalog {
    run_migrations(&pool, &migrations()).await.unwrap();
    PgCatalog::new(pool)
}

fn t0() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 3, 1, 12, 0, 0).unwrap()
}

fn new_book(title: &str, created_at: DateTime<Utc>) -> NewBook {
    NewBook {
        title: title.to_string(),
        price: 9.5,
        genre: "Fiction".to_string(),
        created_at,
        created_by: "tester".to_string(),
    }
}

#[sqlx::test(migrations = false)]
async fn migrations_apply_once(pool: PgPool) {
    assert_eq!(run_migrations(&pool, &migrations()).await.unwrap(), 1);
    assert_eq!(run_migrations(&pool, &migrations()).await.unwrap(), 0);

    let (recorded,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM schema_migrations")
        .fetch_one(&pool)
        .await
        .unwrap();
    assert_eq!(recorded, 1);
}

#[sqlx::test(migrations = false)]
async fn list_is_newest_first_with_insertion_tiebreak(pool: PgPool) {
    let catalog = catalog(pool).await;

    let old = catalog.insert(new_book("old", t0())).await.unwrap();
    let tie_first = catalog
        .insert(new_book("tie-1", t0() + Duration::seconds(5)))
        .await
        .unwrap();
    let tie_second = catalog
        .insert(new_book("tie-2", t0() + Duration::seconds(5)))
        .await
        .unwrap();

    let ids: Vec<String> = catalog
        .list()
        .await
        .unwrap()
        .into_iter()
        .map(|record| record.id)
        .collect();
    assert_eq!(ids, vec![tie_second, tie_first, old]);
}

#[sqlx::test(migrations = false)]
async fn insert_and_get_keep_attribution(pool: PgPool) {
    let catalog = catalog(pool).await;

    let id = catalog.insert(new_book("Dune", t0())).await.unwrap();
    let record = catalog.get(&id).await.unwrap();

    assert_eq!(record.title, "Dune");
    assert_eq!(record.price, 9.5);
    assert_eq!(record.created_at, t0());
    assert_eq!(record.updated_at, t0());
    assert_eq!(record.created_by, "tester");
    assert_eq!(record.updated_by, "tester");
    assert!(record.image_key.is_none());
}

#[sqlx::test(migrations = false)]
async fn update_keeps_absent_fields_and_clamps_updated_at(pool: PgPool) {
    let catalog = catalog(pool).await;
    let id = catalog.insert(new_book("Dune", t0())).await.unwrap();

    catalog
        .update(
            &id,
            BookPatch {
                image_key: Some(id.clone()),
                updated_at: Some(t0() - Duration::hours(1)),
                updated_by: Some("uploader".to_string()),
                ..BookPatch::default()
            },
        )
        .await
        .unwrap();

    let record = catalog.get(&id).await.unwrap();
    assert_eq!(record.title, "Dune");
    assert_eq!(record.image_key.as_deref(), Some(id.as_str()));
    assert_eq!(record.updated_by, "uploader");
    assert_eq!(record.updated_at, t0());
}

#[sqlx::test(migrations = false)]
async fn missing_ids_report_not_found(pool: PgPool) {
    let catalog = catalog(pool).await;
    let id = catalog.insert(new_book("Keep me", t0())).await.unwrap();

    assert!(catalog.get("ghost").await.unwrap_err().is_not_found());
    assert!(catalog
        .update("ghost", BookPatch::default())
        .await
        .unwrap_err()
        .is_not_found());
    assert!(catalog.delete("ghost").await.unwrap_err().is_not_found());

    catalog.delete(&id).await.unwrap();
    assert!(catalog.delete(&id).await.unwrap_err().is_not_found());
    assert!(catalog.list().await.unwrap().is_empty());
}
