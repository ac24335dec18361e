use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::{BookPatch, BookRecord, CatalogError, CatalogResult, CatalogStore, NewBook};

/// Process-local catalog backed by a map.
#[derive(Default)]
pub struct MemoryCatalog {
    inner: RwLock<Inner>,
}

#[derive(Default)]
struct Inner {
    next_seq: u64,
    books: HashMap<String, Entry>,
}

struct Entry {
    seq: u64,
    record: BookRecord,
}

impl MemoryCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn len(&self) -> usize {
        self.inner.read().await.books.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}

#[async_trait]
impl CatalogStore for MemoryCatalog {
    async fn insert(&self, book: NewBook) -> CatalogResult<String> {
        let id = Uuid::now_v7().to_string();
        let record = BookRecord {
            id: id.clone(),
            title: book.title,
            price: book.price,
            genre: book.genre,
            image_key: None,
            created_at: book.created_at,
            updated_at: book.created_at,
            created_by: book.created_by.clone(),
            updated_by: book.created_by,
        };

        let mut inner = self.inner.write().await;
        let seq = inner.next_seq;
        inner.next_seq += 1;
        inner.books.insert(id.clone(), Entry { seq, record });

        Ok(id)
    }

    async fn update(&self, id: &str, patch: BookPatch) -> CatalogResult<()> {
        let mut inner = self.inner.write().await;
        let entry = inner
            .books
            .get_mut(id)
            .ok_or_else(|| CatalogError::not_found(id))?;
        patch.apply(&mut entry.record);
        Ok(())
    }

    async fn get(&self, id: &str) -> CatalogResult<BookRecord> {
        self.inner
            .read()
            .await
            .books
            .get(id)
            .map(|entry| entry.record.clone())
            .ok_or_else(|| CatalogError::not_found(id))
    }

    async fn list(&self) -> CatalogResult<Vec<BookRecord>> {
        let inner = self.inner.read().await;
        let mut entries: Vec<&Entry> = inner.books.values().collect();
        entries.sort_by(|a, b| {
            b.record
                .created_at
                .cmp(&a.record.created_at)
                .then_with(|| b.seq.cmp(&a.seq))
        });
        Ok(entries.into_iter().map(|entry| entry.record.clone()).collect())
    }

    async fn delete(&self, id: &str) -> CatalogResult<()> {
        self.inner
            .write()
            .await
            .books
            .remove(id)
            .map(|_| ())
            .ok_or_else(|| CatalogError::not_found(id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone, Utc};

    fn new_book(title: &str, created_at: chrono::DateTime<Utc>) -> NewBook {
        NewBook {
            title: title.to_string(),
            price: 9.5,
            genre: "Fiction".to_string(),
            created_at,
            created_by: "tester".to_string(),
        }
    }

    fn t0() -> chrono::DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 3, 1, 12, 0, 0).unwrap()
    }

    #[tokio::test]
    async fn insert_assigns_unique_ids_and_attribution() {
        let catalog = MemoryCatalog::new();
        let a = catalog.insert(new_book("A", t0())).await.unwrap();
        let b = catalog.insert(new_book("B", t0())).await.unwrap();
        assert_ne!(a, b);

        let record = catalog.get(&a).await.unwrap();
        assert_eq!(record.title, "A");
        assert_eq!(record.created_by, "tester");
        assert_eq!(record.updated_by, "tester");
        assert_eq!(record.updated_at, record.created_at);
        assert!(record.image_key.is_none());
    }

    #[tokio::test]
    async fn list_is_newest_first_with_insertion_tiebreak() {
        let catalog = MemoryCatalog::new();
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

    #[tokio::test]
    async fn update_applies_only_present_fields() {
        let catalog = MemoryCatalog::new();
        let id = catalog.insert(new_book("Dune", t0())).await.unwrap();

        catalog
            .update(
                &id,
                BookPatch {
                    image_key: Some(id.clone()),
                    updated_at: Some(t0() + Duration::minutes(1)),
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
        assert_eq!(record.updated_at, t0() + Duration::minutes(1));
    }

    #[tokio::test]
    async fn updated_at_never_precedes_created_at() {
        let catalog = MemoryCatalog::new();
        let id = catalog.insert(new_book("Dune", t0())).await.unwrap();

        catalog
            .update(
                &id,
                BookPatch {
                    updated_at: Some(t0() - Duration::hours(1)),
                    ..BookPatch::default()
                },
            )
            .await
            .unwrap();

        assert_eq!(catalog.get(&id).await.unwrap().updated_at, t0());
    }

    #[tokio::test]
    async fn missing_ids_report_not_found() {
        let catalog = MemoryCatalog::new();

        assert!(catalog.get("nope").await.unwrap_err().is_not_found());
        assert!(catalog.delete("nope").await.unwrap_err().is_not_found());
        assert!(catalog
            .update("nope", BookPatch::default())
            .await
            .unwrap_err()
            .is_not_found());
        assert!(catalog.is_empty().await);
    }

    #[tokio::test]
    async fn delete_removes_the_record() {
        let catalog = MemoryCatalog::new();
        let id = catalog.insert(new_book("Dune", t0())).await.unwrap();

        catalog.delete(&id).await.unwrap();

        assert!(catalog.get(&id).await.unwrap_err().is_not_found());
        assert!(catalog.list().await.unwrap().is_empty());
    }
}
