use async_trait::async_trait;

use crate::{BookPatch, BookRecord, CatalogResult, NewBook};

/// Structured storage for book records
#[async_trait]
pub trait CatalogStore: Send + Sync {
    /// Insert a new record and return its assigned id
    async fn insert(&self, book: NewBook) -> CatalogResult<String>;

    /// Apply a partial update; `NotFound` if the id is unknown
    async fn update(&self, id: &str, patch: BookPatch) -> CatalogResult<()>;

    async fn get(&self, id: &str) -> CatalogResult<BookRecord>;

    /// All records, newest first. Records created at the same instant come
    /// back in reverse insertion order.
    async fn list(&self) -> CatalogResult<Vec<BookRecord>>;

    /// Remove a record; `NotFound` if the id is unknown
    async fn delete(&self, id: &str) -> CatalogResult<()>;
}
