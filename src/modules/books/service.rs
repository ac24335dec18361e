//! Book lifecycle: coordinates the catalog and the asset store.
//!
//! The two stores share no transaction. Ordering is what keeps readers safe:
//! an image is written and made public before any record points at it, and a
//! record is only removed after its image cleanup has been attempted.

use std::sync::Arc;

use bytes::Bytes;
use chrono::Utc;
use shelf_db::{BookPatch, CatalogStore, NewBook};
use shelf_storage::AssetStore;

use super::error::{BookError, Operation};
use super::models::{Book, BookInput, BookSummary};

/// Attribution recorded in `createdBy`/`updatedBy`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Actor(String);

impl Actor {
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for Actor {
    fn default() -> Self {
        Self::new("anonymous")
    }
}

pub struct BookService {
    catalog: Arc<dyn CatalogStore>,
    assets: Arc<dyn AssetStore>,
    actor: Actor,
}

impl BookService {
    pub fn new(catalog: Arc<dyn CatalogStore>, assets: Arc<dyn AssetStore>, actor: Actor) -> Self {
        Self {
            catalog,
            assets,
            actor,
        }
    }

    pub fn actor(&self) -> &Actor {
        &self.actor
    }

    /// Insert a new record. No asset is touched.
    pub async fn create(&self, input: BookInput) -> Result<BookSummary, BookError> {
        let valid = input.validate().map_err(BookError::validation)?;

        let id = self
            .catalog
            .insert(NewBook {
                title: valid.title.clone(),
                price: valid.price,
                genre: valid.genre.clone(),
                created_at: Utc::now(),
                created_by: self.actor.as_str().to_string(),
            })
            .await
            .map_err(BookError::catalog(Operation::Create))?;

        tracing::info!(book_id = %id, "book created");

        Ok(BookSummary {
            id,
            title: valid.title,
            price: valid.price,
            genre: valid.genre,
        })
    }

    /// Newest first
    pub async fn list(&self) -> Result<Vec<Book>, BookError> {
        let records = self
            .catalog
            .list()
            .await
            .map_err(BookError::catalog(Operation::List))?;

        Ok(records
            .into_iter()
            .map(|record| Book::from_record(record, |key| self.assets.public_url(key)))
            .collect())
    }

    pub async fn get(&self, book_id: &str) -> Result<Book, BookError> {
        let record = self
            .catalog
            .get(book_id)
            .await
            .map_err(BookError::catalog(Operation::Get))?;

        Ok(Book::from_record(record, |key| self.assets.public_url(key)))
    }

    /// Store `image` as the cover of `book_id` and return its public URL.
    ///
    /// The record is not looked up first: an unknown id leaves a public,
    /// ownerless object behind and fails the final step with a storage error.
    /// Re-running with the same id overwrites the previous object.
    pub async fn attach_image(&self, book_id: &str, image: Bytes) -> Result<String, BookError> {
        let mut missing = Vec::new();
        if book_id.is_empty() {
            missing.push("bookId");
        }
        if image.is_empty() {
            missing.push("imageBase64");
        }
        if !missing.is_empty() {
            return Err(BookError::validation(missing));
        }

        let key = book_id;
        let content_type = sniff_content_type(&image);
        let size = image.len();

        self.assets
            .put(key, image, content_type)
            .await
            .map_err(BookError::Upload)?;
        self.assets
            .make_public(key)
            .await
            .map_err(BookError::Upload)?;

        let public_url = self.assets.public_url(key);

        self.catalog
            .update(
                book_id,
                BookPatch {
                    image_key: Some(key.to_string()),
                    updated_at: Some(Utc::now()),
                    updated_by: Some(self.actor.as_str().to_string()),
                    ..BookPatch::default()
                },
            )
            .await
            .map_err(|err| {
                tracing::warn!(
                    book_id,
                    error = %err,
                    "image is public but the catalog record was not updated"
                );
                BookError::storage(Operation::AttachImage)(err)
            })?;

        tracing::info!(book_id, size, content_type, "image attached");

        Ok(public_url)
    }

    /// Overwrite title, price and genre. The image reference is kept.
    ///
    /// An unknown id is a storage failure like any other failed write.
    pub async fn update(&self, book_id: &str, input: BookInput) -> Result<BookSummary, BookError> {
        let valid = input.validate().map_err(BookError::validation)?;

        self.catalog
            .update(
                book_id,
                BookPatch {
                    title: Some(valid.title.clone()),
                    price: Some(valid.price),
                    genre: Some(valid.genre.clone()),
                    updated_at: Some(Utc::now()),
                    updated_by: Some(self.actor.as_str().to_string()),
                    image_key: None,
                },
            )
            .await
            .map_err(BookError::storage(Operation::Update))?;

        tracing::info!(book_id, "book updated");

        Ok(BookSummary {
            id: book_id.to_string(),
            title: valid.title,
            price: valid.price,
            genre: valid.genre,
        })
    }

    /// Remove the record and, best effort, its image.
    ///
    /// A failed image deletion is logged and does not stop the record from
    /// being removed.
    pub async fn delete(&self, book_id: &str) -> Result<(), BookError> {
        let record = self
            .catalog
            .get(book_id)
            .await
            .map_err(BookError::catalog(Operation::Delete))?;

        if let Some(key) = record.image_key.as_deref() {
            match self.assets.delete(key).await {
                Ok(()) => tracing::debug!(book_id, key, "image deleted"),
                Err(err) => tracing::warn!(
                    book_id,
                    key,
                    error = %err,
                    "failed to delete image; continuing with record deletion"
                ),
            }
        }

        self.catalog
            .delete(book_id)
            .await
            .map_err(BookError::catalog(Operation::Delete))?;

        tracing::info!(book_id, "book deleted");
        Ok(())
    }
}

/// Content type from well-known image signatures.
fn sniff_content_type(data: &[u8]) -> Option<&'static str> {
    const SIGNATURES: &[(&[u8], &str)] = &[
        (b"\x89PNG\r\n\x1a\n", "image/png"),
        (b"\xff\xd8\xff", "image/jpeg"),
        (b"GIF87a", "image/gif"),
        (b"GIF89a", "image/gif"),
    ];

    if data.len() >= 12 && &data[..4] == b"RIFF" && &data[8..12] == b"WEBP" {
        return Some("image/webp");
    }

    SIGNATURES
        .iter()
        .find(|(magic, _)| data.starts_with(magic))
        .map(|(_, content_type)| *content_type)
}
