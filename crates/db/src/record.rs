use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A book as persisted by a catalog backend.
///
/// The cover image is referenced by its asset key, never by URL; callers
/// derive the public URL from the key when rendering.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BookRecord {
    pub id: String,
    pub title: String,
    pub price: f64,
    pub genre: String,
    pub image_key: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub created_by: String,
    pub updated_by: String,
}

/// Fields supplied when inserting a record; the store assigns the id.
#[derive(Debug, Clone, PartialEq)]
pub struct NewBook {
    pub title: String,
    pub price: f64,
    pub genre: String,
    pub created_at: DateTime<Utc>,
    pub created_by: String,
}

/// Partial update. `None` leaves the stored value untouched.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BookPatch {
    pub title: Option<String>,
    pub price: Option<f64>,
    pub genre: Option<String>,
    pub image_key: Option<String>,
    pub updated_at: Option<DateTime<Utc>>,
    pub updated_by: Option<String>,
}

impl BookPatch {
    pub(crate) fn apply(self, record: &mut BookRecord) {
        if let Some(title) = self.title {
            record.title = title;
        }
        if let Some(price) = self.price {
            record.price = price;
        }
        if let Some(genre) = self.genre {
            record.genre = genre;
        }
        if let Some(image_key) = self.image_key {
            record.image_key = Some(image_key);
        }
        if let Some(updated_at) = self.updated_at {
            record.updated_at = updated_at.max(record.created_at);
        }
        if let Some(updated_by) = self.updated_by {
            record.updated_by = updated_by;
        }
    }
}
