use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use shelf_db::BookRecord;

/// A catalog entry as returned by the API.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Book {
    pub id: String,
    pub title: String,
    pub price: f64,
    pub genre: String,
    /// Public cover URL, present once an image has been attached
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub created_by: String,
    pub updated_by: String,
}

impl Book {
    /// Render a stored record, deriving the image URL from its asset key
    pub fn from_record(record: BookRecord, public_url: impl Fn(&str) -> String) -> Self {
        Self {
            image_url: record.image_key.as_deref().map(public_url),
            id: record.id,
            title: record.title,
            price: record.price,
            genre: record.genre,
            created_at: record.created_at,
            updated_at: record.updated_at,
            created_by: record.created_by,
            updated_by: record.updated_by,
        }
    }
}

/// Echo of a create or update: the id plus the stored field values.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BookSummary {
    pub id: String,
    pub title: String,
    pub price: f64,
    pub genre: String,
}

/// Price as sent by clients: a JSON number or a numeric string.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PriceInput {
    Number(f64),
    Text(String),
}

impl PriceInput {
    /// Coerce to a finite number. Surrounding whitespace is ignored.
    pub fn coerce(&self) -> Option<f64> {
        let value = match self {
            PriceInput::Number(n) => *n,
            PriceInput::Text(s) => s.trim().parse::<f64>().ok()?,
        };
        value.is_finite().then_some(value)
    }
}

/// Request body for create and update.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BookInput {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub price: Option<PriceInput>,
    #[serde(default)]
    pub genre: Option<String>,
}

/// Fields that passed validation.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidBook {
    pub title: String,
    pub price: f64,
    pub genre: String,
}

impl BookInput {
    pub fn new(title: &str, price: f64, genre: &str) -> Self {
        Self {
            title: Some(title.to_string()),
            price: Some(PriceInput::Number(price)),
            genre: Some(genre.to_string()),
        }
    }

    /// Presence and coercion checks only. Every failing field is reported.
    pub fn validate(self) -> Result<ValidBook, Vec<&'static str>> {
        let mut invalid = Vec::new();

        let title = self.title.filter(|t| !t.is_empty());
        if title.is_none() {
            invalid.push("title");
        }
        let price = self.price.as_ref().and_then(PriceInput::coerce);
        if price.is_none() {
            invalid.push("price");
        }
        let genre = self.genre.filter(|g| !g.is_empty());
        if genre.is_none() {
            invalid.push("genre");
        }

        match (title, price, genre) {
            (Some(title), Some(price), Some(genre)) => Ok(ValidBook {
                title,
                price,
                genre,
            }),
            _ => Err(invalid),
        }
    }
}

/// Body of `POST /api/upload`.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UploadRequest {
    #[serde(default)]
    pub image_base64: Option<String>,
    #[serde(default)]
    pub book_id: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UploadResponse {
    pub image_url: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeleteResponse {
    pub id: String,
    pub message: String,
}
