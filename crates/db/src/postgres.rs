use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::postgres::PgPoolOptions;
use uuid::Uuid;

use crate::{BookPatch, BookRecord, CatalogError, CatalogResult, CatalogStore, NewBook};

pub type DbPool = sqlx::PgPool;

/// Create a connection pool from a database URL.
pub async fn create_pool(database_url: &str, max_connections: u32) -> Result<DbPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(max_connections)
        .connect(database_url)
        .await
}

/// Round-trip a trivial query to confirm the pool can reach the server.
pub async fn health_check(pool: &DbPool) -> Result<(), sqlx::Error> {
    sqlx::query("SELECT 1").execute(pool).await.map(|_| ())
}

const SELECT_COLUMNS: &str =
    "id, title, price, genre, image_key, created_at, updated_at, created_by, updated_by";

#[derive(sqlx::FromRow)]
struct BookRow {
    id: String,
    title: String,
    price: f64,
    genre: String,
    image_key: Option<String>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
    created_by: String,
    updated_by: String,
}

impl From<BookRow> for BookRecord {
    fn from(row: BookRow) -> Self {
        Self {
            id: row.id,
            title: row.title,
            price: row.price,
            genre: row.genre,
            image_key: row.image_key,
            created_at: row.created_at,
            updated_at: row.updated_at,
            created_by: row.created_by,
            updated_by: row.updated_by,
        }
    }
}

/// Catalog persisted in the `books` table.
///
/// The schema comes from [`crate::books_migrations`]; `seq` is a
/// `BIGSERIAL` used only to order records sharing a `created_at`.
#[derive(Clone)]
pub struct PgCatalog {
    pool: DbPool,
}

impl PgCatalog {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl CatalogStore for PgCatalog {
    async fn insert(&self, book: NewBook) -> CatalogResult<String> {
        let id = Uuid::now_v7().to_string();

        sqlx::query(
            "INSERT INTO books (id, title, price, genre, created_at, updated_at, created_by, updated_by) \
             VALUES ($1, $2, $3, $4, $5, $5, $6, $6)",
        )
        .bind(&id)
        .bind(&book.title)
        .bind(book.price)
        .bind(&book.genre)
        .bind(book.created_at)
        .bind(&book.created_by)
        .execute(&self.pool)
        .await?;

        Ok(id)
    }

    async fn update(&self, id: &str, patch: BookPatch) -> CatalogResult<()> {
        let result = sqlx::query(
            "UPDATE books SET \
                title = COALESCE($2, title), \
                price = COALESCE($3, price), \
                genre = COALESCE($4, genre), \
                image_key = COALESCE($5, image_key), \
                updated_at = GREATEST(COALESCE($6, updated_at), created_at), \
                updated_by = COALESCE($7, updated_by) \
             WHERE id = $1",
        )
        .bind(id)
        .bind(patch.title)
        .bind(patch.price)
        .bind(patch.genre)
        .bind(patch.image_key)
        .bind(patch.updated_at)
        .bind(patch.updated_by)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(CatalogError::not_found(id));
        }
        Ok(())
    }

    async fn get(&self, id: &str) -> CatalogResult<BookRecord> {
        let row: Option<BookRow> =
            sqlx::query_as(&format!("SELECT {SELECT_COLUMNS} FROM books WHERE id = $1"))
                .bind(id)
                .fetch_optional(&self.pool)
                .await?;

        row.map(BookRecord::from)
            .ok_or_else(|| CatalogError::not_found(id))
    }

    async fn list(&self) -> CatalogResult<Vec<BookRecord>> {
        let rows: Vec<BookRow> = sqlx::query_as(&format!(
            "SELECT {SELECT_COLUMNS} FROM books ORDER BY created_at DESC, seq DESC"
        ))
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(BookRecord::from).collect())
    }

    async fn delete(&self, id: &str) -> CatalogResult<()> {
        let result = sqlx::query("DELETE FROM books WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(CatalogError::not_found(id));
        }
        Ok(())
    }
}
