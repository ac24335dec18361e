//! Catalog storage for book records.
//!
//! [`CatalogStore`] is the seam the application talks to. Two backends ship
//! with the crate: [`MemoryCatalog`] for tests and single-process runs, and
//! [`PgCatalog`] on top of a `sqlx` PostgreSQL pool.

mod error;
mod memory;
mod migrate;
mod postgres;
mod record;
mod schema;
mod store;

pub use error::{CatalogError, CatalogResult};
pub use memory::MemoryCatalog;
pub use migrate::run_migrations;
pub use postgres::{create_pool, health_check, DbPool, PgCatalog};
pub use record::{BookPatch, BookRecord, NewBook};
pub use schema::books_migrations;
pub use store::CatalogStore;
