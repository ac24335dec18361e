//! Shelf: a book catalog with cover images.
//!
//! Records live in a [`shelf_db::CatalogStore`], images in a
//! [`shelf_storage::AssetStore`]; [`modules::books::BookService`] keeps the
//! two consistent enough for readers and exposes the workflows over HTTP.

pub mod app;
pub mod modules;

pub use app::App;
