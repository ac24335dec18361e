//! Binary object storage for book cover images.
//!
//! Objects are addressed by key and become readable through a deterministic
//! public URL once [`AssetStore::make_public`] succeeds.

mod error;
mod memory;
mod s3;
mod store;

pub use error::{AssetError, AssetResult};
pub use memory::MemoryAssets;
pub use s3::{S3Assets, S3Config};
pub use store::{public_url, AssetStore};
