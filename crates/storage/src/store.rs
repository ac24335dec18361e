use async_trait::async_trait;
use bytes::Bytes;

use crate::AssetResult;

/// Object storage operations needed by the catalog
#[async_trait]
pub trait AssetStore: Send + Sync {
    /// Write `data` under `key`, replacing any existing object
    async fn put(&self, key: &str, data: Bytes, content_type: Option<&str>) -> AssetResult<()>;

    /// Mark the object anonymously readable
    async fn make_public(&self, key: &str) -> AssetResult<()>;

    /// Public location of `key`. Pure; performs no I/O.
    fn public_url(&self, key: &str) -> String;

    /// Remove the object. An absent key counts as success.
    async fn delete(&self, key: &str) -> AssetResult<()>;
}

/// `{base}/{bucket}/{key}` with any trailing slash on `base` ignored.
pub fn public_url(base: &str, bucket: &str, key: &str) -> String {
    format!("{}/{}/{}", base.trim_end_matches('/'), bucket, key)
}
