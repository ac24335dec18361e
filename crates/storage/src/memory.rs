use std::collections::HashMap;

use async_trait::async_trait;
use bytes::Bytes;
use tokio::sync::RwLock;

use crate::{store, AssetError, AssetResult, AssetStore};

const DEFAULT_BASE_URL: &str = "https://storage.googleapis.com";

#[derive(Debug, Clone)]
struct StoredObject {
    data: Bytes,
    content_type: Option<String>,
    public: bool,
}

/// Process-local object store.
///
/// Behaves like a bucket: writes replace, freshly written objects are
/// private until [`AssetStore::make_public`] is called, and deleting a
/// missing key is not an error.
pub struct MemoryAssets {
    base_url: String,
    bucket: String,
    objects: RwLock<HashMap<String, StoredObject>>,
}

impl MemoryAssets {
    pub fn new(bucket: impl Into<String>) -> Self {
        Self::with_base_url(DEFAULT_BASE_URL, bucket)
    }

    pub fn with_base_url(base_url: impl Into<String>, bucket: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            bucket: bucket.into(),
            objects: RwLock::new(HashMap::new()),
        }
    }

    pub async fn get(&self, key: &str) -> Option<Bytes> {
        self.objects.read().await.get(key).map(|o| o.data.clone())
    }

    pub async fn content_type(&self, key: &str) -> Option<String> {
        self.objects
            .read()
            .await
            .get(key)
            .and_then(|o| o.content_type.clone())
    }

    pub async fn is_public(&self, key: &str) -> bool {
        self.objects
            .read()
            .await
            .get(key)
            .map(|o| o.public)
            .unwrap_or(false)
    }

    /// What an anonymous client would receive for `url`: the object bytes if
    /// the URL belongs to this bucket and the object is public.
    pub async fn fetch_public(&self, url: &str) -> Option<Bytes> {
        let prefix = store::public_url(&self.base_url, &self.bucket, "");
        let key = url.strip_prefix(&prefix)?;
        let objects = self.objects.read().await;
        let object = objects.get(key)?;
        object.public.then(|| object.data.clone())
    }

    pub async fn len(&self) -> usize {
        self.objects.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}

#[async_trait]
impl AssetStore for MemoryAssets {
    async fn put(&self, key: &str, data: Bytes, content_type: Option<&str>) -> AssetResult<()> {
        self.objects.write().await.insert(
            key.to_string(),
            StoredObject {
                data,
                content_type: content_type.map(str::to_string),
                public: false,
            },
        );
        Ok(())
    }

    async fn make_public(&self, key: &str) -> AssetResult<()> {
        let mut objects = self.objects.write().await;
        let object = objects.get_mut(key).ok_or_else(|| AssetError::not_found(key))?;
        object.public = true;
        Ok(())
    }

    fn public_url(&self, key: &str) -> String {
        store::public_url(&self.base_url, &self.bucket, key)
    }

    async fn delete(&self, key: &str) -> AssetResult<()> {
        self.objects.write().await.remove(key);
        Ok(())
    }
}
