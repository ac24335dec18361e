use async_trait::async_trait;
use aws_config::{BehaviorVersion, Region};
use aws_credential_types::Credentials;
use aws_sdk_s3::{primitives::ByteStream, types::ObjectCannedAcl, Client};
use bytes::Bytes;

use crate::{store, AssetError, AssetResult, AssetStore};

/// Connection parameters for an S3-compatible bucket.
#[derive(Debug, Clone)]
pub struct S3Config {
    pub bucket: String,
    pub region: String,
    /// Custom endpoint (MinIO, RustFS, GCS interoperability, ...).
    pub endpoint_url: Option<String>,
    /// Static credentials; when absent the SDK's default provider chain is used.
    pub access_key_id: Option<String>,
    pub secret_access_key: Option<String>,
    pub public_base_url: String,
}

/// Asset store on any S3-compatible object storage.
#[derive(Clone)]
pub struct S3Assets {
    client: Client,
    bucket: String,
    public_base_url: String,
}

impl S3Assets {
    pub async fn new(config: S3Config) -> Self {
        let mut loader =
            aws_config::defaults(BehaviorVersion::latest()).region(Region::new(config.region));

        if let (Some(access_key_id), Some(secret_access_key)) =
            (config.access_key_id, config.secret_access_key)
        {
            loader = loader.credentials_provider(Credentials::new(
                access_key_id,
                secret_access_key,
                None,
                None,
                "shelf",
            ));
        }

        let custom_endpoint = config.endpoint_url.is_some();
        if let Some(endpoint_url) = config.endpoint_url {
            loader = loader.endpoint_url(endpoint_url);
        }

        let sdk_config = loader.load().await;
        let client = Client::from_conf(
            aws_sdk_s3::config::Builder::from(&sdk_config)
                // self-hosted endpoints rarely support virtual-hosted buckets
                .force_path_style(custom_endpoint)
                .build(),
        );

        Self::from_client(client, config.bucket, config.public_base_url)
    }

    pub fn from_client(
        client: Client,
        bucket: impl Into<String>,
        public_base_url: impl Into<String>,
    ) -> Self {
        Self {
            client,
            bucket: bucket.into(),
            public_base_url: public_base_url.into(),
        }
    }

    fn map_aws_error(err: impl std::error::Error + Send + Sync + 'static) -> AssetError {
        AssetError::backend(err)
    }
}

#[async_trait]
impl AssetStore for S3Assets {
    async fn put(&self, key: &str, data: Bytes, content_type: Option<&str>) -> AssetResult<()> {
        let size = data.len();
        let mut request = self
            .client
            .put_object()
            .bucket(&self.bucket)
            .key(key)
            .body(ByteStream::from(data));

        if let Some(ct) = content_type {
            request = request.content_type(ct);
        }

        request.send().await.map_err(Self::map_aws_error)?;
        tracing::debug!(bucket = %self.bucket, key, size, "object written");
        Ok(())
    }

    async fn make_public(&self, key: &str) -> AssetResult<()> {
        self.client
            .put_object_acl()
            .bucket(&self.bucket)
            .key(key)
            .acl(ObjectCannedAcl::PublicRead)
            .send()
            .await
            .map_err(Self::map_aws_error)?;
        Ok(())
    }

    fn public_url(&self, key: &str) -> String {
        store::public_url(&self.public_base_url, &self.bucket, key)
    }

    async fn delete(&self, key: &str) -> AssetResult<()> {
        // DeleteObject succeeds for keys that do not exist.
        self.client
            .delete_object()
            .bucket(&self.bucket)
            .key(key)
            .send()
            .await
            .map_err(Self::map_aws_error)?;
        Ok(())
    }
}
