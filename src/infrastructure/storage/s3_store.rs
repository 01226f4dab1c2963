use std::sync::Arc;

use async_trait::async_trait;
use object_store::aws::{AmazonS3, AmazonS3Builder};
use object_store::path::Path as StorePath;
use object_store::{ObjectStore, PutPayload};

use crate::application::ports::{AudioStore, AudioStoreError};
use crate::domain::StorageKey;

/// S3-compatible audio store (AWS or any endpoint speaking the S3 API).
pub struct S3AudioStore {
    inner: Arc<AmazonS3>,
    bucket: String,
}

impl S3AudioStore {
    pub fn new(
        bucket: &str,
        region: &str,
        endpoint_url: Option<&str>,
        access_key_id: Option<&str>,
        secret_access_key: Option<&str>,
    ) -> Result<Self, AudioStoreError> {
        let mut builder = AmazonS3Builder::from_env()
            .with_bucket_name(bucket)
            .with_region(region);

        if let Some(endpoint) = endpoint_url {
            builder = builder.with_endpoint(endpoint).with_allow_http(true);
        }
        if let Some(key_id) = access_key_id {
            builder = builder.with_access_key_id(key_id);
        }
        if let Some(secret) = secret_access_key {
            builder = builder.with_secret_access_key(secret);
        }

        let store = builder
            .build()
            .map_err(|e| AudioStoreError::UploadFailed(format!("s3 client: {}", e)))?;

        Ok(Self {
            inner: Arc::new(store),
            bucket: bucket.to_string(),
        })
    }
}

#[async_trait]
impl AudioStore for S3AudioStore {
    async fn download(&self, key: &StorageKey) -> Result<Vec<u8>, AudioStoreError> {
        let path = StorePath::from(key.as_str());
        let result = self.inner.get(&path).await.map_err(|e| match e {
            object_store::Error::NotFound { .. } => AudioStoreError::NotFound(key.to_string()),
            other => AudioStoreError::DownloadFailed(other.to_string()),
        })?;

        let bytes = result
            .bytes()
            .await
            .map_err(|e| AudioStoreError::DownloadFailed(e.to_string()))?;

        Ok(bytes.to_vec())
    }

    async fn upload(
        &self,
        key: &StorageKey,
        data: Vec<u8>,
        content_type: &str,
    ) -> Result<String, AudioStoreError> {
        use object_store::{Attribute, Attributes, PutOptions};

        let path = StorePath::from(key.as_str());

        let mut attributes = Attributes::new();
        attributes.insert(Attribute::ContentType, content_type.to_string().into());
        let options = PutOptions::from(attributes);

        self.inner
            .put_opts(&path, PutPayload::from(data), options)
            .await
            .map_err(|e| AudioStoreError::UploadFailed(e.to_string()))?;

        Ok(format!("s3://{}/{}", self.bucket, key))
    }
}
