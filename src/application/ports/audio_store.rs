use async_trait::async_trait;

use crate::domain::StorageKey;

/// Object storage holding uploaded recordings.
#[async_trait]
pub trait AudioStore: Send + Sync {
    async fn download(&self, key: &StorageKey) -> Result<Vec<u8>, AudioStoreError>;

    /// Returns a backend-specific URL for the stored object.
    async fn upload(
        &self,
        key: &StorageKey,
        data: Vec<u8>,
        content_type: &str,
    ) -> Result<String, AudioStoreError>;
}

#[derive(Debug, thiserror::Error)]
pub enum AudioStoreError {
    #[error("object not found: {0}")]
    NotFound(String),
    #[error("download failed: {0}")]
    DownloadFailed(String),
    #[error("upload failed: {0}")]
    UploadFailed(String),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}
