use std::path::PathBuf;
use std::sync::Arc;

use async_trait::async_trait;
use object_store::local::LocalFileSystem;
use object_store::path::Path as StorePath;
use object_store::{ObjectStore, PutPayload};

use crate::application::ports::{AudioStore, AudioStoreError};
use crate::domain::StorageKey;

/// Filesystem-backed audio store for development and tests.
pub struct LocalAudioStore {
    inner: Arc<LocalFileSystem>,
    base_path: PathBuf,
}

impl LocalAudioStore {
    pub fn new(base_path: PathBuf) -> Result<Self, AudioStoreError> {
        std::fs::create_dir_all(&base_path).map_err(AudioStoreError::Io)?;
        let fs = LocalFileSystem::new_with_prefix(&base_path)
            .map_err(|e| AudioStoreError::UploadFailed(e.to_string()))?;
        Ok(Self {
            inner: Arc::new(fs),
            base_path,
        })
    }
}

#[async_trait]
impl AudioStore for LocalAudioStore {
    async fn download(&self, key: &StorageKey) -> Result<Vec<u8>, AudioStoreError> {
        let path = StorePath::from(key.as_str());
        let result = self
            .inner
            .get(&path)
            .await
            .map_err(|e| map_get_error(key, e))?;

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
        _content_type: &str,
    ) -> Result<String, AudioStoreError> {
        let path = StorePath::from(key.as_str());
        self.inner
            .put(&path, PutPayload::from(data))
            .await
            .map_err(|e| AudioStoreError::UploadFailed(e.to_string()))?;

        Ok(self.base_path.join(key.as_str()).display().to_string())
    }
}

fn map_get_error(key: &StorageKey, error: object_store::Error) -> AudioStoreError {
    match error {
        object_store::Error::NotFound { .. } => AudioStoreError::NotFound(key.to_string()),
        other => AudioStoreError::DownloadFailed(other.to_string()),
    }
}
