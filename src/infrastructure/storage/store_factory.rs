use std::path::PathBuf;
use std::sync::Arc;

use crate::application::ports::{AudioStore, AudioStoreError};
use crate::config::{StorageBackend, StorageSettings};

use super::local_store::LocalAudioStore;
use super::s3_store::S3AudioStore;

pub struct AudioStoreFactory;

impl AudioStoreFactory {
    pub fn create(settings: &StorageSettings) -> Result<Arc<dyn AudioStore>, AudioStoreError> {
        match settings.backend {
            StorageBackend::Local => {
                let store = LocalAudioStore::new(PathBuf::from(&settings.local_path))?;
                Ok(Arc::new(store))
            }
            StorageBackend::S3 => {
                let store = S3AudioStore::new(
                    &settings.s3_bucket,
                    &settings.s3_region,
                    settings.s3_endpoint_url.as_deref(),
                    settings.aws_access_key_id.as_deref(),
                    settings.aws_secret_access_key.as_deref(),
                )?;
                Ok(Arc::new(store))
            }
        }
    }
}
