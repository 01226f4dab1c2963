mod local_store;
mod s3_store;
mod store_factory;

pub use local_store::LocalAudioStore;
pub use s3_store::S3AudioStore;
pub use store_factory::AudioStoreFactory;
