mod settings;

pub use settings::{
    CoachingSettings, DatabaseSettings, QueueSettings, Settings, StorageBackend, StorageSettings,
    TranscriptionSettings,
};
