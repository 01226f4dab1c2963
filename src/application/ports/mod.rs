mod acoustic_analyzer;
mod audio_store;
mod job_queue;
mod llm_client;
mod repository_error;
mod session_repository;
mod transcription_engine;

pub use acoustic_analyzer::{AcousticAnalysisError, AcousticAnalyzer, AcousticProfile};
pub use audio_store::{AudioStore, AudioStoreError};
pub use job_queue::{
    AnalysisJobPayload, JobEnvelope, JobQueue, JobQueueError, ANALYZE_SESSION_JOB,
};
pub use llm_client::{LlmClient, LlmClientError};
pub use repository_error::RepositoryError;
pub use session_repository::{CompletedAnalysis, SessionRepository};
pub use transcription_engine::{AudioFormat, TranscriptionEngine, TranscriptionError};
