use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Queue message: a typed envelope around a job-specific payload.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JobEnvelope {
    #[serde(rename = "type")]
    pub job_type: String,
    pub payload: serde_json::Value,
}

pub const ANALYZE_SESSION_JOB: &str = "analyze_session";

/// Payload of an `analyze_session` job.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisJobPayload {
    pub session_id: Uuid,
    pub audio_key: String,
    #[serde(default = "default_content_type")]
    pub content_type: String,
}

fn default_content_type() -> String {
    "audio/wav".to_string()
}

impl JobEnvelope {
    pub fn analyze_session(payload: &AnalysisJobPayload) -> Self {
        Self {
            job_type: ANALYZE_SESSION_JOB.to_string(),
            payload: serde_json::json!({
                "session_id": payload.session_id,
                "audio_key": payload.audio_key,
                "content_type": payload.content_type,
            }),
        }
    }
}

/// Abstract enqueue/dequeue capability over the job transport.
#[async_trait]
pub trait JobQueue: Send + Sync {
    async fn enqueue(&self, envelope: &JobEnvelope) -> Result<(), JobQueueError>;

    /// Blocks up to `timeout` for the next message; `None` on timeout so the
    /// consumer can check its shutdown flag between jobs.
    async fn dequeue(&self, timeout: Duration) -> Result<Option<JobEnvelope>, JobQueueError>;
}

#[derive(Debug, thiserror::Error)]
pub enum JobQueueError {
    #[error("connection failed: {0}")]
    ConnectionFailed(String),
    #[error("transport failed: {0}")]
    TransportFailed(String),
    #[error("malformed message: {0}")]
    MalformedMessage(String),
}
