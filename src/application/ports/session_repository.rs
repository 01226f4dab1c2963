use async_trait::async_trait;

use crate::domain::{
    CoachingResponse, ScoreContract, Session, SessionId, TranscriptWord,
};

use super::RepositoryError;

/// Everything persisted on a successfully analyzed session.
#[derive(Debug, Clone)]
pub struct CompletedAnalysis {
    pub duration_sec: f64,
    pub score_contract: ScoreContract,
    pub coaching_response: Option<CoachingResponse>,
    pub transcript: Vec<TranscriptWord>,
}

/// Key-value persistence for sessions, keyed by session id.
///
/// Transition methods enforce the session state machine: each one succeeds
/// only from the expected prior status and fails with
/// [`RepositoryError::InvalidTransition`] otherwise, so a terminal session is
/// never re-processed.
#[async_trait]
pub trait SessionRepository: Send + Sync {
    async fn create(&self, session: &Session) -> Result<(), RepositoryError>;

    async fn get_by_id(&self, id: SessionId) -> Result<Option<Session>, RepositoryError>;

    /// pending -> processing. Persisted before any heavy pipeline work.
    async fn mark_processing(&self, id: SessionId) -> Result<(), RepositoryError>;

    /// processing -> completed, recording the full analysis outcome and
    /// stamping `completed_at`.
    async fn mark_completed(
        &self,
        id: SessionId,
        outcome: &CompletedAnalysis,
    ) -> Result<(), RepositoryError>;

    /// processing -> failed, recording the cause.
    async fn mark_failed(&self, id: SessionId, error_message: &str)
        -> Result<(), RepositoryError>;
}
