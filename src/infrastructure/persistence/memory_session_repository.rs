use std::collections::HashMap;

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::Mutex;
use uuid::Uuid;

use crate::application::ports::{CompletedAnalysis, RepositoryError, SessionRepository};
use crate::domain::{Session, SessionId, SessionStatus};

/// In-memory session store enforcing the same transition table as the
/// Postgres repository. Used by tests and local runs without a database.
#[derive(Default)]
pub struct InMemorySessionRepository {
    sessions: Mutex<HashMap<Uuid, Session>>,
}

impl InMemorySessionRepository {
    pub fn new() -> Self {
        Self::default()
    }

    async fn transition<F>(
        &self,
        id: SessionId,
        target: SessionStatus,
        apply: F,
    ) -> Result<(), RepositoryError>
    where
        F: FnOnce(&mut Session),
    {
        let mut sessions = self.sessions.lock().await;
        let session = sessions
            .get_mut(&id.as_uuid())
            .ok_or_else(|| RepositoryError::NotFound(id.to_string()))?;

        if !session.status.can_transition_to(target) {
            return Err(RepositoryError::InvalidTransition(format!(
                "session {} cannot move {} -> {}",
                id, session.status, target
            )));
        }

        session.status = target;
        session.updated_at = Utc::now();
        apply(session);
        Ok(())
    }
}

#[async_trait]
impl SessionRepository for InMemorySessionRepository {
    async fn create(&self, session: &Session) -> Result<(), RepositoryError> {
        let mut sessions = self.sessions.lock().await;
        sessions.insert(session.id.as_uuid(), session.clone());
        Ok(())
    }

    async fn get_by_id(&self, id: SessionId) -> Result<Option<Session>, RepositoryError> {
        let sessions = self.sessions.lock().await;
        Ok(sessions.get(&id.as_uuid()).cloned())
    }

    async fn mark_processing(&self, id: SessionId) -> Result<(), RepositoryError> {
        self.transition(id, SessionStatus::Processing, |_| {}).await
    }

    async fn mark_completed(
        &self,
        id: SessionId,
        outcome: &CompletedAnalysis,
    ) -> Result<(), RepositoryError> {
        self.transition(id, SessionStatus::Completed, |session| {
            session.duration_sec = Some(outcome.duration_sec);
            session.score_contract = Some(outcome.score_contract.clone());
            session.coaching_response = outcome.coaching_response.clone();
            session.transcript = Some(outcome.transcript.clone());
            session.error_message = None;
            session.completed_at = Some(Utc::now());
        })
        .await
    }

    async fn mark_failed(
        &self,
        id: SessionId,
        error_message: &str,
    ) -> Result<(), RepositoryError> {
        self.transition(id, SessionStatus::Failed, |session| {
            session.error_message = Some(error_message.to_string());
        })
        .await
    }
}
