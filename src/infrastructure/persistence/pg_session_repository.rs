use async_trait::async_trait;
use chrono::Utc;
use sqlx::{PgPool, Row};
use tracing::instrument;

use crate::application::ports::{CompletedAnalysis, RepositoryError, SessionRepository};
use crate::domain::{Session, SessionId, SessionStatus, StorageKey};

/// Postgres-backed session store.
///
/// Status transitions are guarded in SQL: every UPDATE is predicated on the
/// expected prior status, so a terminal session can never be re-processed
/// even when a duplicate job is delivered.
pub struct PgSessionRepository {
    pool: PgPool,
}

impl PgSessionRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    async fn current_status(&self, id: SessionId) -> Result<Option<String>, RepositoryError> {
        let row = sqlx::query("SELECT status FROM sessions WHERE id = $1")
            .bind(id.as_uuid())
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| RepositoryError::QueryFailed(e.to_string()))?;

        row.map(|r| r.try_get::<String, _>("status"))
            .transpose()
            .map_err(|e| RepositoryError::QueryFailed(e.to_string()))
    }

    /// Converts a zero-row guarded UPDATE into the precise error: the
    /// session either does not exist or is not in the expected status.
    async fn transition_rejected(
        &self,
        id: SessionId,
        target: SessionStatus,
    ) -> RepositoryError {
        match self.current_status(id).await {
            Ok(Some(current)) => RepositoryError::InvalidTransition(format!(
                "session {} cannot move {} -> {}",
                id, current, target
            )),
            Ok(None) => RepositoryError::NotFound(id.to_string()),
            Err(e) => e,
        }
    }
}

#[async_trait]
impl SessionRepository for PgSessionRepository {
    #[instrument(skip(self, session), fields(session_id = %session.id))]
    async fn create(&self, session: &Session) -> Result<(), RepositoryError> {
        sqlx::query(
            r#"
            INSERT INTO sessions
                (id, audio_key, audio_url, duration_sec, status, error_message,
                 score_contract, coaching_response, transcript,
                 created_at, updated_at, completed_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12)
            "#,
        )
        .bind(session.id.as_uuid())
        .bind(session.audio_key.as_str())
        .bind(&session.audio_url)
        .bind(session.duration_sec)
        .bind(session.status.as_str())
        .bind(&session.error_message)
        .bind(
            session
                .score_contract
                .as_ref()
                .map(serde_json::to_value)
                .transpose()
                .map_err(|e| RepositoryError::QueryFailed(e.to_string()))?,
        )
        .bind(
            session
                .coaching_response
                .as_ref()
                .map(serde_json::to_value)
                .transpose()
                .map_err(|e| RepositoryError::QueryFailed(e.to_string()))?,
        )
        .bind(
            session
                .transcript
                .as_ref()
                .map(serde_json::to_value)
                .transpose()
                .map_err(|e| RepositoryError::QueryFailed(e.to_string()))?,
        )
        .bind(session.created_at)
        .bind(session.updated_at)
        .bind(session.completed_at)
        .execute(&self.pool)
        .await
        .map_err(|e| RepositoryError::QueryFailed(e.to_string()))?;

        Ok(())
    }

    #[instrument(skip(self), fields(session_id = %id))]
    async fn get_by_id(&self, id: SessionId) -> Result<Option<Session>, RepositoryError> {
        let row = sqlx::query(
            r#"
            SELECT id, audio_key, audio_url, duration_sec, status, error_message,
                   score_contract, coaching_response, transcript,
                   created_at, updated_at, completed_at
            FROM sessions
            WHERE id = $1
            "#,
        )
        .bind(id.as_uuid())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| RepositoryError::QueryFailed(e.to_string()))?;

        row.map(row_to_session).transpose()
    }

    #[instrument(skip(self), fields(session_id = %id))]
    async fn mark_processing(&self, id: SessionId) -> Result<(), RepositoryError> {
        let result = sqlx::query(
            "UPDATE sessions SET status = $1, updated_at = $2 WHERE id = $3 AND status = $4",
        )
        .bind(SessionStatus::Processing.as_str())
        .bind(Utc::now())
        .bind(id.as_uuid())
        .bind(SessionStatus::Pending.as_str())
        .execute(&self.pool)
        .await
        .map_err(|e| RepositoryError::QueryFailed(e.to_string()))?;

        if result.rows_affected() == 0 {
            return Err(self.transition_rejected(id, SessionStatus::Processing).await);
        }
        Ok(())
    }

    #[instrument(skip(self, outcome), fields(session_id = %id))]
    async fn mark_completed(
        &self,
        id: SessionId,
        outcome: &CompletedAnalysis,
    ) -> Result<(), RepositoryError> {
        let score_contract = serde_json::to_value(&outcome.score_contract)
            .map_err(|e| RepositoryError::QueryFailed(e.to_string()))?;
        let coaching_response = outcome
            .coaching_response
            .as_ref()
            .map(serde_json::to_value)
            .transpose()
            .map_err(|e| RepositoryError::QueryFailed(e.to_string()))?;
        let transcript = serde_json::to_value(&outcome.transcript)
            .map_err(|e| RepositoryError::QueryFailed(e.to_string()))?;

        let now = Utc::now();
        let result = sqlx::query(
            r#"
            UPDATE sessions
            SET status = $1, duration_sec = $2, score_contract = $3,
                coaching_response = $4, transcript = $5, error_message = NULL,
                updated_at = $6, completed_at = $6
            WHERE id = $7 AND status = $8
            "#,
        )
        .bind(SessionStatus::Completed.as_str())
        .bind(outcome.duration_sec)
        .bind(score_contract)
        .bind(coaching_response)
        .bind(transcript)
        .bind(now)
        .bind(id.as_uuid())
        .bind(SessionStatus::Processing.as_str())
        .execute(&self.pool)
        .await
        .map_err(|e| RepositoryError::QueryFailed(e.to_string()))?;

        if result.rows_affected() == 0 {
            return Err(self.transition_rejected(id, SessionStatus::Completed).await);
        }
        Ok(())
    }

    #[instrument(skip(self, error_message), fields(session_id = %id))]
    async fn mark_failed(
        &self,
        id: SessionId,
        error_message: &str,
    ) -> Result<(), RepositoryError> {
        let result = sqlx::query(
            r#"
            UPDATE sessions
            SET status = $1, error_message = $2, updated_at = $3
            WHERE id = $4 AND status = $5
            "#,
        )
        .bind(SessionStatus::Failed.as_str())
        .bind(error_message)
        .bind(Utc::now())
        .bind(id.as_uuid())
        .bind(SessionStatus::Processing.as_str())
        .execute(&self.pool)
        .await
        .map_err(|e| RepositoryError::QueryFailed(e.to_string()))?;

        if result.rows_affected() == 0 {
            return Err(self.transition_rejected(id, SessionStatus::Failed).await);
        }
        Ok(())
    }
}

fn row_to_session(row: sqlx::postgres::PgRow) -> Result<Session, RepositoryError> {
    let query_err = |e: sqlx::Error| RepositoryError::QueryFailed(e.to_string());
    let json_err = |e: serde_json::Error| RepositoryError::QueryFailed(e.to_string());

    let status: String = row.try_get("status").map_err(query_err)?;
    let status = status
        .parse::<SessionStatus>()
        .map_err(RepositoryError::QueryFailed)?;

    let score_contract: Option<serde_json::Value> =
        row.try_get("score_contract").map_err(query_err)?;
    let coaching_response: Option<serde_json::Value> =
        row.try_get("coaching_response").map_err(query_err)?;
    let transcript: Option<serde_json::Value> = row.try_get("transcript").map_err(query_err)?;

    Ok(Session {
        id: SessionId::from_uuid(row.try_get("id").map_err(query_err)?),
        audio_key: StorageKey::from_raw(row.try_get::<String, _>("audio_key").map_err(query_err)?),
        audio_url: row.try_get("audio_url").map_err(query_err)?,
        duration_sec: row.try_get("duration_sec").map_err(query_err)?,
        status,
        error_message: row.try_get("error_message").map_err(query_err)?,
        score_contract: score_contract
            .map(serde_json::from_value)
            .transpose()
            .map_err(json_err)?,
        coaching_response: coaching_response
            .map(serde_json::from_value)
            .transpose()
            .map_err(json_err)?,
        transcript: transcript
            .map(serde_json::from_value)
            .transpose()
            .map_err(json_err)?,
        created_at: row.try_get("created_at").map_err(query_err)?,
        updated_at: row.try_get("updated_at").map_err(query_err)?,
        completed_at: row.try_get("completed_at").map_err(query_err)?,
    })
}
