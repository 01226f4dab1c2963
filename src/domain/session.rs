use chrono::{DateTime, Utc};

use super::{CoachingResponse, ScoreContract, SessionId, SessionStatus, StorageKey, TranscriptWord};

/// A recording session and its analysis outcome.
///
/// Created by the upload flow in `Pending`; mutated only by the analysis
/// worker afterwards. Never deleted by this worker.
#[derive(Debug, Clone)]
pub struct Session {
    pub id: SessionId,
    pub audio_key: StorageKey,
    pub audio_url: Option<String>,
    pub duration_sec: Option<f64>,
    pub status: SessionStatus,
    pub error_message: Option<String>,
    pub score_contract: Option<ScoreContract>,
    pub coaching_response: Option<CoachingResponse>,
    pub transcript: Option<Vec<TranscriptWord>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub completed_at: Option<DateTime<Utc>>,
}

impl Session {
    pub fn new(audio_key: StorageKey) -> Self {
        let now = Utc::now();
        Self {
            id: SessionId::new(),
            audio_key,
            audio_url: None,
            duration_sec: None,
            status: SessionStatus::Pending,
            error_message: None,
            score_contract: None,
            coaching_response: None,
            transcript: None,
            created_at: now,
            updated_at: now,
            completed_at: None,
        }
    }
}
