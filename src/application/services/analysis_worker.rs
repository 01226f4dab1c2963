use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use tracing::Instrument;

use crate::application::ports::{
    AnalysisJobPayload, AudioFormat, AudioStore, AudioStoreError, CompletedAnalysis, JobEnvelope,
    JobQueue, RepositoryError, SessionRepository, TranscriptionEngine, TranscriptionError,
    ANALYZE_SESSION_JOB,
};
use crate::domain::{SessionId, StorageKey};

use super::{CoachingError, CoachingService, FeatureExtractor, ScoringEngine};

/// Pause after a failed job attempt or queue error, so a persistent failure
/// cannot spin the loop.
const FAILURE_BACKOFF: Duration = Duration::from_secs(1);

/// Single-consumer job processor.
///
/// Pulls one job at a time from the queue and drives the pipeline to a
/// terminal session state before fetching the next. The shutdown flag is
/// observed only between jobs; an in-flight job runs to completion or
/// failure.
pub struct AnalysisWorker {
    queue: Arc<dyn JobQueue>,
    sessions: Arc<dyn SessionRepository>,
    audio_store: Arc<dyn AudioStore>,
    transcription: Arc<dyn TranscriptionEngine>,
    feature_extractor: FeatureExtractor,
    scoring_engine: ScoringEngine,
    coaching: Option<Arc<CoachingService>>,
    poll_interval: Duration,
    running: Arc<AtomicBool>,
}

impl AnalysisWorker {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        queue: Arc<dyn JobQueue>,
        sessions: Arc<dyn SessionRepository>,
        audio_store: Arc<dyn AudioStore>,
        transcription: Arc<dyn TranscriptionEngine>,
        feature_extractor: FeatureExtractor,
        scoring_engine: ScoringEngine,
        coaching: Option<Arc<CoachingService>>,
        poll_interval: Duration,
        running: Arc<AtomicBool>,
    ) -> Self {
        Self {
            queue,
            sessions,
            audio_store,
            transcription,
            feature_extractor,
            scoring_engine,
            coaching,
            poll_interval,
            running,
        }
    }

    pub async fn run(&self) {
        tracing::info!(
            coaching_enabled = self.coaching.is_some(),
            "Analysis worker started"
        );

        while self.running.load(Ordering::SeqCst) {
            match self.queue.dequeue(self.poll_interval).await {
                Ok(None) => continue,
                Ok(Some(envelope)) => {
                    if let Err(e) = self.process_envelope(envelope).await {
                        tracing::error!(error = %e, "Job attempt failed");
                        tokio::time::sleep(FAILURE_BACKOFF).await;
                    }
                }
                Err(e) => {
                    tracing::error!(error = %e, "Queue receive failed");
                    tokio::time::sleep(FAILURE_BACKOFF).await;
                }
            }
        }

        tracing::info!("Analysis worker stopped");
    }

    /// Processes one queue message to a terminal outcome. Unknown job types
    /// are skipped.
    pub async fn process_envelope(&self, envelope: JobEnvelope) -> Result<(), WorkerError> {
        if envelope.job_type != ANALYZE_SESSION_JOB {
            tracing::warn!(job_type = %envelope.job_type, "Skipping unknown job type");
            return Ok(());
        }

        let payload: AnalysisJobPayload = serde_json::from_value(envelope.payload)
            .map_err(|e| WorkerError::MalformedPayload(e.to_string()))?;
        let session_id = SessionId::from_uuid(payload.session_id);

        let span = tracing::info_span!(
            "analysis_job",
            session_id = %session_id,
            audio_key = %payload.audio_key,
        );
        self.process_job(session_id, payload).instrument(span).await
    }

    /// Drives the session state machine: mark processing before any heavy
    /// work, then persist exactly one terminal outcome for the pipeline
    /// result. A session already past `pending` is skipped untouched.
    async fn process_job(
        &self,
        session_id: SessionId,
        payload: AnalysisJobPayload,
    ) -> Result<(), WorkerError> {
        match self.sessions.mark_processing(session_id).await {
            Ok(()) => {}
            Err(RepositoryError::InvalidTransition(reason)) => {
                tracing::warn!(reason = %reason, "Session is not pending; skipping job");
                return Ok(());
            }
            Err(e) => return Err(WorkerError::Repository(e)),
        }

        match self.run_pipeline(session_id, &payload).await {
            Ok(outcome) => {
                let overall = outcome.score_contract.scores.overall;
                let focus = outcome.score_contract.focus_metric;
                self.sessions
                    .mark_completed(session_id, &outcome)
                    .await
                    .map_err(WorkerError::Repository)?;
                tracing::info!(overall, focus = %focus, "Session analysis completed");
                Ok(())
            }
            Err(e) => {
                let message = e.to_string();
                self.sessions
                    .mark_failed(session_id, &message)
                    .await
                    .map_err(WorkerError::Repository)?;
                tracing::error!(error = %message, "Session analysis failed");
                Err(WorkerError::Pipeline(e))
            }
        }
    }

    async fn run_pipeline(
        &self,
        session_id: SessionId,
        payload: &AnalysisJobPayload,
    ) -> Result<CompletedAnalysis, PipelineError> {
        let key = StorageKey::from_raw(payload.audio_key.clone());
        let audio = self
            .audio_store
            .download(&key)
            .await
            .map_err(PipelineError::Storage)?;

        let format = AudioFormat::from_content_type(&payload.content_type);
        let transcript = self
            .transcription
            .transcribe(&audio, format)
            .await
            .map_err(PipelineError::Transcription)?;
        tracing::debug!(
            words = transcript.words.len(),
            duration_sec = transcript.duration,
            "Transcription finished"
        );

        let features = self.feature_extractor.extract(&transcript, Some(&audio));
        tracing::debug!(
            wpm = features.wpm,
            filler_per_min = features.filler_per_min,
            "Features extracted"
        );

        let score_contract = self.scoring_engine.score(session_id, &features);

        let coaching_response = match &self.coaching {
            Some(service) => {
                let response = service
                    .generate(&score_contract)
                    .await
                    .map_err(PipelineError::Coaching)?;
                tracing::debug!(
                    drills = response.recommended_drills.len(),
                    "Coaching generated"
                );
                Some(response)
            }
            None => None,
        };

        Ok(CompletedAnalysis {
            duration_sec: transcript.duration,
            score_contract,
            coaching_response,
            transcript: transcript.words,
        })
    }
}

/// Fatal per-job pipeline failures; each becomes the session's
/// `error_message`.
#[derive(Debug, thiserror::Error)]
pub enum PipelineError {
    #[error("storage: {0}")]
    Storage(AudioStoreError),
    #[error("transcription: {0}")]
    Transcription(TranscriptionError),
    #[error("coaching: {0}")]
    Coaching(CoachingError),
}

#[derive(Debug, thiserror::Error)]
pub enum WorkerError {
    #[error("malformed job payload: {0}")]
    MalformedPayload(String),
    #[error("repository: {0}")]
    Repository(RepositoryError),
    #[error("pipeline: {0}")]
    Pipeline(PipelineError),
}
