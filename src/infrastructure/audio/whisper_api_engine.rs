use async_trait::async_trait;
use reqwest::multipart;
use serde::Deserialize;

use crate::application::ports::{AudioFormat, TranscriptionEngine, TranscriptionError};
use crate::domain::{TranscriptResult, TranscriptWord};

/// Word-level transcription via an OpenAI-compatible
/// `/audio/transcriptions` endpoint.
///
/// The heavy recognition model lives behind the HTTP boundary; this engine
/// is constructed once at startup and shared across jobs.
pub struct WhisperApiEngine {
    client: reqwest::Client,
    api_key: String,
    base_url: String,
    model: String,
}

impl WhisperApiEngine {
    pub fn new(api_key: String, base_url: Option<String>, model: Option<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            api_key,
            base_url: base_url.unwrap_or_else(|| "https://api.openai.com/v1".to_string()),
            model: model.unwrap_or_else(|| "whisper-1".to_string()),
        }
    }
}

#[derive(Debug, Deserialize)]
struct ApiTranscription {
    text: String,
    language: Option<String>,
    words: Option<Vec<ApiWord>>,
    segments: Option<Vec<ApiSegment>>,
}

#[derive(Debug, Deserialize)]
struct ApiWord {
    word: String,
    start: f64,
    end: f64,
    // The verbose_json word granularity carries no per-word probability.
    probability: Option<f64>,
}

#[derive(Debug, Deserialize)]
struct ApiSegment {
    end: f64,
}

#[async_trait]
impl TranscriptionEngine for WhisperApiEngine {
    async fn transcribe(
        &self,
        audio: &[u8],
        format: AudioFormat,
    ) -> Result<TranscriptResult, TranscriptionError> {
        let url = format!("{}/audio/transcriptions", self.base_url);

        let file_part = multipart::Part::bytes(audio.to_vec())
            .file_name(format!("audio{}", format.suffix()))
            .mime_str(format.mime())
            .map_err(|e| TranscriptionError::ApiRequestFailed(format!("mime: {}", e)))?;

        let form = multipart::Form::new()
            .text("model", self.model.clone())
            .text("response_format", "verbose_json")
            .text("timestamp_granularities[]", "word")
            .text("timestamp_granularities[]", "segment")
            .text("language", "en")
            .part("file", file_part);

        tracing::debug!(model = %self.model, bytes = audio.len(), "Sending audio for transcription");

        let response = self
            .client
            .post(&url)
            .bearer_auth(&self.api_key)
            .multipart(form)
            .send()
            .await
            .map_err(|e| TranscriptionError::ApiRequestFailed(format!("request: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "unknown error".to_string());
            return Err(TranscriptionError::ApiRequestFailed(format!(
                "status {}: {}",
                status, body
            )));
        }

        let transcription: ApiTranscription = response
            .json()
            .await
            .map_err(|e| TranscriptionError::TranscriptionFailed(format!("body: {}", e)))?;

        let words: Vec<TranscriptWord> = transcription
            .words
            .unwrap_or_default()
            .into_iter()
            .map(|w| TranscriptWord {
                word: w.word.trim().to_string(),
                start: w.start,
                end: w.end,
                confidence: w.probability.unwrap_or(1.0),
            })
            .collect();

        let last_segment_end = transcription
            .segments
            .as_ref()
            .and_then(|segments| segments.last())
            .map(|s| s.end);
        let duration = TranscriptResult::duration_from(&words, last_segment_end);

        tracing::info!(
            words = words.len(),
            duration_sec = duration,
            "Transcription completed"
        );

        Ok(TranscriptResult {
            text: transcription.text.trim().to_string(),
            words,
            language: transcription.language.unwrap_or_else(|| "en".to_string()),
            duration,
        })
    }
}
