use async_trait::async_trait;

use crate::domain::TranscriptResult;

/// Container format hint passed alongside raw audio bytes, derived from the
/// job's content type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AudioFormat {
    Wav,
    Mp3,
    M4a,
}

impl AudioFormat {
    /// Unknown content types fall back to wav.
    pub fn from_content_type(content_type: &str) -> AudioFormat {
        match content_type {
            "audio/mpeg" => AudioFormat::Mp3,
            "audio/mp4" | "audio/m4a" | "audio/x-m4a" => AudioFormat::M4a,
            _ => AudioFormat::Wav,
        }
    }

    pub fn suffix(&self) -> &'static str {
        match self {
            AudioFormat::Wav => ".wav",
            AudioFormat::Mp3 => ".mp3",
            AudioFormat::M4a => ".m4a",
        }
    }

    pub fn mime(&self) -> &'static str {
        match self {
            AudioFormat::Wav => "audio/wav",
            AudioFormat::Mp3 => "audio/mpeg",
            AudioFormat::M4a => "audio/mp4",
        }
    }
}

/// Converts raw audio bytes into a word-level transcript.
///
/// Implementations wrap an external recognition backend; the backing model is
/// constructed once per process and shared across jobs. Word text is trimmed
/// by the engine; punctuation stripping is the feature extractor's concern.
#[async_trait]
pub trait TranscriptionEngine: Send + Sync {
    async fn transcribe(
        &self,
        audio: &[u8],
        format: AudioFormat,
    ) -> Result<TranscriptResult, TranscriptionError>;
}

#[derive(Debug, thiserror::Error)]
pub enum TranscriptionError {
    #[error("audio decoding failed: {0}")]
    DecodingFailed(String),
    #[error("transcription failed: {0}")]
    TranscriptionFailed(String),
    #[error("unsupported audio format: {0}")]
    UnsupportedFormat(String),
    #[error("model loading failed: {0}")]
    ModelLoadFailed(String),
    #[error("api request failed: {0}")]
    ApiRequestFailed(String),
}
