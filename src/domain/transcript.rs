use serde::{Deserialize, Serialize};

/// A single recognized word with timing information.
///
/// Words are ordered by start time but are not guaranteed non-overlapping.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TranscriptWord {
    pub word: String,
    pub start: f64,
    pub end: f64,
    pub confidence: f64,
}

/// Full word-level transcription result.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TranscriptResult {
    pub text: String,
    pub words: Vec<TranscriptWord>,
    pub language: String,
    pub duration: f64,
}

impl TranscriptResult {
    /// Duration rule: end of the last word if any words exist, else the end
    /// of the last recognized segment, else 0.
    pub fn duration_from(words: &[TranscriptWord], last_segment_end: Option<f64>) -> f64 {
        words
            .last()
            .map(|w| w.end)
            .or(last_segment_end)
            .unwrap_or(0.0)
    }
}
