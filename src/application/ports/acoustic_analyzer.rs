/// Audio-derived speech characteristics.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AcousticProfile {
    /// Standard deviation of the voiced pitch track, in Hz.
    pub pitch_variance: f64,
    /// Coefficient of variation of frame-wise loudness, clamped to [0, 1].
    pub volume_stability: f64,
}

/// Optional acoustic analysis over raw audio bytes.
///
/// Callers treat any failure as recoverable: the profile defaults to zeros
/// and the job continues.
pub trait AcousticAnalyzer: Send + Sync {
    fn analyze(&self, audio: &[u8]) -> Result<AcousticProfile, AcousticAnalysisError>;
}

#[derive(Debug, thiserror::Error)]
pub enum AcousticAnalysisError {
    #[error("audio decoding failed: {0}")]
    DecodingFailed(String),
    #[error("analysis failed: {0}")]
    AnalysisFailed(String),
}
