use super::FlagReason;

/// A flagged moment in the recording, in seconds from the start.
///
/// Flags are kept in append order: filler flags first, then pause flags.
#[derive(Debug, Clone, PartialEq)]
pub struct FlagEvent {
    pub t_start: f64,
    pub t_end: f64,
    pub reason: FlagReason,
}

/// All features extracted from a transcript and (optionally) raw audio.
///
/// Derived data only; carries no identity and is never persisted directly.
#[derive(Debug, Clone, PartialEq)]
pub struct ExtractedFeatures {
    pub duration_sec: f64,
    pub wpm: f64,
    pub filler_per_min: f64,
    pub pause_events: u32,
    pub power_pauses: u32,
    pub pitch_variance: f64,
    pub volume_stability: f64,
    pub flags: Vec<FlagEvent>,
    pub word_count: u32,
    pub filler_count: u32,
}

impl ExtractedFeatures {
    /// The all-zero feature set returned for zero-duration input.
    pub fn empty() -> Self {
        Self {
            duration_sec: 0.0,
            wpm: 0.0,
            filler_per_min: 0.0,
            pause_events: 0,
            power_pauses: 0,
            pitch_variance: 0.0,
            volume_stability: 0.0,
            flags: Vec::new(),
            word_count: 0,
            filler_count: 0,
        }
    }
}
