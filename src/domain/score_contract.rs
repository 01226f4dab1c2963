use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Primary area for improvement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FocusMetric {
    Pace,
    Fluency,
    Clarity,
    VocalVariety,
    Structure,
    Confidence,
}

impl FocusMetric {
    pub fn as_str(&self) -> &'static str {
        match self {
            FocusMetric::Pace => "pace",
            FocusMetric::Fluency => "fluency",
            FocusMetric::Clarity => "clarity",
            FocusMetric::VocalVariety => "vocal_variety",
            FocusMetric::Structure => "structure",
            FocusMetric::Confidence => "confidence",
        }
    }
}

impl std::fmt::Display for FocusMetric {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Type of flagged event in the recording.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FlagReason {
    Filler,
    LongPause,
    Rush,
    Mumble,
    PowerPause,
}

impl FlagReason {
    pub fn as_str(&self) -> &'static str {
        match self {
            FlagReason::Filler => "filler",
            FlagReason::LongPause => "long_pause",
            FlagReason::Rush => "rush",
            FlagReason::Mumble => "mumble",
            FlagReason::PowerPause => "power_pause",
        }
    }
}

/// Raw extracted metrics from audio analysis.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Metrics {
    /// Words per minute (speaking rate).
    pub wpm: f64,
    /// Filler words per minute.
    pub filler_per_min: f64,
    /// Total count of pauses > 0.5s.
    pub pause_events: u32,
    /// Count of intentional pauses (1-3s) for emphasis.
    pub power_pauses: u32,
    /// Standard deviation of pitch in Hz.
    pub pitch_variance: f64,
    /// Coefficient of variation for volume (0 = stable, 1 = erratic).
    pub volume_stability: f64,
}

/// Computed scores (0-100) derived from metrics.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Scores {
    pub pace: i32,
    pub fluency: i32,
    pub clarity: i32,
    pub vocal_variety: i32,
    pub overall: i32,
}

/// Timestamped event of note (filler, long pause, etc.).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Flag {
    pub t_start: f64,
    pub t_end: f64,
    pub reason: FlagReason,
}

/// Canonical schema for session analysis results.
///
/// This is the one authoritative shape all producers and consumers must match
/// exactly; extra fields are rejected on both ends.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ScoreContract {
    pub session_id: Uuid,
    pub duration_sec: f64,
    pub metrics: Metrics,
    pub scores: Scores,
    pub focus_metric: FocusMetric,
    pub flags: Vec<Flag>,
}
