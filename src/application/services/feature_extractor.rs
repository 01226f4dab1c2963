use std::sync::Arc;

use crate::application::ports::AcousticAnalyzer;
use crate::domain::{ExtractedFeatures, FlagEvent, FlagReason, TranscriptResult, TranscriptWord};

/// Full filler vocabulary. The multi-word entries ("you know", "i mean",
/// "sort of", "kind of") are part of the documented vocabulary but are never
/// matched by the single-token scan below; detection is single-token only.
pub const FILLER_VOCABULARY: &[&str] = &[
    "um", "uh", "uhh", "umm", "er", "ah", "ahh", "like", "you know", "basically", "actually",
    "literally", "so", "well", "right", "okay", "i mean", "sort of", "kind of",
];

/// Single-token fillers actually detected.
pub const SINGLE_WORD_FILLERS: &[&str] = &[
    "um", "uh", "uhh", "umm", "er", "ah", "ahh", "like", "basically", "actually", "literally",
];

const LONG_PAUSE_SEC: f64 = 3.0;
const POWER_PAUSE_MIN_SEC: f64 = 1.0;
const PAUSE_MIN_SEC: f64 = 0.5;

/// Derives quantitative speech metrics and timestamped flags from a
/// transcript and, optionally, the raw audio it came from.
pub struct FeatureExtractor {
    acoustics: Option<Arc<dyn AcousticAnalyzer>>,
}

impl FeatureExtractor {
    pub fn new(acoustics: Option<Arc<dyn AcousticAnalyzer>>) -> Self {
        Self { acoustics }
    }

    pub fn extract(
        &self,
        transcript: &TranscriptResult,
        audio: Option<&[u8]>,
    ) -> ExtractedFeatures {
        let duration = transcript.duration;
        if duration <= 0.0 {
            return ExtractedFeatures::empty();
        }

        let words = &transcript.words;
        let word_count = words.iter().filter(|w| !w.word.trim().is_empty()).count() as u32;
        let wpm = (word_count as f64 / duration) * 60.0;

        let (filler_count, filler_flags) = detect_fillers(words);
        let filler_per_min = (filler_count as f64 / duration) * 60.0;

        let (pause_events, power_pauses, pause_flags) = detect_pauses(words);

        let (pitch_variance, volume_stability) = match audio {
            Some(bytes) => self.acoustic_features(bytes),
            None => (0.0, 0.0),
        };

        let mut flags = filler_flags;
        flags.extend(pause_flags);

        ExtractedFeatures {
            duration_sec: duration,
            wpm: round1(wpm),
            filler_per_min: round1(filler_per_min),
            pause_events,
            power_pauses,
            pitch_variance: round1(pitch_variance),
            volume_stability: round3(volume_stability),
            flags,
            word_count,
            filler_count,
        }
    }

    /// Acoustic analysis must never fail the job: any error is logged and
    /// both metrics fall back to 0.0.
    fn acoustic_features(&self, audio: &[u8]) -> (f64, f64) {
        let Some(analyzer) = &self.acoustics else {
            return (0.0, 0.0);
        };
        match analyzer.analyze(audio) {
            Ok(profile) => (profile.pitch_variance, profile.volume_stability),
            Err(e) => {
                tracing::warn!(error = %e, "Acoustic feature extraction failed");
                (0.0, 0.0)
            }
        }
    }
}

fn detect_fillers(words: &[TranscriptWord]) -> (u32, Vec<FlagEvent>) {
    let mut count = 0;
    let mut flags = Vec::new();

    for word in words {
        let lowered = word.word.to_lowercase();
        let cleaned = lowered
            .trim()
            .trim_matches(|c| matches!(c, '.' | ',' | '!' | '?'));
        if SINGLE_WORD_FILLERS.contains(&cleaned) {
            count += 1;
            flags.push(FlagEvent {
                t_start: word.start,
                t_end: word.end,
                reason: FlagReason::Filler,
            });
        }
    }

    (count, flags)
}

/// Classifies the gap before each word:
/// > 3.0s counts as a pause event and flags a long pause; 1.0-3.0s counts as
/// a power pause and flags it; 0.5-1.0s counts as a pause event with no
/// flag; anything shorter is ignored.
fn detect_pauses(words: &[TranscriptWord]) -> (u32, u32, Vec<FlagEvent>) {
    if words.len() < 2 {
        return (0, 0, Vec::new());
    }

    let mut pause_events = 0;
    let mut power_pauses = 0;
    let mut flags = Vec::new();

    for pair in words.windows(2) {
        let gap = pair[1].start - pair[0].end;

        if gap > LONG_PAUSE_SEC {
            pause_events += 1;
            flags.push(FlagEvent {
                t_start: pair[0].end,
                t_end: pair[1].start,
                reason: FlagReason::LongPause,
            });
        } else if gap >= POWER_PAUSE_MIN_SEC {
            power_pauses += 1;
            flags.push(FlagEvent {
                t_start: pair[0].end,
                t_end: pair[1].start,
                reason: FlagReason::PowerPause,
            });
        } else if gap >= PAUSE_MIN_SEC {
            pause_events += 1;
        }
    }

    (pause_events, power_pauses, flags)
}

fn round1(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

fn round3(value: f64) -> f64 {
    (value * 1000.0).round() / 1000.0
}
