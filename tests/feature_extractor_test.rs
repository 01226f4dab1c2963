use std::sync::Arc;

use rostra::application::ports::{AcousticAnalysisError, AcousticAnalyzer, AcousticProfile};
use rostra::application::services::FeatureExtractor;
use rostra::domain::{FlagReason, TranscriptResult, TranscriptWord};

fn word(text: &str, start: f64, end: f64) -> TranscriptWord {
    TranscriptWord {
        word: text.to_string(),
        start,
        end,
        confidence: 1.0,
    }
}

fn transcript(words: Vec<TranscriptWord>) -> TranscriptResult {
    let duration = words.last().map(|w| w.end).unwrap_or(0.0);
    let text = words
        .iter()
        .map(|w| w.word.as_str())
        .collect::<Vec<_>>()
        .join(" ");
    TranscriptResult {
        text,
        words,
        language: "en".to_string(),
        duration,
    }
}

fn extractor() -> FeatureExtractor {
    FeatureExtractor::new(None)
}

#[test]
fn given_zero_duration_transcript_when_extracting_then_all_features_are_zero() {
    let empty = TranscriptResult {
        text: String::new(),
        words: vec![],
        language: "en".to_string(),
        duration: 0.0,
    };

    let features = extractor().extract(&empty, None);

    assert_eq!(features.duration_sec, 0.0);
    assert_eq!(features.wpm, 0.0);
    assert_eq!(features.filler_per_min, 0.0);
    assert_eq!(features.pause_events, 0);
    assert_eq!(features.power_pauses, 0);
    assert_eq!(features.pitch_variance, 0.0);
    assert_eq!(features.volume_stability, 0.0);
    assert!(features.flags.is_empty());
}

#[test]
fn given_steady_speech_when_extracting_then_wpm_reflects_word_rate() {
    // 30 words over 12 seconds -> 150 WPM.
    let words: Vec<TranscriptWord> = (0..30)
        .map(|i| word("go", i as f64 * 0.4, i as f64 * 0.4 + 0.4))
        .collect();

    let features = extractor().extract(&transcript(words), None);

    assert_eq!(features.word_count, 30);
    assert_eq!(features.wpm, 150.0);
}

#[test]
fn given_uneven_rate_when_extracting_then_wpm_is_rounded_to_one_decimal() {
    // 7 words over 18.7 seconds -> 22.459... -> 22.5.
    let mut words: Vec<TranscriptWord> =
        (0..6).map(|i| word("go", i as f64 * 0.3, i as f64 * 0.3 + 0.2)).collect();
    words.push(word("stop", 18.5, 18.7));

    let features = extractor().extract(&transcript(words), None);

    assert_eq!(features.wpm, 22.5);
}

#[test]
fn given_whitespace_words_when_extracting_then_they_do_not_count() {
    let words = vec![word("hello", 0.0, 0.5), word("  ", 0.5, 0.6), word("there", 0.6, 1.0)];

    let features = extractor().extract(&transcript(words), None);

    assert_eq!(features.word_count, 2);
}

#[test]
fn given_fillers_with_punctuation_when_extracting_then_fillers_are_detected() {
    let words = vec![
        word("Um,", 0.0, 0.3),
        word("this", 0.4, 0.7),
        word("is,", 0.8, 1.0),
        word("like.", 1.1, 1.4),
        word("Actually!", 1.5, 2.0),
        word("fine", 2.1, 60.0),
    ];

    let features = extractor().extract(&transcript(words), None);

    assert_eq!(features.filler_count, 3);
    assert_eq!(features.filler_per_min, 3.0);
    let filler_flags: Vec<_> = features
        .flags
        .iter()
        .filter(|f| f.reason == FlagReason::Filler)
        .collect();
    assert_eq!(filler_flags.len(), 3);
    assert_eq!(filler_flags[0].t_start, 0.0);
    assert_eq!(filler_flags[0].t_end, 0.3);
}

#[test]
fn given_multi_word_filler_phrase_when_extracting_then_it_is_not_detected() {
    // "you know" is in the vocabulary but the scan is single-token only.
    let words = vec![
        word("you", 0.0, 0.3),
        word("know", 0.4, 0.7),
        word("it", 0.8, 1.0),
        word("works", 1.1, 30.0),
    ];

    let features = extractor().extract(&transcript(words), None);

    assert_eq!(features.filler_count, 0);
}

#[test]
fn given_gap_of_exactly_half_second_when_extracting_then_pause_counted_without_flag() {
    let words = vec![word("a", 0.0, 1.0), word("b", 1.5, 10.0)];

    let features = extractor().extract(&transcript(words), None);

    assert_eq!(features.pause_events, 1);
    assert_eq!(features.power_pauses, 0);
    assert!(features.flags.is_empty());
}

#[test]
fn given_gap_below_half_second_when_extracting_then_nothing_is_counted() {
    let words = vec![word("a", 0.0, 1.0), word("b", 1.49, 10.0)];

    let features = extractor().extract(&transcript(words), None);

    assert_eq!(features.pause_events, 0);
    assert_eq!(features.power_pauses, 0);
    assert!(features.flags.is_empty());
}

#[test]
fn given_gap_of_exactly_one_second_when_extracting_then_power_pause_flagged() {
    let words = vec![word("a", 0.0, 1.0), word("b", 2.0, 10.0)];

    let features = extractor().extract(&transcript(words), None);

    assert_eq!(features.pause_events, 0);
    assert_eq!(features.power_pauses, 1);
    assert_eq!(features.flags.len(), 1);
    assert_eq!(features.flags[0].reason, FlagReason::PowerPause);
    assert_eq!(features.flags[0].t_start, 1.0);
    assert_eq!(features.flags[0].t_end, 2.0);
}

#[test]
fn given_gap_of_exactly_three_seconds_when_extracting_then_still_a_power_pause() {
    // The power-pause band is inclusive at its upper bound; only gaps
    // strictly above 3s classify as long pauses.
    let words = vec![word("a", 0.0, 1.0), word("b", 4.0, 10.0)];

    let features = extractor().extract(&transcript(words), None);

    assert_eq!(features.power_pauses, 1);
    assert_eq!(features.pause_events, 0);
    assert_eq!(features.flags[0].reason, FlagReason::PowerPause);
}

#[test]
fn given_gap_above_three_seconds_when_extracting_then_long_pause_flagged() {
    let words = vec![word("a", 0.0, 1.0), word("b", 4.01, 10.0)];

    let features = extractor().extract(&transcript(words), None);

    assert_eq!(features.pause_events, 1);
    assert_eq!(features.power_pauses, 0);
    assert_eq!(features.flags.len(), 1);
    assert_eq!(features.flags[0].reason, FlagReason::LongPause);
}

#[test]
fn given_single_word_when_extracting_then_no_pauses_detected() {
    let words = vec![word("monologue", 0.0, 5.0)];

    let features = extractor().extract(&transcript(words), None);

    assert_eq!(features.pause_events, 0);
    assert_eq!(features.power_pauses, 0);
}

#[test]
fn given_fillers_and_pauses_when_extracting_then_filler_flags_come_first() {
    // The pause happens before the filler in time, but flags keep append
    // order: fillers first, then pauses.
    let words = vec![
        word("start", 0.0, 1.0),
        word("middle", 3.0, 4.0),
        word("um", 4.2, 4.5),
        word("end", 4.6, 30.0),
    ];

    let features = extractor().extract(&transcript(words), None);

    assert_eq!(features.flags.len(), 2);
    assert_eq!(features.flags[0].reason, FlagReason::Filler);
    assert_eq!(features.flags[1].reason, FlagReason::PowerPause);
}

struct FailingAnalyzer;

impl AcousticAnalyzer for FailingAnalyzer {
    fn analyze(&self, _audio: &[u8]) -> Result<AcousticProfile, AcousticAnalysisError> {
        Err(AcousticAnalysisError::DecodingFailed(
            "unreadable".to_string(),
        ))
    }
}

struct FixedAnalyzer;

impl AcousticAnalyzer for FixedAnalyzer {
    fn analyze(&self, _audio: &[u8]) -> Result<AcousticProfile, AcousticAnalysisError> {
        Ok(AcousticProfile {
            pitch_variance: 42.04,
            volume_stability: 0.2534,
        })
    }
}

#[test]
fn given_failing_acoustic_analysis_when_extracting_then_defaults_to_zero() {
    let words = vec![word("hello", 0.0, 0.5), word("world", 0.6, 60.0)];
    let extractor = FeatureExtractor::new(Some(Arc::new(FailingAnalyzer)));

    let features = extractor.extract(&transcript(words), Some(&[1, 2, 3]));

    assert_eq!(features.pitch_variance, 0.0);
    assert_eq!(features.volume_stability, 0.0);
    // The failure is swallowed; text features still extract.
    assert_eq!(features.word_count, 2);
}

#[test]
fn given_acoustic_profile_when_extracting_then_values_are_rounded_at_boundary() {
    let words = vec![word("hello", 0.0, 0.5), word("world", 0.6, 60.0)];
    let extractor = FeatureExtractor::new(Some(Arc::new(FixedAnalyzer)));

    let features = extractor.extract(&transcript(words), Some(&[1, 2, 3]));

    assert_eq!(features.pitch_variance, 42.0);
    assert_eq!(features.volume_stability, 0.253);
}

#[test]
fn given_no_audio_when_extracting_then_acoustic_features_default_to_zero() {
    let words = vec![word("hello", 0.0, 0.5), word("world", 0.6, 60.0)];
    let extractor = FeatureExtractor::new(Some(Arc::new(FixedAnalyzer)));

    let features = extractor.extract(&transcript(words), None);

    assert_eq!(features.pitch_variance, 0.0);
    assert_eq!(features.volume_stability, 0.0);
}
