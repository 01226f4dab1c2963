use rostra::application::services::{ScoringConfig, ScoringEngine};
use rostra::domain::{ExtractedFeatures, FlagEvent, FlagReason, FocusMetric, SessionId};

fn engine() -> ScoringEngine {
    ScoringEngine::new(ScoringConfig::default())
}

struct FeatureOverrides {
    duration_sec: f64,
    wpm: f64,
    filler_per_min: f64,
    pause_events: u32,
    power_pauses: u32,
    pitch_variance: f64,
    volume_stability: f64,
}

impl Default for FeatureOverrides {
    fn default() -> Self {
        Self {
            duration_sec: 180.0,
            wpm: 150.0,
            filler_per_min: 2.0,
            pause_events: 5,
            power_pauses: 2,
            pitch_variance: 40.0,
            volume_stability: 0.25,
        }
    }
}

fn features(overrides: FeatureOverrides) -> ExtractedFeatures {
    ExtractedFeatures {
        duration_sec: overrides.duration_sec,
        wpm: overrides.wpm,
        filler_per_min: overrides.filler_per_min,
        pause_events: overrides.pause_events,
        power_pauses: overrides.power_pauses,
        pitch_variance: overrides.pitch_variance,
        volume_stability: overrides.volume_stability,
        flags: Vec::new(),
        word_count: 0,
        filler_count: 0,
    }
}

fn score_with_wpm(wpm: f64) -> i32 {
    let contract = engine().score(
        SessionId::new(),
        &features(FeatureOverrides {
            wpm,
            ..Default::default()
        }),
    );
    contract.scores.pace
}

fn score_with_fillers(filler_per_min: f64) -> i32 {
    let contract = engine().score(
        SessionId::new(),
        &features(FeatureOverrides {
            filler_per_min,
            ..Default::default()
        }),
    );
    contract.scores.fluency
}

#[test]
fn given_optimal_pace_when_scoring_then_pace_is_maximal() {
    assert_eq!(score_with_wpm(150.0), 100);
    assert!(score_with_wpm(150.0) >= 95);
}

#[test]
fn given_acceptable_fast_pace_when_scoring_then_pace_stays_high() {
    let pace = score_with_wpm(170.0);
    assert!((75..=95).contains(&pace), "pace was {}", pace);
}

#[test]
fn given_acceptable_slow_pace_when_scoring_then_pace_stays_high() {
    let pace = score_with_wpm(130.0);
    assert!((75..=95).contains(&pace), "pace was {}", pace);
}

#[test]
fn given_rushing_delivery_when_scoring_then_pace_drops() {
    assert!(score_with_wpm(210.0) < 70);
}

#[test]
fn given_crawling_delivery_when_scoring_then_pace_drops() {
    assert!(score_with_wpm(100.0) < 70);
}

#[test]
fn given_silence_when_scoring_then_pace_is_zero() {
    assert_eq!(score_with_wpm(0.0), 0);
}

#[test]
fn given_growing_distance_from_optimal_when_scoring_then_pace_strictly_decreases() {
    let scores: Vec<i32> = [165.0, 180.0, 195.0, 210.0, 260.0]
        .iter()
        .map(|&wpm| score_with_wpm(wpm))
        .collect();
    for pair in scores.windows(2) {
        assert!(pair[0] > pair[1], "expected {} > {}", pair[0], pair[1]);
    }
}

#[test]
fn given_rare_fillers_when_scoring_then_fluency_is_excellent() {
    assert_eq!(score_with_fillers(0.5), 95);
}

#[test]
fn given_some_fillers_when_scoring_then_fluency_is_good() {
    let fluency = score_with_fillers(2.0);
    assert!((70..=90).contains(&fluency), "fluency was {}", fluency);
}

#[test]
fn given_frequent_fillers_when_scoring_then_fluency_is_mediocre() {
    let fluency = score_with_fillers(5.0);
    assert!((45..=70).contains(&fluency), "fluency was {}", fluency);
}

#[test]
fn given_constant_fillers_when_scoring_then_fluency_is_poor() {
    assert!(score_with_fillers(10.0) < 50);
}

#[test]
fn given_rising_filler_rate_when_scoring_then_fluency_strictly_decreases() {
    let scores: Vec<i32> = [0.0, 0.5, 2.0, 3.0, 5.0, 6.0, 8.0, 10.0]
        .iter()
        .map(|&f| score_with_fillers(f))
        .collect();
    for pair in scores.windows(2) {
        assert!(pair[0] > pair[1], "expected {} > {}", pair[0], pair[1]);
    }
}

#[test]
fn given_frequent_long_pauses_when_scoring_then_clarity_is_penalized() {
    let baseline = engine().score(
        SessionId::new(),
        &features(FeatureOverrides {
            pause_events: 2,
            power_pauses: 0,
            ..Default::default()
        }),
    );
    let pausey = engine().score(
        SessionId::new(),
        &features(FeatureOverrides {
            pause_events: 12,
            power_pauses: 0,
            ..Default::default()
        }),
    );
    assert_eq!(baseline.scores.clarity, 100);
    assert_eq!(pausey.scores.clarity, 80);
}

#[test]
fn given_moderate_power_pauses_when_scoring_then_clarity_gets_a_bonus() {
    // 6 power pauses over 3 minutes = 2/min, inside the bonus band, against
    // enough long pauses to leave headroom below 100.
    let contract = engine().score(
        SessionId::new(),
        &features(FeatureOverrides {
            pause_events: 12,
            power_pauses: 6,
            ..Default::default()
        }),
    );
    assert_eq!(contract.scores.clarity, 85);
}

#[test]
fn given_terrible_fluency_when_scoring_then_focus_is_fluency() {
    let contract = engine().score(
        SessionId::new(),
        &features(FeatureOverrides {
            filler_per_min: 12.0,
            pause_events: 2,
            power_pauses: 3,
            pitch_variance: 50.0,
            volume_stability: 0.2,
            ..Default::default()
        }),
    );
    assert_eq!(contract.focus_metric, FocusMetric::Fluency);
}

#[test]
fn given_rushed_delivery_when_scoring_then_focus_is_pace_and_pace_is_low() {
    let contract = engine().score(
        SessionId::new(),
        &features(FeatureOverrides {
            wpm: 220.0,
            filler_per_min: 0.5,
            pause_events: 2,
            power_pauses: 2,
            pitch_variance: 45.0,
            volume_stability: 0.2,
            ..Default::default()
        }),
    );
    assert_eq!(contract.focus_metric, FocusMetric::Pace);
    assert!(contract.scores.pace < 50);
}

#[test]
fn given_tied_minimum_scores_when_scoring_then_pace_wins_the_tie() {
    // wpm 245 and 10 fillers/min both score 30; the fixed evaluation order
    // pace -> fluency -> clarity -> vocal_variety makes pace the focus.
    let contract = engine().score(
        SessionId::new(),
        &features(FeatureOverrides {
            wpm: 245.0,
            filler_per_min: 10.0,
            pause_events: 2,
            power_pauses: 2,
            pitch_variance: 45.0,
            volume_stability: 0.2,
            ..Default::default()
        }),
    );
    assert_eq!(contract.scores.pace, 30);
    assert_eq!(contract.scores.fluency, 30);
    assert_eq!(contract.focus_metric, FocusMetric::Pace);
}

#[test]
fn given_focus_metric_when_scoring_then_it_is_the_argmin_of_the_four() {
    let contract = engine().score(
        SessionId::new(),
        &features(FeatureOverrides::default()),
    );
    let scores = &contract.scores;
    let min = scores
        .pace
        .min(scores.fluency)
        .min(scores.clarity)
        .min(scores.vocal_variety);
    let focus_score = match contract.focus_metric {
        FocusMetric::Pace => scores.pace,
        FocusMetric::Fluency => scores.fluency,
        FocusMetric::Clarity => scores.clarity,
        FocusMetric::VocalVariety => scores.vocal_variety,
        other => panic!("unexpected focus metric {:?}", other),
    };
    assert_eq!(focus_score, min);
}

#[test]
fn given_strong_session_when_scoring_then_overall_is_high() {
    let contract = engine().score(
        SessionId::new(),
        &features(FeatureOverrides {
            wpm: 150.0,
            filler_per_min: 0.5,
            pause_events: 2,
            power_pauses: 2,
            pitch_variance: 45.0,
            volume_stability: 0.2,
            ..Default::default()
        }),
    );

    assert_eq!(contract.scores.pace, 100);
    assert_eq!(contract.scores.fluency, 95);
    assert!(contract.scores.overall >= 80);
    // With clarity at 100 and vocal variety at 96, fluency is the argmin.
    assert_eq!(contract.focus_metric, FocusMetric::Fluency);
}

#[test]
fn given_good_inputs_when_scoring_then_overall_is_a_weighted_blend() {
    let contract = engine().score(
        SessionId::new(),
        &features(FeatureOverrides {
            pause_events: 3,
            ..Default::default()
        }),
    );

    // pace 100, fluency 80, clarity 100, vocal variety 95, confidence 93.75.
    assert_eq!(contract.scores.overall, 93);
    let max = contract
        .scores
        .pace
        .max(contract.scores.fluency)
        .max(contract.scores.clarity)
        .max(contract.scores.vocal_variety);
    assert!(contract.scores.overall <= max + 5);
}

#[test]
fn given_any_inputs_when_scoring_then_scores_stay_in_range() {
    for overrides in [
        FeatureOverrides::default(),
        FeatureOverrides {
            duration_sec: 3600.0,
            wpm: 300.0,
            filler_per_min: 50.0,
            pause_events: 100,
            power_pauses: 50,
            pitch_variance: 200.0,
            volume_stability: 0.9,
        },
        FeatureOverrides {
            duration_sec: 1.0,
            wpm: 1.0,
            filler_per_min: 0.0,
            pause_events: 0,
            power_pauses: 0,
            pitch_variance: 0.0,
            volume_stability: 0.0,
        },
    ] {
        let contract = engine().score(SessionId::new(), &features(overrides));
        for score in [
            contract.scores.pace,
            contract.scores.fluency,
            contract.scores.clarity,
            contract.scores.vocal_variety,
            contract.scores.overall,
        ] {
            assert!((0..=100).contains(&score), "score {} out of range", score);
        }
    }
}

#[test]
fn given_extreme_inputs_when_scoring_then_floors_hold() {
    let contract = engine().score(
        SessionId::new(),
        &features(FeatureOverrides {
            duration_sec: 3600.0,
            wpm: 300.0,
            filler_per_min: 50.0,
            pause_events: 100,
            power_pauses: 50,
            pitch_variance: 200.0,
            volume_stability: 0.9,
        }),
    );
    assert_eq!(contract.scores.pace, 20);
    assert_eq!(contract.scores.fluency, 20);
}

#[test]
fn given_zero_duration_features_when_scoring_then_contract_is_still_valid() {
    let contract = engine().score(SessionId::new(), &ExtractedFeatures::empty());

    assert_eq!(contract.duration_sec, 0.0);
    assert_eq!(contract.scores.pace, 0);
    assert_eq!(contract.scores.clarity, 50);
    assert!((0..=100).contains(&contract.scores.overall));
    // Pace is the zero floor, so it is the focus.
    assert_eq!(contract.focus_metric, FocusMetric::Pace);
}

#[test]
fn given_flag_events_when_scoring_then_flags_carry_into_the_contract() {
    let mut input = features(FeatureOverrides::default());
    input.flags = vec![
        FlagEvent {
            t_start: 1.0,
            t_end: 1.4,
            reason: FlagReason::Filler,
        },
        FlagEvent {
            t_start: 10.0,
            t_end: 14.0,
            reason: FlagReason::LongPause,
        },
    ];

    let id = SessionId::new();
    let contract = engine().score(id, &input);

    assert_eq!(contract.session_id, id.as_uuid());
    assert_eq!(contract.flags.len(), 2);
    assert_eq!(contract.flags[0].reason, FlagReason::Filler);
    assert_eq!(contract.flags[1].reason, FlagReason::LongPause);
}
