use crate::domain::{
    ExtractedFeatures, Flag, FocusMetric, Metrics, ScoreContract, Scores, SessionId,
};

/// Thresholds and weights for score calculation.
#[derive(Debug, Clone)]
pub struct ScoringConfig {
    /// Optimal speaking rate in WPM.
    pub pace_optimal: f64,
    /// Acceptable deviation from optimal, +/- WPM.
    pub pace_range: f64,

    /// Fluency breakpoints, in fillers per minute.
    pub fluency_excellent: f64,
    pub fluency_good: f64,
    pub fluency_acceptable: f64,

    /// Pitch variance (Hz) considered good vocal variety.
    pub pitch_variance_good: f64,
    /// Volume coefficient of variation considered stable.
    pub volume_stability_good: f64,

    pub weight_pace: f64,
    pub weight_fluency: f64,
    pub weight_clarity: f64,
    pub weight_vocal_variety: f64,
    /// Confidence is derived as the mean of the other four scores.
    pub weight_confidence: f64,
}

impl Default for ScoringConfig {
    fn default() -> Self {
        Self {
            pace_optimal: 150.0,
            pace_range: 30.0,
            fluency_excellent: 1.0,
            fluency_good: 3.0,
            fluency_acceptable: 6.0,
            pitch_variance_good: 40.0,
            volume_stability_good: 0.3,
            weight_pace: 0.20,
            weight_fluency: 0.25,
            weight_clarity: 0.20,
            weight_vocal_variety: 0.20,
            weight_confidence: 0.15,
        }
    }
}

/// Rule-based scoring engine.
///
/// A pure function of its inputs: explicit thresholds, no ML, no hidden
/// state beyond the injected configuration.
pub struct ScoringEngine {
    config: ScoringConfig,
}

impl ScoringEngine {
    pub fn new(config: ScoringConfig) -> Self {
        Self { config }
    }

    pub fn score(&self, session_id: SessionId, features: &ExtractedFeatures) -> ScoreContract {
        let pace = self.score_pace(features.wpm);
        let fluency = self.score_fluency(features.filler_per_min);
        let clarity = self.score_clarity(
            features.pause_events,
            features.power_pauses,
            features.duration_sec,
        );
        let vocal_variety =
            self.score_vocal_variety(features.pitch_variance, features.volume_stability);

        let overall = self.score_overall(pace, fluency, clarity, vocal_variety);
        let focus_metric = determine_focus(pace, fluency, clarity, vocal_variety);

        let flags = features
            .flags
            .iter()
            .map(|f| Flag {
                t_start: f.t_start,
                t_end: f.t_end,
                reason: f.reason,
            })
            .collect();

        ScoreContract {
            session_id: session_id.as_uuid(),
            duration_sec: features.duration_sec.max(0.0),
            metrics: Metrics {
                wpm: features.wpm.max(0.0),
                filler_per_min: features.filler_per_min.max(0.0),
                pause_events: features.pause_events,
                power_pauses: features.power_pauses,
                pitch_variance: features.pitch_variance.max(0.0),
                volume_stability: features.volume_stability.clamp(0.0, 1.0),
            },
            scores: Scores {
                pace,
                fluency,
                clarity,
                vocal_variety,
                overall,
            },
            focus_metric,
            flags,
        }
    }

    /// Piecewise bands around the optimal rate, anchored at 100/85/65/40
    /// with the outermost band floored at 20.
    fn score_pace(&self, wpm: f64) -> i32 {
        if wpm == 0.0 {
            return 0;
        }

        let half = self.config.pace_range / 2.0;
        let distance = (wpm - self.config.pace_optimal).abs();

        let score = if distance <= half {
            100 - ((distance / half) * 10.0) as i32
        } else if distance <= self.config.pace_range {
            85 - (((distance - half) / half) * 20.0) as i32
        } else if distance <= self.config.pace_range * 1.5 {
            65 - (((distance - self.config.pace_range) / half) * 25.0) as i32
        } else {
            let excess = distance - self.config.pace_range * 1.5;
            (40 - (excess / 5.0) as i32).max(20)
        };

        score.clamp(0, 100)
    }

    fn score_fluency(&self, filler_per_min: f64) -> i32 {
        let score = if filler_per_min <= self.config.fluency_excellent {
            100 - (filler_per_min * 10.0) as i32
        } else if filler_per_min <= self.config.fluency_good {
            90 - ((filler_per_min - self.config.fluency_excellent) * 10.0) as i32
        } else if filler_per_min <= self.config.fluency_acceptable {
            70 - ((filler_per_min - self.config.fluency_good) * 7.0) as i32
        } else {
            let excess = filler_per_min - self.config.fluency_acceptable;
            (50 - (excess * 5.0) as i32).max(20)
        };

        score.clamp(0, 100)
    }

    /// Pause-pattern score: long pauses are penalized, a moderate rate of
    /// power pauses earns a small bonus.
    fn score_clarity(&self, pause_events: u32, power_pauses: u32, duration_sec: f64) -> i32 {
        if duration_sec <= 0.0 {
            return 50;
        }

        let minutes = duration_sec / 60.0;
        let mut score = 100;

        let pause_per_min = pause_events as f64 / minutes;
        if pause_per_min > 2.0 {
            score -= ((pause_per_min - 2.0) * 10.0) as i32;
        }

        let power_per_min = power_pauses as f64 / minutes;
        if (1.0..=3.0).contains(&power_per_min) {
            score += 5;
        } else if power_per_min > 4.0 {
            score -= ((power_per_min - 4.0) * 3.0) as i32;
        }

        score.clamp(20, 100)
    }

    fn score_vocal_variety(&self, pitch_variance: f64, volume_stability: f64) -> i32 {
        let mut score = 50;

        if pitch_variance >= self.config.pitch_variance_good {
            score += 40 + (((pitch_variance - self.config.pitch_variance_good) / 5.0) as i32).min(10);
        } else if pitch_variance >= 20.0 {
            score += ((pitch_variance / 40.0) * 40.0) as i32;
        } else {
            score += ((pitch_variance / 20.0) * 20.0) as i32;
        }

        if volume_stability <= self.config.volume_stability_good {
            score += 5;
        } else if volume_stability > 0.5 {
            score -= ((volume_stability - 0.5) * 20.0) as i32;
        }

        score.clamp(20, 100)
    }

    fn score_overall(&self, pace: i32, fluency: i32, clarity: i32, vocal_variety: i32) -> i32 {
        let cfg = &self.config;
        let confidence = (pace + fluency + clarity + vocal_variety) as f64 / 4.0;
        let overall = pace as f64 * cfg.weight_pace
            + fluency as f64 * cfg.weight_fluency
            + clarity as f64 * cfg.weight_clarity
            + vocal_variety as f64 * cfg.weight_vocal_variety
            + confidence * cfg.weight_confidence;

        (overall as i32).clamp(0, 100)
    }
}

/// The metric with the lowest score; ties go to the earliest in the fixed
/// pace -> fluency -> clarity -> vocal_variety evaluation order.
fn determine_focus(pace: i32, fluency: i32, clarity: i32, vocal_variety: i32) -> FocusMetric {
    let ordered = [
        (FocusMetric::Pace, pace),
        (FocusMetric::Fluency, fluency),
        (FocusMetric::Clarity, clarity),
        (FocusMetric::VocalVariety, vocal_variety),
    ];

    let mut focus = ordered[0];
    for candidate in &ordered[1..] {
        if candidate.1 < focus.1 {
            focus = *candidate;
        }
    }
    focus.0
}
