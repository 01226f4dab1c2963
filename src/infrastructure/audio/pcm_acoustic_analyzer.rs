use crate::application::ports::{AcousticAnalysisError, AcousticAnalyzer, AcousticProfile};

use super::audio_decoder::decode_for_analysis;

/// Frame length for pitch and loudness analysis, in samples.
const FRAME_LEN: usize = 2048;
const HOP_LEN: usize = 512;

/// Voiced pitch search range, in Hz (roughly C2..C7).
const PITCH_MIN_HZ: f64 = 65.0;
const PITCH_MAX_HZ: f64 = 2093.0;

/// A frame counts as voiced when its normalized autocorrelation peak
/// clears this threshold.
const VOICING_THRESHOLD: f64 = 0.5;
/// Frames quieter than this RMS are skipped for pitch tracking.
const SILENCE_RMS: f64 = 0.01;

/// Pitch/loudness analysis over decoded PCM.
///
/// Pitch variance is the population standard deviation (Hz) of per-frame
/// pitch estimates on voiced frames; volume stability is the coefficient of
/// variation of frame RMS, clamped to [0, 1].
pub struct PcmAcousticAnalyzer;

impl AcousticAnalyzer for PcmAcousticAnalyzer {
    fn analyze(&self, audio: &[u8]) -> Result<AcousticProfile, AcousticAnalysisError> {
        let decoded = decode_for_analysis(audio)?;
        let samples = &decoded.samples;
        let sample_rate = decoded.sample_rate as f64;

        if samples.len() < FRAME_LEN {
            return Err(AcousticAnalysisError::AnalysisFailed(
                "audio shorter than one analysis frame".to_string(),
            ));
        }

        let mut pitch_track: Vec<f64> = Vec::new();
        let mut rms_track: Vec<f64> = Vec::new();

        let mut start = 0;
        while start + FRAME_LEN <= samples.len() {
            let frame = &samples[start..start + FRAME_LEN];
            let rms = frame_rms(frame);
            rms_track.push(rms);

            if rms >= SILENCE_RMS {
                if let Some(f0) = estimate_pitch(frame, sample_rate) {
                    pitch_track.push(f0);
                }
            }

            start += HOP_LEN;
        }

        let pitch_variance = std_dev(&pitch_track);
        let volume_stability = coefficient_of_variation(&rms_track).clamp(0.0, 1.0);

        Ok(AcousticProfile {
            pitch_variance,
            volume_stability,
        })
    }
}

fn frame_rms(frame: &[f32]) -> f64 {
    let energy: f64 = frame.iter().map(|&s| (s as f64) * (s as f64)).sum();
    (energy / frame.len() as f64).sqrt()
}

/// Autocorrelation pitch estimate for one frame, `None` when unvoiced.
fn estimate_pitch(frame: &[f32], sample_rate: f64) -> Option<f64> {
    let min_lag = (sample_rate / PITCH_MAX_HZ).floor() as usize;
    let max_lag = (sample_rate / PITCH_MIN_HZ).ceil() as usize;
    if max_lag >= frame.len() || min_lag < 1 {
        return None;
    }

    let energy: f64 = frame.iter().map(|&s| (s as f64) * (s as f64)).sum();
    if energy <= f64::EPSILON {
        return None;
    }

    let mut best_lag = 0;
    let mut best_corr = 0.0;
    for lag in min_lag..=max_lag {
        let mut corr = 0.0;
        for i in 0..frame.len() - lag {
            corr += frame[i] as f64 * frame[i + lag] as f64;
        }
        let normalized = corr / energy;
        if normalized > best_corr {
            best_corr = normalized;
            best_lag = lag;
        }
    }

    if best_corr >= VOICING_THRESHOLD && best_lag > 0 {
        Some(sample_rate / best_lag as f64)
    } else {
        None
    }
}

/// Population standard deviation; 0.0 for an empty track.
fn std_dev(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    let mean = values.iter().sum::<f64>() / values.len() as f64;
    let variance = values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / values.len() as f64;
    variance.sqrt()
}

/// std / mean; 0.0 when the signal carries no energy.
fn coefficient_of_variation(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    let mean = values.iter().sum::<f64>() / values.len() as f64;
    if mean <= 0.0 {
        return 0.0;
    }
    std_dev(values) / mean
}
