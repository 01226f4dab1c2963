use std::io::Cursor;

use symphonia::core::audio::SampleBuffer;
use symphonia::core::codecs::{Decoder, DecoderOptions};
use symphonia::core::formats::{FormatOptions, FormatReader};
use symphonia::core::io::MediaSourceStream;
use symphonia::core::meta::MetadataOptions;
use symphonia::core::probe::Hint;

use crate::application::ports::AcousticAnalysisError;

/// Analysis sample rate for pitch/loudness extraction.
pub const ANALYSIS_SAMPLE_RATE: u32 = 22_050;

/// Mono PCM at [`ANALYSIS_SAMPLE_RATE`].
pub struct DecodedAudio {
    pub samples: Vec<f32>,
    pub sample_rate: u32,
}

impl DecodedAudio {
    pub fn duration_secs(&self) -> f32 {
        self.samples.len() as f32 / self.sample_rate as f32
    }
}

/// Decodes compressed audio bytes (wav/mp3/m4a) to mono PCM at the analysis
/// sample rate.
pub fn decode_for_analysis(data: &[u8]) -> Result<DecodedAudio, AcousticAnalysisError> {
    let cursor = Cursor::new(data.to_vec());
    let mss = MediaSourceStream::new(Box::new(cursor), Default::default());

    let probed = symphonia::default::get_probe()
        .format(
            &Hint::new(),
            mss,
            &FormatOptions::default(),
            &MetadataOptions::default(),
        )
        .map_err(|e| AcousticAnalysisError::DecodingFailed(format!("probe: {}", e)))?;

    let mut reader = probed.format;

    let track = reader.default_track().ok_or_else(|| {
        AcousticAnalysisError::DecodingFailed("no audio track found".to_string())
    })?;
    let track_id = track.id;
    let codec_params = track.codec_params.clone();
    let source_rate = codec_params
        .sample_rate
        .ok_or_else(|| AcousticAnalysisError::DecodingFailed("unknown sample rate".to_string()))?;
    let channels = codec_params.channels.map(|c| c.count()).unwrap_or(1);

    let decoder = symphonia::default::get_codecs()
        .make(&codec_params, &DecoderOptions::default())
        .map_err(|e| AcousticAnalysisError::DecodingFailed(format!("codec: {}", e)))?;

    let mono = decode_mono(reader.as_mut(), decoder, track_id, channels)?;
    if mono.is_empty() {
        return Err(AcousticAnalysisError::DecodingFailed(
            "no audio samples decoded".to_string(),
        ));
    }

    let samples = if source_rate == ANALYSIS_SAMPLE_RATE {
        mono
    } else {
        resample(&mono, source_rate, ANALYSIS_SAMPLE_RATE)?
    };

    let decoded = DecodedAudio {
        samples,
        sample_rate: ANALYSIS_SAMPLE_RATE,
    };
    tracing::debug!(
        samples = decoded.samples.len(),
        duration_secs = decoded.duration_secs(),
        source_rate,
        "Audio decoded for acoustic analysis"
    );
    Ok(decoded)
}

/// Runs the packet loop, downmixing interleaved frames to mono.
fn decode_mono(
    reader: &mut dyn FormatReader,
    mut decoder: Box<dyn Decoder>,
    track_id: u32,
    channels: usize,
) -> Result<Vec<f32>, AcousticAnalysisError> {
    let mut mono: Vec<f32> = Vec::new();

    loop {
        let packet = match reader.next_packet() {
            Ok(p) => p,
            Err(symphonia::core::errors::Error::IoError(ref e))
                if e.kind() == std::io::ErrorKind::UnexpectedEof =>
            {
                break;
            }
            Err(e) => {
                return Err(AcousticAnalysisError::DecodingFailed(format!(
                    "packet: {}",
                    e
                )));
            }
        };

        if packet.track_id() != track_id {
            continue;
        }

        let decoded = match decoder.decode(&packet) {
            Ok(d) => d,
            Err(symphonia::core::errors::Error::DecodeError(e)) => {
                tracing::warn!(error = %e, "Skipping corrupt audio frame");
                continue;
            }
            Err(e) => {
                return Err(AcousticAnalysisError::DecodingFailed(format!(
                    "decode: {}",
                    e
                )));
            }
        };

        let spec = *decoded.spec();
        let num_frames = decoded.frames();
        if num_frames == 0 {
            continue;
        }

        let mut sample_buf = SampleBuffer::<f32>::new(num_frames as u64, spec);
        sample_buf.copy_interleaved_ref(decoded);
        let samples = sample_buf.samples();

        if channels > 1 {
            for frame in samples.chunks(channels) {
                mono.push(frame.iter().sum::<f32>() / channels as f32);
            }
        } else {
            mono.extend_from_slice(samples);
        }
    }

    Ok(mono)
}

fn resample(
    samples: &[f32],
    from_rate: u32,
    to_rate: u32,
) -> Result<Vec<f32>, AcousticAnalysisError> {
    use rubato::{
        Resampler, SincFixedIn, SincInterpolationParameters, SincInterpolationType, WindowFunction,
    };

    let params = SincInterpolationParameters {
        sinc_len: 256,
        f_cutoff: 0.95,
        interpolation: SincInterpolationType::Linear,
        oversampling_factor: 256,
        window: WindowFunction::BlackmanHarris2,
    };

    let ratio = to_rate as f64 / from_rate as f64;
    let chunk_size = 1024;

    let mut resampler = SincFixedIn::<f32>::new(ratio, 2.0, params, chunk_size, 1)
        .map_err(|e| AcousticAnalysisError::DecodingFailed(format!("resampler init: {}", e)))?;

    let mut output = Vec::with_capacity((samples.len() as f64 * ratio) as usize + chunk_size);

    for chunk in samples.chunks(chunk_size) {
        let input = if chunk.len() < chunk_size {
            let mut padded = chunk.to_vec();
            padded.resize(chunk_size, 0.0);
            padded
        } else {
            chunk.to_vec()
        };

        let result = resampler
            .process(&[input], None)
            .map_err(|e| AcousticAnalysisError::DecodingFailed(format!("resample: {}", e)))?;

        if let Some(channel) = result.first() {
            output.extend_from_slice(channel);
        }
    }

    // Trim to the expected length; the last padded chunk overshoots.
    let expected_len = (samples.len() as f64 * ratio) as usize;
    output.truncate(expected_len);

    Ok(output)
}
