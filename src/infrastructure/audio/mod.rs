pub mod audio_decoder;
mod pcm_acoustic_analyzer;
mod whisper_api_engine;

pub use pcm_acoustic_analyzer::PcmAcousticAnalyzer;
pub use whisper_api_engine::WhisperApiEngine;
