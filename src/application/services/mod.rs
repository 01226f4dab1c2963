mod analysis_worker;
mod coaching_service;
mod feature_extractor;
mod scoring_engine;

pub use analysis_worker::{AnalysisWorker, PipelineError, WorkerError};
pub use coaching_service::{CoachingError, CoachingService};
pub use feature_extractor::{FeatureExtractor, FILLER_VOCABULARY, SINGLE_WORD_FILLERS};
pub use scoring_engine::{ScoringConfig, ScoringEngine};
