mod coaching_response;
mod drill;
mod features;
mod score_contract;
mod session;
mod session_id;
mod session_status;
mod storage_key;
mod transcript;

pub use coaching_response::{CoachingResponse, FocusArea, RecommendedDrill, Strength};
pub use drill::{
    Drill, DrillDifficulty, DrillLibrary, DrillLibraryError, DrillZone, MetricName,
    MetricThreshold, RecommendedWhen, ThresholdOperator,
};
pub use features::{ExtractedFeatures, FlagEvent};
pub use score_contract::{Flag, FlagReason, FocusMetric, Metrics, ScoreContract, Scores};
pub use session::Session;
pub use session_id::SessionId;
pub use session_status::SessionStatus;
pub use storage_key::StorageKey;
pub use transcript::{TranscriptResult, TranscriptWord};
