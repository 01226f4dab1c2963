use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use super::FocusMetric;

/// Primary skill zone a drill targets. Mirrors [`FocusMetric`] on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DrillZone {
    Pace,
    Fluency,
    Clarity,
    VocalVariety,
    Structure,
    Confidence,
}

impl DrillZone {
    pub const ALL: [DrillZone; 6] = [
        DrillZone::Pace,
        DrillZone::Fluency,
        DrillZone::Clarity,
        DrillZone::VocalVariety,
        DrillZone::Structure,
        DrillZone::Confidence,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            DrillZone::Pace => "pace",
            DrillZone::Fluency => "fluency",
            DrillZone::Clarity => "clarity",
            DrillZone::VocalVariety => "vocal_variety",
            DrillZone::Structure => "structure",
            DrillZone::Confidence => "confidence",
        }
    }

    pub fn parse(s: &str) -> Option<DrillZone> {
        match s {
            "pace" => Some(DrillZone::Pace),
            "fluency" => Some(DrillZone::Fluency),
            "clarity" => Some(DrillZone::Clarity),
            "vocal_variety" => Some(DrillZone::VocalVariety),
            "structure" => Some(DrillZone::Structure),
            "confidence" => Some(DrillZone::Confidence),
            _ => None,
        }
    }

    pub fn for_focus_metric(metric: FocusMetric) -> DrillZone {
        match metric {
            FocusMetric::Pace => DrillZone::Pace,
            FocusMetric::Fluency => DrillZone::Fluency,
            FocusMetric::Clarity => DrillZone::Clarity,
            FocusMetric::VocalVariety => DrillZone::VocalVariety,
            FocusMetric::Structure => DrillZone::Structure,
            FocusMetric::Confidence => DrillZone::Confidence,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DrillDifficulty {
    Beginner,
    Intermediate,
    Advanced,
}

/// Metric names a drill may target.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MetricName {
    Wpm,
    FillerPerMin,
    PauseEvents,
    PowerPauses,
    PitchVariance,
    VolumeStability,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ThresholdOperator {
    Gt,
    Lt,
    Gte,
    Lte,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MetricThreshold {
    pub metric: MetricName,
    pub operator: ThresholdOperator,
    pub value: f64,
}

/// Conditions under which a drill should be suggested.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecommendedWhen {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub score_below: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metric_threshold: Option<MetricThreshold>,
}

/// A single practice drill. Drills are static data; the coaching capability
/// selects from them and never invents new ones.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Drill {
    pub drill_id: String,
    pub name: String,
    pub zone: DrillZone,
    pub difficulty: DrillDifficulty,
    pub targets: Vec<MetricName>,
    pub duration_sec: u32,
    pub instructions: String,
    pub success_metric: String,
    #[serde(default)]
    pub failure_signals: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub recommended_when: Option<RecommendedWhen>,
}

#[derive(Debug, thiserror::Error)]
pub enum DrillLibraryError {
    #[error("failed to read drill library: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse drill library: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("duplicate drill_id in library: {0}")]
    DuplicateId(String),
    #[error("invalid drill_id pattern: {0}")]
    InvalidId(String),
    #[error("drill library is empty")]
    Empty,
}

#[derive(Debug, Deserialize)]
struct DrillLibraryFile {
    // Fixture files may carry a $schema key; everything else is the library.
    #[serde(rename = "$schema")]
    #[allow(dead_code)]
    schema: Option<String>,
    version: String,
    drills: Vec<Drill>,
}

/// Fixed, versioned drill catalogue, loaded once at startup and never
/// mutated afterwards. Lookup by id is O(1) and by zone is O(k).
#[derive(Debug)]
pub struct DrillLibrary {
    version: String,
    drills: Vec<Drill>,
    by_id: HashMap<String, usize>,
    by_zone: HashMap<DrillZone, Vec<usize>>,
}

impl DrillLibrary {
    pub fn from_json(json: &str) -> Result<Self, DrillLibraryError> {
        let file: DrillLibraryFile = serde_json::from_str(json)?;
        Self::build(file.version, file.drills)
    }

    pub fn load(path: &std::path::Path) -> Result<Self, DrillLibraryError> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json(&json)
    }

    fn build(version: String, drills: Vec<Drill>) -> Result<Self, DrillLibraryError> {
        if drills.is_empty() {
            return Err(DrillLibraryError::Empty);
        }

        let mut by_id = HashMap::with_capacity(drills.len());
        let mut by_zone: HashMap<DrillZone, Vec<usize>> = HashMap::new();

        for (idx, drill) in drills.iter().enumerate() {
            if !valid_drill_id(&drill.drill_id) {
                return Err(DrillLibraryError::InvalidId(drill.drill_id.clone()));
            }
            if by_id.insert(drill.drill_id.clone(), idx).is_some() {
                return Err(DrillLibraryError::DuplicateId(drill.drill_id.clone()));
            }
            by_zone.entry(drill.zone).or_default().push(idx);
        }

        Ok(Self {
            version,
            drills,
            by_id,
            by_zone,
        })
    }

    pub fn version(&self) -> &str {
        &self.version
    }

    pub fn len(&self) -> usize {
        self.drills.len()
    }

    pub fn is_empty(&self) -> bool {
        self.drills.is_empty()
    }

    pub fn contains(&self, drill_id: &str) -> bool {
        self.by_id.contains_key(drill_id)
    }

    pub fn get(&self, drill_id: &str) -> Option<&Drill> {
        self.by_id.get(drill_id).map(|&idx| &self.drills[idx])
    }

    /// All drills targeting the given zone, in library order.
    pub fn drills_for_zone(&self, zone: DrillZone) -> Vec<&Drill> {
        self.by_zone
            .get(&zone)
            .map(|indexes| indexes.iter().map(|&idx| &self.drills[idx]).collect())
            .unwrap_or_default()
    }

    /// First drill in library order, the fallback of last resort.
    pub fn first(&self) -> &Drill {
        &self.drills[0]
    }
}

/// Drill ids follow `drill_<lowercase id>`.
fn valid_drill_id(id: &str) -> bool {
    match id.strip_prefix("drill_") {
        Some(rest) => {
            !rest.is_empty()
                && rest
                    .chars()
                    .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '_')
        }
        None => false,
    }
}
