use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::FocusMetric;

/// An area where the speaker performed well.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Strength {
    pub area: FocusMetric,
    pub observation: String,
}

/// Primary area to focus on for improvement.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FocusArea {
    pub area: FocusMetric,
    pub current_score: i32,
    pub target_score: i32,
    pub observation: String,
    pub impact: String,
}

/// A drill recommendation referencing the drill library by id.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RecommendedDrill {
    pub drill_id: String,
    pub reason: String,
    pub priority: i32,
}

/// Coaching output produced by the language-generation capability.
///
/// Drill ids are repaired against the library before this struct is built;
/// everything else must already satisfy the shape or the response is
/// rejected outright.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CoachingResponse {
    pub session_id: Uuid,
    pub summary: String,
    pub strengths: Vec<Strength>,
    pub focus_area: FocusArea,
    pub recommended_drills: Vec<RecommendedDrill>,
    pub next_session_goal: String,
}

impl CoachingResponse {
    /// Semantic constraints beyond what deserialization enforces.
    pub fn validate(&self) -> Result<(), String> {
        if self.summary.len() < 50 || self.summary.len() > 500 {
            return Err(format!(
                "summary must be 50-500 characters, got {}",
                self.summary.len()
            ));
        }
        if self.strengths.is_empty() || self.strengths.len() > 3 {
            return Err(format!(
                "strengths must contain 1-3 entries, got {}",
                self.strengths.len()
            ));
        }
        for s in &self.strengths {
            if s.observation.len() > 200 {
                return Err("strength observation exceeds 200 characters".to_string());
            }
        }
        if !(0..=100).contains(&self.focus_area.current_score)
            || !(0..=100).contains(&self.focus_area.target_score)
        {
            return Err("focus_area scores must be within 0-100".to_string());
        }
        if self.focus_area.target_score < self.focus_area.current_score {
            return Err("target_score must be >= current_score".to_string());
        }
        if self.focus_area.observation.len() > 300 {
            return Err("focus_area observation exceeds 300 characters".to_string());
        }
        if self.focus_area.impact.len() > 200 {
            return Err("focus_area impact exceeds 200 characters".to_string());
        }
        if self.recommended_drills.is_empty() || self.recommended_drills.len() > 3 {
            return Err(format!(
                "recommended_drills must contain 1-3 entries, got {}",
                self.recommended_drills.len()
            ));
        }
        let mut seen = [false; 3];
        for rec in &self.recommended_drills {
            if !(1..=3).contains(&rec.priority) {
                return Err(format!("drill priority out of range: {}", rec.priority));
            }
            let slot = (rec.priority - 1) as usize;
            if seen[slot] {
                return Err("duplicate priority values in recommended_drills".to_string());
            }
            seen[slot] = true;
            if rec.reason.len() > 200 {
                return Err("drill reason exceeds 200 characters".to_string());
            }
        }
        if self.next_session_goal.len() < 20 || self.next_session_goal.len() > 200 {
            return Err(format!(
                "next_session_goal must be 20-200 characters, got {}",
                self.next_session_goal.len()
            ));
        }
        Ok(())
    }
}
