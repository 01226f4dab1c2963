use std::sync::Arc;

use serde_json::json;

use crate::application::ports::{LlmClient, LlmClientError};
use crate::domain::{CoachingResponse, DrillLibrary, DrillZone, FocusMetric, ScoreContract};

const SYSTEM_PROMPT: &str = "You are a professional speech coach analyzing session results.

CRITICAL RULES:
1. You MUST select drills from the provided library - NEVER invent new drills
2. All drill_ids in your response MUST exist in the drill library
3. Your response MUST be valid JSON matching the schema exactly
4. Focus on ONE primary area for improvement (the focus_metric)
5. Be encouraging but honest - growth comes from acknowledging areas to improve

You will receive:
- Score contract with metrics and scores
- Available drills from the library

Respond with a coaching plan that:
1. Summarizes the session (2-3 sentences)
2. Identifies 1-3 strengths
3. Focuses on one area for improvement
4. Recommends 1-3 drills from the library
5. Sets a specific, measurable goal for next session";

/// Number of additional zones sampled into the candidate set for variety.
const EXTRA_ZONES: usize = 2;
/// Drills taken from each additional zone.
const DRILLS_PER_EXTRA_ZONE: usize = 2;
/// Flags included in the prompt.
const MAX_PROMPT_FLAGS: usize = 10;

/// Selects coaching drills for a scored session via the language-generation
/// capability, guaranteeing that every recommended drill id exists in the
/// library regardless of what the capability returns.
pub struct CoachingService {
    client: Arc<dyn LlmClient>,
    library: Arc<DrillLibrary>,
}

impl CoachingService {
    pub fn new(client: Arc<dyn LlmClient>, library: Arc<DrillLibrary>) -> Self {
        Self { client, library }
    }

    pub async fn generate(
        &self,
        contract: &ScoreContract,
    ) -> Result<CoachingResponse, CoachingError> {
        let focus_zone = DrillZone::for_focus_metric(contract.focus_metric);
        let user_prompt = self.build_prompt(contract, focus_zone);

        let raw = self.client.complete(SYSTEM_PROMPT, &user_prompt).await?;

        let mut value: serde_json::Value = serde_json::from_str(&raw).map_err(|e| {
            CoachingError::ValidationFailed(format!("response is not valid JSON: {}", e))
        })?;
        let obj = value
            .as_object_mut()
            .ok_or_else(|| CoachingError::ValidationFailed("response is not a JSON object".into()))?;

        // The capability's own session_id is never trusted.
        obj.insert("session_id".to_string(), json!(contract.session_id));

        self.repair_drill_ids(obj);

        let response: CoachingResponse = serde_json::from_value(value)
            .map_err(|e| CoachingError::ValidationFailed(e.to_string()))?;
        response.validate().map_err(CoachingError::ValidationFailed)?;

        Ok(response)
    }

    /// Candidate drills: the full focus zone, plus the first couple of
    /// drills from a couple of other zones for variety.
    fn build_prompt(&self, contract: &ScoreContract, focus_zone: DrillZone) -> String {
        let mut drill_options = Vec::new();

        for drill in self.library.drills_for_zone(focus_zone) {
            drill_options.push(json!({
                "drill_id": drill.drill_id,
                "name": drill.name,
                "zone": drill.zone.as_str(),
                "difficulty": drill.difficulty,
                "targets": drill.targets,
                "duration_sec": drill.duration_sec,
                "instructions": truncate_chars(&drill.instructions, 200),
            }));
        }

        let other_zones = DrillZone::ALL
            .iter()
            .filter(|z| **z != focus_zone)
            .take(EXTRA_ZONES);
        for zone in other_zones {
            for drill in self
                .library
                .drills_for_zone(*zone)
                .into_iter()
                .take(DRILLS_PER_EXTRA_ZONE)
            {
                drill_options.push(json!({
                    "drill_id": drill.drill_id,
                    "name": drill.name,
                    "zone": drill.zone.as_str(),
                    "difficulty": drill.difficulty,
                    "targets": drill.targets,
                    "duration_sec": drill.duration_sec,
                }));
            }
        }

        let drill_options_json = serde_json::to_string_pretty(&drill_options)
            .expect("drill options serialization is infallible");

        format!(
            r#"## Session Results

**Duration:** {duration:.1} seconds
**Focus Area:** {focus}

### Metrics
- Words per minute: {wpm}
- Filler words per minute: {filler_per_min}
- Pause events: {pause_events}
- Power pauses: {power_pauses}
- Pitch variance: {pitch_variance} Hz
- Volume stability: {volume_stability}

### Scores (0-100)
- Pace: {pace}
- Fluency: {fluency}
- Clarity: {clarity}
- Vocal Variety: {vocal_variety}
- Overall: {overall}

### Flagged Events
{flags}

## Available Drills (SELECT FROM THESE ONLY)

```json
{drill_options_json}
```

## Required Response Format

Respond with valid JSON matching this structure:
```json
{{
  "session_id": "{session_id}",
  "summary": "2-3 sentence overview",
  "strengths": [
    {{"area": "pace|fluency|clarity|vocal_variety|structure|confidence", "observation": "specific observation"}}
  ],
  "focus_area": {{
    "area": "{focus}",
    "current_score": {focus_score},
    "target_score": [realistic target 5-15 points higher],
    "observation": "specific observation about what needs work",
    "impact": "why improving this matters"
  }},
  "recommended_drills": [
    {{"drill_id": "drill_xxx", "reason": "why this drill helps", "priority": 1}}
  ],
  "next_session_goal": "specific, measurable goal"
}}
```

REMEMBER: All drill_ids MUST come from the Available Drills list above."#,
            duration = contract.duration_sec,
            focus = contract.focus_metric,
            wpm = contract.metrics.wpm,
            filler_per_min = contract.metrics.filler_per_min,
            pause_events = contract.metrics.pause_events,
            power_pauses = contract.metrics.power_pauses,
            pitch_variance = contract.metrics.pitch_variance,
            volume_stability = contract.metrics.volume_stability,
            pace = contract.scores.pace,
            fluency = contract.scores.fluency,
            clarity = contract.scores.clarity,
            vocal_variety = contract.scores.vocal_variety,
            overall = contract.scores.overall,
            flags = format_flags(contract),
            session_id = contract.session_id,
            focus_score = focus_score(contract),
        )
    }

    /// Every recommended drill id must exist in the library. Unknown ids are
    /// replaced with the first drill of the zone the response itself names
    /// as the focus area; if that zone name is invalid or empty, the first
    /// drill in the library overall.
    fn repair_drill_ids(&self, response: &mut serde_json::Map<String, serde_json::Value>) {
        let fallback_id = self.fallback_drill_id(response);

        let Some(drills) = response
            .get_mut("recommended_drills")
            .and_then(|v| v.as_array_mut())
        else {
            return;
        };

        for rec in drills {
            let Some(rec) = rec.as_object_mut() else {
                continue;
            };
            let known = rec
                .get("drill_id")
                .and_then(|v| v.as_str())
                .map(|id| self.library.contains(id))
                .unwrap_or(false);
            if !known {
                tracing::warn!(
                    drill_id = ?rec.get("drill_id"),
                    fallback = %fallback_id,
                    "Unknown drill id in coaching response; substituting fallback"
                );
                rec.insert("drill_id".to_string(), json!(fallback_id));
            }
        }
    }

    fn fallback_drill_id(&self, response: &serde_json::Map<String, serde_json::Value>) -> String {
        response
            .get("focus_area")
            .and_then(|f| f.get("area"))
            .and_then(|a| a.as_str())
            .and_then(DrillZone::parse)
            .and_then(|zone| {
                self.library
                    .drills_for_zone(zone)
                    .first()
                    .map(|d| d.drill_id.clone())
            })
            .unwrap_or_else(|| self.library.first().drill_id.clone())
    }
}

fn format_flags(contract: &ScoreContract) -> String {
    if contract.flags.is_empty() {
        return "None".to_string();
    }

    contract
        .flags
        .iter()
        .take(MAX_PROMPT_FLAGS)
        .map(|f| format!("- {} at {:.1}s-{:.1}s", f.reason.as_str(), f.t_start, f.t_end))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Current score for the focus metric; areas without a dedicated score fall
/// back to the overall score.
fn focus_score(contract: &ScoreContract) -> i32 {
    match contract.focus_metric {
        FocusMetric::Pace => contract.scores.pace,
        FocusMetric::Fluency => contract.scores.fluency,
        FocusMetric::Clarity => contract.scores.clarity,
        FocusMetric::VocalVariety => contract.scores.vocal_variety,
        FocusMetric::Structure | FocusMetric::Confidence => contract.scores.overall,
    }
}

fn truncate_chars(text: &str, max_chars: usize) -> String {
    let mut truncated: String = text.chars().take(max_chars).collect();
    truncated.push_str("...");
    truncated
}

#[derive(Debug, thiserror::Error)]
pub enum CoachingError {
    #[error("llm request: {0}")]
    Llm(#[from] LlmClientError),
    #[error("coaching response validation failed: {0}")]
    ValidationFailed(String),
}
