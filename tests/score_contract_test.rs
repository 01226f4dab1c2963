use rostra::domain::{
    CoachingResponse, Flag, FlagReason, FocusMetric, Metrics, ScoreContract, Scores,
};
use serde_json::json;
use uuid::Uuid;

fn sample_contract() -> ScoreContract {
    ScoreContract {
        session_id: Uuid::new_v4(),
        duration_sec: 180.5,
        metrics: Metrics {
            wpm: 165.3,
            filler_per_min: 4.2,
            pause_events: 12,
            power_pauses: 3,
            pitch_variance: 42.5,
            volume_stability: 0.25,
        },
        scores: Scores {
            pace: 78,
            fluency: 65,
            clarity: 82,
            vocal_variety: 71,
            overall: 74,
        },
        focus_metric: FocusMetric::Fluency,
        flags: vec![
            Flag {
                t_start: 12.5,
                t_end: 13.1,
                reason: FlagReason::Filler,
            },
            Flag {
                t_start: 45.0,
                t_end: 47.5,
                reason: FlagReason::LongPause,
            },
        ],
    }
}

#[test]
fn given_contract_when_serializing_then_wire_shape_matches() {
    let contract = sample_contract();

    let value = serde_json::to_value(&contract).unwrap();

    assert_eq!(value["focus_metric"], "fluency");
    assert_eq!(value["flags"][1]["reason"], "long_pause");
    assert_eq!(value["metrics"]["wpm"], 165.3);
    assert_eq!(value["scores"]["overall"], 74);

    let object = value.as_object().unwrap();
    assert_eq!(object.len(), 6);
    for key in ["session_id", "duration_sec", "metrics", "scores", "focus_metric", "flags"] {
        assert!(object.contains_key(key), "missing key {}", key);
    }
}

#[test]
fn given_contract_json_when_round_tripping_then_identical() {
    let contract = sample_contract();

    let json = serde_json::to_string(&contract).unwrap();
    let decoded: ScoreContract = serde_json::from_str(&json).unwrap();

    assert_eq!(decoded, contract);
}

#[test]
fn given_extra_field_when_deserializing_contract_then_rejected() {
    let mut value = serde_json::to_value(sample_contract()).unwrap();
    value["bonus_field"] = json!(true);

    let result: Result<ScoreContract, _> = serde_json::from_value(value);

    assert!(result.is_err());
}

#[test]
fn given_extra_metric_when_deserializing_then_rejected() {
    let mut value = serde_json::to_value(sample_contract()).unwrap();
    value["metrics"]["charisma"] = json!(11);

    let result: Result<ScoreContract, _> = serde_json::from_value(value);

    assert!(result.is_err());
}

#[test]
fn given_vocal_variety_focus_when_serializing_then_snake_case_on_the_wire() {
    let mut contract = sample_contract();
    contract.focus_metric = FocusMetric::VocalVariety;

    let value = serde_json::to_value(&contract).unwrap();

    assert_eq!(value["focus_metric"], "vocal_variety");
}

#[test]
fn given_coaching_response_json_when_deserializing_then_shape_is_accepted() {
    let session_id = Uuid::new_v4();
    let value = json!({
        "session_id": session_id,
        "summary": "Clear structure throughout, though filler words crept into transitions between your main points.",
        "strengths": [
            {"area": "pace", "observation": "145 WPM sits right in the conversational sweet spot"}
        ],
        "focus_area": {
            "area": "fluency",
            "current_score": 59,
            "target_score": 70,
            "observation": "Six fillers per minute, clustered around transitions",
            "impact": "Fewer fillers will make you sound far more decisive"
        },
        "recommended_drills": [
            {"drill_id": "drill_fluency_silence", "reason": "Replaces fillers with pauses", "priority": 1}
        ],
        "next_session_goal": "Get fillers under four per minute"
    });

    let response: CoachingResponse = serde_json::from_value(value).unwrap();

    assert_eq!(response.session_id, session_id);
    assert!(response.validate().is_ok());
}

#[test]
fn given_unknown_coaching_field_when_deserializing_then_rejected() {
    let value = json!({
        "session_id": Uuid::new_v4(),
        "summary": "Clear structure throughout, though filler words crept into transitions between points.",
        "strengths": [
            {"area": "pace", "observation": "Solid rate"}
        ],
        "focus_area": {
            "area": "fluency",
            "current_score": 59,
            "target_score": 70,
            "observation": "Fillers cluster at transitions",
            "impact": "Fewer fillers sound more decisive"
        },
        "recommended_drills": [
            {"drill_id": "drill_fluency_silence", "reason": "Replaces fillers with pauses", "priority": 1}
        ],
        "next_session_goal": "Get fillers under four per minute",
        "motivational_poster": "Believe!"
    });

    let result: Result<CoachingResponse, _> = serde_json::from_value(value);

    assert!(result.is_err());
}
