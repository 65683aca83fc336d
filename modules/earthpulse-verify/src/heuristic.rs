use earthpulse_common::{EventType, IndexKind, SatelliteIndexResult, Verdict};
use serde_json::json;

/// Score given when the query failed or returned no usable value.
pub const NO_EVIDENCE_SCORE: f64 = 0.0;
/// Score given to event types with no rule.
pub const UNSUPPORTED_SCORE: f64 = 0.5;

/// Which index to query for an event, and how wide.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Plan {
    pub index: IndexKind,
    pub radius_km: f64,
}

struct Rule {
    plan: Plan,
    accepts: fn(f64) -> bool,
    accept_score: f64,
    reject_score: f64,
}

fn rule(event_type: &EventType) -> Option<Rule> {
    let rule = match event_type {
        EventType::Wildfire => Rule {
            plan: Plan { index: IndexKind::ThermalAnomaly, radius_km: 50.0 },
            accepts: |fire_pixels| fire_pixels > 0.0,
            accept_score: 0.9,
            reject_score: 0.2,
        },
        EventType::Flood => Rule {
            plan: Plan { index: IndexKind::Water, radius_km: 20.0 },
            accepts: |ndwi| ndwi > 0.3,
            accept_score: 0.8,
            reject_score: 0.3,
        },
        EventType::Deforestation => Rule {
            plan: Plan { index: IndexKind::Vegetation, radius_km: 10.0 },
            accepts: |ndvi| ndvi < 0.3,
            accept_score: 0.85,
            reject_score: 0.25,
        },
        EventType::Drought => Rule {
            plan: Plan { index: IndexKind::Water, radius_km: 20.0 },
            accepts: |ndwi| ndwi < 0.0,
            accept_score: 0.8,
            reject_score: 0.3,
        },
        EventType::Other(_) => return None,
    };
    Some(rule)
}

/// The index query for `event_type`, or `None` if it cannot be verified.
pub fn plan(event_type: &EventType) -> Option<Plan> {
    rule(event_type).map(|r| r.plan)
}

/// Apply the threshold for `event_type` to a satellite result. The result
/// itself becomes the verdict's analysis.
pub fn decide(event_type: &EventType, result: &SatelliteIndexResult) -> Verdict {
    let Some(rule) = rule(event_type) else {
        return unsupported(event_type);
    };

    let analysis = serde_json::to_value(result).unwrap_or_else(|_| json!({}));

    let (is_verified, score) = match (result.is_error(), result.value) {
        (false, Some(value)) if (rule.accepts)(value) => (true, rule.accept_score),
        (false, Some(_)) => (false, rule.reject_score),
        _ => (false, NO_EVIDENCE_SCORE),
    };

    Verdict {
        is_verified,
        score,
        analysis,
    }
}

pub fn unsupported(event_type: &EventType) -> Verdict {
    Verdict {
        is_verified: false,
        score: UNSUPPORTED_SCORE,
        analysis: json!({
            "message": format!("Event type '{event_type}' not supported for automatic verification")
        }),
    }
}
