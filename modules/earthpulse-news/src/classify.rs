//! Keyword rules for event type and severity.
//!
//! Both are first-match scans over fixed, ordered lists; no scoring across
//! categories.

use earthpulse_common::{EventType, Severity};

/// Label given to articles that match no event keyword.
pub const UNKNOWN_EVENT_TYPE: &str = "unknown";

const TYPE_KEYWORDS: &[(&str, &[&str])] = &[
    ("wildfire", &["wildfire", "forest fire", "bushfire", "brush fire", "wild fire"]),
    ("flood", &["flood", "inundation", "deluge"]),
    ("deforestation", &["deforestation", "illegal logging", "forest clearance", "forest loss"]),
    ("drought", &["drought", "heatwave", "heat wave", "water shortage"]),
    ("hurricane", &["hurricane", "cyclone", "typhoon"]),
];

const SEVERITY_TIERS: &[(Severity, &[&str])] = &[
    (
        Severity::Critical,
        &["catastrophic", "devastat", "deadly", "fatalities", "state of emergency", "unprecedented"],
    ),
    (
        Severity::High,
        &["severe", "massive", "major", "evacuat", "widespread", "record"],
    ),
    (
        Severity::Medium,
        &["moderate", "spreading", "warning", "threat", "alert"],
    ),
];

pub fn classify_event_type(text: &str) -> EventType {
    let text = text.to_lowercase();
    TYPE_KEYWORDS
        .iter()
        .find(|(_, keywords)| keywords.iter().any(|k| text.contains(k)))
        .map(|(label, _)| EventType::from(*label))
        .unwrap_or_else(|| EventType::Other(UNKNOWN_EVENT_TYPE.to_string()))
}

pub fn assess_severity(text: &str) -> Severity {
    let text = text.to_lowercase();
    SEVERITY_TIERS
        .iter()
        .find(|(_, keywords)| keywords.iter().any(|k| text.contains(k)))
        .map(|(severity, _)| *severity)
        .unwrap_or(Severity::Low)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_matching_type_wins() {
        // Mentions both a flood and a wildfire; wildfire is checked first.
        let text = "Flooding follows weeks after the wildfire scarred the hills";
        assert_eq!(classify_event_type(text), EventType::Wildfire);
    }

    #[test]
    fn matches_are_case_insensitive() {
        assert_eq!(
            classify_event_type("Amazon DEFORESTATION reaches record high"),
            EventType::Deforestation
        );
        assert_eq!(classify_event_type("Australian Bushfires threaten reserves"), EventType::Wildfire);
    }

    #[test]
    fn storms_map_to_hurricane() {
        assert_eq!(classify_event_type("Cyclone makes landfall").as_str(), "hurricane");
    }

    #[test]
    fn no_keyword_is_unknown() {
        assert_eq!(classify_event_type("Council approves new park").as_str(), UNKNOWN_EVENT_TYPE);
    }

    #[test]
    fn severity_tiers_are_ordered() {
        // Contains both a high ("severe") and a critical ("deadly") keyword.
        assert_eq!(assess_severity("Severe and deadly floods"), Severity::Critical);
        assert_eq!(assess_severity("Severe flooding hits Southeast Asia"), Severity::High);
        assert_eq!(assess_severity("Fire warning issued"), Severity::Medium);
        assert_eq!(assess_severity("Rain expected on Tuesday"), Severity::Low);
    }
}
