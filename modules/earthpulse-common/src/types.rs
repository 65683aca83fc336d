use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use typed_builder::TypedBuilder;
use uuid::Uuid;

use crate::error::EarthPulseError;

/// Source type recorded for events created through the API by hand.
pub const SOURCE_MANUAL: &str = "manual";
/// Source type recorded for events produced by news ingestion.
pub const SOURCE_NEWS: &str = "news";
/// Verification method written by the satellite verification pass.
pub const METHOD_SATELLITE: &str = "satellite";

// --- Event classification ---

/// Kind of environmental event. The four known kinds drive verification;
/// any other label is carried through verbatim.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum EventType {
    Wildfire,
    Flood,
    Deforestation,
    Drought,
    Other(String),
}

impl EventType {
    pub const KNOWN: [EventType; 4] = [
        EventType::Wildfire,
        EventType::Flood,
        EventType::Deforestation,
        EventType::Drought,
    ];

    pub fn as_str(&self) -> &str {
        match self {
            EventType::Wildfire => "wildfire",
            EventType::Flood => "flood",
            EventType::Deforestation => "deforestation",
            EventType::Drought => "drought",
            EventType::Other(label) => label,
        }
    }
}

impl From<&str> for EventType {
    fn from(value: &str) -> Self {
        match value.trim().to_lowercase().as_str() {
            "wildfire" => EventType::Wildfire,
            "flood" => EventType::Flood,
            "deforestation" => EventType::Deforestation,
            "drought" => EventType::Drought,
            other => EventType::Other(other.to_string()),
        }
    }
}

impl From<String> for EventType {
    fn from(value: String) -> Self {
        EventType::from(value.as_str())
    }
}

impl From<EventType> for String {
    fn from(value: EventType) -> Self {
        value.as_str().to_string()
    }
}

impl fmt::Display for EventType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", try_from = "String")]
pub enum Severity {
    Low,
    Medium,
    High,
    Critical,
}

impl Severity {
    pub const ALL: [Severity; 4] = [
        Severity::Low,
        Severity::Medium,
        Severity::High,
        Severity::Critical,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Low => "low",
            Severity::Medium => "medium",
            Severity::High => "high",
            Severity::Critical => "critical",
        }
    }
}

impl FromStr for Severity {
    type Err = EarthPulseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "low" => Ok(Severity::Low),
            "medium" => Ok(Severity::Medium),
            "high" => Ok(Severity::High),
            "critical" => Ok(Severity::Critical),
            other => Err(EarthPulseError::Validation(format!(
                "unknown severity '{other}'"
            ))),
        }
    }
}

impl TryFrom<String> for Severity {
    type Error = EarthPulseError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Where an event sits in the verification lifecycle.
///
/// `Pending` until a verification pass completes, then `Verified` or
/// `Unverified`. `Suspect` is accepted from storage but never produced here.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VerificationStatus {
    Pending,
    Verified,
    Unverified,
    Suspect,
}

impl VerificationStatus {
    pub const ALL: [VerificationStatus; 4] = [
        VerificationStatus::Pending,
        VerificationStatus::Verified,
        VerificationStatus::Unverified,
        VerificationStatus::Suspect,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            VerificationStatus::Pending => "pending",
            VerificationStatus::Verified => "verified",
            VerificationStatus::Unverified => "unverified",
            VerificationStatus::Suspect => "suspect",
        }
    }

    /// Status implied by a completed verification verdict.
    pub fn from_verdict(is_verified: bool) -> Self {
        if is_verified {
            VerificationStatus::Verified
        } else {
            VerificationStatus::Unverified
        }
    }
}

impl FromStr for VerificationStatus {
    type Err = EarthPulseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "pending" => Ok(VerificationStatus::Pending),
            "verified" => Ok(VerificationStatus::Verified),
            "unverified" => Ok(VerificationStatus::Unverified),
            "suspect" => Ok(VerificationStatus::Suspect),
            other => Err(EarthPulseError::Validation(format!(
                "unknown verification status '{other}'"
            ))),
        }
    }
}

impl TryFrom<String> for VerificationStatus {
    type Error = EarthPulseError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl fmt::Display for VerificationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// --- Event records ---

/// A reported environmental event as stored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Event {
    pub id: Uuid,
    pub event_type: EventType,
    pub title: String,
    pub description: String,
    pub severity: Severity,
    pub location_name: String,
    pub country: Option<String>,
    pub latitude: f64,
    pub longitude: f64,
    pub source_url: Option<String>,
    pub source_type: String,
    pub published_at: Option<DateTime<Utc>>,
    pub is_verified: bool,
    pub verification_score: Option<f64>,
    pub verification_status: VerificationStatus,
    pub verification_method: Option<String>,
    pub analysis_results: Option<serde_json::Value>,
    pub raw_data: Option<serde_json::Value>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Fields supplied when an event is first recorded. Verification state is
/// not settable here: every new event starts pending and unverified.
#[derive(Debug, Clone, PartialEq, TypedBuilder)]
pub struct NewEvent {
    pub event_type: EventType,
    #[builder(setter(into))]
    pub title: String,
    #[builder(setter(into))]
    pub description: String,
    pub severity: Severity,
    #[builder(setter(into))]
    pub location_name: String,
    #[builder(default, setter(strip_option, into))]
    pub country: Option<String>,
    pub latitude: f64,
    pub longitude: f64,
    #[builder(default, setter(strip_option, into))]
    pub source_url: Option<String>,
    #[builder(default = SOURCE_MANUAL.to_string(), setter(into))]
    pub source_type: String,
    #[builder(default = Some(Utc::now()))]
    pub published_at: Option<DateTime<Utc>>,
    #[builder(default)]
    pub raw_data: Option<serde_json::Value>,
}

/// Outcome of one verification pass, ready to be written onto an event.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Verdict {
    pub is_verified: bool,
    pub score: f64,
    pub analysis: serde_json::Value,
}

impl Verdict {
    pub fn status(&self) -> VerificationStatus {
        VerificationStatus::from_verdict(self.is_verified)
    }
}
