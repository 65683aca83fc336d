use std::sync::Arc;

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use chrono::{DateTime, Utc};
use earthpulse_common::{Event, EventType, NewEvent, Severity, VerificationStatus, SOURCE_MANUAL};
use earthpulse_store::{EventFilters, MAX_PAGE_SIZE};
use serde::{Deserialize, Serialize};
use tracing::info;
use uuid::Uuid;

use crate::auth::BearerUser;
use crate::error::ApiError;
use crate::extract::{ApiJson, ApiPath, ApiQuery};
use crate::AppState;

const SUMMARY_DESCRIPTION_CHARS: usize = 200;

#[derive(Deserialize)]
pub struct EventsQuery {
    event_type: Option<String>,
    severity: Option<Severity>,
    verified_only: Option<bool>,
    skip: Option<i64>,
    limit: Option<i64>,
}

#[derive(Deserialize)]
pub struct CreateEventRequest {
    event_type: String,
    title: String,
    #[serde(default)]
    description: String,
    severity: Severity,
    location_name: String,
    latitude: f64,
    longitude: f64,
    country: Option<String>,
    source_url: Option<String>,
    source_type: Option<String>,
}

#[derive(Serialize)]
struct Location<'a> {
    name: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    country: Option<&'a str>,
    latitude: f64,
    longitude: f64,
}

/// List view: description is truncated.
#[derive(Serialize)]
struct EventSummary<'a> {
    id: Uuid,
    event_type: &'a EventType,
    title: &'a str,
    description: String,
    severity: Severity,
    location: Location<'a>,
    source_url: Option<&'a str>,
    published_at: Option<DateTime<Utc>>,
    is_verified: bool,
    verification_status: VerificationStatus,
    created_at: DateTime<Utc>,
}

impl<'a> From<&'a Event> for EventSummary<'a> {
    fn from(event: &'a Event) -> Self {
        Self {
            id: event.id,
            event_type: &event.event_type,
            title: &event.title,
            description: truncate_chars(&event.description, SUMMARY_DESCRIPTION_CHARS),
            severity: event.severity,
            location: Location {
                name: &event.location_name,
                country: None,
                latitude: event.latitude,
                longitude: event.longitude,
            },
            source_url: event.source_url.as_deref(),
            published_at: event.published_at,
            is_verified: event.is_verified,
            verification_status: event.verification_status,
            created_at: event.created_at,
        }
    }
}

#[derive(Serialize)]
struct EventDetail<'a> {
    id: Uuid,
    event_type: &'a EventType,
    title: &'a str,
    description: &'a str,
    severity: Severity,
    location: Location<'a>,
    source_url: Option<&'a str>,
    source_type: &'a str,
    published_at: Option<DateTime<Utc>>,
    is_verified: bool,
    verification_status: VerificationStatus,
    verification_score: Option<f64>,
    verification_method: Option<&'a str>,
    analysis_results: Option<&'a serde_json::Value>,
    raw_data: Option<&'a serde_json::Value>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl<'a> From<&'a Event> for EventDetail<'a> {
    fn from(event: &'a Event) -> Self {
        Self {
            id: event.id,
            event_type: &event.event_type,
            title: &event.title,
            description: &event.description,
            severity: event.severity,
            location: Location {
                name: &event.location_name,
                country: event.country.as_deref(),
                latitude: event.latitude,
                longitude: event.longitude,
            },
            source_url: event.source_url.as_deref(),
            source_type: &event.source_type,
            published_at: event.published_at,
            is_verified: event.is_verified,
            verification_status: event.verification_status,
            verification_score: event.verification_score,
            verification_method: event.verification_method.as_deref(),
            analysis_results: event.analysis_results.as_ref(),
            raw_data: event.raw_data.as_ref(),
            created_at: event.created_at,
            updated_at: event.updated_at,
        }
    }
}

pub fn truncate_chars(text: &str, max: usize) -> String {
    text.chars().take(max).collect()
}

pub fn validate_coordinates(latitude: f64, longitude: f64) -> Result<(), ApiError> {
    if !(-90.0..=90.0).contains(&latitude) {
        return Err(ApiError::BadRequest("latitude must be between -90 and 90".into()));
    }
    if !(-180.0..=180.0).contains(&longitude) {
        return Err(ApiError::BadRequest("longitude must be between -180 and 180".into()));
    }
    Ok(())
}

// --- Handlers ---

pub async fn api_events(
    State(state): State<Arc<AppState>>,
    ApiQuery(params): ApiQuery<EventsQuery>,
) -> Result<Response, ApiError> {
    let filters = EventFilters {
        event_type: params
            .event_type
            .as_deref()
            .filter(|t| !t.trim().is_empty())
            .map(EventType::from),
        severity: params.severity,
        verified_only: params.verified_only.unwrap_or(false),
        skip: params.skip.unwrap_or(0).max(0),
        limit: params.limit.unwrap_or(100).clamp(0, MAX_PAGE_SIZE),
    };

    let events = state.store.list(&filters).await?;
    let summaries: Vec<EventSummary<'_>> = events.iter().map(EventSummary::from).collect();
    Ok(Json(summaries).into_response())
}

pub async fn api_event_detail(
    State(state): State<Arc<AppState>>,
    ApiPath(id): ApiPath<Uuid>,
) -> Result<Response, ApiError> {
    let event = state
        .store
        .find_by_id(id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Event not found".into()))?;

    Ok(Json(EventDetail::from(&event)).into_response())
}

pub async fn api_create_event(
    State(state): State<Arc<AppState>>,
    user: BearerUser,
    ApiJson(body): ApiJson<CreateEventRequest>,
) -> Result<Response, ApiError> {
    if body.title.trim().is_empty() {
        return Err(ApiError::BadRequest("title is required".into()));
    }
    if body.location_name.trim().is_empty() {
        return Err(ApiError::BadRequest("location_name is required".into()));
    }
    if body.event_type.trim().is_empty() {
        return Err(ApiError::BadRequest("event_type is required".into()));
    }
    validate_coordinates(body.latitude, body.longitude)?;

    let new_event = NewEvent {
        event_type: EventType::from(body.event_type.as_str()),
        title: body.title,
        description: body.description,
        severity: body.severity,
        location_name: body.location_name,
        country: body.country,
        latitude: body.latitude,
        longitude: body.longitude,
        source_url: body.source_url,
        source_type: body
            .source_type
            .filter(|s| !s.trim().is_empty())
            .unwrap_or_else(|| SOURCE_MANUAL.to_string()),
        published_at: Some(Utc::now()),
        raw_data: None,
    };

    let event = state.store.insert(&new_event).await?;
    info!(event_id = %event.id, event_type = %event.event_type, user = %user.email, "Event created");

    Ok((
        StatusCode::CREATED,
        Json(serde_json::json!({
            "message": "Event created successfully",
            "event_id": event.id,
            "event": {
                "id": event.id,
                "event_type": event.event_type,
                "title": event.title,
                "location": {
                    "name": event.location_name,
                    "latitude": event.latitude,
                    "longitude": event.longitude,
                },
            },
        })),
    )
        .into_response())
}

/// Kick off verification in the background and return immediately.
pub async fn api_verify_event(
    State(state): State<Arc<AppState>>,
    _user: BearerUser,
    ApiPath(id): ApiPath<Uuid>,
) -> Result<Response, ApiError> {
    let event = state
        .store
        .find_by_id(id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Event not found".into()))?;

    let verifier = state.verifier.clone();
    tokio::spawn(async move {
        verifier.run(id).await;
    });

    Ok((
        StatusCode::ACCEPTED,
        Json(serde_json::json!({
            "message": "Verification started",
            "event_id": event.id,
            "event_type": event.event_type,
            "status": "processing",
        })),
    )
        .into_response())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn truncation_counts_characters_not_bytes() {
        let text = "é".repeat(250);
        assert_eq!(truncate_chars(&text, 200).chars().count(), 200);
        assert_eq!(truncate_chars("short", 200), "short");
    }

    #[test]
    fn coordinate_bounds() {
        assert!(validate_coordinates(31.9686, -99.9018).is_ok());
        assert!(validate_coordinates(90.0, 180.0).is_ok());
        assert!(validate_coordinates(91.0, 0.0).is_err());
        assert!(validate_coordinates(0.0, -180.5).is_err());
        assert!(validate_coordinates(f64::NAN, 0.0).is_err());
    }
}
