use std::sync::Arc;

use axum::{
    extract::State,
    response::{IntoResponse, Json, Response},
};
use chrono::NaiveDate;
use earthpulse_common::{IndexKind, SatelliteIndexResult};
use earthpulse_satellite::{interpret, IndexQuery};
use earthpulse_store::SatelliteObservation;
use serde::Deserialize;
use serde_json::{json, Value};

use crate::error::ApiError;
use crate::extract::ApiQuery;
use crate::rest::events::validate_coordinates;
use crate::AppState;

/// NDWI above which surface water is considered present.
const WATER_PRESENT_NDWI: f64 = 0.3;

#[derive(Deserialize)]
pub struct SatelliteParams {
    latitude: f64,
    longitude: f64,
    radius_km: Option<f64>,
    start_date: Option<NaiveDate>,
    end_date: Option<NaiveDate>,
}

impl SatelliteParams {
    fn to_query(&self, index: IndexKind) -> Result<IndexQuery, ApiError> {
        validate_coordinates(self.latitude, self.longitude)?;

        let mut query = IndexQuery::at(index, self.latitude, self.longitude)
            .dates(self.start_date, self.end_date);
        if let Some(radius) = self.radius_km {
            if radius.is_nan() || radius <= 0.0 {
                return Err(ApiError::BadRequest("radius_km must be positive".into()));
            }
            query = query.radius_km(radius);
        }
        if let (Some(start), Some(end)) = (self.start_date, self.end_date) {
            if start > end {
                return Err(ApiError::BadRequest("start_date must not be after end_date".into()));
            }
        }
        Ok(query)
    }
}

async fn run(
    state: &AppState,
    index: IndexKind,
    params: &SatelliteParams,
) -> Result<SatelliteIndexResult, ApiError> {
    let query = params.to_query(index)?;
    Ok(state.satellite.query(query).await)
}

fn to_json(result: &SatelliteIndexResult) -> Value {
    serde_json::to_value(result).unwrap_or_else(|_| json!({}))
}

/// Vegetation health (NDVI mean).
pub async fn api_ndvi(
    State(state): State<Arc<AppState>>,
    ApiQuery(params): ApiQuery<SatelliteParams>,
) -> Result<Response, ApiError> {
    let result = run(&state, IndexKind::Vegetation, &params).await?;
    if !result.is_error() {
        SatelliteObservation::record(&result, &state.pool).await;
    }
    Ok(Json(to_json(&result)).into_response())
}

/// Active-fire detection (thermal anomaly pixel count).
pub async fn api_wildfire(
    State(state): State<Arc<AppState>>,
    ApiQuery(params): ApiQuery<SatelliteParams>,
) -> Result<Response, ApiError> {
    let result = run(&state, IndexKind::ThermalAnomaly, &params).await?;
    let body = with_fire_fields(&result);

    // Only detections are worth keeping.
    if body["fire_detected"] == Value::Bool(true) {
        SatelliteObservation::record(&result, &state.pool).await;
    }
    Ok(Json(body).into_response())
}

/// Surface water (NDWI mean), for flood and drought checks.
pub async fn api_water(
    State(state): State<Arc<AppState>>,
    ApiQuery(params): ApiQuery<SatelliteParams>,
) -> Result<Response, ApiError> {
    let result = run(&state, IndexKind::Water, &params).await?;
    if !result.is_error() {
        SatelliteObservation::record(&result, &state.pool).await;
    }
    Ok(Json(with_water_fields(&result)).into_response())
}

fn with_fire_fields(result: &SatelliteIndexResult) -> Value {
    let mut body = to_json(result);
    if let (Some(count), Some(obj)) = (result.value, body.as_object_mut()) {
        obj.insert("fire_detected".into(), json!(count > 0.0));
        // Each thermal pixel covers roughly 1 km².
        obj.insert("estimated_area_km2".into(), json!(count));
        obj.insert("risk_level".into(), json!(interpret::fire_risk(count)));
    }
    body
}

fn with_water_fields(result: &SatelliteIndexResult) -> Value {
    let mut body = to_json(result);
    if let Some(obj) = body.as_object_mut() {
        if !result.is_error() {
            let present = result.value.is_some_and(|v| v > WATER_PRESENT_NDWI);
            obj.insert("water_present".into(), json!(present));
        }
    }
    body
}

#[cfg(test)]
mod tests {
    use super::*;
    use earthpulse_common::{DateRange, Region};

    fn result(index: IndexKind, value: Option<f64>) -> SatelliteIndexResult {
        let region = Region {
            latitude: 38.58,
            longitude: -121.49,
            radius_km: index.default_radius_km(),
        };
        let range = DateRange::trailing(7, NaiveDate::from_ymd_opt(2024, 7, 15).unwrap());
        SatelliteIndexResult::measured(index, region, range, value, 3)
    }

    #[test]
    fn fire_fields_follow_pixel_count() {
        let body = with_fire_fields(&result(IndexKind::ThermalAnomaly, Some(7.0)));
        assert_eq!(body["fire_detected"], true);
        assert_eq!(body["risk_level"], "high");
        assert_eq!(body["estimated_area_km2"], 7.0);

        let none = with_fire_fields(&result(IndexKind::ThermalAnomaly, Some(0.0)));
        assert_eq!(none["fire_detected"], false);
        assert_eq!(none["risk_level"], "low");
    }

    #[test]
    fn failed_fire_query_has_no_detection_fields() {
        let r = result(IndexKind::ThermalAnomaly, None);
        let failed = SatelliteIndexResult::failed(r.index, r.region, r.date_range, "engine down");
        let body = with_fire_fields(&failed);
        assert!(body.get("fire_detected").is_none());
        assert_eq!(body["error"], "engine down");
    }

    #[test]
    fn water_present_above_threshold() {
        assert_eq!(with_water_fields(&result(IndexKind::Water, Some(0.45)))["water_present"], true);
        assert_eq!(with_water_fields(&result(IndexKind::Water, Some(0.3)))["water_present"], false);
        assert_eq!(with_water_fields(&result(IndexKind::Water, None))["water_present"], false);
    }

    #[test]
    fn params_validate_ranges() {
        let params = SatelliteParams {
            latitude: 10.0,
            longitude: 10.0,
            radius_km: Some(-1.0),
            start_date: None,
            end_date: None,
        };
        assert!(params.to_query(IndexKind::Water).is_err());

        let params = SatelliteParams {
            latitude: 10.0,
            longitude: 10.0,
            radius_km: None,
            start_date: NaiveDate::from_ymd_opt(2024, 5, 1),
            end_date: NaiveDate::from_ymd_opt(2024, 4, 1),
        };
        assert!(params.to_query(IndexKind::Water).is_err());
    }
}
