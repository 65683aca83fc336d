use std::fmt;

use chrono::{Duration, NaiveDate};
use serde::{Deserialize, Serialize};

/// Satellite-derived index the geospatial engine can reduce over a region.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IndexKind {
    /// Mean NDVI (vegetation density).
    Vegetation,
    /// Mean NDWI (surface water).
    Water,
    /// Count of thermal-anomaly (active fire) pixels.
    ThermalAnomaly,
}

impl IndexKind {
    pub fn metric_name(&self) -> &'static str {
        match self {
            IndexKind::Vegetation => "ndvi_mean",
            IndexKind::Water => "ndwi_mean",
            IndexKind::ThermalAnomaly => "fire_pixel_count",
        }
    }

    pub fn default_radius_km(&self) -> f64 {
        match self {
            IndexKind::Vegetation => 10.0,
            IndexKind::Water => 20.0,
            IndexKind::ThermalAnomaly => 50.0,
        }
    }

    /// Length of the look-back window used when no dates are given.
    pub fn default_window_days(&self) -> i64 {
        match self {
            IndexKind::Vegetation | IndexKind::Water => 30,
            IndexKind::ThermalAnomaly => 7,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            IndexKind::Vegetation => "vegetation",
            IndexKind::Water => "water",
            IndexKind::ThermalAnomaly => "thermal_anomaly",
        }
    }
}

impl fmt::Display for IndexKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Circular area of interest around a point.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Region {
    pub latitude: f64,
    pub longitude: f64,
    pub radius_km: f64,
}

/// Inclusive calendar window, serialized as `YYYY-MM-DD`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateRange {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl DateRange {
    /// The `days`-long window ending on `end`.
    pub fn trailing(days: i64, end: NaiveDate) -> Self {
        Self {
            start: end - Duration::days(days),
            end,
        }
    }

    /// Fill missing bounds from the index's default window ending `today`.
    /// A lone start date runs to today; a lone end date looks back the
    /// default window from it.
    pub fn resolve(
        kind: IndexKind,
        start: Option<NaiveDate>,
        end: Option<NaiveDate>,
        today: NaiveDate,
    ) -> Self {
        let end = end.unwrap_or(today);
        let start = start.unwrap_or_else(|| end - Duration::days(kind.default_window_days()));
        Self { start, end }
    }
}

/// Scalar answer from the geospatial engine for one region and window.
///
/// Never an error at the type level: upstream failures are carried in
/// `error` with `value` left empty.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SatelliteIndexResult {
    pub index: IndexKind,
    pub metric_name: String,
    pub value: Option<f64>,
    pub region: Region,
    pub date_range: DateRange,
    pub sample_count: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub interpretation: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl SatelliteIndexResult {
    pub fn measured(
        index: IndexKind,
        region: Region,
        date_range: DateRange,
        value: Option<f64>,
        sample_count: u32,
    ) -> Self {
        Self {
            index,
            metric_name: index.metric_name().to_string(),
            value,
            region,
            date_range,
            sample_count,
            interpretation: None,
            error: None,
        }
    }

    pub fn failed(
        index: IndexKind,
        region: Region,
        date_range: DateRange,
        error: impl Into<String>,
    ) -> Self {
        Self {
            index,
            metric_name: index.metric_name().to_string(),
            value: None,
            region,
            date_range,
            sample_count: 0,
            interpretation: None,
            error: Some(error.into()),
        }
    }

    pub fn is_error(&self) -> bool {
        self.error.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn day(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn default_windows_per_index() {
        let today = day(2024, 8, 31);

        let veg = DateRange::resolve(IndexKind::Vegetation, None, None, today);
        assert_eq!(veg.start, day(2024, 8, 1));
        assert_eq!(veg.end, today);

        let fire = DateRange::resolve(IndexKind::ThermalAnomaly, None, None, today);
        assert_eq!(fire.start, day(2024, 8, 24));
    }

    #[test]
    fn explicit_end_anchors_default_start() {
        let range = DateRange::resolve(IndexKind::Water, None, Some(day(2024, 3, 31)), day(2024, 9, 1));
        assert_eq!(range.start, day(2024, 3, 1));
        assert_eq!(range.end, day(2024, 3, 31));
    }

    #[test]
    fn default_radii() {
        assert_eq!(IndexKind::Vegetation.default_radius_km(), 10.0);
        assert_eq!(IndexKind::ThermalAnomaly.default_radius_km(), 50.0);
        assert_eq!(IndexKind::Water.default_radius_km(), 20.0);
    }

    #[test]
    fn failed_result_serializes_error_without_value() {
        let region = Region { latitude: 1.0, longitude: 2.0, radius_km: 10.0 };
        let range = DateRange::trailing(30, day(2024, 1, 31));
        let result = SatelliteIndexResult::failed(IndexKind::Vegetation, region, range, "engine down");

        let json = serde_json::to_value(&result).unwrap();
        assert_eq!(json["error"], "engine down");
        assert!(json["value"].is_null());
        assert_eq!(json["metric_name"], "ndvi_mean");
        assert_eq!(json["date_range"]["start"], "2024-01-01");
    }
}
