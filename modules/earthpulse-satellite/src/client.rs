use std::sync::Arc;

use chrono::{NaiveDate, Utc};
use earthpulse_common::{DateRange, IndexKind, Region, SatelliteIndexResult};
use tracing::{info, warn};

use crate::interpret;
use crate::source::{IndexRequest, IndexSource};

/// Caller-facing query. Unset radius and dates fall back to the index defaults.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct IndexQuery {
    pub index: IndexKind,
    pub latitude: f64,
    pub longitude: f64,
    pub radius_km: Option<f64>,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
}

impl IndexQuery {
    pub fn at(index: IndexKind, latitude: f64, longitude: f64) -> Self {
        Self {
            index,
            latitude,
            longitude,
            radius_km: None,
            start_date: None,
            end_date: None,
        }
    }

    pub fn radius_km(mut self, radius_km: f64) -> Self {
        self.radius_km = Some(radius_km);
        self
    }

    pub fn dates(mut self, start: Option<NaiveDate>, end: Option<NaiveDate>) -> Self {
        self.start_date = start;
        self.end_date = end;
        self
    }

    /// Apply per-index defaults relative to `today`.
    pub fn resolve(&self, today: NaiveDate) -> IndexRequest {
        IndexRequest {
            index: self.index,
            region: Region {
                latitude: self.latitude,
                longitude: self.longitude,
                radius_km: self.radius_km.unwrap_or_else(|| self.index.default_radius_km()),
            },
            date_range: DateRange::resolve(self.index, self.start_date, self.end_date, today),
        }
    }
}

/// Adapter over the configured [`IndexSource`]. Never returns an error:
/// backend failures come back as results with `error` set.
#[derive(Clone)]
pub struct SatelliteClient {
    source: Arc<dyn IndexSource>,
}

impl SatelliteClient {
    pub fn new(source: Arc<dyn IndexSource>) -> Self {
        Self { source }
    }

    pub fn backend_name(&self) -> &'static str {
        self.source.name()
    }

    pub async fn query(&self, query: IndexQuery) -> SatelliteIndexResult {
        let request = query.resolve(Utc::now().date_naive());

        info!(
            index = %request.index,
            lat = request.region.latitude,
            lng = request.region.longitude,
            radius_km = request.region.radius_km,
            start = %request.date_range.start,
            end = %request.date_range.end,
            backend = self.source.name(),
            "satellite: querying index"
        );

        match self.source.fetch(&request).await {
            Ok(reading) => {
                let mut result = SatelliteIndexResult::measured(
                    request.index,
                    request.region,
                    request.date_range,
                    reading.value,
                    reading.sample_count,
                );
                result.interpretation = Some(interpret::describe(request.index, reading.value));
                if reading.value.is_none() {
                    warn!(index = %request.index, samples = reading.sample_count, "satellite: no data for window");
                }
                result
            }
            Err(e) => {
                warn!(index = %request.index, error = %e, "satellite: query failed");
                SatelliteIndexResult::failed(
                    request.index,
                    request.region,
                    request.date_range,
                    e.to_string(),
                )
            }
        }
    }
}
