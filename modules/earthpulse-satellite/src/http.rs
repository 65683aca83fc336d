use async_trait::async_trait;
use chrono::NaiveDate;
use earthpulse_common::IndexKind;
use serde::Serialize;

use crate::error::{Result, SatelliteError};
use crate::source::{IndexReading, IndexRequest, IndexSource};

/// Geospatial engine reached over HTTP.
///
/// `POST {base_url}/v1/indices` with the resolved request; the engine
/// answers `{"value": <f64|null>, "sample_count": <u32>}`.
pub struct HttpIndexSource {
    client: reqwest::Client,
    base_url: String,
    token: Option<String>,
}

#[derive(Serialize)]
struct IndexRequestBody {
    index: IndexKind,
    latitude: f64,
    longitude: f64,
    radius_km: f64,
    start_date: NaiveDate,
    end_date: NaiveDate,
}

impl From<&IndexRequest> for IndexRequestBody {
    fn from(req: &IndexRequest) -> Self {
        Self {
            index: req.index,
            latitude: req.region.latitude,
            longitude: req.region.longitude,
            radius_km: req.region.radius_km,
            start_date: req.date_range.start,
            end_date: req.date_range.end,
        }
    }
}

impl HttpIndexSource {
    pub fn new(client: reqwest::Client, base_url: &str, token: Option<&str>) -> Self {
        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            token: token.map(String::from),
        }
    }

    fn endpoint(&self) -> String {
        format!("{}/v1/indices", self.base_url)
    }
}

#[async_trait]
impl IndexSource for HttpIndexSource {
    fn name(&self) -> &'static str {
        "http"
    }

    async fn fetch(&self, request: &IndexRequest) -> Result<IndexReading> {
        let mut req = self
            .client
            .post(self.endpoint())
            .json(&IndexRequestBody::from(request));

        if let Some(ref token) = self.token {
            req = req.bearer_auth(token);
        }

        let resp = req.send().await?;
        let status = resp.status();
        let body = resp.text().await?;

        if !status.is_success() {
            return Err(SatelliteError::Api {
                status: status.as_u16(),
                message: body,
            });
        }

        parse_reading(&body)
    }
}

/// Decode an engine response body.
pub fn parse_reading(body: &str) -> Result<IndexReading> {
    serde_json::from_str::<IndexReading>(body).map_err(|e| SatelliteError::Decode(e.to_string()))
}
