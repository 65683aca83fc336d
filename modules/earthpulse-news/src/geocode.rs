use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::{NewsError, Result};

/// Longest place name sent to the geocoder.
pub const MAX_QUERY_LEN: usize = 200;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GeocodedPlace {
    pub latitude: f64,
    pub longitude: f64,
    pub display_name: String,
    pub country: Option<String>,
}

/// Resolves a place name to coordinates. `Ok(None)` means the name did not
/// resolve.
#[async_trait]
pub trait Geocoder: Send + Sync {
    async fn geocode(&self, place: &str) -> Result<Option<GeocodedPlace>>;
}

/// Nominatim-compatible `/search` endpoint.
pub struct NominatimGeocoder {
    client: reqwest::Client,
    base_url: String,
}

#[derive(Debug, Deserialize)]
struct NominatimResult {
    lat: String,
    lon: String,
    display_name: String,
    #[serde(default)]
    address: Option<NominatimAddress>,
}

#[derive(Debug, Deserialize)]
struct NominatimAddress {
    country: Option<String>,
}

impl NominatimGeocoder {
    pub fn new(client: reqwest::Client, base_url: &str) -> Self {
        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }
}

#[async_trait]
impl Geocoder for NominatimGeocoder {
    async fn geocode(&self, place: &str) -> Result<Option<GeocodedPlace>> {
        let place = place.trim();
        if place.is_empty() {
            return Ok(None);
        }
        if place.chars().count() > MAX_QUERY_LEN {
            return Err(NewsError::InvalidInput(format!(
                "Location input too long (max {MAX_QUERY_LEN} chars)"
            )));
        }

        let resp = self
            .client
            .get(format!("{}/search", self.base_url))
            .query(&[
                ("q", place),
                ("format", "json"),
                ("limit", "1"),
                ("addressdetails", "1"),
            ])
            .header("User-Agent", "earthpulse/0.1")
            .send()
            .await?;

        let status = resp.status();
        if !status.is_success() {
            return Err(NewsError::Api {
                status: status.as_u16(),
                message: resp.text().await.unwrap_or_default(),
            });
        }

        let body = resp.text().await?;
        first_result(&body)
    }
}

fn first_result(body: &str) -> Result<Option<GeocodedPlace>> {
    let results: Vec<NominatimResult> =
        serde_json::from_str(body).map_err(|e| NewsError::Decode(e.to_string()))?;

    let Some(first) = results.into_iter().next() else {
        return Ok(None);
    };

    let latitude: f64 = first
        .lat
        .parse()
        .map_err(|_| NewsError::Decode(format!("bad latitude '{}'", first.lat)))?;
    let longitude: f64 = first
        .lon
        .parse()
        .map_err(|_| NewsError::Decode(format!("bad longitude '{}'", first.lon)))?;

    Ok(Some(GeocodedPlace {
        latitude,
        longitude,
        display_name: first.display_name,
        country: first.address.and_then(|a| a.country),
    }))
}
