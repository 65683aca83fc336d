use async_trait::async_trait;
use earthpulse_common::{DateRange, IndexKind, Region};
use serde::{Deserialize, Serialize};

use crate::error::{Result, SatelliteError};

/// Fully-resolved request handed to a backend: defaults already applied.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct IndexRequest {
    pub index: IndexKind,
    pub region: Region,
    pub date_range: DateRange,
}

/// Raw scalar returned by a backend. `value` is `None` when the engine
/// found no usable imagery for the window.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct IndexReading {
    pub value: Option<f64>,
    #[serde(default)]
    pub sample_count: u32,
}

/// Backend that can reduce a satellite index over a region.
///
/// Chosen once at startup and shared as `Arc<dyn IndexSource>`.
#[async_trait]
pub trait IndexSource: Send + Sync {
    /// Short label for logs and the health endpoint.
    fn name(&self) -> &'static str;

    async fn fetch(&self, request: &IndexRequest) -> Result<IndexReading>;
}

/// Backend used when no engine is configured. Every request fails.
pub struct UnavailableIndexSource;

#[async_trait]
impl IndexSource for UnavailableIndexSource {
    fn name(&self) -> &'static str {
        "unavailable"
    }

    async fn fetch(&self, _request: &IndexRequest) -> Result<IndexReading> {
        Err(SatelliteError::NotConfigured)
    }
}
