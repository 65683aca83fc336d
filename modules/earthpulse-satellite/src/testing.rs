//! Canned backend for tests.

use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;
use earthpulse_common::IndexKind;

use crate::error::{Result, SatelliteError};
use crate::source::{IndexReading, IndexRequest, IndexSource};

/// Returns preset readings per index and records every request it sees.
/// Indices with no preset answer with an engine error.
#[derive(Default)]
pub struct FixedIndexSource {
    readings: HashMap<IndexKind, IndexReading>,
    failures: HashMap<IndexKind, String>,
    requests: Mutex<Vec<IndexRequest>>,
}

impl FixedIndexSource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_value(mut self, index: IndexKind, value: f64) -> Self {
        self.readings.insert(
            index,
            IndexReading {
                value: Some(value),
                sample_count: 4,
            },
        );
        self
    }

    pub fn with_no_data(mut self, index: IndexKind) -> Self {
        self.readings.insert(
            index,
            IndexReading {
                value: None,
                sample_count: 0,
            },
        );
        self
    }

    pub fn with_failure(mut self, index: IndexKind, message: &str) -> Self {
        self.failures.insert(index, message.to_string());
        self
    }

    pub fn requests(&self) -> Vec<IndexRequest> {
        self.requests.lock().map(|r| r.clone()).unwrap_or_default()
    }
}

#[async_trait]
impl IndexSource for FixedIndexSource {
    fn name(&self) -> &'static str {
        "fixed"
    }

    async fn fetch(&self, request: &IndexRequest) -> Result<IndexReading> {
        if let Ok(mut seen) = self.requests.lock() {
            seen.push(*request);
        }

        if let Some(message) = self.failures.get(&request.index) {
            return Err(SatelliteError::Api {
                status: 503,
                message: message.clone(),
            });
        }

        self.readings
            .get(&request.index)
            .copied()
            .ok_or_else(|| SatelliteError::Api {
                status: 404,
                message: format!("no fixture for {}", request.index),
            })
    }
}
