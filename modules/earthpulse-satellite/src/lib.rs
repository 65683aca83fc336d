//! Satellite index client.
//!
//! All image filtering, band math and spatial reduction happens in an
//! external geospatial engine. This crate only shapes the request, picks the
//! default radius and time window for each index, and turns every outcome,
//! including engine failures, into a [`SatelliteIndexResult`].

pub mod client;
pub mod error;
pub mod http;
pub mod interpret;
pub mod source;
#[cfg(any(test, feature = "test-support"))]
pub mod testing;

pub use client::{IndexQuery, SatelliteClient};
pub use error::{Result, SatelliteError};
pub use http::HttpIndexSource;
pub use source::{IndexReading, IndexRequest, IndexSource, UnavailableIndexSource};

pub use earthpulse_common::{DateRange, IndexKind, Region, SatelliteIndexResult};
