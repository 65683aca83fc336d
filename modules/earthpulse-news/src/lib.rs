//! News ingestion.
//!
//! Pulls articles from an RSS search feed, classifies each one by keyword,
//! finds the place it talks about and geocodes it. Articles that cannot be
//! placed on a map are dropped; the rest become pending events.

pub mod classify;
pub mod error;
pub mod feed;
pub mod geocode;
pub mod ingest;
pub mod locate;
#[cfg(any(test, feature = "test-support"))]
pub mod testing;

pub use classify::{assess_severity, classify_event_type, UNKNOWN_EVENT_TYPE};
pub use error::{NewsError, Result};
pub use feed::{Article, ArticleSource, GoogleNewsFeed};
pub use geocode::{GeocodedPlace, Geocoder, NominatimGeocoder};
pub use ingest::{NewsIngestor, DEFAULT_MAX_RESULTS, DEFAULT_QUERY};
pub use locate::{CapitalizedPhraseExtractor, LocationExtractor, NerServiceExtractor};
