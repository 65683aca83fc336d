use std::sync::Arc;

use earthpulse_common::{NewEvent, SOURCE_NEWS};
use tracing::{debug, info, warn};

use crate::classify::{assess_severity, classify_event_type};
use crate::error::Result;
use crate::feed::{Article, ArticleSource};
use crate::geocode::Geocoder;
use crate::locate::LocationExtractor;

pub const DEFAULT_QUERY: &str = "wildfire OR flood OR deforestation";
pub const DEFAULT_MAX_RESULTS: usize = 20;

/// Turns feed articles into pending events.
#[derive(Clone)]
pub struct NewsIngestor {
    source: Arc<dyn ArticleSource>,
    extractor: Arc<dyn LocationExtractor>,
    geocoder: Arc<dyn Geocoder>,
}

impl NewsIngestor {
    pub fn new(
        source: Arc<dyn ArticleSource>,
        extractor: Arc<dyn LocationExtractor>,
        geocoder: Arc<dyn Geocoder>,
    ) -> Self {
        Self {
            source,
            extractor,
            geocoder,
        }
    }

    /// Fetch articles for `query` and convert the ones that can be placed.
    /// Only a feed failure is an error; per-article failures drop the article.
    pub async fn ingest(&self, query: &str, max_results: usize) -> Result<Vec<NewEvent>> {
        let articles = self.source.fetch(query, max_results).await?;
        let fetched = articles.len();

        let mut events = Vec::with_capacity(fetched);
        for article in &articles {
            if let Some(event) = self.article_to_event(article).await {
                events.push(event);
            }
        }

        info!(
            query,
            fetched,
            kept = events.len(),
            dropped = fetched - events.len(),
            "news: ingestion pass complete"
        );
        Ok(events)
    }

    /// `None` when no place mention in the article resolves.
    pub async fn article_to_event(&self, article: &Article) -> Option<NewEvent> {
        let text = article.text();

        let mentions = match self.extractor.extract(&text).await {
            Ok(m) => m,
            Err(e) => {
                warn!(url = %article.url, error = %e, "news: location extraction failed");
                return None;
            }
        };

        // Only the first mention is geocoded.
        let Some(mention) = mentions.into_iter().next() else {
            debug!(url = %article.url, "news: no place mentioned, dropping");
            return None;
        };

        let place = match self.geocoder.geocode(&mention).await {
            Ok(Some(place)) => place,
            Ok(None) => {
                debug!(url = %article.url, mention = %mention, "news: place did not resolve, dropping");
                return None;
            }
            Err(e) => {
                warn!(url = %article.url, mention = %mention, error = %e, "news: geocoding failed");
                return None;
            }
        };

        let mut event = NewEvent::builder()
            .event_type(classify_event_type(&text))
            .title(article.title.clone())
            .description(article.description.clone())
            .severity(assess_severity(&text))
            .location_name(mention)
            .latitude(place.latitude)
            .longitude(place.longitude)
            .source_url(article.url.clone())
            .source_type(SOURCE_NEWS)
            .published_at(Some(article.published_at))
            .raw_data(serde_json::to_value(article).ok())
            .build();
        event.country = place.country;

        Some(event)
    }
}
