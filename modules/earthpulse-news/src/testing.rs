//! In-memory collaborators for tests.

use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;
use chrono::Utc;

use crate::error::{NewsError, Result};
use crate::feed::{Article, ArticleSource};
use crate::geocode::{GeocodedPlace, Geocoder};

pub fn article(title: &str, description: &str) -> Article {
    Article {
        title: title.to_string(),
        description: description.to_string(),
        url: format!(
            "https://example.com/news/{}",
            title.to_lowercase().replace(' ', "-")
        ),
        published_at: Utc::now(),
    }
}

/// Serves a fixed list of articles, or always fails.
pub struct StaticArticles {
    articles: Vec<Article>,
    fail: bool,
}

impl StaticArticles {
    pub fn new(articles: Vec<Article>) -> Self {
        Self {
            articles,
            fail: false,
        }
    }

    pub fn failing() -> Self {
        Self {
            articles: Vec::new(),
            fail: true,
        }
    }
}

#[async_trait]
impl ArticleSource for StaticArticles {
    async fn fetch(&self, _query: &str, max_results: usize) -> Result<Vec<Article>> {
        if self.fail {
            return Err(NewsError::Api {
                status: 503,
                message: "feed unavailable".to_string(),
            });
        }
        Ok(self.articles.iter().take(max_results).cloned().collect())
    }
}

/// Resolves only the names it was given and records every lookup.
#[derive(Default)]
pub struct StaticGeocoder {
    places: HashMap<String, GeocodedPlace>,
    lookups: Mutex<Vec<String>>,
}

impl StaticGeocoder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_place(mut self, name: &str, latitude: f64, longitude: f64, country: Option<&str>) -> Self {
        self.places.insert(
            name.to_string(),
            GeocodedPlace {
                latitude,
                longitude,
                display_name: name.to_string(),
                country: country.map(String::from),
            },
        );
        self
    }

    pub fn lookups(&self) -> Vec<String> {
        self.lookups.lock().map(|l| l.clone()).unwrap_or_default()
    }
}

#[async_trait]
impl Geocoder for StaticGeocoder {
    async fn geocode(&self, place: &str) -> Result<Option<GeocodedPlace>> {
        if let Ok(mut seen) = self.lookups.lock() {
            seen.push(place.to_string());
        }
        Ok(self.places.get(place).cloned())
    }
}
