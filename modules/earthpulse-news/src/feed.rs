use std::sync::LazyLock;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use regex::Regex;
use serde::Serialize;
use tracing::info;
use url::Url;

use crate::error::{NewsError, Result};

static RE_TAG: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"<[^>]*>").unwrap());
static RE_SPACE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\s+").unwrap());

/// One news item as fetched from a feed.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Article {
    pub title: String,
    pub description: String,
    pub url: String,
    pub published_at: DateTime<Utc>,
}

impl Article {
    /// Title and description joined, for keyword and place scans.
    pub fn text(&self) -> String {
        if self.description.is_empty() {
            self.title.clone()
        } else {
            format!("{}. {}", self.title, self.description)
        }
    }
}

#[async_trait]
pub trait ArticleSource: Send + Sync {
    async fn fetch(&self, query: &str, max_results: usize) -> Result<Vec<Article>>;
}

/// Google News RSS search.
pub struct GoogleNewsFeed {
    client: reqwest::Client,
    base_url: String,
}

impl GoogleNewsFeed {
    pub fn new(client: reqwest::Client, base_url: &str) -> Self {
        Self {
            client,
            base_url: base_url.to_string(),
        }
    }

    pub fn search_url(&self, query: &str) -> Result<Url> {
        Url::parse_with_params(
            &self.base_url,
            &[("q", query), ("hl", "en-US"), ("gl", "US"), ("ceid", "US:en")],
        )
        .map_err(|e| NewsError::InvalidInput(format!("bad feed url '{}': {e}", self.base_url)))
    }
}

#[async_trait]
impl ArticleSource for GoogleNewsFeed {
    async fn fetch(&self, query: &str, max_results: usize) -> Result<Vec<Article>> {
        let url = self.search_url(query)?;
        let resp = self
            .client
            .get(url)
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

        let bytes = resp.bytes().await?;
        let articles = parse_feed(&bytes, max_results)?;
        info!(query, articles = articles.len(), "news: feed parsed");
        Ok(articles)
    }
}

/// Parse an RSS/Atom document into at most `max_results` articles, in feed
/// order. Entries without a link are skipped; a missing date means now.
pub fn parse_feed(bytes: &[u8], max_results: usize) -> Result<Vec<Article>> {
    let feed = feed_rs::parser::parse(bytes)?;
    let now = Utc::now();

    Ok(feed
        .entries
        .into_iter()
        .filter_map(|entry| {
            let url = entry
                .links
                .first()
                .map(|l| l.href.clone())
                .or_else(|| entry.id.starts_with("http").then(|| entry.id.clone()))?;

            let published_at = entry
                .published
                .or(entry.updated)
                .map(|dt| dt.with_timezone(&Utc))
                .unwrap_or(now);

            Some(Article {
                title: entry.title.map(|t| strip_html(&t.content)).unwrap_or_default(),
                description: entry
                    .summary
                    .map(|t| strip_html(&t.content))
                    .unwrap_or_default(),
                url,
                published_at,
            })
        })
        .take(max_results)
        .collect())
}

/// Drop tags, decode the common entities and collapse whitespace.
pub fn strip_html(html: &str) -> String {
    let text = RE_TAG.replace_all(html, " ");
    let text = text
        .replace("&nbsp;", " ")
        .replace("&quot;", "\"")
        .replace("&#39;", "'")
        .replace("&apos;", "'")
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&amp;", "&");
    RE_SPACE.replace_all(text.trim(), " ").into_owned()
}
