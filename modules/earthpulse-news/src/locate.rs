use std::sync::LazyLock;

use async_trait::async_trait;
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::error::{NewsError, Result};

/// Entity labels that name a place.
const PLACE_LABELS: [&str; 3] = ["GPE", "LOC", "FAC"];

static RE_PLACE_AFTER_PREPOSITION: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"\b(?i:in|near|across|at|from|of)\s+(?:the\s+)?([A-Z][\w'\-]*(?:\s+[A-Z][\w'\-]*)*(?:,\s+[A-Z][\w'\-]*(?:\s+[A-Z][\w'\-]*)*)?)",
    )
    .unwrap()
});

/// Finds place mentions in free text, in order of appearance.
#[async_trait]
pub trait LocationExtractor: Send + Sync {
    fn name(&self) -> &'static str;
    async fn extract(&self, text: &str) -> Result<Vec<String>>;
}

/// Named-entity recognition delegated to an HTTP service.
///
/// `POST {url}` with `{"text": ...}`; the service answers
/// `{"entities": [{"text": ..., "label": ...}]}`.
pub struct NerServiceExtractor {
    client: reqwest::Client,
    url: String,
}

#[derive(Serialize)]
struct NerRequest<'a> {
    text: &'a str,
}

#[derive(Debug, Deserialize)]
struct NerResponse {
    #[serde(default)]
    entities: Vec<NerEntity>,
}

#[derive(Debug, Deserialize)]
struct NerEntity {
    text: String,
    label: String,
}

impl NerServiceExtractor {
    pub fn new(client: reqwest::Client, url: &str) -> Self {
        Self {
            client,
            url: url.to_string(),
        }
    }
}

#[async_trait]
impl LocationExtractor for NerServiceExtractor {
    fn name(&self) -> &'static str {
        "ner-service"
    }

    async fn extract(&self, text: &str) -> Result<Vec<String>> {
        let resp = self
            .client
            .post(&self.url)
            .json(&NerRequest { text })
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
        places_from_entities(&body)
    }
}

fn places_from_entities(body: &str) -> Result<Vec<String>> {
    let parsed: NerResponse =
        serde_json::from_str(body).map_err(|e| NewsError::Decode(e.to_string()))?;
    let mentions = parsed
        .entities
        .into_iter()
        .filter(|e| PLACE_LABELS.contains(&e.label.as_str()))
        .map(|e| e.text.trim().to_string())
        .filter(|t| !t.is_empty());
    Ok(dedup_in_order(mentions))
}

/// Offline fallback: capitalized phrases that follow a locative preposition,
/// e.g. "flooding across Thailand" or "fires near Los Angeles".
pub struct CapitalizedPhraseExtractor;

impl CapitalizedPhraseExtractor {
    pub fn places(text: &str) -> Vec<String> {
        dedup_in_order(
            RE_PLACE_AFTER_PREPOSITION
                .captures_iter(text)
                .filter_map(|cap| cap.get(1))
                .map(|m| m.as_str().trim().to_string()),
        )
    }
}

#[async_trait]
impl LocationExtractor for CapitalizedPhraseExtractor {
    fn name(&self) -> &'static str {
        "capitalized-phrase"
    }

    async fn extract(&self, text: &str) -> Result<Vec<String>> {
        Ok(Self::places(text))
    }
}

fn dedup_in_order(items: impl Iterator<Item = String>) -> Vec<String> {
    let mut out: Vec<String> = Vec::new();
    for item in items {
        if !out.contains(&item) {
            out.push(item);
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ner_keeps_only_place_labels() {
        let body = r#"{"entities": [
            {"text": "Reuters", "label": "ORG"},
            {"text": "Northern California", "label": "GPE"},
            {"text": "Sierra Nevada", "label": "LOC"},
            {"text": "Hoover Dam", "label": "FAC"},
            {"text": "Northern California", "label": "GPE"},
            {"text": "Tuesday", "label": "DATE"}
        ]}"#;
        assert_eq!(
            places_from_entities(body).unwrap(),
            vec!["Northern California", "Sierra Nevada", "Hoover Dam"]
        );
    }

    #[test]
    fn ner_malformed_body_is_decode_error() {
        assert!(matches!(
            places_from_entities("[oops"),
            Err(NewsError::Decode(_))
        ));
    }

    #[test]
    fn phrases_after_prepositions() {
        let text = "A wildfire threatens residential areas in Northern California. \
                    Monsoon rains cause widespread flooding across Thailand and Vietnam.";
        assert_eq!(
            CapitalizedPhraseExtractor::places(text),
            vec!["Northern California", "Thailand"]
        );
    }

    #[test]
    fn keeps_comma_qualified_places_and_skips_articles() {
        let text = "Bushfires spread across New South Wales, Australia while logging continues in the Brazilian Amazon";
        assert_eq!(
            CapitalizedPhraseExtractor::places(text),
            vec!["New South Wales, Australia", "Brazilian Amazon"]
        );
    }

    #[test]
    fn lowercase_text_yields_nothing() {
        assert!(CapitalizedPhraseExtractor::places("rain expected in the afternoon").is_empty());
    }
}
