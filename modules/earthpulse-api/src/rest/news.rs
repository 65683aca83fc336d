use std::sync::Arc;

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Json},
};
use earthpulse_news::{DEFAULT_MAX_RESULTS, DEFAULT_QUERY};
use serde::Deserialize;
use tracing::{info, warn};

use crate::auth::BearerUser;
use crate::extract::ApiQuery;
use crate::AppState;

const MAX_RESULTS_CAP: usize = 100;

#[derive(Deserialize)]
pub struct ScrapeQuery {
    query: Option<String>,
    max_results: Option<usize>,
}

/// Run a news ingestion pass in the background. Returns immediately.
pub async fn api_scrape(
    State(state): State<Arc<AppState>>,
    _user: BearerUser,
    ApiQuery(params): ApiQuery<ScrapeQuery>,
) -> impl IntoResponse {
    let query = params
        .query
        .filter(|q| !q.trim().is_empty())
        .unwrap_or_else(|| DEFAULT_QUERY.to_string());
    let max_results = params
        .max_results
        .unwrap_or(DEFAULT_MAX_RESULTS)
        .min(MAX_RESULTS_CAP);

    let task_state = state.clone();
    let task_query = query.clone();
    tokio::spawn(async move {
        scrape_and_save(&task_state, &task_query, max_results).await;
    });

    (
        StatusCode::ACCEPTED,
        Json(serde_json::json!({
            "message": "News scraping started",
            "status": "processing",
            "query": query,
        })),
    )
}

async fn scrape_and_save(state: &AppState, query: &str, max_results: usize) {
    let events = match state.ingestor.ingest(query, max_results).await {
        Ok(events) => events,
        Err(e) => {
            warn!(query, error = %e, "News scrape failed");
            return;
        }
    };

    let mut saved = 0usize;
    for event in &events {
        match state.store.insert(event).await {
            Ok(_) => saved += 1,
            Err(e) => warn!(title = %event.title, error = %e, "Failed to save news event"),
        }
    }

    info!(query, saved, "News scrape saved events");
}
