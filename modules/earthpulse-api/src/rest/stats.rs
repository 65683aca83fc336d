use std::sync::Arc;

use axum::{
    extract::State,
    response::{IntoResponse, Json, Response},
};
use chrono::{DateTime, Utc};
use earthpulse_store::EventStats;
use serde::Serialize;

use crate::error::ApiError;
use crate::AppState;

#[derive(Serialize)]
struct StatsResponse {
    #[serde(flatten)]
    stats: EventStats,
    timestamp: DateTime<Utc>,
}

pub async fn api_stats(State(state): State<Arc<AppState>>) -> Result<Response, ApiError> {
    let stats = EventStats::compute(&state.pool).await?;
    Ok(Json(StatsResponse {
        stats,
        timestamp: Utc::now(),
    })
    .into_response())
}
