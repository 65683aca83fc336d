pub mod accounts;
pub mod events;
pub mod news;
pub mod satellite;
pub mod stats;

use std::sync::Arc;

use axum::{
    extract::State,
    response::{IntoResponse, Json},
};

use crate::AppState;

pub async fn root() -> impl IntoResponse {
    Json(serde_json::json!({
        "message": "Welcome to EarthPulse API",
        "status": "online",
        "features": [
            "Satellite index analysis",
            "Environmental news ingestion",
            "Event verification",
        ],
    }))
}

pub async fn health(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let database = sqlx::query("SELECT 1").execute(&state.pool).await.is_ok();

    Json(serde_json::json!({
        "status": "healthy",
        "satellite_engine": state.satellite.backend_name(),
        "database": database,
        "timestamp": chrono::Utc::now(),
    }))
}
