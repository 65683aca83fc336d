use chrono::{DateTime, Utc};
use earthpulse_common::SatelliteIndexResult;
use serde::Serialize;
use sqlx::PgPool;
use tracing::warn;
use uuid::Uuid;

/// A persisted ad-hoc satellite index query.
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct SatelliteObservation {
    pub id: Uuid,
    pub latitude: f64,
    pub longitude: f64,
    pub radius_km: f64,
    pub index_kind: String,
    pub metric_name: String,
    pub value: Option<f64>,
    pub sample_count: i32,
    pub metrics: serde_json::Value,
    pub created_at: DateTime<Utc>,
}

impl SatelliteObservation {
    /// Best-effort insert. Failures are logged and swallowed.
    pub async fn record(result: &SatelliteIndexResult, pool: &PgPool) -> Option<Uuid> {
        let metrics = match serde_json::to_value(result) {
            Ok(v) => v,
            Err(e) => {
                warn!(error = %e, "Failed to serialize satellite observation");
                return None;
            }
        };

        let id = Uuid::new_v4();
        let inserted = sqlx::query(
            r#"
            INSERT INTO satellite_observations
                (id, latitude, longitude, radius_km, index_kind, metric_name, value, sample_count, metrics)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            "#,
        )
        .bind(id)
        .bind(result.region.latitude)
        .bind(result.region.longitude)
        .bind(result.region.radius_km)
        .bind(result.index.as_str())
        .bind(&result.metric_name)
        .bind(result.value)
        .bind(i32::try_from(result.sample_count).unwrap_or(i32::MAX))
        .bind(metrics)
        .execute(pool)
        .await;

        match inserted {
            Ok(_) => Some(id),
            Err(e) => {
                warn!(error = %e, index = %result.index, "Failed to record satellite observation");
                None
            }
        }
    }
}
