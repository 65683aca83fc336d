use std::collections::BTreeMap;

use anyhow::Result;
use earthpulse_common::{EventType, Severity, VerificationStatus};
use serde::Serialize;
use sqlx::PgPool;

/// Aggregate counts over the events table.
#[derive(Debug, Clone, Serialize)]
pub struct EventStats {
    pub total_events: i64,
    pub verified_events: i64,
    pub verification_rate: f64,
    pub events_by_type: BTreeMap<String, i64>,
    pub events_by_severity: BTreeMap<String, i64>,
    pub events_by_status: BTreeMap<String, i64>,
}

impl EventStats {
    pub async fn compute(pool: &PgPool) -> Result<Self> {
        let (total_events, verified_events) = sqlx::query_as::<_, (i64, i64)>(
            "SELECT COUNT(*), COUNT(*) FILTER (WHERE is_verified) FROM events",
        )
        .fetch_one(pool)
        .await?;

        let events_by_type = zero_filled(
            EventType::KNOWN.iter().map(|t| t.as_str().to_string()),
            grouped(pool, "event_type").await?,
        );
        let events_by_severity = zero_filled(
            Severity::ALL.iter().map(|s| s.as_str().to_string()),
            grouped(pool, "severity").await?,
        );
        let events_by_status = zero_filled(
            VerificationStatus::ALL.iter().map(|s| s.as_str().to_string()),
            grouped(pool, "verification_status").await?,
        );

        Ok(Self {
            total_events,
            verified_events,
            verification_rate: verification_rate(verified_events, total_events),
            events_by_type,
            events_by_severity,
            events_by_status,
        })
    }
}

/// Percentage of verified events, rounded to one decimal place.
pub fn verification_rate(verified: i64, total: i64) -> f64 {
    if total <= 0 {
        return 0.0;
    }
    let pct = verified as f64 / total as f64 * 100.0;
    (pct * 10.0).round() / 10.0
}

// `column` is always one of the fixed names above, never user input.
async fn grouped(pool: &PgPool, column: &str) -> Result<Vec<(String, i64)>> {
    let sql = format!("SELECT {column}, COUNT(*) FROM events GROUP BY {column}");
    let rows = sqlx::query_as::<_, (String, i64)>(&sql)
        .fetch_all(pool)
        .await?;
    Ok(rows)
}

fn zero_filled(
    keys: impl Iterator<Item = String>,
    counts: Vec<(String, i64)>,
) -> BTreeMap<String, i64> {
    let mut map: BTreeMap<String, i64> = keys.map(|k| (k, 0)).collect();
    for (key, count) in counts {
        *map.entry(key).or_insert(0) += count;
    }
    map
}
