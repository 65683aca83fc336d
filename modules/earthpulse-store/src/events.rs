use anyhow::Result;
use chrono::{DateTime, Utc};
use earthpulse_common::{
    EarthPulseError, Event, EventType, NewEvent, Severity, Verdict, VerificationStatus,
    METHOD_SATELLITE,
};
use sqlx::{PgPool, Postgres, QueryBuilder};
use uuid::Uuid;

const EVENT_COLUMNS: &str = "id, event_type, title, description, severity, location_name, country, \
     latitude, longitude, source_url, source_type, published_at, is_verified, verification_score, \
     verification_status, verification_method, analysis_results, raw_data, created_at, updated_at";

/// Largest page the list query will return.
pub const MAX_PAGE_SIZE: i64 = 500;

/// A row from the events table, before enum columns are parsed.
#[derive(Debug, Clone, sqlx::FromRow)]
struct EventRow {
    id: Uuid,
    event_type: String,
    title: String,
    description: String,
    severity: String,
    location_name: String,
    country: Option<String>,
    latitude: f64,
    longitude: f64,
    source_url: Option<String>,
    source_type: String,
    published_at: Option<DateTime<Utc>>,
    is_verified: bool,
    verification_score: Option<f64>,
    verification_status: String,
    verification_method: Option<String>,
    analysis_results: Option<serde_json::Value>,
    raw_data: Option<serde_json::Value>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl TryFrom<EventRow> for Event {
    type Error = EarthPulseError;

    fn try_from(row: EventRow) -> Result<Self, Self::Error> {
        Ok(Event {
            id: row.id,
            event_type: EventType::from(row.event_type),
            title: row.title,
            description: row.description,
            severity: row.severity.parse::<Severity>()?,
            location_name: row.location_name,
            country: row.country,
            latitude: row.latitude,
            longitude: row.longitude,
            source_url: row.source_url,
            source_type: row.source_type,
            published_at: row.published_at,
            is_verified: row.is_verified,
            verification_score: row.verification_score,
            verification_status: row.verification_status.parse::<VerificationStatus>()?,
            verification_method: row.verification_method,
            analysis_results: row.analysis_results,
            raw_data: row.raw_data,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

/// Filter and paging parameters for [`EventStore::list`].
#[derive(Debug, Clone, PartialEq)]
pub struct EventFilters {
    pub event_type: Option<EventType>,
    pub severity: Option<Severity>,
    pub verified_only: bool,
    pub skip: i64,
    pub limit: i64,
}

impl Default for EventFilters {
    fn default() -> Self {
        Self {
            event_type: None,
            severity: None,
            verified_only: false,
            skip: 0,
            limit: 100,
        }
    }
}

/// Event records. Events are created pending and only ever mutated by a
/// verification pass; nothing here deletes them.
#[derive(Clone)]
pub struct EventStore {
    pool: PgPool,
}

impl EventStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Record a new event. Verification state is always initialised to
    /// pending / unverified regardless of caller input.
    pub async fn insert(&self, event: &NewEvent) -> Result<Event> {
        let sql = format!(
            r#"
            INSERT INTO events
                (id, event_type, title, description, severity, location_name, country,
                 latitude, longitude, source_url, source_type, published_at, raw_data,
                 is_verified, verification_status)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, FALSE, 'pending')
            RETURNING {EVENT_COLUMNS}
            "#
        );

        let row = sqlx::query_as::<_, EventRow>(&sql)
            .bind(Uuid::new_v4())
            .bind(event.event_type.as_str())
            .bind(&event.title)
            .bind(&event.description)
            .bind(event.severity.as_str())
            .bind(&event.location_name)
            .bind(&event.country)
            .bind(event.latitude)
            .bind(event.longitude)
            .bind(&event.source_url)
            .bind(&event.source_type)
            .bind(event.published_at)
            .bind(&event.raw_data)
            .fetch_one(&self.pool)
            .await?;

        Ok(Event::try_from(row)?)
    }

    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<Event>> {
        let sql = format!("SELECT {EVENT_COLUMNS} FROM events WHERE id = $1");
        let row = sqlx::query_as::<_, EventRow>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        row.map(Event::try_from)
            .transpose()
            .map_err(anyhow::Error::from)
    }

    /// Newest first, filtered by type, severity and verification flag.
    pub async fn list(&self, filters: &EventFilters) -> Result<Vec<Event>> {
        let mut qb =
            QueryBuilder::<Postgres>::new(format!("SELECT {EVENT_COLUMNS} FROM events WHERE TRUE "));

        if let Some(event_type) = &filters.event_type {
            qb.push("AND event_type = ");
            qb.push_bind(event_type.as_str().to_string());
            qb.push(" ");
        }

        if let Some(severity) = filters.severity {
            qb.push("AND severity = ");
            qb.push_bind(severity.as_str());
            qb.push(" ");
        }

        if filters.verified_only {
            qb.push("AND is_verified = TRUE ");
        }

        qb.push("ORDER BY created_at DESC LIMIT ");
        qb.push_bind(filters.limit.clamp(0, MAX_PAGE_SIZE));
        qb.push(" OFFSET ");
        qb.push_bind(filters.skip.max(0));

        let rows = qb.build_query_as::<EventRow>().fetch_all(&self.pool).await?;

        rows.into_iter()
            .map(|row| Event::try_from(row).map_err(anyhow::Error::from))
            .collect()
    }

    /// Write a verification verdict in a single statement. Returns `false`
    /// when the event no longer exists.
    pub async fn apply_verdict(&self, id: Uuid, verdict: &Verdict) -> Result<bool> {
        let result = sqlx::query(
            r#"
            UPDATE events
            SET is_verified = $2,
                verification_score = $3,
                verification_status = $4,
                verification_method = $5,
                analysis_results = $6,
                updated_at = now()
            WHERE id = $1
            "#,
        )
        .bind(id)
        .bind(verdict.is_verified)
        .bind(verdict.score)
        .bind(verdict.status().as_str())
        .bind(METHOD_SATELLITE)
        .bind(&verdict.analysis)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }
}
