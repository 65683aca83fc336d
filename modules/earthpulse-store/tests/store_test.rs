//! Integration tests for the Postgres store.
//! Requires a Postgres instance. Set DATABASE_TEST_URL or these tests are skipped.

use earthpulse_common::{
    DateRange, EventType, IndexKind, NewEvent, Region, SatelliteIndexResult, Severity, Verdict,
    VerificationStatus, METHOD_SATELLITE, SOURCE_NEWS,
};
use earthpulse_store::{EventFilters, EventStats, EventStore, SatelliteObservation, User};
use serde_json::json;
use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;
use uuid::Uuid;

/// Get a test database pool, or skip if no test DB is available.
/// Tests share the database, so assertions stick to rows the test inserted.
async fn test_pool() -> Option<PgPool> {
    let url = std::env::var("DATABASE_TEST_URL").ok()?;
    let pool = PgPool::connect(&url).await.ok()?;

    earthpulse_store::migrate(&pool).await.ok()?;

    Some(pool)
}

/// A pool whose connections resolve tables in a fresh schema of their own,
/// for tests that assert on whole-table aggregates.
async fn isolated_pool() -> Option<PgPool> {
    let url = std::env::var("DATABASE_TEST_URL").ok()?;
    let schema = format!("earthpulse_test_{}", Uuid::new_v4().simple());

    let admin = PgPool::connect(&url).await.ok()?;
    sqlx::query(&format!("CREATE SCHEMA {schema}"))
        .execute(&admin)
        .await
        .ok()?;

    let pool = PgPoolOptions::new()
        .max_connections(2)
        .after_connect(move |conn, _meta| {
            let set_path = format!("SET search_path TO {schema}");
            Box::pin(async move {
                sqlx::query(&set_path).execute(&mut *conn).await?;
                Ok(())
            })
        })
        .connect(&url)
        .await
        .ok()?;

    earthpulse_store::migrate(&pool).await.ok()?;

    Some(pool)
}

/// Event type label no other test uses, so list filters see only our rows.
fn unique_type(prefix: &str) -> EventType {
    EventType::from(format!("{prefix}-{}", Uuid::new_v4().simple()))
}

fn flood_in_texas() -> NewEvent {
    NewEvent::builder()
        .event_type(EventType::Flood)
        .title("Flash flooding along the Guadalupe")
        .description("Residents evacuated after river overflow")
        .severity(Severity::High)
        .location_name("Texas")
        .country("USA")
        .latitude(31.9686)
        .longitude(-99.9018)
        .build()
}

// =========================================================================
// Events
// =========================================================================

#[tokio::test]
async fn insert_starts_pending_and_unverified() {
    let Some(pool) = test_pool().await else {
        return;
    };
    let store = EventStore::new(pool);

    let event = store.insert(&flood_in_texas()).await.unwrap();

    assert_eq!(event.verification_status, VerificationStatus::Pending);
    assert!(!event.is_verified);
    assert!(event.verification_score.is_none());
    assert_eq!(event.source_type, "manual");
    assert_eq!(event.country.as_deref(), Some("USA"));
}

#[tokio::test]
async fn find_by_id_round_trips_and_misses() {
    let Some(pool) = test_pool().await else {
        return;
    };
    let store = EventStore::new(pool);

    let created = store.insert(&flood_in_texas()).await.unwrap();
    let found = store.find_by_id(created.id).await.unwrap().unwrap();
    assert_eq!(found.title, created.title);
    assert_eq!(found.event_type, EventType::Flood);

    assert!(store.find_by_id(Uuid::new_v4()).await.unwrap().is_none());
}

#[tokio::test]
async fn other_event_types_are_preserved() {
    let Some(pool) = test_pool().await else {
        return;
    };
    let store = EventStore::new(pool);

    let mut event = flood_in_texas();
    event.event_type = EventType::from("hurricane");
    event.source_type = SOURCE_NEWS.to_string();
    event.raw_data = Some(json!({"title": "Hurricane makes landfall"}));

    let stored = store.insert(&event).await.unwrap();
    assert_eq!(stored.event_type.as_str(), "hurricane");
    assert_eq!(stored.raw_data.unwrap()["title"], "Hurricane makes landfall");
}

#[tokio::test]
async fn list_filters_and_orders_newest_first() {
    let Some(pool) = test_pool().await else {
        return;
    };
    let store = EventStore::new(pool);
    let kind = unique_type("listing");

    let mut older = flood_in_texas();
    older.event_type = kind.clone();
    let first = store.insert(&older).await.unwrap();
    let mut newer = flood_in_texas();
    newer.event_type = kind.clone();
    newer.severity = Severity::Critical;
    let second = store.insert(&newer).await.unwrap();

    let ours = store
        .list(&EventFilters {
            event_type: Some(kind.clone()),
            ..Default::default()
        })
        .await
        .unwrap();
    assert_eq!(ours.len(), 2);
    assert_eq!(ours[0].id, second.id);
    assert_eq!(ours[1].id, first.id);

    let critical = store
        .list(&EventFilters {
            event_type: Some(kind.clone()),
            severity: Some(Severity::Critical),
            ..Default::default()
        })
        .await
        .unwrap();
    assert_eq!(critical.len(), 1);
    assert_eq!(critical[0].id, second.id);

    let paged = store
        .list(&EventFilters {
            event_type: Some(kind.clone()),
            skip: 1,
            limit: 1,
            ..Default::default()
        })
        .await
        .unwrap();
    assert_eq!(paged.len(), 1);
    assert_eq!(paged[0].id, first.id);

    let verified = store
        .list(&EventFilters {
            event_type: Some(kind),
            verified_only: true,
            ..Default::default()
        })
        .await
        .unwrap();
    assert!(verified.is_empty());
}

#[tokio::test]
async fn list_caps_page_size() {
    let Some(pool) = test_pool().await else {
        return;
    };
    let store = EventStore::new(pool);

    let events = store
        .list(&EventFilters {
            limit: 10_000,
            ..Default::default()
        })
        .await
        .unwrap();
    assert!(events.len() <= earthpulse_store::MAX_PAGE_SIZE as usize);
}

#[tokio::test]
async fn apply_verdict_writes_all_verification_fields() {
    let Some(pool) = test_pool().await else {
        return;
    };
    let store = EventStore::new(pool);
    let event = store.insert(&flood_in_texas()).await.unwrap();

    let verdict = Verdict {
        is_verified: true,
        score: 0.8,
        analysis: json!({"metric_name": "ndwi_mean", "value": 0.45}),
    };
    assert!(store.apply_verdict(event.id, &verdict).await.unwrap());

    let updated = store.find_by_id(event.id).await.unwrap().unwrap();
    assert!(updated.is_verified);
    assert_eq!(updated.verification_score, Some(0.8));
    assert_eq!(updated.verification_status, VerificationStatus::Verified);
    assert_eq!(updated.verification_method.as_deref(), Some(METHOD_SATELLITE));
    assert_eq!(updated.analysis_results.unwrap()["value"], 0.45);
    assert!(updated.updated_at >= event.updated_at);
}

#[tokio::test]
async fn apply_verdict_on_missing_event_reports_false() {
    let Some(pool) = test_pool().await else {
        return;
    };
    let store = EventStore::new(pool);

    let verdict = Verdict {
        is_verified: false,
        score: 0.0,
        analysis: json!({}),
    };
    assert!(!store.apply_verdict(Uuid::new_v4(), &verdict).await.unwrap());
}

// =========================================================================
// Stats
// =========================================================================

#[tokio::test]
async fn stats_are_zero_filled_on_empty_table() {
    let Some(pool) = isolated_pool().await else {
        return;
    };

    let stats = EventStats::compute(&pool).await.unwrap();
    assert_eq!(stats.total_events, 0);
    assert_eq!(stats.verification_rate, 0.0);
    assert_eq!(stats.events_by_type["wildfire"], 0);
    assert_eq!(stats.events_by_severity["critical"], 0);
    assert_eq!(stats.events_by_status["pending"], 0);
}

#[tokio::test]
async fn stats_count_verified_events() {
    let Some(pool) = isolated_pool().await else {
        return;
    };
    let store = EventStore::new(pool.clone());

    let a = store.insert(&flood_in_texas()).await.unwrap();
    store.insert(&flood_in_texas()).await.unwrap();
    store.insert(&flood_in_texas()).await.unwrap();
    store
        .apply_verdict(
            a.id,
            &Verdict {
                is_verified: true,
                score: 0.8,
                analysis: json!({}),
            },
        )
        .await
        .unwrap();

    let stats = EventStats::compute(&pool).await.unwrap();
    assert_eq!(stats.total_events, 3);
    assert_eq!(stats.verified_events, 1);
    assert_eq!(stats.verification_rate, 33.3);
    assert_eq!(stats.events_by_type["flood"], 3);
    assert_eq!(stats.events_by_status["verified"], 1);
    assert_eq!(stats.events_by_status["pending"], 2);
}

// =========================================================================
// Observations and users
// =========================================================================

#[tokio::test]
async fn observations_are_recorded() {
    let Some(pool) = test_pool().await else {
        return;
    };

    let region = Region {
        latitude: -3.4653,
        longitude: -62.2159,
        radius_km: 10.0,
    };
    let range = DateRange::trailing(30, chrono::Utc::now().date_naive());
    let result = SatelliteIndexResult::measured(IndexKind::Vegetation, region, range, Some(0.62), 12);

    let id = SatelliteObservation::record(&result, &pool).await.unwrap();

    let (kind, value): (String, Option<f64>) =
        sqlx::query_as("SELECT index_kind, value FROM satellite_observations WHERE id = $1")
            .bind(id)
            .fetch_one(&pool)
            .await
            .unwrap();
    assert_eq!(kind, "vegetation");
    assert_eq!(value, Some(0.62));
}

#[tokio::test]
async fn duplicate_email_is_rejected() {
    let Some(pool) = test_pool().await else {
        return;
    };

    let local = format!("ranger-{}", Uuid::new_v4().simple());
    let email = format!("{local}@example.org");

    let first = User::create(&email, "hash", "salt", &pool).await.unwrap();
    assert!(first.is_some());

    let again = User::create(&email.to_uppercase(), "hash2", "salt2", &pool)
        .await
        .unwrap();
    assert!(again.is_none());

    let found = User::find_by_email(&format!("{}@EXAMPLE.org", local.to_uppercase()), &pool)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(found.password_hash, "hash");
}
