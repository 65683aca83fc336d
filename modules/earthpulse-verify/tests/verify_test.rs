//! End-to-end verification against Postgres.
//! Set DATABASE_TEST_URL or these tests are skipped.

use std::sync::Arc;

use earthpulse_common::{EventType, IndexKind, NewEvent, Severity, VerificationStatus};
use earthpulse_satellite::testing::FixedIndexSource;
use earthpulse_satellite::SatelliteClient;
use earthpulse_store::EventStore;
use earthpulse_verify::Verifier;
use sqlx::PgPool;
use uuid::Uuid;

async fn test_pool() -> Option<PgPool> {
    let url = std::env::var("DATABASE_TEST_URL").ok()?;
    let pool = PgPool::connect(&url).await.ok()?;
    earthpulse_store::migrate(&pool).await.ok()?;
    Some(pool)
}

fn event(event_type: EventType) -> NewEvent {
    NewEvent::builder()
        .event_type(event_type)
        .title("Reported incident")
        .description("Field report")
        .severity(Severity::Medium)
        .location_name("Northern California")
        .latitude(38.5816)
        .longitude(-121.4944)
        .build()
}

#[tokio::test]
async fn verdict_is_written_to_the_event() {
    let Some(pool) = test_pool().await else {
        return;
    };
    let store = EventStore::new(pool);
    let created = store.insert(&event(EventType::Wildfire)).await.unwrap();

    let source = FixedIndexSource::new().with_value(IndexKind::ThermalAnomaly, 4.0);
    let verifier = Verifier::new(store.clone(), SatelliteClient::new(Arc::new(source)));

    let verdict = verifier.verify(created.id).await.unwrap().unwrap();
    assert!(verdict.is_verified);

    let stored = store.find_by_id(created.id).await.unwrap().unwrap();
    assert!(stored.is_verified);
    assert_eq!(stored.verification_score, Some(0.9));
    assert_eq!(stored.verification_status, VerificationStatus::Verified);
    assert_eq!(stored.verification_method.as_deref(), Some("satellite"));
    assert_eq!(stored.analysis_results.unwrap()["value"], 4.0);
}

#[tokio::test]
async fn rerunning_overwrites_the_previous_verdict() {
    let Some(pool) = test_pool().await else {
        return;
    };
    let store = EventStore::new(pool);
    let created = store.insert(&event(EventType::Wildfire)).await.unwrap();

    let hot = FixedIndexSource::new().with_value(IndexKind::ThermalAnomaly, 4.0);
    Verifier::new(store.clone(), SatelliteClient::new(Arc::new(hot)))
        .verify(created.id)
        .await
        .unwrap();

    let cold = FixedIndexSource::new().with_value(IndexKind::ThermalAnomaly, 0.0);
    Verifier::new(store.clone(), SatelliteClient::new(Arc::new(cold)))
        .verify(created.id)
        .await
        .unwrap();

    let stored = store.find_by_id(created.id).await.unwrap().unwrap();
    assert!(!stored.is_verified);
    assert_eq!(stored.verification_score, Some(0.2));
    assert_eq!(stored.verification_status, VerificationStatus::Unverified);
}

#[tokio::test]
async fn unsupported_event_stays_unverified() {
    let Some(pool) = test_pool().await else {
        return;
    };
    let store = EventStore::new(pool);
    let created = store.insert(&event(EventType::from("hurricane"))).await.unwrap();

    let verifier = Verifier::new(store.clone(), SatelliteClient::new(Arc::new(FixedIndexSource::new())));
    verifier.run(created.id).await;

    let stored = store.find_by_id(created.id).await.unwrap().unwrap();
    assert!(!stored.is_verified);
    assert_eq!(stored.verification_score, Some(0.5));
    assert_eq!(stored.verification_status, VerificationStatus::Unverified);
}

#[tokio::test]
async fn missing_event_is_reported_as_none() {
    let Some(pool) = test_pool().await else {
        return;
    };
    let verifier = Verifier::new(
        EventStore::new(pool),
        SatelliteClient::new(Arc::new(FixedIndexSource::new())),
    );
    assert!(verifier.verify(Uuid::new_v4()).await.unwrap().is_none());
}
