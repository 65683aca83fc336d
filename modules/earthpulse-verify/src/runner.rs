use anyhow::Result;
use earthpulse_common::{Event, EventType, Verdict};
use earthpulse_satellite::{IndexQuery, SatelliteClient};
use earthpulse_store::EventStore;
use tracing::{info, warn};
use uuid::Uuid;

use crate::heuristic;

/// Runs the heuristic for stored events and records the verdict.
#[derive(Clone)]
pub struct Verifier {
    store: EventStore,
    satellite: SatelliteClient,
}

impl Verifier {
    pub fn new(store: EventStore, satellite: SatelliteClient) -> Self {
        Self { store, satellite }
    }

    /// Query the satellite index for an event type at a point and decide.
    /// Unsupported types never reach the satellite client.
    pub async fn evaluate(&self, event_type: &EventType, latitude: f64, longitude: f64) -> Verdict {
        let Some(plan) = heuristic::plan(event_type) else {
            return heuristic::unsupported(event_type);
        };

        let query = IndexQuery::at(plan.index, latitude, longitude).radius_km(plan.radius_km);
        let result = self.satellite.query(query).await;
        heuristic::decide(event_type, &result)
    }

    /// Verify one stored event. Returns `Ok(None)` when the event does not
    /// exist (or vanished before the verdict was written).
    pub async fn verify(&self, event_id: Uuid) -> Result<Option<Verdict>> {
        let Some(event) = self.store.find_by_id(event_id).await? else {
            return Ok(None);
        };

        let verdict = self.verdict_for(&event).await;

        if !self.store.apply_verdict(event_id, &verdict).await? {
            return Ok(None);
        }
        Ok(Some(verdict))
    }

    /// Fire-and-forget entry point for deferred tasks. Never fails; a failed
    /// run leaves the event untouched.
    pub async fn run(&self, event_id: Uuid) {
        match self.verify(event_id).await {
            Ok(Some(verdict)) => info!(
                event_id = %event_id,
                verified = verdict.is_verified,
                score = verdict.score,
                status = %verdict.status(),
                "Verification complete"
            ),
            Ok(None) => warn!(event_id = %event_id, "Verification skipped: event not found"),
            Err(e) => warn!(event_id = %event_id, error = %e, "Verification failed"),
        }
    }

    async fn verdict_for(&self, event: &Event) -> Verdict {
        info!(
            event_id = %event.id,
            event_type = %event.event_type,
            lat = event.latitude,
            lng = event.longitude,
            "Verifying event"
        );
        self.evaluate(&event.event_type, event.latitude, event.longitude)
            .await
    }
}
