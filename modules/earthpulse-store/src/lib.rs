//! Postgres persistence for events, satellite observations and users.

pub mod events;
pub mod observations;
pub mod stats;
pub mod users;

pub use events::{EventFilters, EventStore, MAX_PAGE_SIZE};
pub use observations::SatelliteObservation;
pub use stats::{verification_rate, EventStats};
pub use users::{normalize_email, User};

use anyhow::Result;
use sqlx::PgPool;

/// Run the embedded SQL migrations.
pub async fn migrate(pool: &PgPool) -> Result<()> {
    sqlx::migrate!("./migrations").run(pool).await?;
    Ok(())
}
