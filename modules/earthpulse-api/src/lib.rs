//! HTTP surface for EarthPulse.

pub mod auth;
pub mod error;
pub mod extract;
pub mod jwt;
pub mod rest;

use std::sync::Arc;

use axum::{
    http::{header, HeaderValue},
    routing::{get, post},
    Router,
};
use earthpulse_news::NewsIngestor;
use earthpulse_satellite::SatelliteClient;
use earthpulse_store::EventStore;
use earthpulse_verify::Verifier;
use sqlx::PgPool;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tower_http::set_header::SetResponseHeaderLayer;

use crate::jwt::JwtService;

pub struct AppState {
    pub pool: PgPool,
    pub store: EventStore,
    pub satellite: SatelliteClient,
    pub verifier: Verifier,
    pub ingestor: NewsIngestor,
    pub jwt: JwtService,
}

impl AppState {
    pub fn new(
        pool: PgPool,
        satellite: SatelliteClient,
        ingestor: NewsIngestor,
        jwt: JwtService,
    ) -> Self {
        let store = EventStore::new(pool.clone());
        let verifier = Verifier::new(store.clone(), satellite.clone());
        Self {
            pool,
            store,
            satellite,
            verifier,
            ingestor,
            jwt,
        }
    }
}

/// Every route, with CORS, no-store caching headers and request tracing.
/// An empty `allowed_origins` allows any origin.
pub fn build_router(state: Arc<AppState>, allowed_origins: &[String]) -> Router {
    Router::new()
        .route("/", get(rest::root))
        .route("/health", get(rest::health))
        .route("/api/events", get(rest::events::api_events))
        .route("/api/events/create", post(rest::events::api_create_event))
        .route("/api/events/{id}", get(rest::events::api_event_detail))
        .route("/api/events/{id}/verify", post(rest::events::api_verify_event))
        .route("/api/satellite/ndvi", get(rest::satellite::api_ndvi))
        .route("/api/satellite/wildfire", get(rest::satellite::api_wildfire))
        .route("/api/satellite/water", get(rest::satellite::api_water))
        .route("/api/news/scrape", post(rest::news::api_scrape))
        .route("/api/stats", get(rest::stats::api_stats))
        .route("/api/auth/register", post(rest::accounts::api_register))
        .route("/api/auth/login", post(rest::accounts::api_login))
        .with_state(state)
        .layer(cors_layer(allowed_origins))
        .layer(SetResponseHeaderLayer::overriding(
            header::CACHE_CONTROL,
            HeaderValue::from_static("no-store"),
        ))
        .layer(
            tower_http::trace::TraceLayer::new_for_http()
                .make_span_with(|request: &axum::http::Request<_>| {
                    tracing::info_span!(
                        "http_request",
                        method = %request.method(),
                        path = %request.uri().path(),
                    )
                }),
        )
}

fn cors_layer(allowed_origins: &[String]) -> CorsLayer {
    let origins: Vec<HeaderValue> = allowed_origins
        .iter()
        .filter_map(|o| HeaderValue::from_str(o).ok())
        .collect();

    let layer = CorsLayer::new().allow_methods(Any).allow_headers(Any);
    if origins.is_empty() {
        layer.allow_origin(Any)
    } else {
        layer.allow_origin(AllowOrigin::list(origins))
    }
}
