use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use sqlx::postgres::PgPoolOptions;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use earthpulse_api::jwt::{JwtService, ISSUER};
use earthpulse_api::{build_router, AppState};
use earthpulse_common::Config;
use earthpulse_news::{
    CapitalizedPhraseExtractor, GoogleNewsFeed, LocationExtractor, NewsIngestor, NerServiceExtractor,
    NominatimGeocoder,
};
use earthpulse_satellite::{HttpIndexSource, IndexSource, SatelliteClient, UnavailableIndexSource};

#[tokio::main]
async fn main() -> Result<()> {
    let config = Config::from_env()?;
    init_tracing(config.log_json)?;

    let pool = PgPoolOptions::new()
        .max_connections(config.database_max_connections)
        .connect(&config.database_url)
        .await?;
    earthpulse_store::migrate(&pool).await?;
    info!("Database migrations applied");

    let http = reqwest::Client::builder()
        .timeout(Duration::from_secs(30))
        .build()?;

    // Satellite backend is chosen once here; there is no silent fallback.
    let index_source: Arc<dyn IndexSource> = match &config.satellite_engine_url {
        Some(url) => Arc::new(HttpIndexSource::new(
            http.clone(),
            url,
            config.satellite_engine_token.as_deref(),
        )),
        None => {
            warn!("SATELLITE_ENGINE_URL not set; satellite queries will report errors");
            Arc::new(UnavailableIndexSource)
        }
    };
    info!(backend = index_source.name(), "Satellite index backend selected");

    let extractor: Arc<dyn LocationExtractor> = match &config.ner_service_url {
        Some(url) => Arc::new(NerServiceExtractor::new(http.clone(), url)),
        None => Arc::new(CapitalizedPhraseExtractor),
    };
    info!(extractor = extractor.name(), "Location extractor selected");

    let ingestor = NewsIngestor::new(
        Arc::new(GoogleNewsFeed::new(http.clone(), &config.news_feed_url)),
        extractor,
        Arc::new(NominatimGeocoder::new(http, &config.geocoder_url)),
    );

    let state = Arc::new(AppState::new(
        pool,
        SatelliteClient::new(index_source),
        ingestor,
        JwtService::new(&config.jwt_secret, ISSUER.to_string()),
    ));

    let app = build_router(state, &config.allowed_origins);

    let addr = format!("{}:{}", config.web_host, config.web_port);
    info!("EarthPulse API starting on {addr}");

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

fn init_tracing(json: bool) -> Result<()> {
    let filter = EnvFilter::from_default_env().add_directive("earthpulse=info".parse()?);
    if json {
        tracing_subscriber::fmt().json().with_env_filter(filter).init();
    } else {
        tracing_subscriber::fmt().with_env_filter(filter).init();
    }
    Ok(())
}
