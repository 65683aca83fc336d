use std::env;

use crate::error::EarthPulseError;

const DEFAULT_GEOCODER_URL: &str = "https://nominatim.openstreetmap.org";
const DEFAULT_NEWS_FEED_URL: &str = "https://news.google.com/rss/search";

/// Application configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct Config {
    // Database
    pub database_url: String,
    pub database_max_connections: u32,

    // Web server
    pub web_host: String,
    pub web_port: u16,
    pub allowed_origins: Vec<String>,
    pub log_json: bool,

    // Auth
    pub jwt_secret: String,

    // Geospatial engine
    pub satellite_engine_url: Option<String>,
    pub satellite_engine_token: Option<String>,

    // News ingestion
    pub ner_service_url: Option<String>,
    pub geocoder_url: String,
    pub news_feed_url: String,
}

impl Config {
    /// Load configuration from `.env` and the process environment.
    pub fn from_env() -> Result<Self, EarthPulseError> {
        dotenvy::dotenv().ok();

        Ok(Self {
            database_url: required_env("DATABASE_URL")?,
            database_max_connections: parsed_env("DATABASE_MAX_CONNECTIONS", 10)?,
            web_host: env::var("WEB_HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),
            web_port: parsed_env("WEB_PORT", 8000)?,
            allowed_origins: env::var("ALLOWED_ORIGINS")
                .unwrap_or_default()
                .split(',')
                .map(|s| s.trim())
                .filter(|s| !s.is_empty())
                .map(String::from)
                .collect(),
            log_json: env::var("LOG_FORMAT")
                .map(|v| v.eq_ignore_ascii_case("json"))
                .unwrap_or(false),
            jwt_secret: required_env("JWT_SECRET")?,
            satellite_engine_url: optional_env("SATELLITE_ENGINE_URL"),
            satellite_engine_token: optional_env("SATELLITE_ENGINE_TOKEN"),
            ner_service_url: optional_env("NER_SERVICE_URL"),
            geocoder_url: optional_env("GEOCODER_URL")
                .unwrap_or_else(|| DEFAULT_GEOCODER_URL.to_string()),
            news_feed_url: optional_env("NEWS_FEED_URL")
                .unwrap_or_else(|| DEFAULT_NEWS_FEED_URL.to_string()),
        })
    }
}

fn required_env(key: &str) -> Result<String, EarthPulseError> {
    optional_env(key)
        .ok_or_else(|| EarthPulseError::Config(format!("{key} environment variable is required")))
}

/// Unset and blank values are both treated as absent.
fn optional_env(key: &str) -> Option<String> {
    env::var(key).ok().filter(|v| !v.trim().is_empty())
}

fn parsed_env<T: std::str::FromStr>(key: &str, default: T) -> Result<T, EarthPulseError> {
    match optional_env(key) {
        Some(raw) => raw
            .trim()
            .parse()
            .map_err(|_| EarthPulseError::Config(format!("{key} must be a number, got '{raw}'"))),
        None => Ok(default),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parsed_env_falls_back_to_default() {
        let port: u16 = parsed_env("EARTHPULSE_TEST_UNSET_PORT", 8000).unwrap();
        assert_eq!(port, 8000);
    }

    #[test]
    fn required_env_reports_missing_key() {
        let err = required_env("EARTHPULSE_TEST_UNSET_SECRET").unwrap_err();
        assert!(err.to_string().contains("EARTHPULSE_TEST_UNSET_SECRET"));
    }
}
