use thiserror::Error;

pub type Result<T> = std::result::Result<T, SatelliteError>;

#[derive(Debug, Error)]
pub enum SatelliteError {
    #[error("Network error: {0}")]
    Network(String),

    #[error("Engine error (status {status}): {message}")]
    Api { status: u16, message: String },

    #[error("Malformed engine response: {0}")]
    Decode(String),

    #[error("Satellite engine not configured")]
    NotConfigured,
}

impl From<reqwest::Error> for SatelliteError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            SatelliteError::Decode(err.to_string())
        } else {
            SatelliteError::Network(err.to_string())
        }
    }
}
