use thiserror::Error;

pub type Result<T> = std::result::Result<T, NewsError>;

#[derive(Debug, Error)]
pub enum NewsError {
    #[error("Network error: {0}")]
    Network(String),

    #[error("Upstream error (status {status}): {message}")]
    Api { status: u16, message: String },

    #[error("Feed parse error: {0}")]
    Feed(String),

    #[error("Malformed response: {0}")]
    Decode(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

impl From<reqwest::Error> for NewsError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            NewsError::Decode(err.to_string())
        } else {
            NewsError::Network(err.to_string())
        }
    }
}

impl From<feed_rs::parser::ParseFeedError> for NewsError {
    fn from(err: feed_rs::parser::ParseFeedError) -> Self {
        NewsError::Feed(err.to_string())
    }
}
