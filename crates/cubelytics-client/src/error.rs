use thiserror::Error;

/// Failures of the push channel carrying one search.
#[derive(Debug, Error)]
pub enum TransportError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("search endpoint returned status {0}")]
    Status(u16),

    #[error("invalid search URL: {0}")]
    InvalidUrl(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("stream ended before a terminal event")]
    Closed,
}

/// Reasons a search could not be started.
#[derive(Debug, Error)]
pub enum SearchError {
    #[error("search query is empty")]
    EmptyQuery,

    #[error("a search is already running")]
    Busy,
}
