use thiserror::Error;

/// Errors raised while decoding the search stream.
#[derive(Debug, Error)]
pub enum ProtocolError {
    #[error("malformed event payload: {0}")]
    Decode(#[from] serde_json::Error),
}
