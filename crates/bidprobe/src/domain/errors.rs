//! Domain Errors

use thiserror::Error;

/// Errors raised by the record store read phase
#[derive(Debug, Error, PartialEq, Eq)]
pub enum StoreError {
    /// The store is still accepting records
    #[error("store not locked")]
    NotLocked,

    #[error("index {index} out of range for store of {len} records")]
    IndexOutOfRange { index: usize, len: usize },
}

/// Errors raised while sending a bid request
#[derive(Debug, Error)]
pub enum SendError {
    /// The request could not be encoded; nothing was sent
    #[error("Failed to encode bid request: {0}")]
    Encoding(#[from] serde_json::Error),

    #[error("Transport error: {0}")]
    Transport(String),

    #[error("Failed to read response body: {0}")]
    Body(String),
}

/// Failure writing to a report sink
#[derive(Debug, Error)]
#[error("Failed to write {target}: {source}")]
pub struct RenderError {
    pub target: &'static str,
    #[source]
    pub source: std::io::Error,
}

impl RenderError {
    pub fn new(target: &'static str, source: std::io::Error) -> Self {
        Self { target, source }
    }
}
