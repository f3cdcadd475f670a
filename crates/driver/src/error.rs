//! Error types for driver operations

use thiserror::Error;

#[derive(Error, Debug)]
pub enum DriverError {
    #[error("Timed out: {0}")]
    Timeout(String),

    #[error("Handle closed: {0}")]
    Closed(String),

    #[error("No element matches: {0}")]
    NotFound(String),

    #[error("{name}: {message}")]
    Remote { name: String, message: String },

    #[error("Driver unavailable: {0}")]
    Unavailable(String),

    #[error("Protocol error: {0}")]
    Protocol(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl DriverError {
    pub fn is_timeout(&self) -> bool {
        matches!(self, DriverError::Timeout(_))
    }
}

pub type DriverResult<T> = Result<T, DriverError>;
