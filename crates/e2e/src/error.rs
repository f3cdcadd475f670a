//! Error types for the storefront harness

use std::time::Duration;

use storefront_driver::DriverError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum HarnessError {
    #[error("Navigation to {target} failed: {reason}")]
    Navigation { target: String, reason: String },

    #[error("Element {selector} not interactable: not visible within {}ms", .timeout.as_millis())]
    ElementNotInteractable { selector: String, timeout: Duration },

    #[error("Assertion failed: {0}")]
    AssertionFailure(String),

    #[error("Page handle already released")]
    PageReleased,

    #[error("Execution context is not provisioned")]
    NotProvisioned,

    #[error("Execution context is already provisioned")]
    AlreadyProvisioned,

    #[error("Teardown incomplete: {}", .0.join("; "))]
    Teardown(Vec<String>),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Driver error: {0}")]
    Driver(#[from] DriverError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("URL error: {0}")]
    Url(#[from] url::ParseError),
}

impl HarnessError {
    pub fn assertion(message: impl Into<String>) -> Self {
        HarnessError::AssertionFailure(message.into())
    }
}

pub type HarnessResult<T> = Result<T, HarnessError>;
