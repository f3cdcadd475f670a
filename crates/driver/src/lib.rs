//! Storefront browser driver capability
//!
//! This crate defines the opaque automation capability the harness drives and
//! ships two implementations of it:
//! - `playwright`: a Node.js bridge process controlled over a line-delimited
//!   JSON protocol
//! - `memory` (behind the `memory` feature): an in-process scripted page
//!   model for exercising the harness without a browser
//!
//! # Handle hierarchy
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │  Launcher                                                   │
//! │    └── launch(LaunchOptions) -> Browser       (owns driver) │
//! │          └── new_session(SessionOptions) -> Session         │
//! │                └── new_page() -> Page                       │
//! ├─────────────────────────────────────────────────────────────┤
//! │  Release order is always Page -> Session -> Browser         │
//! └─────────────────────────────────────────────────────────────┘
//! ```

pub mod error;
pub mod glob;
pub mod locator;
#[cfg(any(test, feature = "memory"))]
pub mod memory;
pub mod playwright;

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

pub use error::{DriverError, DriverResult};
pub use locator::Locator;

/// Browser engine to launch
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BrowserKind {
    #[default]
    Chromium,
    Firefox,
    Webkit,
}

impl BrowserKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            BrowserKind::Chromium => "chromium",
            BrowserKind::Firefox => "firefox",
            BrowserKind::Webkit => "webkit",
        }
    }
}

impl std::str::FromStr for BrowserKind {
    type Err = DriverError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "chromium" | "chrome" => Ok(BrowserKind::Chromium),
            "firefox" => Ok(BrowserKind::Firefox),
            "webkit" => Ok(BrowserKind::Webkit),
            other => Err(DriverError::Unavailable(format!("unknown browser: {}", other))),
        }
    }
}

impl std::fmt::Display for BrowserKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Viewport {
    pub width: u32,
    pub height: u32,
}

impl Default for Viewport {
    fn default() -> Self {
        Self { width: 1280, height: 720 }
    }
}

/// Document readiness a navigation waits for
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum LoadState {
    #[default]
    #[serde(rename = "domcontentloaded")]
    DomContentLoaded,
    #[serde(rename = "load")]
    Load,
    #[serde(rename = "networkidle")]
    NetworkIdle,
}

/// Options for launching the automation driver
#[derive(Debug, Clone, Default)]
pub struct LaunchOptions {
    pub browser: BrowserKind,
    pub headless: bool,
    /// Artificial delay applied to every driver action
    pub slow_mo: Duration,
}

/// Options for an isolated browsing session
#[derive(Debug, Clone)]
pub struct SessionOptions {
    pub viewport: Viewport,
    /// Relative navigations resolve against this address
    pub base_url: String,
}

/// Starts automation drivers
#[async_trait]
pub trait Launcher: Send + Sync {
    async fn launch(&self, options: &LaunchOptions) -> DriverResult<Box<dyn Browser>>;
}

/// A running automation driver
#[async_trait]
pub trait Browser: Send + Sync {
    async fn new_session(&self, options: &SessionOptions) -> DriverResult<Box<dyn Session>>;

    async fn close(&self) -> DriverResult<()>;
}

/// An isolated browsing session (cookies, storage, viewport)
#[async_trait]
pub trait Session: Send + Sync {
    async fn new_page(&self) -> DriverResult<Arc<dyn Page>>;

    async fn close(&self) -> DriverResult<()>;
}

/// A single page/view inside a session
///
/// Locators are resolved on every call; a page never hands out element
/// handles.
#[async_trait]
pub trait Page: Send + Sync {
    async fn goto(&self, url: &str, wait_until: LoadState, timeout: Duration) -> DriverResult<()>;

    /// Resolves once the locator matches a visible element, or fails with
    /// `DriverError::Timeout`.
    async fn wait_for_visible(&self, locator: &Locator, timeout: Duration) -> DriverResult<()>;

    async fn click(&self, locator: &Locator) -> DriverResult<()>;

    /// Clears the field, then types `value`
    async fn fill(&self, locator: &Locator, value: &str) -> DriverResult<()>;

    async fn text_content(&self, locator: &Locator) -> DriverResult<Option<String>>;

    async fn count(&self, locator: &Locator) -> DriverResult<usize>;

    async fn url(&self) -> DriverResult<String>;

    async fn title(&self) -> DriverResult<String>;

    async fn wait_for_url(&self, pattern: &str, timeout: Duration) -> DriverResult<()>;

    /// PNG-encoded capture of the page
    async fn screenshot(&self, full_page: bool) -> DriverResult<Vec<u8>>;

    async fn set_default_timeout(&self, timeout: Duration) -> DriverResult<()>;

    async fn close(&self) -> DriverResult<()>;
}
