//! Capability facade over the automation driver
//!
//! Every screen holds a `Ui` clone. The facade only keeps a weak reference to
//! the page: once the execution context releases the page, every call fails
//! with `HarnessError::PageReleased`.

use std::fmt;
use std::future::Future;
use std::sync::{Arc, Weak};
use std::time::Duration;

use storefront_driver::{DriverError, LoadState, Locator, Page};
use tracing::debug;

use crate::error::{HarnessError, HarnessResult};

/// Visibility wait applied before click, fill and read
pub const ACTION_TIMEOUT: Duration = Duration::from_millis(10_000);

/// Default bound for `is_visible` probes
pub const DEFAULT_PROBE_TIMEOUT: Duration = Duration::from_millis(5_000);

#[derive(Clone)]
pub struct Ui {
    page: Weak<dyn Page>,
    action_timeout: Duration,
    navigation_timeout: Duration,
}

impl fmt::Debug for Ui {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Ui")
            .field("attached", &(self.page.strong_count() > 0))
            .field("action_timeout", &self.action_timeout)
            .field("navigation_timeout", &self.navigation_timeout)
            .finish()
    }
}

/// Run `op` under `limit`, whichever of the driver or the clock gives up first
async fn bounded<T>(
    limit: Duration,
    op: impl Future<Output = Result<T, DriverError>>,
) -> Result<T, DriverError> {
    match tokio::time::timeout(limit, op).await {
        Ok(result) => result,
        Err(_) => Err(DriverError::Timeout(format!("exceeded {}ms", limit.as_millis()))),
    }
}

impl Ui {
    pub fn new(page: &Arc<dyn Page>, navigation_timeout: Duration) -> Self {
        Self {
            page: Arc::downgrade(page),
            action_timeout: ACTION_TIMEOUT,
            navigation_timeout,
        }
    }

    pub fn with_action_timeout(mut self, timeout: Duration) -> Self {
        self.action_timeout = timeout;
        self
    }

    pub fn action_timeout(&self) -> Duration {
        self.action_timeout
    }

    fn page(&self) -> HarnessResult<Arc<dyn Page>> {
        self.page.upgrade().ok_or(HarnessError::PageReleased)
    }

    /// Load `path` (relative to the session base URL) and wait for DOMContentLoaded
    pub async fn navigate(&self, path: &str) -> HarnessResult<()> {
        let page = self.page()?;
        debug!("navigate {}", path);
        bounded(
            self.navigation_timeout,
            page.goto(path, LoadState::DomContentLoaded, self.navigation_timeout),
        )
        .await
        .map_err(|e| HarnessError::Navigation {
            target: path.to_string(),
            reason: e.to_string(),
        })
    }

    async fn wait_interactable(&self, page: &dyn Page, locator: &Locator) -> HarnessResult<()> {
        match bounded(self.action_timeout, page.wait_for_visible(locator, self.action_timeout)).await {
            Ok(()) => Ok(()),
            Err(e) if e.is_timeout() => Err(HarnessError::ElementNotInteractable {
                selector: locator.to_string(),
                timeout: self.action_timeout,
            }),
            Err(e) => Err(e.into()),
        }
    }

    pub async fn click(&self, locator: &Locator) -> HarnessResult<()> {
        let page = self.page()?;
        self.wait_interactable(page.as_ref(), locator).await?;
        debug!("click {}", locator);
        page.click(locator).await?;
        Ok(())
    }

    pub async fn fill(&self, locator: &Locator, value: &str) -> HarnessResult<()> {
        let page = self.page()?;
        self.wait_interactable(page.as_ref(), locator).await?;
        debug!("fill {}", locator);
        page.fill(locator, value).await?;
        Ok(())
    }

    /// Text of a visible element; empty when the element has no text
    pub async fn read_text(&self, locator: &Locator) -> HarnessResult<String> {
        let page = self.page()?;
        self.wait_interactable(page.as_ref(), locator).await?;
        Ok(page.text_content(locator).await?.unwrap_or_default())
    }

    /// Whether `locator` becomes visible within `timeout`. Never fails.
    pub async fn is_visible(&self, locator: &Locator, timeout: Duration) -> bool {
        let Ok(page) = self.page() else {
            return false;
        };
        match bounded(timeout, page.wait_for_visible(locator, timeout)).await {
            Ok(()) => true,
            Err(e) => {
                debug!("{} not visible: {}", locator, e);
                false
            }
        }
    }

    /// Number of elements currently matching `locator`, without waiting
    pub async fn count(&self, locator: &Locator) -> HarnessResult<usize> {
        Ok(self.page()?.count(locator).await?)
    }

    pub async fn current_url(&self) -> HarnessResult<String> {
        Ok(self.page()?.url().await?)
    }

    pub async fn title(&self) -> HarnessResult<String> {
        Ok(self.page()?.title().await?)
    }

    /// Wait until the page URL matches a glob such as `**/inventory.html`
    pub async fn wait_for_url(&self, pattern: &str, timeout: Duration) -> HarnessResult<()> {
        let page = self.page()?;
        bounded(timeout, page.wait_for_url(pattern, timeout))
            .await
            .map_err(|e| HarnessError::Navigation {
                target: pattern.to_string(),
                reason: e.to_string(),
            })
    }

    /// Full-page PNG capture
    pub async fn snapshot(&self) -> HarnessResult<Vec<u8>> {
        Ok(self.page()?.screenshot(true).await?)
    }
}
