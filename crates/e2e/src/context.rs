//! Per-scenario execution context
//!
//! Owns the browser, session and page handles of one scenario and the screens
//! bound to that page. Handles are acquired in the order browser -> session ->
//! page and released in exactly the reverse order.

use std::fmt;
use std::sync::Arc;

use storefront_driver::{Browser, Launcher, Page, Session};
use tracing::{debug, info, warn};

use crate::config::BrowserProfile;
use crate::error::{HarnessError, HarnessResult};
use crate::screens::Screens;
use crate::ui::Ui;

pub struct ExecutionContext {
    launcher: Arc<dyn Launcher>,
    profile: BrowserProfile,
    browser: Option<Box<dyn Browser>>,
    session: Option<Box<dyn Session>>,
    page: Option<Arc<dyn Page>>,
    ui: Option<Ui>,
    screens: Option<Screens>,
}

impl fmt::Debug for ExecutionContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ExecutionContext")
            .field("profile", &self.profile)
            .field("browser", &self.browser.is_some())
            .field("session", &self.session.is_some())
            .field("page", &self.page.is_some())
            .finish()
    }
}

impl ExecutionContext {
    pub fn new(launcher: Arc<dyn Launcher>, profile: BrowserProfile) -> Self {
        Self {
            launcher,
            profile,
            browser: None,
            session: None,
            page: None,
            ui: None,
            screens: None,
        }
    }

    /// Launch the browser, open a session and a page, then bind every screen.
    ///
    /// Handles acquired before a failure are kept so `dispose` can release
    /// them.
    pub async fn provision(&mut self) -> HarnessResult<()> {
        if self.browser.is_some() || self.session.is_some() || self.page.is_some() {
            return Err(HarnessError::AlreadyProvisioned);
        }

        info!(
            "Provisioning {} (headless: {}, slow_mo: {:?}) for {}",
            self.profile.launch.browser,
            self.profile.launch.headless,
            self.profile.launch.slow_mo,
            self.profile.session.base_url
        );

        let browser = self.browser.insert(self.launcher.launch(&self.profile.launch).await?);
        let session = self.session.insert(browser.new_session(&self.profile.session).await?);
        let page = self.page.insert(session.new_page().await?);
        page.set_default_timeout(self.profile.default_timeout).await?;

        let ui = Ui::new(page, self.profile.default_timeout)
            .with_action_timeout(self.profile.action_timeout);
        self.screens = Some(Screens::bind(&ui));
        self.ui = Some(ui);

        debug!("Bound screens: {}", Screens::names().join(", "));
        Ok(())
    }

    /// Release page, session and browser in that order.
    ///
    /// Every stage is attempted even when an earlier one fails; the failures
    /// are reported together. Calling it again is a no-op.
    pub async fn dispose(&mut self) -> HarnessResult<()> {
        // Screens go first so none of them outlives the page
        self.screens = None;
        self.ui = None;

        let mut failures = Vec::new();

        if let Some(page) = self.page.take() {
            if let Err(e) = page.close().await {
                warn!("Failed to close page: {}", e);
                failures.push(format!("page: {}", e));
            }
        }

        if let Some(session) = self.session.take() {
            if let Err(e) = session.close().await {
                warn!("Failed to close session: {}", e);
                failures.push(format!("session: {}", e));
            }
        }

        if let Some(browser) = self.browser.take() {
            if let Err(e) = browser.close().await {
                warn!("Failed to close browser: {}", e);
                failures.push(format!("browser: {}", e));
            }
        }

        if failures.is_empty() {
            debug!("Execution context released");
            Ok(())
        } else {
            Err(HarnessError::Teardown(failures))
        }
    }

    pub fn screens(&self) -> HarnessResult<&Screens> {
        self.screens.as_ref().ok_or(HarnessError::NotProvisioned)
    }

    pub fn ui(&self) -> HarnessResult<&Ui> {
        self.ui.as_ref().ok_or(HarnessError::NotProvisioned)
    }

    pub fn has_page(&self) -> bool {
        self.page.is_some()
    }

    /// Full-page capture of the current page
    pub async fn snapshot(&self) -> HarnessResult<Vec<u8>> {
        let page = self.page.as_ref().ok_or(HarnessError::NotProvisioned)?;
        Ok(page.screenshot(true).await?)
    }

    pub fn profile(&self) -> &BrowserProfile {
        &self.profile
    }
}
