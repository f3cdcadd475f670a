use storefront_driver::Locator;
use tracing::info;

use crate::error::HarnessResult;
use crate::ui::{Ui, DEFAULT_PROBE_TIMEOUT};

const USERNAME: Locator = Locator::css("[data-test=\"username\"]");
const PASSWORD: Locator = Locator::css("[data-test=\"password\"]");
const LOGIN_BUTTON: Locator = Locator::css("[data-test=\"login-button\"]");
const ERROR: Locator = Locator::css("[data-test=\"error\"]");

/// The sign-in form at the storefront root
#[derive(Debug, Clone)]
pub struct LoginScreen {
    ui: Ui,
}

impl LoginScreen {
    pub fn new(ui: Ui) -> Self {
        Self { ui }
    }

    pub async fn open(&self) -> HarnessResult<()> {
        self.ui.navigate("/").await
    }

    pub async fn enter_username(&self, username: &str) -> HarnessResult<()> {
        self.ui.fill(&USERNAME, username).await
    }

    pub async fn enter_password(&self, password: &str) -> HarnessResult<()> {
        self.ui.fill(&PASSWORD, password).await
    }

    pub async fn submit(&self) -> HarnessResult<()> {
        self.ui.click(&LOGIN_BUTTON).await
    }

    pub async fn login(&self, username: &str, password: &str) -> HarnessResult<()> {
        info!("Logging in as {:?}", username);
        self.enter_username(username).await?;
        self.enter_password(password).await?;
        self.submit().await
    }

    pub async fn error_message(&self) -> HarnessResult<String> {
        self.ui.read_text(&ERROR).await
    }

    pub async fn is_error_displayed(&self) -> bool {
        self.ui.is_visible(&ERROR, DEFAULT_PROBE_TIMEOUT).await
    }

    pub async fn is_displayed(&self) -> bool {
        self.ui.is_visible(&LOGIN_BUTTON, DEFAULT_PROBE_TIMEOUT).await
    }
}
