//! The three checkout steps: customer information, overview, confirmation

use storefront_driver::Locator;
use tracing::debug;

use crate::error::HarnessResult;
use crate::ui::{Ui, DEFAULT_PROBE_TIMEOUT};

mod info_form {
    use super::Locator;

    pub const FIRST_NAME: Locator = Locator::css("[data-test=\"firstName\"]");
    pub const LAST_NAME: Locator = Locator::css("[data-test=\"lastName\"]");
    pub const POSTAL_CODE: Locator = Locator::css("[data-test=\"postalCode\"]");
    pub const CONTINUE: Locator = Locator::css("[data-test=\"continue\"]");
    pub const CANCEL: Locator = Locator::css("[data-test=\"cancel\"]");
    pub const ERROR: Locator = Locator::css("[data-test=\"error\"]");
}

mod overview {
    use super::Locator;

    pub const TITLE: Locator = Locator::css(".title");
    pub const ITEMS: Locator = Locator::css(".cart_item");
    pub const SUBTOTAL: Locator = Locator::css(".summary_subtotal_label");
    pub const TAX: Locator = Locator::css(".summary_tax_label");
    pub const TOTAL: Locator = Locator::css(".summary_total_label");
    pub const FINISH: Locator = Locator::css("[data-test=\"finish\"]");
    pub const CANCEL: Locator = Locator::css("[data-test=\"cancel\"]");
}

mod complete {
    use super::Locator;

    pub const HEADER: Locator = Locator::css(".complete-header");
    pub const TEXT: Locator = Locator::css(".complete-text");
    pub const BACK_HOME: Locator = Locator::css("[data-test=\"back-to-products\"]");
}

/// Step one: customer information form
#[derive(Debug, Clone)]
pub struct CheckoutInfoScreen {
    ui: Ui,
}

impl CheckoutInfoScreen {
    pub fn new(ui: Ui) -> Self {
        Self { ui }
    }

    /// Fill the form; empty values leave their field untouched
    pub async fn fill_form(&self, first_name: &str, last_name: &str, postal_code: &str) -> HarnessResult<()> {
        for (field, value) in [
            (&info_form::FIRST_NAME, first_name),
            (&info_form::LAST_NAME, last_name),
            (&info_form::POSTAL_CODE, postal_code),
        ] {
            if value.is_empty() {
                debug!("Leaving {} empty", field);
                continue;
            }
            self.ui.fill(field, value).await?;
        }
        Ok(())
    }

    pub async fn continue_to_overview(&self) -> HarnessResult<()> {
        self.ui.click(&info_form::CONTINUE).await
    }

    pub async fn cancel(&self) -> HarnessResult<()> {
        self.ui.click(&info_form::CANCEL).await
    }

    pub async fn error_message(&self) -> HarnessResult<String> {
        self.ui.read_text(&info_form::ERROR).await
    }

    pub async fn is_error_displayed(&self) -> bool {
        self.ui.is_visible(&info_form::ERROR, DEFAULT_PROBE_TIMEOUT).await
    }

    pub async fn is_displayed(&self) -> bool {
        self.ui.is_visible(&info_form::FIRST_NAME, DEFAULT_PROBE_TIMEOUT).await
    }
}

/// Step two: order summary
#[derive(Debug, Clone)]
pub struct CheckoutOverviewScreen {
    ui: Ui,
}

impl CheckoutOverviewScreen {
    pub fn new(ui: Ui) -> Self {
        Self { ui }
    }

    pub async fn is_displayed(&self) -> bool {
        self.ui.is_visible(&overview::TITLE, DEFAULT_PROBE_TIMEOUT).await
    }

    pub async fn item_count(&self) -> HarnessResult<usize> {
        self.ui.count(&overview::ITEMS).await
    }

    pub async fn subtotal(&self) -> HarnessResult<String> {
        self.ui.read_text(&overview::SUBTOTAL).await
    }

    pub async fn tax(&self) -> HarnessResult<String> {
        self.ui.read_text(&overview::TAX).await
    }

    pub async fn total(&self) -> HarnessResult<String> {
        self.ui.read_text(&overview::TOTAL).await
    }

    pub async fn finish(&self) -> HarnessResult<()> {
        self.ui.click(&overview::FINISH).await
    }

    pub async fn cancel(&self) -> HarnessResult<()> {
        self.ui.click(&overview::CANCEL).await
    }
}

/// Order confirmation
#[derive(Debug, Clone)]
pub struct CheckoutCompleteScreen {
    ui: Ui,
}

impl CheckoutCompleteScreen {
    pub fn new(ui: Ui) -> Self {
        Self { ui }
    }

    pub async fn is_displayed(&self) -> bool {
        self.ui.is_visible(&complete::HEADER, DEFAULT_PROBE_TIMEOUT).await
    }

    pub async fn confirmation_header(&self) -> HarnessResult<String> {
        self.ui.read_text(&complete::HEADER).await
    }

    pub async fn confirmation_text(&self) -> HarnessResult<String> {
        self.ui.read_text(&complete::TEXT).await
    }

    pub async fn back_home(&self) -> HarnessResult<()> {
        self.ui.click(&complete::BACK_HOME).await
    }
}
