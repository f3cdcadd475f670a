use storefront_driver::Locator;

use crate::error::HarnessResult;
use crate::ui::{Ui, DEFAULT_PROBE_TIMEOUT};

const TITLE: Locator = Locator::css(".title");
const ITEMS: Locator = Locator::css(".cart_item");
const CHECKOUT: Locator = Locator::css("[data-test=\"checkout\"]");
const CONTINUE_SHOPPING: Locator = Locator::css("[data-test=\"continue-shopping\"]");

#[derive(Debug, Clone)]
pub struct CartScreen {
    ui: Ui,
}

impl CartScreen {
    pub fn new(ui: Ui) -> Self {
        Self { ui }
    }

    pub async fn is_displayed(&self) -> bool {
        self.ui.is_visible(&TITLE, DEFAULT_PROBE_TIMEOUT).await
    }

    pub async fn title(&self) -> HarnessResult<String> {
        self.ui.read_text(&TITLE).await
    }

    pub async fn item_count(&self) -> HarnessResult<usize> {
        self.ui.count(&ITEMS).await
    }

    pub async fn item_name(&self, index: usize) -> HarnessResult<String> {
        self.ui
            .read_text(&ITEMS.nth(index).locator(".inventory_item_name"))
            .await
    }

    pub async fn item_price(&self, index: usize) -> HarnessResult<String> {
        self.ui
            .read_text(&ITEMS.nth(index).locator(".inventory_item_price"))
            .await
    }

    pub async fn remove_item(&self, index: usize) -> HarnessResult<()> {
        self.ui.click(&ITEMS.nth(index).locator("button")).await
    }

    pub async fn proceed_to_checkout(&self) -> HarnessResult<()> {
        self.ui.click(&CHECKOUT).await
    }

    pub async fn continue_shopping(&self) -> HarnessResult<()> {
        self.ui.click(&CONTINUE_SHOPPING).await
    }
}
