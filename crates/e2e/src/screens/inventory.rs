use std::time::Duration;

use storefront_driver::Locator;
use tracing::{debug, info};

use crate::error::HarnessResult;
use crate::ui::{Ui, DEFAULT_PROBE_TIMEOUT};

const TITLE: Locator = Locator::css(".title");
const ITEMS: Locator = Locator::css(".inventory_item");
const CART_BADGE: Locator = Locator::css(".shopping_cart_badge");
const CART_LINK: Locator = Locator::css(".shopping_cart_link");
const MENU_BUTTON: Locator = Locator::css("#react-burger-menu-btn");
const LOGOUT_LINK: Locator = Locator::css("#logout_sidebar_link");

/// The badge is absent for an empty cart, so probe it briefly
const BADGE_PROBE_TIMEOUT: Duration = Duration::from_millis(2_000);

/// Product listing shown after sign-in
#[derive(Debug, Clone)]
pub struct InventoryScreen {
    ui: Ui,
}

impl InventoryScreen {
    pub fn new(ui: Ui) -> Self {
        Self { ui }
    }

    pub async fn title(&self) -> HarnessResult<String> {
        self.ui.read_text(&TITLE).await
    }

    pub async fn is_displayed(&self) -> bool {
        self.ui.is_visible(&TITLE, DEFAULT_PROBE_TIMEOUT).await
    }

    pub async fn product_count(&self) -> HarnessResult<usize> {
        self.ui.count(&ITEMS).await
    }

    pub async fn add_product_to_cart(&self, index: usize) -> HarnessResult<()> {
        debug!("Adding product #{} to cart", index);
        self.ui.click(&ITEMS.nth(index).locator("button")).await
    }

    /// Add the first `count` products, or every product if fewer are listed
    pub async fn add_products_to_cart(&self, count: usize) -> HarnessResult<usize> {
        let available = self.product_count().await?;
        let to_add = count.min(available);
        if to_add < count {
            info!("Only {} products listed, adding {} of {}", available, to_add, count);
        }
        for index in 0..to_add {
            self.add_product_to_cart(index).await?;
        }
        Ok(to_add)
    }

    /// Number shown on the cart badge; 0 when there is no badge
    pub async fn cart_badge_count(&self) -> HarnessResult<usize> {
        if !self.ui.is_visible(&CART_BADGE, BADGE_PROBE_TIMEOUT).await {
            return Ok(0);
        }
        let text = self.ui.read_text(&CART_BADGE).await?;
        Ok(text.trim().parse().unwrap_or(0))
    }

    pub async fn open_cart(&self) -> HarnessResult<()> {
        self.ui.click(&CART_LINK).await
    }

    pub async fn product_name(&self, index: usize) -> HarnessResult<String> {
        self.ui
            .read_text(&ITEMS.nth(index).locator(".inventory_item_name"))
            .await
    }

    pub async fn product_price(&self, index: usize) -> HarnessResult<String> {
        self.ui
            .read_text(&ITEMS.nth(index).locator(".inventory_item_price"))
            .await
    }

    pub async fn logout(&self) -> HarnessResult<()> {
        self.ui.click(&MENU_BUTTON).await?;
        self.ui.click(&LOGOUT_LINK).await
    }
}
