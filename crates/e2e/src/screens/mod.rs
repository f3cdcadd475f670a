//! Screen objects for the SauceDemo storefront
//!
//! Each screen wraps one view and exposes operations named for what a shopper
//! does there. Locators are private to their screen; screens never call each
//! other, cross-screen flows belong to the step bindings.

mod cart;
mod checkout;
mod inventory;
mod login;

pub use cart::CartScreen;
pub use checkout::{CheckoutCompleteScreen, CheckoutInfoScreen, CheckoutOverviewScreen};
pub use inventory::InventoryScreen;
pub use login::LoginScreen;

use crate::ui::Ui;

/// Every screen bound to one page
#[derive(Debug, Clone)]
pub struct Screens {
    pub login: LoginScreen,
    pub inventory: InventoryScreen,
    pub cart: CartScreen,
    pub checkout_info: CheckoutInfoScreen,
    pub checkout_overview: CheckoutOverviewScreen,
    pub checkout_complete: CheckoutCompleteScreen,
}

impl Screens {
    pub fn bind(ui: &Ui) -> Self {
        Self {
            login: LoginScreen::new(ui.clone()),
            inventory: InventoryScreen::new(ui.clone()),
            cart: CartScreen::new(ui.clone()),
            checkout_info: CheckoutInfoScreen::new(ui.clone()),
            checkout_overview: CheckoutOverviewScreen::new(ui.clone()),
            checkout_complete: CheckoutCompleteScreen::new(ui.clone()),
        }
    }

    pub fn names() -> &'static [&'static str] {
        &[
            "login",
            "inventory",
            "cart",
            "checkout_info",
            "checkout_overview",
            "checkout_complete",
        ]
    }
}
