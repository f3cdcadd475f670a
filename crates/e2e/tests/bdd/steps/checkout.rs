use cucumber::{given, then, when};
use storefront_e2e::HarnessResult;

use super::ensure;
use crate::world::{ShopWorld, PAGE_TRANSITION};

#[given(expr = "I am logged in as {string} with password {string}")]
async fn logged_in(world: &mut ShopWorld, username: String, password: String) -> HarnessResult<()> {
    let login = &world.screens()?.login;
    login.open().await?;
    login.login(&username, &password).await?;
    world.ui()?.wait_for_url("**/inventory.html", PAGE_TRANSITION).await
}

#[when("I add the first product to the cart")]
async fn add_first_product(world: &mut ShopWorld) -> HarnessResult<()> {
    world.screens()?.inventory.add_product_to_cart(0).await
}

#[when(expr = "I add {int} products to the cart")]
async fn add_products(world: &mut ShopWorld, count: usize) -> HarnessResult<()> {
    world.screens()?.inventory.add_products_to_cart(count).await?;
    Ok(())
}

#[then(expr = "the cart badge should show {int}")]
async fn cart_badge(world: &mut ShopWorld, expected: usize) -> HarnessResult<()> {
    let count = world.screens()?.inventory.cart_badge_count().await?;
    ensure(count == expected, || format!("cart badge shows {}, expected {}", count, expected))
}

#[when("I go to the cart")]
async fn go_to_cart(world: &mut ShopWorld) -> HarnessResult<()> {
    world.screens()?.inventory.open_cart().await?;
    world.ui()?.wait_for_url("**/cart.html", PAGE_TRANSITION).await
}

#[then(regex = r"^I should see (\d+) items? in the cart$")]
async fn cart_items(world: &mut ShopWorld, expected: usize) -> HarnessResult<()> {
    let count = world.screens()?.cart.item_count().await?;
    ensure(count == expected, || format!("cart holds {} items, expected {}", count, expected))
}

#[when("I proceed to checkout")]
async fn proceed_to_checkout(world: &mut ShopWorld) -> HarnessResult<()> {
    world.screens()?.cart.proceed_to_checkout().await?;
    world.ui()?.wait_for_url("**/checkout-step-one.html", PAGE_TRANSITION).await
}

#[when(expr = "I fill the form with first name {string}, last name {string} and postal code {string}")]
async fn fill_form(world: &mut ShopWorld, first: String, last: String, postal: String) -> HarnessResult<()> {
    world.screens()?.checkout_info.fill_form(&first, &last, &postal).await
}

#[when("I continue to the order overview")]
async fn continue_to_overview(world: &mut ShopWorld) -> HarnessResult<()> {
    world.screens()?.checkout_info.continue_to_overview().await
}

#[then("I should see the order overview")]
async fn overview_visible(world: &mut ShopWorld) -> HarnessResult<()> {
    world.ui()?.wait_for_url("**/checkout-step-two.html", PAGE_TRANSITION).await?;
    let shown = world.screens()?.checkout_overview.is_displayed().await;
    ensure(shown, || "order overview is not displayed".to_string())
}

#[then(expr = "I should see the order overview with {int} items")]
async fn overview_items(world: &mut ShopWorld, expected: usize) -> HarnessResult<()> {
    world.ui()?.wait_for_url("**/checkout-step-two.html", PAGE_TRANSITION).await?;
    let count = world.screens()?.checkout_overview.item_count().await?;
    ensure(count == expected, || format!("overview lists {} items, expected {}", count, expected))
}

#[then("the overview should show subtotal, tax and total")]
async fn overview_totals(world: &mut ShopWorld) -> HarnessResult<()> {
    world.ui()?.wait_for_url("**/checkout-step-two.html", PAGE_TRANSITION).await?;
    let overview = &world.screens()?.checkout_overview;

    let subtotal = overview.subtotal().await?;
    ensure(subtotal.contains("Item total:"), || format!("unexpected subtotal {:?}", subtotal))?;
    let tax = overview.tax().await?;
    ensure(tax.contains("Tax:"), || format!("unexpected tax {:?}", tax))?;
    let total = overview.total().await?;
    ensure(total.contains("Total:"), || format!("unexpected total {:?}", total))
}

#[when("I finish the purchase")]
async fn finish_purchase(world: &mut ShopWorld) -> HarnessResult<()> {
    world.screens()?.checkout_overview.finish().await?;
    world.ui()?.wait_for_url("**/checkout-complete.html", PAGE_TRANSITION).await
}

#[then(expr = "I should see the confirmation message {string}")]
async fn confirmation(world: &mut ShopWorld, expected: String) -> HarnessResult<()> {
    let complete = &world.screens()?.checkout_complete;
    ensure(complete.is_displayed().await, || "confirmation is not displayed".to_string())?;
    let header = complete.confirmation_header().await?;
    ensure(header.contains(&expected), || {
        format!("confirmation {:?} does not contain {:?}", header, expected)
    })
}

#[then(expr = "I should see the checkout error {string}")]
async fn checkout_error(world: &mut ShopWorld, expected: String) -> HarnessResult<()> {
    let info = &world.screens()?.checkout_info;
    ensure(info.is_error_displayed().await, || "no checkout error shown".to_string())?;
    let message = info.error_message().await?;
    ensure(message.contains(&expected), || {
        format!("error {:?} does not contain {:?}", message, expected)
    })
}
