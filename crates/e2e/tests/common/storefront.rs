//! A scripted SauceDemo on top of the in-memory driver
//!
//! Renders just enough of each view (selectors, texts, counts) for the screen
//! objects to work, and reacts to the clicks the real site reacts to.

use std::sync::Arc;
use std::time::Duration;

use parking_lot::Mutex;
use storefront_driver::memory::{Dom, Element, MemoryLauncher};

pub const BASE_URL: &str = "https://shop.test";

pub const PRODUCTS: [(&str, &str); 6] = [
    ("Sauce Labs Backpack", "$29.99"),
    ("Sauce Labs Bike Light", "$9.99"),
    ("Sauce Labs Bolt T-Shirt", "$15.99"),
    ("Sauce Labs Fleece Jacket", "$49.99"),
    ("Sauce Labs Onesie", "$7.99"),
    ("Test.allTheThings() T-Shirt (Red)", "$15.99"),
];

const USERNAME: &str = "[data-test=\"username\"]";
const PASSWORD: &str = "[data-test=\"password\"]";
const LOGIN_BUTTON: &str = "[data-test=\"login-button\"]";
const ERROR: &str = "[data-test=\"error\"]";
const FIRST_NAME: &str = "[data-test=\"firstName\"]";
const LAST_NAME: &str = "[data-test=\"lastName\"]";
const POSTAL_CODE: &str = "[data-test=\"postalCode\"]";

/// Product indices in the order they were added
type Cart = Arc<Mutex<Vec<usize>>>;

fn price_cents(index: usize) -> u64 {
    let price = PRODUCTS[index].1.trim_start_matches('$');
    let (dollars, cents) = price.split_once('.').unwrap_or((price, "0"));
    dollars.parse::<u64>().unwrap_or(0) * 100 + cents.parse::<u64>().unwrap_or(0)
}

fn money(cents: u64) -> String {
    format!("${}.{:02}", cents / 100, cents % 100)
}

fn navigate(dom: &mut Dom, path: &str) {
    dom.clear();
    dom.set_url(format!("{}{}", BASE_URL, path));
    dom.set_title("Swag Labs");
}

fn render_login(dom: &mut Dom) {
    navigate(dom, "/");
    dom.insert(USERNAME, Element::visible());
    dom.insert(PASSWORD, Element::visible());
    dom.insert(LOGIN_BUTTON, Element::visible());
}

fn render_header(dom: &mut Dom, cart: &[usize]) {
    dom.insert(".shopping_cart_link", Element::visible());
    dom.insert("#react-burger-menu-btn", Element::visible());
    dom.insert("#logout_sidebar_link", Element::appearing_after(Duration::from_millis(300)));
    if !cart.is_empty() {
        dom.insert(".shopping_cart_badge", Element::visible().with_text(cart.len().to_string()));
    }
}

fn render_inventory(dom: &mut Dom, cart: &[usize]) {
    navigate(dom, "/inventory.html");
    render_header(dom, cart);
    dom.insert(".title", Element::visible().with_text("Products"));
    dom.insert(".inventory_item", Element::visible().with_count(PRODUCTS.len()));
    for (i, (name, price)) in PRODUCTS.iter().enumerate() {
        let item = format!(".inventory_item >> nth={}", i);
        let label = if cart.contains(&i) { "Remove" } else { "Add to cart" };
        dom.insert(format!("{} >> button", item), Element::visible().with_text(label));
        dom.insert(format!("{} >> .inventory_item_name", item), Element::visible().with_text(*name));
        dom.insert(format!("{} >> .inventory_item_price", item), Element::visible().with_text(*price));
    }
}

fn render_line_items(dom: &mut Dom, cart: &[usize]) {
    if !cart.is_empty() {
        dom.insert(".cart_item", Element::visible().with_count(cart.len()));
    }
    for (position, &product) in cart.iter().enumerate() {
        let (name, price) = PRODUCTS[product];
        let item = format!(".cart_item >> nth={}", position);
        dom.insert(format!("{} >> .inventory_item_name", item), Element::visible().with_text(name));
        dom.insert(format!("{} >> .inventory_item_price", item), Element::visible().with_text(price));
        dom.insert(format!("{} >> button", item), Element::visible().with_text("Remove"));
    }
}

fn render_cart(dom: &mut Dom, cart: &[usize]) {
    navigate(dom, "/cart.html");
    render_header(dom, cart);
    dom.insert(".title", Element::visible().with_text("Your Cart"));
    render_line_items(dom, cart);
    dom.insert("[data-test=\"checkout\"]", Element::visible());
    dom.insert("[data-test=\"continue-shopping\"]", Element::visible());
}

fn render_checkout_info(dom: &mut Dom, cart: &[usize]) {
    navigate(dom, "/checkout-step-one.html");
    render_header(dom, cart);
    dom.insert(".title", Element::visible().with_text("Checkout: Your Information"));
    dom.insert(FIRST_NAME, Element::visible());
    dom.insert(LAST_NAME, Element::visible());
    dom.insert(POSTAL_CODE, Element::visible());
    dom.insert("[data-test=\"continue\"]", Element::visible());
    dom.insert("[data-test=\"cancel\"]", Element::visible());
}

fn render_overview(dom: &mut Dom, cart: &[usize]) {
    navigate(dom, "/checkout-step-two.html");
    render_header(dom, cart);
    dom.insert(".title", Element::visible().with_text("Checkout: Overview"));
    render_line_items(dom, cart);

    let subtotal: u64 = cart.iter().map(|&i| price_cents(i)).sum();
    let tax = (subtotal * 8 + 50) / 100;
    dom.insert(
        ".summary_subtotal_label",
        Element::visible().with_text(format!("Item total: {}", money(subtotal))),
    );
    dom.insert(".summary_tax_label", Element::visible().with_text(format!("Tax: {}", money(tax))));
    dom.insert(
        ".summary_total_label",
        Element::visible().with_text(format!("Total: {}", money(subtotal + tax))),
    );
    dom.insert("[data-test=\"finish\"]", Element::visible());
    dom.insert("[data-test=\"cancel\"]", Element::visible());
}

fn render_complete(dom: &mut Dom) {
    navigate(dom, "/checkout-complete.html");
    render_header(dom, &[]);
    dom.insert(".title", Element::visible().with_text("Checkout: Complete!"));
    dom.insert(".complete-header", Element::visible().with_text("Thank you for your order!"));
    dom.insert(
        ".complete-text",
        Element::visible().with_text(
            "Your order has been dispatched, and will arrive just as fast as the pony can get there!",
        ),
    );
    dom.insert("[data-test=\"back-to-products\"]", Element::visible());
}

fn show_error(dom: &mut Dom, message: &str) {
    dom.insert(ERROR, Element::visible().with_text(message));
}

fn login_error(username: &str, password: &str) -> Option<&'static str> {
    match (username, password) {
        ("", _) => Some("Epic sadface: Username is required"),
        (_, "") => Some("Epic sadface: Password is required"),
        ("locked_out_user", "secret_sauce") => Some("Epic sadface: Sorry, this user has been locked out."),
        ("standard_user", "secret_sauce") => None,
        _ => Some("Epic sadface: Username and password do not match any user in this service"),
    }
}

fn checkout_error(dom: &Dom) -> Option<&'static str> {
    let empty = |selector: &str| dom.value(selector).map_or(true, str::is_empty);
    if empty(FIRST_NAME) {
        Some("Error: First Name is required")
    } else if empty(LAST_NAME) {
        Some("Error: Last Name is required")
    } else if empty(POSTAL_CODE) {
        Some("Error: Postal Code is required")
    } else {
        None
    }
}

/// A launcher whose pages behave like the storefront
pub fn launcher() -> MemoryLauncher {
    let launcher = MemoryLauncher::new();
    let cart: Cart = Arc::new(Mutex::new(Vec::new()));

    launcher.on_goto("/", render_login);

    {
        let cart = Arc::clone(&cart);
        launcher.on_click(LOGIN_BUTTON, move |dom| {
            let username = dom.value(USERNAME).unwrap_or_default().to_string();
            let password = dom.value(PASSWORD).unwrap_or_default().to_string();
            match login_error(&username, &password) {
                Some(message) => show_error(dom, message),
                None => render_inventory(dom, &cart.lock()),
            }
        });
    }

    for index in 0..PRODUCTS.len() {
        let cart = Arc::clone(&cart);
        let cart_for_remove = Arc::clone(&cart);
        launcher.on_click(format!(".inventory_item >> nth={} >> button", index), move |dom| {
            let mut cart = cart.lock();
            match cart.iter().position(|&p| p == index) {
                Some(position) => {
                    cart.remove(position);
                }
                None => cart.push(index),
            }
            render_inventory(dom, &cart);
        });

        launcher.on_click(format!(".cart_item >> nth={} >> button", index), move |dom| {
            let mut cart = cart_for_remove.lock();
            if index < cart.len() {
                cart.remove(index);
            }
            render_cart(dom, &cart);
        });
    }

    {
        let cart = Arc::clone(&cart);
        launcher.on_click(".shopping_cart_link", move |dom| render_cart(dom, &cart.lock()));
    }
    {
        let cart = Arc::clone(&cart);
        launcher.on_click("[data-test=\"continue-shopping\"]", move |dom| {
            render_inventory(dom, &cart.lock())
        });
    }
    {
        let cart = Arc::clone(&cart);
        launcher.on_click("[data-test=\"checkout\"]", move |dom| {
            render_checkout_info(dom, &cart.lock())
        });
    }
    {
        let cart = Arc::clone(&cart);
        launcher.on_click("[data-test=\"continue\"]", move |dom| match checkout_error(dom) {
            Some(message) => show_error(dom, message),
            None => render_overview(dom, &cart.lock()),
        });
    }
    {
        let cart = Arc::clone(&cart);
        // Cancel on the overview leaves checkout; on the info form it goes back to the cart
        launcher.on_click("[data-test=\"cancel\"]", move |dom| {
            if dom.url().ends_with("/checkout-step-two.html") {
                render_inventory(dom, &cart.lock())
            } else {
                render_cart(dom, &cart.lock())
            }
        });
    }
    {
        let cart = Arc::clone(&cart);
        launcher.on_click("[data-test=\"finish\"]", move |dom| {
            cart.lock().clear();
            render_complete(dom);
        });
    }
    {
        let cart = Arc::clone(&cart);
        launcher.on_click("[data-test=\"back-to-products\"]", move |dom| {
            render_inventory(dom, &cart.lock())
        });
    }
    {
        let cart = Arc::clone(&cart);
        launcher.on_click("#logout_sidebar_link", move |dom| {
            cart.lock().clear();
            render_login(dom);
        });
    }

    launcher
}
