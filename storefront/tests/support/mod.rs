#![allow(dead_code)]

use browser::SnapshotBrowser;
use common::fixtures::Address;

macro_rules! fixture_page {
    ($name:literal) => {
        include_str!(concat!(
            env!("CARGO_MANIFEST_DIR"),
            "/../fixtures/pages/",
            $name
        ))
    };
}

pub const HOME: &str = fixture_page!("home.html");
pub const BOOKS: &str = fixture_page!("books.html");
pub const PRODUCT: &str = fixture_page!("product.html");
pub const CART: &str = fixture_page!("cart.html");
pub const CART_PARTIAL: &str = fixture_page!("cart_partial.html");
pub const CART_MISMATCH: &str = fixture_page!("cart_mismatch.html");
pub const CART_EMPTY: &str = fixture_page!("cart_empty.html");
pub const CHECKOUT: &str = fixture_page!("checkout.html");
pub const ORDER_COMPLETED: &str = fixture_page!("order_completed.html");
pub const LOGIN: &str = fixture_page!("login.html");
pub const REGISTER: &str = fixture_page!("register.html");
pub const REGISTER_RESULT: &str = fixture_page!("register_result.html");

/// The storefront as a set of saved pages, with `cart` served at `/cart`
pub fn storefront_with_cart(cart: &str) -> SnapshotBrowser {
    SnapshotBrowser::new()
        .with_page("/", HOME)
        .with_page("/books", BOOKS)
        .with_page("/computing-and-internet", PRODUCT)
        .with_page("/cart", cart)
        .with_page("/onepagecheckout", CHECKOUT)
        .with_page("/checkout/completed/2109458", ORDER_COMPLETED)
        .with_page("/login", LOGIN)
        .with_page("/register", REGISTER)
        .with_page("/registerresult/1", REGISTER_RESULT)
}

pub fn storefront() -> SnapshotBrowser {
    storefront_with_cart(CART)
}

pub fn billing_address() -> Address {
    Address {
        first_name: "John".into(),
        last_name: "Smith".into(),
        email: Some("john.smith@test.com".into()),
        country: "United States".into(),
        state: Some("New York".into()),
        city: "New York".into(),
        address1: "123 Main St".into(),
        zip: "10001".into(),
        phone: "5551234567".into(),
    }
}
