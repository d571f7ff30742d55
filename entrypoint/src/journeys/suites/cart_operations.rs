use browser::Browser;
use common::utils::round_to_two_decimals;
use storefront::pages::FooterLink;
use utils::steps::{log_action, log_step};

use super::{
    add_open_product, add_product_to_cart, check_footer, check_layout, check_price, open_product,
    register_new_user,
};
use crate::{
    context::JourneyContext,
    errors::{JourneyError, check},
};

const HOMEPAGE_FOOTER_LINKS: [FooterLink; 6] = [
    FooterLink::Sitemap,
    FooterLink::ShippingReturns,
    FooterLink::PrivacyPolicy,
    FooterLink::ContactUs,
    FooterLink::Search,
    FooterLink::Cart,
];

const CART_FOOTER_LINKS: [FooterLink; 6] = [
    FooterLink::Sitemap,
    FooterLink::PrivacyPolicy,
    FooterLink::AboutUs,
    FooterLink::MyAccount,
    FooterLink::Orders,
    FooterLink::Cart,
];

/// TC007
pub(super) async fn empty_cart_message<B: Browser>(
    context: &JourneyContext<'_, B>,
) -> Result<(), JourneyError> {
    let cart = context.cart();
    cart.go_to_cart().await?;
    check_layout(cart.base(), "cart").await?;

    check!(cart.is_cart_empty().await?, "Empty cart message is shown");

    Ok(())
}

/// TC008
pub(super) async fn same_product_added_twice<B: Browser>(
    context: &JourneyContext<'_, B>,
) -> Result<(), JourneyError> {
    let Some(product) = context.data().test_products.simple_products.first() else {
        return Err(JourneyError::MissingTestData("at least one simple product"));
    };

    let product_page = context.product();
    open_product(&product_page, &product.url).await?;
    check_layout(product_page.base(), "product").await?;

    add_open_product(&product_page, 1).await?;
    add_open_product(&product_page, 2).await?;

    let cart = context.cart();
    cart.go_to_cart().await?;
    check_layout(cart.base(), "cart").await?;

    let items = cart.get_cart_items().await?;
    check!(
        items.len() == 1,
        "Both additions merged into one row (found {})",
        items.len()
    );
    check!(
        items[0].quantity == 3,
        "Merged quantity is 3 (found {})",
        items[0].quantity
    );
    check_price(
        "Merged item subtotal",
        items[0].subtotal,
        round_to_two_decimals(product.price * 3.0),
    )?;

    Ok(())
}

/// TC009
pub(super) async fn footer_on_homepage<B: Browser>(
    context: &JourneyContext<'_, B>,
) -> Result<(), JourneyError> {
    let home = context.home();

    log_action("Navigating to homepage", None);
    home.go_to_home_page().await?;
    log_step("Navigate to homepage");

    check_footer(home.base(), "home", &HOMEPAGE_FOOTER_LINKS).await
}

/// TC010
pub(super) async fn footer_on_cart_page<B: Browser>(
    context: &JourneyContext<'_, B>,
) -> Result<(), JourneyError> {
    register_new_user(context).await?;

    let Some(product) = context.data().test_products.multiple_products.first() else {
        return Err(JourneyError::MissingTestData("at least one product in multipleProducts"));
    };

    add_product_to_cart(context, &product.url, 1).await?;
    log_step("Add product to cart");

    let cart = context.cart();
    log_action("Navigating to cart page", None);
    cart.go_to_cart().await?;
    check!(!cart.is_cart_empty().await?, "Cart has items");
    log_step("Navigate to cart page and verify subtotal");

    check_footer(cart.base(), "cart", &CART_FOOTER_LINKS).await
}
