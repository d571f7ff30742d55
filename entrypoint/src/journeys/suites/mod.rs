mod cart_operations;
mod order_placement;

use browser::Browser;
use common::{
    cart::VerificationReport,
    utils::{DEFAULT_PRICE_TOLERANCE, compare_prices, generate_unique_email},
};
use metrics::put_metric;
use storefront::pages::{BasePage, CartPage, FooterLink, FooterSection, ProductPage};
use strum::IntoEnumIterator;
use tracing::{debug, info};
use utils::steps::{log_action, log_assertion, log_step};

use crate::{
    context::JourneyContext,
    errors::{JourneyError, check},
    journey::Journey,
};

pub async fn run<B: Browser>(
    journey: Journey,
    context: &JourneyContext<'_, B>,
) -> Result<(), JourneyError> {
    before_each(context).await?;

    match journey {
        Journey::Tc001 => order_placement::register_and_order_multiple_products(context).await,
        Journey::Tc002 => order_placement::verify_item_price_calculations(context).await,
        Journey::Tc003 => order_placement::update_quantity_recalculates(context).await,
        Journey::Tc004 => order_placement::remove_item_updates_total(context).await,
        Journey::Tc005 => order_placement::order_as_existing_user(context).await,
        Journey::Tc006 => order_placement::total_includes_shipping_and_tax(context).await,
        Journey::Tc007 => cart_operations::empty_cart_message(context).await,
        Journey::Tc008 => cart_operations::same_product_added_twice(context).await,
        Journey::Tc009 => cart_operations::footer_on_homepage(context).await,
        Journey::Tc010 => cart_operations::footer_on_cart_page(context).await,
    }
}

/// Every journey starts on the home page with the complete header in place
async fn before_each<B: Browser>(context: &JourneyContext<'_, B>) -> Result<(), JourneyError> {
    let home = context.home();
    home.go_to_home_page().await?;

    let header = home.base().verify_complete_header_ui().await?;
    check!(header.logo, "Header logo is visible");
    check!(header.search_box.all_visible(), "Search box is visible");
    check!(header.shopping_cart, "Shopping cart link is visible");
    check!(header.header_links, "Header links are visible");
    check!(
        header.all_header_elements_visible(),
        "All header elements are visible"
    );
    check!(
        home.base().verify_header_menu_exists().await?,
        "Header menu is visible"
    );

    Ok(())
}

/// Header and top menu on whatever page `base` is showing
async fn check_layout<B: Browser>(base: &BasePage<'_, B>, page: &str) -> Result<(), JourneyError> {
    let header = base.verify_complete_header_ui().await?;
    check!(
        header.all_header_elements_visible(),
        "Header is complete on the {page} page"
    );
    check!(
        base.verify_header_menu_exists().await?,
        "Header menu is visible on the {page} page"
    );

    Ok(())
}

async fn check_footer<B: Browser>(
    base: &BasePage<'_, B>,
    page: &str,
    links: &[FooterLink],
) -> Result<(), JourneyError> {
    log_action(&format!("Checking footer menu wrapper on the {page} page"), None);
    check!(
        base.verify_footer_menu_exists().await?,
        "Footer menu wrapper is visible on the {page} page"
    );
    log_step("Verify footer menu wrapper is visible");

    let sections = base.verify_footer_sections().await?;
    for section in FooterSection::iter() {
        check!(
            sections.is_visible(section),
            "{section} section is visible on the {page} page"
        );
    }
    log_step("Verify all footer sections are present");

    let visible_links = base.verify_footer_links().await?;
    for link in links {
        check!(
            visible_links.is_visible(*link),
            "{link} link is visible on the {page} page"
        );
    }
    log_step("Verify footer links are accessible");

    Ok(())
}

fn check_price(label: &str, actual: f64, expected: f64) -> Result<(), JourneyError> {
    let passed = compare_prices(actual, expected, DEFAULT_PRICE_TOLERANCE);
    let details = format!("Expected: {expected:.2}, Actual: {actual:.2}");

    log_assertion(label, passed, Some(&details));

    if !passed {
        return Err(JourneyError::AssertionFailed(format!("{label} ({details})")));
    }

    Ok(())
}

/// Registers a fresh account and returns its email
async fn register_new_user<B: Browser>(
    context: &JourneyContext<'_, B>,
) -> Result<String, JourneyError> {
    let mut user = context.data().users.new_user.clone();
    user.email = generate_unique_email("testuser");

    log_action("Clicking Register button", None);
    context.home().click_register().await?;

    let register = context.register();
    log_action(
        "Filling registration form",
        Some(&format!("Email: {}", user.email)),
    );
    register.register_user(&user).await?;

    check!(
        register.is_registration_successful().await?,
        "User registration successful"
    );

    log_action("Clicking Continue button", None);
    register.click_continue().await?;
    log_step("Register new user");

    Ok(user.email)
}

async fn open_product<B: Browser>(
    product_page: &ProductPage<'_, B>,
    url: &str,
) -> Result<(), JourneyError> {
    log_action("Navigating to product", Some(&format!("URL: {url}")));

    Ok(product_page.go_to_product_detail(url).await?)
}

/// Adds the product currently shown with `quantity` and dismisses the notification
async fn add_open_product<B: Browser>(
    product_page: &ProductPage<'_, B>,
    quantity: u32,
) -> Result<(), JourneyError> {
    log_action("Setting quantity", Some(&format!("Quantity: {quantity}")));
    product_page.set_quantity(quantity).await?;

    log_action("Adding product to cart", None);
    product_page.add_to_cart_from_detail_page().await?;
    product_page.close_notification().await?;

    Ok(())
}

async fn add_product_to_cart<B: Browser>(
    context: &JourneyContext<'_, B>,
    url: &str,
    quantity: u32,
) -> Result<(), JourneyError> {
    let product_page = context.product();

    open_product(&product_page, url).await?;
    add_open_product(&product_page, quantity).await
}

/// Runs the price verification on the cart being shown and counts mismatches
async fn verify_cart<B: Browser>(
    cart: &CartPage<'_, B>,
) -> Result<VerificationReport, JourneyError> {
    log_action("Verifying price calculations", None);

    let report = cart.verify_price_calculations().await?;
    info!("\n{report}");

    let mismatched_items = report.mismatched_items().count() as u64;
    if mismatched_items > 0 {
        put_metric!(Metrics::LineItemMismatch, mismatched_items);
    }
    if !report.subtotal_match {
        put_metric!(Metrics::SubtotalMismatch, 1);
    }
    if !report.total_match {
        put_metric!(Metrics::TotalMismatch, 1);
    }

    debug!("{} of {} items mismatched", mismatched_items, report.items.len());

    Ok(report)
}
