mod support;

use browser::{SnapshotBrowser, snapshot::Action};
use common::cart::{Aggregate, LineItem};
use storefront::{
    errors::StorefrontError,
    pages::{BasePage, CartPage},
};
use support::{CART_EMPTY, CART_MISMATCH, CART_PARTIAL, storefront, storefront_with_cart};

async fn open_cart(browser: &SnapshotBrowser) -> CartPage<'_, SnapshotBrowser> {
    let cart = CartPage::new(BasePage::new(browser));
    cart.go_to_cart().await.unwrap();

    cart
}

#[tokio::test]
async fn scrapes_rows_in_display_order() {
    let browser = storefront();
    let cart = open_cart(&browser).await;

    let items = cart.get_cart_items().await.unwrap();

    assert_eq!(
        items,
        vec![
            LineItem::new("14.1-inch Laptop", 1590.0, 1, 1590.0),
            LineItem::new("Computing and Internet", 10.0, 2, 20.0),
        ]
    );
    assert_eq!(cart.get_cart_item_count().await.unwrap(), 2);
}

#[tokio::test]
async fn incomplete_rows_are_skipped_without_error() {
    let browser = storefront_with_cart(CART_PARTIAL);
    let cart = open_cart(&browser).await;

    let items = cart.get_cart_items().await.unwrap();

    // rows without a quantity field, or with a non-numeric or zero quantity
    assert_eq!(items, vec![LineItem::new("Health Book", 10.0, 3, 30.0)]);
}

#[tokio::test]
async fn aggregates_come_from_the_totals_table() {
    let browser = storefront();
    let cart = open_cart(&browser).await;

    let aggregates = cart.read_aggregates().await.unwrap();

    assert_eq!(aggregates.subtotal, 1610.0);
    assert_eq!(aggregates.shipping, 10.0);
    assert_eq!(aggregates.tax, 0.0);
    assert_eq!(aggregates.discount, 0.0);
    assert_eq!(aggregates.total, 1620.0);

    assert_eq!(cart.read_aggregate(Aggregate::Discount).await.unwrap(), None);
    assert_eq!(cart.get_order_subtotal().await, 1610.0);
    assert_eq!(cart.get_order_total().await, 1620.0);
}

#[tokio::test]
async fn discount_is_a_magnitude_and_unpriced_shipping_is_zero() {
    let browser = storefront_with_cart(CART_PARTIAL);
    let cart = open_cart(&browser).await;

    assert_eq!(cart.get_shipping_cost().await, 0.0);
    assert_eq!(cart.get_discount_amount().await, 5.0);
    assert_eq!(cart.get_tax().await, 2.5);

    let report = cart.verify_price_calculations().await.unwrap();

    assert_eq!(report.expected_total, 27.5);
    assert!(report.total_match);
    assert!(report.all_calculations_correct);
}

#[tokio::test]
async fn consistent_cart_verifies() {
    let browser = storefront();
    let cart = open_cart(&browser).await;

    let report = cart.verify_price_calculations().await.unwrap();

    assert_eq!(report.items.len(), 2);
    assert_eq!(report.calculated_subtotal, 1610.0);
    assert_eq!(report.expected_total, 1620.0);
    assert!(report.subtotal_match);
    assert!(report.total_match);
    assert!(report.all_calculations_correct);
}

#[tokio::test]
async fn wrong_line_total_and_sums_are_flagged() {
    let browser = storefront_with_cart(CART_MISMATCH);
    let cart = open_cart(&browser).await;

    let report = cart.verify_price_calculations().await.unwrap();

    let mismatched: Vec<_> = report.mismatched_items().map(|item| item.name.as_str()).collect();
    assert_eq!(mismatched, ["Health Book"]);
    assert_eq!(report.calculated_subtotal, 79.0);
    assert!(!report.subtotal_match);
    assert!(!report.total_match);
    assert!(!report.all_calculations_correct);
}

#[tokio::test]
async fn empty_cart_reads_as_empty_and_consistent() {
    let browser = storefront_with_cart(CART_EMPTY);
    let cart = open_cart(&browser).await;

    assert!(cart.is_cart_empty().await.unwrap());
    assert!(cart.get_cart_items().await.unwrap().is_empty());

    let report = cart.verify_price_calculations().await.unwrap();

    assert_eq!(report.calculated_subtotal, 0.0);
    assert!(report.all_calculations_correct);
}

#[tokio::test]
async fn filled_cart_is_not_empty() {
    let browser = storefront();
    let cart = open_cart(&browser).await;

    assert!(!cart.is_cart_empty().await.unwrap());
}

#[tokio::test]
async fn quantity_update_targets_the_indexed_row() {
    let browser = storefront();
    let cart = open_cart(&browser).await;

    cart.update_item_quantity(1, 5).await.unwrap();

    let actions = browser.actions();
    assert!(actions.contains(&Action::Fill(
        r#"input[name="itemquantity2"]"#.into(),
        "5".into()
    )));
    assert_eq!(
        actions.last(),
        Some(&Action::Click(r#"input[name="updatecart"]"#.into()))
    );

    let items = cart.get_cart_items().await.unwrap();
    assert_eq!(items[1].quantity, 5);

    assert!(matches!(
        cart.update_item_quantity(7, 1).await,
        Err(StorefrontError::IndexOutOfRange("Item", 7))
    ));
}

#[tokio::test]
async fn removal_checks_the_row_checkbox() {
    let browser = storefront();
    let cart = open_cart(&browser).await;

    cart.remove_item(0).await.unwrap();

    assert!(
        browser
            .is_checked(r#"input[name="removefromcart"][value="1"]"#)
            .unwrap()
    );
    assert!(
        !browser
            .is_checked(r#"input[name="removefromcart"][value="2"]"#)
            .unwrap()
    );
}

#[tokio::test]
async fn checkout_requires_accepting_terms_first() {
    let browser = storefront();
    let cart = open_cart(&browser).await;

    cart.proceed_to_checkout().await.unwrap();

    let actions = browser.actions();
    let terms = actions
        .iter()
        .position(|action| *action == Action::Check("#termsofservice".into(), true));
    let checkout = actions
        .iter()
        .position(|action| *action == Action::Click("#checkout".into()));

    assert!(terms.unwrap() < checkout.unwrap());
    assert!(browser.is_checked("#termsofservice").unwrap());
}

#[tokio::test]
async fn coupon_and_shipping_estimate_fill_their_forms() {
    let browser = storefront();
    let cart = open_cart(&browser).await;

    assert_eq!(cart.apply_coupon("SAVE5").await.unwrap(), None);
    cart.apply_gift_card("GIFT-1").await.unwrap();
    cart.estimate_shipping("United States", Some("New York"), "10001")
        .await
        .unwrap();

    let actions = browser.actions();
    assert!(actions.contains(&Action::Fill("#discountcouponcode".into(), "SAVE5".into())));
    assert!(actions.contains(&Action::Fill("#giftcardcouponcode".into(), "GIFT-1".into())));
    assert!(actions.contains(&Action::Select("#CountryId".into(), "United States".into())));
    assert!(actions.contains(&Action::Select("#StateProvinceId".into(), "New York".into())));
    assert_eq!(
        actions.last(),
        Some(&Action::Click(r#"input[name="estimateshipping"]"#.into()))
    );
}
