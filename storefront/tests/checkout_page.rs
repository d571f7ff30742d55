mod support;

use browser::{SnapshotBrowser, snapshot::Action};
use common::fixtures::CreditCard;
use storefront::pages::{BasePage, CheckoutPage, Payment, ShippingMethod};
use support::{CHECKOUT, billing_address, storefront};

async fn open_checkout(browser: &SnapshotBrowser) -> CheckoutPage<'_, SnapshotBrowser> {
    let checkout = CheckoutPage::new(BasePage::new(browser));
    checkout.go_to_checkout().await.unwrap();

    checkout
}

#[tokio::test]
async fn cash_on_delivery_checkout_walks_every_step() {
    let browser = storefront();
    let checkout = open_checkout(&browser).await;

    checkout
        .complete_checkout(&billing_address(), ShippingMethod::Ground, &Payment::CashOnDelivery)
        .await
        .unwrap();

    let actions = browser.actions();

    for expected in [
        Action::Select("#billing-address-select".into(), "".into()),
        Action::Fill("#BillingNewAddress_FirstName".into(), "John".into()),
        Action::Fill("#BillingNewAddress_Email".into(), "john.smith@test.com".into()),
        Action::Select("#BillingNewAddress_CountryId".into(), "United States".into()),
        Action::Select("#BillingNewAddress_StateProvinceId".into(), "New York".into()),
        Action::Fill("#BillingNewAddress_ZipPostalCode".into(), "10001".into()),
        Action::Click(r#"input[id="shippingoption_0"]"#.into()),
        Action::Click("#paymentmethod_0".into()),
        Action::Click("input.button-1.payment-info-next-step-button".into()),
    ] {
        assert!(actions.contains(&expected), "missing {expected:?}");
    }

    assert_eq!(
        actions.last(),
        Some(&Action::Click(
            "input.button-1.confirm-order-next-step-button".into()
        ))
    );
    assert!(!actions.iter().any(|action| matches!(action, Action::Fill(field, _) if field.starts_with("#ShippingNewAddress"))));
}

#[tokio::test]
async fn purchase_order_number_is_entered() {
    let browser = storefront();
    let checkout = open_checkout(&browser).await;

    checkout
        .complete_checkout(
            &billing_address(),
            ShippingMethod::NextDay,
            &Payment::PurchaseOrder("PO-42".into()),
        )
        .await
        .unwrap();

    let actions = browser.actions();

    assert!(actions.contains(&Action::Click(r#"input[id="shippingoption_1"]"#.into())));
    assert!(actions.contains(&Action::Click("#paymentmethod_3".into())));
    assert!(actions.contains(&Action::Fill("#PurchaseOrderNumber".into(), "PO-42".into())));
    assert!(browser.is_checked("#shippingoption_1").unwrap());
    assert!(!browser.is_checked("#shippingoption_0").unwrap());
}

#[tokio::test]
async fn credit_card_details_are_filled() {
    let browser = storefront();
    let checkout = open_checkout(&browser).await;

    let card = CreditCard {
        card_type: "Visa".into(),
        name: "John Smith".into(),
        number: "4111111111111111".into(),
        exp_month: "12".into(),
        exp_year: "2030".into(),
        cvv: "123".into(),
    };

    checkout
        .complete_checkout(&billing_address(), ShippingMethod::Ground, &Payment::CreditCard(card))
        .await
        .unwrap();

    let actions = browser.actions();

    assert!(actions.contains(&Action::Select("#CreditCardType".into(), "Visa".into())));
    assert!(actions.contains(&Action::Fill("#CardNumber".into(), "4111111111111111".into())));
    assert!(actions.contains(&Action::Select("#ExpireMonth".into(), "12".into())));
    assert!(actions.contains(&Action::Fill("#CardCode".into(), "123".into())));
}

#[tokio::test]
async fn unavailable_shipping_method_falls_back_to_first_option() {
    let page = CHECKOUT.replace(r#"id="shippingoption_2""#, r#"id="shippingoption_unavailable""#);
    let browser = SnapshotBrowser::new().with_page("/onepagecheckout", page);
    let checkout = open_checkout(&browser).await;

    checkout
        .select_shipping_method(ShippingMethod::SecondDay)
        .await
        .unwrap();

    assert_eq!(
        browser.actions().last(),
        Some(&Action::Click(r#"input[name="shippingmethod"]"#.into()))
    );
}

#[tokio::test]
async fn ship_to_same_address_toggles() {
    let browser = storefront();
    let checkout = open_checkout(&browser).await;

    assert!(browser.is_checked("#ShipToSameAddress").unwrap());

    checkout.set_ship_to_same_address(false).await.unwrap();
    assert!(!browser.is_checked("#ShipToSameAddress").unwrap());

    // no pickup option on this store configuration
    assert!(!checkout.select_in_store_pickup().await.unwrap());
}

#[tokio::test]
async fn confirmation_page_reports_the_order() {
    let browser = storefront();
    let checkout = open_checkout(&browser).await;

    assert!(!checkout.is_order_confirmed().await.unwrap());
    assert_eq!(checkout.get_error_message().await.unwrap(), None);

    checkout
        .base()
        .navigate("/checkout/completed/2109458")
        .await
        .unwrap();

    assert!(checkout.is_order_confirmed().await.unwrap());
    assert_eq!(
        checkout.get_order_number().await.unwrap().as_deref(),
        Some("Order number: 2109458")
    );

    checkout.click_continue_after_order().await.unwrap();
}
