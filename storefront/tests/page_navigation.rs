mod support;

use browser::{SnapshotBrowser, snapshot::Action};
use common::fixtures::{Gender, UserData};
use storefront::{
    errors::StorefrontError,
    pages::{
        BasePage, Category, FooterLink, FooterSection, HomePage, LoginPage, ProductPage,
        RegisterPage,
    },
};
use strum::IntoEnumIterator;
use support::storefront;

async fn home(browser: &SnapshotBrowser) -> HomePage<'_, SnapshotBrowser> {
    let home = HomePage::new(BasePage::new(browser));
    home.go_to_home_page().await.unwrap();

    home
}

#[tokio::test]
async fn header_and_footer_are_complete_on_the_home_page() {
    let browser = storefront();
    let home = home(&browser).await;

    let header = home.base().verify_complete_header_ui().await.unwrap();
    assert!(header.logo);
    assert!(header.search_box.all_visible());
    assert!(header.all_header_elements_visible());
    assert!(home.base().verify_header_menu_exists().await.unwrap());

    assert!(home.base().verify_footer_menu_exists().await.unwrap());

    let sections = home.base().verify_footer_sections().await.unwrap();
    assert_eq!(sections.entries().len(), FooterSection::iter().count());
    assert!(sections.all_visible());

    let links = home.base().verify_footer_links().await.unwrap();
    assert!(links.all_visible(), "hidden: {:?}", links.hidden().collect::<Vec<_>>());
    assert!(links.is_visible(FooterLink::Orders));

    assert_eq!(home.base().get_page_title().await.unwrap(), "Demo Web Shop");
}

#[tokio::test]
async fn home_page_state_and_products() {
    let browser = storefront();
    let home = home(&browser).await;

    assert!(!home.is_user_logged_in().await.unwrap());
    assert_eq!(home.get_logged_in_user_email().await.unwrap(), None);
    assert_eq!(home.get_cart_quantity().await.unwrap(), 0);

    let products = home.get_featured_products().await.unwrap();
    let prices: Vec<_> = products.iter().map(|product| product.price).collect();

    assert_eq!(products[0].title, "14.1-inch Laptop");
    assert_eq!(prices, [1590.0, 10.0, 0.0]);

    // the notification bar is hidden, so there is nothing to close
    home.close_notification_bar().await.unwrap();
    assert!(!browser.actions().iter().any(|action| matches!(action, Action::Click(_))));
}

#[tokio::test]
async fn categories_navigate_through_the_top_menu() {
    let browser = storefront();
    let home = home(&browser).await;

    home.go_to_category_named("Books").await.unwrap();
    assert_eq!(
        browser.actions().last(),
        Some(&Action::Click(r#".top-menu a[href="/books"]"#.into()))
    );

    assert!(matches!(
        home.go_to_category_named("groceries").await,
        Err(StorefrontError::UnknownCategory(name)) if name == "groceries"
    ));
}

#[tokio::test]
async fn cart_counter_follows_the_page() {
    let browser = storefront();
    let home = home(&browser).await;

    home.base().navigate("/cart").await.unwrap();

    assert_eq!(home.get_cart_quantity().await.unwrap(), 3);
}

#[tokio::test]
async fn listing_reads_actual_prices_and_links() {
    let browser = storefront();
    let products = ProductPage::new(BasePage::new(&browser));

    products.go_to_category(Category::Books).await.unwrap();

    let listing = products.get_products().await.unwrap();

    assert_eq!(listing.len(), 2);
    assert_eq!(listing[0].title, "Computing and Internet");
    assert_eq!(listing[0].price, 10.0);
    assert_eq!(listing[0].url, "/computing-and-internet");
    assert_eq!(listing[1].price, 24.0);

    products.click_product("Fiction").await.unwrap();
    products.click_product_by_index(0).await.unwrap();
    assert!(matches!(
        products.click_product("Missing Book").await,
        Err(StorefrontError::HtmlMissingElement(_))
    ));

    let notification = products.add_to_cart_from_listing(1).await.unwrap();
    assert!(notification.unwrap().contains("shopping cart"));
    assert!(matches!(
        products.add_to_cart_from_listing(5).await,
        Err(StorefrontError::IndexOutOfRange(_, 5))
    ));

    products.sort_products("Name: A to Z").await.unwrap();
    products.set_page_size("4").await.unwrap();
}

#[tokio::test]
async fn product_detail_quantity_is_scoped_to_the_product() {
    let browser = storefront();
    let product = ProductPage::new(BasePage::new(&browser));

    product
        .go_to_product_detail("/computing-and-internet")
        .await
        .unwrap();

    assert_eq!(
        product.get_product_name().await.unwrap().as_deref(),
        Some("Computing and Internet")
    );
    assert_eq!(product.get_product_detail_price().await.unwrap(), 10.0);
    assert_eq!(product.get_product_sku().await.unwrap().as_deref(), Some("CI_13"));
    assert_eq!(product.get_quantity().await.unwrap(), Some(1));

    product.set_quantity(3).await.unwrap();
    assert_eq!(product.get_quantity().await.unwrap(), Some(3));

    let notification = product.add_to_cart_from_detail_page().await.unwrap();
    assert!(notification.unwrap().starts_with("The product has been added"));

    product.close_notification().await.unwrap();
    assert_eq!(
        browser.actions().last(),
        Some(&Action::Click("#bar-notification .close".into()))
    );
}

#[tokio::test]
async fn failed_login_shows_validation_summary() {
    let browser = storefront();
    let login = LoginPage::new(BasePage::new(&browser));

    login.go_to_login_page().await.unwrap();
    login
        .login("nobody@test.com", "wrong", true)
        .await
        .unwrap();

    let actions = browser.actions();
    assert!(actions.contains(&Action::Fill("#Email".into(), "nobody@test.com".into())));
    assert!(actions.contains(&Action::Check("#RememberMe".into(), true)));
    assert_eq!(
        actions.last(),
        Some(&Action::Click("input.button-1.login-button".into()))
    );

    assert!(!login.is_login_successful().await.unwrap());
    assert!(
        login
            .get_validation_error()
            .await
            .unwrap()
            .unwrap()
            .starts_with("Login was unsuccessful")
    );
    assert_eq!(login.get_field_error().await.unwrap(), None);
}

#[tokio::test]
async fn registration_fills_both_password_fields() {
    let browser = storefront();
    let register = RegisterPage::new(BasePage::new(&browser));

    register.go_to_register_page().await.unwrap();

    let user = UserData {
        gender: Some(Gender::Female),
        first_name: "Ada".into(),
        last_name: "Lovelace".into(),
        email: "ada_1_1@test.com".into(),
        password: "Secret123!".into(),
    };

    register.register_user(&user).await.unwrap();

    assert!(browser.is_checked("#gender-female").unwrap());
    assert!(!browser.is_checked("#gender-male").unwrap());

    let actions = browser.actions();
    assert!(actions.contains(&Action::Fill("#Password".into(), "Secret123!".into())));
    assert!(actions.contains(&Action::Fill("#ConfirmPassword".into(), "Secret123!".into())));
    assert!(!register.is_registration_successful().await.unwrap());

    register.base().navigate("/registerresult/1").await.unwrap();

    assert!(register.is_registration_successful().await.unwrap());
    register.click_continue().await.unwrap();
}
