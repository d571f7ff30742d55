use std::str::FromStr;

use browser::Browser;
use serde::Serialize;
use strum_macros::{Display, EnumIter, EnumString};
use tracing::debug;

use crate::{
    errors::StorefrontError,
    pages::base::{BasePage, DEFAULT_ELEMENT_TIMEOUT, SHORT_ELEMENT_TIMEOUT},
    utils::{
        conversions::{parse_cart_quantity, parse_price},
        html::{element_to_text, extract_element_from_element, find_in_element},
    },
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumIter, EnumString)]
#[strum(serialize_all = "kebab-case", ascii_case_insensitive)]
pub enum Category {
    Books,
    Computers,
    Electronics,
    #[strum(to_string = "apparel-shoes", serialize = "apparel")]
    Apparel,
    DigitalDownloads,
    Jewelry,
    GiftCards,
}

impl Category {
    pub const fn css(self) -> &'static str {
        match self {
            Category::Books => r#".top-menu a[href="/books"]"#,
            Category::Computers => r#".top-menu a[href="/computers"]"#,
            Category::Electronics => r#".top-menu a[href="/electronics"]"#,
            Category::Apparel => r#".top-menu a[href="/apparel-shoes"]"#,
            Category::DigitalDownloads => r#".top-menu a[href="/digital-downloads"]"#,
            Category::Jewelry => r#".top-menu a[href="/jewelry"]"#,
            Category::GiftCards => r#".top-menu a[href="/gift-cards"]"#,
        }
    }

    /// Listing path, e.g. `/apparel-shoes`
    pub fn path(self) -> String {
        format!("/{self}")
    }
}

#[derive(Debug, Clone, Copy)]
enum HomeUi {
    CartLink,
    CartQuantity,
    LoginLink,
    RegisterLink,
    LogoutLink,
    AccountLink,
    SearchBox,
    SearchButton,
    ProductItem,
    ProductTitle,
    ProductPrice,
    BarNotification,
    CloseNotification,
}

impl HomeUi {
    const fn css(self) -> &'static str {
        match self {
            HomeUi::CartLink => ".ico-cart",
            HomeUi::CartQuantity => ".cart-qty",
            HomeUi::LoginLink => "a.ico-login",
            HomeUi::RegisterLink => "a.ico-register",
            HomeUi::LogoutLink => "a.ico-logout",
            HomeUi::AccountLink => "a.ico-account",
            HomeUi::SearchBox => "#small-searchterms",
            HomeUi::SearchButton => "input.search-box-button",
            HomeUi::ProductItem => ".product-item",
            HomeUi::ProductTitle => ".product-title a",
            HomeUi::ProductPrice => ".actual-price",
            HomeUi::BarNotification => "#bar-notification",
            HomeUi::CloseNotification => "#bar-notification .close",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FeaturedProduct {
    pub title: String,
    pub price: f64,
}

pub struct HomePage<'a, B: Browser> {
    base: BasePage<'a, B>,
}

impl<'a, B: Browser> HomePage<'a, B> {
    pub fn new(base: BasePage<'a, B>) -> Self {
        Self { base }
    }

    pub fn base(&self) -> &BasePage<'a, B> {
        &self.base
    }

    pub async fn go_to_home_page(&self) -> Result<(), StorefrontError> {
        self.base.navigate("/").await?;
        self.base.wait_for_page_load().await
    }

    pub async fn is_user_logged_in(&self) -> Result<bool, StorefrontError> {
        self.base.is_element_visible(HomeUi::LogoutLink.css()).await
    }

    pub async fn get_logged_in_user_email(&self) -> Result<Option<String>, StorefrontError> {
        if !self.is_user_logged_in().await? {
            return Ok(None);
        }

        self.base.get_text(HomeUi::AccountLink.css()).await
    }

    pub async fn click_login(&self) -> Result<(), StorefrontError> {
        self.base.click_element(HomeUi::LoginLink.css()).await?;
        self.base.wait_for_page_load().await
    }

    pub async fn click_register(&self) -> Result<(), StorefrontError> {
        self.base.click_element(HomeUi::RegisterLink.css()).await?;
        self.base.wait_for_page_load().await
    }

    pub async fn click_logout(&self) -> Result<(), StorefrontError> {
        self.base.click_element(HomeUi::LogoutLink.css()).await?;
        self.base.wait_for_page_load().await
    }

    pub async fn go_to_cart(&self) -> Result<(), StorefrontError> {
        self.base.click_element(HomeUi::CartLink.css()).await?;
        self.base.wait_for_page_load().await
    }

    /// Item count from the header cart link, 0 when it is not shown
    pub async fn get_cart_quantity(&self) -> Result<u32, StorefrontError> {
        let text = self.base.get_text(HomeUi::CartQuantity.css()).await?;

        Ok(text.map(|text| parse_cart_quantity(&text)).unwrap_or(0))
    }

    pub async fn search_product(&self, search_term: &str) -> Result<(), StorefrontError> {
        self.base
            .fill_input(HomeUi::SearchBox.css(), search_term)
            .await?;
        self.base.click_element(HomeUi::SearchButton.css()).await?;
        self.base.wait_for_page_load().await
    }

    pub async fn go_to_category(&self, category: Category) -> Result<(), StorefrontError> {
        self.base.click_element(category.css()).await?;
        self.base.wait_for_page_load().await
    }

    /// Category by its menu name, e.g. "books" or "digital-downloads"
    pub async fn go_to_category_named(&self, name: &str) -> Result<(), StorefrontError> {
        let category = Category::from_str(name.trim())
            .map_err(|_| StorefrontError::UnknownCategory(name.into()))?;

        self.go_to_category(category).await
    }

    pub async fn get_featured_products(&self) -> Result<Vec<FeaturedProduct>, StorefrontError> {
        let browser = self.base.browser();
        let items = browser.query_all(HomeUi::ProductItem.css()).await?;
        let mut products = Vec::with_capacity(items.len());

        for item in items {
            let title_element =
                extract_element_from_element(browser, &item, HomeUi::ProductTitle.css()).await?;
            let title = element_to_text(browser, &title_element).await?;

            let price = match find_in_element(browser, &item, HomeUi::ProductPrice.css()).await? {
                Some(price_element) => browser.text_content(&price_element).await?,
                None => None,
            };

            products.push(FeaturedProduct {
                title,
                price: parse_price(price.as_deref()),
            });
        }

        debug!("Found {} featured products", products.len());

        Ok(products)
    }

    /// Dismisses the notification bar if it shows up
    pub async fn close_notification_bar(&self) -> Result<(), StorefrontError> {
        if self
            .base
            .appears_within(HomeUi::BarNotification.css(), SHORT_ELEMENT_TIMEOUT)
            .await?
        {
            self.base
                .click_element(HomeUi::CloseNotification.css())
                .await?;
        }

        Ok(())
    }

    pub async fn wait_for_success_notification(&self) -> Result<Option<String>, StorefrontError> {
        self.base
            .wait_for_element(HomeUi::BarNotification.css(), DEFAULT_ELEMENT_TIMEOUT)
            .await?;

        self.base.get_text(HomeUi::BarNotification.css()).await
    }
}
