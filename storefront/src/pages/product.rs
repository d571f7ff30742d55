use browser::Browser;
use serde::Serialize;
use tracing::{debug, info};

use crate::{
    errors::StorefrontError,
    pages::{
        base::{BasePage, DEFAULT_ELEMENT_TIMEOUT},
        home::Category,
    },
    utils::{
        conversions::{parse_price, parse_quantity},
        html::{element_extract_attr, element_to_text, find_in_element},
    },
};

#[derive(Debug, Clone, Copy)]
enum ProductUi {
    ProductItem,
    ProductTitle,
    ProductPrice,
    ListingAddToCart,
    ProductName,
    DetailPrice,
    QuantityInput,
    DetailAddToCart,
    Sku,
    SortDropdown,
    PageSizeDropdown,
    BarNotification,
    NotificationContent,
    CloseNotification,
}

impl ProductUi {
    const fn css(self) -> &'static str {
        match self {
            ProductUi::ProductItem => ".product-item",
            ProductUi::ProductTitle => ".product-title a",
            ProductUi::ProductPrice => ".actual-price",
            ProductUi::ListingAddToCart => {
                ".product-item input.button-2.product-box-add-to-cart-button"
            }
            ProductUi::ProductName => ".product-name h1",
            ProductUi::DetailPrice => ".product-essential .product-price span",
            ProductUi::QuantityInput => ".product-essential .qty-input",
            ProductUi::DetailAddToCart => ".product-essential input.add-to-cart-button",
            ProductUi::Sku => ".sku .value",
            ProductUi::SortDropdown => "#products-orderby",
            ProductUi::PageSizeDropdown => "#products-pagesize",
            ProductUi::BarNotification => "#bar-notification",
            ProductUi::NotificationContent => "#bar-notification .content",
            ProductUi::CloseNotification => "#bar-notification .close",
        }
    }
}

/// One tile of a category listing
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProductSummary {
    pub title: String,
    pub price: f64,
    pub url: String,
}

pub struct ProductPage<'a, B: Browser> {
    base: BasePage<'a, B>,
}

impl<'a, B: Browser> ProductPage<'a, B> {
    pub fn new(base: BasePage<'a, B>) -> Self {
        Self { base }
    }

    pub fn base(&self) -> &BasePage<'a, B> {
        &self.base
    }

    pub async fn go_to_category(&self, category: Category) -> Result<(), StorefrontError> {
        self.base.navigate(&category.path()).await?;
        self.base.wait_for_page_load().await
    }

    pub async fn get_products(&self) -> Result<Vec<ProductSummary>, StorefrontError> {
        let browser = self.base.browser();
        let items = browser.query_all(ProductUi::ProductItem.css()).await?;
        let mut products = Vec::with_capacity(items.len());

        for item in items {
            let (title, url) =
                match find_in_element(browser, &item, ProductUi::ProductTitle.css()).await? {
                    Some(link) => (
                        element_to_text(browser, &link).await?,
                        element_extract_attr(browser, &link, "href")
                            .await?
                            .unwrap_or_default(),
                    ),
                    None => (String::new(), String::new()),
                };

            let price = match find_in_element(browser, &item, ProductUi::ProductPrice.css()).await? {
                Some(price_element) => browser.text_content(&price_element).await?,
                None => None,
            };

            products.push(ProductSummary {
                title,
                price: parse_price(price.as_deref()),
                url,
            });
        }

        debug!("Listing shows {} products", products.len());

        Ok(products)
    }

    pub async fn click_product(&self, product_title: &str) -> Result<(), StorefrontError> {
        let browser = self.base.browser();

        for link in browser.query_all(ProductUi::ProductTitle.css()).await? {
            if element_to_text(browser, &link).await? == product_title.trim() {
                browser.click_element(&link).await?;
                return self.base.wait_for_page_load().await;
            }
        }

        Err(StorefrontError::HtmlMissingElement(format!(
            "{} \"{product_title}\"",
            ProductUi::ProductTitle.css()
        )))
    }

    pub async fn click_product_by_index(&self, index: usize) -> Result<(), StorefrontError> {
        let browser = self.base.browser();
        let links = browser.query_all(ProductUi::ProductTitle.css()).await?;

        let Some(link) = links.get(index) else {
            return Err(StorefrontError::IndexOutOfRange("Product", index));
        };

        browser.click_element(link).await?;
        self.base.wait_for_page_load().await
    }

    pub async fn add_to_cart_from_listing(
        &self,
        index: usize,
    ) -> Result<Option<String>, StorefrontError> {
        let browser = self.base.browser();
        let buttons = browser.query_all(ProductUi::ListingAddToCart.css()).await?;

        let Some(button) = buttons.get(index) else {
            return Err(StorefrontError::IndexOutOfRange("Add to cart button", index));
        };

        browser.click_element(button).await?;
        self.wait_for_notification().await
    }

    pub async fn get_product_name(&self) -> Result<Option<String>, StorefrontError> {
        self.base.get_text(ProductUi::ProductName.css()).await
    }

    pub async fn get_product_detail_price(&self) -> Result<f64, StorefrontError> {
        let text = self.base.get_text(ProductUi::DetailPrice.css()).await?;

        Ok(parse_price(text.as_deref()))
    }

    pub async fn set_quantity(&self, quantity: u32) -> Result<(), StorefrontError> {
        self.base
            .fill_input(ProductUi::QuantityInput.css(), &quantity.to_string())
            .await
    }

    /// Current quantity field value, `None` if missing or not a whole number
    pub async fn get_quantity(&self) -> Result<Option<u32>, StorefrontError> {
        let browser = self.base.browser();

        let Some(input) = browser.query(ProductUi::QuantityInput.css()).await? else {
            return Ok(None);
        };

        Ok(parse_quantity(&browser.input_value(&input).await?))
    }

    pub async fn add_to_cart_from_detail_page(&self) -> Result<Option<String>, StorefrontError> {
        self.base
            .click_element(ProductUi::DetailAddToCart.css())
            .await?;

        let notification = self.wait_for_notification().await?;
        info!("Added to cart: {}", notification.as_deref().unwrap_or("no message"));

        Ok(notification)
    }

    pub async fn wait_for_notification(&self) -> Result<Option<String>, StorefrontError> {
        self.base
            .wait_for_element(ProductUi::BarNotification.css(), DEFAULT_ELEMENT_TIMEOUT)
            .await?;

        self.base
            .get_text(ProductUi::NotificationContent.css())
            .await
    }

    pub async fn close_notification(&self) -> Result<(), StorefrontError> {
        if self
            .base
            .is_element_visible(ProductUi::CloseNotification.css())
            .await?
        {
            self.base
                .click_element(ProductUi::CloseNotification.css())
                .await?;
        }

        Ok(())
    }

    pub async fn sort_products(&self, option: &str) -> Result<(), StorefrontError> {
        self.base
            .browser()
            .select_option(ProductUi::SortDropdown.css(), option)
            .await?;
        self.base.wait_for_page_load().await
    }

    pub async fn set_page_size(&self, size: &str) -> Result<(), StorefrontError> {
        self.base
            .browser()
            .select_option(ProductUi::PageSizeDropdown.css(), size)
            .await?;
        self.base.wait_for_page_load().await
    }

    pub async fn go_to_product_detail(&self, product_url: &str) -> Result<(), StorefrontError> {
        self.base.navigate(product_url).await?;
        self.base.wait_for_page_load().await
    }

    pub async fn get_product_sku(&self) -> Result<Option<String>, StorefrontError> {
        self.base.get_text(ProductUi::Sku.css()).await
    }
}
