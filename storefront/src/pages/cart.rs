use browser::Browser;
use common::cart::{Aggregate, LineItem, OrderAggregates, VerificationReport};
use strum::IntoEnumIterator;
use tracing::{debug, info, warn};

use crate::{
    errors::StorefrontError,
    pages::base::{BasePage, SETTLE_DELAY},
    utils::{
        conversions::{parse_price, parse_quantity},
        html::{element_to_text, find_in_element},
    },
    verification::verify,
};

const EMPTY_CART_MESSAGE: &str = "Your Shopping Cart is empty";

#[derive(Debug, Clone, Copy)]
enum CartUi {
    Rows,
    ProductName,
    UnitPrice,
    Quantity,
    Subtotal,
    QuantityInputs,
    RemoveCheckbox,
    UpdateCart,
    TotalRows,
    TotalLabel,
    TotalValue,
    DiscountAmount,
    CouponInput,
    ApplyCoupon,
    CouponMessage,
    GiftCardInput,
    ApplyGiftCard,
    ContinueShopping,
    Checkout,
    TermsOfService,
    OrderSummary,
    Country,
    State,
    Zip,
    EstimateShipping,
}

impl CartUi {
    const fn css(self) -> &'static str {
        match self {
            CartUi::Rows => ".cart tbody tr",
            CartUi::ProductName => ".product-name",
            CartUi::UnitPrice => ".product-unit-price",
            CartUi::Quantity => ".qty-input",
            CartUi::Subtotal => ".product-subtotal",
            CartUi::QuantityInputs => ".cart .qty-input",
            CartUi::RemoveCheckbox => r#"input[name="removefromcart"]"#,
            CartUi::UpdateCart => r#"input[name="updatecart"]"#,
            CartUi::TotalRows => ".cart-total tr",
            CartUi::TotalLabel => ".cart-total-left",
            CartUi::TotalValue => ".cart-total-right",
            CartUi::DiscountAmount => ".discount .value-summary",
            CartUi::CouponInput => "#discountcouponcode",
            CartUi::ApplyCoupon => r#"input[name="applydiscountcouponcode"]"#,
            CartUi::CouponMessage => ".message-success, .message-error",
            CartUi::GiftCardInput => "#giftcardcouponcode",
            CartUi::ApplyGiftCard => r#"input[name="applygiftcardcouponcode"]"#,
            CartUi::ContinueShopping => r#"input[name="continueshopping"]"#,
            CartUi::Checkout => "#checkout",
            CartUi::TermsOfService => "#termsofservice",
            CartUi::OrderSummary => ".order-summary-content",
            CartUi::Country => "#CountryId",
            CartUi::State => "#StateProvinceId",
            CartUi::Zip => "#ZipPostalCode",
            CartUi::EstimateShipping => r#"input[name="estimateshipping"]"#,
        }
    }
}

pub struct CartPage<'a, B: Browser> {
    base: BasePage<'a, B>,
}

impl<'a, B: Browser> CartPage<'a, B> {
    pub fn new(base: BasePage<'a, B>) -> Self {
        Self { base }
    }

    pub fn base(&self) -> &BasePage<'a, B> {
        &self.base
    }

    pub async fn go_to_cart(&self) -> Result<(), StorefrontError> {
        self.base.navigate("/cart").await?;
        self.base.wait_for_page_load().await
    }

    pub async fn is_cart_empty(&self) -> Result<bool, StorefrontError> {
        let summary = self.base.get_text(CartUi::OrderSummary.css()).await?;

        Ok(summary.is_some_and(|summary| summary.contains(EMPTY_CART_MESSAGE)))
    }

    /// Every complete cart row in display order.
    ///
    /// A row needs a name, a unit price, a quantity field holding a whole
    /// number and a line total. Rows short of any of those are skipped with a
    /// warning since the cart re-renders piecemeal after an update.
    pub async fn get_cart_items(&self) -> Result<Vec<LineItem>, StorefrontError> {
        let browser = self.base.browser();
        let rows = browser.query_all(CartUi::Rows.css()).await?;
        let mut items = Vec::with_capacity(rows.len());

        for (index, row) in rows.iter().enumerate() {
            match self.scrape_row(row).await? {
                Some(item) => items.push(item),
                None => warn!("Skipping incomplete cart row {index}"),
            }
        }

        debug!("Scraped {} of {} cart rows", items.len(), rows.len());

        Ok(items)
    }

    async fn scrape_row(&self, row: &B::Element) -> Result<Option<LineItem>, StorefrontError> {
        let browser = self.base.browser();

        let (Some(name), Some(unit_price), Some(quantity), Some(subtotal)) = (
            find_in_element(browser, row, CartUi::ProductName.css()).await?,
            find_in_element(browser, row, CartUi::UnitPrice.css()).await?,
            find_in_element(browser, row, CartUi::Quantity.css()).await?,
            find_in_element(browser, row, CartUi::Subtotal.css()).await?,
        ) else {
            return Ok(None);
        };

        let quantity_text = browser.input_value(&quantity).await?;
        let Some(quantity) = parse_quantity(&quantity_text) else {
            debug!("Quantity '{quantity_text}' is not a positive whole number");
            return Ok(None);
        };

        let name = element_to_text(browser, &name).await?;
        let unit_price = browser.text_content(&unit_price).await?;
        let subtotal = browser.text_content(&subtotal).await?;

        Ok(Some(LineItem::new(
            name,
            parse_price(unit_price.as_deref()),
            quantity,
            parse_price(subtotal.as_deref()),
        )))
    }

    pub async fn get_cart_item_count(&self) -> Result<usize, StorefrontError> {
        Ok(self.get_cart_items().await?.len())
    }

    /// Displayed value of one totals region, `None` when the page does not
    /// show it
    pub async fn read_aggregate(&self, aggregate: Aggregate) -> Result<Option<f64>, StorefrontError> {
        let browser = self.base.browser();

        if aggregate == Aggregate::Discount
            && let Some(text) = self.base.get_text(CartUi::DiscountAmount.css()).await?
        {
            return Ok(Some(parse_price(Some(&text))));
        }

        for row in browser.query_all(CartUi::TotalRows.css()).await? {
            let Some(label) = find_in_element(browser, &row, CartUi::TotalLabel.css()).await? else {
                continue;
            };

            if !element_to_text(browser, &label)
                .await?
                .starts_with(aggregate.label())
            {
                continue;
            }

            let Some(value) = find_in_element(browser, &row, CartUi::TotalValue.css()).await? else {
                return Ok(None);
            };

            let text = browser.text_content(&value).await?;

            return Ok(Some(parse_price(text.as_deref())));
        }

        Ok(None)
    }

    /// Reads every totals region. Each one is independent, a region that is
    /// missing or fails to read is 0 without affecting the others.
    pub async fn read_aggregates(&self) -> Result<OrderAggregates, StorefrontError> {
        self.base.wait_for_page_load().await?;

        let mut aggregates = OrderAggregates::default();

        for aggregate in Aggregate::iter() {
            aggregates.set(aggregate, self.aggregate_or_zero(aggregate).await);
        }

        Ok(aggregates)
    }

    async fn aggregate_or_zero(&self, aggregate: Aggregate) -> f64 {
        match self.read_aggregate(aggregate).await {
            Ok(Some(value)) => value,
            Ok(None) => {
                debug!("No {aggregate} shown, using 0");
                0.0
            }
            Err(err) => {
                warn!("Failed to read {aggregate}, using 0: {err}");
                0.0
            }
        }
    }

    pub async fn get_order_subtotal(&self) -> f64 {
        self.aggregate_or_zero(Aggregate::Subtotal).await
    }

    pub async fn get_shipping_cost(&self) -> f64 {
        self.aggregate_or_zero(Aggregate::Shipping).await
    }

    pub async fn get_tax(&self) -> f64 {
        self.aggregate_or_zero(Aggregate::Tax).await
    }

    pub async fn get_discount_amount(&self) -> f64 {
        self.aggregate_or_zero(Aggregate::Discount).await
    }

    pub async fn get_order_total(&self) -> f64 {
        self.aggregate_or_zero(Aggregate::Total).await
    }

    pub async fn verify_price_calculations(&self) -> Result<VerificationReport, StorefrontError> {
        let items = self.get_cart_items().await?;
        let aggregates = self.read_aggregates().await?;

        let report = verify(&items, &aggregates);

        info!(
            "Cart verification: {} items, subtotal match {}, total match {}",
            report.items.len(),
            report.subtotal_match,
            report.total_match
        );

        Ok(report)
    }

    pub async fn update_item_quantity(
        &self,
        index: usize,
        quantity: u32,
    ) -> Result<(), StorefrontError> {
        let browser = self.base.browser();
        let inputs = browser.query_all(CartUi::QuantityInputs.css()).await?;

        let Some(input) = inputs.get(index) else {
            return Err(StorefrontError::IndexOutOfRange("Item", index));
        };

        browser.fill_element(input, &quantity.to_string()).await?;
        self.submit_cart_update().await
    }

    pub async fn remove_item(&self, index: usize) -> Result<(), StorefrontError> {
        let browser = self.base.browser();
        let checkboxes = browser.query_all(CartUi::RemoveCheckbox.css()).await?;

        let Some(checkbox) = checkboxes.get(index) else {
            return Err(StorefrontError::IndexOutOfRange("Item", index));
        };

        browser.set_element_checked(checkbox, true).await?;
        self.submit_cart_update().await
    }

    async fn submit_cart_update(&self) -> Result<(), StorefrontError> {
        self.base.click_element(CartUi::UpdateCart.css()).await?;
        self.base.wait_for_page_load().await?;
        self.base.browser().pause(SETTLE_DELAY).await;

        Ok(())
    }

    /// Message shown after applying the coupon, if any
    pub async fn apply_coupon(&self, coupon_code: &str) -> Result<Option<String>, StorefrontError> {
        self.base
            .fill_input(CartUi::CouponInput.css(), coupon_code)
            .await?;
        self.base.click_element(CartUi::ApplyCoupon.css()).await?;
        self.base.wait_for_page_load().await?;

        self.base.get_text(CartUi::CouponMessage.css()).await
    }

    pub async fn apply_gift_card(&self, gift_card_code: &str) -> Result<(), StorefrontError> {
        self.base
            .fill_input(CartUi::GiftCardInput.css(), gift_card_code)
            .await?;
        self.base.click_element(CartUi::ApplyGiftCard.css()).await?;
        self.base.wait_for_page_load().await
    }

    /// Accepts the terms of service, checkout is refused without them
    pub async fn proceed_to_checkout(&self) -> Result<(), StorefrontError> {
        self.base
            .browser()
            .set_checked(CartUi::TermsOfService.css(), true)
            .await?;
        self.base.click_element(CartUi::Checkout.css()).await?;
        self.base.wait_for_page_load().await
    }

    pub async fn continue_shopping(&self) -> Result<(), StorefrontError> {
        self.base
            .click_element(CartUi::ContinueShopping.css())
            .await?;
        self.base.wait_for_page_load().await
    }

    pub async fn estimate_shipping(
        &self,
        country: &str,
        state: Option<&str>,
        zip: &str,
    ) -> Result<(), StorefrontError> {
        let browser = self.base.browser();

        browser.select_option(CartUi::Country.css(), country).await?;
        // states are fetched once a country is chosen
        browser.pause(SETTLE_DELAY).await;

        if let Some(state) = state {
            browser.select_option(CartUi::State.css(), state).await?;
        }

        self.base.fill_input(CartUi::Zip.css(), zip).await?;
        self.base
            .click_element(CartUi::EstimateShipping.css())
            .await?;
        self.base.wait_for_page_load().await
    }
}
