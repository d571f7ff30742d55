use browser::{Browser, BrowserError};
use common::fixtures::{Address, CreditCard, PaymentFixtures};
use strum_macros::{Display, EnumIter, EnumString};
use tracing::{debug, error, info, warn};

use crate::{
    errors::StorefrontError,
    pages::base::{BasePage, DEFAULT_ELEMENT_TIMEOUT, SETTLE_DELAY, SHORT_ELEMENT_TIMEOUT},
};

const ORDER_PROCESSED: &str = "your order has been successfully processed";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Display, EnumIter, EnumString)]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum ShippingMethod {
    #[default]
    Ground,
    NextDay,
    SecondDay,
}

impl ShippingMethod {
    pub const fn css(self) -> &'static str {
        match self {
            ShippingMethod::Ground => r#"input[id="shippingoption_0"]"#,
            ShippingMethod::NextDay => r#"input[id="shippingoption_1"]"#,
            ShippingMethod::SecondDay => r#"input[id="shippingoption_2"]"#,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Display, EnumIter, EnumString)]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum PaymentMethod {
    #[default]
    #[strum(serialize = "cod")]
    CashOnDelivery,
    #[strum(serialize = "check")]
    CheckMoneyOrder,
    CreditCard,
    PurchaseOrder,
}

impl PaymentMethod {
    pub const fn css(self) -> &'static str {
        match self {
            PaymentMethod::CashOnDelivery => "#paymentmethod_0",
            PaymentMethod::CheckMoneyOrder => "#paymentmethod_1",
            PaymentMethod::CreditCard => "#paymentmethod_2",
            PaymentMethod::PurchaseOrder => "#paymentmethod_3",
        }
    }
}

/// A payment method together with the details its payment info step needs
#[derive(Debug, Clone)]
pub enum Payment {
    CashOnDelivery,
    CheckMoneyOrder,
    CreditCard(CreditCard),
    PurchaseOrder(String),
}

impl Payment {
    pub fn method(&self) -> PaymentMethod {
        match self {
            Payment::CashOnDelivery => PaymentMethod::CashOnDelivery,
            Payment::CheckMoneyOrder => PaymentMethod::CheckMoneyOrder,
            Payment::CreditCard(_) => PaymentMethod::CreditCard,
            Payment::PurchaseOrder(_) => PaymentMethod::PurchaseOrder,
        }
    }

    /// Pairs `method` with the fixture details it requires
    pub fn from_fixtures(
        method: PaymentMethod,
        fixtures: &PaymentFixtures,
    ) -> Result<Self, StorefrontError> {
        match method {
            PaymentMethod::CashOnDelivery => Ok(Payment::CashOnDelivery),
            PaymentMethod::CheckMoneyOrder => Ok(Payment::CheckMoneyOrder),
            PaymentMethod::CreditCard => fixtures
                .credit_card
                .clone()
                .map(Payment::CreditCard)
                .ok_or(StorefrontError::MissingPaymentDetails("Credit card details")),
            PaymentMethod::PurchaseOrder => fixtures
                .purchase_order
                .as_ref()
                .map(|order| order.po_number.trim())
                .filter(|po_number| !po_number.is_empty())
                .map(|po_number| Payment::PurchaseOrder(po_number.into()))
                .ok_or(StorefrontError::MissingPaymentDetails(
                    "Purchase order numbers",
                )),
        }
    }
}

#[derive(Debug, Clone, Copy)]
enum CheckoutUi {
    BillingContinue,
    ShipToSameAddress,
    ShippingContinue,
    InStorePickup,
    ShippingMethodRadio,
    ShippingMethodContinue,
    PaymentMethodStep,
    PaymentMethodRadio,
    PaymentMethodContinue,
    PaymentInfoStep,
    CreditCardType,
    CardholderName,
    CardNumber,
    ExpireMonth,
    ExpireYear,
    CardCode,
    PurchaseOrderNumber,
    PaymentInfoContinue,
    ConfirmOrderStep,
    ConfirmOrder,
    OrderCompletedTitle,
    OrderNumber,
    OrderCompletedContinue,
    MessageError,
}

impl CheckoutUi {
    const fn css(self) -> &'static str {
        match self {
            CheckoutUi::BillingContinue => {
                "#billing-buttons-container input.button-1.new-address-next-step-button"
            }
            CheckoutUi::ShipToSameAddress => "#ShipToSameAddress",
            CheckoutUi::ShippingContinue => {
                "#shipping-buttons-container input.button-1.new-address-next-step-button"
            }
            CheckoutUi::InStorePickup => "#PickUpInStore",
            CheckoutUi::ShippingMethodRadio => r#"input[name="shippingmethod"]"#,
            CheckoutUi::ShippingMethodContinue => "input.button-1.shipping-method-next-step-button",
            CheckoutUi::PaymentMethodStep => "#opc-payment_method",
            CheckoutUi::PaymentMethodRadio => r#"input[name="paymentmethod"]"#,
            CheckoutUi::PaymentMethodContinue => "input.button-1.payment-method-next-step-button",
            CheckoutUi::PaymentInfoStep => "#opc-payment_info",
            CheckoutUi::CreditCardType => "#CreditCardType",
            CheckoutUi::CardholderName => "#CardholderName",
            CheckoutUi::CardNumber => "#CardNumber",
            CheckoutUi::ExpireMonth => "#ExpireMonth",
            CheckoutUi::ExpireYear => "#ExpireYear",
            CheckoutUi::CardCode => "#CardCode",
            CheckoutUi::PurchaseOrderNumber => "#PurchaseOrderNumber",
            CheckoutUi::PaymentInfoContinue => "input.button-1.payment-info-next-step-button",
            CheckoutUi::ConfirmOrderStep => "#opc-confirm_order",
            CheckoutUi::ConfirmOrder => "input.button-1.confirm-order-next-step-button",
            CheckoutUi::OrderCompletedTitle => ".order-completed .title",
            CheckoutUi::OrderNumber => ".order-number strong",
            CheckoutUi::OrderCompletedContinue => "input.button-2.order-completed-continue-button",
            CheckoutUi::MessageError => ".message-error",
        }
    }
}

struct AddressForm {
    saved_addresses: &'static str,
    first_name: &'static str,
    last_name: &'static str,
    email: Option<&'static str>,
    country: &'static str,
    state: &'static str,
    city: &'static str,
    address1: &'static str,
    zip: &'static str,
    phone: &'static str,
}

const BILLING_FORM: AddressForm = AddressForm {
    saved_addresses: "#billing-address-select",
    first_name: "#BillingNewAddress_FirstName",
    last_name: "#BillingNewAddress_LastName",
    email: Some("#BillingNewAddress_Email"),
    country: "#BillingNewAddress_CountryId",
    state: "#BillingNewAddress_StateProvinceId",
    city: "#BillingNewAddress_City",
    address1: "#BillingNewAddress_Address1",
    zip: "#BillingNewAddress_ZipPostalCode",
    phone: "#BillingNewAddress_PhoneNumber",
};

// the shipping form has no email field
const SHIPPING_FORM: AddressForm = AddressForm {
    saved_addresses: "#shipping-address-select",
    first_name: "#ShippingNewAddress_FirstName",
    last_name: "#ShippingNewAddress_LastName",
    email: None,
    country: "#ShippingNewAddress_CountryId",
    state: "#ShippingNewAddress_StateProvinceId",
    city: "#ShippingNewAddress_City",
    address1: "#ShippingNewAddress_Address1",
    zip: "#ShippingNewAddress_ZipPostalCode",
    phone: "#ShippingNewAddress_PhoneNumber",
};

pub struct CheckoutPage<'a, B: Browser> {
    base: BasePage<'a, B>,
}

impl<'a, B: Browser> CheckoutPage<'a, B> {
    pub fn new(base: BasePage<'a, B>) -> Self {
        Self { base }
    }

    pub fn base(&self) -> &BasePage<'a, B> {
        &self.base
    }

    pub async fn go_to_checkout(&self) -> Result<(), StorefrontError> {
        self.base.navigate("/onepagecheckout").await?;
        self.base.wait_for_page_load().await
    }

    async fn fill_address_form(
        &self,
        address: &Address,
        form: &AddressForm,
    ) -> Result<(), StorefrontError> {
        let browser = self.base.browser();

        // returning customers get a saved address picker, "New Address" has an empty value
        if let Some(picker) = browser.query(form.saved_addresses).await?
            && browser.query_all_within(&picker, "option").await?.len() > 1
        {
            browser.select_option(form.saved_addresses, "").await?;
        }

        self.base
            .fill_input(form.first_name, &address.first_name)
            .await?;
        self.base
            .fill_input(form.last_name, &address.last_name)
            .await?;

        if let (Some(email_input), Some(email)) = (form.email, address.email.as_deref()) {
            self.base.fill_input(email_input, email).await?;
        }

        browser.select_option(form.country, &address.country).await?;

        if let Some(state) = address.state.as_deref() {
            // the state list is reloaded for the chosen country
            self.base
                .wait_for_element(form.state, DEFAULT_ELEMENT_TIMEOUT)
                .await?;
            browser.select_option(form.state, state).await?;
        }

        self.base.fill_input(form.city, &address.city).await?;
        self.base
            .fill_input(form.address1, &address.address1)
            .await?;
        self.base.fill_input(form.zip, &address.zip).await?;
        self.base.fill_input(form.phone, &address.phone).await
    }

    pub async fn fill_billing_address(&self, address: &Address) -> Result<(), StorefrontError> {
        self.fill_address_form(address, &BILLING_FORM).await
    }

    pub async fn fill_shipping_address(&self, address: &Address) -> Result<(), StorefrontError> {
        self.fill_address_form(address, &SHIPPING_FORM).await
    }

    /// Waits for whichever step follows; a step that never shows up is only
    /// logged, the caller inspects the page to find out where it is
    async fn wait_for_next_step(&self, steps: &[CheckoutUi]) -> Result<(), StorefrontError> {
        let selectors: Vec<&str> = steps.iter().map(|step| step.css()).collect();

        match self
            .base
            .browser()
            .wait_for_any_selector(&selectors, DEFAULT_ELEMENT_TIMEOUT)
            .await
        {
            Ok(index) => {
                debug!("Checkout moved on to {}", selectors[index]);
                Ok(())
            }
            Err(BrowserError::Timeout(_, _)) => {
                warn!("No expected checkout step became visible");
                Ok(())
            }
            Err(err) => Err(err.into()),
        }
    }

    pub async fn continue_billing_address(&self) -> Result<(), StorefrontError> {
        self.base
            .click_element(CheckoutUi::BillingContinue.css())
            .await?;

        self.wait_for_next_step(&[
            CheckoutUi::ShippingContinue,
            CheckoutUi::ShippingMethodRadio,
            CheckoutUi::PaymentMethodRadio,
        ])
        .await
    }

    pub async fn set_ship_to_same_address(&self, same_address: bool) -> Result<(), StorefrontError> {
        Ok(self
            .base
            .browser()
            .set_checked(CheckoutUi::ShipToSameAddress.css(), same_address)
            .await?)
    }

    pub async fn continue_shipping_address(&self) -> Result<(), StorefrontError> {
        self.base
            .click_element(CheckoutUi::ShippingContinue.css())
            .await?;

        self.wait_for_next_step(&[
            CheckoutUi::ShippingMethodRadio,
            CheckoutUi::PaymentMethodRadio,
        ])
        .await
    }

    /// Picks up the order in store when the option is offered, which skips
    /// the shipping method step
    pub async fn select_in_store_pickup(&self) -> Result<bool, StorefrontError> {
        if !self
            .base
            .is_element_visible(CheckoutUi::InStorePickup.css())
            .await?
        {
            return Ok(false);
        }

        let browser = self.base.browser();
        browser
            .set_checked(CheckoutUi::InStorePickup.css(), true)
            .await?;
        browser.pause(SETTLE_DELAY).await;

        Ok(true)
    }

    pub async fn select_shipping_method(&self, method: ShippingMethod) -> Result<(), StorefrontError> {
        self.select_radio(method.css(), CheckoutUi::ShippingMethodRadio, &method.to_string())
            .await
    }

    pub async fn continue_shipping_method(&self) -> Result<(), StorefrontError> {
        self.base
            .click_element(CheckoutUi::ShippingMethodContinue.css())
            .await?;
        self.base
            .wait_for_element(CheckoutUi::PaymentMethodStep.css(), DEFAULT_ELEMENT_TIMEOUT)
            .await
    }

    pub async fn select_payment_method(&self, method: PaymentMethod) -> Result<(), StorefrontError> {
        self.select_radio(method.css(), CheckoutUi::PaymentMethodRadio, &method.to_string())
            .await
    }

    /// Falls back to the first option of the group when `selector` is not offered
    async fn select_radio(
        &self,
        selector: &str,
        group: CheckoutUi,
        name: &str,
    ) -> Result<(), StorefrontError> {
        let selected = match self
            .base
            .wait_for_element(selector, SHORT_ELEMENT_TIMEOUT)
            .await
        {
            Ok(()) => self.base.click_element(selector).await,
            Err(err) => Err(err),
        };

        match selected {
            Ok(()) => Ok(()),
            Err(StorefrontError::BrowserFailed(
                BrowserError::Timeout(_, _) | BrowserError::ElementNotFound(_),
            )) => {
                warn!("'{name}' is not offered, falling back to the first available option");
                self.base.click_element(group.css()).await
            }
            Err(err) => Err(err),
        }
    }

    pub async fn continue_payment_method(&self) -> Result<(), StorefrontError> {
        self.base
            .click_element(CheckoutUi::PaymentMethodContinue.css())
            .await?;
        self.base
            .wait_for_element(CheckoutUi::PaymentInfoStep.css(), DEFAULT_ELEMENT_TIMEOUT)
            .await
    }

    pub async fn fill_credit_card_info(&self, card: &CreditCard) -> Result<(), StorefrontError> {
        let browser = self.base.browser();

        browser
            .select_option(CheckoutUi::CreditCardType.css(), &card.card_type)
            .await?;
        self.base
            .fill_input(CheckoutUi::CardholderName.css(), &card.name)
            .await?;
        self.base
            .fill_input(CheckoutUi::CardNumber.css(), &card.number)
            .await?;
        browser
            .select_option(CheckoutUi::ExpireMonth.css(), &card.exp_month)
            .await?;
        browser
            .select_option(CheckoutUi::ExpireYear.css(), &card.exp_year)
            .await?;
        self.base
            .fill_input(CheckoutUi::CardCode.css(), &card.cvv)
            .await
    }

    pub async fn fill_purchase_order_number(&self, po_number: &str) -> Result<(), StorefrontError> {
        self.base
            .fill_input(CheckoutUi::PurchaseOrderNumber.css(), po_number)
            .await
    }

    pub async fn continue_payment_info(&self) -> Result<(), StorefrontError> {
        self.base
            .click_element(CheckoutUi::PaymentInfoContinue.css())
            .await?;
        self.base
            .wait_for_element(CheckoutUi::ConfirmOrderStep.css(), DEFAULT_ELEMENT_TIMEOUT)
            .await
    }

    pub async fn confirm_order(&self) -> Result<(), StorefrontError> {
        self.base
            .click_element(CheckoutUi::ConfirmOrder.css())
            .await?;
        self.base.wait_for_page_load().await
    }

    pub async fn is_order_confirmed(&self) -> Result<bool, StorefrontError> {
        if !self
            .base
            .appears_within(CheckoutUi::OrderCompletedTitle.css(), DEFAULT_ELEMENT_TIMEOUT)
            .await?
        {
            return Ok(false);
        }

        Ok(self
            .base
            .get_text(CheckoutUi::OrderCompletedTitle.css())
            .await?
            .is_some_and(|title| title.to_lowercase().contains(ORDER_PROCESSED)))
    }

    pub async fn get_order_number(&self) -> Result<Option<String>, StorefrontError> {
        self.base.get_text(CheckoutUi::OrderNumber.css()).await
    }

    pub async fn click_continue_after_order(&self) -> Result<(), StorefrontError> {
        self.base
            .click_element(CheckoutUi::OrderCompletedContinue.css())
            .await?;
        self.base.wait_for_page_load().await
    }

    pub async fn get_error_message(&self) -> Result<Option<String>, StorefrontError> {
        self.base.get_text(CheckoutUi::MessageError.css()).await
    }

    /// Runs the one page checkout from the billing step to the order confirmation
    pub async fn complete_checkout(
        &self,
        billing_address: &Address,
        shipping_method: ShippingMethod,
        payment: &Payment,
    ) -> Result<(), StorefrontError> {
        info!(
            "Checking out with {shipping_method} shipping and {} payment",
            payment.method()
        );

        let result = async {
            self.fill_billing_address(billing_address).await?;
            self.continue_billing_address().await?;
            self.finish_checkout(shipping_method, payment).await
        }
        .await;

        if let Err(err) = &result {
            error!("Checkout failed: {err}");
        }

        result
    }

    /// Checkout for a customer whose addresses are already on file; any
    /// address step still shown is confirmed as is
    pub async fn complete_checkout_with_saved_address(
        &self,
        shipping_method: ShippingMethod,
        payment: &Payment,
    ) -> Result<(), StorefrontError> {
        if self
            .base
            .is_element_visible(CheckoutUi::BillingContinue.css())
            .await?
        {
            self.continue_billing_address().await?;
        }

        self.finish_checkout(shipping_method, payment).await
    }

    async fn finish_checkout(
        &self,
        shipping_method: ShippingMethod,
        payment: &Payment,
    ) -> Result<(), StorefrontError> {
        if self.select_in_store_pickup().await? {
            debug!("Picking up in store");
        }

        if self
            .base
            .is_element_visible(CheckoutUi::ShippingContinue.css())
            .await?
        {
            self.continue_shipping_address().await?;
        }

        // in-store pickup skips the shipping method step
        if self
            .base
            .is_element_visible(CheckoutUi::ShippingMethodRadio.css())
            .await?
        {
            self.select_shipping_method(shipping_method).await?;
            self.continue_shipping_method().await?;
        }

        self.select_payment_method(payment.method()).await?;
        self.continue_payment_method().await?;

        match payment {
            Payment::CreditCard(card) => self.fill_credit_card_info(card).await?,
            Payment::PurchaseOrder(po_number) => {
                self.fill_purchase_order_number(po_number).await?
            }
            Payment::CashOnDelivery | Payment::CheckMoneyOrder => {}
        }

        self.continue_payment_info().await?;
        self.confirm_order().await
    }
}

#[cfg(test)]
mod tests {
    use std::str::FromStr;

    use common::fixtures::PurchaseOrder;

    use super::*;

    #[test]
    fn methods_parse_from_short_names() {
        assert_eq!(ShippingMethod::from_str("nextday").unwrap(), ShippingMethod::NextDay);
        assert_eq!(PaymentMethod::from_str("COD").unwrap(), PaymentMethod::CashOnDelivery);
        assert_eq!(PaymentMethod::from_str("check").unwrap(), PaymentMethod::CheckMoneyOrder);
        assert_eq!(
            PaymentMethod::from_str("purchaseorder").unwrap(),
            PaymentMethod::PurchaseOrder
        );
        assert_eq!(ShippingMethod::default(), ShippingMethod::Ground);
    }

    #[test]
    fn payment_requires_matching_fixture_details() {
        let empty = PaymentFixtures::default();

        assert!(matches!(
            Payment::from_fixtures(PaymentMethod::CashOnDelivery, &empty),
            Ok(Payment::CashOnDelivery)
        ));
        assert!(matches!(
            Payment::from_fixtures(PaymentMethod::CreditCard, &empty),
            Err(StorefrontError::MissingPaymentDetails(_))
        ));

        let blank_order = PaymentFixtures {
            credit_card: None,
            purchase_order: Some(PurchaseOrder {
                po_number: "  ".into(),
            }),
        };

        assert!(Payment::from_fixtures(PaymentMethod::PurchaseOrder, &blank_order).is_err());

        let order = PaymentFixtures {
            credit_card: None,
            purchase_order: Some(PurchaseOrder {
                po_number: "PO-123".into(),
            }),
        };

        let payment = Payment::from_fixtures(PaymentMethod::PurchaseOrder, &order).unwrap();
        assert_eq!(payment.method(), PaymentMethod::PurchaseOrder);
        assert!(matches!(payment, Payment::PurchaseOrder(number) if number == "PO-123"));
    }
}
