use browser::Browser;
use common::fixtures::TestData;
use storefront::pages::{
    BasePage, CartPage, CheckoutPage, HomePage, LoginPage, ProductPage, RegisterPage,
};

/// Everything one journey works with: its own browser session and the
/// shared test data
pub struct JourneyContext<'a, B: Browser> {
    base: BasePage<'a, B>,
    data: &'a TestData,
}

impl<'a, B: Browser> JourneyContext<'a, B> {
    pub fn new(browser: &'a B, base_url: &str, data: &'a TestData) -> Self {
        Self {
            base: BasePage::new(browser).set_base_url(base_url),
            data,
        }
    }

    pub fn data(&self) -> &'a TestData {
        self.data
    }

    pub fn base(&self) -> &BasePage<'a, B> {
        &self.base
    }

    pub fn home(&self) -> HomePage<'a, B> {
        HomePage::new(self.base.clone())
    }

    pub fn login(&self) -> LoginPage<'a, B> {
        LoginPage::new(self.base.clone())
    }

    pub fn register(&self) -> RegisterPage<'a, B> {
        RegisterPage::new(self.base.clone())
    }

    pub fn product(&self) -> ProductPage<'a, B> {
        ProductPage::new(self.base.clone())
    }

    pub fn cart(&self) -> CartPage<'a, B> {
        CartPage::new(self.base.clone())
    }

    pub fn checkout(&self) -> CheckoutPage<'a, B> {
        CheckoutPage::new(self.base.clone())
    }
}
