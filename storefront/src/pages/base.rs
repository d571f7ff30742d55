use std::{path::PathBuf, time::Duration};

use browser::Browser;
use strum::IntoEnumIterator;
use strum_macros::{Display, EnumIter};
use tracing::{debug, info};

use crate::errors::StorefrontError;

pub const BASE_URL: &str = "https://demowebshop.tricentis.com";
pub const SCREENSHOT_DIR: &str = "reports/screenshots";

pub(crate) const DEFAULT_ELEMENT_TIMEOUT: Duration = Duration::from_secs(10);
pub(crate) const SHORT_ELEMENT_TIMEOUT: Duration = Duration::from_secs(5);
pub(crate) const VALIDATION_TIMEOUT: Duration = Duration::from_secs(3);
// lets the DOM settle after a form post re-renders the page
pub(crate) const SETTLE_DELAY: Duration = Duration::from_millis(500);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumIter)]
#[strum(serialize_all = "title_case")]
pub enum FooterSection {
    Information,
    CustomerService,
    MyAccount,
    FollowUs,
}

impl FooterSection {
    pub const fn css(self) -> &'static str {
        match self {
            FooterSection::Information => ".footer-menu-wrapper .column.information h3",
            FooterSection::CustomerService => ".footer-menu-wrapper .column.customer-service h3",
            FooterSection::MyAccount => ".footer-menu-wrapper .column.my-account h3",
            FooterSection::FollowUs => ".footer-menu-wrapper .column.follow-us h3",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumIter)]
#[strum(serialize_all = "title_case")]
pub enum FooterLink {
    Sitemap,
    ShippingReturns,
    PrivacyPolicy,
    ConditionsOfUse,
    AboutUs,
    ContactUs,
    Search,
    News,
    Blog,
    MyAccount,
    Orders,
    Addresses,
    Cart,
    Wishlist,
}

impl FooterLink {
    pub const fn css(self) -> &'static str {
        match self {
            FooterLink::Sitemap => r#"a[href="/sitemap"]"#,
            FooterLink::ShippingReturns => r#"a[href="/shipping-returns"]"#,
            FooterLink::PrivacyPolicy => r#"a[href="/privacy-policy"]"#,
            FooterLink::ConditionsOfUse => r#"a[href="/conditions-of-use"]"#,
            FooterLink::AboutUs => r#"a[href="/about-us"]"#,
            FooterLink::ContactUs => r#"a[href="/contactus"]"#,
            FooterLink::Search => r#"a[href="/search"]"#,
            FooterLink::News => r#"a[href="/news"]"#,
            FooterLink::Blog => r#"a[href="/blog"]"#,
            FooterLink::MyAccount => r#"a[href="/customer/info"]"#,
            FooterLink::Orders => r#"a[href="/customer/orders"]"#,
            FooterLink::Addresses => r#"a[href="/customer/addresses"]"#,
            FooterLink::Cart => r#"a[href="/cart"]"#,
            FooterLink::Wishlist => r#"a[href="/wishlist"]"#,
        }
    }
}

#[derive(Debug, Clone, Copy)]
enum LayoutUi {
    FooterMenu,
    HeaderMenu,
    HeaderLogo,
    SearchInput,
    SearchButton,
    ShoppingCart,
    HeaderLinks,
}

impl LayoutUi {
    const fn css(self) -> &'static str {
        match self {
            LayoutUi::FooterMenu => ".footer-menu-wrapper",
            LayoutUi::HeaderMenu => ".header-menu",
            LayoutUi::HeaderLogo => ".header-logo",
            LayoutUi::SearchInput => "#small-searchterms",
            LayoutUi::SearchButton => "input.search-box-button",
            LayoutUi::ShoppingCart => ".ico-cart",
            LayoutUi::HeaderLinks => ".header-links",
        }
    }
}

/// Which of a fixed set of page regions were visible, in declaration order
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Visibility<K> {
    entries: Vec<(K, bool)>,
}

impl<K: Copy + PartialEq> Visibility<K> {
    pub fn is_visible(&self, key: K) -> bool {
        self.entries
            .iter()
            .any(|(candidate, visible)| *candidate == key && *visible)
    }

    pub fn all_visible(&self) -> bool {
        self.entries.iter().all(|(_, visible)| *visible)
    }

    pub fn hidden(&self) -> impl Iterator<Item = K> + '_ {
        self.entries
            .iter()
            .filter(|(_, visible)| !visible)
            .map(|(key, _)| *key)
    }

    pub fn entries(&self) -> &[(K, bool)] {
        &self.entries
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SearchBoxUi {
    pub input: bool,
    pub button: bool,
}

impl SearchBoxUi {
    pub fn all_visible(&self) -> bool {
        self.input && self.button
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HeaderUi {
    pub logo: bool,
    pub search_box: SearchBoxUi,
    pub shopping_cart: bool,
    pub header_links: bool,
}

impl HeaderUi {
    pub fn all_header_elements_visible(&self) -> bool {
        self.logo && self.search_box.all_visible() && self.shopping_cart && self.header_links
    }
}

/// Shared behaviour of every storefront page, embedded by the page objects
pub struct BasePage<'a, B: Browser> {
    browser: &'a B,
    base_url: String,
}

impl<B: Browser> Clone for BasePage<'_, B> {
    fn clone(&self) -> Self {
        Self {
            browser: self.browser,
            base_url: self.base_url.clone(),
        }
    }
}

impl<'a, B: Browser> BasePage<'a, B> {
    pub fn new(browser: &'a B) -> Self {
        Self {
            browser,
            base_url: BASE_URL.into(),
        }
    }

    pub fn set_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();

        self
    }

    pub fn browser(&self) -> &'a B {
        self.browser
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Absolute URLs are returned as-is, anything else is joined to the base URL
    pub fn url_for(&self, path: &str) -> String {
        if path.starts_with("http") {
            return path.into();
        }

        format!("{}{path}", self.base_url)
    }

    pub async fn navigate(&self, path: &str) -> Result<(), StorefrontError> {
        let url = self.url_for(path);
        debug!("Navigating to {url}");

        Ok(self.browser.navigate(&url).await?)
    }

    pub async fn wait_for_page_load(&self) -> Result<(), StorefrontError> {
        Ok(self.browser.wait_for_network_idle().await?)
    }

    pub async fn get_page_title(&self) -> Result<String, StorefrontError> {
        Ok(self.browser.title().await?)
    }

    pub async fn click_element(&self, selector: &str) -> Result<(), StorefrontError> {
        Ok(self.browser.click(selector).await?)
    }

    pub async fn fill_input(&self, selector: &str, value: &str) -> Result<(), StorefrontError> {
        Ok(self.browser.fill(selector, value).await?)
    }

    /// Trimmed text of the first match, `None` when nothing matches
    pub async fn get_text(&self, selector: &str) -> Result<Option<String>, StorefrontError> {
        let text = self.browser.text_of(selector).await?;

        Ok(text.map(|text| text.trim().to_string()))
    }

    pub async fn is_element_visible(&self, selector: &str) -> Result<bool, StorefrontError> {
        Ok(self.browser.is_visible(selector).await?)
    }

    pub async fn wait_for_element(
        &self,
        selector: &str,
        timeout: Duration,
    ) -> Result<(), StorefrontError> {
        Ok(self.browser.wait_for_selector(selector, timeout).await?)
    }

    /// Waits for `selector`, reporting a timeout as `false`
    pub(crate) async fn appears_within(
        &self,
        selector: &str,
        timeout: Duration,
    ) -> Result<bool, StorefrontError> {
        match self.browser.wait_for_selector(selector, timeout).await {
            Ok(()) => Ok(true),
            Err(browser::BrowserError::Timeout(_, _)) => Ok(false),
            Err(err) => Err(err.into()),
        }
    }

    pub async fn take_screenshot(&self, name: &str) -> Result<PathBuf, StorefrontError> {
        let path = PathBuf::from(SCREENSHOT_DIR).join(format!("{name}.png"));
        let bytes = self.browser.screenshot().await?;

        tokio::fs::create_dir_all(SCREENSHOT_DIR)
            .await
            .map_err(|err| StorefrontError::ScreenshotFailed(path.display().to_string(), err))?;
        tokio::fs::write(&path, bytes)
            .await
            .map_err(|err| StorefrontError::ScreenshotFailed(path.display().to_string(), err))?;

        info!("Saved screenshot to {}", path.display());

        Ok(path)
    }

    pub async fn verify_footer_menu_exists(&self) -> Result<bool, StorefrontError> {
        self.is_element_visible(LayoutUi::FooterMenu.css()).await
    }

    pub async fn verify_footer_sections(
        &self,
    ) -> Result<Visibility<FooterSection>, StorefrontError> {
        let mut entries = Vec::new();

        for section in FooterSection::iter() {
            entries.push((section, self.is_element_visible(section.css()).await?));
        }

        Ok(Visibility { entries })
    }

    pub async fn verify_footer_links(&self) -> Result<Visibility<FooterLink>, StorefrontError> {
        let mut entries = Vec::new();

        for link in FooterLink::iter() {
            entries.push((link, self.is_element_visible(link.css()).await?));
        }

        Ok(Visibility { entries })
    }

    pub async fn verify_header_menu_exists(&self) -> Result<bool, StorefrontError> {
        self.is_element_visible(LayoutUi::HeaderMenu.css()).await
    }

    pub async fn verify_complete_header_ui(&self) -> Result<HeaderUi, StorefrontError> {
        Ok(HeaderUi {
            logo: self.is_element_visible(LayoutUi::HeaderLogo.css()).await?,
            search_box: SearchBoxUi {
                input: self.is_element_visible(LayoutUi::SearchInput.css()).await?,
                button: self.is_element_visible(LayoutUi::SearchButton.css()).await?,
            },
            shopping_cart: self.is_element_visible(LayoutUi::ShoppingCart.css()).await?,
            header_links: self.is_element_visible(LayoutUi::HeaderLinks.css()).await?,
        })
    }
}

#[cfg(test)]
mod tests {
    use browser::SnapshotBrowser;

    use super::*;

    #[test]
    fn relative_paths_join_the_base_url() {
        let browser = SnapshotBrowser::new();
        let page = BasePage::new(&browser).set_base_url("http://localhost:8080/");

        assert_eq!(page.url_for("/cart"), "http://localhost:8080/cart");
        assert_eq!(
            page.url_for("https://demowebshop.tricentis.com/books"),
            "https://demowebshop.tricentis.com/books"
        );
    }

    #[test]
    fn visibility_reports_hidden_entries() {
        let report = Visibility {
            entries: vec![(FooterLink::Sitemap, true), (FooterLink::Blog, false)],
        };

        assert!(report.is_visible(FooterLink::Sitemap));
        assert!(!report.is_visible(FooterLink::Blog));
        assert!(!report.is_visible(FooterLink::Cart));
        assert!(!report.all_visible());
        assert_eq!(report.hidden().collect::<Vec<_>>(), [FooterLink::Blog]);
    }

    #[test]
    fn header_needs_every_element() {
        let mut header = HeaderUi {
            logo: true,
            search_box: SearchBoxUi {
                input: true,
                button: true,
            },
            shopping_cart: true,
            header_links: true,
        };

        assert!(header.all_header_elements_visible());

        header.search_box.button = false;
        assert!(!header.all_header_elements_visible());
    }

    #[test]
    fn footer_names_are_readable() {
        assert_eq!(FooterSection::CustomerService.to_string(), "Customer Service");
        assert_eq!(FooterLink::ShippingReturns.to_string(), "Shipping Returns");
    }
}
