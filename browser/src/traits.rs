use std::time::Duration;

use async_trait::async_trait;
use tokio::time::Instant;

use crate::errors::BrowserError;

const ANY_SELECTOR_POLL_MILLIS: u64 = 100;

/// Capability set every page object is written against.
///
/// Element handles are opaque to callers; they are only valid for the
/// session that produced them.
#[async_trait]
pub trait Browser: Send + Sync {
    type Element: Clone + Send + Sync;

    async fn navigate(&self, url: &str) -> Result<(), BrowserError>;

    /// Resolves once the document is complete and no XHR is in flight.
    async fn wait_for_network_idle(&self) -> Result<(), BrowserError>;

    async fn title(&self) -> Result<String, BrowserError>;

    async fn query(&self, selector: &str) -> Result<Option<Self::Element>, BrowserError>;

    async fn query_all(&self, selector: &str) -> Result<Vec<Self::Element>, BrowserError>;

    async fn query_within(
        &self,
        parent: &Self::Element,
        selector: &str,
    ) -> Result<Option<Self::Element>, BrowserError>;

    async fn query_all_within(
        &self,
        parent: &Self::Element,
        selector: &str,
    ) -> Result<Vec<Self::Element>, BrowserError>;

    async fn text_content(&self, element: &Self::Element) -> Result<Option<String>, BrowserError>;

    async fn input_value(&self, element: &Self::Element) -> Result<String, BrowserError>;

    async fn attribute(
        &self,
        element: &Self::Element,
        name: &str,
    ) -> Result<Option<String>, BrowserError>;

    async fn is_visible(&self, selector: &str) -> Result<bool, BrowserError>;

    async fn wait_for_selector(&self, selector: &str, timeout: Duration)
    -> Result<(), BrowserError>;

    async fn click(&self, selector: &str) -> Result<(), BrowserError>;

    async fn click_element(&self, element: &Self::Element) -> Result<(), BrowserError>;

    async fn fill(&self, selector: &str, value: &str) -> Result<(), BrowserError>;

    async fn fill_element(&self, element: &Self::Element, value: &str)
    -> Result<(), BrowserError>;

    async fn set_checked(&self, selector: &str, checked: bool) -> Result<(), BrowserError>;

    async fn set_element_checked(
        &self,
        element: &Self::Element,
        checked: bool,
    ) -> Result<(), BrowserError>;

    /// Selects by option value first, then by visible label
    async fn select_option(&self, selector: &str, value: &str) -> Result<(), BrowserError>;

    async fn screenshot(&self) -> Result<Vec<u8>, BrowserError>;

    async fn close(&self) -> Result<(), BrowserError>;

    /// `textContent` of the first element matching `selector`, `None` when absent
    async fn text_of(&self, selector: &str) -> Result<Option<String>, BrowserError> {
        match self.query(selector).await? {
            Some(element) => self.text_content(&element).await,
            None => Ok(None),
        }
    }

    /// Index of the first of `selectors` to become visible
    async fn wait_for_any_selector(
        &self,
        selectors: &[&str],
        timeout: Duration,
    ) -> Result<usize, BrowserError> {
        let deadline = Instant::now() + timeout;

        loop {
            for (index, selector) in selectors.iter().enumerate() {
                if self.is_visible(selector).await? {
                    return Ok(index);
                }
            }

            if Instant::now() >= deadline {
                return Err(BrowserError::Timeout(selectors.join(" | "), timeout));
            }

            self.pause(Duration::from_millis(ANY_SELECTOR_POLL_MILLIS)).await;
        }
    }

    async fn pause(&self, duration: Duration) {
        tokio::time::sleep(duration).await;
    }
}
