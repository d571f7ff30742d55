use std::time::Duration;

use async_trait::async_trait;
use fantoccini::{
    Client, ClientBuilder, Locator,
    elements::Element,
    error::{CmdError, ErrorStatus},
    wd::TimeoutConfiguration,
};
use serde_json::Value;
use tokio::time::{Instant, sleep};
use tracing::{debug, info, warn};

use crate::{
    errors::BrowserError,
    options::SessionOptions,
    traits::Browser,
};

const POLL_INTERVAL_MILLIS: u64 = 100;

// demowebshop posts cart and checkout steps through jQuery ajax
const NETWORK_IDLE_SCRIPT: &str = "return document.readyState === 'complete' \
     && (typeof window.jQuery === 'undefined' || window.jQuery.active === 0);";

/// A live browser session driven over the W3C WebDriver protocol
pub struct WebDriverBrowser {
    client: Client,
    options: SessionOptions,
}

impl WebDriverBrowser {
    pub async fn connect(options: SessionOptions) -> Result<Self, BrowserError> {
        info!(
            "Starting {} session on {}",
            options.kind(),
            options.webdriver_url()
        );

        let client = ClientBuilder::native()
            .capabilities(options.capabilities())
            .connect(options.webdriver_url())
            .await?;

        client
            .update_timeouts(TimeoutConfiguration::new(
                Some(options.action_timeout),
                Some(options.navigation_timeout),
                None,
            ))
            .await?;

        Ok(Self { client, options })
    }

    async fn find_first(&self, selector: &str) -> Result<Option<Element>, BrowserError> {
        match self.client.find(Locator::Css(selector)).await {
            Ok(element) => Ok(Some(element)),
            Err(err) if err.is_no_such_element() => Ok(None),
            Err(err) => Err(err.into()),
        }
    }

    async fn find_required(&self, selector: &str) -> Result<Element, BrowserError> {
        let Some(element) = self.find_first(selector).await? else {
            return Err(BrowserError::ElementNotFound(selector.into()));
        };

        Ok(element)
    }

    async fn poll_script(&self, script: &str, timeout: Duration) -> Result<(), BrowserError> {
        let deadline = Instant::now() + timeout;

        loop {
            let result = self.client.execute(script, Vec::new()).await?;

            if result == Value::Bool(true) {
                return Ok(());
            }

            if Instant::now() >= deadline {
                return Err(BrowserError::Timeout(script.into(), timeout));
            }

            sleep(Duration::from_millis(POLL_INTERVAL_MILLIS)).await;
        }
    }
}

fn no_such_element_as_none<T>(result: Result<T, CmdError>) -> Result<Option<T>, BrowserError> {
    match result {
        Ok(value) => Ok(Some(value)),
        Err(err) if err.is_no_such_element() => Ok(None),
        Err(err) => Err(err.into()),
    }
}

#[async_trait]
impl Browser for WebDriverBrowser {
    type Element = Element;

    async fn navigate(&self, url: &str) -> Result<(), BrowserError> {
        debug!("Navigating to {url}");

        Ok(self.client.goto(url).await?)
    }

    async fn wait_for_network_idle(&self) -> Result<(), BrowserError> {
        self.poll_script(NETWORK_IDLE_SCRIPT, self.options.navigation_timeout)
            .await
    }

    async fn title(&self) -> Result<String, BrowserError> {
        Ok(self.client.title().await?)
    }

    async fn query(&self, selector: &str) -> Result<Option<Element>, BrowserError> {
        self.find_first(selector).await
    }

    async fn query_all(&self, selector: &str) -> Result<Vec<Element>, BrowserError> {
        Ok(self.client.find_all(Locator::Css(selector)).await?)
    }

    async fn query_within(
        &self,
        parent: &Element,
        selector: &str,
    ) -> Result<Option<Element>, BrowserError> {
        no_such_element_as_none(parent.find(Locator::Css(selector)).await)
    }

    async fn query_all_within(
        &self,
        parent: &Element,
        selector: &str,
    ) -> Result<Vec<Element>, BrowserError> {
        Ok(parent.find_all(Locator::Css(selector)).await?)
    }

    async fn text_content(&self, element: &Element) -> Result<Option<String>, BrowserError> {
        Ok(element.prop("textContent").await?)
    }

    async fn input_value(&self, element: &Element) -> Result<String, BrowserError> {
        Ok(element.prop("value").await?.unwrap_or_default())
    }

    async fn attribute(&self, element: &Element, name: &str) -> Result<Option<String>, BrowserError> {
        Ok(element.attr(name).await?)
    }

    async fn is_visible(&self, selector: &str) -> Result<bool, BrowserError> {
        let Some(element) = self.find_first(selector).await? else {
            return Ok(false);
        };

        // the node can be swapped out by an ajax refresh between find and check
        match element.is_displayed().await {
            Ok(displayed) => Ok(displayed),
            Err(CmdError::Standard(err)) if matches!(err.error, ErrorStatus::StaleElementReference) => {
                Ok(false)
            }
            Err(err) => Err(err.into()),
        }
    }

    async fn wait_for_selector(&self, selector: &str, timeout: Duration) -> Result<(), BrowserError> {
        let deadline = Instant::now() + timeout;

        loop {
            if self.is_visible(selector).await? {
                return Ok(());
            }

            if Instant::now() >= deadline {
                return Err(BrowserError::Timeout(selector.into(), timeout));
            }

            sleep(Duration::from_millis(POLL_INTERVAL_MILLIS)).await;
        }
    }

    async fn click(&self, selector: &str) -> Result<(), BrowserError> {
        let element = self.find_required(selector).await?;

        Ok(element.click().await?)
    }

    async fn click_element(&self, element: &Element) -> Result<(), BrowserError> {
        Ok(element.click().await?)
    }

    async fn fill(&self, selector: &str, value: &str) -> Result<(), BrowserError> {
        let element = self.find_required(selector).await?;

        self.fill_element(&element, value).await
    }

    async fn fill_element(&self, element: &Element, value: &str) -> Result<(), BrowserError> {
        element.clear().await?;
        element.send_keys(value).await?;

        Ok(())
    }

    async fn set_checked(&self, selector: &str, checked: bool) -> Result<(), BrowserError> {
        let element = self.find_required(selector).await?;

        self.set_element_checked(&element, checked).await
    }

    async fn set_element_checked(&self, element: &Element, checked: bool) -> Result<(), BrowserError> {
        if element.is_selected().await? != checked {
            element.click().await?;
        }

        Ok(())
    }

    async fn select_option(&self, selector: &str, value: &str) -> Result<(), BrowserError> {
        let element = self.find_required(selector).await?;

        match element.select_by_value(value).await {
            Ok(()) => Ok(()),
            Err(err) if err.is_no_such_element() => {
                match element.select_by_label(value).await {
                    Ok(()) => Ok(()),
                    Err(err) if err.is_no_such_element() => {
                        warn!("{selector} has no option matching '{value}'");
                        Err(BrowserError::MissingOption(selector.into(), value.into()))
                    }
                    Err(err) => Err(err.into()),
                }
            }
            Err(err) => Err(err.into()),
        }
    }

    async fn screenshot(&self) -> Result<Vec<u8>, BrowserError> {
        Ok(self.client.screenshot().await?)
    }

    async fn close(&self) -> Result<(), BrowserError> {
        debug!("Closing {} session", self.options.kind());

        Ok(self.client.clone().close().await?)
    }
}
