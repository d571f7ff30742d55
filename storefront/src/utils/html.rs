use browser::Browser;
use tracing::error;

use crate::errors::StorefrontError;

/// Trimmed `textContent`, empty when the element has none
pub(crate) async fn element_to_text<B: Browser>(
    browser: &B,
    element: &B::Element,
) -> Result<String, StorefrontError> {
    let text = browser.text_content(element).await?;

    Ok(text.unwrap_or_default().trim().into())
}

pub(crate) async fn element_extract_attr<B: Browser>(
    browser: &B,
    element: &B::Element,
    attr_name: &str,
) -> Result<Option<String>, StorefrontError> {
    let value = browser.attribute(element, attr_name).await?;

    Ok(value.map(|value| value.trim().to_string()))
}

pub(crate) async fn extract_element_from_element<B: Browser>(
    browser: &B,
    element: &B::Element,
    query_string: &str,
) -> Result<B::Element, StorefrontError> {
    let Some(query_element) = browser.query_within(element, query_string).await? else {
        error!("Failed to find element '{query_string}' in parent element");

        return Err(StorefrontError::HtmlMissingElement(query_string.into()));
    };

    Ok(query_element)
}

/// Like [`extract_element_from_element`] but absence is not an error
pub(crate) async fn find_in_element<B: Browser>(
    browser: &B,
    element: &B::Element,
    query_string: &str,
) -> Result<Option<B::Element>, StorefrontError> {
    Ok(browser.query_within(element, query_string).await?)
}
