use browser::BrowserError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum StorefrontError {
    #[error("Browser interaction failed: {0}")]
    BrowserFailed(#[from] BrowserError),
    #[error("Missing element {0} from page")]
    HtmlMissingElement(String),
    #[error("{0} at index {1} not found")]
    IndexOutOfRange(&'static str, usize),
    #[error("Category \"{0}\" not found")]
    UnknownCategory(String),
    #[error("{0} are required for this payment method")]
    MissingPaymentDetails(&'static str),
    #[error("Failed to write screenshot {0}")]
    ScreenshotFailed(String, #[source] std::io::Error),
}
