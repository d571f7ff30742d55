use std::time::Duration;

use fantoccini::error::{CmdError, NewSessionError};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum BrowserError {
    #[error("Failed to start WebDriver session: {0}")]
    SessionStartFailed(#[from] NewSessionError),
    #[error("WebDriver command failed: {0}")]
    CommandFailed(#[from] CmdError),
    #[error("WebDriver status request failed")]
    StatusMiddlewareError(#[from] reqwest_middleware::Error),
    #[error("WebDriver status request failed")]
    StatusRequestError(#[from] reqwest::Error),
    #[error("WebDriver at {0} is not ready to create sessions")]
    DriverNotReady(String),
    #[error("No element matches selector '{0}'")]
    ElementNotFound(String),
    #[error("Selector '{0}' is not valid CSS")]
    InvalidSelector(String),
    #[error("Element '{0}' has no option '{1}'")]
    MissingOption(String, String),
    #[error("Timed out after {1:?} waiting for '{0}'")]
    Timeout(String, Duration),
    #[error("Failed to parse URL '{0}'")]
    InvalidUrl(String),
    #[error("No snapshot registered for path '{0}'")]
    UnknownPage(String),
}
