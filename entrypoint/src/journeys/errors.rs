use std::time::Duration;

use browser::BrowserError;
use common::errors::FixtureError;
use storefront::errors::StorefrontError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum JourneyError {
    #[error(transparent)]
    Storefront(#[from] StorefrontError),
    #[error(transparent)]
    Browser(#[from] BrowserError),
    #[error(transparent)]
    Fixture(#[from] FixtureError),
    #[error("Assertion failed: {0}")]
    AssertionFailed(String),
    #[error("Skipped: {0}")]
    Skipped(String),
    #[error("Test data needs {0}")]
    MissingTestData(&'static str),
    #[error("Journey did not finish within {0:?}")]
    TimedOut(Duration),
    #[error("Failed to read snapshot {0}")]
    SnapshotReadFailed(String, #[source] std::io::Error),
    #[error("Failed to encode report: {0}")]
    ReportEncodeFailed(#[from] serde_json::Error),
}

/// Logs the assertion and fails the journey when `$condition` is false
macro_rules! check {
    ($condition:expr, $($message:tt)+) => {{
        let passed: bool = $condition;
        let message = format!($($message)+);

        utils::steps::log_assertion(&message, passed, None);

        if !passed {
            return Err($crate::errors::JourneyError::AssertionFailed(message));
        }
    }};
}

pub(crate) use check;
