use std::{sync::OnceLock, time::Duration};

use reqwest::ClientBuilder as BaseClientBuilder;
use reqwest_middleware::{ClientBuilder as RetryableClientBuilder, ClientWithMiddleware};
use reqwest_retry::{RetryTransientMiddleware, policies::ExponentialBackoff};
use serde_json::Value;
use tracing::{debug, info};

use crate::errors::BrowserError;

const STATUS_TIMEOUT_SECONDS: u64 = 5;
const STATUS_MIN_MILLIS_BACKOFF: u64 = 250;
const STATUS_MAX_SECS_BACKOFF: u64 = 5;
const MAX_RETRY: u32 = 5;

static STATUS_CLIENT: OnceLock<ClientWithMiddleware> = OnceLock::new();

fn create_client() -> Result<&'static ClientWithMiddleware, BrowserError> {
    if let Some(client) = STATUS_CLIENT.get() {
        return Ok(client);
    }

    let base_client = BaseClientBuilder::new()
        .gzip(true)
        .timeout(Duration::from_secs(STATUS_TIMEOUT_SECONDS))
        .build()?;

    let retry_strat = ExponentialBackoff::builder()
        .retry_bounds(
            Duration::from_millis(STATUS_MIN_MILLIS_BACKOFF),
            Duration::from_secs(STATUS_MAX_SECS_BACKOFF),
        )
        .build_with_max_retries(MAX_RETRY);
    let retry_middleware = RetryTransientMiddleware::new_with_policy(retry_strat);

    let client = RetryableClientBuilder::new(base_client)
        .with(retry_middleware)
        .build();

    Ok(STATUS_CLIENT.get_or_init(|| client))
}

/// Reads `value.ready` out of a W3C `/status` response body
pub(crate) fn is_ready(status: &Value) -> bool {
    status
        .get("value")
        .and_then(|value| value.get("ready"))
        .and_then(Value::as_bool)
        .unwrap_or(false)
}

/// Blocks until the WebDriver server at `webdriver_url` reports it can
/// accept a new session. Connection failures are retried with backoff.
pub async fn wait_for_webdriver(webdriver_url: &str) -> Result<(), BrowserError> {
    let client = create_client()?;
    let status_url = format!("{}/status", webdriver_url.trim_end_matches('/'));

    info!("Checking WebDriver status at {status_url}");

    let response = client.get(&status_url).send().await?;
    let status = response.json::<Value>().await?;

    debug!("{status:?}");

    if !is_ready(&status) {
        return Err(BrowserError::DriverNotReady(webdriver_url.into()));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn ready_flag_is_read_from_value() {
        assert!(is_ready(&json!({ "value": { "ready": true, "message": "ok" } })));
        assert!(!is_ready(&json!({ "value": { "ready": false } })));
    }

    #[test]
    fn malformed_status_is_not_ready() {
        assert!(!is_ready(&json!({ "ready": true })));
        assert!(!is_ready(&json!([])));
    }
}
