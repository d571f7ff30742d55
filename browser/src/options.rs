use std::time::Duration;

use serde_json::{Map, Value, json};
use strum_macros::{Display, EnumString};

pub const DEFAULT_WEBDRIVER_URL: &str = "http://localhost:4444";

const VIEWPORT_WIDTH: u32 = 1280;
const VIEWPORT_HEIGHT: u32 = 720;
const ACTION_TIMEOUT_SECONDS: u64 = 15;
const NAVIGATION_TIMEOUT_SECONDS: u64 = 30;
const EXPECT_TIMEOUT_SECONDS: u64 = 10;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, EnumString)]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum BrowserKind {
    #[strum(to_string = "chrome", serialize = "chromium")]
    Chrome,
    Firefox,
    #[strum(to_string = "safari", serialize = "webkit")]
    Safari,
}

#[derive(Debug, Clone)]
pub struct SessionOptions {
    pub(crate) webdriver_url: String,
    pub(crate) kind: BrowserKind,
    pub(crate) headless: bool,
    pub(crate) viewport: (u32, u32),
    pub(crate) action_timeout: Duration,
    pub(crate) navigation_timeout: Duration,
    pub(crate) expect_timeout: Duration,
}

pub struct SessionOptionsBuilder {
    options: SessionOptions,
}

impl SessionOptions {
    pub fn builder() -> SessionOptionsBuilder {
        SessionOptionsBuilder::new()
    }

    pub fn webdriver_url(&self) -> &str {
        &self.webdriver_url
    }

    pub fn kind(&self) -> BrowserKind {
        self.kind
    }

    pub fn action_timeout(&self) -> Duration {
        self.action_timeout
    }

    pub fn expect_timeout(&self) -> Duration {
        self.expect_timeout
    }

    /// W3C capabilities for the new session request
    pub(crate) fn capabilities(&self) -> Map<String, Value> {
        let mut caps = Map::new();
        let window_size = format!("--window-size={},{}", self.viewport.0, self.viewport.1);

        match self.kind {
            BrowserKind::Chrome => {
                let mut args = vec![window_size, "--disable-gpu".to_string()];

                if self.headless {
                    args.push("--headless=new".into());
                }

                caps.insert("browserName".into(), json!("chrome"));
                caps.insert("goog:chromeOptions".into(), json!({ "args": args }));
            }
            BrowserKind::Firefox => {
                let mut args = vec![
                    format!("--width={}", self.viewport.0),
                    format!("--height={}", self.viewport.1),
                ];

                if self.headless {
                    args.push("-headless".into());
                }

                caps.insert("browserName".into(), json!("firefox"));
                caps.insert("moz:firefoxOptions".into(), json!({ "args": args }));
            }
            // safaridriver has no headless mode
            BrowserKind::Safari => {
                caps.insert("browserName".into(), json!("safari"));
            }
        }

        caps
    }
}

impl Default for SessionOptions {
    fn default() -> Self {
        Self {
            webdriver_url: DEFAULT_WEBDRIVER_URL.into(),
            kind: BrowserKind::Chrome,
            headless: false,
            viewport: (VIEWPORT_WIDTH, VIEWPORT_HEIGHT),
            action_timeout: Duration::from_secs(ACTION_TIMEOUT_SECONDS),
            navigation_timeout: Duration::from_secs(NAVIGATION_TIMEOUT_SECONDS),
            expect_timeout: Duration::from_secs(EXPECT_TIMEOUT_SECONDS),
        }
    }
}

impl Default for SessionOptionsBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl SessionOptionsBuilder {
    pub fn new() -> Self {
        Self {
            options: SessionOptions::default(),
        }
    }

    pub fn set_webdriver_url(mut self, url: impl Into<String>) -> Self {
        self.options.webdriver_url = url.into();

        self
    }

    pub fn set_kind(mut self, kind: BrowserKind) -> Self {
        self.options.kind = kind;

        self
    }

    pub fn set_headless(mut self, headless: bool) -> Self {
        self.options.headless = headless;

        self
    }

    pub fn set_viewport(mut self, width: u32, height: u32) -> Self {
        self.options.viewport = (width, height);

        self
    }

    pub fn set_action_timeout(mut self, timeout: Duration) -> Self {
        self.options.action_timeout = timeout;

        self
    }

    pub fn set_navigation_timeout(mut self, timeout: Duration) -> Self {
        self.options.navigation_timeout = timeout;

        self
    }

    pub fn set_expect_timeout(mut self, timeout: Duration) -> Self {
        self.options.expect_timeout = timeout;

        self
    }

    pub fn build(self) -> SessionOptions {
        self.options
    }
}

#[cfg(test)]
mod tests {
    use std::str::FromStr;

    use super::*;

    #[test]
    fn browser_kind_accepts_engine_aliases() {
        assert_eq!(BrowserKind::from_str("chromium").unwrap(), BrowserKind::Chrome);
        assert_eq!(BrowserKind::from_str("WebKit").unwrap(), BrowserKind::Safari);
        assert_eq!(BrowserKind::from_str("firefox").unwrap(), BrowserKind::Firefox);
        assert!(BrowserKind::from_str("opera").is_err());
    }

    #[test]
    fn headless_chrome_capabilities() {
        let options = SessionOptions::builder()
            .set_headless(true)
            .set_viewport(800, 600)
            .build();

        let caps = options.capabilities();
        let args = caps["goog:chromeOptions"]["args"].as_array().unwrap();

        assert_eq!(caps["browserName"], "chrome");
        assert!(args.contains(&json!("--headless=new")));
        assert!(args.contains(&json!("--window-size=800,600")));
    }

    #[test]
    fn headed_firefox_has_no_headless_flag() {
        let options = SessionOptions::builder()
            .set_kind(BrowserKind::Firefox)
            .build();

        let caps = options.capabilities();
        let args = caps["moz:firefoxOptions"]["args"].as_array().unwrap();

        assert!(!args.contains(&json!("-headless")));
        assert_eq!(options.action_timeout(), Duration::from_secs(15));
    }
}
