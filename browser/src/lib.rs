pub mod errors;
pub mod options;
pub mod snapshot;
pub mod status;
pub mod traits;
pub mod webdriver;

pub use errors::BrowserError;
pub use options::{BrowserKind, SessionOptions};
pub use snapshot::SnapshotBrowser;
pub use traits::Browser;
pub use webdriver::WebDriverBrowser;
