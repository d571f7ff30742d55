use std::path::Path;

use browser::SnapshotBrowser;
use common::cart::VerificationReport;
use storefront::pages::{BasePage, CartPage};
use tracing::info;

use crate::errors::JourneyError;

/// Scrapes, reads and verifies a cart page saved to disk
pub async fn verify_saved_cart(path: &Path) -> Result<VerificationReport, JourneyError> {
    let html = tokio::fs::read_to_string(path)
        .await
        .map_err(|err| JourneyError::SnapshotReadFailed(path.display().to_string(), err))?;

    info!("Verifying saved cart {}", path.display());

    let browser = SnapshotBrowser::from_html(html);
    let cart = CartPage::new(BasePage::new(&browser));

    Ok(cart.verify_price_calculations().await?)
}

pub fn render_report(report: &VerificationReport, json: bool) -> Result<String, JourneyError> {
    if json {
        return Ok(serde_json::to_string_pretty(report)?);
    }

    Ok(report.to_string())
}
