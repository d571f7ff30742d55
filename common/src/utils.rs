use std::{
    env,
    time::{SystemTime, UNIX_EPOCH},
};

use chrono::{DateTime, Utc};
use rand::{Rng, distributions::Alphanumeric};

use crate::fixtures::ProductFixture;

pub const DEFAULT_PRICE_TOLERANCE: f64 = 0.01;

pub fn get_current_time_millis() -> u128 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|elapsed| elapsed.as_millis())
        .unwrap_or_default()
}

/// `{prefix}_{millis}_{0..1000}@test.com`, unique enough for parallel sessions
pub fn generate_unique_email(prefix: &str) -> String {
    let random: u16 = rand::thread_rng().gen_range(0..1000);

    format!("{prefix}_{}_{random}@test.com", get_current_time_millis())
}

pub fn generate_random_string(length: usize) -> String {
    rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(length)
        .map(char::from)
        .collect()
}

pub fn calculate_expected_total(products: &[ProductFixture]) -> f64 {
    products
        .iter()
        .map(|product| product.price * f64::from(product.quantity))
        .sum()
}

pub fn round_to_two_decimals(value: f64) -> f64 {
    ((value + f64::EPSILON) * 100.0).round() / 100.0
}

/// Inclusive comparison used by journey assertions. The verification engine
/// uses its own strict tolerance.
pub fn compare_prices(actual: f64, expected: f64, tolerance: f64) -> bool {
    (actual - expected).abs() <= tolerance
}

pub fn format_date(date: DateTime<Utc>) -> String {
    date.format("%Y-%m-%d %H:%M:%S").to_string()
}

/// Unset and empty variables both fall back
pub fn get_env_var(key: &str, fallback: &str) -> String {
    match env::var(key) {
        Ok(value) if !value.is_empty() => value,
        _ => fallback.into(),
    }
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;

    use super::*;

    fn product(price: f64, quantity: u32) -> ProductFixture {
        ProductFixture {
            name: "Book".into(),
            url: "/book".into(),
            price,
            quantity,
        }
    }

    #[test]
    fn unique_emails_carry_prefix_and_domain() {
        let email = generate_unique_email("testuser");

        assert!(email.starts_with("testuser_"));
        assert!(email.ends_with("@test.com"));
        assert_eq!(email.matches('_').count(), 2);
    }

    #[test]
    fn random_strings_are_alphanumeric() {
        let value = generate_random_string(12);

        assert_eq!(value.len(), 12);
        assert!(value.chars().all(|c| c.is_ascii_alphanumeric()));
    }

    #[test]
    fn expected_total_multiplies_quantities() {
        let products = [product(10.0, 2), product(24.0, 1), product(1590.0, 1)];

        assert_eq!(calculate_expected_total(&products), 1634.0);
        assert_eq!(calculate_expected_total(&[]), 0.0);
    }

    #[test]
    fn rounding_handles_binary_halves() {
        assert_eq!(round_to_two_decimals(1.005), 1.01);
        assert_eq!(round_to_two_decimals(3310.0), 3310.0);
        assert_eq!(round_to_two_decimals(0.1 + 0.2), 0.3);
    }

    #[test]
    fn compare_prices_is_inclusive() {
        assert!(compare_prices(10.0, 10.0, DEFAULT_PRICE_TOLERANCE));
        assert!(compare_prices(10.005, 10.0, DEFAULT_PRICE_TOLERANCE));
        assert!(!compare_prices(10.02, 10.0, DEFAULT_PRICE_TOLERANCE));
    }

    #[test]
    fn dates_format_without_timezone_suffix() {
        let date = Utc.with_ymd_and_hms(2024, 3, 9, 7, 5, 1).unwrap();

        assert_eq!(format_date(date), "2024-03-09 07:05:01");
    }

    #[test]
    fn env_fallback_applies_to_unset_keys() {
        assert_eq!(
            get_env_var("CARTCHECK_SURELY_UNSET_VARIABLE", "fallback"),
            "fallback"
        );
    }
}
