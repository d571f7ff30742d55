use std::sync::LazyLock;

use regex::Regex;
use tracing::{debug, trace};

// first number in the text: optional comma grouping, optional fraction
static PRICE_TOKEN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\d[\d,]*(?:\.\d+)?|\.\d+").expect("price regex is valid"));

static CART_QUANTITY: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\((\d+)\)").expect("cart quantity regex is valid"));

/// Best-effort currency parsing, never fails. Handles:
/// 1. "$1,234.56"
/// 2. "Sub-Total: 3310.00"
/// 3. "-5.00" (read as the magnitude 5.00)
///
/// Missing, empty and number-free text is 0. Malformed numbers are read up
/// to the point they stop making sense, so "1.2.3" is 1.2.
pub fn parse_price(text: Option<&str>) -> f64 {
    let Some(text) = text else {
        return 0.0;
    };

    let Some(token) = PRICE_TOKEN.find(text) else {
        trace!("No number in price text '{text}'");
        return 0.0;
    };

    let digits = token.as_str().replace(',', "");

    match digits.parse::<f64>() {
        Ok(value) => value.abs(),
        Err(_) => {
            debug!("Failed to parse price '{digits}' ({text})");
            0.0
        }
    }
}

/// Quantity field contents, `None` unless a whole positive number
pub(crate) fn parse_quantity(text: &str) -> Option<u32> {
    text.trim()
        .parse::<u32>()
        .ok()
        .filter(|quantity| *quantity > 0)
}

/// Header cart counter, "(3)" -> 3
pub(crate) fn parse_cart_quantity(text: &str) -> u32 {
    CART_QUANTITY
        .captures(text)
        .and_then(|captures| captures.get(1))
        .and_then(|count| count.as_str().parse().ok())
        .unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_currency_formats() {
        assert_eq!(parse_price(Some("$1,234.56")), 1234.56);
        assert_eq!(parse_price(Some("Sub-Total: 3310.00")), 3310.00);
        assert_eq!(parse_price(Some("  24.00 ")), 24.0);
        assert_eq!(parse_price(Some(".50")), 0.5);
        assert_eq!(parse_price(Some("Total: 1590")), 1590.0);
    }

    #[test]
    fn missing_or_empty_text_is_zero() {
        assert_eq!(parse_price(None), 0.0);
        assert_eq!(parse_price(Some("")), 0.0);
        assert_eq!(parse_price(Some("Calculated during checkout")), 0.0);
    }

    #[test]
    fn signs_are_dropped() {
        assert_eq!(parse_price(Some("-5.00")), 5.0);
        assert_eq!(parse_price(Some("Discount: -$12.50")), 12.5);
    }

    #[test]
    fn malformed_numbers_keep_the_leading_part() {
        assert_eq!(parse_price(Some("1.2.3")), 1.2);
        assert_eq!(parse_price(Some("12..5")), 12.0);
    }

    #[test]
    fn quantities_must_be_whole_numbers() {
        assert_eq!(parse_quantity(" 3 "), Some(3));
        assert_eq!(parse_quantity(""), None);
        assert_eq!(parse_quantity("2.5"), None);
        assert_eq!(parse_quantity("-1"), None);
        assert_eq!(parse_quantity("0"), None);
        assert_eq!(parse_quantity(" 00 "), None);
    }

    #[test]
    fn cart_counter_reads_parenthesised_number() {
        assert_eq!(parse_cart_quantity("Shopping cart (3)"), 3);
        assert_eq!(parse_cart_quantity("(0)"), 0);
        assert_eq!(parse_cart_quantity("Shopping cart"), 0);
    }
}
