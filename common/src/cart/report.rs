use std::fmt::{Display, Formatter, Result};

use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ItemVerification {
    pub name: String,
    pub unit_price: f64,
    pub quantity: u32,
    pub expected_subtotal: f64,
    pub actual_subtotal: f64,
    pub is_correct: bool,
}

/// Outcome of one cart price verification pass
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VerificationReport {
    pub items: Vec<ItemVerification>,
    /// Sum of the displayed line subtotals
    pub calculated_subtotal: f64,
    pub order_subtotal: f64,
    pub subtotal_match: bool,
    pub shipping: f64,
    pub tax: f64,
    pub discount: f64,
    pub expected_total: f64,
    pub order_total: f64,
    pub total_match: bool,
    pub all_calculations_correct: bool,
}

impl VerificationReport {
    pub fn mismatched_items(&self) -> impl Iterator<Item = &ItemVerification> {
        self.items.iter().filter(|item| !item.is_correct)
    }
}

impl Display for VerificationReport {
    fn fmt(&self, format: &mut Formatter) -> Result {
        writeln!(format, "Price Verification Results:")?;
        writeln!(format, "===========================")?;

        for (index, item) in self.items.iter().enumerate() {
            writeln!(format, "Product {}: {}", index + 1, item.name)?;
            writeln!(format, "  Unit Price: ${:.2}", item.unit_price)?;
            writeln!(format, "  Quantity: {}", item.quantity)?;
            writeln!(format, "  Expected Subtotal: ${:.2}", item.expected_subtotal)?;
            writeln!(format, "  Actual Subtotal: ${:.2}", item.actual_subtotal)?;
            writeln!(format, "  Correct: {}", item.is_correct)?;
        }

        writeln!(format)?;
        writeln!(format, "Order Subtotal: ${:.2}", self.order_subtotal)?;
        writeln!(format, "Calculated Subtotal: ${:.2}", self.calculated_subtotal)?;
        writeln!(format, "Subtotal Match: {}", self.subtotal_match)?;
        writeln!(format, "Shipping: ${:.2}", self.shipping)?;
        writeln!(format, "Tax: ${:.2}", self.tax)?;
        writeln!(format, "Discount: ${:.2}", self.discount)?;
        writeln!(format, "Expected Total: ${:.2}", self.expected_total)?;
        writeln!(format, "Actual Total: ${:.2}", self.order_total)?;
        writeln!(format, "Total Match: {}", self.total_match)?;
        write!(
            format,
            "All Calculations Correct: {}",
            self.all_calculations_correct
        )
    }
}
