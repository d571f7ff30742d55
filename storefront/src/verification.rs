use common::cart::{ItemVerification, LineItem, OrderAggregates, VerificationReport};
use tracing::{debug, warn};

// share of epsilon below which a remaining margin is float noise
const BOUNDARY_NOISE: f64 = 1e-9;

/// Largest absolute difference between an expected and a displayed value
/// that still counts as equal. The comparison is strict: a difference of
/// exactly `epsilon`, or within float noise of it, is a mismatch.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Tolerance {
    epsilon: f64,
}

impl Tolerance {
    pub const CENT: Tolerance = Tolerance { epsilon: 0.01 };

    pub fn new(epsilon: f64) -> Self {
        Self {
            epsilon: epsilon.abs(),
        }
    }

    pub fn epsilon(&self) -> f64 {
        self.epsilon
    }

    pub fn matches(&self, expected: f64, actual: f64) -> bool {
        let difference = (expected - actual).abs();

        difference < self.epsilon && self.epsilon - difference > self.epsilon * BOUNDARY_NOISE
    }
}

impl Default for Tolerance {
    fn default() -> Self {
        Tolerance::CENT
    }
}

/// Cross-checks scraped line items against the displayed order aggregates
/// with a one cent tolerance
pub fn verify(items: &[LineItem], aggregates: &OrderAggregates) -> VerificationReport {
    verify_with_tolerance(items, aggregates, Tolerance::CENT)
}

pub fn verify_with_tolerance(
    items: &[LineItem],
    aggregates: &OrderAggregates,
    tolerance: Tolerance,
) -> VerificationReport {
    let items: Vec<ItemVerification> = items
        .iter()
        .map(|item| {
            let expected_subtotal = item.expected_subtotal();
            let is_correct = tolerance.matches(expected_subtotal, item.subtotal);

            if !is_correct {
                warn!(
                    "{}: {} x ${:.2} = ${:.2}, cart shows ${:.2}",
                    item.name, item.quantity, item.unit_price, expected_subtotal, item.subtotal
                );
            }

            ItemVerification {
                name: item.name.clone(),
                unit_price: item.unit_price,
                quantity: item.quantity,
                expected_subtotal,
                actual_subtotal: item.subtotal,
                is_correct,
            }
        })
        .collect();

    let calculated_subtotal: f64 = items.iter().map(|item| item.actual_subtotal).sum();
    let subtotal_match = tolerance.matches(calculated_subtotal, aggregates.subtotal);

    let expected_total =
        aggregates.subtotal + aggregates.shipping + aggregates.tax - aggregates.discount;
    let total_match = tolerance.matches(expected_total, aggregates.total);

    let all_calculations_correct =
        items.iter().all(|item| item.is_correct) && subtotal_match && total_match;

    debug!(
        "Verified {} items: subtotal match {subtotal_match}, total match {total_match}",
        items.len()
    );

    VerificationReport {
        items,
        calculated_subtotal,
        order_subtotal: aggregates.subtotal,
        subtotal_match,
        shipping: aggregates.shipping,
        tax: aggregates.tax,
        discount: aggregates.discount,
        expected_total,
        order_total: aggregates.total,
        total_match,
        all_calculations_correct,
    }
}
