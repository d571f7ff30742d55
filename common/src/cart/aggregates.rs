use serde::{Deserialize, Serialize};
use strum_macros::{Display, EnumIter};

/// Order-level summary values read off the cart totals table
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct OrderAggregates {
    pub subtotal: f64,
    pub shipping: f64,
    pub tax: f64,
    /// Magnitude of the discount, subtracted from the total
    pub discount: f64,
    pub total: f64,
}

/// The display regions an [`OrderAggregates`] is assembled from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumIter)]
#[strum(serialize_all = "lowercase")]
pub enum Aggregate {
    Subtotal,
    Shipping,
    Tax,
    Discount,
    Total,
}

impl Aggregate {
    /// Label of the totals row carrying this value
    pub const fn label(self) -> &'static str {
        match self {
            Aggregate::Subtotal => "Sub-Total:",
            Aggregate::Shipping => "Shipping:",
            Aggregate::Tax => "Tax:",
            Aggregate::Discount => "Discount:",
            Aggregate::Total => "Total:",
        }
    }
}

impl OrderAggregates {
    pub fn get(&self, aggregate: Aggregate) -> f64 {
        match aggregate {
            Aggregate::Subtotal => self.subtotal,
            Aggregate::Shipping => self.shipping,
            Aggregate::Tax => self.tax,
            Aggregate::Discount => self.discount,
            Aggregate::Total => self.total,
        }
    }

    pub fn set(&mut self, aggregate: Aggregate, value: f64) {
        match aggregate {
            Aggregate::Subtotal => self.subtotal = value,
            Aggregate::Shipping => self.shipping = value,
            Aggregate::Tax => self.tax = value,
            Aggregate::Discount => self.discount = value,
            Aggregate::Total => self.total = value,
        }
    }
}

#[cfg(test)]
mod tests {
    use strum::IntoEnumIterator;

    use super::*;

    #[test]
    fn set_then_get_covers_every_region() {
        let mut aggregates = OrderAggregates::default();

        for (position, aggregate) in Aggregate::iter().enumerate() {
            aggregates.set(aggregate, position as f64 + 1.0);
        }

        assert_eq!(aggregates.subtotal, 1.0);
        assert_eq!(aggregates.discount, 4.0);
        assert_eq!(aggregates.get(Aggregate::Total), 5.0);
    }

    #[test]
    fn total_label_is_distinct_from_sub_total() {
        assert_ne!(Aggregate::Total.label(), Aggregate::Subtotal.label());
        assert_eq!(Aggregate::Shipping.to_string(), "shipping");
        assert_eq!(Aggregate::Subtotal.to_string(), "subtotal");
    }
}
