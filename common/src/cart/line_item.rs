use serde::{Deserialize, Serialize};

/// One cart row as the storefront displays it
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LineItem {
    pub name: String,
    pub unit_price: f64,
    pub quantity: u32,
    /// Displayed line total, never recomputed here
    pub subtotal: f64,
}

impl LineItem {
    pub fn new(name: impl Into<String>, unit_price: f64, quantity: u32, subtotal: f64) -> Self {
        Self {
            name: name.into().trim().to_string(),
            unit_price,
            quantity,
            subtotal,
        }
    }

    pub fn expected_subtotal(&self) -> f64 {
        self.unit_price * f64::from(self.quantity)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn name_is_trimmed() {
        let item = LineItem::new("\n   Fiction  \t", 24.0, 2, 48.0);

        assert_eq!(item.name, "Fiction");
        assert_eq!(item.expected_subtotal(), 48.0);
    }
}
