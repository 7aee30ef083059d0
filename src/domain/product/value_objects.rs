use serde::{Deserialize, Serialize};
use uuid::Uuid;
use chrono::{DateTime, Utc};
use rust_decimal::{Decimal, RoundingStrategy};

// ============================================================================
// Product Value Objects
// ============================================================================

/// Number of fractional digits kept for every monetary amount
pub const PRICE_SCALE: u32 = 2;

/// Normalise a price to two fractional digits, rounding half away from zero
/// like Postgres does when storing into `decimal(18, 2)`.
pub fn normalize_price(price: Decimal) -> Decimal {
    let mut price = price.round_dp_with_strategy(PRICE_SCALE, RoundingStrategy::MidpointAwayFromZero);
    price.rescale(PRICE_SCALE);
    price
}

/// Product record with its current price and available stock
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    pub id: Uuid,
    pub name: String,
    pub price: Decimal,
    pub quantity: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Product {
    pub fn new(name: impl Into<String>, price: Decimal, quantity: i32) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            price: normalize_price(price),
            quantity,
            created_at: now,
            updated_at: now,
        }
    }

    /// True when `requested` units can be taken from the current stock
    pub fn has_stock_for(&self, requested: i32) -> bool {
        requested <= self.quantity
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_normalize_price_pads_scale() {
        let price = normalize_price(dec!(10));
        assert_eq!(price.scale(), 2);
        assert_eq!(price.to_string(), "10.00");
    }

    #[test]
    fn test_normalize_price_rounds_extra_digits() {
        assert_eq!(normalize_price(dec!(9.999)).to_string(), "10.00");
        assert_eq!(normalize_price(dec!(1.234)).to_string(), "1.23");
    }

    #[test]
    fn test_has_stock_for_boundary() {
        let product = Product::new("Keyboard", dec!(10.00), 5);

        assert!(product.has_stock_for(4));
        assert!(product.has_stock_for(5));
        assert!(!product.has_stock_for(6));
    }

    #[test]
    fn test_product_price_serialized_as_string() {
        let product = Product::new("Mouse", dec!(19.9), 1);
        let json = serde_json::to_value(&product).unwrap();
        assert_eq!(json["price"], "19.90");
    }
}
