use serde::{Deserialize, Serialize};
use uuid::Uuid;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;

// ============================================================================
// Order Value Objects
// ============================================================================

/// A product id and the quantity the caller wants of it
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct RequestedProduct {
    pub id: Uuid,
    pub quantity: i32,
}

impl RequestedProduct {
    pub fn new(id: Uuid, quantity: i32) -> Self {
        Self { id, quantity }
    }
}

/// Line item that has been validated but not yet persisted
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct NewOrderLine {
    pub product_id: Uuid,
    pub price: Decimal,
    pub quantity: i32,
}

/// Persisted line item. `price` is the product price at order time.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct OrderLineItem {
    pub id: Uuid,
    pub order_id: Uuid,
    pub product_id: Uuid,
    pub price: Decimal,
    pub quantity: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl OrderLineItem {
    pub fn subtotal(&self) -> Decimal {
        self.price * Decimal::from(self.quantity)
    }
}

// ============================================================================
// Unit Tests
// ============================================================================
