use serde::{Deserialize, Serialize};
use uuid::Uuid;
use super::value_objects::RequestedProduct;

// ============================================================================
// Order Commands - Represent user intent
// ============================================================================

/// Place a new order for an existing customer
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateOrder {
    pub customer_id: Uuid,
    pub products: Vec<RequestedProduct>,
}

/// Look up a single order with its line items
#[derive(Debug, Clone, Copy)]
pub struct FindOrder {
    pub id: Uuid,
}
