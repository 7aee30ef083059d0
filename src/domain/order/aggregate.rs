use serde::{Deserialize, Serialize};
use uuid::Uuid;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;

use crate::domain::product::{normalize_price, Product};
use super::value_objects::{NewOrderLine, OrderLineItem, RequestedProduct};
use super::errors::OrderError;

// ============================================================================
// Order Aggregate - Domain Logic
// ============================================================================

/// Persisted order: header plus the line items it owns
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Order {
    // Identity
    pub id: Uuid,
    pub customer_id: Uuid,

    // Owned line items, ordered by product id
    pub products: Vec<OrderLineItem>,

    // Audit Trail
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Order {
    pub fn total(&self) -> Decimal {
        self.products.iter().map(OrderLineItem::subtotal).sum()
    }

    pub fn line_for(&self, product_id: Uuid) -> Option<&OrderLineItem> {
        self.products.iter().find(|line| line.product_id == product_id)
    }
}

/// Order that passed validation and is ready to be written
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewOrder {
    pub customer_id: Uuid,
    pub products: Vec<NewOrderLine>,
}

impl NewOrder {
    /// Validate the requested quantities against the stock that was looked up
    /// and snapshot each product's current price into a line.
    ///
    /// `requested` is expected to be merged already (see [`merge_requested`]).
    /// Every requested id must appear in `stock`, otherwise the order fails
    /// with `ProductNotFound` listing the ids that did not resolve.
    pub fn from_stock(
        customer_id: Uuid,
        requested: &[RequestedProduct],
        stock: &[Product],
    ) -> Result<Self, OrderError> {
        if stock.is_empty() {
            return Err(OrderError::ProductNotFound(
                requested.iter().map(|r| r.id).collect(),
            ));
        }

        let missing: Vec<Uuid> = requested
            .iter()
            .filter(|r| !stock.iter().any(|p| p.id == r.id))
            .map(|r| r.id)
            .collect();
        if !missing.is_empty() {
            return Err(OrderError::ProductNotFound(missing));
        }

        let mut lines = Vec::with_capacity(stock.len());
        for product in stock {
            let Some(wanted) = requested.iter().find(|r| r.id == product.id) else {
                tracing::warn!(product_id = %product.id, "Lookup returned a product that was not requested");
                continue;
            };

            if !product.has_stock_for(wanted.quantity) {
                return Err(OrderError::InsufficientQuantity {
                    product_id: product.id,
                    requested: wanted.quantity,
                    available: product.quantity,
                });
            }

            lines.push(NewOrderLine {
                product_id: product.id,
                price: normalize_price(product.price),
                quantity: wanted.quantity,
            });
        }

        lines.sort_by_key(|line| line.product_id);
        Ok(Self { customer_id, products: lines })
    }

    /// Materialise the order with fresh ids and timestamps.
    /// Used by stores that do not generate them server-side.
    pub fn into_order(self, order_id: Uuid, now: DateTime<Utc>) -> Order {
        let products = self
            .products
            .into_iter()
            .map(|line| OrderLineItem {
                id: Uuid::new_v4(),
                order_id,
                product_id: line.product_id,
                price: line.price,
                quantity: line.quantity,
                created_at: now,
                updated_at: now,
            })
            .collect();

        Order {
            id: order_id,
            customer_id: self.customer_id,
            products,
            created_at: now,
            updated_at: now,
        }
    }
}

/// Reject non-positive quantities and fold duplicate ids into one entry,
/// keeping the position of the first occurrence.
pub fn merge_requested(requested: &[RequestedProduct]) -> Result<Vec<RequestedProduct>, OrderError> {
    let mut merged: Vec<RequestedProduct> = Vec::with_capacity(requested.len());

    for item in requested {
        if item.quantity <= 0 {
            return Err(OrderError::InvalidQuantity {
                product_id: item.id,
                quantity: item.quantity,
            });
        }

        match merged.iter_mut().find(|m| m.id == item.id) {
            Some(existing) => {
                existing.quantity = existing.quantity.checked_add(item.quantity).ok_or(
                    OrderError::InvalidQuantity {
                        product_id: item.id,
                        quantity: item.quantity,
                    },
                )?;
            }
            None => merged.push(item.clone()),
        }
    }

    Ok(merged)
}

// ============================================================================
// Unit Tests
// ============================================================================
