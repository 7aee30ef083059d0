use uuid::Uuid;

use crate::store::RepositoryError;

// ============================================================================
// Order Business Rule Errors
// ============================================================================

#[derive(Debug, thiserror::Error)]
pub enum OrderError {
    #[error("Customer not found: {0}")]
    CustomerNotFound(Uuid),

    #[error("Product not found: {0:?}")]
    ProductNotFound(Vec<Uuid>),

    #[error("Insufficient quantity for product {product_id}: requested {requested}, available {available}")]
    InsufficientQuantity {
        product_id: Uuid,
        requested: i32,
        available: i32,
    },

    #[error("Invalid quantity for product {product_id}: {quantity}")]
    InvalidQuantity { product_id: Uuid, quantity: i32 },

    #[error("Stock for product {product_id} changed while the order was placed")]
    StockConflict { product_id: Uuid },

    #[error(transparent)]
    Repository(RepositoryError),
}

impl OrderError {
    /// Short label used for metrics and logs
    pub fn reason(&self) -> &'static str {
        match self {
            OrderError::CustomerNotFound(_) => "customer_not_found",
            OrderError::ProductNotFound(_) => "product_not_found",
            OrderError::InsufficientQuantity { .. } => "insufficient_quantity",
            OrderError::InvalidQuantity { .. } => "invalid_quantity",
            OrderError::StockConflict { .. } => "stock_conflict",
            OrderError::Repository(_) => "repository",
        }
    }
}

impl From<RepositoryError> for OrderError {
    fn from(err: RepositoryError) -> Self {
        match err {
            RepositoryError::StockConflict { product_id, .. } => OrderError::StockConflict { product_id },
            other => OrderError::Repository(other),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stock_conflict_is_lifted_from_repository() {
        let product_id = Uuid::new_v4();
        let err: OrderError = RepositoryError::StockConflict { product_id, requested: 2 }.into();

        match err {
            OrderError::StockConflict { product_id: id } => assert_eq!(id, product_id),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_other_repository_errors_are_wrapped() {
        let err: OrderError = RepositoryError::MissingReference("customer".into()).into();
        assert!(matches!(err, OrderError::Repository(_)));
        assert_eq!(err.reason(), "repository");
    }

    #[test]
    fn test_insufficient_quantity_message() {
        let product_id = Uuid::new_v4();
        let err = OrderError::InsufficientQuantity { product_id, requested: 6, available: 5 };
        assert_eq!(
            err.to_string(),
            format!("Insufficient quantity for product {product_id}: requested 6, available 5")
        );
    }
}
