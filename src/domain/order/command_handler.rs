use std::sync::Arc;
use std::time::Instant;

use crate::metrics::Metrics;
use crate::store::{CustomerRepository, OrderRepository, OrderUnitOfWork, ProductRepository};

use super::aggregate::{merge_requested, NewOrder, Order};
use super::commands::{CreateOrder, FindOrder};
use super::errors::OrderError;

// ============================================================================
// Order Command Handlers
// ============================================================================
//
// CreateOrder: Customer → Products → Validation → Unit of Work (order + stock)
// FindOrder:   Order store lookup
//
// ============================================================================

pub struct CreateOrderHandler {
    customers: Arc<dyn CustomerRepository>,
    products: Arc<dyn ProductRepository>,
    unit_of_work: Arc<dyn OrderUnitOfWork>,
    metrics: Arc<Metrics>,
}

impl CreateOrderHandler {
    pub fn new(
        customers: Arc<dyn CustomerRepository>,
        products: Arc<dyn ProductRepository>,
        unit_of_work: Arc<dyn OrderUnitOfWork>,
        metrics: Arc<Metrics>,
    ) -> Self {
        Self { customers, products, unit_of_work, metrics }
    }

    /// Validate the command against current stock and place the order.
    /// Nothing is written unless every check passes.
    pub async fn handle(&self, command: CreateOrder) -> Result<Order, OrderError> {
        let started = Instant::now();
        let customer_id = command.customer_id;
        let item_count = command.products.len();

        let result = self.execute(command).await;
        let elapsed = started.elapsed().as_secs_f64();

        match &result {
            Ok(order) => {
                self.metrics.record_order_created(elapsed, None);
                tracing::info!(
                    order_id = %order.id,
                    customer_id = %customer_id,
                    line_count = order.products.len(),
                    total = %order.total(),
                    "✅ Order created"
                );
            }
            Err(err) => {
                self.metrics.record_order_created(elapsed, Some(err.reason()));
                tracing::warn!(
                    customer_id = %customer_id,
                    item_count = item_count,
                    reason = err.reason(),
                    error = %err,
                    "Order creation rejected"
                );
            }
        }

        result
    }

    async fn execute(&self, command: CreateOrder) -> Result<Order, OrderError> {
        let customer = self
            .customers
            .find_by_id(command.customer_id)
            .await?
            .ok_or(OrderError::CustomerNotFound(command.customer_id))?;

        let requested = merge_requested(&command.products)?;

        let stock = self.products.find_all_by_id(&requested).await?;
        tracing::debug!(
            customer_id = %customer.id,
            requested = requested.len(),
            found = stock.len(),
            "Loaded product stock"
        );

        let new_order = NewOrder::from_stock(customer.id, &requested, &stock)?;

        let order = self.unit_of_work.place_order(new_order, &requested).await?;
        Ok(order)
    }
}

pub struct FindOrderHandler {
    orders: Arc<dyn OrderRepository>,
    metrics: Arc<Metrics>,
}

impl FindOrderHandler {
    pub fn new(orders: Arc<dyn OrderRepository>, metrics: Arc<Metrics>) -> Self {
        Self { orders, metrics }
    }

    /// `Ok(None)` when no order has this id
    pub async fn handle(&self, query: FindOrder) -> Result<Option<Order>, OrderError> {
        let order = self.orders.find_by_id(query.id).await?;

        self.metrics.record_order_lookup(order.is_some());
        tracing::debug!(order_id = %query.id, found = order.is_some(), "Order lookup");

        Ok(order)
    }
}

// ============================================================================
// Unit Tests
// ============================================================================
