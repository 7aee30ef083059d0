// ============================================================================
// Storage Layer - Repository traits and backends
// ============================================================================
//
// The order workflows talk to storage only through the traits below.
//
// Backends:
// - postgres  - sqlx / PostgreSQL, schema managed by ./migrations
// - in_memory - HashMap-backed store for tests and local demos
//
// ============================================================================

mod error;
pub mod in_memory;
pub mod postgres;
pub mod schema;

use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::customer::Customer;
use crate::domain::order::{NewOrder, Order, RequestedProduct};
use crate::domain::product::Product;

pub use error::{RepositoryError, RepositoryResult};
pub use in_memory::InMemoryStore;
pub use postgres::PgStore;

/// Read access to customers
#[async_trait]
pub trait CustomerRepository: Send + Sync {
    async fn find_by_id(&self, id: Uuid) -> RepositoryResult<Option<Customer>>;
}

/// Product lookup and stock mutation
#[async_trait]
pub trait ProductRepository: Send + Sync {
    /// Fetch every product whose id appears in `products`, in request order.
    /// Ids that do not exist are simply absent from the result.
    async fn find_all_by_id(&self, products: &[RequestedProduct]) -> RepositoryResult<Vec<Product>>;

    /// Decrement stock for each entry. A decrement only applies while the
    /// current stock covers it; otherwise nothing is changed and
    /// `StockConflict` is returned.
    async fn update_quantity(&self, products: &[RequestedProduct]) -> RepositoryResult<()>;
}

/// Order aggregate persistence
#[async_trait]
pub trait OrderRepository: Send + Sync {
    /// Insert the order header and all of its line items
    async fn create(&self, order: NewOrder) -> RepositoryResult<Order>;

    async fn find_by_id(&self, id: Uuid) -> RepositoryResult<Option<Order>>;
}

/// Writes an order and its stock decrements as one atomic unit
#[async_trait]
pub trait OrderUnitOfWork: Send + Sync {
    async fn place_order(
        &self,
        order: NewOrder,
        decrements: &[RequestedProduct],
    ) -> RepositoryResult<Order>;
}
