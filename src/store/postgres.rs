//! PostgreSQL store built on sqlx. Schema is managed by `./migrations`.

use async_trait::async_trait;
use chrono::NaiveDateTime;
use rust_decimal::Decimal;
use sqlx::postgres::{PgConnection, PgPool, PgPoolOptions};
use uuid::Uuid;

use crate::config::DatabaseConfig;
use crate::domain::customer::{Customer, Email};
use crate::domain::order::{NewOrder, Order, OrderLineItem, RequestedProduct};
use crate::domain::product::Product;
use super::schema::{ORDERS, ORDERS_PRODUCTS};
use super::{
    CustomerRepository, OrderRepository, OrderUnitOfWork, ProductRepository, RepositoryError,
    RepositoryResult,
};

// ============================================================================
// Row types
// ============================================================================
//
// The tables use `timestamp` (without time zone); values are read as
// NaiveDateTime and treated as UTC.
//
// ============================================================================

#[derive(sqlx::FromRow)]
struct CustomerRow {
    id: Uuid,
    name: String,
    email: String,
    created_at: NaiveDateTime,
    updated_at: NaiveDateTime,
}

impl From<CustomerRow> for Customer {
    fn from(row: CustomerRow) -> Self {
        Self {
            id: row.id,
            name: row.name,
            email: Email::new(row.email),
            created_at: row.created_at.and_utc(),
            updated_at: row.updated_at.and_utc(),
        }
    }
}

#[derive(sqlx::FromRow)]
struct ProductRow {
    id: Uuid,
    name: String,
    price: Decimal,
    quantity: i32,
    created_at: NaiveDateTime,
    updated_at: NaiveDateTime,
}

impl From<ProductRow> for Product {
    fn from(row: ProductRow) -> Self {
        Self {
            id: row.id,
            name: row.name,
            price: row.price,
            quantity: row.quantity,
            created_at: row.created_at.and_utc(),
            updated_at: row.updated_at.and_utc(),
        }
    }
}

#[derive(sqlx::FromRow)]
struct OrderRow {
    id: Uuid,
    customer_id: Uuid,
    created_at: NaiveDateTime,
    updated_at: NaiveDateTime,
}

#[derive(sqlx::FromRow)]
struct OrderLineRow {
    id: Uuid,
    product_id: Uuid,
    order_id: Uuid,
    quantity: i32,
    price: Decimal,
    created_at: NaiveDateTime,
    updated_at: NaiveDateTime,
}

impl From<OrderLineRow> for OrderLineItem {
    fn from(row: OrderLineRow) -> Self {
        Self {
            id: row.id,
            order_id: row.order_id,
            product_id: row.product_id,
            price: row.price,
            quantity: row.quantity,
            created_at: row.created_at.and_utc(),
            updated_at: row.updated_at.and_utc(),
        }
    }
}

// ============================================================================
// PgStore
// ============================================================================

#[derive(Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn connect(config: &DatabaseConfig) -> RepositoryResult<Self> {
        let pool = PgPoolOptions::new()
            .max_connections(config.max_connections)
            .connect(&config.url)
            .await?;

        tracing::info!(max_connections = config.max_connections, "Connected to PostgreSQL");
        Ok(Self::new(pool))
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    /// Apply pending migrations from ./migrations
    pub async fn migrate(&self) -> RepositoryResult<()> {
        tracing::info!("Running database migrations");
        sqlx::migrate!("./migrations").run(&self.pool).await?;
        tracing::info!("Database migrations completed");
        Ok(())
    }
}

async fn insert_order(conn: &mut PgConnection, order: NewOrder) -> RepositoryResult<Order> {
    let order_id = Uuid::new_v4();

    let (created_at, updated_at): (NaiveDateTime, NaiveDateTime) = sqlx::query_as(
        "INSERT INTO orders (id, customer_id) VALUES ($1, $2) RETURNING created_at, updated_at",
    )
    .bind(order_id)
    .bind(order.customer_id)
    .fetch_one(&mut *conn)
    .await?;

    let mut products = Vec::with_capacity(order.products.len());
    for line in order.products {
        let line_id = Uuid::new_v4();
        let (line_created, line_updated): (NaiveDateTime, NaiveDateTime) = sqlx::query_as(
            "INSERT INTO orders_products (id, product_id, order_id, quantity, price)
             VALUES ($1, $2, $3, $4, $5)
             RETURNING created_at, updated_at",
        )
        .bind(line_id)
        .bind(line.product_id)
        .bind(order_id)
        .bind(line.quantity)
        .bind(line.price)
        .fetch_one(&mut *conn)
        .await?;

        products.push(OrderLineItem {
            id: line_id,
            order_id,
            product_id: line.product_id,
            price: line.price,
            quantity: line.quantity,
            created_at: line_created.and_utc(),
            updated_at: line_updated.and_utc(),
        });
    }

    tracing::debug!(
        order_id = %order_id,
        customer_id = %order.customer_id,
        line_count = products.len(),
        "Inserted order rows"
    );

    Ok(Order {
        id: order_id,
        customer_id: order.customer_id,
        products,
        created_at: created_at.and_utc(),
        updated_at: updated_at.and_utc(),
    })
}

/// Conditional decrement: a row is only touched while it still has enough
/// stock, so zero affected rows means another order got there first.
///
/// Rows are updated in product id order so concurrent orders lock them in the
/// same sequence.
async fn decrement_stock(conn: &mut PgConnection, decrements: &[RequestedProduct]) -> RepositoryResult<()> {
    let mut ordered: Vec<&RequestedProduct> = decrements.iter().collect();
    ordered.sort_by_key(|item| item.id);

    for item in ordered {
        let result = sqlx::query(
            "UPDATE products SET quantity = quantity - $1, updated_at = now()
             WHERE id = $2 AND quantity >= $1",
        )
        .bind(item.quantity)
        .bind(item.id)
        .execute(&mut *conn)
        .await?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::StockConflict {
                product_id: item.id,
                requested: item.quantity,
            });
        }
    }
    Ok(())
}

#[async_trait]
impl CustomerRepository for PgStore {
    async fn find_by_id(&self, id: Uuid) -> RepositoryResult<Option<Customer>> {
        let row: Option<CustomerRow> = sqlx::query_as(
            "SELECT id, name, email, created_at, updated_at FROM customers WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(Customer::from))
    }
}

#[async_trait]
impl ProductRepository for PgStore {
    async fn find_all_by_id(&self, products: &[RequestedProduct]) -> RepositoryResult<Vec<Product>> {
        let ids: Vec<Uuid> = products.iter().map(|p| p.id).collect();

        let rows: Vec<ProductRow> = sqlx::query_as(
            "SELECT id, name, price, quantity, created_at, updated_at
             FROM products
             WHERE id = ANY($1)
             ORDER BY array_position($1, id)",
        )
        .bind(&ids[..])
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(Product::from).collect())
    }

    async fn update_quantity(&self, products: &[RequestedProduct]) -> RepositoryResult<()> {
        let mut tx = self.pool.begin().await?;
        decrement_stock(&mut tx, products).await?;
        tx.commit().await?;
        Ok(())
    }
}

#[async_trait]
impl OrderRepository for PgStore {
    async fn create(&self, order: NewOrder) -> RepositoryResult<Order> {
        let mut tx = self.pool.begin().await?;
        let order = insert_order(&mut tx, order).await?;
        tx.commit().await?;
        Ok(order)
    }

    async fn find_by_id(&self, id: Uuid) -> RepositoryResult<Option<Order>> {
        let order_sql = format!("SELECT {} FROM {} WHERE id = $1", ORDERS.column_list(), ORDERS.name);
        let Some(header) = sqlx::query_as::<_, OrderRow>(&order_sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
        else {
            return Ok(None);
        };

        // Lines are written in product id order, so reading them back the same way
        // reproduces the order returned on create.
        let lines_sql = format!(
            "SELECT {} FROM {} WHERE order_id = $1 ORDER BY product_id",
            ORDERS_PRODUCTS.column_list(),
            ORDERS_PRODUCTS.name
        );
        let lines: Vec<OrderLineRow> = sqlx::query_as(&lines_sql)
            .bind(id)
            .fetch_all(&self.pool)
            .await?;

        Ok(Some(Order {
            id: header.id,
            customer_id: header.customer_id,
            products: lines.into_iter().map(OrderLineItem::from).collect(),
            created_at: header.created_at.and_utc(),
            updated_at: header.updated_at.and_utc(),
        }))
    }
}

#[async_trait]
impl OrderUnitOfWork for PgStore {
    async fn place_order(
        &self,
        order: NewOrder,
        decrements: &[RequestedProduct],
    ) -> RepositoryResult<Order> {
        let mut tx = self.pool.begin().await?;

        // Dropping `tx` on an error path rolls back both the insert and any decrements.
        let order = insert_order(&mut tx, order).await?;
        decrement_stock(&mut tx, decrements).await?;
        tx.commit().await?;

        tracing::info!(
            order_id = %order.id,
            customer_id = %order.customer_id,
            line_count = order.products.len(),
            "✅ Committed order and stock decrements"
        );

        Ok(order)
    }
}

// ============================================================================
// Integration Tests
// ============================================================================
//
// These need a PostgreSQL instance. Run with:
//   DATABASE_URL=postgres://... cargo test -- --ignored
//
// ============================================================================
