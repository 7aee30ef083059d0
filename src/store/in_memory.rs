//! In-memory store backed by HashMaps, for tests and local demos.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::domain::customer::Customer;
use crate::domain::order::{NewOrder, Order, RequestedProduct};
use crate::domain::product::Product;
use super::{
    CustomerRepository, OrderRepository, OrderUnitOfWork, ProductRepository, RepositoryError,
    RepositoryResult,
};

#[derive(Default)]
struct Tables {
    customers: HashMap<Uuid, Customer>,
    products: HashMap<Uuid, Product>,
    orders: HashMap<Uuid, Order>,
}

/// All tables live behind one lock, so a unit of work sees and writes a
/// consistent state. Clone-friendly via Arc.
#[derive(Clone, Default)]
pub struct InMemoryStore {
    tables: Arc<RwLock<Tables>>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn insert_customer(&self, customer: Customer) {
        self.tables.write().await.customers.insert(customer.id, customer);
    }

    pub async fn insert_product(&self, product: Product) {
        self.tables.write().await.products.insert(product.id, product);
    }

    /// Current state of a product, for stock assertions
    pub async fn product(&self, id: Uuid) -> Option<Product> {
        self.tables.read().await.products.get(&id).cloned()
    }

    pub async fn order_count(&self) -> usize {
        self.tables.read().await.orders.len()
    }
}

impl Tables {
    /// Foreign key checks for `orders.customer_id` and `orders_products.product_id`
    fn check_references(&self, order: &NewOrder) -> RepositoryResult<()> {
        if !self.customers.contains_key(&order.customer_id) {
            return Err(RepositoryError::MissingReference(format!("customer {}", order.customer_id)));
        }
        if let Some(line) = order.products.iter().find(|l| !self.products.contains_key(&l.product_id)) {
            return Err(RepositoryError::MissingReference(format!("product {}", line.product_id)));
        }
        Ok(())
    }

    fn insert_order(&mut self, order: NewOrder) -> RepositoryResult<Order> {
        self.check_references(&order)?;

        let order = order.into_order(Uuid::new_v4(), Utc::now());
        self.orders.insert(order.id, order.clone());
        Ok(order)
    }

    /// Check every decrement first, then apply them all. Entries for the same
    /// product are checked against the stock as one total.
    fn decrement_stock(&mut self, decrements: &[RequestedProduct]) -> RepositoryResult<()> {
        let mut totals: HashMap<Uuid, i64> = HashMap::new();
        for item in decrements {
            let total = totals.entry(item.id).or_insert(0);
            *total += i64::from(item.quantity);

            let available = self.products.get(&item.id).map(|p| i64::from(p.quantity));
            match available {
                Some(quantity) if quantity >= *total => {}
                _ => {
                    return Err(RepositoryError::StockConflict {
                        product_id: item.id,
                        requested: item.quantity,
                    })
                }
            }
        }

        let now = Utc::now();
        for item in decrements {
            if let Some(product) = self.products.get_mut(&item.id) {
                product.quantity -= item.quantity;
                product.updated_at = now;
            }
        }
        Ok(())
    }
}

#[async_trait]
impl CustomerRepository for InMemoryStore {
    async fn find_by_id(&self, id: Uuid) -> RepositoryResult<Option<Customer>> {
        Ok(self.tables.read().await.customers.get(&id).cloned())
    }
}

#[async_trait]
impl ProductRepository for InMemoryStore {
    async fn find_all_by_id(&self, products: &[RequestedProduct]) -> RepositoryResult<Vec<Product>> {
        let tables = self.tables.read().await;
        let mut found: Vec<Product> = Vec::with_capacity(products.len());
        for item in products {
            if found.iter().any(|p| p.id == item.id) {
                continue;
            }
            if let Some(product) = tables.products.get(&item.id) {
                found.push(product.clone());
            }
        }
        Ok(found)
    }

    async fn update_quantity(&self, products: &[RequestedProduct]) -> RepositoryResult<()> {
        self.tables.write().await.decrement_stock(products)
    }
}

#[async_trait]
impl OrderRepository for InMemoryStore {
    async fn create(&self, order: NewOrder) -> RepositoryResult<Order> {
        self.tables.write().await.insert_order(order)
    }

    async fn find_by_id(&self, id: Uuid) -> RepositoryResult<Option<Order>> {
        Ok(self.tables.read().await.orders.get(&id).cloned())
    }
}

#[async_trait]
impl OrderUnitOfWork for InMemoryStore {
    async fn place_order(
        &self,
        order: NewOrder,
        decrements: &[RequestedProduct],
    ) -> RepositoryResult<Order> {
        let mut tables = self.tables.write().await;

        // Every check runs before the first write, so a failure changes nothing.
        tables.check_references(&order)?;
        tables.decrement_stock(decrements)?;
        tables.insert_order(order)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::order::NewOrderLine;
    use rust_decimal_macros::dec;

    async fn seeded() -> (InMemoryStore, Customer, Product) {
        let store = InMemoryStore::new();
        let customer = Customer::new("C1", "c1@example.com");
        let product = Product::new("P1", dec!(10.00), 5);
        store.insert_customer(customer.clone()).await;
        store.insert_product(product.clone()).await;
        (store, customer, product)
    }

    fn new_order(customer: &Customer, product: &Product, quantity: i32) -> NewOrder {
        NewOrder {
            customer_id: customer.id,
            products: vec![NewOrderLine { product_id: product.id, price: product.price, quantity }],
        }
    }

    #[tokio::test]
    async fn test_find_all_by_id_skips_unknown_and_keeps_request_order() {
        let (store, _, p1) = seeded().await;
        let p2 = Product::new("P2", dec!(1.00), 1);
        store.insert_product(p2.clone()).await;

        let found = store
            .find_all_by_id(&[
                RequestedProduct::new(p2.id, 1),
                RequestedProduct::new(Uuid::new_v4(), 1),
                RequestedProduct::new(p1.id, 1),
            ])
            .await
            .unwrap();

        let ids: Vec<Uuid> = found.iter().map(|p| p.id).collect();
        assert_eq!(ids, vec![p2.id, p1.id]);
    }

    #[tokio::test]
    async fn test_update_quantity_decrements() {
        let (store, _, p1) = seeded().await;

        store.update_quantity(&[RequestedProduct::new(p1.id, 2)]).await.unwrap();

        assert_eq!(store.product(p1.id).await.unwrap().quantity, 3);
    }

    #[tokio::test]
    async fn test_update_quantity_is_conditional() {
        let (store, _, p1) = seeded().await;

        let err = store.update_quantity(&[RequestedProduct::new(p1.id, 6)]).await.unwrap_err();

        assert!(matches!(err, RepositoryError::StockConflict { requested: 6, .. }));
        assert_eq!(store.product(p1.id).await.unwrap().quantity, 5);
    }

    #[tokio::test]
    async fn test_update_quantity_totals_repeated_products() {
        let (store, _, p1) = seeded().await;

        let err = store
            .update_quantity(&[RequestedProduct::new(p1.id, 3), RequestedProduct::new(p1.id, 3)])
            .await
            .unwrap_err();

        assert!(matches!(err, RepositoryError::StockConflict { .. }));
        assert_eq!(store.product(p1.id).await.unwrap().quantity, 5);

        store
            .update_quantity(&[RequestedProduct::new(p1.id, 2), RequestedProduct::new(p1.id, 3)])
            .await
            .unwrap();
        assert_eq!(store.product(p1.id).await.unwrap().quantity, 0);
    }

    #[tokio::test]
    async fn test_create_and_find_order() {
        let (store, customer, p1) = seeded().await;

        let created = store.create(new_order(&customer, &p1, 2)).await.unwrap();
        let found = OrderRepository::find_by_id(&store, created.id).await.unwrap();

        assert_eq!(found, Some(created));
    }

    #[tokio::test]
    async fn test_create_requires_existing_customer() {
        let (store, _, p1) = seeded().await;
        let stranger = Customer::new("X", "x@example.com");

        let err = store.create(new_order(&stranger, &p1, 1)).await.unwrap_err();

        assert!(matches!(err, RepositoryError::MissingReference(_)));
        assert_eq!(store.order_count().await, 0);
    }

    #[tokio::test]
    async fn test_place_order_rolls_back_on_conflict() {
        let (store, customer, p1) = seeded().await;

        let err = store
            .place_order(new_order(&customer, &p1, 6), &[RequestedProduct::new(p1.id, 6)])
            .await
            .unwrap_err();

        assert!(matches!(err, RepositoryError::StockConflict { .. }));
        assert_eq!(store.order_count().await, 0);
        assert_eq!(store.product(p1.id).await.unwrap().quantity, 5);
    }

    #[tokio::test]
    async fn test_place_order_with_unknown_customer_keeps_stock() {
        let (store, _, p1) = seeded().await;
        let stranger = Customer::new("X", "x@example.com");

        let err = store
            .place_order(new_order(&stranger, &p1, 2), &[RequestedProduct::new(p1.id, 2)])
            .await
            .unwrap_err();

        assert!(matches!(err, RepositoryError::MissingReference(_)));
        assert_eq!(store.product(p1.id).await.unwrap().quantity, 5);
    }
}
