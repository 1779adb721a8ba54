use std::collections::BTreeMap;
use std::sync::atomic::{AtomicI64, Ordering};

use async_trait::async_trait;
use chrono::Utc;
use parking_lot::RwLock;

use crate::domain::models::{Order, PayStatus, ShipStatus};

use super::repository::{OrderRepository, RepositoryError};

/// In-memory repository double for tests and local runs.
///
/// Mirrors the MySQL implementation's observable behavior: identifiers are
/// assigned from a monotonically increasing counter and timestamps are set
/// on write.
pub struct InMemoryOrderRepository {
    orders: RwLock<BTreeMap<i64, Order>>,
    next_id: AtomicI64,
}

impl InMemoryOrderRepository {
    pub fn new() -> Self {
        Self {
            orders: RwLock::new(BTreeMap::new()),
            next_id: AtomicI64::new(1),
        }
    }
}

#[async_trait]
impl OrderRepository for InMemoryOrderRepository {
    async fn create_order(&self, order: &Order) -> Result<i64, RepositoryError> {
        let id = self.next_id.fetch_add(1, Ordering::SeqCst);
        let now = Utc::now();
        let mut stored = order.clone();
        stored.id = id;
        stored.created_at = now;
        stored.updated_at = now;
        self.orders.write().insert(id, stored);
        Ok(id)
    }

    async fn find_order_by_id(&self, order_id: i64) -> Result<Order, RepositoryError> {
        self.orders
            .read()
            .get(&order_id)
            .cloned()
            .ok_or(RepositoryError::NotFound { id: order_id })
    }

    async fn find_all(&self) -> Result<Vec<Order>, RepositoryError> {
        Ok(self.orders.read().values().cloned().collect())
    }

    async fn update_order(&self, order: &Order) -> Result<(), RepositoryError> {
        let mut orders = self.orders.write();
        let stored = orders
            .get_mut(&order.id)
            .ok_or(RepositoryError::NotFound { id: order.id })?;
        stored.user_id = order.user_id;
        stored.product_id = order.product_id;
        stored.price = order.price;
        stored.pay_status = order.pay_status;
        stored.ship_status = order.ship_status;
        stored.updated_at = Utc::now();
        Ok(())
    }

    async fn update_pay_status(
        &self,
        order_id: i64,
        status: PayStatus,
    ) -> Result<(), RepositoryError> {
        let mut orders = self.orders.write();
        let stored = orders
            .get_mut(&order_id)
            .ok_or(RepositoryError::NotFound { id: order_id })?;
        stored.pay_status = status;
        stored.updated_at = Utc::now();
        Ok(())
    }

    async fn update_ship_status(
        &self,
        order_id: i64,
        status: ShipStatus,
    ) -> Result<(), RepositoryError> {
        let mut orders = self.orders.write();
        let stored = orders
            .get_mut(&order_id)
            .ok_or(RepositoryError::NotFound { id: order_id })?;
        stored.ship_status = status;
        stored.updated_at = Utc::now();
        Ok(())
    }

    async fn delete_order_by_id(&self, order_id: i64) -> Result<(), RepositoryError> {
        self.orders
            .write()
            .remove(&order_id)
            .map(|_| ())
            .ok_or(RepositoryError::NotFound { id: order_id })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn sample_order() -> Order {
        Order {
            id: 0,
            user_id: 7,
            product_id: 11,
            price: dec!(19.90),
            pay_status: PayStatus::Unpaid,
            ship_status: ShipStatus::Unshipped,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[tokio::test]
    async fn assigns_distinct_ids() {
        let repo = InMemoryOrderRepository::new();
        let a = repo.create_order(&sample_order()).await.unwrap();
        let b = repo.create_order(&sample_order()).await.unwrap();
        assert_ne!(a, b);
    }

    #[tokio::test]
    async fn delete_then_find_is_not_found() {
        let repo = InMemoryOrderRepository::new();
        let id = repo.create_order(&sample_order()).await.unwrap();
        repo.delete_order_by_id(id).await.unwrap();
        let err = repo.find_order_by_id(id).await.unwrap_err();
        assert!(matches!(err, RepositoryError::NotFound { .. }));
    }

    #[tokio::test]
    async fn status_tracks_are_independent() {
        let repo = InMemoryOrderRepository::new();
        let id = repo.create_order(&sample_order()).await.unwrap();
        repo.update_pay_status(id, PayStatus::Paid).await.unwrap();
        repo.update_ship_status(id, ShipStatus::Shipped)
            .await
            .unwrap();
        let order = repo.find_order_by_id(id).await.unwrap();
        assert_eq!(order.pay_status, PayStatus::Paid);
        assert_eq!(order.ship_status, ShipStatus::Shipped);
    }
}
