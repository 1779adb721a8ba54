use std::sync::Arc;

use async_trait::async_trait;

use crate::domain::models::{Order, PayStatus, ShipStatus};
use crate::outbounds::repository::OrderRepository;

use super::{OrderService, OrderServiceError};

/// Production order service: delegates storage to the injected repository.
pub struct OrderServiceImpl {
    repository: Arc<dyn OrderRepository>,
}

impl OrderServiceImpl {
    pub fn new(repository: Arc<dyn OrderRepository>) -> Self {
        Self { repository }
    }
}

#[async_trait]
impl OrderService for OrderServiceImpl {
    async fn add_order(&self, order: Order) -> Result<i64, OrderServiceError> {
        Ok(self.repository.create_order(&order).await?)
    }

    async fn delete_order(&self, order_id: i64) -> Result<(), OrderServiceError> {
        Ok(self.repository.delete_order_by_id(order_id).await?)
    }

    async fn update_order(&self, order: Order) -> Result<(), OrderServiceError> {
        Ok(self.repository.update_order(&order).await?)
    }

    async fn find_order_by_id(&self, order_id: i64) -> Result<Order, OrderServiceError> {
        Ok(self.repository.find_order_by_id(order_id).await?)
    }

    async fn find_all_orders(&self) -> Result<Vec<Order>, OrderServiceError> {
        Ok(self.repository.find_all().await?)
    }

    async fn update_ship_status(
        &self,
        order_id: i64,
        status: ShipStatus,
    ) -> Result<(), OrderServiceError> {
        Ok(self.repository.update_ship_status(order_id, status).await?)
    }

    async fn update_pay_status(
        &self,
        order_id: i64,
        status: PayStatus,
    ) -> Result<(), OrderServiceError> {
        Ok(self.repository.update_pay_status(order_id, status).await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::outbounds::memory_repository::InMemoryOrderRepository;
    use chrono::Utc;
    use rust_decimal_macros::dec;

    fn sample_order() -> Order {
        Order {
            id: 0,
            user_id: 3,
            product_id: 5,
            price: dec!(42.00),
            pay_status: PayStatus::Unpaid,
            ship_status: ShipStatus::Unshipped,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[tokio::test]
    async fn add_then_find_returns_stored_order() {
        let service = OrderServiceImpl::new(Arc::new(InMemoryOrderRepository::new()));
        let id = service.add_order(sample_order()).await.unwrap();
        let found = service.find_order_by_id(id).await.unwrap();
        assert_eq!(found.id, id);
        assert_eq!(found.user_id, 3);
        assert_eq!(found.price, dec!(42.00));
    }

    #[tokio::test]
    async fn storage_errors_pass_through() {
        let service = OrderServiceImpl::new(Arc::new(InMemoryOrderRepository::new()));
        let err = service.find_order_by_id(404).await.unwrap_err();
        let OrderServiceError::Storage(inner) = err;
        assert!(matches!(
            inner,
            crate::outbounds::repository::RepositoryError::NotFound { id: 404 }
        ));
    }
}
