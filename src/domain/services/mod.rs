use async_trait::async_trait;
use thiserror::Error;

use crate::domain::models::{Order, PayStatus, ShipStatus};
use crate::outbounds::repository::RepositoryError;

pub mod order_service;

pub use order_service::OrderServiceImpl;

/// Domain-facing operations over purchase orders.
///
/// Today a pure delegation layer over the repository; this trait is the
/// seam where business rules (for example, refusing to delete a shipped
/// order) would attach. Handlers depend on this abstraction, never on
/// storage directly. Implementations must be thread-safe.
#[async_trait]
pub trait OrderService: Send + Sync {
    /// Persists a new order and returns the assigned identifier.
    async fn add_order(&self, order: Order) -> Result<i64, OrderServiceError>;

    /// Removes an order permanently.
    async fn delete_order(&self, order_id: i64) -> Result<(), OrderServiceError>;

    /// Overwrites the mutable fields of an existing order.
    async fn update_order(&self, order: Order) -> Result<(), OrderServiceError>;

    /// Looks up a single order.
    async fn find_order_by_id(&self, order_id: i64) -> Result<Order, OrderServiceError>;

    /// Returns every stored order.
    async fn find_all_orders(&self) -> Result<Vec<Order>, OrderServiceError>;

    /// Moves the shipment track of an order.
    async fn update_ship_status(
        &self,
        order_id: i64,
        status: ShipStatus,
    ) -> Result<(), OrderServiceError>;

    /// Moves the payment track of an order.
    async fn update_pay_status(
        &self,
        order_id: i64,
        status: PayStatus,
    ) -> Result<(), OrderServiceError>;
}

/// Errors surfaced by order service operations.
///
/// Storage errors pass through untouched in kind; the service adds no
/// recovery of its own.
#[derive(Debug, Error)]
pub enum OrderServiceError {
    #[error(transparent)]
    Storage(#[from] RepositoryError),
}

#[cfg(test)]
use mockall::mock;

#[cfg(test)]
mock! {
    pub OrderService {}

    #[async_trait]
    impl OrderService for OrderService {
        async fn add_order(&self, order: Order) -> Result<i64, OrderServiceError>;

        async fn delete_order(&self, order_id: i64) -> Result<(), OrderServiceError>;

        async fn update_order(&self, order: Order) -> Result<(), OrderServiceError>;

        async fn find_order_by_id(&self, order_id: i64) -> Result<Order, OrderServiceError>;

        async fn find_all_orders(&self) -> Result<Vec<Order>, OrderServiceError>;

        async fn update_ship_status(
            &self,
            order_id: i64,
            status: ShipStatus,
        ) -> Result<(), OrderServiceError>;

        async fn update_pay_status(
            &self,
            order_id: i64,
            status: PayStatus,
        ) -> Result<(), OrderServiceError>;
    }
}
