use async_trait::async_trait;
use thiserror::Error;

use crate::domain::models::{Order, PayStatus, ShipStatus};

/// CRUD operations over the persisted `Order` entity.
///
/// The sole owner of the entity's storage representation. Each method is a
/// single atomic statement against the store: one row affected, or
/// `NotFound` when zero rows match. Implementations must be thread-safe;
/// no method holds a connection across calls.
#[async_trait]
pub trait OrderRepository: Send + Sync {
    /// Inserts a new order and returns the storage-assigned identifier.
    async fn create_order(&self, order: &Order) -> Result<i64, RepositoryError>;

    /// Fetches a single order by identifier.
    async fn find_order_by_id(&self, order_id: i64) -> Result<Order, RepositoryError>;

    /// Fetches every stored order, ordered by identifier.
    ///
    /// Deliberately unbounded, matching the upstream contract; callers that
    /// need paging should add it at this seam.
    async fn find_all(&self) -> Result<Vec<Order>, RepositoryError>;

    /// Overwrites the mutable fields of an existing order.
    async fn update_order(&self, order: &Order) -> Result<(), RepositoryError>;

    /// Narrow update of the payment track only.
    async fn update_pay_status(
        &self,
        order_id: i64,
        status: PayStatus,
    ) -> Result<(), RepositoryError>;

    /// Narrow update of the shipment track only.
    async fn update_ship_status(
        &self,
        order_id: i64,
        status: ShipStatus,
    ) -> Result<(), RepositoryError>;

    /// Hard delete, irreversible.
    async fn delete_order_by_id(&self, order_id: i64) -> Result<(), RepositoryError>;
}

/// Errors surfaced by repository operations.
///
/// Connectivity loss is kept distinct from an empty result and from
/// constraint violations so callers can decide whether a retry makes sense.
/// Variants carry the operation name and identifier for logging.
#[derive(Debug, Error)]
pub enum RepositoryError {
    /// The referenced order does not exist. A legitimate empty result,
    /// not a system failure.
    #[error("order {id} not found")]
    NotFound { id: i64 },

    /// The store rejected the write with a constraint violation.
    #[error("constraint violation during {operation}: {source}")]
    Conflict {
        operation: &'static str,
        source: anyhow::Error,
    },

    /// The store could not be reached. Transient; candidate for
    /// caller-side retry.
    #[error("storage unavailable during {operation}: {source}")]
    Unavailable {
        operation: &'static str,
        source: anyhow::Error,
    },

    /// Any other storage failure.
    #[error("storage failure during {operation}: {source}")]
    Backend {
        operation: &'static str,
        source: anyhow::Error,
    },
}
