use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::error::ErrorKind;
use sqlx::mysql::MySqlPool;

use crate::domain::models::{Order, PayStatus, ShipStatus};

use super::repository::{OrderRepository, RepositoryError};

/// Production repository backed by a MySQL pool.
///
/// Table naming follows the singular convention: one `order` row per
/// entity. Timestamps are written here so the in-memory double behaves
/// identically.
pub struct MySqlOrderRepository {
    pool: MySqlPool,
}

impl MySqlOrderRepository {
    pub fn new(pool: MySqlPool) -> Self {
        Self { pool }
    }
}

/// Raw row shape; statuses travel as integer codes.
#[derive(sqlx::FromRow)]
struct OrderRow {
    id: i64,
    user_id: i64,
    product_id: i64,
    price: Decimal,
    pay_status: i32,
    ship_status: i32,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl OrderRow {
    fn into_order(self, operation: &'static str) -> Result<Order, RepositoryError> {
        let pay_status = PayStatus::from_code(self.pay_status).ok_or_else(|| {
            RepositoryError::Backend {
                operation,
                source: anyhow::anyhow!(
                    "order {} has unknown pay_status code {}",
                    self.id,
                    self.pay_status
                ),
            }
        })?;
        let ship_status = ShipStatus::from_code(self.ship_status).ok_or_else(|| {
            RepositoryError::Backend {
                operation,
                source: anyhow::anyhow!(
                    "order {} has unknown ship_status code {}",
                    self.id,
                    self.ship_status
                ),
            }
        })?;
        Ok(Order {
            id: self.id,
            user_id: self.user_id,
            product_id: self.product_id,
            price: self.price,
            pay_status,
            ship_status,
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}

/// Maps a driver error onto the repository taxonomy, keeping connectivity
/// loss distinct from constraint violations.
fn classify(operation: &'static str, err: sqlx::Error) -> RepositoryError {
    enum Class {
        Conflict,
        Unavailable,
        Backend,
    }

    let class = match &err {
        sqlx::Error::Database(db) => match db.kind() {
            ErrorKind::UniqueViolation
            | ErrorKind::ForeignKeyViolation
            | ErrorKind::NotNullViolation
            | ErrorKind::CheckViolation => Class::Conflict,
            _ => Class::Backend,
        },
        sqlx::Error::PoolTimedOut | sqlx::Error::PoolClosed | sqlx::Error::Io(_) => {
            Class::Unavailable
        }
        _ => Class::Backend,
    };

    let source = anyhow::Error::new(err);
    match class {
        Class::Conflict => RepositoryError::Conflict { operation, source },
        Class::Unavailable => RepositoryError::Unavailable { operation, source },
        Class::Backend => RepositoryError::Backend { operation, source },
    }
}

#[async_trait]
impl OrderRepository for MySqlOrderRepository {
    async fn create_order(&self, order: &Order) -> Result<i64, RepositoryError> {
        let now = Utc::now();
        let result = sqlx::query(
            "INSERT INTO `order` \
             (user_id, product_id, price, pay_status, ship_status, created_at, updated_at) \
             VALUES (?, ?, ?, ?, ?, ?, ?)",
        )
        .bind(order.user_id)
        .bind(order.product_id)
        .bind(order.price)
        .bind(order.pay_status.code())
        .bind(order.ship_status.code())
        .bind(now)
        .bind(now)
        .execute(&self.pool)
        .await
        .map_err(|e| classify("create_order", e))?;

        Ok(result.last_insert_id() as i64)
    }

    async fn find_order_by_id(&self, order_id: i64) -> Result<Order, RepositoryError> {
        let row: Option<OrderRow> = sqlx::query_as(
            "SELECT id, user_id, product_id, price, pay_status, ship_status, \
             created_at, updated_at FROM `order` WHERE id = ?",
        )
        .bind(order_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| classify("find_order_by_id", e))?;

        match row {
            Some(row) => row.into_order("find_order_by_id"),
            None => Err(RepositoryError::NotFound { id: order_id }),
        }
    }

    async fn find_all(&self) -> Result<Vec<Order>, RepositoryError> {
        let rows: Vec<OrderRow> = sqlx::query_as(
            "SELECT id, user_id, product_id, price, pay_status, ship_status, \
             created_at, updated_at FROM `order` ORDER BY id",
        )
        .fetch_all(&self.pool)
        .await
        .map_err(|e| classify("find_all", e))?;

        rows.into_iter()
            .map(|row| row.into_order("find_all"))
            .collect()
    }

    async fn update_order(&self, order: &Order) -> Result<(), RepositoryError> {
        let result = sqlx::query(
            "UPDATE `order` SET user_id = ?, product_id = ?, price = ?, \
             pay_status = ?, ship_status = ?, updated_at = ? WHERE id = ?",
        )
        .bind(order.user_id)
        .bind(order.product_id)
        .bind(order.price)
        .bind(order.pay_status.code())
        .bind(order.ship_status.code())
        .bind(Utc::now())
        .bind(order.id)
        .execute(&self.pool)
        .await
        .map_err(|e| classify("update_order", e))?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound { id: order.id });
        }
        Ok(())
    }

    async fn update_pay_status(
        &self,
        order_id: i64,
        status: PayStatus,
    ) -> Result<(), RepositoryError> {
        let result =
            sqlx::query("UPDATE `order` SET pay_status = ?, updated_at = ? WHERE id = ?")
                .bind(status.code())
                .bind(Utc::now())
                .bind(order_id)
                .execute(&self.pool)
                .await
                .map_err(|e| classify("update_pay_status", e))?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound { id: order_id });
        }
        Ok(())
    }

    async fn update_ship_status(
        &self,
        order_id: i64,
        status: ShipStatus,
    ) -> Result<(), RepositoryError> {
        let result =
            sqlx::query("UPDATE `order` SET ship_status = ?, updated_at = ? WHERE id = ?")
                .bind(status.code())
                .bind(Utc::now())
                .bind(order_id)
                .execute(&self.pool)
                .await
                .map_err(|e| classify("update_ship_status", e))?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound { id: order_id });
        }
        Ok(())
    }

    async fn delete_order_by_id(&self, order_id: i64) -> Result<(), RepositoryError> {
        let result = sqlx::query("DELETE FROM `order` WHERE id = ?")
            .bind(order_id)
            .execute(&self.pool)
            .await
            .map_err(|e| classify("delete_order_by_id", e))?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound { id: order_id });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn io_errors_classify_as_unavailable() {
        let err = sqlx::Error::Io(std::io::Error::new(
            std::io::ErrorKind::ConnectionRefused,
            "refused",
        ));
        let classified = classify("find_all", err);
        assert!(matches!(
            classified,
            RepositoryError::Unavailable { operation: "find_all", .. }
        ));
    }

    #[test]
    fn row_decoding_rejects_unknown_status_codes() {
        let row = OrderRow {
            id: 9,
            user_id: 1,
            product_id: 2,
            price: Decimal::new(1000, 2),
            pay_status: 42,
            ship_status: 0,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };
        let err = row.into_order("find_order_by_id").unwrap_err();
        assert!(matches!(err, RepositoryError::Backend { .. }));
        assert!(err.to_string().contains("pay_status"));
    }
}
