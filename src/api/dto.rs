//--------------------------------------------------------------------------------------------------
// STRUCTS
//--------------------------------------------------------------------------------------------------
// | Name                    | Description                               | Key Methods         |
// |-------------------------|-------------------------------------------|---------------------|
// | OrderInfo               | Wire representation of an order           | try_into_new_order  |
// | OrderIdResponse         | Identifier returned by create-order       |                     |
// | StatusResponse          | Human-readable confirmation message       |                     |
// | PayStatusRequest        | Payload for update-order-pay-status       |                     |
// | ShipStatusRequest       | Payload for update-order-ship-status      |                     |
// | MappingError            | Wire/domain field mismatch                |                     |
//--------------------------------------------------------------------------------------------------

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::domain::models::{Order, PayStatus, ShipStatus};

/// Wire representation of an order.
///
/// Statuses travel as integer codes and timestamps are absent on inbound
/// create requests. Mapping is explicit per message rather than
/// reflection-based, so a shape mismatch fails at this boundary with a
/// `MappingError` naming the field.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderInfo {
    /// Storage-assigned identifier; absent when creating.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    /// Buyer account identifier.
    pub user_id: i64,
    /// Purchased product identifier.
    pub product_id: i64,
    /// Total order amount.
    pub price: Decimal,
    /// Payment status code.
    pub pay_status: i32,
    /// Shipment status code.
    pub ship_status: i32,
    /// Set by storage; ignored on inbound requests.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    /// Set by storage; ignored on inbound requests.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

impl OrderInfo {
    /// Converts an inbound DTO into a domain order for creation. The
    /// identifier and timestamps are storage-managed; values supplied by
    /// the caller are carried through but overwritten on insert.
    pub fn try_into_new_order(self) -> Result<Order, MappingError> {
        let now = Utc::now();
        Ok(Order {
            id: self.id.unwrap_or(0),
            user_id: self.user_id,
            product_id: self.product_id,
            price: self.price,
            pay_status: decode_pay_status(self.pay_status)?,
            ship_status: decode_ship_status(self.ship_status)?,
            created_at: self.created_at.unwrap_or(now),
            updated_at: self.updated_at.unwrap_or(now),
        })
    }

    /// Converts an inbound DTO into a domain order for a full update.
    /// The identifier is required by the target and must be present.
    pub fn try_into_existing_order(self) -> Result<Order, MappingError> {
        if self.id.is_none() {
            return Err(MappingError::MissingField("id"));
        }
        self.try_into_new_order()
    }
}

impl From<Order> for OrderInfo {
    fn from(order: Order) -> Self {
        Self {
            id: Some(order.id),
            user_id: order.user_id,
            product_id: order.product_id,
            price: order.price,
            pay_status: order.pay_status.code(),
            ship_status: order.ship_status.code(),
            created_at: Some(order.created_at),
            updated_at: Some(order.updated_at),
        }
    }
}

pub fn decode_pay_status(code: i32) -> Result<PayStatus, MappingError> {
    PayStatus::from_code(code).ok_or(MappingError::InvalidValue {
        field: "pay_status",
        value: code,
    })
}

pub fn decode_ship_status(code: i32) -> Result<ShipStatus, MappingError> {
    ShipStatus::from_code(code).ok_or(MappingError::InvalidValue {
        field: "ship_status",
        value: code,
    })
}

/// Identifier returned by create-order.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderIdResponse {
    pub order_id: i64,
}

/// Confirmation message returned by mutating operations. Kept as a plain
/// string for compatibility with existing peers.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatusResponse {
    pub msg: String,
}

/// Payload for update-order-pay-status.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PayStatusRequest {
    pub pay_status: i32,
}

/// Payload for update-order-ship-status.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ShipStatusRequest {
    pub ship_status: i32,
}

/// A wire/domain shape mismatch, indicating contract drift between the
/// wire format and the domain model.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MappingError {
    #[error("required field missing: {0}")]
    MissingField(&'static str),

    #[error("invalid value {value} for field {field}")]
    InvalidValue { field: &'static str, value: i32 },
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn sample_order() -> Order {
        Order {
            id: 12,
            user_id: 1,
            product_id: 2,
            price: dec!(9.99),
            pay_status: PayStatus::Paid,
            ship_status: ShipStatus::Unshipped,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn round_trip_preserves_every_shared_field() {
        let order = sample_order();
        let dto = OrderInfo::from(order.clone());
        let back = dto.try_into_existing_order().unwrap();
        assert_eq!(back, order);
    }

    #[test]
    fn update_without_id_is_a_mapping_error() {
        let mut dto = OrderInfo::from(sample_order());
        dto.id = None;
        assert_eq!(
            dto.try_into_existing_order().unwrap_err(),
            MappingError::MissingField("id")
        );
    }

    #[test]
    fn unknown_status_code_names_the_field() {
        let mut dto = OrderInfo::from(sample_order());
        dto.pay_status = 99;
        assert_eq!(
            dto.try_into_existing_order().unwrap_err(),
            MappingError::InvalidValue {
                field: "pay_status",
                value: 99
            }
        );
    }
}
