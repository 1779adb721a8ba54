use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Payment track of an order. Wire code in parentheses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PayStatus {
    /// Payment not yet received (0).
    Unpaid,
    /// Payment settled (1).
    Paid,
    /// Payment returned to the buyer (2).
    Refunded,
}

impl PayStatus {
    /// Wire/storage code for this status.
    pub fn code(self) -> i32 {
        match self {
            Self::Unpaid => 0,
            Self::Paid => 1,
            Self::Refunded => 2,
        }
    }

    /// Decodes a wire/storage code. Returns `None` for unknown codes.
    pub fn from_code(code: i32) -> Option<Self> {
        match code {
            0 => Some(Self::Unpaid),
            1 => Some(Self::Paid),
            2 => Some(Self::Refunded),
            _ => None,
        }
    }
}

/// Shipment track of an order, independent of the payment track.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ShipStatus {
    /// Not yet handed to the carrier (0).
    Unshipped,
    /// In transit (1).
    Shipped,
    /// Received by the buyer (2).
    Delivered,
}

impl ShipStatus {
    pub fn code(self) -> i32 {
        match self {
            Self::Unshipped => 0,
            Self::Shipped => 1,
            Self::Delivered => 2,
        }
    }

    pub fn from_code(code: i32) -> Option<Self> {
        match code {
            0 => Some(Self::Unshipped),
            1 => Some(Self::Shipped),
            2 => Some(Self::Delivered),
            _ => None,
        }
    }
}

/// A purchase order. One row in the `order` table.
///
/// The identifier is assigned by storage on creation and never changes
/// afterwards. Payment and shipment statuses move independently; this layer
/// does not enforce forward-only transitions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Order {
    /// Storage-assigned identifier. Zero until the order is persisted.
    pub id: i64,
    /// Buyer account identifier.
    pub user_id: i64,
    /// Purchased product identifier.
    pub product_id: i64,
    /// Total order amount.
    pub price: Decimal,
    /// Payment track.
    pub pay_status: PayStatus,
    /// Shipment track.
    pub ship_status: ShipStatus,
    /// Set by the repository when the row is inserted.
    pub created_at: DateTime<Utc>,
    /// Set by the repository on every write.
    pub updated_at: DateTime<Utc>,
}
