/// Domain entity types for the order service.
pub mod order;

pub use order::{Order, PayStatus, ShipStatus};
