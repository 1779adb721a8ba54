// Expose the modules
pub mod api;
pub mod config;
pub mod domain;
pub mod metrics;
pub mod middleware;
pub mod outbounds;
pub mod registry;
pub mod runtime;
pub mod telemetry;

// Re-export key types for easier usage
pub use api::{Api, AppState};
pub use config::{ConfigError, ConfigTree, MysqlConfig, RuntimeConfig};
pub use domain::models::{Order, PayStatus, ShipStatus};
pub use domain::services::{OrderService, OrderServiceError, OrderServiceImpl};
pub use outbounds::{
    InMemoryOrderRepository, MySqlOrderRepository, OrderRepository, RepositoryError,
};
pub use runtime::ServiceRuntime;
