//--------------------------------------------------------------------------------------------------
// MODULE OVERVIEW
//--------------------------------------------------------------------------------------------------
// This module implements the remote-call surface of the order service
// using Axum. Every RPC route passes through the fixed middleware chain
// (tracing span -> rate-limit gate -> metrics recorder) before reaching
// its handler.
//
// | Component      | Description                                                |
// |----------------|-----------------------------------------------------------|
// | AppState       | Shared handler state (the order service seam)              |
// | Api            | Router assembly and graceful serve loop                    |
// | Routes         | Handler functions, one per remote operation                |
// | DTOs           | Wire request/response structures and domain mapping        |
//--------------------------------------------------------------------------------------------------

pub mod dto;
pub mod error;
mod routes;

use std::future::Future;
use std::net::SocketAddr;
use std::sync::Arc;

use axum::{
    Extension, Router, middleware,
    routing::{delete, get, post, put},
};
use tokio::net::TcpListener;
use tower::ServiceBuilder;
use tracing::info;

use crate::domain::services::OrderService;
use crate::metrics::ServiceMetrics;
use crate::middleware::{RateGate, admit_call, record_call, trace_calls};

pub use error::{ApiError, ApiResult};

/// Shared state injected into every handler. Handlers depend on the
/// `OrderService` abstraction only; swapping the storage implementation
/// never touches this layer.
pub struct AppState {
    pub order_service: Arc<dyn OrderService>,
}

impl AppState {
    pub fn new(order_service: Arc<dyn OrderService>) -> Self {
        Self { order_service }
    }
}

/// The assembled RPC surface.
pub struct Api {
    addr: SocketAddr,
    state: Arc<AppState>,
    gate: Arc<RateGate>,
    metrics: Arc<ServiceMetrics>,
}

impl Api {
    pub fn new(
        addr: SocketAddr,
        state: Arc<AppState>,
        gate: Arc<RateGate>,
        metrics: Arc<ServiceMetrics>,
    ) -> Self {
        Self {
            addr,
            state,
            gate,
            metrics,
        }
    }

    /// Builds the router with the middleware chain installed.
    ///
    /// ServiceBuilder applies layers top-down, so the order below is the
    /// outer-to-inner order of the chain.
    pub fn routes(&self) -> Router {
        Router::new()
            .route("/orders/:id", get(routes::get_order_by_id))
            .route("/orders", get(routes::get_all_orders))
            .route("/orders", post(routes::create_order))
            .route("/orders/:id", delete(routes::delete_order_by_id))
            .route("/orders/:id/pay-status", put(routes::update_order_pay_status))
            .route(
                "/orders/:id/ship-status",
                put(routes::update_order_ship_status),
            )
            .route("/orders", put(routes::update_order))
            .layer(
                ServiceBuilder::new()
                    .layer(middleware::from_fn(trace_calls))
                    .layer(middleware::from_fn_with_state(
                        Arc::clone(&self.gate),
                        admit_call,
                    ))
                    .layer(middleware::from_fn_with_state(
                        Arc::clone(&self.metrics),
                        record_call,
                    )),
            )
            // Liveness probe sits outside the chain; scrapers and probes
            // must not consume admission tokens.
            .route("/health", get(routes::health))
            .layer(Extension(Arc::clone(&self.state)))
    }

    /// Serves until the shutdown future resolves, then stops accepting
    /// new calls and drains in-flight ones.
    pub async fn serve(
        self,
        shutdown: impl Future<Output = ()> + Send + 'static,
    ) -> anyhow::Result<()> {
        let app = self.routes();
        let listener = TcpListener::bind(self.addr).await?;
        info!(addr = %self.addr, "order service listening");
        axum::serve(listener, app)
            .with_graceful_shutdown(shutdown)
            .await?;
        Ok(())
    }
}
