//! Prometheus metrics for the RPC surface.
//!
//! Every remote call increments a per-operation counter and records its
//! latency, regardless of outcome. Metrics are served in Prometheus text
//! format by a dedicated listener on the metrics port, separate from the
//! RPC listener.

use std::sync::Arc;

use axum::{Router, http::StatusCode, response::IntoResponse, routing::get};
use prometheus::{Encoder, HistogramOpts, HistogramVec, IntCounterVec, Opts, Registry, TextEncoder};
use tokio::net::TcpListener;
use tracing::info;

/// Per-operation request counter and latency histogram, backed by a
/// dedicated registry.
pub struct ServiceMetrics {
    registry: Registry,
    requests: IntCounterVec,
    latency: HistogramVec,
}

impl ServiceMetrics {
    pub fn new() -> Result<Self, prometheus::Error> {
        let registry = Registry::new();

        let requests = IntCounterVec::new(
            Opts::new(
                "shop_order_requests_total",
                "Total remote calls handled, by operation and status",
            ),
            &["operation", "status"],
        )?;
        registry.register(Box::new(requests.clone()))?;

        let latency = HistogramVec::new(
            HistogramOpts::new(
                "shop_order_request_duration_seconds",
                "Remote call latency in seconds, by operation",
            ),
            &["operation"],
        )?;
        registry.register(Box::new(latency.clone()))?;

        Ok(Self {
            registry,
            requests,
            latency,
        })
    }

    /// Records one completed call.
    pub fn observe(&self, operation: &str, status: u16, seconds: f64) {
        self.requests
            .with_label_values(&[operation, &status.to_string()])
            .inc();
        self.latency.with_label_values(&[operation]).observe(seconds);
    }

    /// Router exposing this registry at `/metrics`.
    pub fn router(self: Arc<Self>) -> Router {
        let metrics = self;
        Router::new().route(
            "/metrics",
            get(move || {
                let metrics = Arc::clone(&metrics);
                async move { metrics.render() }
            }),
        )
    }

    fn render(&self) -> axum::response::Response {
        let encoder = TextEncoder::new();
        let mut buffer = Vec::new();
        match encoder.encode(&self.registry.gather(), &mut buffer) {
            Ok(()) => (
                StatusCode::OK,
                [(axum::http::header::CONTENT_TYPE, encoder.format_type().to_string())],
                buffer,
            )
                .into_response(),
            Err(err) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                format!("metrics encoding failed: {err}"),
            )
                .into_response(),
        }
    }
}

/// Binds the scrape endpoint and serves it until the process exits.
pub async fn serve_scrape_endpoint(metrics: Arc<ServiceMetrics>, port: u16) -> anyhow::Result<()> {
    let listener = TcpListener::bind(("0.0.0.0", port)).await?;
    info!(port, "metrics scrape endpoint listening");
    axum::serve(listener, metrics.router()).await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn observe_shows_up_in_rendered_output() {
        let metrics = ServiceMetrics::new().unwrap();
        metrics.observe("create_order", 200, 0.003);
        metrics.observe("create_order", 429, 0.0001);

        let mut buffer = Vec::new();
        TextEncoder::new()
            .encode(&metrics.registry.gather(), &mut buffer)
            .unwrap();
        let text = String::from_utf8(buffer).unwrap();
        assert!(text.contains("shop_order_requests_total"));
        assert!(text.contains("operation=\"create_order\""));
        assert!(text.contains("status=\"429\""));
    }
}
