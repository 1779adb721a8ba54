//! Tracing pipeline: console logging plus OTLP span export.
//!
//! Spans created by the middleware chain are exported in batches to the
//! collector derived from the deployment host. The provider is flushed
//! and shut down as the last step of graceful shutdown.

use opentelemetry::KeyValue;
use opentelemetry::global;
use opentelemetry::trace::TracerProvider as _;
use opentelemetry_otlp::WithExportConfig;
use opentelemetry_sdk::Resource;
use opentelemetry_sdk::trace::SdkTracerProvider;
use tracing::warn;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, fmt};

/// Handle to the installed tracer provider, kept for the shutdown flush.
pub struct Telemetry {
    provider: SdkTracerProvider,
}

/// Installs the global subscriber: fmt layer for logs, OTLP layer for
/// span export. Must be called exactly once, before any other startup
/// step, so that startup failures are logged through the same pipeline.
pub fn init(service_name: &str, otlp_endpoint: &str) -> anyhow::Result<Telemetry> {
    let exporter = opentelemetry_otlp::SpanExporter::builder()
        .with_tonic()
        .with_endpoint(otlp_endpoint)
        .build()?;

    let resource = Resource::builder_empty()
        .with_attributes([KeyValue::new("service.name", service_name.to_string())])
        .build();

    let provider = SdkTracerProvider::builder()
        .with_batch_exporter(exporter)
        .with_resource(resource)
        .build();

    global::set_tracer_provider(provider.clone());
    let tracer = provider.tracer("shop-order");

    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with(fmt::layer())
        .with(tracing_opentelemetry::OpenTelemetryLayer::new(tracer))
        .try_init()?;

    Ok(Telemetry { provider })
}

impl Telemetry {
    /// Flushes buffered spans and stops the exporter.
    pub fn shutdown(&self) {
        if let Err(err) = self.provider.shutdown() {
            warn!(error = %err, "tracing exporter shutdown failed");
        }
    }
}
