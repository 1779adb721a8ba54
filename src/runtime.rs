//! Process lifecycle for the order service node.
//!
//! Startup order: telemetry, configuration resolution, relational pool,
//! metrics listener, registry registration, service composition, serve.
//! Any failure before the serve loop is fatal and aborts startup before a
//! listener is opened beyond the step that failed. Shutdown drains
//! in-flight calls, deregisters, closes the pool, and flushes the tracing
//! exporter.

use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use sqlx::mysql::MySqlPoolOptions;
use tracing::{error, info, warn};

use crate::api::{Api, AppState};
use crate::config::{self, MysqlConfig, RuntimeConfig};
use crate::domain::services::OrderServiceImpl;
use crate::metrics::{self, ServiceMetrics};
use crate::middleware::RateGate;
use crate::outbounds::MySqlOrderRepository;
use crate::registry::{ConsulRegistry, ServiceRegistration};
use crate::telemetry;

const POOL_MAX_CONNECTIONS: u32 = 10;
const POOL_ACQUIRE_TIMEOUT: Duration = Duration::from_secs(5);

/// Owns the startup sequence, the serve loop, and the drain shutdown.
pub struct ServiceRuntime {
    config: RuntimeConfig,
}

impl ServiceRuntime {
    pub fn new(config: RuntimeConfig) -> Self {
        Self { config }
    }

    pub async fn run(self) -> anyhow::Result<()> {
        let cfg = &self.config;

        let telemetry = telemetry::init(&cfg.service_name, &cfg.otlp_endpoint)
            .context("tracing pipeline init failed")?;

        self.before_start();

        // Configuration center. Starting with unknown configuration is
        // not an option: no default fallback.
        let tree = config::resolve(&cfg.consul_addr, &cfg.config_prefix)
            .await
            .context("fatal: configuration store unreachable")?;
        let mysql: MysqlConfig = tree
            .get_json("mysql")
            .context("fatal: mysql configuration group missing or malformed")?;

        let pool = MySqlPoolOptions::new()
            .max_connections(POOL_MAX_CONNECTIONS)
            .acquire_timeout(POOL_ACQUIRE_TIMEOUT)
            .connect(&mysql.url())
            .await
            .context("fatal: relational store connection failed")?;
        info!(host = %mysql.host, database = %mysql.database, "connected to relational store");

        let service_metrics =
            Arc::new(ServiceMetrics::new().context("metrics registry init failed")?);
        let scrape = {
            let service_metrics = Arc::clone(&service_metrics);
            let port = cfg.metrics_port;
            tokio::spawn(async move {
                if let Err(err) = metrics::serve_scrape_endpoint(service_metrics, port).await {
                    error!(error = %format!("{err:#}"), "metrics endpoint failed");
                }
            })
        };

        // Discovery. Registration failure at this point is fatal; the
        // node must not serve traffic peers cannot route to.
        let registry = ConsulRegistry::new(&cfg.consul_addr);
        let registration = ServiceRegistration::new(
            &cfg.service_name,
            &cfg.service_version,
            &cfg.deploy_host,
            cfg.bind_addr.port(),
        );
        registry
            .register(&registration)
            .await
            .context("fatal: service registration failed")?;
        let heartbeat = registry.spawn_heartbeat(registration.id.clone());

        // Service composition: handler -> service -> repository -> pool.
        let repository = Arc::new(MySqlOrderRepository::new(pool.clone()));
        let order_service = Arc::new(OrderServiceImpl::new(repository));
        let state = Arc::new(AppState::new(order_service));
        let gate = Arc::new(RateGate::new(cfg.qps)?);
        let api = Api::new(cfg.bind_addr, state, gate, Arc::clone(&service_metrics));

        self.after_start();

        // Serves until a termination signal arrives, then drains.
        api.serve(shutdown_signal()).await?;

        self.before_stop();

        heartbeat.abort();
        scrape.abort();
        if let Err(err) = registry.deregister(&registration.id).await {
            warn!(error = %err, "deregistration failed during shutdown");
        }
        pool.close().await;
        telemetry.shutdown();

        self.after_stop();
        Ok(())
    }

    // Lifecycle markers. Extension points for readiness and liveness
    // signaling.

    fn before_start(&self) {
        info!(service = %self.config.service_name, "before start");
    }

    fn after_start(&self) {
        info!(service = %self.config.service_name, "after start");
    }

    fn before_stop(&self) {
        info!(service = %self.config.service_name, "before stop");
    }

    fn after_stop(&self) {
        info!(service = %self.config.service_name, "after stop");
    }
}

/// Resolves on SIGTERM or ctrl-c.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(err) = tokio::signal::ctrl_c().await {
            error!(error = %err, "ctrl-c handler failed");
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(err) => error!(error = %err, "SIGTERM handler failed"),
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {}
        () = terminate => {}
    }
    info!("termination signal received, draining in-flight calls");
}
