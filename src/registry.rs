//! Service discovery: registration with the consul agent.
//!
//! The node publishes one `ServiceRegistration` at startup, keeps it alive
//! with a TTL heartbeat task, and deregisters on graceful shutdown.
//! Registration failure is fatal at startup; deregistration failure is
//! logged and otherwise ignored at shutdown.

use std::time::Duration;

use serde::Serialize;
use thiserror::Error;
use tokio::task::JoinHandle;
use tracing::{info, warn};
use uuid::Uuid;

const TTL: &str = "15s";
const DEREGISTER_AFTER: &str = "1m";
const HEARTBEAT_INTERVAL: Duration = Duration::from_secs(5);

/// The record this node publishes to the discovery backend.
#[derive(Debug, Clone)]
pub struct ServiceRegistration {
    pub id: String,
    pub name: String,
    pub version: String,
    pub address: String,
    pub port: u16,
}

impl ServiceRegistration {
    /// Builds a registration with a unique instance id.
    pub fn new(name: &str, version: &str, address: &str, port: u16) -> Self {
        Self {
            id: format!("{name}-{}", Uuid::new_v4()),
            name: name.to_string(),
            version: version.to_string(),
            address: address.to_string(),
            port,
        }
    }
}

#[derive(Debug, Error)]
pub enum RegistryError {
    #[error("service registration failed: {0}")]
    Registration(anyhow::Error),

    #[error("service deregistration failed: {0}")]
    Deregistration(anyhow::Error),
}

/// Consul agent API payload for service registration.
#[derive(Serialize)]
struct AgentService<'a> {
    #[serde(rename = "ID")]
    id: &'a str,
    #[serde(rename = "Name")]
    name: &'a str,
    #[serde(rename = "Tags")]
    tags: Vec<&'a str>,
    #[serde(rename = "Address")]
    address: &'a str,
    #[serde(rename = "Port")]
    port: u16,
    #[serde(rename = "Check")]
    check: AgentCheck<'a>,
}

#[derive(Serialize)]
struct AgentCheck<'a> {
    #[serde(rename = "TTL")]
    ttl: &'a str,
    #[serde(rename = "DeregisterCriticalServiceAfter")]
    deregister_critical_service_after: &'a str,
}

/// Client for the consul agent's service endpoints.
pub struct ConsulRegistry {
    client: reqwest::Client,
    base_url: String,
}

impl ConsulRegistry {
    pub fn new(consul_addr: &str) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: format!("http://{consul_addr}"),
        }
    }

    /// Registers the service with a TTL health check.
    pub async fn register(&self, registration: &ServiceRegistration) -> Result<(), RegistryError> {
        let payload = AgentService {
            id: &registration.id,
            name: &registration.name,
            tags: vec![registration.version.as_str()],
            address: &registration.address,
            port: registration.port,
            check: AgentCheck {
                ttl: TTL,
                deregister_critical_service_after: DEREGISTER_AFTER,
            },
        };

        let url = format!("{}/v1/agent/service/register", self.base_url);
        let response = self
            .client
            .put(&url)
            .json(&payload)
            .send()
            .await
            .map_err(|e| RegistryError::Registration(e.into()))?;
        if !response.status().is_success() {
            return Err(RegistryError::Registration(anyhow::anyhow!(
                "consul returned {}",
                response.status()
            )));
        }
        info!(service_id = %registration.id, "registered with service registry");
        Ok(())
    }

    /// Removes the registration. Called during graceful shutdown.
    pub async fn deregister(&self, service_id: &str) -> Result<(), RegistryError> {
        let url = format!(
            "{}/v1/agent/service/deregister/{service_id}",
            self.base_url
        );
        let response = self
            .client
            .put(&url)
            .send()
            .await
            .map_err(|e| RegistryError::Deregistration(e.into()))?;
        if !response.status().is_success() {
            return Err(RegistryError::Deregistration(anyhow::anyhow!(
                "consul returned {}",
                response.status()
            )));
        }
        info!(service_id, "deregistered from service registry");
        Ok(())
    }

    /// Spawns the TTL heartbeat task. The handle is aborted at shutdown,
    /// just before deregistration.
    pub fn spawn_heartbeat(&self, service_id: String) -> JoinHandle<()> {
        let client = self.client.clone();
        let url = format!(
            "{}/v1/agent/check/pass/service:{service_id}",
            self.base_url
        );
        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(HEARTBEAT_INTERVAL);
            loop {
                ticker.tick().await;
                match client.put(&url).send().await {
                    Ok(response) if response.status().is_success() => {}
                    Ok(response) => {
                        warn!(status = %response.status(), "registry heartbeat rejected")
                    }
                    Err(err) => warn!(error = %err, "registry heartbeat failed"),
                }
            }
        })
    }
}
