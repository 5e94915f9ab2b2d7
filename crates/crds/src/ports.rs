//! Server container ports
//!
//! The fixed ports every server container exposes, plus the Prometheus
//! exporter port when the node configuration enables the exporter.
//! Port names are limited to 15 characters.

use k8s_openapi::api::core::v1::ContainerPort;
use kube::ResourceExt;
use serde_json::{Map, Value};
use server_config::{ConfigBuilderModel, ModelValuesProvider};
use tracing::debug;

use crate::datacenter::CassandraDatacenter;
use crate::error::DatacenterError;

/// Configuration section that enables the Prometheus exporter
pub const PROMETHEUS_CONFIG_KEY: &str = "10-write-prom-conf";

/// Exporter port, exposed when [`PROMETHEUS_CONFIG_KEY`] is configured
pub const PROMETHEUS_PORT: (&str, i32) = ("prometheus", 9103);

/// Ports every server container exposes, in order
pub const BASE_PORTS: &[(&str, i32)] = &[
    ("native", 9042),
    ("inter-node-msg", 8609),
    ("intra-node", 7000),
    ("tls-intra-node", 7001),
    // jmx 7199 is no longer exposed
    ("mgmt-api-http", 8080),
];

fn container_port((name, port): (&str, i32)) -> ContainerPort {
    ContainerPort {
        name: Some(name.to_string()),
        container_port: port,
        ..Default::default()
    }
}

/// Find the first object stored under `key`, looking at the current level
/// before descending into child objects in key order.
///
/// The key is matched by name anywhere in the tree, so a user override that
/// nests an identically named section elsewhere also matches.
fn find_section<'a>(map: &'a Map<String, Value>, key: &str) -> Option<&'a Map<String, Value>> {
    if let Some(Value::Object(section)) = map.get(key) {
        return Some(section);
    }

    map.values()
        .filter_map(Value::as_object)
        .find_map(|child| find_section(child, key))
}

/// Whether the document configures the Prometheus exporter. Presence of an
/// `enabled` key is enough; its value is not inspected.
pub fn prometheus_configured(document: &Value) -> bool {
    document
        .as_object()
        .and_then(|root| find_section(root, PROMETHEUS_CONFIG_KEY))
        .is_some_and(|section| section.contains_key("enabled"))
}

impl CassandraDatacenter {
    /// Container ports for the server pods, using the stock model
    pub fn container_ports(&self) -> Result<Vec<ContainerPort>, DatacenterError> {
        self.container_ports_with(&ConfigBuilderModel)
    }

    /// Container ports for the server pods.
    ///
    /// Fails only when the configuration document cannot be built.
    pub fn container_ports_with(
        &self,
        provider: &dyn ModelValuesProvider,
    ) -> Result<Vec<ContainerPort>, DatacenterError> {
        let config = self.config_json_with(provider)?;
        let document: Value =
            serde_json::from_str(&config).map_err(|err| DatacenterError::ModelMergeFailure {
                resource: self.name_any(),
                reason: err.to_string(),
            })?;

        let mut ports: Vec<ContainerPort> =
            BASE_PORTS.iter().copied().map(container_port).collect();
        if prometheus_configured(&document) {
            debug!(port = PROMETHEUS_PORT.1, "Exposing Prometheus exporter port");
            ports.push(container_port(PROMETHEUS_PORT));
        }

        Ok(ports)
    }
}
