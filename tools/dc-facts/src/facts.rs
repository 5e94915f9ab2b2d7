//! Derived deployment facts
//!
//! Everything the reconciler consumes from a `CassandraDatacenter`, gathered
//! into one serializable value.

use anyhow::{Context, Result};
use crds::{CassandraDatacenter, ConditionStatus, DatacenterConditionType, DeploymentProfile};
use serde::Serialize;

/// Named container port
#[derive(Debug, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PortFact {
    /// Port name
    pub name: String,
    /// Port number inside the container
    pub container_port: i32,
}

/// Rack with its share of the nodes
#[derive(Debug, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct RackFact {
    /// Rack name
    pub name: String,
    /// Zone the rack is pinned to
    #[serde(skip_serializing_if = "Option::is_none")]
    pub zone: Option<String>,
    /// Nodes assigned to the rack
    pub nodes: usize,
}

/// Facts derived from one datacenter
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DatacenterFacts {
    /// Datacenter name
    pub name: String,
    /// Cluster the datacenter joins
    pub cluster_name: String,
    /// Resolved server image
    pub server_image: String,
    /// Resolved config builder image
    pub config_builder_image: String,
    /// Document handed to the config builder
    pub config: serde_json::Value,
    /// Server container ports
    pub container_ports: Vec<PortFact>,
    /// Effective racks and node counts
    pub racks: Vec<RackFact>,
    /// Seed service name
    pub seed_service: String,
    /// Status of the Ready condition
    pub ready: ConditionStatus,
}

impl DatacenterFacts {
    /// Gather the facts for `dc` under `profile`
    pub fn derive(dc: &CassandraDatacenter, profile: &DeploymentProfile) -> Result<Self> {
        let name = dc.metadata.name.clone().unwrap_or_default();

        let server_image = dc
            .server_image(profile)
            .with_context(|| format!("error resolving server image for {name}"))?;
        let config_json = dc
            .config_json()
            .with_context(|| format!("error building config for {name}"))?;
        let config =
            serde_json::from_str(&config_json).context("error reading back config document")?;
        let container_ports = dc
            .container_ports()
            .with_context(|| format!("error deriving container ports for {name}"))?
            .into_iter()
            .map(|port| PortFact {
                name: port.name.unwrap_or_default(),
                container_port: port.container_port,
            })
            .collect();
        let racks = dc
            .node_counts_per_rack()
            .into_iter()
            .map(|(rack, nodes)| RackFact {
                name: rack.name,
                zone: rack.zone,
                nodes,
            })
            .collect();

        Ok(Self {
            cluster_name: dc.spec.cluster_name.clone(),
            config_builder_image: dc.config_builder_image(profile),
            seed_service: dc.seed_service_name(),
            ready: dc.condition_status(&DatacenterConditionType::READY),
            name,
            server_image,
            config,
            container_ports,
            racks,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const MANIFEST: &str = r#"
apiVersion: cassandra.datastax.com/v1beta1
kind: CassandraDatacenter
metadata:
  name: dc1
spec:
  clusterName: cluster1
  serverType: cassandra
  serverVersion: "4.0.0"
  size: 4
  racks:
    - name: r1
    - name: r2
    - name: r3
  config:
    cassandra-yaml:
      10-write-prom-conf:
        enabled: true
"#;

    fn load(manifest: &str) -> CassandraDatacenter {
        serde_yaml::from_str(manifest).unwrap()
    }

    #[test]
    fn test_derive_facts() {
        let facts = DatacenterFacts::derive(&load(MANIFEST), &DeploymentProfile::new()).unwrap();

        assert_eq!(facts.name, "dc1");
        assert_eq!(facts.server_image, "datastax/cassandra-mgmtapi-4_0_0:v0.1.5");
        assert_eq!(facts.config_builder_image, "datastax/cass-config-builder:1.0.1");
        assert_eq!(facts.seed_service, "cluster1-seed-service");
        assert_eq!(facts.ready, ConditionStatus::False);
        assert_eq!(facts.container_ports.len(), 6);
        assert_eq!(
            facts.container_ports.last(),
            Some(&PortFact { name: "prometheus".to_string(), container_port: 9103 })
        );
        assert_eq!(
            facts.racks.iter().map(|rack| rack.nodes).collect::<Vec<_>>(),
            vec![2, 1, 1]
        );
        assert_eq!(facts.config["cluster-info"]["name"], "cluster1");
    }

    #[test]
    fn test_derive_facts_ubi_profile() {
        let facts = DatacenterFacts::derive(&load(MANIFEST), &DeploymentProfile::with_base_image_os("ubi7")).unwrap();
        assert_eq!(facts.server_image, "datastax/cassandra:4.0-ubi7");
        assert_eq!(facts.config_builder_image, "datastax/cass-config-builder:1.0.1-ubi7");
    }

    #[test]
    fn test_derive_facts_unsupported_version() {
        let manifest = MANIFEST.replace("\"4.0.0\"", "\"3.0.0\"");
        let err = DatacenterFacts::derive(&load(&manifest), &DeploymentProfile::new()).unwrap_err();
        assert!(format!("{err:#}").contains("server 'cassandra' and version '3.0.0' do not work together"));
    }
}
