//! Stock model document
//!
//! Mirrors the layout `cass-config-builder` expects:
//!
//! ```json
//! {
//!   "cluster-info": { "name": "...", "seeds": "seed-a,seed-b" },
//!   "datacenter-info": { "name": "...", "graph-enabled": 0, "solr-enabled": 0, "spark-enabled": 0 }
//! }
//! ```

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::ServerConfigError;
use crate::{ModelValuesProvider, ModelValuesRequest};

/// Cluster-wide section of the model document
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "kebab-case")]
pub struct ClusterInfo {
    /// Cluster name
    pub name: String,

    /// Comma separated seed list
    pub seeds: String,
}

/// Datacenter section of the model document
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "kebab-case")]
pub struct DatacenterInfo {
    /// Datacenter name
    pub name: String,

    /// DSE Graph workload flag (`0`/`1`)
    pub graph_enabled: u8,

    /// DSE Search workload flag (`0`/`1`)
    pub solr_enabled: u8,

    /// DSE Analytics workload flag (`0`/`1`)
    pub spark_enabled: u8,
}

/// Typed form of the baseline model document
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "kebab-case")]
pub struct NodeConfig {
    /// Cluster-wide settings
    pub cluster_info: ClusterInfo,

    /// Settings for this datacenter
    pub datacenter_info: DatacenterInfo,
}

impl From<&ModelValuesRequest> for NodeConfig {
    fn from(request: &ModelValuesRequest) -> Self {
        Self {
            cluster_info: ClusterInfo {
                name: request.cluster_name.clone(),
                seeds: request.seeds.join(","),
            },
            datacenter_info: DatacenterInfo {
                name: request.datacenter_name.clone(),
                graph_enabled: request.graph_enabled,
                solr_enabled: request.solr_enabled,
                spark_enabled: request.spark_enabled,
            },
        }
    }
}

/// Model values provider matching the upstream config builder
#[derive(Debug, Clone, Copy, Default)]
pub struct ConfigBuilderModel;

impl ModelValuesProvider for ConfigBuilderModel {
    fn model_values(
        &self,
        request: &ModelValuesRequest,
    ) -> Result<serde_json::Value, ServerConfigError> {
        debug!(
            cluster = %request.cluster_name,
            datacenter = %request.datacenter_name,
            seeds = request.seeds.len(),
            "Building config builder model values"
        );
        Ok(serde_json::to_value(NodeConfig::from(request))?)
    }
}
