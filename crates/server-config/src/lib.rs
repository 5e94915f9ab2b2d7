//! Config Builder Model Values
//!
//! Produces the baseline model document consumed by the config builder
//! (`cass-config-builder`). The document describes the cluster topology the
//! builder needs to render `cassandra.yaml`, `dse.yaml` and friends; user
//! overrides are layered on top of it by the `crds` crate.
//!
//! # Example
//!
//! ```
//! use server_config::{ConfigBuilderModel, ModelValuesProvider, ModelValuesRequest};
//!
//! let request = ModelValuesRequest {
//!     seeds: vec!["cluster1-seed-service".to_string()],
//!     cluster_name: "cluster1".to_string(),
//!     datacenter_name: "dc1".to_string(),
//!     graph_enabled: 0,
//!     solr_enabled: 0,
//!     spark_enabled: 1,
//! };
//!
//! let model = ConfigBuilderModel.model_values(&request).unwrap();
//! assert_eq!(model["datacenter-info"]["spark-enabled"], 1);
//! ```

pub mod error;
#[cfg(feature = "test-util")]
pub mod mock;
pub mod model;

pub use error::ServerConfigError;
#[cfg(feature = "test-util")]
pub use mock::MockModelValues;
pub use model::{ClusterInfo, ConfigBuilderModel, DatacenterInfo, NodeConfig};

/// Inputs the config builder needs to know about the datacenter topology.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ModelValuesRequest {
    /// Seed addresses, in the order they should be contacted
    pub seeds: Vec<String>,

    /// Cluster name shared by every datacenter in the cluster
    pub cluster_name: String,

    /// Name of this datacenter
    pub datacenter_name: String,

    /// `1` when DSE Graph is enabled, else `0`
    pub graph_enabled: u8,

    /// `1` when DSE Search (Solr) is enabled, else `0`
    pub solr_enabled: u8,

    /// `1` when DSE Analytics (Spark) is enabled, else `0`
    pub spark_enabled: u8,
}

/// Source of the baseline model document.
///
/// The stock implementation is [`ConfigBuilderModel`]; tests can substitute
/// [`MockModelValues`] (feature `test-util`).
pub trait ModelValuesProvider: Send + Sync {
    /// Build the baseline model document for the given topology.
    ///
    /// The result is expected to be a JSON object.
    fn model_values(
        &self,
        request: &ModelValuesRequest,
    ) -> Result<serde_json::Value, ServerConfigError>;
}
