//! CassandraDatacenter CRD
//!
//! Declares one Cassandra or DSE datacenter: the desired state written by the
//! user and the observed state written by the reconciler. Everything the
//! reconciler deploys (images, node configuration, ports, rack sizes) is
//! derived from the spec on demand and never stored on the resource.

use std::borrow::Cow;
use std::collections::BTreeMap;
use std::fmt;

use k8s_openapi::api::core::v1::{
    PersistentVolumeClaimSpec, PodTemplateSpec, ResourceRequirements, SecretReference,
};
use kube::{CustomResource, ResourceExt};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::conditions::DatacenterCondition;
use crate::config::RawConfig;
use crate::error::DatacenterError;
use crate::images::{resolve_config_builder_image, resolve_server_image};
use crate::profile::DeploymentProfile;
use crate::racks::split_racks;

/// Label carrying the cluster name
pub const CLUSTER_LABEL: &str = "cassandra.datastax.com/cluster";

/// Label carrying the datacenter name
pub const DATACENTER_LABEL: &str = "cassandra.datastax.com/datacenter";

/// Label marking seed nodes
pub const SEED_NODE_LABEL: &str = "cassandra.datastax.com/seed-node";

/// Label carrying the rack name
pub const RACK_LABEL: &str = "cassandra.datastax.com/rack";

/// Label carrying the operator progress
pub const OPERATOR_PROGRESS_LABEL: &str = "cassandra.datastax.com/operator-progress";

/// Label carrying the node state
pub const NODE_STATE_LABEL: &str = "cassandra.datastax.com/node-state";

/// Name of the synthetic rack used when the spec declares none
pub const DEFAULT_RACK_NAME: &str = "default";

/// CassandraDatacenterSpec defines the desired state of a CassandraDatacenter
#[derive(CustomResource, Debug, Clone, Serialize, Deserialize, JsonSchema, Default, PartialEq)]
#[kube(
    group = "cassandra.datastax.com",
    version = "v1beta1",
    kind = "CassandraDatacenter",
    namespaced,
    status = "CassandraDatacenterStatus",
    shortname = "cassdc",
    shortname = "cassdcs",
    printcolumn = r#"{"name":"Cluster","type":"string","jsonPath":".spec.clusterName"}"#,
    printcolumn = r#"{"name":"Server","type":"string","jsonPath":".spec.serverType"}"#,
    printcolumn = r#"{"name":"Version","type":"string","jsonPath":".spec.serverVersion"}"#,
    printcolumn = r#"{"name":"Size","type":"integer","jsonPath":".spec.size"}"#
)]
#[serde(rename_all = "camelCase")]
pub struct CassandraDatacenterSpec {
    /// Desired number of server nodes
    #[schemars(range(min = 1))]
    pub size: i32,

    /// Version string for the config builder, used to generate the server configuration
    #[schemars(extend("enum" = ["6.8.0", "6.8.1", "3.11.6", "4.0.0"]))]
    pub server_version: String,

    /// Server image name. When set, overrides the image derived from `serverVersion`.
    /// More info: https://kubernetes.io/docs/concepts/containers/images
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub server_image: Option<String>,

    /// Server type
    pub server_type: ServerType,

    /// Node configuration overrides, layered over the generated model
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub config: Option<RawConfig>,

    /// Management API certificate configuration
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub management_api_auth: Option<ManagementApiAuthConfig>,

    /// Resource requests and limits, per pod
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub resources: Option<ResourceRequirements>,

    /// Named racks in the datacenter, representing independent failure domains.
    /// The number of racks should match the replication factor of the keyspaces
    /// and cannot easily be changed once the datacenter is deployed.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub racks: Vec<Rack>,

    /// Persistent storage request of each server node
    #[serde(default)]
    pub storage_config: StorageConfig,

    /// Pod names that need to be replaced
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub replace_nodes: Vec<String>,

    /// Name by which CQL clients and instances know the cluster. Datacenters in
    /// the same namespace sharing a cluster name join one multi-datacenter cluster.
    #[schemars(length(min = 2))]
    pub cluster_name: String,

    /// A stopped datacenter runs no server pods; volumes re-attach on resume
    #[serde(default)]
    pub stopped: bool,

    /// Container image for the config builder init container
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub config_builder_image: Option<String>,

    /// Push configuration and image changes to the first rack only
    #[serde(default)]
    pub canary_upgrade: bool,

    /// Allow more than one server pod per worker node
    #[serde(default)]
    pub allow_multiple_nodes_per_worker: bool,

    /// Secret holding the superuser credentials. Generated when omitted.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub superuser_secret_name: Option<String>,

    /// Service account for the server pods
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub service_account: Option<String>,

    /// Request a rolling restart at the next opportunity
    #[serde(default)]
    pub rolling_restart_requested: bool,

    /// Restrict node scheduling to workers with matching labels
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub node_selector: BTreeMap<String, String>,

    /// Racks that receive the latest StatefulSet configuration even when nodes are down
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub force_upgrade_racks: Vec<String>,

    /// DSE workloads to enable
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dse_workloads: Option<DseWorkloads>,

    /// Customisation of the server pods (labels, annotations, affinity, ...)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pod_template_spec: Option<PodTemplateSpec>,

    /// Users to bootstrap
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub users: Vec<CassandraUser>,

    /// Seeds outside this cluster's seed service
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub additional_seeds: Vec<String>,

    /// Repair service sidecar
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reaper: Option<ReaperConfig>,
}

/// Server distribution
#[derive(Debug, Clone, Copy, Serialize, Deserialize, JsonSchema, Default, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum ServerType {
    /// Apache Cassandra
    #[default]
    Cassandra,

    /// DataStax Enterprise
    Dse,
}

impl ServerType {
    /// Wire name of the server type
    pub fn as_str(self) -> &'static str {
        match self {
            ServerType::Cassandra => "cassandra",
            ServerType::Dse => "dse",
        }
    }
}

impl fmt::Display for ServerType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A named failure domain
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Rack {
    /// Rack name
    #[schemars(length(min = 2))]
    pub name: String,

    /// Zone to pin the rack to, using node affinity
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub zone: Option<String>,
}

impl Rack {
    /// Rack without a zone
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            zone: None,
        }
    }
}

/// Persistent storage of each server node
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, Default, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct StorageConfig {
    /// Claim template for the data volume
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cassandra_data_volume_claim_spec: Option<PersistentVolumeClaimSpec>,
}

/// DSE workloads
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, Default, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct DseWorkloads {
    /// Enable DSE Analytics (Spark)
    #[serde(default)]
    pub analytics_enabled: bool,

    /// Enable DSE Graph
    #[serde(default)]
    pub graph_enabled: bool,

    /// Enable DSE Search (Solr)
    #[serde(default)]
    pub search_enabled: bool,
}

/// User bootstrapped from a secret
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct CassandraUser {
    /// Secret holding the user's credentials
    pub secret_name: String,

    /// Whether the user is a superuser
    #[serde(default)]
    pub superuser: bool,
}

/// Repair service sidecar settings
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, Default, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ReaperConfig {
    /// Deploy the repair sidecar
    #[serde(default)]
    pub enabled: bool,

    /// Sidecar image override
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,

    /// One of Always, Never, IfNotPresent
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_pull_policy: Option<String>,
}

/// Management API authentication strategy. At most one should be set.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, Default, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ManagementApiAuthConfig {
    /// Plain HTTP, no client authentication
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub insecure: Option<ManagementApiAuthInsecureConfig>,

    /// Mutual TLS with user-supplied certificates
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub manual: Option<ManagementApiAuthManualConfig>,
}

/// Insecure management API access
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, Default, PartialEq, Eq)]
pub struct ManagementApiAuthInsecureConfig {}

/// Certificates provided through secrets
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, Default, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ManagementApiAuthManualConfig {
    /// Secret with the client certificate and key
    pub client_secret_name: String,

    /// Secret with the server certificate and key
    pub server_secret_name: String,

    /// Do not check that the secrets exist
    #[serde(default)]
    pub skip_secret_validation: bool,
}

/// Last known progress of the operator
#[derive(Debug, Clone, Copy, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub enum ProgressState {
    /// Changes are being rolled out
    Updating,
    /// Observed state matches the spec
    Ready,
}

/// Observed state of one server node
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, Default, PartialEq, Eq)]
pub struct CassandraNodeStatus {
    /// Host ID reported by the node
    #[serde(rename = "hostID", default, skip_serializing_if = "Option::is_none")]
    pub host_id: Option<String>,
}

/// CassandraDatacenterStatus defines the observed state of a CassandraDatacenter
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, Default, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CassandraDatacenterStatus {
    /// At most one entry per condition type
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub conditions: Vec<DatacenterCondition>,

    /// Deprecated, use `usersUpserted`. When superuser credentials were last
    /// upserted to the management API.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub super_user_upserted: Option<chrono::DateTime<chrono::Utc>>,

    /// When managed users' credentials were last upserted to the management API
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub users_upserted: Option<chrono::DateTime<chrono::Utc>>,

    /// When the operator last started a server node
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_server_node_started: Option<chrono::DateTime<chrono::Utc>>,

    /// Last known progress of the operator
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cassandra_operator_progress: Option<ProgressState>,

    /// When the last rolling restart started
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_rolling_restart: Option<chrono::DateTime<chrono::Utc>>,

    /// Per-node status, keyed by pod name
    #[serde(default)]
    pub node_statuses: BTreeMap<String, CassandraNodeStatus>,

    /// Pods currently being replaced
    #[serde(default)]
    pub node_replacements: Vec<String>,
}

impl CassandraDatacenter {
    /// Effective racks. An empty rack list reads as a single `default` rack.
    pub fn racks(&self) -> Cow<'_, [Rack]> {
        if self.spec.racks.is_empty() {
            Cow::Owned(vec![Rack::new(DEFAULT_RACK_NAME)])
        } else {
            Cow::Borrowed(&self.spec.racks)
        }
    }

    /// Node count for each effective rack, in rack order
    pub fn node_counts_per_rack(&self) -> Vec<(Rack, usize)> {
        let racks = self.racks().into_owned();
        let size = usize::try_from(self.spec.size).unwrap_or_default();
        let counts = split_racks(size, racks.len());
        racks.into_iter().zip(counts).collect()
    }

    /// Server image to run, from `serverImage` or the version tables
    pub fn server_image(&self, profile: &DeploymentProfile) -> Result<String, DatacenterError> {
        resolve_server_image(
            self.spec.server_type,
            &self.spec.server_version,
            self.spec.server_image.as_deref(),
            profile,
        )
    }

    /// Config builder image to run
    pub fn config_builder_image(&self, profile: &DeploymentProfile) -> String {
        resolve_config_builder_image(self.spec.config_builder_image.as_deref(), profile)
    }

    /// `{cluster: <clusterName>}`
    pub fn cluster_labels(&self) -> BTreeMap<String, String> {
        BTreeMap::from([(CLUSTER_LABEL.to_string(), self.spec.cluster_name.clone())])
    }

    /// Cluster labels plus `{datacenter: <name>}`
    pub fn datacenter_labels(&self) -> BTreeMap<String, String> {
        let mut labels = self.cluster_labels();
        labels.insert(DATACENTER_LABEL.to_string(), self.name_any());
        labels
    }

    /// Datacenter labels plus `{rack: <rack_name>}`
    pub fn rack_labels(&self, rack_name: &str) -> BTreeMap<String, String> {
        let mut labels = self.datacenter_labels();
        labels.insert(RACK_LABEL.to_string(), rack_name.to_string());
        labels
    }

    /// Service resolving to the cluster's seed nodes
    pub fn seed_service_name(&self) -> String {
        format!("{}-seed-service", self.spec.cluster_name)
    }

    /// Headless service covering every pod of the datacenter
    pub fn all_pods_service_name(&self) -> String {
        format!("{}-{}-all-pods-service", self.spec.cluster_name, self.name_any())
    }

    /// Client-facing service of the datacenter
    pub fn datacenter_service_name(&self) -> String {
        format!("{}-{}-service", self.spec.cluster_name, self.name_any())
    }

    /// True when no superuser secret was named in the spec
    pub fn should_generate_superuser_secret(&self) -> bool {
        self.spec.superuser_secret_name.as_deref().is_none_or(str::is_empty)
    }

    /// Where the superuser credentials live
    pub fn superuser_secret_ref(&self) -> SecretReference {
        let name = match self.spec.superuser_secret_name.as_deref() {
            Some(name) if !name.is_empty() => name.to_string(),
            _ => format!("{}-superuser", self.spec.cluster_name),
        };

        SecretReference {
            name: Some(name),
            namespace: self.namespace(),
        }
    }
}
