//! Test utilities
//!
//! Helpers for building datacenters in unit tests.

use k8s_openapi::apimachinery::pkg::apis::meta::v1::ObjectMeta;

use crate::config::RawConfig;
use crate::datacenter::{CassandraDatacenter, CassandraDatacenterSpec, ServerType};

/// Helper to create a three node Cassandra 3.11.6 datacenter in namespace `cass`
pub fn create_test_datacenter(name: &str, cluster_name: &str) -> CassandraDatacenter {
    CassandraDatacenter {
        metadata: ObjectMeta {
            name: Some(name.to_string()),
            namespace: Some("cass".to_string()),
            ..Default::default()
        },
        spec: CassandraDatacenterSpec {
            size: 3,
            server_type: ServerType::Cassandra,
            server_version: "3.11.6".to_string(),
            cluster_name: cluster_name.to_string(),
            ..Default::default()
        },
        status: None,
    }
}

/// Helper to attach raw `spec.config` text
pub fn with_config(mut dc: CassandraDatacenter, config: &str) -> CassandraDatacenter {
    dc.spec.config = Some(RawConfig::new(config));
    dc
}
