//! CassandraDatacenter CRD
//!
//! The `CassandraDatacenter` custom resource and the pure functions that turn
//! it into deployment facts for the reconciler:
//! - server and config builder images ([`images`])
//! - the node configuration document ([`config`], [`merge`])
//! - server container ports ([`ports`])
//! - node counts per rack ([`racks`])
//! - status conditions ([`conditions`])

pub mod conditions;
pub mod config;
pub mod datacenter;
pub mod error;
pub mod images;
pub mod merge;
pub mod ports;
pub mod profile;
pub mod racks;

#[cfg(test)]
mod datacenter_test;
#[cfg(test)]
mod test_utils;

pub use conditions::*;
pub use config::{RawConfig, WorkloadFlags};
pub use datacenter::*;
pub use error::DatacenterError;
pub use images::{resolve_config_builder_image, resolve_server_image};
pub use ports::prometheus_configured;
pub use profile::DeploymentProfile;
pub use racks::split_racks;
