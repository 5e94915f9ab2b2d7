//! Container image resolution
//!
//! Maps a server type and version onto a pullable image. Two image families
//! exist: the default one, and the universal base image (UBI) one used when
//! the operator runs with a base OS selector. Both tables share the same keys.

use tracing::{debug, warn};

use crate::datacenter::ServerType;
use crate::error::DatacenterError;
use crate::profile::DeploymentProfile;

/// Config builder image for the default image family
pub const DEFAULT_CONFIG_BUILDER_IMAGE: &str = "datastax/cass-config-builder:1.0.1";

/// Config builder image for the universal base image family
pub const UBI_CONFIG_BUILDER_IMAGE: &str = "datastax/cass-config-builder:1.0.1-ubi7";

const DEFAULT_SERVER_IMAGES: &[(&str, &str)] = &[
    ("dse-6.8.0", "datastax/dse-server:6.8.0"),
    ("dse-6.8.1", "datastax/dse-server:6.8.1"),
    ("cassandra-3.11.6", "datastax/cassandra-mgmtapi-3_11_6:v0.1.5"),
    ("cassandra-4.0.0", "datastax/cassandra-mgmtapi-4_0_0:v0.1.5"),
];

const UBI_SERVER_IMAGES: &[(&str, &str)] = &[
    ("dse-6.8.0", "datastax/dse-server:6.8.0-ubi7"),
    ("dse-6.8.1", "datastax/dse-server:6.8.1-ubi7"),
    ("cassandra-3.11.6", "datastax/cassandra:3.11.6-ubi7"),
    ("cassandra-4.0.0", "datastax/cassandra:4.0-ubi7"),
];

/// Server versions with a known image, in schema order
pub const SUPPORTED_SERVER_VERSIONS: &[&str] = &["6.8.0", "6.8.1", "3.11.6", "4.0.0"];

fn server_image_table(profile: &DeploymentProfile) -> &'static [(&'static str, &'static str)] {
    if profile.uses_universal_base() {
        UBI_SERVER_IMAGES
    } else {
        DEFAULT_SERVER_IMAGES
    }
}

/// Resolve the server image for a type/version pair.
///
/// A non-empty `explicit_image` always wins and is returned untouched.
/// Otherwise the image comes from the table selected by `profile`.
///
/// # Errors
///
/// [`DatacenterError::UnsupportedServerVersion`] when no image is known for
/// the combination.
pub fn resolve_server_image(
    server_type: ServerType,
    server_version: &str,
    explicit_image: Option<&str>,
    profile: &DeploymentProfile,
) -> Result<String, DatacenterError> {
    if let Some(image) = explicit_image.filter(|image| !image.is_empty()) {
        debug!(image, "Using explicit server image");
        return Ok(image.to_string());
    }

    let key = format!("{server_type}-{server_version}");
    let image = server_image_table(profile)
        .iter()
        .find_map(|(candidate, image)| (*candidate == key).then_some(*image));

    match image {
        Some(image) => {
            debug!(%key, image, ubi = profile.uses_universal_base(), "Resolved server image");
            Ok(image.to_string())
        }
        None => {
            warn!(%key, base_image_os = ?profile.base_image_os(), "No server image for version");
            Err(DatacenterError::UnsupportedServerVersion {
                server_type: server_type.to_string(),
                version: server_version.to_string(),
                base_image_os: profile.base_image_os.clone(),
            })
        }
    }
}

/// Resolve the config builder image. An explicit override wins; otherwise the
/// image family follows `profile`.
pub fn resolve_config_builder_image(
    explicit_image: Option<&str>,
    profile: &DeploymentProfile,
) -> String {
    match explicit_image.filter(|image| !image.is_empty()) {
        Some(image) => image.to_string(),
        None if profile.uses_universal_base() => UBI_CONFIG_BUILDER_IMAGE.to_string(),
        None => DEFAULT_CONFIG_BUILDER_IMAGE.to_string(),
    }
}
