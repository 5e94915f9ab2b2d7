//! Derivation errors
//!
//! Every fallible derivation on a `CassandraDatacenter` returns one of these.
//! None of them are retried here; the caller decides whether a spec change is
//! needed.

use thiserror::Error;

/// Errors that can occur while deriving deployment facts from a datacenter
#[derive(Debug, Error)]
pub enum DatacenterError {
    /// No image is known for the server type/version (and base OS) combination
    #[error("{}", unsupported_message(.server_type, .version, .base_image_os.as_deref()))]
    UnsupportedServerVersion {
        /// Requested server type (`cassandra` or `dse`)
        server_type: String,
        /// Requested server version
        version: String,
        /// Base OS selector in effect, if any
        base_image_os: Option<String>,
    },

    /// `spec.config` is not valid JSON
    #[error("Error parsing spec.config for CassandraDatacenter resource {resource}: {source}")]
    InvalidUserConfig {
        /// Name of the offending resource
        resource: String,
        /// Underlying parser error
        #[source]
        source: serde_json::Error,
    },

    /// The baseline model could not be produced or merged with the user config
    #[error("Model information for CassandraDatacenter resource {resource} was not properly configured: {reason}")]
    ModelMergeFailure {
        /// Name of the offending resource
        resource: String,
        /// What went wrong
        reason: String,
    },
}

fn unsupported_message(server_type: &str, version: &str, base_image_os: Option<&str>) -> String {
    match base_image_os {
        Some(os) => format!(
            "server '{server_type}' and version '{version}', along with the specified base OS '{os}', do not work together"
        ),
        None => format!("server '{server_type}' and version '{version}' do not work together"),
    }
}
