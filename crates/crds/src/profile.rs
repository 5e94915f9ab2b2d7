//! Deployment profile
//!
//! Process-wide settings that influence image resolution. The profile is built
//! once at startup and passed explicitly to the resolvers.

use std::env;

/// Environment variable naming the base OS the operator images were built on
pub const ENV_BASE_IMAGE_OS: &str = "BASE_IMAGE_OS";

/// Settings owned by the caller's startup path
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DeploymentProfile {
    /// Base OS selector. `None` selects the default image family; any value
    /// selects the universal base image (UBI) family.
    pub base_image_os: Option<String>,
}

impl DeploymentProfile {
    /// Profile using the default image family
    pub fn new() -> Self {
        Self::default()
    }

    /// Profile with an explicit base OS selector. An empty string counts as unset.
    pub fn with_base_image_os(base_image_os: impl Into<String>) -> Self {
        let base_image_os = base_image_os.into();
        Self {
            base_image_os: (!base_image_os.is_empty()).then_some(base_image_os),
        }
    }

    /// Load the profile from `BASE_IMAGE_OS`
    pub fn from_env() -> Self {
        env::var(ENV_BASE_IMAGE_OS)
            .map(Self::with_base_image_os)
            .unwrap_or_default()
    }

    /// Base OS selector, if set
    pub fn base_image_os(&self) -> Option<&str> {
        self.base_image_os.as_deref()
    }

    /// Whether the universal base image family is selected
    pub fn uses_universal_base(&self) -> bool {
        self.base_image_os.is_some()
    }
}
