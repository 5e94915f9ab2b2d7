//! Node configuration document
//!
//! Builds the JSON handed to the config builder: the generated model values
//! for this datacenter with `spec.config` overlaid on top.

use std::borrow::Cow;

use kube::ResourceExt;
use schemars::{JsonSchema, Schema, SchemaGenerator, json_schema};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use server_config::{ConfigBuilderModel, ModelValuesProvider, ModelValuesRequest};
use tracing::{debug, warn};

use crate::datacenter::{CassandraDatacenter, ServerType};
use crate::error::DatacenterError;
use crate::merge::{merge_documents, sort_keys};

/// Raw JSON text of `spec.config`.
///
/// The text is only parsed when the configuration document is built, so a
/// malformed override is reported against the resource rather than rejected
/// while decoding it. On the wire it is an ordinary JSON value; text that does
/// not parse is written back as a JSON string so the resource stays
/// serializable.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawConfig(String);

impl RawConfig {
    /// Wrap raw JSON text without validating it
    pub fn new(raw: impl Into<String>) -> Self {
        Self(raw.into())
    }

    /// The text as written
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Parse the text as JSON
    pub fn parse(&self) -> Result<serde_json::Value, serde_json::Error> {
        serde_json::from_str(&self.0)
    }
}

impl From<serde_json::Value> for RawConfig {
    fn from(value: serde_json::Value) -> Self {
        Self(value.to_string())
    }
}

impl Serialize for RawConfig {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self.parse() {
            Ok(value) => value.serialize(serializer),
            Err(_) => serializer.serialize_str(&self.0),
        }
    }
}

impl<'de> Deserialize<'de> for RawConfig {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        serde_json::Value::deserialize(deserializer).map(Self::from)
    }
}

impl JsonSchema for RawConfig {
    fn schema_name() -> Cow<'static, str> {
        "RawConfig".into()
    }

    fn inline_schema() -> bool {
        true
    }

    fn json_schema(_: &mut SchemaGenerator) -> Schema {
        json_schema!({
            "type": "object",
            "x-kubernetes-preserve-unknown-fields": true
        })
    }
}

/// DSE workload flags as the config builder expects them (`0`/`1`)
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct WorkloadFlags {
    /// Graph workload
    pub graph: u8,
    /// Search workload
    pub solr: u8,
    /// Analytics workload
    pub spark: u8,
}

impl CassandraDatacenter {
    /// Seed list: the seed service first, then `additionalSeeds`
    pub fn seeds(&self) -> Vec<String> {
        std::iter::once(self.seed_service_name())
            .chain(self.spec.additional_seeds.iter().cloned())
            .collect()
    }

    /// Workload flags. Only DSE datacenters can enable workloads.
    pub fn workload_flags(&self) -> WorkloadFlags {
        match (&self.spec.server_type, &self.spec.dse_workloads) {
            (ServerType::Dse, Some(workloads)) => WorkloadFlags {
                graph: u8::from(workloads.graph_enabled),
                solr: u8::from(workloads.search_enabled),
                spark: u8::from(workloads.analytics_enabled),
            },
            _ => WorkloadFlags::default(),
        }
    }

    /// Inputs for the model values generator
    pub fn model_values_request(&self) -> ModelValuesRequest {
        let flags = self.workload_flags();
        ModelValuesRequest {
            seeds: self.seeds(),
            cluster_name: self.spec.cluster_name.clone(),
            datacenter_name: self.name_any(),
            graph_enabled: flags.graph,
            solr_enabled: flags.solr,
            spark_enabled: flags.spark,
        }
    }

    /// Configuration document for the config builder, using the stock model
    pub fn config_json(&self) -> Result<String, DatacenterError> {
        self.config_json_with(&ConfigBuilderModel)
    }

    /// Configuration document for the config builder.
    ///
    /// Keys are sorted at every level, so unchanged specs always produce the
    /// same bytes.
    pub fn config_json_with(
        &self,
        provider: &dyn ModelValuesProvider,
    ) -> Result<String, DatacenterError> {
        let resource = self.name_any();
        let merge_failure = |reason: String| DatacenterError::ModelMergeFailure {
            resource: resource.clone(),
            reason,
        };

        let mut model = provider
            .model_values(&self.model_values_request())
            .map_err(|err| merge_failure(err.to_string()))?;
        if !model.is_object() {
            return Err(merge_failure("model values are not a JSON object".to_string()));
        }

        if let Some(config) = &self.spec.config {
            let overlay = config.parse().map_err(|source| DatacenterError::InvalidUserConfig {
                resource: resource.clone(),
                source,
            })?;
            if !overlay.is_object() {
                warn!(%resource, "spec.config is not a JSON object, ignoring it");
            }
            merge_documents(&mut model, overlay).map_err(|err| merge_failure(err.to_string()))?;
            debug!(%resource, "Merged spec.config over model values");
        }

        serde_json::to_string(&sort_keys(model)).map_err(|err| merge_failure(err.to_string()))
    }
}
