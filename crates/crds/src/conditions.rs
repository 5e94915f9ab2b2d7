//! Datacenter conditions
//!
//! The status carries at most one condition per type. Setting a condition
//! replaces the existing entry of that type in place, or appends a new one.
//! Transitions are not validated here.

use std::borrow::Cow;
use std::fmt;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::datacenter::{CassandraDatacenter, CassandraDatacenterStatus};

/// Condition type token
///
/// Well-known types are provided as constants; any other token is accepted.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq, Hash)]
#[serde(transparent)]
pub struct DatacenterConditionType(Cow<'static, str>);

impl DatacenterConditionType {
    /// All nodes are up and serving
    pub const READY: Self = Self::from_static("Ready");
    /// The datacenter finished its first start
    pub const INITIALIZED: Self = Self::from_static("Initialized");
    /// Nodes listed in `replaceNodes` are being replaced
    pub const REPLACING_NODES: Self = Self::from_static("ReplacingNodes");
    /// Nodes are being added
    pub const SCALING_UP: Self = Self::from_static("ScalingUp");
    /// A configuration or image change is rolling out
    pub const UPDATING: Self = Self::from_static("Updating");
    /// The datacenter is stopped
    pub const STOPPED: Self = Self::from_static("Stopped");
    /// The datacenter is starting back up after a stop
    pub const RESUMING: Self = Self::from_static("Resuming");
    /// A rolling restart is in progress
    pub const ROLLING_RESTART: Self = Self::from_static("RollingRestart");

    const fn from_static(name: &'static str) -> Self {
        Self(Cow::Borrowed(name))
    }

    /// Caller-defined condition type
    pub fn new(name: impl Into<String>) -> Self {
        Self(Cow::Owned(name.into()))
    }

    /// Wire token
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for DatacenterConditionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Status of a condition, as in core/v1 `ConditionStatus`
#[derive(Debug, Clone, Copy, Serialize, Deserialize, JsonSchema, PartialEq, Eq, Hash)]
pub enum ConditionStatus {
    /// The condition holds
    True,
    /// The condition does not hold
    False,
    /// The condition could not be determined
    Unknown,
}

/// One entry of `status.conditions`
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct DatacenterCondition {
    /// Condition type
    #[serde(rename = "type")]
    pub condition_type: DatacenterConditionType,

    /// Current status
    pub status: ConditionStatus,

    /// When the status last changed
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_transition_time: Option<chrono::DateTime<chrono::Utc>>,
}

impl DatacenterCondition {
    /// Condition stamped with the current time
    pub fn new(condition_type: DatacenterConditionType, status: ConditionStatus) -> Self {
        Self {
            condition_type,
            status,
            last_transition_time: Some(chrono::Utc::now()),
        }
    }
}

impl CassandraDatacenterStatus {
    /// Status of `condition_type`, or `False` when it was never set
    pub fn condition_status(&self, condition_type: &DatacenterConditionType) -> ConditionStatus {
        self.conditions
            .iter()
            .find(|condition| &condition.condition_type == condition_type)
            .map_or(ConditionStatus::False, |condition| condition.status)
    }

    /// Replace the condition of the same type in place, or append it
    pub fn set_condition(&mut self, condition: DatacenterCondition) {
        match self
            .conditions
            .iter_mut()
            .find(|existing| existing.condition_type == condition.condition_type)
        {
            Some(existing) => *existing = condition,
            None => self.conditions.push(condition),
        }
    }
}

impl CassandraDatacenter {
    /// Status of `condition_type`, or `False` when it was never set
    pub fn condition_status(&self, condition_type: &DatacenterConditionType) -> ConditionStatus {
        self.status
            .as_ref()
            .map_or(ConditionStatus::False, |status| status.condition_status(condition_type))
    }

    /// Set a condition, creating the status block if needed
    pub fn set_condition(&mut self, condition: DatacenterCondition) {
        self.status
            .get_or_insert_with(CassandraDatacenterStatus::default)
            .set_condition(condition);
    }
}
