//! Resource shapes read from the cluster.
//!
//! Only the fields the dashboard joins on are modelled. Unknown fields are
//! ignored so snapshots exported straight from the API server decode as-is.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

/// Namespaced identity of a cluster object.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Deserialize, Serialize)]
pub struct ObjectReference {
    pub name: String,
    #[serde(default)]
    pub namespace: String,
}

impl ObjectReference {
    /// Creates a reference to `namespace/name`.
    #[must_use]
    pub fn new(namespace: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            namespace: namespace.into(),
        }
    }
}

impl fmt::Display for ObjectReference {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(formatter, "{}/{}", self.namespace, self.name)
    }
}

/// Reference tagged with the logical name the owner uses for it.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct NamedObjectReference {
    pub name: String,
    #[serde(rename = "ref")]
    pub reference: ObjectReference,
}

/// Object metadata shared by every resource kind.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ObjectMeta {
    pub name: String,
    #[serde(default)]
    pub namespace: String,
    #[serde(default)]
    pub labels: BTreeMap<String, String>,
    #[serde(default)]
    pub generation: i64,
}

impl ObjectMeta {
    /// Identity of the object carrying this metadata.
    #[must_use]
    pub fn reference(&self) -> ObjectReference {
        ObjectReference::new(self.namespace.as_str(), self.name.as_str())
    }
}

/// Reconciliation phase reported by the controllers.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
pub enum Phase {
    Init,
    PendingDependencies,
    Progressing,
    Deleting,
    Aborted,
    Succeeded,
    Failed,
    /// Empty or unrecognised phase.
    #[default]
    #[serde(other)]
    Unknown,
}

/// Status block of an [`Installation`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InstallationStatus {
    #[serde(default)]
    pub observed_generation: i64,
    #[serde(default)]
    pub phase: Phase,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub execution_ref: Option<ObjectReference>,
}

/// Status block of an [`Execution`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ExecutionStatus {
    #[serde(default)]
    pub observed_generation: i64,
    #[serde(default)]
    pub phase: Phase,
    #[serde(default)]
    pub deploy_item_refs: Vec<NamedObjectReference>,
}

/// Status block of a [`DeployItem`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DeployItemStatus {
    #[serde(default)]
    pub observed_generation: i64,
    #[serde(default)]
    pub phase: Phase,
}

/// Top-level deployable unit.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct Installation {
    pub metadata: ObjectMeta,
    #[serde(default)]
    pub status: InstallationStatus,
}

/// Sub-unit created for an installation.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct Execution {
    pub metadata: ObjectMeta,
    #[serde(default)]
    pub status: ExecutionStatus,
}

/// Leaf unit created for an execution.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct DeployItem {
    pub metadata: ObjectMeta,
    #[serde(default)]
    pub status: DeployItemStatus,
}

/// Access to the metadata of any listed resource.
pub trait ClusterObject {
    fn metadata(&self) -> &ObjectMeta;
}

impl ClusterObject for Installation {
    fn metadata(&self) -> &ObjectMeta {
        &self.metadata
    }
}

impl ClusterObject for Execution {
    fn metadata(&self) -> &ObjectMeta {
        &self.metadata
    }
}

impl ClusterObject for DeployItem {
    fn metadata(&self) -> &ObjectMeta {
        &self.metadata
    }
}

/// Selection applied when listing a collection.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListFilter {
    /// Restrict to one namespace. `None` lists every namespace.
    pub namespace: Option<String>,
    /// Labels that must not be present on a listed object.
    pub absent_labels: Vec<String>,
}

impl ListFilter {
    /// Filter matching every object.
    #[must_use]
    pub fn all() -> Self {
        Self::default()
    }

    /// Filter matching objects in `namespace`.
    #[must_use]
    pub fn in_namespace(namespace: impl Into<String>) -> Self {
        Self {
            namespace: Some(namespace.into()),
            absent_labels: Vec::new(),
        }
    }

    /// Additionally excludes objects carrying `label`.
    #[must_use]
    pub fn without_label(mut self, label: impl Into<String>) -> Self {
        self.absent_labels.push(label.into());
        self
    }

    /// Returns `true` when `meta` passes the filter.
    #[must_use]
    pub fn matches(&self, meta: &ObjectMeta) -> bool {
        let namespace_ok = self
            .namespace
            .as_deref()
            .is_none_or(|namespace| meta.namespace == namespace);
        namespace_ok
            && self
                .absent_labels
                .iter()
                .all(|label| !meta.labels.contains_key(label))
    }
}
