//! Cluster state served from a JSON snapshot.
//!
//! The snapshot mirrors what a `kubectl get -o json` export of the three
//! collections contains:
//!
//! ```json
//! {"installations": [...], "executions": [...], "deployItems": [...]}
//! ```
//!
//! Without a configured snapshot the daemon serves an empty cluster.

use std::fs;

use camino::Utf8Path;
use serde::Deserialize;
use tracing::{debug, warn};

use crate::context::RequestContext;

use super::errors::ClusterError;
use super::types::{ClusterObject, DeployItem, Execution, Installation, ListFilter};
use super::{CLUSTER_TARGET, ClusterState};

/// Objects held by a [`SnapshotClusterState`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClusterSnapshot {
    #[serde(default)]
    pub installations: Vec<Installation>,
    #[serde(default)]
    pub executions: Vec<Execution>,
    #[serde(default)]
    pub deploy_items: Vec<DeployItem>,
}

/// Immutable in-memory cluster state.
#[derive(Debug, Clone, Default)]
pub struct SnapshotClusterState {
    snapshot: ClusterSnapshot,
}

impl SnapshotClusterState {
    /// Serves `snapshot`.
    #[must_use]
    pub fn new(snapshot: ClusterSnapshot) -> Self {
        Self { snapshot }
    }

    /// Serves an empty cluster.
    #[must_use]
    pub fn empty() -> Self {
        warn!(
            target: CLUSTER_TARGET,
            "no cluster snapshot configured; serving an empty cluster"
        );
        Self::default()
    }

    /// Loads the snapshot stored at `path`.
    ///
    /// # Errors
    ///
    /// Returns `ClusterError::Snapshot` when the file cannot be read and
    /// `ClusterError::Parse` when it is not a valid snapshot.
    pub fn from_file(path: &Utf8Path) -> Result<Self, ClusterError> {
        let raw = fs::read(path).map_err(|source| ClusterError::Snapshot {
            path: path.to_path_buf(),
            source,
        })?;
        let snapshot: ClusterSnapshot =
            serde_json::from_slice(&raw).map_err(|source| ClusterError::Parse {
                path: path.to_path_buf(),
                source,
            })?;
        debug!(
            target: CLUSTER_TARGET,
            path = %path,
            installations = snapshot.installations.len(),
            executions = snapshot.executions.len(),
            deploy_items = snapshot.deploy_items.len(),
            "loaded cluster snapshot"
        );
        Ok(Self::new(snapshot))
    }
}

fn select<T: ClusterObject + Clone>(
    objects: &[T],
    filter: &ListFilter,
    context: &RequestContext,
) -> Result<Vec<T>, ClusterError> {
    context.check()?;
    Ok(objects
        .iter()
        .filter(|object| filter.matches(object.metadata()))
        .cloned()
        .collect())
}

impl ClusterState for SnapshotClusterState {
    fn list_installations(
        &self,
        filter: &ListFilter,
        context: &RequestContext,
    ) -> Result<Vec<Installation>, ClusterError> {
        select(&self.snapshot.installations, filter, context)
    }

    fn list_executions(
        &self,
        filter: &ListFilter,
        context: &RequestContext,
    ) -> Result<Vec<Execution>, ClusterError> {
        select(&self.snapshot.executions, filter, context)
    }

    fn list_deploy_items(
        &self,
        filter: &ListFilter,
        context: &RequestContext,
    ) -> Result<Vec<DeployItem>, ClusterError> {
        select(&self.snapshot.deploy_items, filter, context)
    }
}
