//! Read access to the cluster resources the dashboard reports on.
//!
//! Handlers depend on the [`ClusterState`] trait rather than a concrete
//! client. Every listing takes the caller's [`RequestContext`] and fails with
//! [`ClusterError::Interrupted`] once it has been cancelled or has expired.

mod errors;
mod snapshot;
mod types;

use crate::context::RequestContext;

pub use self::errors::{ClusterError, Collection, FetchFailure};
pub use self::snapshot::{ClusterSnapshot, SnapshotClusterState};
pub use self::types::{
    ClusterObject, DeployItem, DeployItemStatus, Execution, ExecutionStatus, Installation,
    InstallationStatus, ListFilter, NamedObjectReference, ObjectMeta, ObjectReference, Phase,
};

/// Tracing target for cluster-state access.
pub(crate) const CLUSTER_TARGET: &str = concat!(env!("CARGO_PKG_NAME"), "::cluster");

/// Source of installations, executions and deploy items.
pub trait ClusterState: Send + Sync {
    /// Lists installations matching `filter`.
    ///
    /// # Errors
    ///
    /// Returns a [`ClusterError`] when the listing fails or `context` no
    /// longer permits work.
    fn list_installations(
        &self,
        filter: &ListFilter,
        context: &RequestContext,
    ) -> Result<Vec<Installation>, ClusterError>;

    /// Lists executions matching `filter`.
    ///
    /// # Errors
    ///
    /// See [`ClusterState::list_installations`].
    fn list_executions(
        &self,
        filter: &ListFilter,
        context: &RequestContext,
    ) -> Result<Vec<Execution>, ClusterError>;

    /// Lists deploy items matching `filter`.
    ///
    /// # Errors
    ///
    /// See [`ClusterState::list_installations`].
    fn list_deploy_items(
        &self,
        filter: &ListFilter,
        context: &RequestContext,
    ) -> Result<Vec<DeployItem>, ClusterError>;
}
