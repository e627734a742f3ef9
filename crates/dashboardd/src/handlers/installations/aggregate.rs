//! Joins installations, executions and deploy items into status trees.

use std::collections::HashMap;
use std::collections::hash_map::Entry;
use std::sync::Arc;

use serde::Serialize;
use tracing::{debug, warn};

use crate::cluster::{
    CLUSTER_TARGET, ClusterError, ClusterObject, ClusterState, Collection, DeployItem, Execution,
    FetchFailure, Installation, ListFilter, ObjectMeta, ObjectReference, Phase,
};
use crate::context::RequestContext;

use super::options::AggregateOptions;

/// Label marking an installation as owned by another installation.
pub const ENCOMPASSED_BY_LABEL: &str = "landscaper.gardener.cloud/encompassed-by";

/// Status of one unit at any level of a tree.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UnitStatus {
    pub name: String,
    pub namespace: String,
    pub up_to_date: bool,
    pub phase: Phase,
}

impl UnitStatus {
    fn new(meta: &ObjectMeta, observed_generation: i64, phase: Phase) -> Self {
        Self {
            name: meta.name.clone(),
            namespace: meta.namespace.clone(),
            up_to_date: observed_generation == meta.generation,
            phase,
        }
    }
}

/// An execution with the deploy items it references.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ExecutionTree {
    #[serde(flatten)]
    pub status: UnitStatus,
    pub deploy_items: Vec<UnitStatus>,
}

/// An installation with its resolved execution.
///
/// Trees carry no `subinstallations` field. Nested installations are listed
/// as further top-level trees when requested.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct InstallationTree {
    #[serde(flatten)]
    pub status: UnitStatus,
    pub execution: Option<ExecutionTree>,
}

/// Builds [`InstallationTree`]s from a [`ClusterState`].
#[derive(Clone)]
pub struct StatusAggregator {
    cluster: Arc<dyn ClusterState>,
}

impl StatusAggregator {
    /// Aggregates over `cluster`.
    #[must_use]
    pub fn new(cluster: Arc<dyn ClusterState>) -> Self {
        Self { cluster }
    }

    /// Lists the installations selected by `options` and joins each with its
    /// execution and deploy items.
    ///
    /// # Errors
    ///
    /// Returns a [`FetchFailure`] naming the first collection that could not
    /// be listed. No partial result is produced.
    pub fn aggregate(
        &self,
        options: &AggregateOptions,
        context: &RequestContext,
    ) -> Result<Vec<InstallationTree>, FetchFailure> {
        let installations = fetch(Collection::Installations, context, |ctx| {
            self.cluster
                .list_installations(&installation_filter(options), ctx)
        })?;
        let executions = fetch(Collection::Executions, context, |ctx| {
            self.cluster.list_executions(&ListFilter::all(), ctx)
        })?;
        let deploy_items = fetch(Collection::DeployItems, context, |ctx| {
            self.cluster.list_deploy_items(&ListFilter::all(), ctx)
        })?;

        let executions = index(&executions);
        let deploy_items = index(&deploy_items);
        let trees: Vec<_> = installations
            .iter()
            .map(|installation| build_tree(installation, &executions, &deploy_items))
            .collect();

        debug!(
            target: CLUSTER_TARGET,
            namespace = options.namespace.as_deref().unwrap_or("*"),
            include_subinstallations = options.include_subinstallations,
            installations = trees.len(),
            "aggregated installation status"
        );
        Ok(trees)
    }
}

fn installation_filter(options: &AggregateOptions) -> ListFilter {
    let filter = ListFilter {
        namespace: options.namespace.clone(),
        absent_labels: Vec::new(),
    };
    if options.include_subinstallations {
        filter
    } else {
        filter.without_label(ENCOMPASSED_BY_LABEL)
    }
}

fn fetch<T>(
    collection: Collection,
    context: &RequestContext,
    list: impl FnOnce(&RequestContext) -> Result<Vec<T>, ClusterError>,
) -> Result<Vec<T>, FetchFailure> {
    context
        .check()
        .map_err(ClusterError::from)
        .and_then(|()| list(context))
        .map_err(|source| {
            let failure = FetchFailure::new(collection, source);
            warn!(
                target: CLUSTER_TARGET,
                collection = %collection,
                error = %failure,
                "cluster fetch failed"
            );
            failure
        })
}

/// Indexes objects by identity. The first object listed under an identity
/// wins.
fn index<T: ClusterObject>(objects: &[T]) -> HashMap<ObjectReference, &T> {
    let mut indexed = HashMap::with_capacity(objects.len());
    for object in objects {
        if let Entry::Vacant(slot) = indexed.entry(object.metadata().reference()) {
            slot.insert(object);
        }
    }
    indexed
}

fn build_tree(
    installation: &Installation,
    executions: &HashMap<ObjectReference, &Execution>,
    deploy_items: &HashMap<ObjectReference, &DeployItem>,
) -> InstallationTree {
    let execution = installation
        .status
        .execution_ref
        .as_ref()
        .and_then(|reference| executions.get(reference))
        .map(|execution| ExecutionTree {
            status: UnitStatus::new(
                &execution.metadata,
                execution.status.observed_generation,
                execution.status.phase,
            ),
            deploy_items: execution
                .status
                .deploy_item_refs
                .iter()
                .filter_map(|named| deploy_items.get(&named.reference))
                .map(|item| {
                    UnitStatus::new(
                        &item.metadata,
                        item.status.observed_generation,
                        item.status.phase,
                    )
                })
                .collect(),
        });

    InstallationTree {
        status: UnitStatus::new(
            &installation.metadata,
            installation.status.observed_generation,
            installation.status.phase,
        ),
        execution,
    }
}
