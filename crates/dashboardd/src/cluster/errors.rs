//! Cluster-state failures.

use std::fmt;

use camino::Utf8PathBuf;
use thiserror::Error;

use crate::context::Interrupted;

/// Errors raised while listing cluster objects.
#[derive(Debug, Error)]
pub enum ClusterError {
    /// The request context was cancelled or expired.
    #[error(transparent)]
    Interrupted(#[from] Interrupted),

    /// The snapshot file could not be read.
    #[error("failed to read cluster snapshot '{path}': {source}")]
    Snapshot {
        path: Utf8PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The snapshot file is not valid JSON of the expected shape.
    #[error("failed to parse cluster snapshot '{path}': {source}")]
    Parse {
        path: Utf8PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// The backing store refused the request.
    #[error("cluster state unavailable: {message}")]
    Unavailable { message: String },
}

impl ClusterError {
    /// Creates an unavailable error.
    #[must_use]
    pub fn unavailable(message: impl Into<String>) -> Self {
        Self::Unavailable {
            message: message.into(),
        }
    }
}

/// Collections the aggregator lists.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Collection {
    Installations,
    Executions,
    DeployItems,
}

impl Collection {
    /// Human-readable collection name used in logs and errors.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Installations => "installations",
            Self::Executions => "executions",
            Self::DeployItems => "deploy items",
        }
    }
}

impl fmt::Display for Collection {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str(self.as_str())
    }
}

/// A listing failure tagged with the collection being fetched.
#[derive(Debug, Error)]
#[error("unable to fetch {collection}: {source}")]
pub struct FetchFailure {
    collection: Collection,
    #[source]
    source: ClusterError,
}

impl FetchFailure {
    /// Tags `source` with `collection`.
    #[must_use]
    pub fn new(collection: Collection, source: ClusterError) -> Self {
        Self { collection, source }
    }

    /// Collection whose listing failed.
    #[must_use]
    pub fn collection(&self) -> Collection {
        self.collection
    }

    /// Underlying cluster error.
    #[must_use]
    pub fn cluster_error(&self) -> &ClusterError {
        &self.source
    }
}
