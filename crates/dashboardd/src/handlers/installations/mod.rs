//! The `listInstallationData` command.
//!
//! Replies with one status tree per installation: the installation, the
//! execution it references and that execution's deploy items, each flagged
//! `upToDate` when its controller has observed the latest generation.

mod aggregate;
mod options;

use crate::context::RequestContext;
use crate::dispatch::{CommandHandler, HandlerError, Reply};

pub use self::aggregate::{
    ENCOMPASSED_BY_LABEL, ExecutionTree, InstallationTree, StatusAggregator, UnitStatus,
};
pub use self::options::AggregateOptions;

/// Routing key of the installation status command.
pub const LIST_INSTALLATION_DATA: &str = "listInstallationData";

/// Synchronous handler serving [`LIST_INSTALLATION_DATA`].
#[derive(Clone)]
pub struct InstallationDataHandler {
    aggregator: StatusAggregator,
}

impl InstallationDataHandler {
    /// Creates the handler around `aggregator`.
    #[must_use]
    pub fn new(aggregator: StatusAggregator) -> Self {
        Self { aggregator }
    }
}

impl CommandHandler for InstallationDataHandler {
    fn handle(&self, payload: &[u8], context: &RequestContext) -> Result<Reply, HandlerError> {
        let options = AggregateOptions::from_payload(payload)?;
        let trees = self.aggregator.aggregate(&options, context)?;
        Ok(Reply::ok(&trees)?)
    }
}
