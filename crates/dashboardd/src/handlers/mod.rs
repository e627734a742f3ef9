//! Built-in command handlers.

mod echo;
pub mod installations;

use std::sync::Arc;

use crate::cluster::ClusterState;
use crate::dispatch::HandlerRegistry;

pub use self::echo::{ECHO, EchoHandler};
pub use self::installations::{InstallationDataHandler, LIST_INSTALLATION_DATA, StatusAggregator};

/// Registers every built-in handler on `registry`.
pub fn register_builtin_handlers(registry: &HandlerRegistry, cluster: Arc<dyn ClusterState>) {
    registry.register_command(ECHO, Arc::new(EchoHandler));
    registry.register_command(
        LIST_INSTALLATION_DATA,
        Arc::new(InstallationDataHandler::new(StatusAggregator::new(cluster))),
    );
}
