//! Server bootstrap orchestration.

use std::sync::Arc;

use ortho_config::{OrthoConfig, OrthoError};
use thiserror::Error;

use dashboard_config::Config;

use crate::cluster::{ClusterError, ClusterState, SnapshotClusterState};
use crate::dispatch::{DISPATCH_TARGET, HandlerKind, HandlerRegistry};
use crate::handlers::register_builtin_handlers;
use crate::health::HealthReporter;
use crate::telemetry::{self, TelemetryError};

/// Trait abstracting configuration loading for testability.
pub trait ConfigLoader: Send + Sync {
    /// Loads the server configuration.
    fn load(&self) -> Result<Config, Arc<OrthoError>>;
}

/// Loader that delegates to [`Config::load`].
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemConfigLoader;

impl ConfigLoader for SystemConfigLoader {
    fn load(&self) -> Result<Config, Arc<OrthoError>> {
        Config::load()
    }
}

/// Loader returning a fixed configuration.
#[derive(Debug, Clone)]
pub struct StaticConfigLoader {
    config: Config,
}

impl StaticConfigLoader {
    /// Wraps `config`.
    #[must_use]
    pub fn new(config: Config) -> Self {
        Self { config }
    }
}

impl ConfigLoader for StaticConfigLoader {
    fn load(&self) -> Result<Config, Arc<OrthoError>> {
        Ok(self.config.clone())
    }
}

/// Errors surfaced during bootstrap.
#[derive(Debug, Error)]
pub enum BootstrapError {
    /// Configuration failed to load.
    #[error("failed to load configuration: {source}")]
    Configuration {
        /// Underlying loader error.
        #[source]
        source: Arc<OrthoError>,
    },
    /// Telemetry initialisation failed.
    #[error("failed to initialise telemetry: {source}")]
    Telemetry {
        /// Underlying telemetry error.
        #[source]
        source: TelemetryError,
    },
    /// The configured cluster snapshot could not be loaded.
    #[error("failed to load cluster state: {source}")]
    ClusterState {
        /// Underlying snapshot error.
        #[source]
        source: ClusterError,
    },
}

/// Result of a successful bootstrap invocation.
pub struct Server {
    config: Config,
    registry: Arc<HandlerRegistry>,
    reporter: Arc<dyn HealthReporter>,
}

impl Server {
    /// Accessor for the resolved configuration.
    #[must_use]
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Registry holding the built-in handlers.
    #[must_use]
    pub fn registry(&self) -> &Arc<HandlerRegistry> {
        &self.registry
    }

    /// Reporter receiving lifecycle events.
    #[must_use]
    pub fn reporter(&self) -> &Arc<dyn HealthReporter> {
        &self.reporter
    }
}

/// Bootstraps the server using the supplied collaborators.
///
/// # Errors
///
/// Returns a [`BootstrapError`] when configuration, telemetry or the cluster
/// snapshot cannot be loaded. The reporter is told about the failure first.
pub fn bootstrap_with(
    loader: &dyn ConfigLoader,
    reporter: Arc<dyn HealthReporter>,
) -> Result<Server, BootstrapError> {
    reporter.bootstrap_starting();
    match build(loader) {
        Ok((config, registry)) => {
            reporter.bootstrap_succeeded(&config);
            Ok(Server {
                config,
                registry,
                reporter,
            })
        }
        Err(error) => {
            reporter.bootstrap_failed(&error);
            Err(error)
        }
    }
}

fn build(
    loader: &dyn ConfigLoader,
) -> Result<(Config, Arc<HandlerRegistry>), BootstrapError> {
    let config = loader
        .load()
        .map_err(|source| BootstrapError::Configuration { source })?;
    telemetry::initialise(&config).map_err(|source| BootstrapError::Telemetry { source })?;
    let cluster = cluster_state(&config)?;

    let registry = Arc::new(HandlerRegistry::new());
    register_builtin_handlers(&registry, cluster);
    tracing::debug!(
        target: DISPATCH_TARGET,
        commands = ?registry.names(HandlerKind::Synchronous),
        streams = ?registry.names(HandlerKind::Streaming),
        "handlers registered"
    );
    Ok((config, registry))
}

fn cluster_state(config: &Config) -> Result<Arc<dyn ClusterState>, BootstrapError> {
    let state = match config.cluster_snapshot() {
        Some(path) => SnapshotClusterState::from_file(path)
            .map_err(|source| BootstrapError::ClusterState { source })?,
        None => SnapshotClusterState::empty(),
    };
    Ok(Arc::new(state))
}
