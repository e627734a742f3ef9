//! Test harness utilities for the server behavioural suites.

mod clients;
mod config_loader;
mod reporter;
mod scenario_world;

pub use clients::{HttpReply, WsClient, http_request};
pub use config_loader::{SNAPSHOT_NAMESPACE, TestConfigLoader};
pub use reporter::{HealthEvent, RecordingHealthReporter};
pub use scenario_world::{DashboardWorld, world};
