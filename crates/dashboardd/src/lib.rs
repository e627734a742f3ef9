//! Command server behind the Landscaper cluster dashboard.
//!
//! Frontends talk to the server in one of two ways: a one-shot HTTP
//! `POST /<command>` or a long-lived WebSocket carrying JSON command
//! envelopes. Both transports hand their traffic to the same
//! [`dispatch::Dispatcher`], which routes each command by name to a handler
//! held in a [`dispatch::HandlerRegistry`]. The registry is readable without
//! locks while handlers are registered, so lookups never wait on writers.
//!
//! The main built-in command, `listInstallationData`, joins installations,
//! executions and deploy items read from a [`cluster::ClusterState`] into one
//! status tree per installation, flagging every unit whose controller has not
//! yet observed its latest generation.
//!
//! Start-up follows a fixed sequence: configuration is loaded through
//! [`dashboard_config`], telemetry is initialised, the cluster state and
//! handler registry are built, and both transports are bound. Lifecycle
//! events are reported through a [`HealthReporter`].

mod bootstrap;
pub mod cluster;
pub mod context;
pub mod dispatch;
pub mod handlers;
mod health;
mod process;
mod telemetry;
pub mod transport;

pub use bootstrap::{
    BootstrapError, ConfigLoader, Server, StaticConfigLoader, SystemConfigLoader, bootstrap_with,
};
pub use health::{HealthReporter, StructuredHealthReporter};
pub use process::{
    LaunchError, RunningServer, ShutdownError, ShutdownSignal, SystemShutdownSignal, run_server,
    run_server_with, start,
};
pub use telemetry::TelemetryError;

#[cfg(test)]
mod tests;
