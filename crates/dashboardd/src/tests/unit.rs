//! Unit tests for bootstrap and launch wiring.

use std::io;
use std::sync::Arc;

use rstest::rstest;

use crate::dispatch::HandlerKind;
use crate::process::{LaunchError, ShutdownError, ShutdownSignal};
use crate::{bootstrap_with, run_server_with};

use super::support::{HealthEvent, RecordingHealthReporter, TestConfigLoader};

struct ImmediateShutdown;

impl ShutdownSignal for ImmediateShutdown {
    fn wait(&self) -> Result<(), ShutdownError> {
        Ok(())
    }
}

struct BrokenShutdown;

impl ShutdownSignal for BrokenShutdown {
    fn wait(&self) -> Result<(), ShutdownError> {
        Err(ShutdownError::Install {
            source: io::Error::other("signal handlers unavailable"),
        })
    }
}

#[rstest]
fn bootstrap_registers_the_builtin_commands() {
    let loader = TestConfigLoader::new();
    let reporter = Arc::new(RecordingHealthReporter::default());

    let server = bootstrap_with(&loader, reporter.clone()).expect("bootstrap should succeed");

    assert_eq!(
        server.registry().names(HandlerKind::Synchronous),
        vec!["echo", "listInstallationData"]
    );
    assert_eq!(
        reporter.events(),
        vec![HealthEvent::BootstrapStarting, HealthEvent::BootstrapSucceeded]
    );
}

#[rstest]
fn run_returns_once_shutdown_is_signalled() {
    let loader = TestConfigLoader::new();
    let reporter = Arc::new(RecordingHealthReporter::default());

    run_server_with(&loader, reporter.clone(), &ImmediateShutdown).expect("clean run");

    let events = reporter.events();
    assert_eq!(events.last(), Some(&HealthEvent::ShutdownComplete));
}

#[rstest]
fn signal_failures_still_stop_the_transports() {
    let loader = TestConfigLoader::new();
    let reporter = Arc::new(RecordingHealthReporter::default());

    let error = run_server_with(&loader, reporter.clone(), &BrokenShutdown)
        .expect_err("signal failure surfaces");

    assert!(matches!(error, LaunchError::Shutdown { .. }));
    assert_eq!(error.exit_code(), 70);
    assert!(reporter.events().contains(&HealthEvent::ShutdownComplete));
}

#[rstest]
fn bootstrap_failures_map_to_configuration_exit_code() {
    let loader = TestConfigLoader::with_missing_snapshot();
    let reporter = Arc::new(RecordingHealthReporter::default());

    let error = run_server_with(&loader, reporter, &ImmediateShutdown)
        .expect_err("missing snapshot");

    assert!(matches!(error, LaunchError::Bootstrap { .. }));
    assert_eq!(error.exit_code(), 78);
}
