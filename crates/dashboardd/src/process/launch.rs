//! Supervises server launch sequencing and runtime orchestration.

use std::net::SocketAddr;
use std::sync::Arc;

use tracing::info;

use crate::bootstrap::{ConfigLoader, Server, SystemConfigLoader, bootstrap_with};
use crate::context::RequestContext;
use crate::dispatch::{Dispatcher, Transport};
use crate::health::{HealthReporter, StructuredHealthReporter};
use crate::transport::{
    HttpHandle, HttpListener, ListenerHandle, StreamListener, WebSocketConnectionHandler,
};

use super::PROCESS_TARGET;
use super::errors::LaunchError;
use super::shutdown::{ShutdownSignal, SystemShutdownSignal};

/// Runs the server using the production collaborators.
///
/// # Errors
///
/// Returns a [`LaunchError`] when bootstrap, a transport or the signal
/// listener fails.
pub fn run_server() -> Result<(), LaunchError> {
    run_server_with(
        &SystemConfigLoader,
        Arc::new(StructuredHealthReporter::new()),
        &SystemShutdownSignal::new(),
    )
}

/// Runs the server with injected collaborators until `shutdown` fires.
///
/// # Errors
///
/// See [`run_server`].
pub fn run_server_with(
    loader: &dyn ConfigLoader,
    reporter: Arc<dyn HealthReporter>,
    shutdown: &dyn ShutdownSignal,
) -> Result<(), LaunchError> {
    info!(target: PROCESS_TARGET, "starting dashboard server");
    let server = bootstrap_with(loader, reporter)?;
    let running = start(&server)?;
    let waited = shutdown.wait();
    running.stop()?;
    waited?;
    info!(target: PROCESS_TARGET, "shutdown sequence completed");
    Ok(())
}

/// Binds both transports for a bootstrapped server and starts serving.
///
/// # Errors
///
/// Returns `LaunchError::Transport` when either endpoint cannot be bound.
pub fn start(server: &Server) -> Result<RunningServer, LaunchError> {
    let config = server.config();
    let root = RequestContext::background();
    let dispatcher = Dispatcher::new(
        Arc::clone(server.registry()),
        root.clone(),
        config.request_timeout(),
    );

    let http_listener = HttpListener::bind(&config.http_endpoint())?;
    let stream_listener = StreamListener::bind(&config.stream_endpoint())?;

    let http = http_listener.start(dispatcher.clone());
    server
        .reporter()
        .transport_listening(Transport::Http, http.local_addr());
    let stream = stream_listener.start(Arc::new(WebSocketConnectionHandler::new(dispatcher)))?;
    server
        .reporter()
        .transport_listening(Transport::Streaming, stream.local_addr());

    Ok(RunningServer {
        root,
        http,
        stream,
        reporter: Arc::clone(server.reporter()),
    })
}

/// Both transports of a server that is accepting traffic.
pub struct RunningServer {
    root: RequestContext,
    http: HttpHandle,
    stream: ListenerHandle,
    reporter: Arc<dyn HealthReporter>,
}

impl RunningServer {
    /// Address the HTTP transport is bound to.
    #[must_use]
    pub fn http_addr(&self) -> SocketAddr {
        self.http.local_addr()
    }

    /// Address the WebSocket transport is bound to.
    #[must_use]
    pub fn stream_addr(&self) -> SocketAddr {
        self.stream.local_addr()
    }

    /// Cancels in-flight commands and stops both transports.
    ///
    /// # Errors
    ///
    /// Returns `LaunchError::Transport` when a transport thread panicked.
    pub fn stop(self) -> Result<(), LaunchError> {
        self.reporter.shutdown_starting();
        self.root.cancel();
        self.http.shutdown();
        self.stream.shutdown();
        let http = self.http.join();
        let stream = self.stream.join();
        self.reporter.shutdown_complete();
        http?;
        stream?;
        Ok(())
    }
}
