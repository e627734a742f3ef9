//! Error types for transport start-up and shutdown.

use std::io;
use std::net::SocketAddr;

use dashboard_config::EndpointError;
use thiserror::Error;

use crate::dispatch::Transport;

/// Errors surfaced while binding or running a transport.
#[derive(Debug, Error)]
pub enum TransportError {
    #[error(transparent)]
    Endpoint(#[from] EndpointError),
    #[error("failed to bind TCP listener at {addr}: {source}")]
    BindTcp {
        addr: SocketAddr,
        #[source]
        source: io::Error,
    },
    #[error("failed to bind HTTP server at {addr}: {source}")]
    BindHttp {
        addr: SocketAddr,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },
    #[error("failed to enable non-blocking listener: {source}")]
    NonBlocking {
        #[source]
        source: io::Error,
    },
    #[error("{transport} listener thread panicked")]
    ThreadPanic { transport: Transport },
}
