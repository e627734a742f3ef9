//! Handler contracts for the two command kinds.
//!
//! A **synchronous** handler ([`CommandHandler`]) computes exactly one reply.
//! The dispatcher delivers it; when the handler fails, the dispatcher logs the
//! error and delivers an empty reply carrying [`HandlerError::status`]. The
//! error text is never sent to the client.
//!
//! A **streaming** handler ([`StreamHandler`]) receives the connection's sink
//! and writes zero or more replies itself. Its returned error is only logged:
//! the dispatcher sends nothing on its behalf, so a streaming handler that
//! fails after emitting partial output must signal the failure to the client
//! through the sink.

use std::fmt;

use thiserror::Error;

use crate::cluster::FetchFailure;
use crate::context::RequestContext;

use super::errors::DispatchError;
use super::response::{Reply, STATUS_BAD_REQUEST, STATUS_INTERNAL_ERROR};
use super::sink::ReplySink;

/// Handler kinds held by the registry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HandlerKind {
    /// Request in, one reply out. Reachable from every transport.
    Synchronous,
    /// Session-bound handler writing directly to the sink. Reachable from
    /// the streaming transport only.
    Streaming,
}

impl fmt::Display for HandlerKind {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str(match self {
            Self::Synchronous => "synchronous",
            Self::Streaming => "streaming",
        })
    }
}

/// Request/reply handler.
pub trait CommandHandler: Send + Sync {
    /// Handles one command payload.
    ///
    /// # Errors
    ///
    /// Returns a [`HandlerError`] whose status is sent to the client in an
    /// empty reply.
    fn handle(&self, payload: &[u8], context: &RequestContext) -> Result<Reply, HandlerError>;
}

impl<F> CommandHandler for F
where
    F: Fn(&[u8], &RequestContext) -> Result<Reply, HandlerError> + Send + Sync,
{
    fn handle(&self, payload: &[u8], context: &RequestContext) -> Result<Reply, HandlerError> {
        self(payload, context)
    }
}

/// Handler that writes its own replies to a streaming connection.
pub trait StreamHandler: Send + Sync {
    /// Handles one command payload, writing any number of replies to `sink`.
    ///
    /// # Errors
    ///
    /// Returns a [`HandlerError`] that the dispatcher logs. Nothing is sent to
    /// the client on the handler's behalf.
    fn handle(
        &self,
        payload: &[u8],
        context: &RequestContext,
        sink: &dyn ReplySink,
    ) -> Result<(), HandlerError>;
}

impl<F> StreamHandler for F
where
    F: Fn(&[u8], &RequestContext, &dyn ReplySink) -> Result<(), HandlerError> + Send + Sync,
{
    fn handle(
        &self,
        payload: &[u8],
        context: &RequestContext,
        sink: &dyn ReplySink,
    ) -> Result<(), HandlerError> {
        self(payload, context, sink)
    }
}

/// Failures reported by command handlers.
#[derive(Debug, Error)]
pub enum HandlerError {
    /// Payload could not be decoded into the handler's options.
    #[error("invalid payload: {source}")]
    InvalidPayload {
        #[source]
        source: serde_json::Error,
    },

    /// A cluster-state fetch failed.
    #[error(transparent)]
    Fetch(#[from] FetchFailure),

    /// Building or delivering a reply failed.
    #[error(transparent)]
    Dispatch(#[from] DispatchError),

    /// Any other handler fault.
    #[error("internal error: {message}")]
    Internal { message: String },
}

impl HandlerError {
    /// Creates an invalid payload error.
    #[must_use]
    pub fn invalid_payload(source: serde_json::Error) -> Self {
        Self::InvalidPayload { source }
    }

    /// Creates an internal error.
    #[must_use]
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal {
            message: message.into(),
        }
    }

    /// Status code sent to the client when a synchronous handler fails.
    #[must_use]
    pub fn status(&self) -> u16 {
        match self {
            Self::InvalidPayload { .. } => STATUS_BAD_REQUEST,
            Self::Fetch(_) | Self::Dispatch(_) | Self::Internal { .. } => STATUS_INTERNAL_ERROR,
        }
    }

    /// Reply delivered in place of the handler's own reply.
    #[must_use]
    pub fn reply(&self) -> Reply {
        Reply::empty(self.status())
    }
}
