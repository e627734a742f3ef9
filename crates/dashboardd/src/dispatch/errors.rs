//! Error types for envelope decoding, routing and reply delivery.
//!
//! Client mistakes (malformed envelopes, unknown routes) are recovered inside
//! the dispatcher and answered with a `Misdirected` reply. Encoding and
//! delivery failures are logged; they never reach the client verbatim.

use thiserror::Error;

use super::response::{STATUS_INTERNAL_ERROR, STATUS_MISDIRECTED};

/// Errors surfaced while decoding, routing or delivering a command.
#[derive(Debug, Error)]
pub enum DispatchError {
    /// Inbound bytes were not a valid command envelope.
    #[error("malformed envelope: {message}")]
    MalformedEnvelope {
        message: String,
        #[source]
        source: Option<serde_json::Error>,
    },

    /// No handler is registered under the routing key.
    #[error("no handler registered for '{name}'")]
    UnknownRoute { name: String },

    /// A reply body could not be serialized.
    #[error("failed to encode reply: {0}")]
    Encoding(#[source] serde_json::Error),

    /// The transport refused the reply.
    #[error("failed to deliver reply: {message}")]
    Delivery {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },
}

impl DispatchError {
    /// Status code a client observes for this failure.
    #[must_use]
    pub fn status(&self) -> u16 {
        match self {
            Self::MalformedEnvelope { .. } | Self::UnknownRoute { .. } => STATUS_MISDIRECTED,
            Self::Encoding(_) | Self::Delivery { .. } => STATUS_INTERNAL_ERROR,
        }
    }

    /// Creates a malformed envelope error from a serde error.
    #[must_use]
    pub fn from_json_error(source: serde_json::Error) -> Self {
        Self::MalformedEnvelope {
            message: source.to_string(),
            source: Some(source),
        }
    }

    /// Creates a malformed envelope error with a custom message.
    #[must_use]
    pub fn malformed(message: impl Into<String>) -> Self {
        Self::MalformedEnvelope {
            message: message.into(),
            source: None,
        }
    }

    /// Creates an unknown route error.
    #[must_use]
    pub fn unknown_route(name: impl Into<String>) -> Self {
        Self::UnknownRoute { name: name.into() }
    }

    /// Creates a delivery error without an underlying cause.
    #[must_use]
    pub fn delivery(message: impl Into<String>) -> Self {
        Self::Delivery {
            message: message.into(),
            source: None,
        }
    }

    /// Creates a delivery error wrapping the transport's error.
    #[must_use]
    pub fn delivery_with_source(
        message: impl Into<String>,
        source: impl Into<Box<dyn std::error::Error + Send + Sync>>,
    ) -> Self {
        Self::Delivery {
            message: message.into(),
            source: Some(source.into()),
        }
    }
}
