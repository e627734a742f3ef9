//! The seam between the dispatcher and the transports.

use std::fmt;

use super::errors::DispatchError;
use super::response::Reply;

/// Transport that delivered a command.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Transport {
    /// One request in, one reply out.
    Http,
    /// Long-lived WebSocket connection carrying many commands.
    Streaming,
}

impl Transport {
    /// Canonical lowercase label used in logs.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Http => "http",
            Self::Streaming => "streaming",
        }
    }
}

impl fmt::Display for Transport {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str(self.as_str())
    }
}

/// Destination for replies produced by one dispatch.
///
/// An HTTP sink is bound to a single inbound request and accepts exactly one
/// reply. A streaming sink is bound to a connection and accepts any number of
/// replies; implementations must serialize concurrent deliveries so frames
/// never interleave. Sinks encode the reply completely before writing, so an
/// encoding failure leaves the transport untouched.
pub trait ReplySink: Send + Sync {
    /// Transport this sink writes to.
    fn transport(&self) -> Transport;

    /// Encodes and writes one reply.
    ///
    /// # Errors
    ///
    /// Returns `DispatchError::Encoding` when the reply cannot be encoded and
    /// `DispatchError::Delivery` when the transport rejects the write.
    fn deliver(&self, reply: Reply) -> Result<(), DispatchError>;
}
