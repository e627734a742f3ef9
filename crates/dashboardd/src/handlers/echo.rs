//! The `echo` diagnostic command.

use serde_json::Value;

use crate::context::RequestContext;
use crate::dispatch::{CommandHandler, HandlerError, Reply, STATUS_OK};

/// Routing key of the echo command.
pub const ECHO: &str = "echo";

/// Replies with the payload it received.
#[derive(Debug, Clone, Copy, Default)]
pub struct EchoHandler;

impl CommandHandler for EchoHandler {
    fn handle(&self, payload: &[u8], _context: &RequestContext) -> Result<Reply, HandlerError> {
        if payload.trim_ascii().is_empty() {
            return Ok(Reply::empty(STATUS_OK));
        }
        let value: Value = serde_json::from_slice(payload).map_err(HandlerError::invalid_payload)?;
        Ok(Reply::with_value(STATUS_OK, value))
    }
}
