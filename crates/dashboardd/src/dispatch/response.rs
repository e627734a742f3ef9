//! Reply envelopes and their wire encodings.
//!
//! A reply is `{status, body}` where `status` follows HTTP numbering on every
//! transport. The streaming transport sends the whole envelope as one JSON
//! text frame; the HTTP transport maps `status` onto the response status line
//! and sends only the body.

use serde::Serialize;
use serde_json::Value;

use super::errors::DispatchError;

/// Command completed.
pub const STATUS_OK: u16 = 200;
/// Payload was unusable or a required field was missing.
pub const STATUS_BAD_REQUEST: u16 = 400;
/// HTTP request used a method other than `POST`.
pub const STATUS_METHOD_NOT_ALLOWED: u16 = 405;
/// Unknown routing key or malformed envelope.
pub const STATUS_MISDIRECTED: u16 = 421;
/// A collaborator failed or the server hit an internal fault.
pub const STATUS_INTERNAL_ERROR: u16 = 500;

/// Reply sent to a client.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Reply {
    status: u16,
    #[serde(skip_serializing_if = "Option::is_none")]
    body: Option<Value>,
}

impl Reply {
    /// Creates a reply without a body.
    #[must_use]
    pub fn empty(status: u16) -> Self {
        Self { status, body: None }
    }

    /// Creates the reply sent for unknown routes and malformed envelopes.
    #[must_use]
    pub fn misdirected() -> Self {
        Self::empty(STATUS_MISDIRECTED)
    }

    /// Creates a reply whose body is a plain message string.
    #[must_use]
    pub fn message(status: u16, message: impl Into<String>) -> Self {
        Self {
            status,
            body: Some(Value::String(message.into())),
        }
    }

    /// Creates a reply with an already materialised JSON body.
    #[must_use]
    pub fn with_value(status: u16, body: Value) -> Self {
        Self {
            status,
            body: Some(body),
        }
    }

    /// Serializes `body` eagerly into a reply with the given status.
    ///
    /// # Errors
    ///
    /// Returns `DispatchError::Encoding` when `body` cannot be represented as
    /// JSON (for example a map with non-string keys).
    pub fn json<T: Serialize + ?Sized>(status: u16, body: &T) -> Result<Self, DispatchError> {
        let value = serde_json::to_value(body).map_err(DispatchError::Encoding)?;
        Ok(Self::with_value(status, value))
    }

    /// Serializes `body` into a `200` reply.
    ///
    /// # Errors
    ///
    /// See [`Reply::json`].
    pub fn ok<T: Serialize + ?Sized>(body: &T) -> Result<Self, DispatchError> {
        Self::json(STATUS_OK, body)
    }

    /// Status code.
    #[must_use]
    pub fn status(&self) -> u16 {
        self.status
    }

    /// Body, if any.
    #[must_use]
    pub fn body(&self) -> Option<&Value> {
        self.body.as_ref()
    }

    /// Encodes the full envelope as sent over the streaming transport.
    ///
    /// # Errors
    ///
    /// Returns `DispatchError::Encoding` if serialization fails. Nothing has
    /// been written anywhere at that point.
    pub fn encode_envelope(&self) -> Result<Vec<u8>, DispatchError> {
        serde_json::to_vec(self).map_err(DispatchError::Encoding)
    }

    /// Encodes only the body, pretty-printed, as sent over HTTP. Empty
    /// replies encode to zero bytes.
    ///
    /// # Errors
    ///
    /// Returns `DispatchError::Encoding` if serialization fails.
    pub fn encode_body(&self) -> Result<Vec<u8>, DispatchError> {
        match &self.body {
            Some(body) => serde_json::to_vec_pretty(body).map_err(DispatchError::Encoding),
            None => Ok(Vec::new()),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use super::*;

    #[test]
    fn empty_reply_omits_body() {
        let encoded = Reply::misdirected().encode_envelope().expect("encode");
        assert_eq!(encoded, br#"{"status":421}"#);
    }

    #[test]
    fn envelope_carries_status_and_body() {
        let reply = Reply::ok(&vec!["a", "b"]).expect("build reply");
        let encoded = String::from_utf8(reply.encode_envelope().expect("encode")).expect("utf8");
        assert_eq!(encoded, r#"{"status":200,"body":["a","b"]}"#);
    }

    #[test]
    fn body_encoding_is_pretty_printed() {
        let reply = Reply::message(STATUS_BAD_REQUEST, "a namespace has to be set");
        let encoded = reply.encode_body().expect("encode body");
        assert_eq!(encoded, br#""a namespace has to be set""#);
    }

    #[test]
    fn empty_body_encodes_to_nothing() {
        assert!(Reply::empty(STATUS_OK).encode_body().expect("encode").is_empty());
    }

    #[test]
    fn non_string_keys_fail_as_encoding_errors() {
        let mut body = BTreeMap::new();
        body.insert((1, 2), "tuple keys are not JSON");
        let result = Reply::ok(&body);
        assert!(matches!(result, Err(DispatchError::Encoding(_))));
    }
}
