//! Command envelope decoding.
//!
//! Streaming clients send one JSON object per message:
//!
//! ```json
//! {"name":"listInstallationData","payload":{"namespace":"garden"}}
//! ```
//!
//! `path` and `data` are accepted as aliases for `name` and `payload` so older
//! dashboard frontends keep working. HTTP clients never send an envelope; the
//! adapter builds one from the request path and body with
//! [`CommandEnvelope::from_route`].

use serde::Deserialize;
use serde_json::value::RawValue;

use super::errors::DispatchError;

/// Decoded command: a routing key plus the handler-owned payload bytes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandEnvelope {
    name: String,
    payload: Vec<u8>,
}

#[derive(Deserialize)]
struct WireEnvelope<'a> {
    #[serde(alias = "path")]
    name: Option<String>,
    #[serde(default, alias = "data", borrow)]
    payload: Option<&'a RawValue>,
}

impl CommandEnvelope {
    /// Decodes an envelope received over the streaming transport.
    ///
    /// Trailing whitespace (including a newline delimiter) is ignored. A
    /// missing or `null` payload decodes as an empty payload.
    ///
    /// # Errors
    ///
    /// Returns `DispatchError::MalformedEnvelope` when the bytes are empty,
    /// are not a JSON object of the expected shape, or carry no routing key.
    pub fn decode(raw: &[u8]) -> Result<Self, DispatchError> {
        let trimmed = trim_trailing_whitespace(raw);
        if trimmed.is_empty() {
            return Err(DispatchError::malformed("empty message"));
        }

        let wire: WireEnvelope<'_> =
            serde_json::from_slice(trimmed).map_err(DispatchError::from_json_error)?;
        let name = wire
            .name
            .ok_or_else(|| DispatchError::malformed("missing routing key"))?;
        let payload = match wire.payload {
            Some(raw) if raw.get() != "null" => raw.get().as_bytes().to_vec(),
            _ => Vec::new(),
        };
        Self::from_route(&name, payload)
    }

    /// Builds an envelope from a routing key carried outside the message
    /// body, such as an HTTP path segment.
    ///
    /// # Errors
    ///
    /// Returns `DispatchError::MalformedEnvelope` if the key is blank.
    pub fn from_route(name: &str, payload: Vec<u8>) -> Result<Self, DispatchError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(DispatchError::malformed("routing key is empty"));
        }
        Ok(Self {
            name: name.to_owned(),
            payload,
        })
    }

    /// Routing key.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Payload bytes, empty when the client sent none.
    #[must_use]
    pub fn payload(&self) -> &[u8] {
        &self.payload
    }
}

/// Trims trailing ASCII whitespace from a byte slice.
fn trim_trailing_whitespace(bytes: &[u8]) -> &[u8] {
    let end = bytes
        .iter()
        .rposition(|b| !b.is_ascii_whitespace())
        .map_or(0, |pos| pos + 1);
    &bytes[..end]
}
