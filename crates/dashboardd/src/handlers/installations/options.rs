//! Options accepted by `listInstallationData`.

use serde::Deserialize;

use crate::dispatch::HandlerError;

/// Filter options for one aggregation.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AggregateOptions {
    /// Namespace to list installations from. `None` lists every namespace.
    #[serde(alias = "Namespace", deserialize_with = "non_empty")]
    pub namespace: Option<String>,
    /// Also list installations owned by another installation.
    #[serde(alias = "IncludeSubinstallations")]
    pub include_subinstallations: bool,
}

impl AggregateOptions {
    /// Parses handler payload bytes. Empty and `null` payloads yield the
    /// defaults.
    ///
    /// # Errors
    ///
    /// Returns `HandlerError::InvalidPayload` when the payload is not an
    /// options object.
    pub fn from_payload(payload: &[u8]) -> Result<Self, HandlerError> {
        if payload.trim_ascii().is_empty() {
            return Ok(Self::default());
        }
        let parsed: Option<Self> =
            serde_json::from_slice(payload).map_err(HandlerError::invalid_payload)?;
        Ok(parsed.unwrap_or_default())
    }
}

fn non_empty<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let value: Option<String> = Option::deserialize(deserializer)?;
    Ok(value.filter(|namespace| !namespace.is_empty()))
}
