use std::fmt;
use std::net::{SocketAddr, ToSocketAddrs};

use thiserror::Error;

/// TCP address a transport binds to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListenEndpoint {
    host: String,
    port: u16,
}

impl ListenEndpoint {
    /// Builds an endpoint from a host name (or IP literal) and port.
    #[must_use]
    pub fn new(host: impl Into<String>, port: u16) -> Self {
        Self {
            host: host.into(),
            port,
        }
    }

    /// Host name or IP literal.
    #[must_use]
    pub fn host(&self) -> &str {
        &self.host
    }

    /// TCP port. Zero asks the operating system for an ephemeral port.
    #[must_use]
    pub fn port(&self) -> u16 {
        self.port
    }

    /// Resolves the endpoint to the first usable socket address.
    ///
    /// # Errors
    ///
    /// Returns [`EndpointError::Resolve`] when name resolution fails and
    /// [`EndpointError::ResolveEmpty`] when it yields no addresses.
    pub fn resolve(&self) -> Result<SocketAddr, EndpointError> {
        let mut addrs = (self.host.as_str(), self.port)
            .to_socket_addrs()
            .map_err(|source| EndpointError::Resolve {
                endpoint: self.to_string(),
                source,
            })?;
        addrs.next().ok_or_else(|| EndpointError::ResolveEmpty {
            endpoint: self.to_string(),
        })
    }
}

impl fmt::Display for ListenEndpoint {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.host.contains(':') {
            write!(formatter, "[{}]:{}", self.host, self.port)
        } else {
            write!(formatter, "{}:{}", self.host, self.port)
        }
    }
}

/// Errors encountered while resolving a [`ListenEndpoint`].
#[derive(Debug, Error)]
pub enum EndpointError {
    /// Name resolution failed.
    #[error("failed to resolve {endpoint}: {source}")]
    Resolve {
        endpoint: String,
        #[source]
        source: std::io::Error,
    },
    /// Name resolution returned nothing.
    #[error("no addresses resolved for {endpoint}")]
    ResolveEmpty { endpoint: String },
}
