//! Shared configuration for the cluster dashboard server.
//!
//! Values are layered by `ortho_config`: built-in defaults, then a TOML file
//! named by `--config-path` (or `DASHBOARD_CONFIG_PATH`), then `DASHBOARD_*`
//! environment variables, then command-line flags.

mod defaults;
mod endpoint;
mod logging;

use std::time::Duration;

use camino::Utf8PathBuf;
use ortho_config::OrthoConfig;
use serde::{Deserialize, Serialize};

pub use defaults::{
    DEFAULT_HTTP_PORT, DEFAULT_LISTEN_HOST, DEFAULT_LOG_FILTER, DEFAULT_REQUEST_TIMEOUT_SECS,
    DEFAULT_STREAM_PORT, default_http_port, default_listen_host, default_log_filter,
    default_log_filter_string, default_log_format, default_request_timeout_secs,
    default_stream_port,
};
pub use endpoint::{EndpointError, ListenEndpoint};
pub use logging::{LogFormat, LogFormatParseError};

/// Resolved server configuration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize, OrthoConfig)]
#[ortho_config(prefix = "DASHBOARD")]
pub struct Config {
    /// Host both transports bind to.
    #[serde(default = "defaults::default_listen_host")]
    #[ortho_config(default = defaults::default_listen_host())]
    pub listen_host: String,
    /// Port serving one-shot `POST /<command>` requests.
    #[serde(default = "defaults::default_http_port")]
    #[ortho_config(default = DEFAULT_HTTP_PORT)]
    pub http_port: u16,
    /// Port serving the WebSocket command stream.
    #[serde(default = "defaults::default_stream_port")]
    #[ortho_config(default = DEFAULT_STREAM_PORT)]
    pub stream_port: u16,
    /// `tracing` filter directive, e.g. `info,dashboardd::dispatch=debug`.
    #[serde(default = "defaults::default_log_filter_string")]
    #[ortho_config(default = defaults::default_log_filter_string())]
    pub log_filter: String,
    /// Log output format.
    #[serde(default = "defaults::default_log_format")]
    #[ortho_config(default = defaults::default_log_format())]
    pub log_format: LogFormat,
    /// JSON snapshot of cluster state served to the aggregation handlers.
    #[serde(default)]
    pub cluster_snapshot: Option<Utf8PathBuf>,
    /// Budget for one command, covering every cluster fetch it issues.
    #[serde(default = "defaults::default_request_timeout_secs")]
    #[ortho_config(default = DEFAULT_REQUEST_TIMEOUT_SECS)]
    pub request_timeout_secs: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            listen_host: default_listen_host(),
            http_port: DEFAULT_HTTP_PORT,
            stream_port: DEFAULT_STREAM_PORT,
            log_filter: default_log_filter_string(),
            log_format: default_log_format(),
            cluster_snapshot: None,
            request_timeout_secs: DEFAULT_REQUEST_TIMEOUT_SECS,
        }
    }
}

impl Config {
    /// Endpoint of the HTTP transport.
    #[must_use]
    pub fn http_endpoint(&self) -> ListenEndpoint {
        ListenEndpoint::new(self.listen_host.clone(), self.http_port)
    }

    /// Endpoint of the WebSocket transport.
    #[must_use]
    pub fn stream_endpoint(&self) -> ListenEndpoint {
        ListenEndpoint::new(self.listen_host.clone(), self.stream_port)
    }

    /// Log filter expression.
    #[must_use]
    pub fn log_filter(&self) -> &str {
        &self.log_filter
    }

    /// Log output format.
    #[must_use]
    pub fn log_format(&self) -> LogFormat {
        self.log_format
    }

    /// Location of the cluster snapshot, when one is configured.
    #[must_use]
    pub fn cluster_snapshot(&self) -> Option<&Utf8PathBuf> {
        self.cluster_snapshot.as_ref()
    }

    /// Per-command time budget.
    #[must_use]
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}
