use crate::logging::LogFormat;

/// Default bind host for both transports. Mirrors the dashboard's historic
/// behaviour of listening on every interface.
pub const DEFAULT_LISTEN_HOST: &str = "0.0.0.0";

/// Default port for one-shot HTTP commands.
pub const DEFAULT_HTTP_PORT: u16 = 8080;

/// Default port for the WebSocket command stream.
pub const DEFAULT_STREAM_PORT: u16 = 8081;

/// Default log filter expression used by the server.
pub const DEFAULT_LOG_FILTER: &str = "info";

/// Default budget, in seconds, for a single command including every cluster
/// fetch it issues.
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;

/// Default log filter expression used by the server.
pub fn default_log_filter() -> &'static str {
    DEFAULT_LOG_FILTER
}

/// Owned log filter value used where allocation is required (e.g. serde).
pub fn default_log_filter_string() -> String {
    DEFAULT_LOG_FILTER.to_string()
}

/// Default logging format for the server.
pub fn default_log_format() -> LogFormat {
    LogFormat::Json
}

/// Owned listen host used by serde defaults.
pub fn default_listen_host() -> String {
    DEFAULT_LISTEN_HOST.to_string()
}

/// Default HTTP port used by serde defaults.
pub fn default_http_port() -> u16 {
    DEFAULT_HTTP_PORT
}

/// Default WebSocket port used by serde defaults.
pub fn default_stream_port() -> u16 {
    DEFAULT_STREAM_PORT
}

/// Default request timeout used by serde defaults.
pub fn default_request_timeout_secs() -> u64 {
    DEFAULT_REQUEST_TIMEOUT_SECS
}
