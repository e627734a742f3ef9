//! Transport adapters feeding the dispatcher.
//!
//! The HTTP adapter serves one command per request on `http_port`. The
//! streaming adapter accepts WebSocket connections on `stream_port` and
//! carries any number of commands per connection. Both translate their wire
//! traffic into [`crate::dispatch::Dispatcher`] calls and supply a
//! [`crate::dispatch::ReplySink`] bound to the request or connection.
//!
//! WebSocket clients connect to `stream_port` at any path; there is no `/ws`
//! upgrade route on the HTTP port.

mod errors;
mod handler;
mod http;
mod listener;
#[cfg(test)]
mod test_utils;
mod websocket;

pub use self::errors::TransportError;
pub(crate) use self::handler::ConnectionHandler;
pub(crate) use self::http::{HttpHandle, HttpListener};
pub use self::http::HttpSink;
pub(crate) use self::listener::{ListenerHandle, StreamListener};
pub(crate) use self::websocket::WebSocketConnectionHandler;
pub use self::websocket::WebSocketSink;

const TRANSPORT_TARGET: &str = concat!(env!("CARGO_PKG_NAME"), "::transport");
