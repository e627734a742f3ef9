//! Transport-agnostic command dispatch.
//!
//! Every transport funnels inbound commands into the shared [`Dispatcher`],
//! which looks up the handler registered under the command's routing key and
//! delivers the outcome to the transport's [`ReplySink`].
//!
//! ## Protocol
//!
//! Streaming clients send one JSON envelope per WebSocket text message:
//!
//! ```json
//! {"name":"listInstallationData","payload":{"namespace":"garden"}}
//! ```
//!
//! and receive one reply envelope per message:
//!
//! ```json
//! {"status":200,"body":[{"name":"etcd","namespace":"garden",
//!   "upToDate":true,"phase":"Succeeded","execution":null}]}
//! ```
//!
//! HTTP clients `POST` the payload to `/<name>` and receive the reply body
//! with `status` on the response status line.
//!
//! ## Handler kinds
//!
//! Synchronous handlers return exactly one reply and serve both transports.
//! Streaming handlers write to the sink themselves and are only reachable
//! over the streaming transport, which prefers them when a synchronous
//! handler shares the name. Unknown names and malformed envelopes are
//! answered with `421 Misdirected`.

mod errors;
mod handler;
mod registry;
mod request;
mod response;
mod router;
mod sink;

pub use self::errors::DispatchError;
pub use self::handler::{CommandHandler, HandlerError, HandlerKind, StreamHandler};
pub use self::registry::{HandlerRegistry, Route};
pub use self::request::CommandEnvelope;
pub use self::response::{
    Reply, STATUS_BAD_REQUEST, STATUS_INTERNAL_ERROR, STATUS_METHOD_NOT_ALLOWED,
    STATUS_MISDIRECTED, STATUS_OK,
};
pub use self::router::Dispatcher;
pub(crate) use self::router::DISPATCH_TARGET;
pub use self::sink::{ReplySink, Transport};
