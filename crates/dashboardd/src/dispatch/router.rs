//! Routing of decoded envelopes to registered handlers.
//!
//! The [`Dispatcher`] is shared by every transport. It decodes the envelope,
//! derives a per-command [`RequestContext`], resolves the handler for the
//! sink's transport and delivers the outcome. Client mistakes are answered
//! with `421 Misdirected`; nothing a client sends can make `dispatch` fail.

use std::sync::Arc;
use std::time::Duration;

use tracing::{debug, error, info, warn};

use crate::context::RequestContext;

use super::errors::DispatchError;
use super::registry::{HandlerRegistry, Route};
use super::request::CommandEnvelope;
use super::response::Reply;
use super::sink::ReplySink;

/// Tracing target for dispatch operations.
pub(crate) const DISPATCH_TARGET: &str = concat!(env!("CARGO_PKG_NAME"), "::dispatch");

/// Routes commands from any transport to the registered handlers.
#[derive(Debug, Clone)]
pub struct Dispatcher {
    registry: Arc<HandlerRegistry>,
    root: RequestContext,
    request_timeout: Duration,
}

impl Dispatcher {
    /// Creates a dispatcher over `registry`.
    ///
    /// Every command runs under a child of `root` that expires after
    /// `request_timeout`.
    #[must_use]
    pub fn new(
        registry: Arc<HandlerRegistry>,
        root: RequestContext,
        request_timeout: Duration,
    ) -> Self {
        Self {
            registry,
            root,
            request_timeout,
        }
    }

    /// Registry the dispatcher consults.
    #[must_use]
    pub fn registry(&self) -> &Arc<HandlerRegistry> {
        &self.registry
    }

    /// Context every command context is derived from. Cancelled at
    /// shutdown.
    #[must_use]
    pub fn root_context(&self) -> &RequestContext {
        &self.root
    }

    /// Decodes `raw` and dispatches the resulting command.
    ///
    /// Malformed input is answered with a `421` reply on `sink`.
    pub fn dispatch(&self, raw: &[u8], sink: &dyn ReplySink) {
        match CommandEnvelope::decode(raw) {
            Ok(envelope) => self.dispatch_command(&envelope, sink),
            Err(error) => {
                warn!(
                    target: DISPATCH_TARGET,
                    transport = %sink.transport(),
                    error = %error,
                    "rejecting malformed envelope"
                );
                deliver(sink, Reply::misdirected());
            }
        }
    }

    /// Dispatches an already decoded command.
    pub fn dispatch_command(&self, envelope: &CommandEnvelope, sink: &dyn ReplySink) {
        let transport = sink.transport();
        let name = envelope.name();
        let Some(route) = self.registry.resolve(name, transport) else {
            let error = DispatchError::unknown_route(name);
            info!(
                target: DISPATCH_TARGET,
                transport = %transport,
                error = %error,
                "misdirected command"
            );
            deliver(sink, Reply::misdirected());
            return;
        };

        let context = self.root.child(self.request_timeout);
        debug!(
            target: DISPATCH_TARGET,
            transport = %transport,
            name,
            kind = %route.kind(),
            payload_bytes = envelope.payload().len(),
            budget = ?context.remaining(),
            "dispatching command"
        );

        match route {
            Route::Command(handler) => {
                let reply = match handler.handle(envelope.payload(), &context) {
                    Ok(reply) => reply,
                    Err(failure) => {
                        warn!(
                            target: DISPATCH_TARGET,
                            transport = %transport,
                            name,
                            status = failure.status(),
                            error = %failure,
                            "command handler failed"
                        );
                        failure.reply()
                    }
                };
                deliver(sink, reply);
            }
            Route::Stream(handler) => {
                if let Err(failure) = handler.handle(envelope.payload(), &context, sink) {
                    warn!(
                        target: DISPATCH_TARGET,
                        transport = %transport,
                        name,
                        error = %failure,
                        "stream handler failed"
                    );
                }
            }
        }
    }
}

fn deliver(sink: &dyn ReplySink, reply: Reply) {
    let status = reply.status();
    match sink.deliver(reply) {
        Ok(()) => {}
        Err(failure @ DispatchError::Encoding(_)) => error!(
            target: DISPATCH_TARGET,
            transport = %sink.transport(),
            status,
            error = %failure,
            "failed to encode reply"
        ),
        Err(failure) => warn!(
            target: DISPATCH_TARGET,
            transport = %sink.transport(),
            status,
            error = %failure,
            "failed to deliver reply"
        ),
    }
}
