//! Command name to handler mapping shared by every dispatch.
//!
//! Routes live in an immutable snapshot published through [`ArcSwap`]. A
//! lookup loads the current snapshot without taking a lock, so reads never
//! block each other or a concurrent registration. Registration copies the
//! snapshot, inserts the handler and publishes the copy atomically; a lookup
//! therefore observes a handler completely or not at all. Lookups hand out
//! `Arc` clones, so handlers always execute outside the registry.

use std::collections::HashMap;
use std::sync::Arc;

use arc_swap::ArcSwap;
use tracing::debug;

use super::handler::{CommandHandler, HandlerKind, StreamHandler};
use super::router::DISPATCH_TARGET;
use super::sink::Transport;

#[derive(Clone, Default)]
struct Routes {
    commands: HashMap<String, Arc<dyn CommandHandler>>,
    streams: HashMap<String, Arc<dyn StreamHandler>>,
}

/// Handler selected for one dispatch.
#[derive(Clone)]
pub enum Route {
    /// Synchronous request/reply handler.
    Command(Arc<dyn CommandHandler>),
    /// Streaming handler writing directly to the sink.
    Stream(Arc<dyn StreamHandler>),
}

impl Route {
    /// Kind of the selected handler.
    #[must_use]
    pub fn kind(&self) -> HandlerKind {
        match self {
            Self::Command(_) => HandlerKind::Synchronous,
            Self::Stream(_) => HandlerKind::Streaming,
        }
    }
}

/// Concurrent registry of command handlers.
pub struct HandlerRegistry {
    routes: ArcSwap<Routes>,
}

impl Default for HandlerRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for HandlerRegistry {
    fn fmt(&self, formatter: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let routes = self.routes.load();
        formatter
            .debug_struct("HandlerRegistry")
            .field("commands", &routes.commands.keys().collect::<Vec<_>>())
            .field("streams", &routes.streams.keys().collect::<Vec<_>>())
            .finish()
    }
}

impl HandlerRegistry {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self {
            routes: ArcSwap::from_pointee(Routes::default()),
        }
    }

    /// Registers a synchronous handler. A previous handler with the same
    /// name is replaced.
    pub fn register_command(&self, name: impl Into<String>, handler: Arc<dyn CommandHandler>) {
        let name = name.into();
        let previous = self.routes.rcu(|current| {
            let mut next = Routes::clone(current);
            next.commands.insert(name.clone(), Arc::clone(&handler));
            next
        });
        log_registration(&name, HandlerKind::Synchronous, previous.commands.contains_key(&name));
    }

    /// Registers a streaming handler. A previous handler with the same name
    /// is replaced.
    pub fn register_stream(&self, name: impl Into<String>, handler: Arc<dyn StreamHandler>) {
        let name = name.into();
        let previous = self.routes.rcu(|current| {
            let mut next = Routes::clone(current);
            next.streams.insert(name.clone(), Arc::clone(&handler));
            next
        });
        log_registration(&name, HandlerKind::Streaming, previous.streams.contains_key(&name));
    }

    /// Looks up the synchronous handler registered under `name`.
    #[must_use]
    pub fn lookup_command(&self, name: &str) -> Option<Arc<dyn CommandHandler>> {
        self.routes.load().commands.get(name).cloned()
    }

    /// Looks up the streaming handler registered under `name`.
    #[must_use]
    pub fn lookup_stream(&self, name: &str) -> Option<Arc<dyn StreamHandler>> {
        self.routes.load().streams.get(name).cloned()
    }

    /// Returns `true` when a handler of `kind` is registered under `name`.
    #[must_use]
    pub fn contains(&self, name: &str, kind: HandlerKind) -> bool {
        let routes = self.routes.load();
        match kind {
            HandlerKind::Synchronous => routes.commands.contains_key(name),
            HandlerKind::Streaming => routes.streams.contains_key(name),
        }
    }

    /// Selects the handler for a command arriving over `transport`.
    ///
    /// Streaming connections prefer a streaming handler and fall back to the
    /// synchronous one. HTTP only reaches synchronous handlers. Both lookups
    /// use the same snapshot.
    #[must_use]
    pub fn resolve(&self, name: &str, transport: Transport) -> Option<Route> {
        let routes = self.routes.load();
        if transport == Transport::Streaming
            && let Some(handler) = routes.streams.get(name)
        {
            return Some(Route::Stream(Arc::clone(handler)));
        }
        routes
            .commands
            .get(name)
            .map(|handler| Route::Command(Arc::clone(handler)))
    }

    /// Sorted routing keys registered for `kind`.
    #[must_use]
    pub fn names(&self, kind: HandlerKind) -> Vec<String> {
        let routes = self.routes.load();
        let mut names: Vec<String> = match kind {
            HandlerKind::Synchronous => routes.commands.keys().cloned().collect(),
            HandlerKind::Streaming => routes.streams.keys().cloned().collect(),
        };
        names.sort();
        names
    }
}

fn log_registration(name: &str, kind: HandlerKind, replaced: bool) {
    debug!(
        target: DISPATCH_TARGET,
        name,
        kind = %kind,
        replaced,
        "handler registered"
    );
}
