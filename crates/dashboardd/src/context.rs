//! Deadlines and cancellation for work performed on behalf of one command.
//!
//! Every dispatch receives a [`RequestContext`] derived from the server's root
//! context. Collaborators that block on I/O accept the context and call
//! [`RequestContext::check`] before (and, where they can, during) each
//! operation so that shutdown and per-command time budgets are honoured.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::{Duration, Instant};

use thiserror::Error;

/// Reason a context no longer permits work.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum Interrupted {
    /// The context, or one of its ancestors, was cancelled.
    #[error("request cancelled")]
    Cancelled,
    /// The context's deadline has passed.
    #[error("request deadline exceeded")]
    DeadlineExceeded,
}

/// Cancellation token with an optional deadline.
///
/// Clones share the cancellation flag. Children created with
/// [`RequestContext::child`] also share their parent's flag, so cancelling the
/// root interrupts every in-flight command.
#[derive(Debug, Clone)]
pub struct RequestContext {
    cancelled: Arc<AtomicBool>,
    deadline: Option<Instant>,
}

impl RequestContext {
    /// A context that is never cancelled implicitly and has no deadline.
    #[must_use]
    pub fn background() -> Self {
        Self {
            cancelled: Arc::new(AtomicBool::new(false)),
            deadline: None,
        }
    }

    /// Derives a context that expires after `timeout` or when `self` is
    /// cancelled, whichever happens first.
    #[must_use]
    pub fn child(&self, timeout: Duration) -> Self {
        let candidate = Instant::now().checked_add(timeout);
        let deadline = match (self.deadline, candidate) {
            (Some(parent), Some(own)) => Some(parent.min(own)),
            (parent, own) => parent.or(own),
        };
        Self {
            cancelled: Arc::clone(&self.cancelled),
            deadline,
        }
    }

    /// Cancels this context and every context sharing its flag.
    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::SeqCst);
    }

    /// Returns `true` once [`RequestContext::cancel`] has been called.
    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::SeqCst)
    }

    /// Deadline, if any.
    #[must_use]
    pub fn deadline(&self) -> Option<Instant> {
        self.deadline
    }

    /// Time left before the deadline. `None` means unbounded.
    #[must_use]
    pub fn remaining(&self) -> Option<Duration> {
        self.deadline
            .map(|deadline| deadline.saturating_duration_since(Instant::now()))
    }

    /// Fails when the context has been cancelled or has expired.
    ///
    /// # Errors
    ///
    /// Returns [`Interrupted::Cancelled`] after cancellation and
    /// [`Interrupted::DeadlineExceeded`] once the deadline has passed.
    pub fn check(&self) -> Result<(), Interrupted> {
        if self.is_cancelled() {
            return Err(Interrupted::Cancelled);
        }
        match self.deadline {
            Some(deadline) if Instant::now() >= deadline => Err(Interrupted::DeadlineExceeded),
            _ => Ok(()),
        }
    }
}

impl Default for RequestContext {
    fn default() -> Self {
        Self::background()
    }
}
