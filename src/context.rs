//! # Cancellable execution context.
//!
//! A [`Context`] bundles the two ways a retry run can be told to stop early:
//! an explicit cancellation signal (a [`CancellationToken`]) and an optional
//! deadline. Both feed the same observation point, [`Context::cancelled`],
//! which resolves with a [`CancelCause`] identifying which source fired.
//!
//! There is no timeout knob anywhere else in the crate: callers that want a
//! time limit encode it into the context via [`Context::with_deadline`] or
//! [`Context::with_timeout`].
//!
//! ## Rules
//! - Clones share the same cancellation state (cancelling one cancels all).
//! - [`Context::child`] derives an isolated scope: cancelling the child does
//!   **not** affect the parent, while parent cancellation propagates down.
//! - Once fired, [`Context::cause`] is stable for the life of the context.

use std::fmt;
use std::time::Duration;

use tokio::time::{self, Instant};
use tokio_util::sync::CancellationToken;

/// Why a context stopped.
///
/// Explicit cancellation wins over the deadline when both have fired by the
/// time the cause is observed.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CancelCause {
    /// [`Context::cancel`] was called (directly or on a clone/parent).
    Cancelled,
    /// The deadline passed before the work finished.
    DeadlineExceeded,
}

impl fmt::Display for CancelCause {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CancelCause::Cancelled => f.write_str("context cancelled"),
            CancelCause::DeadlineExceeded => f.write_str("deadline exceeded"),
        }
    }
}

/// Cancellation signal plus optional deadline, passed into every attempt.
///
/// Cheap to clone; a clone observes the same cancellation state as the
/// original, so an action can hold one while the caller keeps another.
///
/// # Example
/// ```
/// use retrier::{CancelCause, Context};
///
/// let ctx = Context::new();
/// assert!(!ctx.is_cancelled());
///
/// ctx.cancel();
/// assert!(ctx.is_cancelled());
/// assert_eq!(ctx.cause(), Some(CancelCause::Cancelled));
/// ```
#[derive(Clone, Debug, Default)]
pub struct Context {
    token: CancellationToken,
    deadline: Option<Instant>,
}

impl Context {
    /// Creates a context with a fresh token and no deadline.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a context driven by an existing token.
    ///
    /// Useful when the caller already threads a [`CancellationToken`] through
    /// its runtime (shutdown signal, supervisor token) and wants retry runs
    /// to honor it.
    pub fn with_token(token: CancellationToken) -> Self {
        Self {
            token,
            deadline: None,
        }
    }

    /// Returns this context with an absolute deadline attached.
    pub fn with_deadline(mut self, at: Instant) -> Self {
        self.deadline = Some(at);
        self
    }

    /// Returns this context with a deadline `dur` from now.
    pub fn with_timeout(self, dur: Duration) -> Self {
        self.with_deadline(Instant::now() + dur)
    }

    /// Fires the explicit cancellation signal.
    pub fn cancel(&self) {
        self.token.cancel();
    }

    /// Whether either cancellation source has fired.
    pub fn is_cancelled(&self) -> bool {
        self.token.is_cancelled() || self.deadline.is_some_and(|at| Instant::now() >= at)
    }

    /// Why the context stopped, or `None` while it is still live.
    pub fn cause(&self) -> Option<CancelCause> {
        if self.token.is_cancelled() {
            Some(CancelCause::Cancelled)
        } else if self.deadline.is_some_and(|at| Instant::now() >= at) {
            Some(CancelCause::DeadlineExceeded)
        } else {
            None
        }
    }

    /// Resolves when either the token is cancelled or the deadline passes,
    /// reporting which source fired first.
    ///
    /// Never resolves for a context with no deadline and an untouched token.
    /// Cancel-safe: losing a `select!` race leaves no side effects.
    pub async fn cancelled(&self) -> CancelCause {
        match self.deadline {
            Some(at) => {
                tokio::select! {
                    _ = self.token.cancelled() => CancelCause::Cancelled,
                    _ = time::sleep_until(at) => CancelCause::DeadlineExceeded,
                }
            }
            None => {
                self.token.cancelled().await;
                CancelCause::Cancelled
            }
        }
    }

    /// Derives a child context: parent cancellation propagates to the child,
    /// child cancellation stays local. The deadline is inherited as-is.
    pub fn child(&self) -> Context {
        Context {
            token: self.token.child_token(),
            deadline: self.deadline,
        }
    }
}
