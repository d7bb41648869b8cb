//! # Retry orchestrator.
//!
//! [`Retrier`] runs a fallible async action under a retry policy: a backoff
//! template, a retry-eligibility filter, and a maximum attempt count. One
//! policy value is immutable after construction and safely shared across
//! concurrent runs; each run works on its own cloned-and-reset backoff
//! cursor.
//!
//! ## Flow
//! ```text
//! run(ctx, action):
//!   backoff = template.clone(); backoff.reset()
//!   for attempt in 0..max_attempts {
//!     ├─► action(ctx).await
//!     │     ├─ Ok          ─► return Ok(())
//!     │     └─ Err(e)
//!     │          ├─ !filter(e) ─► return Rejected(e)
//!     │          └─ push e onto error list
//!     └─► if another attempt follows:
//!          race { sleep(backoff.next()) | ctx.cancelled() }
//!            ├─ timer first  ─► continue
//!            └─ cancel first ─► return Canceled { cause, attempts }
//!   }
//!   return Exhausted { errors }
//! ```
//!
//! ## Rules
//! - Attempts run **sequentially**; the only suspension point besides the
//!   action itself is the backoff wait.
//! - The wait only happens when another attempt will follow: `backoff.next()`
//!   is called exactly once per failed-and-eligible attempt that is not the
//!   last, never after the final one.
//! - Cancellation observed mid-wait wins immediately: the elapsed timer is
//!   discarded and the accumulated errors are not reported, only the cause
//!   and the attempt count.
//! - `max_attempts == 0` returns an empty [`RetryError::Exhausted`] without
//!   invoking the action or touching the context.

use std::future::Future;
use std::sync::Arc;

use tokio::time;

use crate::context::Context;
use crate::error::RetryError;
use crate::policies::{Backoff, ExponentialBackoff};

/// Retry policy and orchestrator for a fallible async action.
///
/// Parameterized over the action's error type `E` and the backoff generator
/// `B` (defaulting to [`ExponentialBackoff`]). Construct with
/// [`Retrier::new`] for the default backoff and an always-eligible filter,
/// then customize with [`with_backoff`](Retrier::with_backoff) and
/// [`with_filter`](Retrier::with_filter).
///
/// # Example
/// ```
/// use std::io;
/// use std::time::Duration;
/// use retrier::{Context, ExponentialBackoff, Retrier};
///
/// # #[tokio::main(flavor = "current_thread")]
/// # async fn main() {
/// let policy = Retrier::new(3)
///     .with_backoff(ExponentialBackoff::new(
///         Duration::from_millis(1),
///         Duration::from_millis(10),
///         2.0,
///     ))
///     // Retrying an unauthorized request will not help.
///     .with_filter(|e: &io::Error| e.kind() != io::ErrorKind::PermissionDenied);
///
/// let ctx = Context::new();
/// let mut failures_left = 2;
/// let res = policy
///     .run(&ctx, |_ctx| {
///         let fail = failures_left > 0;
///         failures_left -= u32::from(fail);
///         async move {
///             if fail {
///                 Err(io::Error::new(io::ErrorKind::ConnectionReset, "flaky"))
///             } else {
///                 Ok(())
///             }
///         }
///     })
///     .await;
/// assert!(res.is_ok());
/// # }
/// ```
pub struct Retrier<E, B = ExponentialBackoff> {
    /// Backoff template; cloned and reset at the start of every run.
    backoff: B,
    /// Retry-eligibility filter. Always set; defaults to "always eligible".
    should_retry: Arc<dyn Fn(&E) -> bool + Send + Sync>,
    /// Maximum number of action invocations per run.
    max_attempts: u32,
}

impl<E, B: Clone> Clone for Retrier<E, B> {
    fn clone(&self) -> Self {
        Self {
            backoff: self.backoff.clone(),
            should_retry: Arc::clone(&self.should_retry),
            max_attempts: self.max_attempts,
        }
    }
}

impl<E> Retrier<E> {
    /// Creates a policy with the default [`ExponentialBackoff`] template and
    /// an always-eligible filter.
    pub fn new(max_attempts: u32) -> Self {
        Self {
            backoff: ExponentialBackoff::default(),
            should_retry: Arc::new(|_| true),
            max_attempts,
        }
    }
}

impl<E, B> Retrier<E, B> {
    /// Returns this policy with a different backoff template.
    pub fn with_backoff<B2>(self, backoff: B2) -> Retrier<E, B2> {
        Retrier {
            backoff,
            should_retry: self.should_retry,
            max_attempts: self.max_attempts,
        }
    }

    /// Returns this policy with a retry-eligibility filter.
    ///
    /// The filter sees every error the action returns; returning `false`
    /// stops the run immediately with that error, unwrapped.
    pub fn with_filter(mut self, filter: impl Fn(&E) -> bool + Send + Sync + 'static) -> Self {
        self.should_retry = Arc::new(filter);
        self
    }

    /// Maximum number of action invocations per run.
    pub fn max_attempts(&self) -> u32 {
        self.max_attempts
    }
}

impl<E, B: Backoff + Clone> Retrier<E, B> {
    /// Runs `action` under this policy until success, an ineligible error,
    /// cancellation, or attempt exhaustion.
    ///
    /// Each attempt receives a clone of `ctx`, so the action can observe
    /// cancellation cooperatively while the orchestrator races the same
    /// context against the backoff timer between attempts.
    ///
    /// ### Outcomes
    /// - `Ok(())` — some attempt succeeded; no further attempts, no wait.
    /// - [`RetryError::Rejected`] — the filter declined an error; it is
    ///   returned verbatim after exactly that attempt.
    /// - [`RetryError::Canceled`] — `ctx` fired during a backoff wait.
    /// - [`RetryError::Exhausted`] — all attempts failed; carries every
    ///   error in attempt order.
    pub async fn run<F, Fut>(&self, ctx: &Context, mut action: F) -> Result<(), RetryError<E>>
    where
        F: FnMut(Context) -> Fut,
        Fut: Future<Output = Result<(), E>>,
    {
        let mut backoff = self.backoff.clone();
        backoff.reset();

        let mut errors: Vec<E> = Vec::new();

        for attempt in 0..self.max_attempts {
            match action(ctx.clone()).await {
                Ok(()) => return Ok(()),
                Err(err) => {
                    if !(self.should_retry)(&err) {
                        tracing::debug!(attempt = attempt + 1, "error not eligible for retry");
                        return Err(RetryError::Rejected(err));
                    }
                    errors.push(err);
                }
            }

            // No wait after the final attempt.
            if attempt + 1 == self.max_attempts {
                break;
            }

            let delay = backoff.next();
            tracing::debug!(
                attempt = attempt + 1,
                delay_ms = delay.as_millis() as u64,
                "attempt failed; backing off"
            );

            let sleep = time::sleep(delay);
            tokio::pin!(sleep);
            tokio::select! {
                _ = &mut sleep => {}
                cause = ctx.cancelled() => {
                    tracing::debug!(attempts = attempt + 1, %cause, "retry run cancelled");
                    return Err(RetryError::Canceled {
                        cause,
                        attempts: attempt + 1,
                    });
                }
            }
        }

        Err(RetryError::Exhausted { errors })
    }
}

/// One-shot helper: retries `action` at most `max_attempts` times using the
/// given backoff template and the default always-eligible filter.
///
/// The template is cloned and reset before use, so the caller's value is
/// never mutated. For policies reused across many runs, build a [`Retrier`]
/// instead.
pub async fn retry<E, B, F, Fut>(
    ctx: &Context,
    backoff: B,
    max_attempts: u32,
    action: F,
) -> Result<(), RetryError<E>>
where
    B: Backoff + Clone,
    F: FnMut(Context) -> Fut,
    Fut: Future<Output = Result<(), E>>,
{
    Retrier::new(max_attempts)
        .with_backoff(backoff)
        .run(ctx, action)
        .await
}
