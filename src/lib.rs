//! # retrier
//!
//! **Retrier** is a small, cancellable retry orchestrator for async Rust.
//!
//! It runs a caller-supplied fallible action repeatedly, spacing attempts
//! with delays drawn from a backoff generator, until the action succeeds, a
//! retry-eligibility filter rejects the error, the cancellable context
//! fires, or the attempt budget is exhausted. It is a resilience primitive,
//! not an application: the crate never decides *what* to run, only *whether
//! and when* to run it again.
//!
//! ## Architecture
//! ```text
//!              ┌──────────────────────────────────────────┐
//!              │ Retrier (policy, immutable, shareable)   │
//!              │  - backoff template  (B: Backoff + Clone)│
//!              │  - eligibility filter (Fn(&E) -> bool)   │
//!              │  - max_attempts                          │
//!              └───────────────────┬──────────────────────┘
//!                                  │ run(ctx, action)
//!                                  ▼
//!   per run: backoff = template.clone(); backoff.reset()
//!
//!   loop {
//!     ├─► action(ctx).await
//!     │     ├─ Ok            ─► Ok(())
//!     │     └─ Err(e)
//!     │          ├─ filter says no ─► Err(Rejected(e))
//!     │          └─ accumulate e
//!     └─► race { sleep(backoff.next()) | ctx.cancelled() }
//!           ├─ timer  ─► next attempt
//!           └─ cancel ─► Err(Canceled { cause, attempts })
//!   }
//!   // budget spent:
//!   Err(Exhausted { errors })   // every error, in attempt order
//! ```
//!
//! ## Features
//! | Area            | Description                                                  | Key types                                    |
//! |-----------------|--------------------------------------------------------------|----------------------------------------------|
//! | **Policy**      | Reusable retry policy; safe to share across concurrent runs. | [`Retrier`], [`retry`]                       |
//! | **Backoff**     | Pluggable delay cursor with clone/reset semantics.           | [`Backoff`], [`ExponentialBackoff`]          |
//! | **Jitter**      | Randomization to avoid thundering herds.                     | [`JitterPolicy`]                             |
//! | **Cancellation**| Token + optional deadline, raced against every wait.         | [`Context`], [`CancelCause`]                 |
//! | **Errors**      | Typed, exhaustive run outcomes.                              | [`RetryError`]                               |
//!
//! ## Example
//! ```rust
//! use std::io;
//! use std::time::Duration;
//! use retrier::{Context, ExponentialBackoff, Retrier};
//!
//! #[tokio::main(flavor = "current_thread")]
//! async fn main() {
//!     let policy = Retrier::new(4)
//!         .with_backoff(ExponentialBackoff::new(
//!             Duration::from_millis(1),
//!             Duration::from_millis(50),
//!             2.0,
//!         ))
//!         // An unauthorized request will not get better by retrying.
//!         .with_filter(|e: &io::Error| e.kind() != io::ErrorKind::PermissionDenied);
//!
//!     // Give the whole run at most five seconds.
//!     let ctx = Context::new().with_timeout(Duration::from_secs(5));
//!
//!     let mut failures_left = 2;
//!     let res = policy
//!         .run(&ctx, |_ctx| {
//!             let fail = failures_left > 0;
//!             failures_left -= u32::from(fail);
//!             async move {
//!                 if fail {
//!                     Err(io::Error::new(io::ErrorKind::ConnectionReset, "flaky"))
//!                 } else {
//!                     Ok(())
//!                 }
//!             }
//!         })
//!         .await;
//!
//!     assert!(res.is_ok());
//! }
//! ```

mod context;
mod error;
mod policies;
mod retrier;

// ---- Public re-exports ----

pub use context::{CancelCause, Context};
pub use error::RetryError;
pub use policies::{Backoff, ExponentialBackoff, JitterPolicy};
pub use retrier::{retry, Retrier};
