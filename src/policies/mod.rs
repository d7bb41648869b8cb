//! Backoff policies.
//!
//! This module groups the knobs that control **how long** a run waits between
//! attempts.
//!
//! ## Contents
//! - [`Backoff`] — the delay-cursor interface the orchestrator consumes
//!   (`next` / `reset`, duplication via `Clone`)
//! - [`ExponentialBackoff`] — the default generator (first / factor / max + jitter)
//! - [`JitterPolicy`] — randomization strategy to avoid thundering herd
//!
//! ## Quick wiring
//! ```text
//! Retrier { backoff: B, .. }
//!      └─► run() clones the template, resets the cursor, then calls
//!          backoff.next() once per failed-and-eligible attempt that
//!          is not the last.
//! ```
//!
//! ## Defaults
//! - `ExponentialBackoff::default()` → first=100ms, factor=2.0, max=30s, jitter=None.
//! - `JitterPolicy::None` by default; consider `Equal` for balanced randomness.

mod backoff;
mod jitter;

pub use backoff::{Backoff, ExponentialBackoff};
pub use jitter::JitterPolicy;
