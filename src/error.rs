//! Error type for retry runs.
//!
//! A failed run ends in exactly one of three ways, modeled by [`RetryError`]:
//!
//! - [`RetryError::Rejected`] — the eligibility filter said the error is not
//!   worth retrying; the action's error is propagated verbatim.
//! - [`RetryError::Exhausted`] — every allowed attempt failed; carries all
//!   errors seen, in attempt order.
//! - [`RetryError::Canceled`] — the context fired mid-run; carries the cause
//!   and how many attempts had been made.
//!
//! The orchestrator never swallows failure information: everything it knows
//! at the point of giving up is inside the returned variant.

use thiserror::Error;

use crate::context::CancelCause;

/// Terminal failure of a retry run, parameterized over the action's error
/// type `E`.
///
/// The three variants are mutually exclusive and exhaustive for a run.
/// Cancellation takes precedence in reporting: a run that is cancelled while
/// waiting does not surface the errors accumulated before the cancellation,
/// only the cause and the attempt count.
#[non_exhaustive]
#[derive(Error, Debug)]
pub enum RetryError<E> {
    /// The eligibility filter rejected this error; it was not retried.
    ///
    /// Transparent: displays as the underlying error itself.
    #[error(transparent)]
    Rejected(E),

    /// All attempts were consumed without success.
    ///
    /// `errors` holds every error encountered, ordered by attempt. Empty when
    /// the run was configured with zero attempts.
    #[error("retry attempts exhausted after {} failure(s)", errors.len())]
    Exhausted {
        /// Every error seen this run, in attempt order.
        errors: Vec<E>,
    },

    /// The context was cancelled while waiting to retry.
    #[error("{cause} while retrying; made {attempts} attempt(s)")]
    Canceled {
        /// Which cancellation source fired.
        cause: CancelCause,
        /// Number of attempts completed before cancellation.
        attempts: u32,
    },
}

impl<E> RetryError<E> {
    /// Returns a short stable label (snake_case) for use in logs/metrics.
    pub fn as_label(&self) -> &'static str {
        match self {
            RetryError::Rejected(_) => "retry_rejected",
            RetryError::Exhausted { .. } => "retry_exhausted",
            RetryError::Canceled { .. } => "retry_canceled",
        }
    }

    /// Whether the run ended because the context fired.
    pub fn is_canceled(&self) -> bool {
        matches!(self, RetryError::Canceled { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io;

    #[test]
    fn labels_are_stable() {
        let rejected: RetryError<io::Error> =
            RetryError::Rejected(io::Error::new(io::ErrorKind::PermissionDenied, "nope"));
        assert_eq!(rejected.as_label(), "retry_rejected");

        let exhausted: RetryError<io::Error> = RetryError::Exhausted { errors: vec![] };
        assert_eq!(exhausted.as_label(), "retry_exhausted");

        let canceled: RetryError<io::Error> = RetryError::Canceled {
            cause: CancelCause::Cancelled,
            attempts: 2,
        };
        assert_eq!(canceled.as_label(), "retry_canceled");
        assert!(canceled.is_canceled());
    }

    #[test]
    fn rejected_displays_as_inner_error() {
        let inner = io::Error::new(io::ErrorKind::PermissionDenied, "unauthorized");
        let msg = inner.to_string();
        let err: RetryError<io::Error> = RetryError::Rejected(inner);
        assert_eq!(err.to_string(), msg);
    }

    #[test]
    fn canceled_display_names_cause_and_attempts() {
        let err: RetryError<io::Error> = RetryError::Canceled {
            cause: CancelCause::DeadlineExceeded,
            attempts: 3,
        };
        assert_eq!(
            err.to_string(),
            "deadline exceeded while retrying; made 3 attempt(s)"
        );
    }
}
