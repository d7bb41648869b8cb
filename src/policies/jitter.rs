//! # Jitter policy for retry delays.
//!
//! [`JitterPolicy`] adds randomness to backoff delays so that many callers
//! failing at the same time do not retry in lockstep.
//!
//! - [`JitterPolicy::None`] — no randomization, predictable delays
//! - [`JitterPolicy::Full`] — random delay in `[0, delay]`
//! - [`JitterPolicy::Equal`] — `delay/2 + random[0, delay/2]`
//! - [`JitterPolicy::Decorrelated`] — grows from the previous delay, capped

use std::time::Duration;

use rand::Rng;

/// Randomization applied to a computed backoff delay.
///
/// `Equal` is the usual recommendation: it keeps at least half of the
/// computed delay while still spreading load. `Full` is the most aggressive
/// spread; `Decorrelated` needs context (base, previous, cap) and is wired up
/// by [`ExponentialBackoff`](crate::ExponentialBackoff) internally.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum JitterPolicy {
    /// Use the exact computed delay.
    #[default]
    None,
    /// Random delay in `[0, delay]`.
    Full,
    /// `delay/2` plus a random amount up to `delay/2`.
    Equal,
    /// Random delay in `[base, prev * 3]`, capped. Requires
    /// [`apply_decorrelated`](Self::apply_decorrelated).
    Decorrelated,
}

impl JitterPolicy {
    /// Applies jitter to `delay`.
    ///
    /// `Decorrelated` is a no-op here because it needs more context; use
    /// [`apply_decorrelated`](Self::apply_decorrelated) for it.
    pub fn apply(&self, delay: Duration) -> Duration {
        let ms = delay.as_millis() as u64;
        match self {
            JitterPolicy::None | JitterPolicy::Decorrelated => delay,
            JitterPolicy::Full => {
                if ms == 0 {
                    return Duration::ZERO;
                }
                Duration::from_millis(rand::rng().random_range(0..=ms))
            }
            JitterPolicy::Equal => {
                if ms == 0 {
                    return Duration::ZERO;
                }
                let half = ms / 2;
                let jitter = if half == 0 {
                    0
                } else {
                    rand::rng().random_range(0..=half)
                };
                Duration::from_millis(half + jitter)
            }
        }
    }

    /// Applies decorrelated jitter: random in `[base, prev * 3]`, capped at
    /// `max`. Falls back to [`apply`](Self::apply) on other variants.
    pub fn apply_decorrelated(&self, base: Duration, prev: Duration, max: Duration) -> Duration {
        if !matches!(self, JitterPolicy::Decorrelated) {
            return self.apply(prev);
        }

        let base_ms = base.as_millis() as u64;
        let max_ms = max.as_millis() as u64;
        let upper = (prev.as_millis() as u64).saturating_mul(3).min(max_ms);
        let upper = upper.max(base_ms);

        if base_ms >= upper {
            return base;
        }
        Duration::from_millis(rand::rng().random_range(base_ms..=upper))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn none_is_identity() {
        let delay = Duration::from_millis(250);
        assert_eq!(JitterPolicy::None.apply(delay), delay);
    }

    #[test]
    fn full_jitter_stays_within_bounds() {
        let delay = Duration::from_millis(1000);
        for _ in 0..100 {
            assert!(JitterPolicy::Full.apply(delay) <= delay);
        }
    }

    #[test]
    fn equal_jitter_keeps_at_least_half() {
        let delay = Duration::from_millis(1000);
        for _ in 0..100 {
            let jittered = JitterPolicy::Equal.apply(delay);
            assert!(jittered >= Duration::from_millis(500));
            assert!(jittered <= delay);
        }
    }

    #[test]
    fn zero_delay_stays_zero() {
        assert_eq!(JitterPolicy::Full.apply(Duration::ZERO), Duration::ZERO);
        assert_eq!(JitterPolicy::Equal.apply(Duration::ZERO), Duration::ZERO);
    }

    #[test]
    fn decorrelated_stays_within_floor_and_cap() {
        let base = Duration::from_millis(100);
        let prev = Duration::from_secs(20);
        let max = Duration::from_secs(30);
        for _ in 0..100 {
            let d = JitterPolicy::Decorrelated.apply_decorrelated(base, prev, max);
            assert!(d >= base);
            assert!(d <= max);
        }
    }

    #[test]
    fn decorrelated_degenerate_range_returns_base() {
        let base = Duration::from_millis(100);
        let d = JitterPolicy::Decorrelated.apply_decorrelated(base, Duration::ZERO, base);
        assert_eq!(d, base);
    }
}
