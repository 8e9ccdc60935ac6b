//! Interval Gate - Cumulative Timer Rate Gate
//!
//! Admits a protected action (a full reconnect) at most once per minimum
//! period. Unlike a "next allowed at" timestamp, the gate accrues the real
//! time elapsed between consecutive polls and grants once the accrued total
//! reaches the period.
//!
//! ## Algorithm
//!
//! ```text
//! min_period = 60s
//!
//! poll @ t=0s    delta=0  (first poll anchors)   accrued=0s   → deny
//! poll @ t=25s   delta=25s                       accrued=25s  → deny
//! poll @ t=61s   delta=36s                       accrued=61s  → GRANT, reset
//! poll @ t=62s   delta=0  (anchor was cleared)   accrued=0s   → deny
//! ```
//!
//! The first poll after construction or after a grant always reports a zero
//! delta, so one isolated poll never grants: at least two polls spanning
//! `min_period` are needed. A clock that steps backwards contributes a zero
//! delta rather than shrinking the accrued total.
//!
//! ## Usage
//!
//! ```
//! use tether_core::IntervalGate;
//! use std::time::Duration;
//!
//! let mut gate = IntervalGate::new(Duration::from_secs(60));
//!
//! // A single isolated poll never grants
//! assert!(!gate.is_invokable());
//! ```

use crate::core::{saturating_millis, Clock, SystemClock};
use std::sync::Arc;
use std::time::Duration;
use tracing::debug;

/// Default minimum period between granted reconnects
pub const DEFAULT_MIN_PERIOD: Duration = Duration::from_millis(60_000);

/// Cumulative-timer rate gate
pub struct IntervalGate {
    min_period_ms: u64,
    /// Timestamp of the previous poll; `None` until the first poll after a reset
    last_poll_ms: Option<u64>,
    /// Time accrued across polls since the last grant
    accumulated_ms: u64,
    clock: Arc<dyn Clock>,
}

impl IntervalGate {
    /// Create a gate on the system clock
    pub fn new(min_period: Duration) -> Self {
        Self::with_clock(min_period, Arc::new(SystemClock))
    }

    /// Create a gate on a caller-supplied clock
    pub fn with_clock(min_period: Duration, clock: Arc<dyn Clock>) -> Self {
        Self {
            min_period_ms: saturating_millis(min_period),
            last_poll_ms: None,
            accumulated_ms: 0,
            clock,
        }
    }

    /// Poll the gate
    ///
    /// Returns true (and resets) if the accrued time has reached the minimum
    /// period, false otherwise. Every poll moves the anchor to "now".
    pub fn is_invokable(&mut self) -> bool {
        let now = self.clock.now_millis();

        let delta = match self.last_poll_ms {
            None => 0,
            // Backwards clock steps contribute nothing
            Some(last) => now.saturating_sub(last),
        };
        self.last_poll_ms = Some(now);
        self.accumulated_ms = self.accumulated_ms.saturating_add(delta);

        if self.accumulated_ms >= self.min_period_ms {
            debug!(
                "Interval gate granted after {}ms (min {}ms)",
                self.accumulated_ms, self.min_period_ms
            );
            self.reset();
            true
        } else {
            false
        }
    }

    /// Clear the anchor and the accrued time
    pub fn reset(&mut self) {
        self.last_poll_ms = None;
        self.accumulated_ms = 0;
    }

    /// Configured minimum period
    pub fn min_period(&self) -> Duration {
        Duration::from_millis(self.min_period_ms)
    }

    /// Time accrued since the last grant
    pub fn accumulated(&self) -> Duration {
        Duration::from_millis(self.accumulated_ms)
    }

    /// Clock the gate reads from
    pub fn clock(&self) -> Arc<dyn Clock> {
        Arc::clone(&self.clock)
    }
}

impl Default for IntervalGate {
    fn default() -> Self {
        Self::new(DEFAULT_MIN_PERIOD)
    }
}

impl std::fmt::Debug for IntervalGate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("IntervalGate")
            .field("min_period_ms", &self.min_period_ms)
            .field("last_poll_ms", &self.last_poll_ms)
            .field("accumulated_ms", &self.accumulated_ms)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::ManualClock;
    use proptest::prelude::*;

    fn gate_with_clock(min_period_ms: u64) -> (IntervalGate, ManualClock) {
        let clock = ManualClock::new(1_000_000);
        let gate = IntervalGate::with_clock(
            Duration::from_millis(min_period_ms),
            Arc::new(clock.clone()),
        );
        (gate, clock)
    }

    #[test]
    fn test_default_period() {
        let gate = IntervalGate::default();
        assert_eq!(gate.min_period(), Duration::from_secs(60));
        assert_eq!(gate.accumulated(), Duration::ZERO);
    }

    #[test]
    fn test_single_poll_never_grants() {
        let (mut gate, clock) = gate_with_clock(100);
        clock.advance(Duration::from_secs(3600));
        assert!(!gate.is_invokable());
    }

    #[test]
    fn test_immediate_second_poll_denied() {
        let (mut gate, _clock) = gate_with_clock(100);
        assert!(!gate.is_invokable());
        assert!(!gate.is_invokable());
    }

    #[test]
    fn test_grants_once_period_accrues() {
        let (mut gate, clock) = gate_with_clock(100);

        assert!(!gate.is_invokable());
        clock.advance(Duration::from_millis(60));
        assert!(!gate.is_invokable());
        assert_eq!(gate.accumulated(), Duration::from_millis(60));

        clock.advance(Duration::from_millis(40));
        assert!(gate.is_invokable());
        assert_eq!(gate.accumulated(), Duration::ZERO);

        // Anchor was cleared by the grant, the next poll starts fresh
        clock.advance(Duration::from_millis(500));
        assert!(!gate.is_invokable());
    }

    #[test]
    fn test_sparse_polls_accrue_real_time() {
        let (mut gate, clock) = gate_with_clock(60_000);

        assert!(!gate.is_invokable());
        clock.advance(Duration::from_secs(61));
        assert!(gate.is_invokable());
    }

    #[test]
    fn test_zero_period_grants_on_first_poll() {
        let (mut gate, _clock) = gate_with_clock(0);
        assert!(gate.is_invokable());
        assert!(gate.is_invokable());
    }

    #[test]
    fn test_backwards_clock_does_not_shrink_accrual() {
        let (mut gate, clock) = gate_with_clock(100);

        assert!(!gate.is_invokable());
        clock.advance(Duration::from_millis(80));
        assert!(!gate.is_invokable());

        clock.rewind(Duration::from_millis(1_000));
        assert!(!gate.is_invokable());
        assert_eq!(gate.accumulated(), Duration::from_millis(80));

        clock.advance(Duration::from_millis(20));
        assert!(gate.is_invokable());
    }

    #[test]
    fn test_reset_clears_accrual() {
        let (mut gate, clock) = gate_with_clock(100);
        gate.is_invokable();
        clock.advance(Duration::from_millis(90));
        gate.is_invokable();

        gate.reset();
        assert_eq!(gate.accumulated(), Duration::ZERO);

        clock.advance(Duration::from_millis(90));
        assert!(!gate.is_invokable());
    }

    #[test]
    fn test_huge_period_saturates() {
        let (_, clock) = gate_with_clock(0);
        let mut gate = IntervalGate::with_clock(Duration::MAX, Arc::new(clock.clone()));

        assert_eq!(gate.min_period(), Duration::from_millis(u64::MAX));
        assert!(!gate.is_invokable());
        clock.advance(Duration::from_secs(365 * 24 * 3600));
        assert!(!gate.is_invokable());
    }

    proptest! {
        #[test]
        fn prop_deltas_summing_to_period_grant_exactly_once(
            deltas in prop::collection::vec(0u64..5_000, 1..20)
        ) {
            let period: u64 = deltas.iter().sum();
            prop_assume!(period > 0);

            let (mut gate, clock) = gate_with_clock(period);
            let mut grants = usize::from(gate.is_invokable());

            for delta in deltas {
                clock.advance(Duration::from_millis(delta));
                if gate.is_invokable() {
                    grants += 1;
                }
            }

            prop_assert_eq!(grants, 1);
            prop_assert_eq!(gate.accumulated(), Duration::ZERO);
        }

        #[test]
        fn prop_never_grants_below_period(
            deltas in prop::collection::vec(0u64..1_000, 1..20),
            slack in 1u64..1_000,
        ) {
            let period: u64 = deltas.iter().sum::<u64>() + slack;
            let (mut gate, clock) = gate_with_clock(period);
            prop_assert!(!gate.is_invokable());

            for delta in deltas {
                clock.advance(Duration::from_millis(delta));
                prop_assert!(!gate.is_invokable());
            }
        }
    }
}
