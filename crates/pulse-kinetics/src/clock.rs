//! Monotonic millisecond clocks.
//!
//! The tracker never reads wall time directly. Every time-dependent query has
//! an `_at` variant taking an explicit timestamp, and a plain variant that
//! reads the injected [`Clock`].

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Instant;

/// Source of monotonic timestamps in milliseconds.
pub trait Clock {
    /// Current time in milliseconds. Must never decrease.
    fn now_ms(&self) -> u64;
}

impl<C: Clock + ?Sized> Clock for &C {
    fn now_ms(&self) -> u64 {
        (**self).now_ms()
    }
}

/// Milliseconds elapsed since the clock was created.
#[derive(Debug, Clone, Copy)]
pub struct SystemClock {
    origin: Instant,
}

impl SystemClock {
    /// Create a clock whose zero is the current instant.
    #[must_use]
    pub fn new() -> Self {
        Self {
            origin: Instant::now(),
        }
    }
}

impl Default for SystemClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for SystemClock {
    fn now_ms(&self) -> u64 {
        u64::try_from(self.origin.elapsed().as_millis()).unwrap_or(u64::MAX)
    }
}

/// Settable clock shared between clones.
///
/// Used for deterministic tests and for replaying recorded input traces.
/// Setting a time earlier than the current one is ignored so the clock stays
/// monotonic.
#[derive(Debug, Clone, Default)]
pub struct ManualClock {
    now: Arc<AtomicU64>,
}

impl ManualClock {
    /// Create a clock reading `start_ms`.
    #[must_use]
    pub fn new(start_ms: u64) -> Self {
        Self {
            now: Arc::new(AtomicU64::new(start_ms)),
        }
    }

    /// Move the clock forward to `now_ms`.
    pub fn set(&self, now_ms: u64) {
        self.now.fetch_max(now_ms, Ordering::AcqRel);
    }

    /// Advance the clock by `delta_ms` and return the new reading.
    pub fn advance(&self, delta_ms: u64) -> u64 {
        let previous = self
            .now
            .fetch_update(Ordering::AcqRel, Ordering::Acquire, |now| {
                Some(now.saturating_add(delta_ms))
            })
            .unwrap_or_else(|now| now);
        previous.saturating_add(delta_ms)
    }
}

impl Clock for ManualClock {
    fn now_ms(&self) -> u64 {
        self.now.load(Ordering::Acquire)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_manual_clock_shared_between_clones() {
        let clock = ManualClock::new(100);
        let other = clock.clone();

        clock.set(250);
        assert_eq!(other.now_ms(), 250);

        assert_eq!(other.advance(50), 300);
        assert_eq!(clock.now_ms(), 300);
    }

    #[test]
    fn test_manual_clock_never_goes_backwards() {
        let clock = ManualClock::new(1_000);
        clock.set(400);
        assert_eq!(clock.now_ms(), 1_000);
    }

    #[test]
    fn test_manual_clock_advance_saturates() {
        let clock = ManualClock::new(u64::MAX - 1);
        assert_eq!(clock.advance(10), u64::MAX);
    }

    #[test]
    fn test_system_clock_is_monotonic() {
        let clock = SystemClock::new();
        let first = clock.now_ms();
        let second = clock.now_ms();
        assert!(second >= first);
    }

    #[test]
    fn test_clock_by_reference() {
        fn read<C: Clock>(clock: C) -> u64 {
            clock.now_ms()
        }

        let clock = ManualClock::new(42);
        assert_eq!(read(&clock), 42);
    }
}
