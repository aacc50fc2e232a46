//! Dwell intervals: how long each feed element held the viewport.
//!
//! At most one interval is open at any instant. The open slot is an explicit
//! two-state machine ([`DwellState`]) so that "a new element replaced the old
//! one without an end signal" is a named transition, not a null check.

use serde::{Deserialize, Serialize};

use crate::within_window;

/// A span during which one element was the focused element in the viewport.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DwellInterval {
    /// Opaque element identifier supplied by the view layer
    pub element_id: String,
    /// Start time in milliseconds
    pub start_time: u64,
    /// End time in milliseconds; `None` while open
    pub end_time: Option<u64>,
    /// `end_time - start_time`; 0 while open
    pub duration: u64,
}

impl DwellInterval {
    /// Open a new interval at `start_time`.
    #[must_use]
    pub fn open(element_id: impl Into<String>, start_time: u64) -> Self {
        Self {
            element_id: element_id.into(),
            start_time,
            end_time: None,
            duration: 0,
        }
    }

    /// Close the interval at `end_time`.
    ///
    /// An end time before the start yields a zero duration.
    #[must_use]
    pub fn close(mut self, end_time: u64) -> Self {
        self.end_time = Some(end_time);
        self.duration = end_time.saturating_sub(self.start_time);
        self
    }

    /// Whether the interval has not been closed yet.
    #[must_use]
    pub fn is_open(&self) -> bool {
        self.end_time.is_none()
    }
}

/// The open-dwell slot.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum DwellState {
    /// No element is being dwelled on.
    #[default]
    Idle,
    /// An element entered the viewport and has not left yet.
    Tracking(DwellInterval),
}

impl DwellState {
    /// Start dwelling on `element_id`.
    ///
    /// If an interval is already open it is closed at `timestamp` and returned.
    pub fn begin(&mut self, element_id: impl Into<String>, timestamp: u64) -> Option<DwellInterval> {
        let previous = self.finish(timestamp);
        *self = DwellState::Tracking(DwellInterval::open(element_id, timestamp));
        previous
    }

    /// Close the open interval at `timestamp`, returning it. No-op when idle.
    pub fn finish(&mut self, timestamp: u64) -> Option<DwellInterval> {
        match std::mem::take(self) {
            DwellState::Idle => None,
            DwellState::Tracking(interval) => Some(interval.close(timestamp)),
        }
    }

    /// The open interval, if any.
    #[must_use]
    pub fn current(&self) -> Option<&DwellInterval> {
        match self {
            DwellState::Idle => None,
            DwellState::Tracking(interval) => Some(interval),
        }
    }

    /// Whether an interval is open.
    #[must_use]
    pub fn is_tracking(&self) -> bool {
        matches!(self, DwellState::Tracking(_))
    }
}

/// Closed dwell intervals retained over a trailing window.
///
/// Intervals whose start falls out of the window are evicted on every
/// [`retain`](Self::retain) call.
#[derive(Debug, Clone, Default)]
pub struct DwellHistory {
    intervals: Vec<DwellInterval>,
}

impl DwellHistory {
    /// Create an empty history.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Store a closed interval, then evict everything that started at or
    /// before `now - window_ms`.
    pub fn retain(&mut self, interval: DwellInterval, now: u64, window_ms: u64) {
        self.intervals.push(interval);
        self.intervals
            .retain(|d| within_window(d.start_time, now, window_ms));
    }

    /// Intervals that started inside the window ending at `now`.
    pub fn windowed(&self, now: u64, window_ms: u64) -> impl Iterator<Item = &DwellInterval> {
        self.intervals
            .iter()
            .filter(move |d| within_window(d.start_time, now, window_ms))
    }

    /// Mean duration in milliseconds of the windowed intervals, `None` when
    /// there are none.
    #[must_use]
    pub fn mean_duration(&self, now: u64, window_ms: u64) -> Option<f64> {
        let (count, total) = self
            .windowed(now, window_ms)
            .fold((0u64, 0u64), |(count, total), d| {
                (count.saturating_add(1), total.saturating_add(d.duration))
            });
        if count == 0 {
            None
        } else {
            Some(total as f64 / count as f64)
        }
    }

    /// All retained intervals, in insertion order.
    #[must_use]
    pub fn as_slice(&self) -> &[DwellInterval] {
        &self.intervals
    }

    /// Number of retained intervals.
    #[must_use]
    pub fn len(&self) -> usize {
        self.intervals.len()
    }

    /// Whether nothing is retained.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.intervals.is_empty()
    }

    /// Drop all retained intervals.
    pub fn clear(&mut self) {
        self.intervals.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_interval_close_sets_duration() {
        let interval = DwellInterval::open("post-1", 1_000).close(1_450);
        assert_eq!(interval.end_time, Some(1_450));
        assert_eq!(interval.duration, 450);
        assert!(!interval.is_open());
    }

    #[test]
    fn test_interval_close_before_start_is_zero() {
        let interval = DwellInterval::open("post-1", 1_000).close(900);
        assert_eq!(interval.duration, 0);
    }

    #[test]
    fn test_state_begin_from_idle() {
        let mut state = DwellState::Idle;
        assert!(state.begin("post-1", 100).is_none());
        assert!(state.is_tracking());
        assert_eq!(state.current().map(|d| d.start_time), Some(100));
    }

    #[test]
    fn test_state_begin_closes_previous_at_new_start() {
        let mut state = DwellState::Idle;
        state.begin("post-1", 100);

        let closed = state.begin("post-2", 350);
        let closed = closed.as_ref();
        assert_eq!(closed.map(|d| d.element_id.as_str()), Some("post-1"));
        assert_eq!(closed.and_then(|d| d.end_time), Some(350));
        assert_eq!(closed.map(|d| d.duration), Some(250));
        assert_eq!(
            state.current().map(|d| d.element_id.as_str()),
            Some("post-2")
        );
    }

    #[test]
    fn test_state_finish_when_idle_is_noop() {
        let mut state = DwellState::default();
        assert!(state.finish(500).is_none());
        assert_eq!(state, DwellState::Idle);
    }

    #[test]
    fn test_history_evicts_stale_intervals() {
        let mut history = DwellHistory::new();
        history.retain(DwellInterval::open("a", 1_000).close(1_200), 1_200, 3_000);
        history.retain(DwellInterval::open("b", 3_000).close(3_300), 3_300, 3_000);
        assert_eq!(history.len(), 2);

        // cutoff 5_000 - 3_000 = 2_000: "a" started before it
        history.retain(DwellInterval::open("c", 4_800).close(5_000), 5_000, 3_000);
        let ids: Vec<&str> = history
            .as_slice()
            .iter()
            .map(|d| d.element_id.as_str())
            .collect();
        assert_eq!(ids, vec!["b", "c"]);
    }

    #[test]
    fn test_history_mean_duration() {
        let mut history = DwellHistory::new();
        assert!(history.mean_duration(0, 3_000).is_none());

        history.retain(DwellInterval::open("a", 100).close(300), 300, 3_000);
        history.retain(DwellInterval::open("b", 300).close(700), 700, 3_000);

        let mean = history.mean_duration(700, 3_000).unwrap_or_default();
        assert!((mean - 300.0).abs() < f64::EPSILON);
    }
}
