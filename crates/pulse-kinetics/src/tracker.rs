//! The kinetic signal tracker.
//!
//! Owns the frame buffer, the dwell slot and the dwell history, and computes
//! the fatigue classification from them.
//!
//! # Fatigue rule
//!
//! Evaluated as a short-circuiting conjunction:
//!
//! 1. At least `min_sustained_frames` frames in total and inside the window.
//! 2. Mean windowed velocity ≥ `avg_velocity_threshold`.
//! 3. At least `sustained_ratio` of windowed frames above
//!    `peak_velocity_threshold`.
//! 4. Without windowed dwell evidence: at least `no_dwell_min_frames` windowed
//!    frames and mean velocity above `avg_velocity_threshold ×
//!    no_dwell_velocity_factor`.
//! 5. With dwell evidence: mean windowed dwell below `min_dwell_ms`.
//!
//! Velocity alone misfires on deliberate catch-up scrolling, and dwell alone
//! is noisy with sparse sampling; the rule needs both.

use serde::{Deserialize, Serialize};
use tracing::trace;

use crate::clock::{Clock, SystemClock};
use crate::dwell::{DwellHistory, DwellInterval, DwellState};
use crate::error::KineticsResult;
use crate::frame::{FrameBuffer, KineticFrame};
use crate::policy::FatiguePolicy;
use crate::within_window;

/// Aggregates over the frames inside the trailing window.
#[derive(Debug, Clone, Copy)]
struct WindowStats {
    count: usize,
    mean_velocity: f64,
    high_velocity_ratio: f64,
}

/// Point-in-time view of the tracker, for diagnostics and logging.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KineticSnapshot {
    /// Time the snapshot was taken (ms)
    pub at: u64,
    /// Frames in the ring buffer
    pub frame_count: usize,
    /// Frames inside the trailing window
    pub windowed_frames: usize,
    /// Mean windowed velocity (px/s)
    pub average_velocity: f64,
    /// Latest velocity over mean dwell seconds
    pub attention_density_ratio: f64,
    /// Mean windowed dwell duration (ms), if any dwell was recorded
    pub mean_dwell_ms: Option<f64>,
    /// Whether an element is currently being dwelled on
    pub dwelling: bool,
    /// Fatigue classification
    pub fatigued: bool,
    /// Friction multiplier derived from the classification
    pub friction_multiplier: f64,
}

/// Scroll kinetics and dwell tracker.
///
/// Constructed once per session and [`reset`](Self::reset) rather than
/// recreated. Exactly one owner writes to it.
#[derive(Debug)]
pub struct KineticTracker<C: Clock = SystemClock> {
    policy: FatiguePolicy,
    clock: C,
    frames: FrameBuffer,
    dwell: DwellState,
    dwell_history: DwellHistory,
    last_position: f64,
    last_timestamp: u64,
}

impl KineticTracker<SystemClock> {
    /// Create a tracker with the default policy on the system clock.
    #[must_use]
    pub fn new() -> Self {
        Self::with_clock(SystemClock::new())
    }
}

impl Default for KineticTracker<SystemClock> {
    fn default() -> Self {
        Self::new()
    }
}

impl<C: Clock> KineticTracker<C> {
    /// Create a tracker with the default policy reading time from `clock`.
    #[must_use]
    pub fn with_clock(clock: C) -> Self {
        Self::build(FatiguePolicy::default(), clock)
    }

    /// Create a tracker with a custom policy.
    ///
    /// # Errors
    ///
    /// Returns an error if the policy fails validation.
    pub fn with_policy(policy: FatiguePolicy, clock: C) -> KineticsResult<Self> {
        policy.validate()?;
        Ok(Self::build(policy, clock))
    }

    fn build(policy: FatiguePolicy, clock: C) -> Self {
        let last_timestamp = clock.now_ms();
        Self {
            frames: FrameBuffer::new(policy.buffer_capacity),
            policy,
            clock,
            dwell: DwellState::Idle,
            dwell_history: DwellHistory::new(),
            last_position: 0.0,
            last_timestamp,
        }
    }

    /// The active policy.
    #[must_use]
    pub fn policy(&self) -> &FatiguePolicy {
        &self.policy
    }

    /// The injected clock.
    #[must_use]
    pub fn clock(&self) -> &C {
        &self.clock
    }

    /// Current clock reading.
    #[must_use]
    pub fn now_ms(&self) -> u64 {
        self.clock.now_ms()
    }

    // ── Recording ────────────────────────────────────────────────────────

    /// Record a scroll position at the current clock time.
    pub fn record_scroll(&mut self, position: f64) {
        let now = self.clock.now_ms();
        self.record_scroll_at(position, now);
    }

    /// Record a scroll position observed at `timestamp`.
    ///
    /// Samples with zero elapsed time, an earlier timestamp than the previous
    /// sample, or a non-finite position are dropped.
    pub fn record_scroll_at(&mut self, position: f64, timestamp: u64) {
        if timestamp <= self.last_timestamp {
            trace!(
                timestamp,
                last_timestamp = self.last_timestamp,
                "dropping scroll sample without forward progress"
            );
            return;
        }
        if !position.is_finite() {
            trace!(timestamp, "dropping non-finite scroll position");
            return;
        }

        let delta_time = timestamp.saturating_sub(self.last_timestamp);
        let delta_position = position - self.last_position;
        let velocity = delta_position / delta_time as f64 * 1000.0;
        let acceleration = self.acceleration_from(velocity, timestamp);

        let evicted = self.frames.push(KineticFrame {
            timestamp,
            scroll_position: position,
            velocity: velocity.abs(),
            acceleration: acceleration.abs(),
        });
        if let Some(old) = evicted {
            trace!(evicted_timestamp = old.timestamp, "frame buffer full");
        }

        self.last_position = position;
        self.last_timestamp = timestamp;
    }

    /// Change in speed against the previous frame, in px/s².
    fn acceleration_from(&self, velocity: f64, timestamp: u64) -> f64 {
        let Some(previous) = self.frames.latest() else {
            return 0.0;
        };
        let delta_secs = timestamp.saturating_sub(previous.timestamp) as f64 / 1000.0;
        if delta_secs <= 0.0 {
            return 0.0;
        }
        (velocity.abs() - previous.velocity) / delta_secs
    }

    /// Start dwelling on `element_id` at the current clock time.
    pub fn start_dwell(&mut self, element_id: impl Into<String>) {
        let now = self.clock.now_ms();
        self.start_dwell_at(element_id, now);
    }

    /// Start dwelling on `element_id` at `timestamp`.
    ///
    /// An interval that is still open is closed at `timestamp` first: the new
    /// element replaced it in the viewport without an explicit end signal.
    pub fn start_dwell_at(&mut self, element_id: impl Into<String>, timestamp: u64) {
        if let Some(closed) = self.dwell.begin(element_id, timestamp) {
            self.dwell_history
                .retain(closed, timestamp, self.policy.window_ms);
        }
    }

    /// Close the open dwell interval at the current clock time.
    pub fn end_dwell(&mut self) {
        let now = self.clock.now_ms();
        self.end_dwell_at(now);
    }

    /// Close the open dwell interval at `timestamp`. No-op when none is open.
    pub fn end_dwell_at(&mut self, timestamp: u64) {
        if let Some(closed) = self.dwell.finish(timestamp) {
            self.dwell_history
                .retain(closed, timestamp, self.policy.window_ms);
        }
    }

    // ── Queries ──────────────────────────────────────────────────────────

    fn window_stats(&self, now: u64) -> Option<WindowStats> {
        let window = self.policy.window_ms;
        let peak = self.policy.peak_velocity_threshold;

        let (count, sum, high) = self
            .frames
            .iter()
            .filter(|f| within_window(f.timestamp, now, window))
            .fold((0usize, 0.0f64, 0usize), |(count, sum, high), f| {
                (
                    count.saturating_add(1),
                    sum + f.velocity,
                    if f.velocity > peak {
                        high.saturating_add(1)
                    } else {
                        high
                    },
                )
            });

        if count == 0 {
            return None;
        }
        Some(WindowStats {
            count,
            mean_velocity: sum / count as f64,
            high_velocity_ratio: high as f64 / count as f64,
        })
    }

    /// Ratio of current velocity (px/s) to mean dwell time (s).
    #[must_use]
    pub fn attention_density_ratio(&self) -> f64 {
        self.attention_density_ratio_at(self.clock.now_ms())
    }

    /// [`attention_density_ratio`](Self::attention_density_ratio) evaluated at `now`.
    ///
    /// Without frames the ratio is 0. Without windowed dwell data, or with a
    /// zero mean dwell, the minimum dwell time stands in for the denominator,
    /// so scrolling with no engagement reads as maximally fatigue-indicative.
    #[must_use]
    pub fn attention_density_ratio_at(&self, now: u64) -> f64 {
        let Some(latest) = self.frames.latest() else {
            return 0.0;
        };
        let mean_dwell_secs = self
            .dwell_history
            .mean_duration(now, self.policy.window_ms)
            .filter(|mean| *mean > 0.0)
            .map_or(self.policy.min_dwell_secs(), |mean| mean / 1000.0);
        latest.velocity / mean_dwell_secs
    }

    /// Whether current behaviour looks like disengaged, high-velocity browsing.
    #[must_use]
    pub fn detect_fatigue(&self) -> bool {
        self.detect_fatigue_at(self.clock.now_ms())
    }

    /// [`detect_fatigue`](Self::detect_fatigue) evaluated at `now`.
    #[must_use]
    pub fn detect_fatigue_at(&self, now: u64) -> bool {
        let policy = &self.policy;

        if self.frames.len() < policy.min_sustained_frames {
            return false;
        }
        let Some(stats) = self.window_stats(now) else {
            return false;
        };
        if stats.count < policy.min_sustained_frames {
            return false;
        }
        if stats.mean_velocity < policy.avg_velocity_threshold {
            return false;
        }
        if stats.high_velocity_ratio < policy.sustained_ratio {
            return false;
        }

        match self.dwell_history.mean_duration(now, policy.window_ms) {
            None => {
                stats.count >= policy.no_dwell_min_frames
                    && stats.mean_velocity
                        > policy.avg_velocity_threshold * policy.no_dwell_velocity_factor
            }
            Some(mean_dwell) => mean_dwell < policy.min_dwell_ms as f64,
        }
    }

    /// Friction multiplier: the policy's fatigue multiplier while fatigued,
    /// otherwise 1.0.
    #[must_use]
    pub fn friction_multiplier(&self) -> f64 {
        self.friction_multiplier_at(self.clock.now_ms())
    }

    /// [`friction_multiplier`](Self::friction_multiplier) evaluated at `now`.
    #[must_use]
    pub fn friction_multiplier_at(&self, now: u64) -> f64 {
        if self.detect_fatigue_at(now) {
            self.policy.fatigue_multiplier
        } else {
            1.0
        }
    }

    /// Mean velocity over the trailing window, or 0 without windowed frames.
    #[must_use]
    pub fn average_velocity(&self) -> f64 {
        self.average_velocity_at(self.clock.now_ms())
    }

    /// [`average_velocity`](Self::average_velocity) evaluated at `now`.
    #[must_use]
    pub fn average_velocity_at(&self, now: u64) -> f64 {
        self.window_stats(now).map_or(0.0, |s| s.mean_velocity)
    }

    /// Capture a diagnostic snapshot at the current clock time.
    #[must_use]
    pub fn snapshot(&self) -> KineticSnapshot {
        self.snapshot_at(self.clock.now_ms())
    }

    /// Capture a diagnostic snapshot at `now`.
    #[must_use]
    pub fn snapshot_at(&self, now: u64) -> KineticSnapshot {
        let stats = self.window_stats(now);
        KineticSnapshot {
            at: now,
            frame_count: self.frames.len(),
            windowed_frames: stats.map_or(0, |s| s.count),
            average_velocity: stats.map_or(0.0, |s| s.mean_velocity),
            attention_density_ratio: self.attention_density_ratio_at(now),
            mean_dwell_ms: self
                .dwell_history
                .mean_duration(now, self.policy.window_ms),
            dwelling: self.dwell.is_tracking(),
            fatigued: self.detect_fatigue_at(now),
            friction_multiplier: self.friction_multiplier_at(now),
        }
    }

    // ── Inspection ───────────────────────────────────────────────────────

    /// Frames from oldest to newest.
    pub fn frames(&self) -> impl DoubleEndedIterator<Item = &KineticFrame> + ExactSizeIterator {
        self.frames.iter()
    }

    /// Number of frames in the buffer.
    #[must_use]
    pub fn frame_count(&self) -> usize {
        self.frames.len()
    }

    /// Most recent frame.
    #[must_use]
    pub fn latest_frame(&self) -> Option<&KineticFrame> {
        self.frames.latest()
    }

    /// Retained closed dwell intervals.
    #[must_use]
    pub fn dwell_history(&self) -> &[DwellInterval] {
        self.dwell_history.as_slice()
    }

    /// The open-dwell slot.
    #[must_use]
    pub fn dwell_state(&self) -> &DwellState {
        &self.dwell
    }

    /// Clear frames, dwell history and the open dwell; re-anchor the position
    /// baseline at 0 and the current clock time.
    pub fn reset(&mut self) {
        self.frames.clear();
        self.dwell_history.clear();
        self.dwell = DwellState::Idle;
        self.last_position = 0.0;
        self.last_timestamp = self.clock.now_ms();
    }
}
