//! Scroll kinetics and fatigue detection for the Pulse feed
//!
//! This crate owns every piece of time-series state the adaptive friction
//! layer relies on:
//! - **Frames**: scroll-position samples with derived velocity and acceleration,
//!   held in a fixed-capacity ring buffer
//! - **Dwell**: intervals during which a single feed element held the viewport,
//!   retained over a trailing window
//! - **Fatigue**: a hand-tuned rule set combining sustained velocity with
//!   absent or collapsed dwell time
//!
//! The tracker has no knowledge of input events, UI mode or rendering. It is
//! fed by the friction controller and answers pure queries about its buffers.
//!
//! # Degradation
//!
//! Samples come from an untrusted, high-frequency event stream. Zero elapsed
//! time, out-of-order timestamps and non-finite positions are dropped rather
//! than reported; queries over empty history return neutral values.
//!
//! # Example
//!
//! ```
//! use pulse_kinetics::prelude::*;
//!
//! let clock = ManualClock::new(0);
//! let mut tracker = KineticTracker::with_clock(clock.clone());
//!
//! // 1800 px/s for one second, no content engagement
//! for step in 1..=10u64 {
//!     tracker.record_scroll_at(step as f64 * 180.0, step * 100);
//! }
//! clock.set(1_000);
//!
//! assert!(tracker.detect_fatigue());
//! assert!((tracker.friction_multiplier() - 1.5).abs() < f64::EPSILON);
//! ```

#![deny(unsafe_op_in_unsafe_fn, clippy::unwrap_used)]
#![deny(unused_must_use)]
#![warn(missing_docs)]
#![warn(missing_debug_implementations)]
#![cfg_attr(docsrs, feature(doc_cfg))]

pub mod clock;
pub mod dwell;
pub mod error;
pub mod frame;
pub mod policy;
pub mod prelude;
pub mod tracker;

pub use clock::{Clock, ManualClock, SystemClock};
pub use dwell::{DwellHistory, DwellInterval, DwellState};
pub use error::{KineticsError, KineticsResult};
pub use frame::{FrameBuffer, KineticFrame};
pub use policy::{FatiguePolicy, FatiguePolicyBuilder};
pub use tracker::{KineticSnapshot, KineticTracker};

/// Whether `timestamp` falls inside the trailing window ending at `now`.
///
/// Equivalent to `timestamp > now - window_ms` without underflow when `now`
/// is smaller than the window.
#[inline]
#[must_use]
pub fn within_window(timestamp: u64, now: u64, window_ms: u64) -> bool {
    timestamp.saturating_add(window_ms) > now
}
