//! Prelude for pulse-kinetics.
//!
//! Re-exports the types needed to feed and query a tracker.
//!
//! # Example
//!
//! ```rust
//! use pulse_kinetics::prelude::*;
//!
//! let clock = ManualClock::new(0);
//! let mut tracker = KineticTracker::with_clock(clock.clone());
//!
//! clock.set(100);
//! tracker.record_scroll(120.0);
//! tracker.start_dwell("post-1");
//!
//! assert_eq!(tracker.frame_count(), 1);
//! assert!(!tracker.detect_fatigue());
//! ```

pub use crate::clock::{Clock, ManualClock, SystemClock};
pub use crate::dwell::{DwellInterval, DwellState};
pub use crate::error::{KineticsError, KineticsResult};
pub use crate::frame::KineticFrame;
pub use crate::policy::{FatiguePolicy, FatiguePolicyBuilder};
pub use crate::tracker::{KineticSnapshot, KineticTracker};
