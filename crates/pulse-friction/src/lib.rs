//! Adaptive scroll friction for the Pulse feed
//!
//! This crate bridges host input to [`pulse_kinetics`]:
//! - **Controller**: forwards scroll and dwell signals to the tracker, damps
//!   wheel and touch scrolling in cozy mode, and requests cozy mode when the
//!   tracker reports fatigue
//! - **Hub**: a single-threaded listener registry with interval timers,
//!   standing in for the host's event loop
//! - **Session**: the set of registrations made by one activation, released
//!   together on teardown
//!
//! # Example
//!
//! ```
//! use std::cell::Cell;
//! use std::rc::Rc;
//!
//! use pulse_friction::prelude::*;
//! use pulse_kinetics::{KineticTracker, ManualClock};
//!
//! struct Page(f64);
//!
//! impl ScrollSurface for Page {
//!     fn scroll_position(&self) -> f64 { self.0 }
//!     fn scroll_by(&mut self, delta: f64) { self.0 += delta; }
//! }
//!
//! # fn main() -> Result<(), FrictionError> {
//! let clock = ManualClock::new(0);
//! let requested = Rc::new(Cell::new(false));
//! let flag = Rc::clone(&requested);
//!
//! let controller = FrictionController::new(
//!     FrictionConfig::default(),
//!     KineticTracker::with_clock(clock.clone()),
//!     Page(0.0),
//!     move || flag.set(true),
//! )?;
//!
//! let hub = EventHub::new();
//! let session = controller.activate(&hub);
//!
//! // a second of 1800 px/s scrolling with no dwell
//! for step in 1..=10u64 {
//!     clock.set(step * 100);
//!     hub.advance_to(step * 100);
//!     hub.dispatch(&InputEvent::Scroll { position: step as f64 * 180.0 });
//! }
//! clock.set(1_500);
//! hub.advance_to(1_500);
//! assert!(requested.get());
//!
//! session.teardown();
//! assert_eq!(hub.listener_count(), 0);
//! # Ok(())
//! # }
//! ```

#![deny(unsafe_op_in_unsafe_fn, clippy::unwrap_used)]
#![deny(unused_must_use)]
#![warn(missing_docs)]
#![warn(missing_debug_implementations)]
#![cfg_attr(docsrs, feature(doc_cfg))]

pub mod config;
pub mod controller;
pub mod error;
pub mod event;
pub mod gesture;
pub mod hub;
pub mod mode;
pub mod prelude;
pub mod session;

pub use config::{FrictionConfig, FrictionConfigBuilder};
pub use controller::{FrictionController, ScrollSurface};
pub use error::{FrictionError, FrictionResult};
pub use event::{Disposition, EventKind, InputEvent, TouchTarget};
pub use gesture::TouchGesture;
pub use hub::{EventHub, IntervalTimer, Subscription};
pub use mode::{Mode, ModeSwitch};
pub use session::FrictionSession;
