//! Mock implementations for friction tests.

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use pulse_friction::ScrollSurface;
use pulse_kinetics::{Clock, ManualClock};

/// Scroll surface that records every `scroll_by` call.
///
/// Clones share state, so a test can keep a handle while the controller owns
/// another.
#[derive(Debug, Clone, Default)]
pub struct RecordingSurface {
    position: Rc<Cell<f64>>,
    scrolls: Rc<RefCell<Vec<f64>>>,
}

impl RecordingSurface {
    /// Create a surface scrolled to the top.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a surface scrolled to `position`.
    pub fn at(position: f64) -> Self {
        let surface = Self::new();
        surface.position.set(position);
        surface
    }

    /// Move the surface as native scrolling would, without recording a call.
    pub fn set_position(&self, position: f64) {
        self.position.set(position);
    }

    /// Current scroll offset.
    pub fn position(&self) -> f64 {
        self.position.get()
    }

    /// Every delta passed to `scroll_by`, in order.
    pub fn scrolls(&self) -> Vec<f64> {
        self.scrolls.borrow().clone()
    }

    /// Number of `scroll_by` calls.
    pub fn scroll_count(&self) -> usize {
        self.scrolls.borrow().len()
    }

    /// Most recent delta passed to `scroll_by`.
    pub fn last_scroll(&self) -> Option<f64> {
        self.scrolls.borrow().last().copied()
    }
}

impl ScrollSurface for RecordingSurface {
    fn scroll_position(&self) -> f64 {
        self.position.get()
    }

    fn scroll_by(&mut self, delta: f64) {
        self.position.set(self.position.get() + delta);
        self.scrolls.borrow_mut().push(delta);
    }
}

/// Counts mode-switch requests and records when they happened.
#[derive(Debug, Clone)]
pub struct ModeProbe {
    clock: ManualClock,
    requests: Rc<RefCell<Vec<u64>>>,
}

impl ModeProbe {
    /// Create a probe stamping requests with `clock`.
    pub fn new(clock: ManualClock) -> Self {
        Self {
            clock,
            requests: Rc::new(RefCell::new(Vec::new())),
        }
    }

    /// A mode-switch callback feeding this probe.
    pub fn callback(&self) -> impl FnMut() + 'static {
        let probe = self.clone();
        move || {
            let now = probe.clock.now_ms();
            probe.requests.borrow_mut().push(now);
        }
    }

    /// Number of requests received.
    pub fn count(&self) -> usize {
        self.requests.borrow().len()
    }

    /// Clock readings at each request.
    pub fn request_times(&self) -> Vec<u64> {
        self.requests.borrow().clone()
    }
}
