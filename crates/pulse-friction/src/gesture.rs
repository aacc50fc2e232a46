//! Per-gesture touch context.
//!
//! A [`TouchGesture`] lives from a single-finger touch-start to the matching
//! end or cancel. Whether the gesture may be captured is decided once, from
//! the start target, and never re-evaluated: a finger sliding over a link
//! mid-gesture must not flip between damped and native scrolling.

use crate::event::TouchTarget;

/// State of one touch gesture.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TouchGesture {
    captured: bool,
    start_y: f64,
    last_y: f64,
    scrolling: bool,
}

impl TouchGesture {
    /// Begin a gesture at `y` on `target`.
    #[must_use]
    pub fn begin(target: TouchTarget, y: f64) -> Self {
        Self {
            captured: !target.is_interactive(),
            start_y: y,
            last_y: y,
            scrolling: false,
        }
    }

    /// Feed a move to `y`, returning the synthetic scroll delta once the
    /// gesture is an active scroll.
    ///
    /// The delta is `previous_y - y`: finger up is positive and scrolls down.
    /// Until cumulative travel from the start point reaches `threshold` the
    /// move is treated as part of a tap and `None` is returned. Excluded
    /// gestures always return `None`.
    pub fn track(&mut self, y: f64, threshold: f64) -> Option<f64> {
        if !self.captured || !y.is_finite() {
            return None;
        }

        let delta = self.last_y - y;
        self.last_y = y;

        if !self.scrolling {
            if (self.start_y - y).abs() < threshold {
                return None;
            }
            self.scrolling = true;
        }
        Some(delta)
    }

    /// Whether the gesture started on content and may be captured.
    #[must_use]
    pub fn is_captured(&self) -> bool {
        self.captured
    }

    /// Whether the gesture has crossed the activation threshold.
    #[must_use]
    pub fn is_scrolling(&self) -> bool {
        self.scrolling
    }

    /// Vertical coordinate of the most recent tracked move.
    #[must_use]
    pub fn last_y(&self) -> f64 {
        self.last_y
    }
}
