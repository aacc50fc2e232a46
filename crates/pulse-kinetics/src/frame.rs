//! Kinetic frames and the bounded frame buffer.

use std::collections::VecDeque;

use serde::{Deserialize, Serialize};

/// One derived scroll-motion sample.
///
/// Direction is discarded: both derivatives are stored as magnitudes, since
/// only speed matters for fatigue scoring.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct KineticFrame {
    /// Monotonic timestamp in milliseconds
    pub timestamp: u64,
    /// Absolute scroll offset in pixels
    pub scroll_position: f64,
    /// Speed in px/s (non-negative)
    pub velocity: f64,
    /// Magnitude of the change in speed in px/s² (non-negative)
    pub acceleration: f64,
}

/// Fixed-capacity ring of [`KineticFrame`]s, oldest first.
///
/// Pushing at capacity evicts the oldest frame. Frames are appended in
/// chronological order by the tracker; the buffer itself does not reorder.
#[derive(Debug, Clone)]
pub struct FrameBuffer {
    frames: VecDeque<KineticFrame>,
    capacity: usize,
}

impl FrameBuffer {
    /// Create an empty buffer holding at most `capacity` frames.
    ///
    /// A capacity of zero is raised to one.
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            frames: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    /// Append a frame, returning the evicted oldest frame if the buffer was full.
    pub fn push(&mut self, frame: KineticFrame) -> Option<KineticFrame> {
        let evicted = if self.frames.len() >= self.capacity {
            self.frames.pop_front()
        } else {
            None
        };
        self.frames.push_back(frame);
        evicted
    }

    /// Most recent frame.
    #[must_use]
    pub fn latest(&self) -> Option<&KineticFrame> {
        self.frames.back()
    }

    /// Oldest retained frame.
    #[must_use]
    pub fn oldest(&self) -> Option<&KineticFrame> {
        self.frames.front()
    }

    /// Iterate frames from oldest to newest.
    pub fn iter(&self) -> impl DoubleEndedIterator<Item = &KineticFrame> + ExactSizeIterator {
        self.frames.iter()
    }

    /// Number of retained frames.
    #[must_use]
    pub fn len(&self) -> usize {
        self.frames.len()
    }

    /// Whether no frames are retained.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    /// Whether the next push will evict a frame.
    #[must_use]
    pub fn is_full(&self) -> bool {
        self.frames.len() >= self.capacity
    }

    /// Maximum number of frames retained.
    #[must_use]
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Drop every frame.
    pub fn clear(&mut self) {
        self.frames.clear();
    }
}

impl Default for FrameBuffer {
    fn default() -> Self {
        Self::new(crate::policy::DEFAULT_BUFFER_CAPACITY)
    }
}
