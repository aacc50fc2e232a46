//! Input events and handler dispositions.
//!
//! Events are plain values: the host translates platform input into
//! [`InputEvent`]s and feeds them to the [`EventHub`](crate::EventHub) or
//! directly to [`FrictionController::handle`](crate::FrictionController::handle).

use std::fmt;

use serde::{Deserialize, Serialize};

/// Classification of the element a touch gesture started on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TouchTarget {
    /// Ordinary feed content.
    #[default]
    Content,
    /// A button element.
    Button,
    /// A link with a destination.
    Link,
    /// An input, select or textarea.
    FormControl,
    /// Any element with a button role.
    RoleButton,
}

impl TouchTarget {
    /// Whether gestures starting here must be left to native handling.
    #[must_use]
    pub fn is_interactive(self) -> bool {
        !matches!(self, TouchTarget::Content)
    }
}

/// An input event relevant to scroll friction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum InputEvent {
    /// The scroll position changed by any means.
    Scroll {
        /// New absolute scroll offset (px)
        position: f64,
    },
    /// A wheel tick.
    Wheel {
        /// Vertical delta (px), positive scrolls down
        delta_y: f64,
    },
    /// A touch began.
    TouchStart {
        /// Number of active touch points
        touches: u32,
        /// Vertical coordinate of the first touch (px)
        y: f64,
        /// Element the touch started on
        #[serde(default)]
        target: TouchTarget,
    },
    /// A touch moved.
    TouchMove {
        /// Number of active touch points
        touches: u32,
        /// Vertical coordinate of the first touch (px)
        y: f64,
    },
    /// The touch ended.
    TouchEnd,
    /// The touch was cancelled by the platform.
    TouchCancel,
    /// A feed element became the focused element in the viewport.
    DwellStart {
        /// Element identifier
        element_id: String,
        /// Event time (ms)
        timestamp: u64,
    },
    /// The focused element left the viewport.
    DwellEnd {
        /// Element identifier
        element_id: String,
        /// Duration measured by the emitter (ms); informational only
        #[serde(default)]
        duration: u64,
        /// Event time (ms)
        timestamp: u64,
    },
}

impl InputEvent {
    /// The event's kind, used for subscription routing.
    #[must_use]
    pub fn kind(&self) -> EventKind {
        match self {
            InputEvent::Scroll { .. } => EventKind::Scroll,
            InputEvent::Wheel { .. } => EventKind::Wheel,
            InputEvent::TouchStart { .. } => EventKind::TouchStart,
            InputEvent::TouchMove { .. } => EventKind::TouchMove,
            InputEvent::TouchEnd => EventKind::TouchEnd,
            InputEvent::TouchCancel => EventKind::TouchCancel,
            InputEvent::DwellStart { .. } => EventKind::DwellStart,
            InputEvent::DwellEnd { .. } => EventKind::DwellEnd,
        }
    }
}

/// Discriminant of [`InputEvent`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventKind {
    /// [`InputEvent::Scroll`]
    Scroll,
    /// [`InputEvent::Wheel`]
    Wheel,
    /// [`InputEvent::TouchStart`]
    TouchStart,
    /// [`InputEvent::TouchMove`]
    TouchMove,
    /// [`InputEvent::TouchEnd`]
    TouchEnd,
    /// [`InputEvent::TouchCancel`]
    TouchCancel,
    /// [`InputEvent::DwellStart`]
    DwellStart,
    /// [`InputEvent::DwellEnd`]
    DwellEnd,
}

impl EventKind {
    /// Every event kind, in declaration order.
    pub const ALL: [EventKind; 8] = [
        EventKind::Scroll,
        EventKind::Wheel,
        EventKind::TouchStart,
        EventKind::TouchMove,
        EventKind::TouchEnd,
        EventKind::TouchCancel,
        EventKind::DwellStart,
        EventKind::DwellEnd,
    ];

    /// Stable snake_case name, matching the serialized form.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            EventKind::Scroll => "scroll",
            EventKind::Wheel => "wheel",
            EventKind::TouchStart => "touch_start",
            EventKind::TouchMove => "touch_move",
            EventKind::TouchEnd => "touch_end",
            EventKind::TouchCancel => "touch_cancel",
            EventKind::DwellStart => "dwell_start",
            EventKind::DwellEnd => "dwell_end",
        }
    }
}

impl fmt::Display for EventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// What a handler did with an event.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
#[serde(tag = "disposition", rename_all = "snake_case")]
pub enum Disposition {
    /// The platform default proceeds.
    #[default]
    PassThrough,
    /// The default was prevented and nothing was applied.
    Suppressed,
    /// The default was prevented and a damped scroll was issued.
    Applied {
        /// Displacement passed to the surface (px)
        delta: f64,
    },
}

impl Disposition {
    /// Whether the platform default must be prevented.
    #[must_use]
    pub fn default_prevented(self) -> bool {
        !matches!(self, Disposition::PassThrough)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    type TestResult = Result<(), Box<dyn std::error::Error>>;

    #[test]
    fn test_interactive_targets() {
        assert!(!TouchTarget::Content.is_interactive());
        assert!(TouchTarget::Button.is_interactive());
        assert!(TouchTarget::Link.is_interactive());
        assert!(TouchTarget::FormControl.is_interactive());
        assert!(TouchTarget::RoleButton.is_interactive());
    }

    #[test]
    fn test_event_kinds_are_distinct() {
        let kinds: std::collections::HashSet<EventKind> = EventKind::ALL.into_iter().collect();
        assert_eq!(kinds.len(), 8);
        assert_eq!(EventKind::TouchStart.to_string(), "touch_start");
        assert_eq!(InputEvent::TouchEnd.kind(), EventKind::TouchEnd);
        assert_eq!(InputEvent::Wheel { delta_y: 1.0 }.kind(), EventKind::Wheel);
    }

    #[test]
    fn test_event_json_shape() -> TestResult {
        let event: InputEvent =
            serde_json::from_str(r#"{ "type": "touch_start", "touches": 1, "y": 400.0 }"#)?;
        assert_eq!(
            event,
            InputEvent::TouchStart {
                touches: 1,
                y: 400.0,
                target: TouchTarget::Content,
            }
        );

        let event: InputEvent = serde_json::from_str(
            r#"{ "type": "dwell_end", "element_id": "post-7", "timestamp": 1200 }"#,
        )?;
        assert_eq!(event.kind(), EventKind::DwellEnd);

        let json = serde_json::to_value(InputEvent::Wheel { delta_y: -30.0 })?;
        assert_eq!(json["type"], "wheel");

        for kind in EventKind::ALL {
            assert_eq!(serde_json::to_value(kind)?, kind.as_str());
        }
        Ok(())
    }

    #[test]
    fn test_disposition_prevents_default() {
        assert!(!Disposition::PassThrough.default_prevented());
        assert!(Disposition::Suppressed.default_prevented());
        assert!(Disposition::Applied { delta: 30.0 }.default_prevented());
    }
}
