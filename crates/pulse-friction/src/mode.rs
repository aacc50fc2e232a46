//! Feed presentation mode and the mode-switch capability.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Presentation mode of the feed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Mode {
    /// Native scrolling, friction disabled.
    #[default]
    Normal,
    /// Calmer presentation with damped scrolling.
    Cozy,
}

impl Mode {
    /// The other mode.
    #[must_use]
    pub fn toggle(self) -> Self {
        match self {
            Mode::Normal => Mode::Cozy,
            Mode::Cozy => Mode::Normal,
        }
    }

    /// Whether this is [`Mode::Cozy`].
    #[must_use]
    pub fn is_cozy(self) -> bool {
        matches!(self, Mode::Cozy)
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Mode::Normal => write!(f, "normal"),
            Mode::Cozy => write!(f, "cozy"),
        }
    }
}

/// Request to switch the UI into cozy mode.
///
/// Invoked by the controller when fatigue is detected. The owner decides how
/// the switch is rendered and reports the new mode back through
/// [`FrictionController::set_mode`](crate::FrictionController::set_mode).
pub type ModeSwitch = Box<dyn FnMut()>;
