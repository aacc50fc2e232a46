//! Prelude for pulse-friction.
//!
//! ```rust
//! use pulse_friction::prelude::*;
//!
//! let config = FrictionConfig::builder().cooldown_ms(5_000).build();
//! assert!(config.is_ok());
//! assert!(Mode::Normal.toggle().is_cozy());
//! ```

pub use crate::config::{FrictionConfig, FrictionConfigBuilder};
pub use crate::controller::{FrictionController, ScrollSurface};
pub use crate::error::{FrictionError, FrictionResult};
pub use crate::event::{Disposition, EventKind, InputEvent, TouchTarget};
pub use crate::hub::{EventHub, IntervalTimer, Subscription};
pub use crate::mode::{Mode, ModeSwitch};
pub use crate::session::FrictionSession;
