//! Convenience re-exports for common test utilities.
//!
//! ```rust,ignore
//! use pulse_test_helpers::prelude::*;
//! ```

pub use crate::must::{must, must_some, must_with};

#[cfg(feature = "mock")]
pub use crate::mock::{ModeProbe, RecordingSurface};

pub type TestResult = Result<(), Box<dyn std::error::Error>>;
