//! Error types for the friction crate.

use pulse_kinetics::KineticsError;
use thiserror::Error;

/// Errors raised while building a friction controller.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum FrictionError {
    /// A friction configuration field is out of range.
    #[error("Invalid friction configuration: {0}")]
    InvalidConfiguration(String),

    /// The underlying tracker rejected its policy.
    #[error(transparent)]
    Kinetics(#[from] KineticsError),
}

impl FrictionError {
    /// Create an invalid configuration error.
    #[must_use]
    pub fn invalid_configuration(reason: impl Into<String>) -> Self {
        Self::InvalidConfiguration(reason.into())
    }
}

/// A specialized `Result` type for friction configuration.
pub type FrictionResult<T> = std::result::Result<T, FrictionError>;
