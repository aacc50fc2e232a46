//! Error types for the kinetics crate.
//!
//! The tracker's runtime path never fails; these errors only surface when a
//! [`FatiguePolicy`](crate::FatiguePolicy) is validated.

use thiserror::Error;

/// Errors raised while configuring a tracker.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum KineticsError {
    /// A fatigue policy field is out of range.
    #[error("Invalid fatigue policy: {0}")]
    InvalidPolicy(String),
}

impl KineticsError {
    /// Create an invalid policy error.
    #[must_use]
    pub fn invalid_policy(reason: impl Into<String>) -> Self {
        Self::InvalidPolicy(reason.into())
    }
}

/// A specialized `Result` type for kinetics configuration.
pub type KineticsResult<T> = std::result::Result<T, KineticsError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = KineticsError::invalid_policy("window_ms must be greater than 0");
        assert!(err.to_string().contains("window_ms"));
        assert!(matches!(err, KineticsError::InvalidPolicy(_)));
    }
}
