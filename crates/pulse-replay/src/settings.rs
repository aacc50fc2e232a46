//! Replay settings file.
//!
//! ```json
//! {
//!   "friction": { "cooldown_ms": 5000 },
//!   "policy": { "window_ms": 4000 },
//!   "initial_mode": "normal",
//!   "follow_requests": true
//! }
//! ```
//!
//! Every field is optional.

use std::fs;
use std::path::Path;

use pulse_friction::{FrictionConfig, FrictionError, Mode};
use pulse_kinetics::FatiguePolicy;
use serde::{Deserialize, Serialize};

use crate::error::ReplayError;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReplaySettings {
    pub friction: FrictionConfig,
    pub policy: FatiguePolicy,
    pub initial_mode: Mode,
    /// Switch to cozy mode as soon as the controller requests it, as the
    /// feed UI does.
    pub follow_requests: bool,
}

impl Default for ReplaySettings {
    fn default() -> Self {
        Self {
            friction: FrictionConfig::default(),
            policy: FatiguePolicy::default(),
            initial_mode: Mode::Normal,
            follow_requests: true,
        }
    }
}

impl ReplaySettings {
    pub fn from_json(text: &str) -> Result<Self, ReplayError> {
        let settings: Self = serde_json::from_str(text).map_err(ReplayError::SettingsFormat)?;
        settings.validate()?;
        Ok(settings)
    }

    pub fn load(path: &Path) -> Result<Self, ReplayError> {
        let text = fs::read_to_string(path).map_err(|source| ReplayError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json(&text)
    }

    pub fn validate(&self) -> Result<(), ReplayError> {
        self.friction.validate()?;
        self.policy.validate().map_err(FrictionError::from)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    type TestResult = Result<(), Box<dyn std::error::Error>>;

    #[test]
    fn defaults_follow_requests() {
        let settings = ReplaySettings::default();
        assert!(settings.follow_requests);
        assert_eq!(settings.initial_mode, Mode::Normal);
    }

    #[test]
    fn partial_settings_fill_defaults() -> TestResult {
        let settings = ReplaySettings::from_json(
            r#"{ "friction": { "cooldown_ms": 2000 }, "initial_mode": "cozy" }"#,
        )?;
        assert_eq!(settings.friction.cooldown_ms, 2_000);
        assert_eq!(settings.friction.fatigue_check_interval_ms, 500);
        assert_eq!(settings.policy, FatiguePolicy::default());
        assert_eq!(settings.initial_mode, Mode::Cozy);
        Ok(())
    }

    #[test]
    fn invalid_values_rejected() {
        let result = ReplaySettings::from_json(r#"{ "policy": { "window_ms": 0 } }"#);
        assert!(matches!(
            result,
            Err(ReplayError::Settings(FrictionError::Kinetics(_)))
        ));

        let result = ReplaySettings::from_json(r#"{ "friction": { "base_friction_factor": 2.0 } }"#);
        assert!(matches!(
            result,
            Err(ReplayError::Settings(FrictionError::InvalidConfiguration(_)))
        ));
    }

    #[test]
    fn malformed_json_rejected() {
        let result = ReplaySettings::from_json("{ not json");
        assert!(matches!(result, Err(ReplayError::SettingsFormat(_))));
    }
}
