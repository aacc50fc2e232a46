//! Friction controller configuration.

use serde::{Deserialize, Serialize};

use crate::error::{FrictionError, FrictionResult};

/// Damping and scheduling parameters for [`FrictionController`](crate::FrictionController).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FrictionConfig {
    /// Fraction of each input delta applied in cozy mode.
    pub base_friction_factor: f64,
    /// Damped displacements smaller than this are dropped (px).
    pub min_scroll_distance: f64,
    /// Cumulative touch travel before a gesture is treated as scrolling (px).
    pub touch_scroll_threshold: f64,
    /// Period of the fatigue check (ms).
    pub fatigue_check_interval_ms: u64,
    /// Minimum time between automatic mode switches (ms).
    pub cooldown_ms: u64,
}

impl Default for FrictionConfig {
    fn default() -> Self {
        Self {
            base_friction_factor: 0.3,
            min_scroll_distance: 5.0,
            touch_scroll_threshold: 8.0,
            fatigue_check_interval_ms: 500,
            cooldown_ms: 10_000,
        }
    }
}

impl FrictionConfig {
    /// Validate the configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if any configuration values are invalid.
    pub fn validate(&self) -> FrictionResult<()> {
        if !(self.base_friction_factor > 0.0 && self.base_friction_factor <= 1.0) {
            return Err(FrictionError::invalid_configuration(format!(
                "base_friction_factor must be in (0, 1], got {}",
                self.base_friction_factor
            )));
        }
        if !self.min_scroll_distance.is_finite() || self.min_scroll_distance < 0.0 {
            return Err(FrictionError::invalid_configuration(format!(
                "min_scroll_distance must be finite and non-negative, got {}",
                self.min_scroll_distance
            )));
        }
        if !self.touch_scroll_threshold.is_finite() || self.touch_scroll_threshold < 0.0 {
            return Err(FrictionError::invalid_configuration(format!(
                "touch_scroll_threshold must be finite and non-negative, got {}",
                self.touch_scroll_threshold
            )));
        }
        if self.fatigue_check_interval_ms == 0 {
            return Err(FrictionError::invalid_configuration(
                "fatigue_check_interval_ms must be greater than 0",
            ));
        }
        Ok(())
    }

    /// Create a configuration builder.
    #[must_use]
    pub fn builder() -> FrictionConfigBuilder {
        FrictionConfigBuilder::default()
    }

    /// Damp a raw input delta.
    ///
    /// Returns `None` when the damped displacement falls under
    /// `min_scroll_distance`: such micro-movements are dropped entirely.
    #[must_use]
    pub fn damp(&self, raw_delta: f64, friction_multiplier: f64) -> Option<f64> {
        let delta = raw_delta * self.base_friction_factor * friction_multiplier;
        if !delta.is_finite() || delta.abs() < self.min_scroll_distance {
            None
        } else {
            Some(delta)
        }
    }
}

/// Builder for [`FrictionConfig`].
#[derive(Debug, Default)]
pub struct FrictionConfigBuilder {
    config: FrictionConfig,
}

impl FrictionConfigBuilder {
    /// Set the base friction factor.
    #[must_use]
    pub fn base_friction_factor(mut self, factor: f64) -> Self {
        self.config.base_friction_factor = factor;
        self
    }

    /// Set the minimum applied displacement in pixels.
    #[must_use]
    pub fn min_scroll_distance(mut self, px: f64) -> Self {
        self.config.min_scroll_distance = px;
        self
    }

    /// Set the touch activation threshold in pixels.
    #[must_use]
    pub fn touch_scroll_threshold(mut self, px: f64) -> Self {
        self.config.touch_scroll_threshold = px;
        self
    }

    /// Set the fatigue check period in milliseconds.
    #[must_use]
    pub fn fatigue_check_interval_ms(mut self, ms: u64) -> Self {
        self.config.fatigue_check_interval_ms = ms;
        self
    }

    /// Set the auto-switch cooldown in milliseconds.
    #[must_use]
    pub fn cooldown_ms(mut self, ms: u64) -> Self {
        self.config.cooldown_ms = ms;
        self
    }

    /// Build the configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration is invalid.
    pub fn build(self) -> FrictionResult<FrictionConfig> {
        self.config.validate()?;
        Ok(self.config)
    }
}
