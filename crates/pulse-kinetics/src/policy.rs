//! Fatigue heuristic thresholds.
//!
//! The constants were tuned by hand to avoid false positives from brief
//! flicks; none of them has a derivation beyond that. They are exposed as a
//! policy value so hosts can retune them without touching the tracker.

use serde::{Deserialize, Serialize};

use crate::error::{KineticsError, KineticsResult};

/// Default number of frames kept in the ring buffer.
pub const DEFAULT_BUFFER_CAPACITY: usize = 30;

/// Default trailing window for frames and dwell intervals.
pub const DEFAULT_WINDOW_MS: u64 = 3_000;

/// Thresholds and sizes driving [`KineticTracker`](crate::KineticTracker).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FatiguePolicy {
    /// Frames kept in the ring buffer.
    pub buffer_capacity: usize,
    /// Trailing window over which frames and dwell intervals count (ms).
    pub window_ms: u64,
    /// Per-frame velocity a frame must exceed to count as high speed (px/s).
    pub peak_velocity_threshold: f64,
    /// Minimum mean windowed velocity for fatigue (px/s).
    pub avg_velocity_threshold: f64,
    /// Mean dwell below this indicates disengagement (ms). Also the
    /// denominator floor for the attention-density ratio.
    pub min_dwell_ms: u64,
    /// Frames required, both in total and inside the window.
    pub min_sustained_frames: usize,
    /// Fraction of windowed frames that must be high speed.
    pub sustained_ratio: f64,
    /// Windowed frames required when no dwell evidence exists.
    pub no_dwell_min_frames: usize,
    /// Mean velocity must exceed `avg_velocity_threshold` times this factor
    /// when no dwell evidence exists.
    pub no_dwell_velocity_factor: f64,
    /// Friction multiplier reported while fatigued.
    pub fatigue_multiplier: f64,
}

impl Default for FatiguePolicy {
    fn default() -> Self {
        Self {
            buffer_capacity: DEFAULT_BUFFER_CAPACITY,
            window_ms: DEFAULT_WINDOW_MS,
            peak_velocity_threshold: 1500.0,
            avg_velocity_threshold: 1200.0,
            min_dwell_ms: 500,
            min_sustained_frames: 5,
            sustained_ratio: 0.6,
            no_dwell_min_frames: 10,
            no_dwell_velocity_factor: 1.2,
            fatigue_multiplier: 1.5,
        }
    }
}

impl FatiguePolicy {
    /// Validate the policy.
    ///
    /// # Errors
    ///
    /// Returns [`KineticsError::InvalidPolicy`] if any field is out of range.
    pub fn validate(&self) -> KineticsResult<()> {
        if self.buffer_capacity == 0 {
            return Err(KineticsError::invalid_policy(
                "buffer_capacity must be greater than 0",
            ));
        }
        if self.window_ms == 0 {
            return Err(KineticsError::invalid_policy(
                "window_ms must be greater than 0",
            ));
        }
        if self.min_dwell_ms == 0 {
            return Err(KineticsError::invalid_policy(
                "min_dwell_ms must be greater than 0",
            ));
        }
        for (name, value) in [
            ("peak_velocity_threshold", self.peak_velocity_threshold),
            ("avg_velocity_threshold", self.avg_velocity_threshold),
            ("no_dwell_velocity_factor", self.no_dwell_velocity_factor),
        ] {
            if !value.is_finite() || value < 0.0 {
                return Err(KineticsError::invalid_policy(format!(
                    "{name} must be finite and non-negative, got {value}"
                )));
            }
        }
        if !(self.sustained_ratio > 0.0 && self.sustained_ratio <= 1.0) {
            return Err(KineticsError::invalid_policy(format!(
                "sustained_ratio must be in (0, 1], got {}",
                self.sustained_ratio
            )));
        }
        if !self.fatigue_multiplier.is_finite() || self.fatigue_multiplier < 1.0 {
            return Err(KineticsError::invalid_policy(format!(
                "fatigue_multiplier must be finite and at least 1.0, got {}",
                self.fatigue_multiplier
            )));
        }
        if self.min_sustained_frames > self.buffer_capacity {
            return Err(KineticsError::invalid_policy(format!(
                "min_sustained_frames ({}) cannot exceed buffer_capacity ({})",
                self.min_sustained_frames, self.buffer_capacity
            )));
        }
        Ok(())
    }

    /// Create a policy builder starting from the defaults.
    #[must_use]
    pub fn builder() -> FatiguePolicyBuilder {
        FatiguePolicyBuilder::default()
    }

    /// `min_dwell_ms` in seconds.
    #[must_use]
    pub fn min_dwell_secs(&self) -> f64 {
        self.min_dwell_ms as f64 / 1000.0
    }
}

/// Builder for [`FatiguePolicy`].
#[derive(Debug, Default)]
pub struct FatiguePolicyBuilder {
    policy: FatiguePolicy,
}

impl FatiguePolicyBuilder {
    /// Set the ring buffer capacity.
    #[must_use]
    pub fn buffer_capacity(mut self, frames: usize) -> Self {
        self.policy.buffer_capacity = frames;
        self
    }

    /// Set the trailing window in milliseconds.
    #[must_use]
    pub fn window_ms(mut self, ms: u64) -> Self {
        self.policy.window_ms = ms;
        self
    }

    /// Set the per-frame high-speed threshold.
    #[must_use]
    pub fn peak_velocity_threshold(mut self, px_per_sec: f64) -> Self {
        self.policy.peak_velocity_threshold = px_per_sec;
        self
    }

    /// Set the mean velocity threshold.
    #[must_use]
    pub fn avg_velocity_threshold(mut self, px_per_sec: f64) -> Self {
        self.policy.avg_velocity_threshold = px_per_sec;
        self
    }

    /// Set the minimum engaged dwell time.
    #[must_use]
    pub fn min_dwell_ms(mut self, ms: u64) -> Self {
        self.policy.min_dwell_ms = ms;
        self
    }

    /// Set the minimum frame count.
    #[must_use]
    pub fn min_sustained_frames(mut self, frames: usize) -> Self {
        self.policy.min_sustained_frames = frames;
        self
    }

    /// Set the required high-speed fraction.
    #[must_use]
    pub fn sustained_ratio(mut self, ratio: f64) -> Self {
        self.policy.sustained_ratio = ratio;
        self
    }

    /// Set the stricter bar used without dwell evidence.
    #[must_use]
    pub fn no_dwell(mut self, min_frames: usize, velocity_factor: f64) -> Self {
        self.policy.no_dwell_min_frames = min_frames;
        self.policy.no_dwell_velocity_factor = velocity_factor;
        self
    }

    /// Set the multiplier reported while fatigued.
    #[must_use]
    pub fn fatigue_multiplier(mut self, multiplier: f64) -> Self {
        self.policy.fatigue_multiplier = multiplier;
        self
    }

    /// Build the policy.
    ///
    /// # Errors
    ///
    /// Returns an error if the policy is invalid.
    pub fn build(self) -> KineticsResult<FatiguePolicy> {
        self.policy.validate()?;
        Ok(self.policy)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    type TestResult = Result<(), Box<dyn std::error::Error>>;

    #[test]
    fn test_default_policy_values() {
        let policy = FatiguePolicy::default();
        assert_eq!(policy.buffer_capacity, 30);
        assert_eq!(policy.window_ms, 3_000);
        assert!((policy.peak_velocity_threshold - 1500.0).abs() < f64::EPSILON);
        assert!((policy.avg_velocity_threshold - 1200.0).abs() < f64::EPSILON);
        assert_eq!(policy.min_dwell_ms, 500);
        assert_eq!(policy.min_sustained_frames, 5);
        assert!((policy.sustained_ratio - 0.6).abs() < f64::EPSILON);
        assert_eq!(policy.no_dwell_min_frames, 10);
        assert!((policy.no_dwell_velocity_factor - 1.2).abs() < f64::EPSILON);
        assert!((policy.fatigue_multiplier - 1.5).abs() < f64::EPSILON);
        assert!((policy.min_dwell_secs() - 0.5).abs() < f64::EPSILON);
    }

    #[test]
    fn test_default_policy_is_valid() -> TestResult {
        FatiguePolicy::default().validate()?;
        Ok(())
    }

    #[test]
    fn test_builder_overrides() -> TestResult {
        let policy = FatiguePolicy::builder()
            .window_ms(5_000)
            .avg_velocity_threshold(900.0)
            .no_dwell(8, 1.1)
            .build()?;

        assert_eq!(policy.window_ms, 5_000);
        assert!((policy.avg_velocity_threshold - 900.0).abs() < f64::EPSILON);
        assert_eq!(policy.no_dwell_min_frames, 8);
        assert_eq!(policy.buffer_capacity, 30);
        Ok(())
    }

    #[test]
    fn test_builder_rejects_invalid_values() {
        assert!(FatiguePolicy::builder().window_ms(0).build().is_err());
        assert!(FatiguePolicy::builder().buffer_capacity(0).build().is_err());
        assert!(FatiguePolicy::builder().sustained_ratio(0.0).build().is_err());
        assert!(FatiguePolicy::builder().sustained_ratio(1.5).build().is_err());
        assert!(FatiguePolicy::builder().fatigue_multiplier(0.5).build().is_err());
        assert!(FatiguePolicy::builder().min_dwell_ms(0).build().is_err());
        assert!(
            FatiguePolicy::builder()
                .peak_velocity_threshold(f64::NAN)
                .build()
                .is_err()
        );
        assert!(
            FatiguePolicy::builder()
                .buffer_capacity(4)
                .min_sustained_frames(5)
                .build()
                .is_err()
        );
    }

    #[test]
    fn test_zero_min_dwell_rejected_from_json() -> TestResult {
        let policy: FatiguePolicy = serde_json::from_str(r#"{ "min_dwell_ms": 0 }"#)?;
        assert!(matches!(
            policy.validate(),
            Err(KineticsError::InvalidPolicy(msg)) if msg.contains("min_dwell_ms")
        ));
        Ok(())
    }

    #[test]
    fn test_policy_deserializes_partial_json() -> TestResult {
        let policy: FatiguePolicy = serde_json::from_str(r#"{ "window_ms": 4000 }"#)?;
        assert_eq!(policy.window_ms, 4_000);
        assert_eq!(policy.buffer_capacity, 30);
        policy.validate()?;
        Ok(())
    }
}
