//! Decision policy thresholds.

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::error::ConfigError;

/// Prefix of the environment variables read by
/// [`ThresholdConfig::apply_env_overrides`].
pub const ENV_PREFIX: &str = "UCAL_";

/// Thresholds that drive the decision policy.
///
/// # Examples
///
/// ```
/// use u_calibrate::decision::ThresholdConfig;
///
/// let config = ThresholdConfig::default()
///     .with_low_confidence_threshold(0.5)
///     .with_alternatives_count(3);
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ThresholdConfig {
    /// Top-1 confidence below this is unusable.
    pub low_confidence_threshold: f64,

    /// Minimum top-1 confidence for a flagged label before bias logic engages.
    pub bias_trigger_threshold: f64,

    /// Above this a flagged label is overridden rather than blended.
    pub severe_bias_threshold: f64,

    /// Minimum rank-1 to rank-2 gap that marks an unnaturally peaked output.
    pub dominance_gap_threshold: f64,

    /// Minimum top-1 confidence before the dominance gap is examined.
    pub dominance_confidence_threshold: f64,

    /// Above this an unadjusted prediction still carries alternatives.
    pub very_high_confidence_threshold: f64,

    /// Ranked entries (rank-1 included) considered for the alternatives list.
    pub alternatives_count: usize,

    /// Allowed deviation of the vector sum from 1. `None` disables the check.
    pub sum_tolerance: Option<f64>,
}

impl Default for ThresholdConfig {
    fn default() -> Self {
        Self {
            low_confidence_threshold: 0.6,
            bias_trigger_threshold: 0.7,
            severe_bias_threshold: 0.9,
            dominance_gap_threshold: 0.6,
            dominance_confidence_threshold: 0.8,
            very_high_confidence_threshold: 0.95,
            alternatives_count: 4,
            sum_tolerance: None,
        }
    }
}

impl ThresholdConfig {
    pub fn with_low_confidence_threshold(mut self, t: f64) -> Self {
        self.low_confidence_threshold = t;
        self
    }

    pub fn with_bias_trigger_threshold(mut self, t: f64) -> Self {
        self.bias_trigger_threshold = t;
        self
    }

    pub fn with_severe_bias_threshold(mut self, t: f64) -> Self {
        self.severe_bias_threshold = t;
        self
    }

    pub fn with_dominance_gap_threshold(mut self, t: f64) -> Self {
        self.dominance_gap_threshold = t;
        self
    }

    pub fn with_dominance_confidence_threshold(mut self, t: f64) -> Self {
        self.dominance_confidence_threshold = t;
        self
    }

    pub fn with_very_high_confidence_threshold(mut self, t: f64) -> Self {
        self.very_high_confidence_threshold = t;
        self
    }

    pub fn with_alternatives_count(mut self, k: usize) -> Self {
        self.alternatives_count = k;
        self
    }

    pub fn with_sum_tolerance(mut self, tolerance: f64) -> Self {
        self.sum_tolerance = Some(tolerance);
        self
    }

    /// Named threshold values, in policy order.
    fn thresholds(&self) -> [(&'static str, f64); 6] {
        [
            ("low_confidence_threshold", self.low_confidence_threshold),
            ("bias_trigger_threshold", self.bias_trigger_threshold),
            ("severe_bias_threshold", self.severe_bias_threshold),
            ("dominance_gap_threshold", self.dominance_gap_threshold),
            (
                "dominance_confidence_threshold",
                self.dominance_confidence_threshold,
            ),
            (
                "very_high_confidence_threshold",
                self.very_high_confidence_threshold,
            ),
        ]
    }

    /// Validates the configuration.
    pub fn validate(&self) -> Result<(), ConfigError> {
        for (name, value) in self.thresholds() {
            if !(0.0..=1.0).contains(&value) {
                return Err(ConfigError::ThresholdOutOfRange { name, value });
            }
        }
        if self.severe_bias_threshold < self.bias_trigger_threshold {
            return Err(ConfigError::InconsistentThresholds(format!(
                "severe_bias_threshold ({}) must not be below bias_trigger_threshold ({})",
                self.severe_bias_threshold, self.bias_trigger_threshold
            )));
        }
        if self.alternatives_count == 0 {
            return Err(ConfigError::InconsistentThresholds(
                "alternatives_count must be at least 1".into(),
            ));
        }
        if let Some(tolerance) = self.sum_tolerance {
            if !tolerance.is_finite() || tolerance <= 0.0 {
                return Err(ConfigError::InconsistentThresholds(format!(
                    "sum_tolerance must be positive, got {tolerance}"
                )));
            }
        }
        Ok(())
    }

    /// Overrides fields from `UCAL_*` process environment variables.
    ///
    /// Recognized variables are the upper-cased field names behind
    /// [`ENV_PREFIX`], e.g. `UCAL_LOW_CONFIDENCE_THRESHOLD`.
    pub fn apply_env_overrides(self) -> Result<Self, ConfigError> {
        self.apply_overrides_from(|var| std::env::var(var).ok())
    }

    /// Overrides fields using `lookup` to resolve variable names.
    pub fn apply_overrides_from<F>(mut self, lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let fields: [(&str, &mut f64); 6] = [
            (
                "LOW_CONFIDENCE_THRESHOLD",
                &mut self.low_confidence_threshold,
            ),
            ("BIAS_TRIGGER_THRESHOLD", &mut self.bias_trigger_threshold),
            ("SEVERE_BIAS_THRESHOLD", &mut self.severe_bias_threshold),
            ("DOMINANCE_GAP_THRESHOLD", &mut self.dominance_gap_threshold),
            (
                "DOMINANCE_CONFIDENCE_THRESHOLD",
                &mut self.dominance_confidence_threshold,
            ),
            (
                "VERY_HIGH_CONFIDENCE_THRESHOLD",
                &mut self.very_high_confidence_threshold,
            ),
        ];
        for (suffix, slot) in fields {
            if let Some(value) = read_override(&lookup, suffix)? {
                *slot = value;
            }
        }
        if let Some(k) = read_override(&lookup, "ALTERNATIVES_COUNT")? {
            self.alternatives_count = k;
        }
        if let Some(tolerance) = read_override(&lookup, "SUM_TOLERANCE")? {
            self.sum_tolerance = Some(tolerance);
        }
        Ok(self)
    }
}

fn read_override<F, T>(lookup: &F, suffix: &str) -> Result<Option<T>, ConfigError>
where
    F: Fn(&str) -> Option<String>,
    T: std::str::FromStr,
{
    let var = format!("{ENV_PREFIX}{suffix}");
    let Some(raw) = lookup(&var) else {
        return Ok(None);
    };
    match raw.trim().parse() {
        Ok(value) => Ok(Some(value)),
        Err(_) => {
            warn!(var = %var, value = %raw, "unparseable threshold override");
            Err(ConfigError::InvalidEnvOverride { var, value: raw })
        }
    }
}
