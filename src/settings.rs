//! Startup configuration loading.
//!
//! A settings document names the taxonomy, the bias registry, and any
//! threshold overrides:
//!
//! ```json
//! {
//!   "taxonomy": [
//!     { "class_id": 0, "label": "Healthy" },
//!     { "class_id": 1, "label": "Leaf_Spot" },
//!     { "class_id": 2, "label": "Blight" }
//!   ],
//!   "bias_registry": ["Leaf_Spot"],
//!   "thresholds": { "low_confidence_threshold": 0.6 }
//! }
//! ```
//!
//! Thresholds not present in the document keep their defaults, and
//! `UCAL_*` environment variables take precedence over the document.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::decision::{DecisionEngine, ThresholdConfig};
use crate::error::ConfigError;
use crate::taxonomy::{
    plant_disease_taxonomy, BiasRegistry, Taxonomy, TaxonomyEntry, PLANT_DISEASE_BIASED_LABELS,
};

/// Raw, unvalidated engine configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CalibrationSettings {
    pub taxonomy: Vec<TaxonomyEntry>,
    #[serde(default)]
    pub bias_registry: Vec<String>,
    #[serde(default)]
    pub thresholds: ThresholdConfig,
}

impl CalibrationSettings {
    /// Settings for the built-in 22-class plant disease model.
    pub fn plant_disease() -> Self {
        Self {
            taxonomy: plant_disease_taxonomy().entries(),
            bias_registry: PLANT_DISEASE_BIASED_LABELS
                .iter()
                .map(|l| l.to_string())
                .collect(),
            thresholds: ThresholdConfig::default(),
        }
    }

    /// Parses settings from a JSON document.
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        serde_json::from_str(json).map_err(|e| ConfigError::Parse(e.to_string()))
    }

    /// Reads and parses a JSON settings file.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let json = fs::read_to_string(path).map_err(|e| ConfigError::Io {
            path: path.display().to_string(),
            reason: e.to_string(),
        })?;
        let settings = Self::from_json_str(&json)?;
        info!(
            path = %path.display(),
            classes = settings.taxonomy.len(),
            "loaded calibration settings"
        );
        Ok(settings)
    }

    /// Applies `UCAL_*` overrides from the process environment.
    pub fn with_env_overrides(mut self) -> Result<Self, ConfigError> {
        self.thresholds = self.thresholds.apply_env_overrides()?;
        Ok(self)
    }

    /// Validates everything and builds a ready engine.
    pub fn into_engine(self) -> Result<DecisionEngine, ConfigError> {
        let taxonomy = Taxonomy::from_entries(self.taxonomy)?;
        let bias_registry = BiasRegistry::new(&taxonomy, self.bias_registry)?;
        DecisionEngine::new(taxonomy, bias_registry, self.thresholds)
    }
}
