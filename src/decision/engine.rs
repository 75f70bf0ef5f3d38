//! Decision engine.
//!
//! # Algorithm
//!
//! 1. Validate the ranking against the taxonomy
//! 2. Walk the rule table in order
//! 3. Return the record of the first rule that matches
//!
//! No rule is consulted again after a match, and the final rule always
//! matches, so every valid ranking yields exactly one record.

use std::sync::Arc;

#[cfg(feature = "parallel")]
use rayon::prelude::*;
use tracing::{debug, info};

use super::config::ThresholdConfig;
use super::rules::standard_rules;
use super::types::{DecisionRecord, DecisionRule, RuleContext};
use crate::error::{ConfigError, InputError};
use crate::ranking::{validate_ranking, RankedEntry, Ranker};
use crate::taxonomy::{BiasRegistry, Taxonomy};

/// Applies the standard calibration policy to a ranked prediction.
///
/// The ranking must cover every taxonomy class once, in non-increasing
/// confidence order. `config` is assumed to have passed
/// [`ThresholdConfig::validate`].
pub fn classify(
    ranked: &[RankedEntry],
    taxonomy: &Taxonomy,
    bias_registry: &BiasRegistry,
    config: &ThresholdConfig,
) -> Result<DecisionRecord, InputError> {
    validate_ranking(ranked, taxonomy.len())?;
    let ctx = RuleContext {
        ranked,
        taxonomy,
        bias_registry,
        config,
    };
    Ok(apply_rules(standard_rules(), &ctx))
}

fn apply_rules(rules: &[&dyn DecisionRule], ctx: &RuleContext<'_>) -> DecisionRecord {
    for rule in rules {
        if let Some(record) = rule.evaluate(ctx) {
            debug!(
                rule = rule.name(),
                status = %record.status,
                confidence = record.primary_confidence,
                "decision rule matched"
            );
            return record;
        }
    }
    unreachable!("the final standard rule matches every validated ranking")
}

/// A validated taxonomy, bias registry, and threshold set, ready to
/// classify.
///
/// Cheap to clone: the taxonomy and registry are shared behind `Arc`.
///
/// # Examples
///
/// ```
/// use u_calibrate::decision::{DecisionEngine, DecisionStatus, ThresholdConfig};
/// use u_calibrate::taxonomy::{BiasRegistry, Taxonomy};
///
/// let taxonomy = Taxonomy::new(["Healthy", "Leaf_Spot", "Powdery_Mildew", "Blight", "Rust"]).unwrap();
/// let registry = BiasRegistry::new(&taxonomy, ["Leaf_Spot"]).unwrap();
/// let engine = DecisionEngine::new(taxonomy, registry, ThresholdConfig::default()).unwrap();
///
/// let record = engine.classify_vector(&[0.70, 0.10, 0.10, 0.06, 0.04]).unwrap();
/// assert_eq!(record.status, DecisionStatus::Normal);
/// assert_eq!(record.primary_label, "Healthy");
/// ```
#[derive(Debug, Clone)]
pub struct DecisionEngine {
    taxonomy: Arc<Taxonomy>,
    bias_registry: Arc<BiasRegistry>,
    config: ThresholdConfig,
    ranker: Ranker,
}

impl DecisionEngine {
    /// Validates the configuration and builds an engine.
    pub fn new(
        taxonomy: impl Into<Arc<Taxonomy>>,
        bias_registry: impl Into<Arc<BiasRegistry>>,
        config: ThresholdConfig,
    ) -> Result<Self, ConfigError> {
        let taxonomy = taxonomy.into();
        let bias_registry = bias_registry.into();

        config.validate()?;
        if let Some(label) = bias_registry.iter().find(|l| !taxonomy.contains(l)) {
            return Err(ConfigError::UnknownBiasLabel {
                label: label.to_string(),
            });
        }

        let mut ranker = Ranker::new(taxonomy.len());
        if let Some(tolerance) = config.sum_tolerance {
            ranker = ranker.with_sum_tolerance(tolerance)?;
        }

        info!(
            classes = taxonomy.len(),
            biased_labels = bias_registry.len(),
            low_confidence_threshold = config.low_confidence_threshold,
            alternatives_count = config.alternatives_count,
            "decision engine ready"
        );

        Ok(Self {
            taxonomy,
            bias_registry,
            config,
            ranker,
        })
    }

    pub fn taxonomy(&self) -> &Taxonomy {
        &self.taxonomy
    }

    pub fn bias_registry(&self) -> &BiasRegistry {
        &self.bias_registry
    }

    pub fn config(&self) -> &ThresholdConfig {
        &self.config
    }

    /// Names of the policy rules in evaluation order.
    pub fn rule_names(&self) -> Vec<&'static str> {
        standard_rules().iter().map(|r| r.name()).collect()
    }

    /// Ranks a probability vector against this engine's taxonomy.
    pub fn rank(&self, vector: &[f64]) -> Result<Vec<RankedEntry>, InputError> {
        self.ranker.rank(vector)
    }

    /// Classifies an already ranked prediction.
    pub fn classify(&self, ranked: &[RankedEntry]) -> Result<DecisionRecord, InputError> {
        classify(ranked, &self.taxonomy, &self.bias_registry, &self.config)
    }

    /// Ranks and classifies a raw probability vector.
    pub fn classify_vector(&self, vector: &[f64]) -> Result<DecisionRecord, InputError> {
        let ranked = self.rank(vector)?;
        self.classify(&ranked)
    }

    /// Classifies many vectors.
    ///
    /// Records are returned in input order. Fails with the error of the
    /// first invalid vector (by input position). With the `parallel`
    /// feature enabled the vectors are classified on the rayon pool.
    pub fn classify_batch<V>(&self, vectors: &[V]) -> Result<Vec<DecisionRecord>, InputError>
    where
        V: AsRef<[f64]> + Sync,
    {
        #[cfg(feature = "parallel")]
        let results: Vec<_> = vectors
            .par_iter()
            .map(|v| self.classify_vector(v.as_ref()))
            .collect();
        #[cfg(not(feature = "parallel"))]
        let results: Vec<_> = vectors
            .iter()
            .map(|v| self.classify_vector(v.as_ref()))
            .collect();

        results.into_iter().collect()
    }
}
