//! Decision records and the rule trait.

use std::fmt;

use serde::{Deserialize, Serialize};

use super::config::ThresholdConfig;
use crate::ranking::RankedEntry;
use crate::taxonomy::{BiasRegistry, Taxonomy};

/// Primary label reported when the top prediction is unusable.
pub const UNKNOWN_LABEL: &str = "Unknown";

/// Outcome category of a decision.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DecisionStatus {
    /// The top prediction stands as-is.
    Normal,
    /// The top prediction is too weak to report.
    LowConfidence,
    /// The top prediction was replaced by a composite label.
    BiasAdjusted,
    /// The top prediction stands but alternatives are attached.
    HighConfidenceWithAlternatives,
}

impl DecisionStatus {
    pub const fn as_str(self) -> &'static str {
        match self {
            DecisionStatus::Normal => "normal",
            DecisionStatus::LowConfidence => "low_confidence",
            DecisionStatus::BiasAdjusted => "bias_adjusted",
            DecisionStatus::HighConfidenceWithAlternatives => "high_confidence_with_alternatives",
        }
    }
}

impl fmt::Display for DecisionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A secondary candidate attached to a decision.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Alternative {
    pub label: String,
    pub confidence: f64,
}

/// The structured result of one classification.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DecisionRecord {
    pub status: DecisionStatus,
    pub primary_label: String,
    pub primary_confidence: f64,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub alternatives: Vec<Alternative>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
    /// The raw top-1 label, set only when a bias rule replaced it.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub original_label: Option<String>,
}

impl DecisionRecord {
    /// Returns `true` when `primary_label` names exactly one taxonomy class.
    ///
    /// Composite and `"Unknown"` labels have no direct lookup entry
    /// downstream and need generic handling.
    pub fn is_single_class(&self) -> bool {
        matches!(
            self.status,
            DecisionStatus::Normal | DecisionStatus::HighConfidenceWithAlternatives
        )
    }
}

/// Everything a rule may look at for one decision.
#[derive(Debug, Clone, Copy)]
pub struct RuleContext<'a> {
    pub ranked: &'a [RankedEntry],
    pub taxonomy: &'a Taxonomy,
    pub bias_registry: &'a BiasRegistry,
    pub config: &'a ThresholdConfig,
}

impl<'a> RuleContext<'a> {
    /// Label and confidence at zero-based `rank`.
    pub fn entry(&self, rank: usize) -> Option<(&'a str, f64)> {
        let entry = self.ranked.get(rank)?;
        let label = self.taxonomy.label(entry.class_id)?;
        Some((label, entry.confidence))
    }

    /// Label/confidence pairs for ranks `from..to`, clamped to the ranking.
    pub fn alternatives(&self, from: usize, to: usize) -> Vec<Alternative> {
        (from..to.min(self.ranked.len()))
            .filter_map(|rank| self.entry(rank))
            .map(|(label, confidence)| Alternative {
                label: label.to_string(),
                confidence,
            })
            .collect()
    }
}

/// One step of the decision policy.
///
/// A rule either claims the decision by returning a record, or passes by
/// returning `None` so the next rule in the table is consulted.
///
/// # Examples
///
/// ```
/// use u_calibrate::decision::{DecisionRecord, DecisionRule, DecisionStatus, RuleContext};
///
/// struct AlwaysNormal;
///
/// impl DecisionRule for AlwaysNormal {
///     fn name(&self) -> &str { "always_normal" }
///     fn evaluate(&self, ctx: &RuleContext<'_>) -> Option<DecisionRecord> {
///         let (label, confidence) = ctx.entry(0)?;
///         Some(DecisionRecord {
///             status: DecisionStatus::Normal,
///             primary_label: label.to_string(),
///             primary_confidence: confidence,
///             alternatives: Vec::new(),
///             note: None,
///             original_label: None,
///         })
///     }
/// }
/// ```
pub trait DecisionRule: Send + Sync {
    /// Returns a stable identifier for this rule.
    fn name(&self) -> &str;

    /// Produces a decision if this rule applies.
    fn evaluate(&self, ctx: &RuleContext<'_>) -> Option<DecisionRecord>;
}
