//! The standard calibration rules, in policy order.

use super::types::{DecisionRecord, DecisionRule, DecisionStatus, RuleContext, UNKNOWN_LABEL};

/// Withholds the label when the top confidence is below
/// `low_confidence_threshold`.
pub struct LowConfidence;

impl DecisionRule for LowConfidence {
    fn name(&self) -> &str {
        "low_confidence"
    }

    fn evaluate(&self, ctx: &RuleContext<'_>) -> Option<DecisionRecord> {
        let (_, c1) = ctx.entry(0)?;
        if c1 >= ctx.config.low_confidence_threshold {
            return None;
        }
        Some(DecisionRecord {
            status: DecisionStatus::LowConfidence,
            primary_label: UNKNOWN_LABEL.to_string(),
            primary_confidence: c1,
            alternatives: Vec::new(),
            note: Some(format!(
                "Top confidence {c1} is below {}; no class reported.",
                ctx.config.low_confidence_threshold
            )),
            original_label: None,
        })
    }
}

/// Rewrites a confident prediction of a label in the bias registry.
///
/// Above `severe_bias_threshold` the flagged label is dropped in favor of
/// ranks 2 and 3; otherwise it is blended with them.
pub struct KnownBias;

impl DecisionRule for KnownBias {
    fn name(&self) -> &str {
        "known_bias"
    }

    fn evaluate(&self, ctx: &RuleContext<'_>) -> Option<DecisionRecord> {
        let (l1, c1) = ctx.entry(0)?;
        if !ctx.bias_registry.contains(l1) || c1 < ctx.config.bias_trigger_threshold {
            return None;
        }
        let (l2, c2) = ctx.entry(1)?;
        let (l3, c3) = ctx.entry(2)?;

        let (primary_label, primary_confidence, note) = if c1 > ctx.config.severe_bias_threshold {
            (
                format!("Uncertain Detection - Possibly {l2} or {l3}"),
                c2.max(c3),
                format!(
                    "Strong bias towards {l1} ({c1}); reporting the next candidates instead."
                ),
            )
        } else {
            (
                format!("Multiple Possibilities: {l1}, {l2}, or {l3}"),
                (c1 + c2 + c3) / 3.0,
                format!("{l1} is a known over-predicted class; reporting the top three candidates."),
            )
        };

        Some(DecisionRecord {
            status: DecisionStatus::BiasAdjusted,
            primary_label,
            primary_confidence,
            alternatives: Vec::new(),
            note: Some(note),
            original_label: Some(l1.to_string()),
        })
    }
}

/// Flags an unnaturally peaked distribution for any label.
pub struct DominanceGap;

impl DecisionRule for DominanceGap {
    fn name(&self) -> &str {
        "dominance_gap"
    }

    fn evaluate(&self, ctx: &RuleContext<'_>) -> Option<DecisionRecord> {
        let (l1, c1) = ctx.entry(0)?;
        let (l2, c2) = ctx.entry(1)?;
        if c1 <= ctx.config.dominance_confidence_threshold
            || c1 - c2 <= ctx.config.dominance_gap_threshold
        {
            return None;
        }
        Some(DecisionRecord {
            status: DecisionStatus::BiasAdjusted,
            primary_label: format!("High Confidence with Uncertainty: Likely {l1} but consider {l2}"),
            primary_confidence: (c1 + c2) / 2.0,
            alternatives: Vec::new(),
            note: Some(format!(
                "Gap of {} between the top two classes is unusually large; confidence tempered.",
                c1 - c2
            )),
            original_label: Some(l1.to_string()),
        })
    }
}

/// Keeps a very confident prediction but attaches the runners-up.
pub struct OverConfident;

impl DecisionRule for OverConfident {
    fn name(&self) -> &str {
        "over_confident"
    }

    fn evaluate(&self, ctx: &RuleContext<'_>) -> Option<DecisionRecord> {
        let (l1, c1) = ctx.entry(0)?;
        if c1 <= ctx.config.very_high_confidence_threshold {
            return None;
        }
        Some(DecisionRecord {
            status: DecisionStatus::HighConfidenceWithAlternatives,
            primary_label: l1.to_string(),
            primary_confidence: c1,
            alternatives: ctx.alternatives(1, ctx.config.alternatives_count),
            note: Some("Very high confidence; alternatives listed for review.".to_string()),
            original_label: None,
        })
    }
}

/// Reports the top prediction unchanged. Always matches.
pub struct Accept;

impl DecisionRule for Accept {
    fn name(&self) -> &str {
        "accept"
    }

    fn evaluate(&self, ctx: &RuleContext<'_>) -> Option<DecisionRecord> {
        let (l1, c1) = ctx.entry(0)?;
        Some(DecisionRecord {
            status: DecisionStatus::Normal,
            primary_label: l1.to_string(),
            primary_confidence: c1,
            alternatives: Vec::new(),
            note: None,
            original_label: None,
        })
    }
}

static STANDARD_RULES: [&dyn DecisionRule; 5] = [
    &LowConfidence,
    &KnownBias,
    &DominanceGap,
    &OverConfident,
    &Accept,
];

/// The calibration policy, in evaluation order.
pub fn standard_rules() -> &'static [&'static dyn DecisionRule] {
    &STANDARD_RULES
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::decision::ThresholdConfig;
    use crate::ranking::{RankedEntry, Ranker};
    use crate::taxonomy::{BiasRegistry, Taxonomy};

    struct Fixture {
        taxonomy: Taxonomy,
        registry: BiasRegistry,
        config: ThresholdConfig,
    }

    impl Fixture {
        fn new() -> Self {
            let taxonomy =
                Taxonomy::new(["Healthy", "Leaf_Spot", "Powdery_Mildew", "Blight", "Rust"])
                    .unwrap();
            let registry = BiasRegistry::new(&taxonomy, ["Leaf_Spot"]).unwrap();
            Self {
                taxonomy,
                registry,
                config: ThresholdConfig::default(),
            }
        }

        fn eval(&self, rule: &dyn DecisionRule, vector: &[f64]) -> Option<DecisionRecord> {
            let ranked: Vec<RankedEntry> = Ranker::new(vector.len()).rank(vector).unwrap();
            let ctx = RuleContext {
                ranked: &ranked,
                taxonomy: &self.taxonomy,
                bias_registry: &self.registry,
                config: &self.config,
            };
            rule.evaluate(&ctx)
        }
    }

    #[test]
    fn test_low_confidence_fires_below_threshold() {
        let f = Fixture::new();
        let record = f.eval(&LowConfidence, &[0.3, 0.25, 0.2, 0.15, 0.1]).unwrap();
        assert_eq!(record.status, DecisionStatus::LowConfidence);
        assert_eq!(record.primary_label, "Unknown");
        assert!((record.primary_confidence - 0.3).abs() < 1e-10);
        assert!(record.alternatives.is_empty());
    }

    #[test]
    fn test_low_confidence_boundary_passes() {
        let f = Fixture::new();
        assert!(f.eval(&LowConfidence, &[0.6, 0.2, 0.1, 0.05, 0.05]).is_none());
    }

    #[test]
    fn test_known_bias_ignores_unflagged() {
        let f = Fixture::new();
        assert!(f.eval(&KnownBias, &[0.75, 0.05, 0.10, 0.06, 0.04]).is_none());
    }

    #[test]
    fn test_known_bias_ignores_below_trigger() {
        let f = Fixture::new();
        assert!(f.eval(&KnownBias, &[0.1, 0.65, 0.15, 0.06, 0.04]).is_none());
    }

    #[test]
    fn test_known_bias_trigger_is_inclusive() {
        let f = Fixture::new();
        let record = f.eval(&KnownBias, &[0.1, 0.7, 0.1, 0.06, 0.04]).unwrap();
        assert_eq!(
            record.primary_label,
            "Multiple Possibilities: Leaf_Spot, Healthy, or Powdery_Mildew"
        );
    }

    #[test]
    fn test_known_bias_severe_is_exclusive() {
        let f = Fixture::new();
        let record = f.eval(&KnownBias, &[0.02, 0.9, 0.05, 0.02, 0.01]).unwrap();
        assert!(record.primary_label.starts_with("Multiple Possibilities"));
    }

    #[test]
    fn test_dominance_gap_requires_both_conditions() {
        let f = Fixture::new();
        // Confident but the runner-up is close.
        assert!(f.eval(&DominanceGap, &[0.85, 0.3, 0.0, 0.0, 0.0]).is_none());
        // Large gap but not confident enough.
        assert!(f.eval(&DominanceGap, &[0.8, 0.05, 0.05, 0.05, 0.05]).is_none());
        let record = f.eval(&DominanceGap, &[0.85, 0.05, 0.05, 0.03, 0.02]).unwrap();
        assert_eq!(
            record.primary_label,
            "High Confidence with Uncertainty: Likely Healthy but consider Leaf_Spot"
        );
        assert!((record.primary_confidence - 0.45).abs() < 1e-10);
        assert_eq!(record.original_label.as_deref(), Some("Healthy"));
    }

    #[test]
    fn test_dominance_gap_boundary_is_exclusive() {
        let mut f = Fixture::new();
        f.config = f.config.clone().with_dominance_gap_threshold(0.5);
        // 0.875 - 0.375 is exactly 0.5 in binary floating point.
        assert!(f.eval(&DominanceGap, &[0.875, 0.375, 0.0, 0.0, 0.0]).is_none());
        assert!(f.eval(&DominanceGap, &[0.875, 0.37, 0.0, 0.0, 0.0]).is_some());
    }

    #[test]
    fn test_over_confident_boundary_is_exclusive() {
        let f = Fixture::new();
        assert!(f.eval(&OverConfident, &[0.95, 0.02, 0.01, 0.01, 0.01]).is_none());
        assert!(f.eval(&OverConfident, &[0.951, 0.02, 0.01, 0.01, 0.009]).is_some());
    }

    #[test]
    fn test_over_confident_alternatives() {
        let f = Fixture::new();
        let record = f.eval(&OverConfident, &[0.96, 0.02, 0.01, 0.007, 0.003]).unwrap();
        assert_eq!(record.status, DecisionStatus::HighConfidenceWithAlternatives);
        assert_eq!(record.primary_label, "Healthy");
        let labels: Vec<&str> = record.alternatives.iter().map(|a| a.label.as_str()).collect();
        assert_eq!(labels, vec!["Leaf_Spot", "Powdery_Mildew", "Blight"]);
    }

    #[test]
    fn test_over_confident_alternatives_clamped() {
        let mut f = Fixture::new();
        f.config = f.config.clone().with_alternatives_count(50);
        let record = f.eval(&OverConfident, &[0.96, 0.02, 0.01, 0.007, 0.003]).unwrap();
        assert_eq!(record.alternatives.len(), 4);

        f.config = f.config.clone().with_alternatives_count(1);
        let record = f.eval(&OverConfident, &[0.96, 0.02, 0.01, 0.007, 0.003]).unwrap();
        assert!(record.alternatives.is_empty());
    }

    #[test]
    fn test_accept_always_matches() {
        let f = Fixture::new();
        let record = f.eval(&Accept, &[0.2, 0.2, 0.2, 0.2, 0.2]).unwrap();
        assert_eq!(record.status, DecisionStatus::Normal);
        assert_eq!(record.primary_label, "Healthy");
        assert!(record.note.is_none());
    }

    #[test]
    fn test_standard_rule_order() {
        let names: Vec<&str> = standard_rules().iter().map(|r| r.name()).collect();
        assert_eq!(
            names,
            vec![
                "low_confidence",
                "known_bias",
                "dominance_gap",
                "over_confident",
                "accept"
            ]
        );
    }
}
