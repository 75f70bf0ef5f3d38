//! Classification decision and bias-mitigation policy.
//!
//! The classifier behind this layer is skewed toward a few classes and
//! returns near-certain answers for unrelated inputs. Instead of trusting
//! its top-1 output, the engine runs the ranked prediction through an
//! ordered rule table; the first matching rule produces the
//! [`DecisionRecord`]:
//!
//! 1. **Low confidence**: top-1 below threshold, label withheld.
//! 2. **Known bias**: flagged label, blended or overridden with ranks 2-3.
//! 3. **Dominance gap**: unnaturally peaked output, tempered with rank 2.
//! 4. **Over-confident**: very high top-1, alternatives attached.
//! 5. **Accept**: top-1 reported unchanged.
//!
//! Rules are independent [`DecisionRule`] values, so each can be tested
//! on its own and the order is visible in one place.

mod config;
mod engine;
mod rules;
mod types;

pub use config::{ThresholdConfig, ENV_PREFIX};
pub use engine::{classify, DecisionEngine};
pub use rules::{standard_rules, Accept, DominanceGap, KnownBias, LowConfidence, OverConfident};
pub use types::{
    Alternative, DecisionRecord, DecisionRule, DecisionStatus, RuleContext, UNKNOWN_LABEL,
};
