//! High-stakes confidence adjustment.

use tracing::info;

use crate::model::DecisionAnalysis;
use crate::validate::ValidatedAnalysis;

/// Amount subtracted from every decision's confidence in high-stakes mode.
pub const HIGH_STAKES_PENALTY: f64 = 0.2;

/// Finalise a validated analysis, lowering each decision's confidence by
/// [`HIGH_STAKES_PENALTY`] (clamped at 0.0) when `high_stakes` is set.
///
/// Only confidences change. Consuming the [`ValidatedAnalysis`] means the
/// penalty can be applied once per extraction and never to a fallback.
pub fn adjust_confidence(validated: ValidatedAnalysis, high_stakes: bool) -> DecisionAnalysis {
    let mut analysis = validated.into_inner();
    if !high_stakes {
        return analysis;
    }

    for decision in &mut analysis.decisions {
        decision.confidence = decision.confidence.lowered(HIGH_STAKES_PENALTY);
    }
    info!(
        decisions = analysis.decisions.len(),
        penalty = HIGH_STAKES_PENALTY,
        "applied high-stakes confidence penalty"
    );
    analysis
}
