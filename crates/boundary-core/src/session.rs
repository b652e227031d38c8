//! Review session: one analysis and the approvals given against it.

use tracing::info;

use crate::error::{ApprovalError, PreconditionError};
use crate::gate::{ApprovalGate, ApprovalRecord, Readiness};
use crate::model::DecisionAnalysis;
use crate::render;

/// Owns the current [`DecisionAnalysis`] together with its [`ApprovalGate`].
///
/// Approvals never outlive the analysis they were given against: replacing
/// the analysis discards every record and clears the accountability flag.
#[derive(Debug, Clone)]
pub struct ReviewSession {
    analysis: DecisionAnalysis,
    gate: ApprovalGate,
}

impl ReviewSession {
    pub fn new(analysis: DecisionAnalysis) -> Self {
        Self {
            analysis,
            gate: ApprovalGate::new(),
        }
    }

    pub fn analysis(&self) -> &DecisionAnalysis {
        &self.analysis
    }

    pub fn gate(&self) -> &ApprovalGate {
        &self.gate
    }

    /// Swap in the analysis of a new transcript and reset all approval state.
    pub fn replace_analysis(&mut self, analysis: DecisionAnalysis) {
        info!(
            decisions = analysis.decisions.len(),
            "analysis replaced, approvals reset"
        );
        self.analysis = analysis;
        self.gate = ApprovalGate::new();
    }

    /// Record a verdict for an existing decision index.
    pub fn record_approval(
        &mut self,
        index: usize,
        approved: bool,
        edited_decision: impl Into<String>,
        human_confirmation: impl Into<String>,
    ) -> Result<(), ApprovalError> {
        let len = self.analysis.decisions.len();
        if index >= len {
            return Err(ApprovalError::UnknownDecision { index, len });
        }
        self.gate
            .record_approval(index, approved, edited_decision, human_confirmation);
        Ok(())
    }

    pub fn confirm_accountability(&mut self) {
        self.gate.confirm_accountability();
    }

    pub fn approval(&self, index: usize) -> Option<&ApprovalRecord> {
        self.gate.record(index)
    }

    pub fn is_ready_for_export(&self) -> bool {
        self.gate.is_ready_for_export(&self.analysis)
    }

    pub fn readiness(&self) -> Readiness {
        self.gate.readiness(&self.analysis)
    }

    pub fn render_log(&self) -> Result<String, PreconditionError> {
        render::render_log(&self.analysis, &self.gate)
    }
}
