//! Two-axis accountability gate over a single analysis.
//!
//! Per decision: Pending until an explicit approval is recorded for its index.
//! Globally: one accountability flag, set only by an explicit confirmation.
//! A decision log may be rendered only when every decision index is approved
//! and the flag is set.

use std::collections::BTreeMap;

use tracing::info;

use crate::error::PreconditionError;
use crate::model::DecisionAnalysis;

/// Confidence below which a decision is flagged for closer review.
pub const LOW_CONFIDENCE_REVIEW_THRESHOLD: f64 = 0.3;

/// A reviewer's verdict on one decision.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ApprovalRecord {
    pub approved: bool,
    /// Replacement wording; empty if the reviewer kept the original.
    pub edited_decision: String,
    /// Free-text attestation from the reviewer.
    pub human_confirmation: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApprovalState {
    Pending,
    Approved,
}

impl ApprovalState {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "PENDING",
            Self::Approved => "APPROVED",
        }
    }
}

/// Non-blocking note attached to a decision during review.
#[derive(Debug, Clone, PartialEq)]
pub struct ReviewAdvisory {
    pub index: usize,
    pub message: String,
}

/// Snapshot of how far an analysis is from being exportable.
#[derive(Debug, Clone, PartialEq)]
pub struct Readiness {
    pub missing: Vec<usize>,
    pub accountability_confirmed: bool,
    pub advisories: Vec<ReviewAdvisory>,
}

impl Readiness {
    pub fn is_ready(&self) -> bool {
        self.missing.is_empty() && self.accountability_confirmed
    }
}

/// Approval records keyed by decision index, plus the accountability flag.
///
/// The gate does not hold the analysis; callers pass it in so readiness is
/// always checked against the decisions actually being exported.
#[derive(Debug, Clone, Default)]
pub struct ApprovalGate {
    records: BTreeMap<usize, ApprovalRecord>,
    accountability_confirmed: bool,
}

impl ApprovalGate {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a reviewer's verdict for decision `index`.
    ///
    /// Last writer wins per index. Recording `approved = false` leaves the
    /// index Pending, which also withdraws an earlier approval.
    pub fn record_approval(
        &mut self,
        index: usize,
        approved: bool,
        edited_decision: impl Into<String>,
        human_confirmation: impl Into<String>,
    ) {
        let record = ApprovalRecord {
            approved,
            edited_decision: edited_decision.into(),
            human_confirmation: human_confirmation.into(),
        };
        info!(index, approved, "approval recorded");
        self.records.insert(index, record);
    }

    /// Set the global accountability flag.
    pub fn confirm_accountability(&mut self) {
        info!("accountability confirmed");
        self.accountability_confirmed = true;
    }

    pub fn accountability_confirmed(&self) -> bool {
        self.accountability_confirmed
    }

    pub fn record(&self, index: usize) -> Option<&ApprovalRecord> {
        self.records.get(&index)
    }

    pub fn state(&self, index: usize) -> ApprovalState {
        match self.records.get(&index) {
            Some(record) if record.approved => ApprovalState::Approved,
            _ => ApprovalState::Pending,
        }
    }

    /// Indices in `[0, decisions.len())` that are not approved, ascending.
    pub fn missing_approvals(&self, analysis: &DecisionAnalysis) -> Vec<usize> {
        (0..analysis.decisions.len())
            .filter(|&i| self.state(i) == ApprovalState::Pending)
            .collect()
    }

    /// True iff every decision is approved and accountability is confirmed.
    pub fn is_ready_for_export(&self, analysis: &DecisionAnalysis) -> bool {
        self.accountability_confirmed && self.missing_approvals(analysis).is_empty()
    }

    pub fn check_ready(&self, analysis: &DecisionAnalysis) -> Result<(), PreconditionError> {
        let missing = self.missing_approvals(analysis);
        if missing.is_empty() && self.accountability_confirmed {
            return Ok(());
        }
        Err(PreconditionError {
            missing,
            accountability_confirmed: self.accountability_confirmed,
        })
    }

    /// Full readiness report, including low-confidence advisories.
    pub fn readiness(&self, analysis: &DecisionAnalysis) -> Readiness {
        let advisories = analysis
            .decisions
            .iter()
            .enumerate()
            .filter(|(_, d)| d.confidence.value() < LOW_CONFIDENCE_REVIEW_THRESHOLD)
            .map(|(index, d)| ReviewAdvisory {
                index,
                message: format!(
                    "Decision {} has very low confidence ({:.0}%), review required",
                    index + 1,
                    d.confidence.value() * 100.0
                ),
            })
            .collect();

        Readiness {
            missing: self.missing_approvals(analysis),
            accountability_confirmed: self.accountability_confirmed,
            advisories,
        }
    }
}
