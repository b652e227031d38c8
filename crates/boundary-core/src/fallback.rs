//! Safe analysis returned whenever extraction is unavailable or fails.
//!
//! The fallback never asserts a decision and always routes the whole
//! conversation back to a human.

use std::fmt;

use crate::model::DecisionAnalysis;

pub const FALLBACK_HUMAN_MUST_DECIDE: &str =
    "Full conversation review required due to analysis error";
pub const FALLBACK_WHY_HUMAN: &str =
    "Automated analysis failed — human review necessary for safety";

/// Which stage of the extraction chain gave up.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureClass {
    /// No usable credential; permanent for the session.
    Configuration,
    /// Network error, timeout, or non-success response.
    Api,
    /// The response did not match the schema.
    Validation,
    /// Anything else, including a panic inside the chain.
    Unexpected,
}

impl FailureClass {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Configuration => "ConfigurationError",
            Self::Api => "ApiError",
            Self::Validation => "ValidationError",
            Self::Unexpected => "UnexpectedError",
        }
    }
}

impl fmt::Display for FailureClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Build the fallback analysis for a failure of `class` with `reason`.
///
/// The first open question names the failure class and reason.
pub fn fallback_analysis(class: FailureClass, reason: &str) -> DecisionAnalysis {
    let reason = reason.trim();
    let first = if reason.is_empty() {
        format!("{class}: analysis could not be completed")
    } else {
        format!("{class}: {reason}")
    };

    DecisionAnalysis {
        decisions: Vec::new(),
        assumptions: Vec::new(),
        risks: Vec::new(),
        open_questions: vec![
            first,
            "Which decisions in this conversation were actually made, and by whom?".to_string(),
        ],
        human_must_decide: FALLBACK_HUMAN_MUST_DECIDE.to_string(),
        why_human: FALLBACK_WHY_HUMAN.to_string(),
        scale_concerns: vec!["Error handling and fallback procedures".to_string()],
    }
}
