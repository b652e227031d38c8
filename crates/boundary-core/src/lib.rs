//! Decision analysis core: schema, strict validation, confidence adjustment,
//! fallback, approval gate, and decision log rendering.

pub mod confidence;
mod error;
pub mod fallback;
pub mod gate;
pub mod model;
pub mod render;
pub mod session;
pub mod transcript;
pub mod validate;

pub use confidence::{HIGH_STAKES_PENALTY, adjust_confidence};
pub use error::{ApprovalError, PreconditionError, ValidationError, ValidationErrorKind};
pub use fallback::{FailureClass, fallback_analysis};
pub use gate::{ApprovalGate, ApprovalRecord, ApprovalState, Readiness, ReviewAdvisory};
pub use model::{
    Assumption, Confidence, ConfidenceBand, Decision, DecisionAnalysis, DecisionStatus, Risk,
    RiskSeverity,
};
pub use render::{render_log, render_log_at};
pub use session::ReviewSession;
pub use transcript::{EmailMetadata, unverified_quotes};
pub use validate::{ValidatedAnalysis, validate_response};
