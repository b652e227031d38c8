use thiserror::Error;

/// The extracted response does not conform to the decision analysis schema.
///
/// `field` is a path into the response, such as `decisions[1].owner`, or
/// `$` for the document as a whole.
#[derive(Debug, Clone, PartialEq, Error)]
#[error("invalid `{field}`: {kind}")]
pub struct ValidationError {
    pub field: String,
    pub kind: ValidationErrorKind,
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum ValidationErrorKind {
    #[error("malformed JSON: {0}")]
    Malformed(String),

    #[error("required field is missing")]
    Missing,

    #[error("expected {expected}")]
    WrongType { expected: &'static str },

    #[error("{value:?} is not one of {allowed:?}")]
    NotInSet {
        value: String,
        allowed: &'static [&'static str],
    },

    #[error("{value} is outside [0.0, 1.0]")]
    OutOfRange { value: f64 },

    #[error("must not be blank")]
    Blank,
}

impl ValidationError {
    pub fn new(field: impl Into<String>, kind: ValidationErrorKind) -> Self {
        Self {
            field: field.into(),
            kind,
        }
    }
}

/// A decision log was requested before the accountability gate was satisfied.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("decision log export blocked: {}", describe_precondition(.missing, .accountability_confirmed))]
pub struct PreconditionError {
    /// Decision indices (zero-based) without an approved record.
    pub missing: Vec<usize>,
    pub accountability_confirmed: bool,
}

fn describe_precondition(missing: &[usize], accountability_confirmed: &bool) -> String {
    let mut parts = Vec::new();
    if !missing.is_empty() {
        let listed: Vec<String> = missing.iter().map(|i| i.to_string()).collect();
        parts.push(format!(
            "decisions awaiting approval at index {}",
            listed.join(", ")
        ));
    }
    if !*accountability_confirmed {
        parts.push("accountability not confirmed".to_string());
    }
    parts.join("; ")
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ApprovalError {
    #[error("no decision at index {index} (analysis has {len} decisions)")]
    UnknownDecision { index: usize, len: usize },
}
