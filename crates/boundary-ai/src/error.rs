use std::time::Duration;

use boundary_core::{FailureClass, ValidationError};
use thiserror::Error;

/// Any failure on the transcript → analysis path.
///
/// None of these escape [`Analyzer::analyze`](crate::Analyzer::analyze); each
/// is converted into a fallback analysis.
#[derive(Debug, Error)]
pub enum ExtractionError {
    #[error("extraction disabled: {0}")]
    Configuration(String),

    #[error(transparent)]
    Api(#[from] ApiError),

    #[error(transparent)]
    Validation(#[from] ValidationError),
}

impl ExtractionError {
    pub fn class(&self) -> FailureClass {
        match self {
            Self::Configuration(_) => FailureClass::Configuration,
            Self::Api(_) => FailureClass::Api,
            Self::Validation(_) => FailureClass::Validation,
        }
    }
}

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("server returned {status}: {body}")]
    Server { status: u16, body: String },

    #[error("no response within {0:?}")]
    Timeout(Duration),

    #[error("response contained no message content")]
    EmptyResponse,
}
