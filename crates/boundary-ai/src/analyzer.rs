//! Transcript → [`DecisionAnalysis`] pipeline.
//!
//! prompt → extract → validate → adjust. Any failure along the way, including
//! a panic or the supervisory deadline expiring, yields exactly one fallback
//! analysis. There are no retries.

use std::any::Any;
use std::panic::AssertUnwindSafe;
use std::time::Duration;

use boundary_core::{
    DecisionAnalysis, FailureClass, adjust_confidence, fallback_analysis, unverified_quotes,
    validate_response,
};
use futures::FutureExt;
use tracing::{info, warn};

use crate::client::{DEFAULT_TIMEOUT, ExtractionClient};
use crate::error::{ApiError, ExtractionError};
use crate::prompt::build_prompts;

/// Slack added on top of the HTTP request timeout for the supervisory deadline.
const SUPERVISOR_GRACE: Duration = Duration::from_secs(5);

pub struct Analyzer {
    client: ExtractionClient,
    deadline: Duration,
}

impl Analyzer {
    pub fn new(client: ExtractionClient) -> Self {
        let deadline = client
            .timeout()
            .unwrap_or(DEFAULT_TIMEOUT)
            .saturating_add(SUPERVISOR_GRACE);
        Self { client, deadline }
    }

    /// Override the supervisory deadline for the whole extraction call.
    pub fn with_deadline(mut self, deadline: Duration) -> Self {
        self.deadline = deadline;
        self
    }

    /// Analyze a transcript. Never fails: extraction problems produce a
    /// fallback analysis that sends the conversation back to a human.
    pub async fn analyze(&self, transcript: &str, high_stakes: bool) -> DecisionAnalysis {
        let attempt = AssertUnwindSafe(self.try_analyze(transcript, high_stakes))
            .catch_unwind()
            .await;

        match attempt {
            Ok(Ok(analysis)) => analysis,
            Ok(Err(err)) => {
                warn!(class = %err.class(), error = %err, "extraction failed, using fallback analysis");
                fallback_analysis(err.class(), &err.to_string())
            }
            Err(payload) => {
                let reason = panic_message(payload.as_ref());
                warn!(reason = %reason, "extraction panicked, using fallback analysis");
                fallback_analysis(FailureClass::Unexpected, &reason)
            }
        }
    }

    /// The extraction chain without the fallback, for callers that want the error.
    pub async fn try_analyze(
        &self,
        transcript: &str,
        high_stakes: bool,
    ) -> Result<DecisionAnalysis, ExtractionError> {
        let prompts = build_prompts(transcript, high_stakes);
        info!(
            transcript_bytes = transcript.len(),
            high_stakes,
            live = self.client.is_live(),
            "analyzing conversation"
        );

        let raw = tokio::time::timeout(
            self.deadline,
            self.client.extract(&prompts.system, &prompts.user),
        )
        .await
        .map_err(|_| ApiError::Timeout(self.deadline))??;

        let validated = validate_response(&raw)?;
        for (index, quote) in unverified_quotes(validated.as_analysis(), transcript) {
            warn!(index, quote = %quote, "evidence quote not found verbatim in transcript");
        }

        let analysis = adjust_confidence(validated, high_stakes);
        info!(
            decisions = analysis.decisions.len(),
            risks = analysis.risks.len(),
            open_questions = analysis.open_questions.len(),
            "extraction validated"
        );
        Ok(analysis)
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        s.to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "panic during extraction".to_string()
    }
}
