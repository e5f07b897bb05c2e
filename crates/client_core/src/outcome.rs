use serde::Serialize;
use shared::error::SubmissionError;
use tracing::warn;

use crate::classifier::Prediction;

/// Shown for every failure the user cannot act on beyond retrying.
pub const FALLBACK_FAILURE_MESSAGE: &str = "Analysis Failed. Ensure Backend is running.";

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum ClassificationOutcome {
    Success { label: String, confidence: f64 },
    Failure { reason: String },
}

impl ClassificationOutcome {
    pub fn failure(reason: impl Into<String>) -> Self {
        Self::Failure {
            reason: reason.into(),
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, ClassificationOutcome::Success { .. })
    }
}

impl From<Prediction> for ClassificationOutcome {
    fn from(prediction: Prediction) -> Self {
        Self::Success {
            label: prediction.label,
            confidence: prediction.confidence,
        }
    }
}

impl From<&SubmissionError> for ClassificationOutcome {
    fn from(err: &SubmissionError) -> Self {
        match err {
            SubmissionError::Application { message } => Self::failure(message.clone()),
            SubmissionError::Network { .. }
            | SubmissionError::Server { .. }
            | SubmissionError::MalformedResponse { .. } => Self::failure(FALLBACK_FAILURE_MESSAGE),
        }
    }
}

/// Collapses a settled request into the outcome the renderer understands.
/// The technical detail only goes to the log.
pub fn normalize(result: Result<Prediction, SubmissionError>) -> ClassificationOutcome {
    match result {
        Ok(prediction) => prediction.into(),
        Err(err) => {
            warn!(kind = %err.kind(), error = %err, "classification request failed");
            ClassificationOutcome::from(&err)
        }
    }
}
