use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    Network,
    Server,
    Application,
    MalformedResponse,
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ErrorKind::Network => "network",
            ErrorKind::Server => "server",
            ErrorKind::Application => "application",
            ErrorKind::MalformedResponse => "malformed_response",
        };
        f.write_str(name)
    }
}

/// Why a classification request did not yield a prediction.
///
/// The variants stay distinct for logging even though only `Application`
/// reaches the user with its own text.
#[derive(Debug, Clone, Error)]
pub enum SubmissionError {
    #[error("classification endpoint unreachable: {detail}")]
    Network { detail: String },
    #[error("classification endpoint returned HTTP {status}{}", detail_suffix(.detail))]
    Server { status: u16, detail: Option<String> },
    #[error("classification endpoint reported an error: {message}")]
    Application { message: String },
    #[error("malformed classification response: {detail}")]
    MalformedResponse { detail: String },
}

fn detail_suffix(detail: &Option<String>) -> String {
    detail
        .as_deref()
        .map(|detail| format!(": {detail}"))
        .unwrap_or_default()
}

impl SubmissionError {
    pub fn network(detail: impl Into<String>) -> Self {
        Self::Network {
            detail: detail.into(),
        }
    }

    pub fn malformed(detail: impl Into<String>) -> Self {
        Self::MalformedResponse {
            detail: detail.into(),
        }
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            SubmissionError::Network { .. } => ErrorKind::Network,
            SubmissionError::Server { .. } => ErrorKind::Server,
            SubmissionError::Application { .. } => ErrorKind::Application,
            SubmissionError::MalformedResponse { .. } => ErrorKind::MalformedResponse,
        }
    }
}
