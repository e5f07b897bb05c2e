//! Drives a selection through pending, classification and rendering.

use std::sync::Arc;

use shared::domain::RequestSeq;
use tracing::{debug, info};

use crate::{
    classifier::ClassificationEndpoint,
    display::{RequestToken, ResultDisplay},
    history::HistoryEntry,
    outcome::{normalize, ClassificationOutcome},
    upload::UploadRequest,
};

/// What happened to one presentation once it settled.
#[derive(Debug, Clone, PartialEq)]
pub struct Presentation {
    pub seq: RequestSeq,
    pub outcome: ClassificationOutcome,
    /// False when a later presentation had already been started.
    pub displayed: bool,
}

pub struct SubmissionController {
    endpoint: Arc<dyn ClassificationEndpoint>,
    display: Arc<ResultDisplay>,
}

impl SubmissionController {
    pub fn new(endpoint: Arc<dyn ClassificationEndpoint>, display: Arc<ResultDisplay>) -> Self {
        Self { endpoint, display }
    }

    pub fn display(&self) -> &Arc<ResultDisplay> {
        &self.display
    }

    /// Handles a file-selection event. An empty selection changes nothing;
    /// only the first file of a multi-file selection is submitted.
    pub async fn on_files_selected(&self, files: Vec<UploadRequest>) -> Option<Presentation> {
        let mut files = files.into_iter();
        let Some(upload) = files.next() else {
            debug!("controller: empty file selection ignored");
            return None;
        };
        let ignored = files.len();
        if ignored > 0 {
            debug!(ignored, "controller: extra selected files ignored");
        }
        Some(self.submit(upload).await)
    }

    pub async fn submit(&self, upload: UploadRequest) -> Presentation {
        let token = self.display.begin().await;
        info!(
            seq = token.seq().0,
            filename = upload.filename(),
            "controller: submission started"
        );
        let outcome = normalize(self.endpoint.classify(&upload).await);
        self.present(token, outcome).await
    }

    /// Shows a demo record through the same path as a live result. It takes
    /// a sequence token too, so it supersedes any request still in flight.
    pub async fn select_history(&self, entry: &HistoryEntry) -> Presentation {
        let token = self.display.begin().await;
        debug!(seq = token.seq().0, id = %entry.id, "controller: history entry selected");
        self.present(token, ClassificationOutcome::from(entry)).await
    }

    async fn present(&self, token: RequestToken, outcome: ClassificationOutcome) -> Presentation {
        let seq = token.seq();
        let displayed = self.display.settle(token, &outcome).await;
        info!(
            seq = seq.0,
            success = outcome.is_success(),
            displayed,
            "controller: presentation settled"
        );
        Presentation {
            seq,
            outcome,
            displayed,
        }
    }
}

#[cfg(test)]
#[path = "tests/controller_tests.rs"]
mod tests;
