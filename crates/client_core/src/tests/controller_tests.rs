use std::collections::HashMap;

use super::*;
use async_trait::async_trait;
use shared::{
    domain::{Accent, DiagnosisLabel},
    error::SubmissionError,
};
use tokio::sync::{oneshot, Mutex};

use crate::{
    classifier::Prediction, display::UiState, outcome::FALLBACK_FAILURE_MESSAGE,
    render::DisplayFragment,
};

type Reply = Result<Prediction, SubmissionError>;

struct TestEndpoint {
    fixed: Option<Reply>,
    gates: Mutex<HashMap<String, oneshot::Receiver<Reply>>>,
    calls: Mutex<Vec<String>>,
}

impl TestEndpoint {
    fn replying(reply: Reply) -> Self {
        Self {
            fixed: Some(reply),
            gates: Mutex::new(HashMap::new()),
            calls: Mutex::new(Vec::new()),
        }
    }

    fn gated() -> Self {
        Self {
            fixed: None,
            gates: Mutex::new(HashMap::new()),
            calls: Mutex::new(Vec::new()),
        }
    }

    async fn gate(&self, filename: &str) -> oneshot::Sender<Reply> {
        let (tx, rx) = oneshot::channel();
        self.gates.lock().await.insert(filename.to_string(), rx);
        tx
    }
}

#[async_trait]
impl ClassificationEndpoint for TestEndpoint {
    async fn classify(&self, upload: &UploadRequest) -> Result<Prediction, SubmissionError> {
        self.calls.lock().await.push(upload.filename().to_string());
        if let Some(reply) = &self.fixed {
            return reply.clone();
        }
        let gate = self.gates.lock().await.remove(upload.filename());
        match gate {
            Some(rx) => rx
                .await
                .unwrap_or_else(|_| Err(SubmissionError::network("gate dropped"))),
            None => Err(SubmissionError::network("no gate configured")),
        }
    }
}

fn prediction(label: &str, confidence: f64) -> Reply {
    Ok(Prediction {
        label: label.to_string(),
        confidence,
    })
}

fn upload(name: &str) -> UploadRequest {
    UploadRequest::new(name, b"image".to_vec())
}

fn controller_with(endpoint: Arc<TestEndpoint>) -> SubmissionController {
    SubmissionController::new(endpoint, Arc::new(ResultDisplay::new()))
}

#[tokio::test]
async fn successful_submission_renders_diagnosis() {
    let endpoint = Arc::new(TestEndpoint::replying(prediction("Parasitized", 0.9321)));
    let controller = controller_with(endpoint.clone());

    let presentation = controller
        .on_files_selected(vec![upload("cell.png")])
        .await
        .expect("presentation");
    assert!(presentation.displayed);
    assert_eq!(endpoint.calls.lock().await.as_slice(), ["cell.png"]);

    match controller.display().snapshot().await {
        UiState::Rendered { fragment, .. } => assert_eq!(
            fragment,
            DisplayFragment::Diagnosis {
                label: "Parasitized".to_string(),
                confidence_text: "93.21%".to_string(),
                accent: Accent::Positive,
            }
        ),
        other => panic!("unexpected state: {other:?}"),
    }
}

#[tokio::test]
async fn server_failure_renders_fixed_message() {
    let endpoint = Arc::new(TestEndpoint::replying(Err(SubmissionError::Server {
        status: 500,
        detail: Some("Backend Error: cannot identify image file".to_string()),
    })));
    let controller = controller_with(endpoint);

    controller.on_files_selected(vec![upload("cell.png")]).await;

    let state = controller.display().snapshot().await;
    match &state {
        UiState::Errored { fragment, .. } => {
            assert_eq!(fragment.to_string(), FALLBACK_FAILURE_MESSAGE);
            assert!(!fragment.to_string().contains("Backend Error"));
            assert_eq!(fragment.accent(), None);
        }
        other => panic!("unexpected state: {other:?}"),
    }
    assert!(!state.is_pending());
}

#[tokio::test]
async fn application_error_message_is_shown() {
    let endpoint = Arc::new(TestEndpoint::replying(Err(SubmissionError::Application {
        message: "model unavailable".to_string(),
    })));
    let controller = controller_with(endpoint);

    let presentation = controller
        .on_files_selected(vec![upload("cell.png")])
        .await
        .expect("presentation");
    assert_eq!(
        presentation.outcome,
        ClassificationOutcome::failure("model unavailable")
    );
    assert_eq!(
        controller.display().snapshot().await.to_string(),
        "model unavailable"
    );
}

#[tokio::test]
async fn empty_selection_is_a_no_op() {
    let endpoint = Arc::new(TestEndpoint::replying(prediction("Uninfected", 0.5)));
    let controller = controller_with(endpoint.clone());

    assert!(controller.on_files_selected(Vec::new()).await.is_none());
    assert_eq!(controller.display().snapshot().await, UiState::Idle);

    controller.on_files_selected(vec![upload("cell.png")]).await;
    let before = controller.display().snapshot().await;
    assert!(controller.on_files_selected(Vec::new()).await.is_none());
    assert_eq!(controller.display().snapshot().await, before);
    assert_eq!(endpoint.calls.lock().await.len(), 1);
}

#[tokio::test]
async fn only_first_file_of_selection_is_submitted() {
    let endpoint = Arc::new(TestEndpoint::replying(prediction("Uninfected", 0.5)));
    let controller = controller_with(endpoint.clone());

    controller
        .on_files_selected(vec![upload("first.png"), upload("second.png")])
        .await;
    assert_eq!(endpoint.calls.lock().await.as_slice(), ["first.png"]);
}

#[tokio::test]
async fn display_is_pending_while_request_is_in_flight() {
    let endpoint = Arc::new(TestEndpoint::gated());
    let release = endpoint.gate("cell.png").await;
    let controller = controller_with(endpoint);

    let ((), presentation) = tokio::join!(
        async {
            while !controller.display().snapshot().await.is_pending() {
                tokio::task::yield_now().await;
            }
            assert_eq!(
                controller.display().snapshot().await.to_string(),
                "AI Processing..."
            );
            release
                .send(prediction("Uninfected", 0.5))
                .expect("release");
        },
        controller.on_files_selected(vec![upload("cell.png")]),
    );

    assert!(presentation.expect("presentation").displayed);
    assert!(!controller.display().snapshot().await.is_pending());
}

#[tokio::test]
async fn out_of_order_settlement_keeps_latest_initiated_result() {
    let endpoint = Arc::new(TestEndpoint::gated());
    let release_first = endpoint.gate("first.png").await;
    let release_second = endpoint.gate("second.png").await;
    let controller = controller_with(endpoint);

    let (first, second, ()) = tokio::join!(
        controller.on_files_selected(vec![upload("first.png")]),
        controller.on_files_selected(vec![upload("second.png")]),
        async {
            release_second
                .send(prediction("Uninfected", 0.61))
                .expect("release second");
            while controller.display().snapshot().await.is_pending() {
                tokio::task::yield_now().await;
            }
            release_first
                .send(prediction("Parasitized", 0.97))
                .expect("release first");
        },
    );

    let first = first.expect("first presentation");
    let second = second.expect("second presentation");
    assert!(first.seq < second.seq);
    assert!(second.displayed);
    assert!(!first.displayed);

    match controller.display().snapshot().await {
        UiState::Rendered { seq, fragment } => {
            assert_eq!(seq, second.seq);
            assert_eq!(fragment.to_string(), "Result: Uninfected\nConfidence: 61.00%");
        }
        other => panic!("unexpected state: {other:?}"),
    }
}

#[tokio::test]
async fn history_selection_renders_like_live_result() {
    let endpoint = Arc::new(TestEndpoint::replying(prediction("Parasitized", 0.9)));
    let controller = controller_with(endpoint);

    let entry = HistoryEntry {
        id: "SMP-0000002A".to_string(),
        label: DiagnosisLabel::Parasitized,
        confidence: 90,
    };
    controller.select_history(&entry).await;
    let from_history = controller.display().snapshot().await.fragment().cloned();

    controller.on_files_selected(vec![upload("cell.png")]).await;
    let from_live = controller.display().snapshot().await.fragment().cloned();

    assert!(from_history.is_some());
    assert_eq!(from_history, from_live);
}

#[tokio::test]
async fn history_selection_supersedes_in_flight_request() {
    let endpoint = Arc::new(TestEndpoint::gated());
    let release = endpoint.gate("cell.png").await;
    let controller = controller_with(endpoint);
    let entry = HistoryEntry {
        id: "SMP-00000007".to_string(),
        label: DiagnosisLabel::Uninfected,
        confidence: 88,
    };

    let (live, ()) = tokio::join!(
        controller.on_files_selected(vec![upload("cell.png")]),
        async {
            while !controller.display().snapshot().await.is_pending() {
                tokio::task::yield_now().await;
            }
            let shown = controller.select_history(&entry).await;
            assert!(shown.displayed);
            release
                .send(prediction("Parasitized", 0.99))
                .expect("release");
        },
    );

    assert!(!live.expect("presentation").displayed);
    assert_eq!(
        controller.display().snapshot().await.to_string(),
        "Result: Uninfected\nConfidence: 88.00%"
    );
}
