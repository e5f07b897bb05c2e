//! Client side of the cell classification pipeline: upload a smear image,
//! normalize whatever comes back, and render it onto a single display.

pub mod classifier;
pub mod controller;
pub mod display;
pub mod history;
pub mod outcome;
pub mod render;
pub mod upload;

pub use classifier::{ClassificationEndpoint, HttpClassifier, Prediction};
pub use controller::{Presentation, SubmissionController};
pub use display::{DisplayEvent, RequestToken, ResultDisplay, UiState, PENDING_TEXT};
pub use history::{DemoHistory, HistoryEntry, DEFAULT_HISTORY_SIZE};
pub use outcome::{normalize, ClassificationOutcome, FALLBACK_FAILURE_MESSAGE};
pub use render::{format_confidence, render, DisplayFragment};
pub use upload::UploadRequest;
