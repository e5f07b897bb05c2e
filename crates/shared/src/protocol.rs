use serde::{Deserialize, Serialize};

/// Multipart field the prediction endpoint reads the uploaded image from.
pub const IMAGE_FIELD: &str = "image";

/// Body of a 2xx reply from the prediction endpoint.
///
/// `Error` is tried first, so a body carrying both an `error` field and a
/// prediction is treated as an application-level failure.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PredictResponse {
    Error { error: String },
    Prediction { result: String, confidence: f64 },
}

impl PredictResponse {
    pub fn parse(body: &[u8]) -> Result<Self, serde_json::Error> {
        serde_json::from_slice(body)
    }
}

/// Error body the endpoint sends alongside non-2xx statuses, when it sends one.
#[derive(Debug, Clone, Deserialize)]
pub struct ErrorBody {
    pub error: String,
}
