use async_trait::async_trait;
use reqwest::{
    multipart::{Form, Part},
    Client,
};
use shared::{
    error::SubmissionError,
    protocol::{ErrorBody, PredictResponse, IMAGE_FIELD},
};
use tracing::{debug, info};
use url::Url;

use crate::upload::UploadRequest;

/// A validated prediction: a label and a confidence in `[0, 1]`.
#[derive(Debug, Clone, PartialEq)]
pub struct Prediction {
    pub label: String,
    pub confidence: f64,
}

impl TryFrom<PredictResponse> for Prediction {
    type Error = SubmissionError;

    fn try_from(response: PredictResponse) -> Result<Self, Self::Error> {
        match response {
            PredictResponse::Error { error } => Err(SubmissionError::Application { message: error }),
            PredictResponse::Prediction { result, confidence } => {
                if !confidence.is_finite() || !(0.0..=1.0).contains(&confidence) {
                    return Err(SubmissionError::malformed(format!(
                        "confidence {confidence} outside [0, 1]"
                    )));
                }
                Ok(Prediction {
                    label: result,
                    confidence,
                })
            }
        }
    }
}

#[async_trait]
pub trait ClassificationEndpoint: Send + Sync {
    async fn classify(&self, upload: &UploadRequest) -> Result<Prediction, SubmissionError>;
}

/// Posts uploads to a remote prediction endpoint.
///
/// No client-side timeout is configured; the remote side decides how long a
/// request may take.
pub struct HttpClassifier {
    http: Client,
    endpoint: Url,
}

impl HttpClassifier {
    pub fn new(endpoint: Url) -> Self {
        Self::with_client(Client::new(), endpoint)
    }

    pub fn with_client(http: Client, endpoint: Url) -> Self {
        Self { http, endpoint }
    }

    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }

    fn build_form(upload: &UploadRequest) -> Result<Form, SubmissionError> {
        let part = Part::bytes(upload.bytes().to_vec())
            .file_name(upload.filename().to_string())
            .mime_str(&upload.mime_type())
            .map_err(|e| SubmissionError::network(format!("failed to build upload: {e}")))?;
        Ok(Form::new().part(IMAGE_FIELD, part))
    }
}

#[async_trait]
impl ClassificationEndpoint for HttpClassifier {
    async fn classify(&self, upload: &UploadRequest) -> Result<Prediction, SubmissionError> {
        let form = Self::build_form(upload)?;
        info!(
            endpoint = %self.endpoint,
            filename = upload.filename(),
            size_bytes = upload.len(),
            "classifier: submitting image"
        );

        let response = self
            .http
            .post(self.endpoint.clone())
            .multipart(form)
            .send()
            .await
            .map_err(|e| SubmissionError::network(e.to_string()))?;

        let status = response.status();
        let body = response
            .bytes()
            .await
            .map_err(|e| SubmissionError::network(format!("failed to read response body: {e}")))?;

        if !status.is_success() {
            let detail = serde_json::from_slice::<ErrorBody>(&body)
                .ok()
                .map(|body| body.error);
            return Err(SubmissionError::Server {
                status: status.as_u16(),
                detail,
            });
        }

        let parsed = PredictResponse::parse(&body)
            .map_err(|e| SubmissionError::malformed(e.to_string()))?;
        let prediction = Prediction::try_from(parsed)?;
        debug!(
            label = %prediction.label,
            confidence = prediction.confidence,
            "classifier: prediction received"
        );
        Ok(prediction)
    }
}

#[cfg(test)]
#[path = "tests/classifier_tests.rs"]
mod tests;
