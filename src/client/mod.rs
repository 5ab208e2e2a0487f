//! Prediction client: request policy and the transport seam to the remote
//! prediction service.

mod http;

pub use http::HttpPredictionService;

use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

pub const DEFAULT_ENDPOINT: &str = "http://localhost:5000/predict";
pub const DEFAULT_TIMEOUT: Duration = Duration::from_millis(5000);

/// A remote (or fake) source of completions for a document.
pub trait PredictionService: Send + Sync {
    fn predict(&self, text: &str) -> Result<Vec<String>, PredictError>;
}

#[derive(Debug, thiserror::Error)]
pub enum PredictError {
    #[error("transport error: {0}")]
    Transport(String),
    #[error("prediction service returned status {0}")]
    Status(u16),
    #[error("malformed response: {0}")]
    Decode(String),
}

#[derive(Debug, Serialize)]
pub(crate) struct PredictRequest<'a> {
    pub text: &'a str,
}

#[derive(Debug, Deserialize)]
struct PredictResponse {
    predictions: Vec<String>,
}

/// Whether `text` warrants a network call at all.
///
/// Blank text has nothing to complete, and a trailing space means the last
/// word is already finished.
pub fn needs_request(text: &str) -> bool {
    !text.trim().is_empty() && !text.ends_with(' ')
}

/// Decode a `{"predictions": [...]}` body.
pub fn parse_response(body: &str) -> Result<Vec<String>, PredictError> {
    let resp: PredictResponse =
        serde_json::from_str(body).map_err(|e| PredictError::Decode(e.to_string()))?;
    Ok(resp.predictions)
}

/// Fetch suggestions for `text`, degrading every failure to an empty list.
pub fn request_predictions(service: &dyn PredictionService, text: &str) -> Vec<String> {
    if !needs_request(text) {
        return Vec::new();
    }
    match service.predict(text) {
        Ok(predictions) => {
            debug!(count = predictions.len(), "predictions received");
            predictions
        }
        Err(e) => {
            warn!(error = %e, "prediction request failed");
            Vec::new()
        }
    }
}
