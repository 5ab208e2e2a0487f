use std::sync::{mpsc, Arc, Mutex};
use std::thread;

use tracing::warn;

use crate::client::{request_predictions, PredictionService};

// ---------------------------------------------------------------------------
// Result type
// ---------------------------------------------------------------------------

pub(crate) struct PredictionResult {
    pub generation: u64,
    pub predictions: Vec<String>,
}

// ---------------------------------------------------------------------------
// AsyncWorker
// ---------------------------------------------------------------------------

/// Runs prediction requests off the caller's thread.
///
/// Every submitted request gets its own thread and is sent right away, so a
/// slow answer never holds back a newer request. Results come back tagged
/// with their generation in completion order; deciding which are stale is the
/// session's job.
pub(crate) struct AsyncWorker {
    service: Arc<dyn PredictionService>,
    result_tx: mpsc::Sender<PredictionResult>,
    result_rx: Mutex<mpsc::Receiver<PredictionResult>>,
}

impl AsyncWorker {
    pub fn new(service: Arc<dyn PredictionService>) -> Self {
        let (result_tx, result_rx) = mpsc::channel::<PredictionResult>();
        Self {
            service,
            result_tx,
            result_rx: Mutex::new(result_rx),
        }
    }

    /// Start a request for `text`. If no thread can be spawned the request
    /// fails like any other and yields an empty list.
    pub fn submit(&self, text: String, generation: u64) {
        let service = Arc::clone(&self.service);
        let tx = self.result_tx.clone();
        let spawned = thread::Builder::new()
            .name(format!("quill-predict-{generation}"))
            .spawn(move || {
                let predictions = request_predictions(service.as_ref(), &text);
                // The receiver is gone once the session is dropped
                let _ = tx.send(PredictionResult {
                    generation,
                    predictions,
                });
            });

        if let Err(e) = spawned {
            warn!(generation, error = %e, "failed to spawn prediction thread");
            let _ = self.result_tx.send(PredictionResult {
                generation,
                predictions: Vec::new(),
            });
        }
    }

    pub fn try_recv(&self) -> Option<PredictionResult> {
        let rx = self.result_rx.lock().ok()?;
        rx.try_recv().ok()
    }
}
