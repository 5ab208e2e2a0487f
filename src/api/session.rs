use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::{Duration, Instant};

use tracing::debug;

use crate::async_worker::AsyncWorker;
use crate::client::{HttpPredictionService, PredictionService};
use crate::session::{Command, EditorSession, Response, Timing};

use super::types::{push_events, QuillEvent, QuillKey, QuillKeyResponse, QuillSnapshot};

/// How soon to poll again while a request is outstanding.
const RESULT_POLL_INTERVAL: Duration = Duration::from_millis(16);

struct Inner {
    session: EditorSession,
    /// Token of the request for the current document, while it is in flight.
    /// Older requests may still be running; their results are dropped as stale.
    awaiting: Option<u64>,
}

/// Thread-safe session for hosts: wall clock + background worker around an
/// `EditorSession`.
#[derive(uniffi::Object)]
pub struct QuillSession {
    inner: Mutex<Inner>,
    worker: AsyncWorker,
}

#[uniffi::export]
impl QuillSession {
    /// Create a session talking to `endpoint`, or to the configured endpoint
    /// when `None`.
    #[uniffi::constructor]
    pub fn new(endpoint: Option<String>) -> Arc<Self> {
        let settings = crate::settings::settings();
        let endpoint = endpoint.unwrap_or_else(|| settings.prediction.endpoint.clone());
        let service = HttpPredictionService::with_timeout(endpoint, settings.request_timeout());
        Self::with_service(Arc::new(service), settings.timing())
    }

    /// The document now reads `text`.
    pub fn edit(&self, text: String) -> QuillKeyResponse {
        self.run(Command::EditText(text))
    }

    pub fn handle_key(&self, key: QuillKey) -> QuillKeyResponse {
        let now = Instant::now();
        let mut inner = self.lock();
        let resp = inner.session.handle_key(key.into(), now);
        self.finish(&mut inner, vec![resp], now)
    }

    /// Pick suggestion `index` directly (pointer click).
    pub fn choose(&self, index: u32) -> QuillKeyResponse {
        self.run(Command::Choose(index as usize))
    }

    /// Fire due timers and apply finished predictions.
    /// Returns `None` when there is nothing to do now or later.
    pub fn poll(&self) -> Option<QuillKeyResponse> {
        let now = Instant::now();
        let mut inner = self.lock();
        let mut responses = vec![inner.session.poll_timers(now)];

        while let Some(result) = self.worker.try_recv() {
            if inner.awaiting == Some(result.generation) {
                inner.awaiting = None;
            }
            if let Some(resp) = inner
                .session
                .receive_predictions(result.generation, result.predictions)
            {
                responses.push(resp);
            }
        }

        let resp = self.finish(&mut inner, responses, now);
        if resp.events.is_empty() {
            None
        } else {
            Some(resp)
        }
    }

    /// Cancel timers and stop all further processing. Safe to call twice.
    pub fn teardown(&self) {
        let now = Instant::now();
        let mut inner = self.lock();
        inner.session.handle(Command::Teardown, now);
        inner.awaiting = None;
    }

    pub fn snapshot(&self) -> QuillSnapshot {
        let inner = self.lock();
        QuillSnapshot {
            document: inner.session.document().to_string(),
            suggestions: inner.session.suggestions().to_vec(),
            selected: inner.session.selection().as_i32(),
            typing: inner.session.is_typing(),
        }
    }
}

impl QuillSession {
    /// Create a session with an explicit prediction service and timing.
    pub fn with_service(service: Arc<dyn PredictionService>, timing: Timing) -> Arc<Self> {
        Arc::new(Self {
            inner: Mutex::new(Inner {
                session: EditorSession::new(timing),
                awaiting: None,
            }),
            worker: AsyncWorker::new(service),
        })
    }

    fn lock(&self) -> MutexGuard<'_, Inner> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn run(&self, command: Command) -> QuillKeyResponse {
        let now = Instant::now();
        let mut inner = self.lock();
        let resp = inner.session.handle(command, now);
        self.finish(&mut inner, vec![resp], now)
    }

    /// Submit due requests and turn the responses into host events.
    fn finish(&self, inner: &mut Inner, responses: Vec<Response>, now: Instant) -> QuillKeyResponse {
        let generation = inner.session.generation();
        if inner.awaiting.is_some_and(|token| token != generation) {
            inner.awaiting = None;
        }

        let mut consumed = false;
        let mut events = Vec::new();
        for mut resp in responses {
            consumed |= resp.consumed;
            if let Some(req) = resp.request.take() {
                debug!(token = req.token, "submitting prediction request");
                inner.awaiting = Some(req.token);
                self.worker.submit(req.text, req.token);
            }
            push_events(resp, &mut events);
        }

        if let Some(after) = next_poll(inner, now) {
            events.push(QuillEvent::SchedulePoll {
                after_ms: after.as_millis() as u64,
            });
        }

        QuillKeyResponse { consumed, events }
    }
}

fn next_poll(inner: &Inner, now: Instant) -> Option<Duration> {
    let timer = inner
        .session
        .next_deadline()
        .map(|deadline| deadline.saturating_duration_since(now));
    let result = inner.awaiting.map(|_| RESULT_POLL_INTERVAL);
    match (timer, result) {
        (Some(a), Some(b)) => Some(a.min(b)),
        (a, b) => a.or(b),
    }
}
