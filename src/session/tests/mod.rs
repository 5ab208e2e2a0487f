
use std::time::{Duration, Instant};

use super::{Command, EditorSession, PredictionRequest, Response, Timing};

pub(super) const MS: Duration = Duration::from_millis(1);

pub(super) fn new_session() -> EditorSession {
    EditorSession::new(Timing::default())
}

// Helper: simulate typing a string one character at a time, `gap` apart.
// Returns the instant of the last keystroke.
pub(super) fn type_string(
    session: &mut EditorSession,
    start: Instant,
    s: &str,
    gap: Duration,
) -> Instant {
    let mut now = start;
    let mut doc = session.document().to_string();
    for (i, ch) in s.chars().enumerate() {
        if i > 0 {
            now += gap;
        }
        doc.push(ch);
        session.handle(Command::EditText(doc.clone()), now);
    }
    now
}

// Helper: poll at `now` and return the request that fired, if any.
pub(super) fn fire_request(session: &mut EditorSession, now: Instant) -> Option<PredictionRequest> {
    session.poll_timers(now).request
}

// Helper: put `text` in the document and complete its request with `items`.
// Returns the instant the result was delivered.
pub(super) fn with_suggestions(
    session: &mut EditorSession,
    start: Instant,
    text: &str,
    items: &[&str],
) -> Instant {
    session.handle(Command::EditText(text.to_string()), start);
    let fired_at = start + 300 * MS;
    let req = fire_request(session, fired_at).expect("request should fire after the quiet period");
    let items = items.iter().map(|s| s.to_string()).collect();
    let resp: Option<Response> = session.receive_predictions(req.token, items);
    assert!(resp.is_some());
    fired_at
}
