//! Stateful typing session: debounced prediction requests, suggestion
//! selection, and splicing accepted suggestions into the document.
//!
//! `EditorSession` owns every piece of interaction state and never blocks or
//! performs I/O. Time is passed in by the caller, and prediction requests are
//! handed out in the response for the caller to run; finished results come
//! back through `receive_predictions`.

mod selection;
mod splice;
mod types;

#[cfg(test)]
mod tests;

use std::time::Instant;

use tracing::{debug, debug_span};

use crate::client::needs_request;
use crate::debounce::Debouncer;

pub use splice::splice;
pub use types::{
    Command, Key, PredictionRequest, Response, Selection, SuggestionAction, Timing,
};

/// Single owned engine instance for one input surface.
pub struct EditorSession {
    document: String,
    suggestions: Vec<String>,
    selection: Selection,
    typing_active: bool,

    predict_timer: Debouncer,
    typing_timer: Debouncer,
    /// Pending request token. Bumped on every edit, so results issued for
    /// an older document no longer match.
    generation: u64,

    torn_down: bool,
}

impl EditorSession {
    pub fn new(timing: Timing) -> Self {
        Self {
            document: String::new(),
            suggestions: Vec::new(),
            selection: Selection::Unselected,
            typing_active: false,
            predict_timer: Debouncer::new(timing.predict_debounce),
            typing_timer: Debouncer::new(timing.typing_idle),
            generation: 0,
            torn_down: false,
        }
    }

    pub fn document(&self) -> &str {
        &self.document
    }

    pub fn suggestions(&self) -> &[String] {
        &self.suggestions
    }

    pub fn selection(&self) -> Selection {
        self.selection
    }

    pub fn is_typing(&self) -> bool {
        self.typing_active
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn is_torn_down(&self) -> bool {
        self.torn_down
    }

    /// Earliest instant at which `poll_timers` has something to do.
    pub fn next_deadline(&self) -> Option<Instant> {
        match (self.predict_timer.deadline(), self.typing_timer.deadline()) {
            (Some(a), Some(b)) => Some(a.min(b)),
            (a, b) => a.or(b),
        }
    }

    /// Apply one command. Never fails; invalid commands come back unconsumed.
    pub fn handle(&mut self, command: Command, now: Instant) -> Response {
        let _span = debug_span!("handle", ?command, generation = self.generation).entered();
        if self.torn_down {
            return Response::not_consumed();
        }
        match command {
            Command::EditText(text) => self.edit(text, now),
            Command::Cycle => self.cycle(),
            Command::Accept => self.accept(now),
            Command::Choose(index) => self.choose(index, now),
            Command::Teardown => self.teardown(),
        }
    }

    /// Map a raw key to its command. Unknown keys are left to the host.
    pub fn handle_key(&mut self, key: Key, now: Instant) -> Response {
        match key {
            Key::Tab => self.handle(Command::Cycle, now),
            Key::Enter => self.handle(Command::Accept, now),
            Key::Other => Response::not_consumed(),
        }
    }

    /// Fire whichever timers are due at `now`.
    pub fn poll_timers(&mut self, now: Instant) -> Response {
        let mut resp = Response::not_consumed();
        if self.torn_down {
            return resp;
        }

        if self.typing_timer.fire(now).is_some() && self.typing_active {
            self.typing_active = false;
            resp.typing = Some(false);
        }

        if self.predict_timer.fire(now).is_some() {
            if needs_request(&self.document) {
                debug!(token = self.generation, text = %self.document, "prediction request due");
                resp.request = Some(PredictionRequest {
                    text: self.document.clone(),
                    token: self.generation,
                });
            } else {
                self.replace_suggestions(Vec::new(), &mut resp);
            }
        }

        resp
    }

    /// Deliver the result of a request. Returns `None` if the token is stale
    /// or the session has been torn down.
    pub fn receive_predictions(&mut self, token: u64, predictions: Vec<String>) -> Option<Response> {
        if self.torn_down {
            return None;
        }
        if token != self.generation {
            debug!(token, current = self.generation, "dropping stale predictions");
            return None;
        }
        let mut resp = Response::not_consumed();
        self.replace_suggestions(predictions, &mut resp);
        Some(resp)
    }

    fn edit(&mut self, text: String, now: Instant) -> Response {
        let mut resp = Response::consumed();
        if text == self.document {
            return resp;
        }
        self.document = text;
        self.generation += 1;

        if self.selection != Selection::Unselected {
            self.selection = Selection::Unselected;
            if !self.suggestions.is_empty() {
                resp.suggestions = SuggestionAction::Show {
                    items: self.suggestions.clone(),
                    selected: None,
                };
            }
        }

        self.predict_timer.schedule(now);
        self.typing_timer.schedule(now);
        if !self.typing_active {
            self.typing_active = true;
            resp.typing = Some(true);
        }
        resp
    }

    fn teardown(&mut self) -> Response {
        self.predict_timer.cancel();
        self.typing_timer.cancel();
        // Outstanding requests can no longer match
        self.generation += 1;
        self.torn_down = true;
        debug!("session torn down");
        Response::consumed()
    }

    /// Replace the suggestion list wholesale; selection always resets.
    fn replace_suggestions(&mut self, items: Vec<String>, resp: &mut Response) {
        let was_visible = !self.suggestions.is_empty();
        self.suggestions = items;
        self.selection = Selection::Unselected;
        if !self.suggestions.is_empty() {
            resp.suggestions = SuggestionAction::Show {
                items: self.suggestions.clone(),
                selected: None,
            };
        } else if was_visible {
            resp.suggestions = SuggestionAction::Hide;
        }
    }
}

impl Default for EditorSession {
    fn default() -> Self {
        Self::new(Timing::default())
    }
}
