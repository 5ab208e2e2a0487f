use std::time::Instant;

use tracing::debug;

use super::splice::splice;
use super::types::{Response, Selection, SuggestionAction};
use super::EditorSession;

impl Selection {
    pub fn index(self) -> Option<usize> {
        match self {
            Self::Unselected => None,
            Self::Selected(i) => Some(i),
        }
    }

    /// Host-facing form: `-1` when nothing is highlighted. Saturates at
    /// `i32::MAX`.
    pub fn as_i32(self) -> i32 {
        match self {
            Self::Unselected => -1,
            Self::Selected(i) => i32::try_from(i).unwrap_or(i32::MAX),
        }
    }

    /// Advance over a list of `len` suggestions, wrapping at the end.
    /// An empty list leaves the selection unchanged.
    pub fn cycle(self, len: usize) -> Self {
        if len == 0 {
            return self;
        }
        match self {
            Self::Unselected => Self::Selected(0),
            Self::Selected(i) => Self::Selected((i + 1) % len),
        }
    }
}

impl EditorSession {
    pub(super) fn cycle(&mut self) -> Response {
        if self.suggestions.is_empty() {
            return Response::not_consumed();
        }
        self.selection = self.selection.cycle(self.suggestions.len());
        let mut resp = Response::consumed();
        resp.suggestions = SuggestionAction::Show {
            items: self.suggestions.clone(),
            selected: self.selection.index(),
        };
        resp
    }

    pub(super) fn accept(&mut self, now: Instant) -> Response {
        match self.selection {
            Selection::Selected(i) if i < self.suggestions.len() => self.splice_suggestion(i, now),
            _ => Response::not_consumed(),
        }
    }

    pub(super) fn choose(&mut self, index: usize, now: Instant) -> Response {
        if index >= self.suggestions.len() {
            return Response::not_consumed();
        }
        self.splice_suggestion(index, now)
    }

    /// Merge suggestion `index` into the document and re-enter the edit path.
    fn splice_suggestion(&mut self, index: usize, now: Instant) -> Response {
        let suggestion = self.suggestions[index].clone();
        let text = splice(&self.document, &suggestion);
        debug!(%suggestion, "accepting suggestion");

        self.suggestions.clear();
        self.selection = Selection::Unselected;

        let mut resp = self.edit(text, now);
        resp.document = Some(self.document.clone());
        resp.suggestions = SuggestionAction::Hide;
        resp
    }
}
