use std::time::Duration;

pub(super) const DEFAULT_PREDICT_DEBOUNCE: Duration = Duration::from_millis(300);
pub(super) const DEFAULT_TYPING_IDLE: Duration = Duration::from_millis(1000);

/// Quiet intervals for the two debounced signals.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Timing {
    /// Quiet period after the last edit before predictions are requested.
    pub predict_debounce: Duration,
    /// Quiet period after the last edit before the typing flag clears.
    pub typing_idle: Duration,
}

impl Default for Timing {
    fn default() -> Self {
        Self {
            predict_debounce: DEFAULT_PREDICT_DEBOUNCE,
            typing_idle: DEFAULT_TYPING_IDLE,
        }
    }
}

/// Everything the host can ask the session to do.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// The document now reads exactly this text.
    EditText(String),
    /// Highlight the next suggestion (Tab).
    Cycle,
    /// Splice the highlighted suggestion into the document (Enter).
    Accept,
    /// Splice the suggestion at this index, highlighted or not (pointer pick).
    Choose(usize),
    /// Cancel all timers and stop reacting to anything.
    Teardown,
}

/// Raw keys the session understands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    Tab,
    Enter,
    Other,
}

/// Which suggestion is highlighted.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Selection {
    #[default]
    Unselected,
    Selected(usize),
}

/// Suggestion panel action: exactly one of three states.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SuggestionAction {
    /// Leave the panel as-is.
    Keep,
    /// Show or update the panel.
    Show {
        items: Vec<String>,
        selected: Option<usize>,
    },
    /// Hide the panel.
    Hide,
}

/// A prediction request the caller must run off the event loop.
/// `token` is the session generation the request was issued for; hand it back
/// with the result so stale answers can be told apart.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PredictionRequest {
    pub text: String,
    pub token: u64,
}

/// Response from handle / poll_timers / receive_predictions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Response {
    /// Whether the key was used; when false the host performs its default action.
    pub consumed: bool,
    /// New document text, when the session itself rewrote it.
    pub document: Option<String>,
    pub suggestions: SuggestionAction,
    /// Typing flag: `Some(active)` on change, `None` = no change.
    pub typing: Option<bool>,
    pub request: Option<PredictionRequest>,
}

impl Response {
    pub(super) fn not_consumed() -> Self {
        Self {
            consumed: false,
            document: None,
            suggestions: SuggestionAction::Keep,
            typing: None,
            request: None,
        }
    }

    pub(super) fn consumed() -> Self {
        Self {
            consumed: true,
            ..Self::not_consumed()
        }
    }

    /// True when the response carries nothing for the host to act on.
    pub fn is_empty(&self) -> bool {
        !self.consumed
            && self.document.is_none()
            && self.suggestions == SuggestionAction::Keep
            && self.typing.is_none()
            && self.request.is_none()
    }
}
