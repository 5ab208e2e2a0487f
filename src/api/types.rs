use serde::Serialize;

use crate::session::{Key, Response, SuggestionAction};

// ---------------------------------------------------------------------------
// Error
// ---------------------------------------------------------------------------

#[derive(Debug, thiserror::Error, uniffi::Error)]
pub enum QuillError {
    #[error("IO error: {msg}")]
    Io { msg: String },
    #[error("invalid data: {msg}")]
    InvalidData { msg: String },
}

// ---------------------------------------------------------------------------
// Records (value types, copied across FFI boundary)
// ---------------------------------------------------------------------------

/// Read-only view of everything a host needs to render.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, uniffi::Record)]
pub struct QuillSnapshot {
    pub document: String,
    pub suggestions: Vec<String>,
    /// `-1` when no suggestion is highlighted.
    pub selected: i32,
    pub typing: bool,
}

/// Event-driven response from edit / handle_key / choose / poll.
#[derive(Debug, uniffi::Record)]
pub struct QuillKeyResponse {
    pub consumed: bool,
    pub events: Vec<QuillEvent>,
}

// ---------------------------------------------------------------------------
// Enums
// ---------------------------------------------------------------------------

#[derive(Clone, Copy, Debug, PartialEq, Eq, uniffi::Enum)]
pub enum QuillKey {
    Tab,
    Enter,
    Other,
}

impl From<QuillKey> for Key {
    fn from(key: QuillKey) -> Self {
        match key {
            QuillKey::Tab => Key::Tab,
            QuillKey::Enter => Key::Enter,
            QuillKey::Other => Key::Other,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, uniffi::Enum)]
pub enum QuillEvent {
    SetDocument { text: String },
    ShowSuggestions { items: Vec<String>, selected: i32 },
    HideSuggestions,
    TypingChanged { active: bool },
    SchedulePoll { after_ms: u64 },
}

// ---------------------------------------------------------------------------
// Conversion helpers
// ---------------------------------------------------------------------------

pub(super) fn push_events(resp: Response, events: &mut Vec<QuillEvent>) {
    // 1. Document
    if let Some(text) = resp.document {
        events.push(QuillEvent::SetDocument { text });
    }

    // 2. Suggestions
    match resp.suggestions {
        SuggestionAction::Show { items, selected } => {
            let selected = selected.map_or(-1, |i| i32::try_from(i).unwrap_or(i32::MAX));
            events.push(QuillEvent::ShowSuggestions { items, selected });
        }
        SuggestionAction::Hide => events.push(QuillEvent::HideSuggestions),
        SuggestionAction::Keep => {}
    }

    // 3. Typing indicator
    if let Some(active) = resp.typing {
        events.push(QuillEvent::TypingChanged { active });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::PredictionRequest;

    #[test]
    fn test_event_order() {
        let resp = Response {
            consumed: true,
            document: Some("I lo love ".to_string()),
            suggestions: SuggestionAction::Hide,
            typing: Some(true),
            request: Some(PredictionRequest {
                text: "ignored".to_string(),
                token: 1,
            }),
        };
        let mut events = Vec::new();
        push_events(resp, &mut events);
        assert_eq!(
            events,
            vec![
                QuillEvent::SetDocument {
                    text: "I lo love ".to_string()
                },
                QuillEvent::HideSuggestions,
                QuillEvent::TypingChanged { active: true },
            ]
        );
    }

    #[test]
    fn test_unselected_maps_to_minus_one() {
        let resp = Response {
            consumed: false,
            document: None,
            suggestions: SuggestionAction::Show {
                items: vec!["love".to_string()],
                selected: None,
            },
            typing: None,
            request: None,
        };
        let mut events = Vec::new();
        push_events(resp, &mut events);
        assert_eq!(
            events,
            vec![QuillEvent::ShowSuggestions {
                items: vec!["love".to_string()],
                selected: -1,
            }]
        );
    }

    #[test]
    fn test_huge_index_saturates() {
        let resp = Response {
            consumed: true,
            document: None,
            suggestions: SuggestionAction::Show {
                items: Vec::new(),
                selected: Some(usize::MAX),
            },
            typing: None,
            request: None,
        };
        let mut events = Vec::new();
        push_events(resp, &mut events);
        assert_eq!(
            events,
            vec![QuillEvent::ShowSuggestions {
                items: Vec::new(),
                selected: i32::MAX,
            }]
        );
    }
}
