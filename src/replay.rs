//! Scripted host events for exercising a live session.
//!
//! One step per line:
//!
//! ```text
//! # comment
//! type I lo     append "I lo" to the document, one edit per character
//! set hello     replace the document
//! tab           cycle
//! enter         accept
//! choose 1      pick suggestion 1
//! wait 400      keep polling for 400 ms
//! ```
//!
//! Text after `type ` and `set ` is taken verbatim, trailing spaces included.

use std::fs;
use std::path::Path;
use std::thread;
use std::time::{Duration, Instant};

use crate::api::{QuillKey, QuillSession, QuillSnapshot};

const POLL_SLICE: Duration = Duration::from_millis(5);

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScriptStep {
    Type(String),
    Set(String),
    Tab,
    Enter,
    Choose(u32),
    Wait(Duration),
}

#[derive(Debug, thiserror::Error)]
pub enum ScriptError {
    #[error("{path}: {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },
    #[error("line {line}: {reason}")]
    Parse { line: usize, reason: String },
}

pub fn load_script(path: &Path) -> Result<Vec<ScriptStep>, ScriptError> {
    let content = fs::read_to_string(path).map_err(|source| ScriptError::Io {
        path: path.display().to_string(),
        source,
    })?;
    parse_script(&content)
}

pub fn parse_script(content: &str) -> Result<Vec<ScriptStep>, ScriptError> {
    let mut steps = Vec::new();
    for (i, raw) in content.lines().enumerate() {
        let line = i + 1;
        if raw.trim().is_empty() || raw.trim_start().starts_with('#') {
            continue;
        }
        let (word, rest) = match raw.split_once(' ') {
            Some((w, r)) => (w, r),
            None => (raw, ""),
        };
        let step = match word {
            "type" => ScriptStep::Type(rest.to_string()),
            "set" => ScriptStep::Set(rest.to_string()),
            "tab" => ScriptStep::Tab,
            "enter" => ScriptStep::Enter,
            "choose" => ScriptStep::Choose(parse_number(rest, line)?),
            "wait" => ScriptStep::Wait(Duration::from_millis(parse_number(rest, line)?)),
            other => {
                return Err(ScriptError::Parse {
                    line,
                    reason: format!("unknown step {other:?}"),
                })
            }
        };
        steps.push(step);
    }
    Ok(steps)
}

fn parse_number<T: std::str::FromStr>(s: &str, line: usize) -> Result<T, ScriptError> {
    s.trim().parse().map_err(|_| ScriptError::Parse {
        line,
        reason: format!("expected a number, got {s:?}"),
    })
}

/// Run `steps` against `session` in real time, reporting the snapshot after
/// each step.
pub fn run_script(
    session: &QuillSession,
    steps: &[ScriptStep],
    mut on_step: impl FnMut(&ScriptStep, &QuillSnapshot),
) {
    for step in steps {
        match step {
            ScriptStep::Type(text) => {
                let mut doc = session.snapshot().document;
                for ch in text.chars() {
                    doc.push(ch);
                    session.edit(doc.clone());
                    session.poll();
                }
            }
            ScriptStep::Set(text) => {
                session.edit(text.clone());
            }
            ScriptStep::Tab => {
                session.handle_key(QuillKey::Tab);
            }
            ScriptStep::Enter => {
                session.handle_key(QuillKey::Enter);
            }
            ScriptStep::Choose(index) => {
                session.choose(*index);
            }
            ScriptStep::Wait(duration) => {
                let deadline = Instant::now() + *duration;
                loop {
                    session.poll();
                    let now = Instant::now();
                    if now >= deadline {
                        break;
                    }
                    thread::sleep(POLL_SLICE.min(deadline - now));
                }
            }
        }
        on_step(step, &session.snapshot());
    }
}
