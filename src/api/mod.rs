//! UniFFI export layer: type-safe Swift/Kotlin bindings for the engine.
//!
//! Each public type here maps to a generated class, struct, or enum.

mod session;
mod types;

pub use session::QuillSession;
pub use types::{QuillError, QuillEvent, QuillKey, QuillKeyResponse, QuillSnapshot};

use std::path::Path;

// ---------------------------------------------------------------------------
// Top-level functions
// ---------------------------------------------------------------------------

#[uniffi::export]
fn engine_version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}

#[uniffi::export]
fn settings_load_config(path: String) -> Result<(), QuillError> {
    let content = std::fs::read_to_string(&path).map_err(|e| QuillError::Io {
        msg: format!("{path}: {e}"),
    })?;
    crate::settings::init_custom(content)
        .map_err(|e| QuillError::InvalidData { msg: e.to_string() })?;
    Ok(())
}

#[uniffi::export]
fn settings_default_config() -> String {
    crate::settings::default_toml().to_string()
}

#[uniffi::export]
fn trace_init(log_dir: String) {
    crate::trace_init::init_tracing(Path::new(&log_dir));
}

/// Text that accepting `suggestion` would produce.
#[uniffi::export]
fn splice_text(document: String, suggestion: String) -> String {
    crate::session::splice(&document, &suggestion)
}

/// Whether `text` would trigger a prediction request.
#[uniffi::export]
fn needs_prediction(text: String) -> bool {
    crate::client::needs_request(&text)
}
