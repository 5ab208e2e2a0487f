//! Predictive-text interaction engine.
//!
//! Debounces document edits into prediction requests, keeps the returned
//! suggestions and a keyboard-driven selection over them, and splices an
//! accepted suggestion back into the document. Hosts drive it either through
//! [`session::EditorSession`] directly (with their own clock and transport) or
//! through the UniFFI-exported [`api::QuillSession`].

uniffi::setup_scaffolding!();

pub mod api;
mod async_worker;
pub mod client;
pub mod debounce;
pub mod replay;
pub mod session;
pub mod settings;
pub mod trace_init;

pub use client::{HttpPredictionService, PredictError, PredictionService};
pub use session::{
    splice, Command, EditorSession, Key, PredictionRequest, Response, Selection,
    SuggestionAction, Timing,
};
