//! Opt-in JSON tracing for hosts and `quilltool`.
//!
//! Built only with the `trace` feature; otherwise [`init_tracing`] does
//! nothing and `tracing` itself compiles to no-ops.

/// Environment variable holding an `EnvFilter` directive that overrides
/// [`DEFAULT_FILTER`].
pub const LOG_ENV: &str = "QUILL_LOG";

/// Engine spans and events at debug, HTTP client chatter only when it warns.
pub const DEFAULT_FILTER: &str = "quill_engine=debug,ureq=warn";

#[cfg(feature = "trace")]
mod imp {
    use std::path::Path;
    use std::sync::Once;

    use tracing_subscriber::fmt::format::FmtSpan;
    use tracing_subscriber::EnvFilter;

    use super::{DEFAULT_FILTER, LOG_ENV};

    static INIT: Once = Once::new();

    fn env_filter() -> EnvFilter {
        EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER))
    }

    pub fn init_tracing(log_dir: &Path) {
        INIT.call_once(|| {
            if let Err(e) = std::fs::create_dir_all(log_dir) {
                eprintln!("quill_engine: cannot create {}: {e}", log_dir.display());
                return;
            }
            let file_appender = tracing_appender::rolling::never(log_dir, "quill-trace.jsonl");
            let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);
            std::mem::forget(guard); // flushes for the life of the process

            // Requests run on `quill-predict-<token>` threads
            let installed = tracing_subscriber::fmt()
                .json()
                .with_writer(non_blocking)
                .with_thread_names(true)
                .with_span_events(FmtSpan::CLOSE)
                .with_env_filter(env_filter())
                .try_init();
            if installed.is_err() {
                eprintln!("quill_engine: a tracing subscriber is already installed");
            }
        });
    }
}

/// Write JSON traces to `quill-trace.jsonl` inside `log_dir`, creating the
/// directory if needed. Only the first call has any effect.
#[cfg(feature = "trace")]
pub fn init_tracing(log_dir: &std::path::Path) {
    imp::init_tracing(log_dir);
}

#[cfg(not(feature = "trace"))]
pub fn init_tracing(_log_dir: &std::path::Path) {}
