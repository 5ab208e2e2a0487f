//! Global settings loaded from TOML.
//!
//! - `init_custom(toml_content)` sets a custom TOML before first `settings()` call
//! - `settings()` returns `&'static Settings` (lazy-init singleton)
//! - Default values are embedded via `include_str!("default_settings.toml")`

use std::sync::OnceLock;
use std::time::Duration;

use serde::Deserialize;

use crate::session::Timing;

pub const DEFAULT_SETTINGS_TOML: &str = include_str!("default_settings.toml");

static CUSTOM_TOML: OnceLock<String> = OnceLock::new();

/// Set custom TOML before first `settings()` call.
pub fn init_custom(toml_content: String) -> Result<(), SettingsError> {
    parse_settings_toml(&toml_content)?;
    CUSTOM_TOML
        .set(toml_content)
        .map_err(|_| SettingsError::AlreadyInitialized)
}

/// Get or initialize the global settings singleton.
pub fn settings() -> &'static Settings {
    static INSTANCE: OnceLock<Settings> = OnceLock::new();
    INSTANCE.get_or_init(|| {
        let toml_str = CUSTOM_TOML
            .get()
            .map(|s| s.as_str())
            .unwrap_or(DEFAULT_SETTINGS_TOML);
        // init_custom validated the custom TOML; the embedded default is covered by tests.
        parse_settings_toml(toml_str).unwrap_or_else(|_| Settings::fallback())
    })
}

/// Returns the embedded default settings TOML content.
pub fn default_toml() -> &'static str {
    DEFAULT_SETTINGS_TOML
}

#[derive(Debug, thiserror::Error)]
pub enum SettingsError {
    #[error("TOML parse error: {0}")]
    Parse(String),
    #[error("invalid value for {field}: {reason}")]
    InvalidValue { field: String, reason: String },
    #[error("settings already initialized")]
    AlreadyInitialized,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    pub prediction: PredictionSettings,
    pub timing: TimingSettings,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PredictionSettings {
    pub endpoint: String,
    pub timeout_ms: u64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TimingSettings {
    pub predict_debounce_ms: u64,
    pub typing_idle_ms: u64,
}

impl Settings {
    fn fallback() -> Self {
        let timing = Timing::default();
        Self {
            prediction: PredictionSettings {
                endpoint: crate::client::DEFAULT_ENDPOINT.to_string(),
                timeout_ms: crate::client::DEFAULT_TIMEOUT.as_millis() as u64,
            },
            timing: TimingSettings {
                predict_debounce_ms: timing.predict_debounce.as_millis() as u64,
                typing_idle_ms: timing.typing_idle.as_millis() as u64,
            },
        }
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_millis(self.prediction.timeout_ms)
    }

    /// Quiet intervals for a new session.
    pub fn timing(&self) -> Timing {
        Timing {
            predict_debounce: Duration::from_millis(self.timing.predict_debounce_ms),
            typing_idle: Duration::from_millis(self.timing.typing_idle_ms),
        }
    }
}

pub fn parse_settings_toml(toml_str: &str) -> Result<Settings, SettingsError> {
    let s: Settings = toml::from_str(toml_str).map_err(|e| SettingsError::Parse(e.to_string()))?;
    validate(&s)?;
    Ok(s)
}

fn validate(s: &Settings) -> Result<(), SettingsError> {
    macro_rules! check_positive {
        ($section:ident . $field:ident) => {
            if s.$section.$field == 0 {
                return Err(SettingsError::InvalidValue {
                    field: concat!(stringify!($section), ".", stringify!($field)).to_string(),
                    reason: "must be positive".to_string(),
                });
            }
        };
    }

    check_positive!(prediction.timeout_ms);
    check_positive!(timing.predict_debounce_ms);
    check_positive!(timing.typing_idle_ms);

    let endpoint = s.prediction.endpoint.trim();
    if !(endpoint.starts_with("http://") || endpoint.starts_with("https://")) {
        return Err(SettingsError::InvalidValue {
            field: "prediction.endpoint".to_string(),
            reason: "must be an http:// or https:// URL".to_string(),
        });
    }

    Ok(())
}
