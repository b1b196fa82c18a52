use tracing::warn;

use crate::config;

/// Load and validate the config. Failures fall back to defaults; the reason
/// is returned so it can be logged once logging is up and shown in the
/// status line.
pub fn load_settings() -> (config::Settings, Option<String>) {
    match config::Settings::load() {
        Ok(s) => {
            if let Err(msg) = s.validate() {
                (
                    config::Settings::default(),
                    Some(format!("invalid config, using defaults: {msg}")),
                )
            } else {
                (s, None)
            }
        }
        // Config is optional; failures should not prevent the app from starting.
        Err(e) => (
            config::Settings::default(),
            Some(format!("failed to load config, using defaults: {e}")),
        ),
    }
}

/// Log a config fallback recorded before logging was initialised.
pub fn report_fallback(reason: Option<&str>) {
    if let Some(reason) = reason {
        warn!("{reason}");
    }
}
