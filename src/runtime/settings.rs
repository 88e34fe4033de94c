use crate::config::{Settings, SettingsError};

/// Load settings, falling back to defaults when they are missing or invalid.
///
/// Logging is not up yet when this runs, so the problem is handed back for
/// the caller to report.
pub fn load_settings() -> (Settings, Option<SettingsError>) {
    match Settings::load() {
        Ok(s) => match s.validate() {
            Ok(()) => (s, None),
            Err(e) => (Settings::default(), Some(e)),
        },
        // Config is optional; failures should not prevent the app from starting.
        Err(e) => (Settings::default(), Some(e)),
    }
}
