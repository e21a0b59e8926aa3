use crate::config::Settings;

/// Load and validate settings. A broken config never stops startup: the
/// defaults are used and the reason is returned so it can be logged once
/// logging is up.
pub fn load_settings() -> (Settings, Option<String>) {
    let problem = match Settings::load() {
        Ok(s) => match s.validate() {
            Ok(()) => return (s, None),
            Err(msg) => format!("invalid config, using defaults: {msg}"),
        },
        Err(e) => format!("failed to load config, using defaults: {e}"),
    };

    eprintln!("miniplay: {problem}");
    (Settings::default(), Some(problem))
}
