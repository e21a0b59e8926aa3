use std::{env, path::PathBuf};

use super::schema::Settings;

/// Configuration loading helpers.
///
/// `Settings::load` reads an optional config file, then lets environment
/// variables (prefix `MINIPLAY__`) override it, and falls back to struct defaults.
impl Settings {
    /// Load settings from environment and optional config file.
    pub fn load() -> Result<Self, ::config::ConfigError> {
        let config_path = resolve_config_path();

        let mut builder = ::config::Config::builder();

        if let Some(path) = &config_path {
            builder = builder.add_source(::config::File::from(path.as_path()).required(false));
        }

        builder = builder.add_source(
            ::config::Environment::with_prefix("MINIPLAY")
                .separator("__")
                .try_parsing(true),
        );

        let cfg = builder.build()?;
        let settings: Settings = cfg.try_deserialize()?;
        Ok(settings)
    }

    /// Perform basic validation checks on loaded settings.
    pub fn validate(&self) -> Result<(), String> {
        let v = self.audio.initial_volume;
        if !v.is_finite() || !(0.0..=1.0).contains(&v) {
            return Err("audio.initial_volume must be within 0.0..=1.0".to_string());
        }
        let step = self.audio.volume_step;
        if !step.is_finite() || step <= 0.0 || step > 1.0 {
            return Err("audio.volume_step must be within (0.0, 1.0]".to_string());
        }
        Ok(())
    }

    /// Log file location: `log.path`, else the XDG state directory.
    pub fn log_path(&self) -> Option<PathBuf> {
        self.log.path.clone().or_else(default_log_path)
    }
}

/// Resolve the config path from `MINIPLAY_CONFIG_PATH` or XDG defaults.
pub fn resolve_config_path() -> Option<PathBuf> {
    if let Some(p) = env::var_os("MINIPLAY_CONFIG_PATH") {
        return Some(PathBuf::from(p));
    }
    default_config_path()
}

/// Compute the default config path under `$XDG_CONFIG_HOME/miniplay/config.toml`
/// or `~/.config/miniplay/config.toml` when `XDG_CONFIG_HOME` is not set.
pub fn default_config_path() -> Option<PathBuf> {
    xdg_dir("XDG_CONFIG_HOME", ".config").map(|d| d.join("miniplay").join("config.toml"))
}

/// `$XDG_STATE_HOME/miniplay/miniplay.log` or `~/.local/state/miniplay/miniplay.log`.
pub fn default_log_path() -> Option<PathBuf> {
    xdg_dir("XDG_STATE_HOME", ".local/state").map(|d| d.join("miniplay").join("miniplay.log"))
}

fn xdg_dir(var: &str, home_fallback: &str) -> Option<PathBuf> {
    if let Some(xdg) = env::var_os(var) {
        Some(PathBuf::from(xdg))
    } else {
        env::var_os("HOME").map(|home| PathBuf::from(home).join(home_fallback))
    }
}
