//! Configuration loading from file system

use std::path::{Path, PathBuf};

use tracing::{info, instrument, warn};

use super::defaults::DEFAULT_CONFIG_PATH;
use super::types::Config;

/// Load configuration from ~/.flash-expand/config.json
///
/// Returns Config::default() if the file is missing, unreadable, malformed
/// or fails validation.
pub fn load_config() -> Config {
    let config_path = PathBuf::from(shellexpand::tilde(DEFAULT_CONFIG_PATH).as_ref());
    load_config_from(&config_path)
}

/// Load configuration from an explicit path, falling back to defaults.
#[instrument(name = "load_config")]
pub fn load_config_from(config_path: &Path) -> Config {
    if !config_path.exists() {
        info!(path = %config_path.display(), "Config file not found, using defaults");
        return Config::default();
    }

    let content = match std::fs::read_to_string(config_path) {
        Ok(content) => content,
        Err(e) => {
            warn!(error = %e, path = %config_path.display(), "Failed to read config, using defaults");
            return Config::default();
        }
    };

    let config = match serde_json::from_str::<Config>(&content) {
        Ok(config) => config,
        Err(e) => {
            let error_hint = if e.to_string().contains("invalid type: string") {
                "\n\nHint: 'trigger' must be a single character, e.g. \"trigger\": \"/\""
            } else if e.to_string().contains("unknown variant") {
                "\n\nHint: key names use DOM spelling: \"ArrowDown\", \"Enter\", \"Tab\", \"Escape\""
            } else {
                ""
            };
            warn!(
                error = %e,
                hint = %error_hint,
                "Failed to parse config JSON, using defaults"
            );
            return Config::default();
        }
    };

    if let Err(reason) = config.validate() {
        warn!(reason = %reason, "Invalid config, using defaults");
        return Config::default();
    }

    info!(path = %config_path.display(), "Successfully loaded config");
    config
}
