//! TOML config file loading and creation.

use crate::schema::WidgetConfig;
use crate::validation;
use hoymiles_common::ConfigError;
use std::path::Path;
use tracing::{info, warn};

/// Load a widget config from a TOML file.
///
/// Missing fields fall back to their serde defaults, so a config that only
/// lists frames is enough. A config that parses but fails validation is
/// replaced by the defaults after logging what was wrong.
pub fn load_from_path(path: &Path) -> Result<WidgetConfig, ConfigError> {
    if !path.exists() {
        return Err(ConfigError::FileNotFound(path.to_path_buf()));
    }

    let content = std::fs::read_to_string(path).map_err(|e| {
        ConfigError::ParseError(format!("failed to read {}: {e}", path.display()))
    })?;

    let config: WidgetConfig = toml::from_str(&content)
        .map_err(|e| ConfigError::ParseError(format!("failed to parse TOML: {e}")))?;

    if let Err(e) = validation::validate(&config) {
        warn!("config validation warning: {e}");
        warn!("falling back to default config");
        return Ok(WidgetConfig::default());
    }

    info!("loaded config from {}", path.display());
    Ok(config)
}

/// Load the config from the OS default location, e.g.
/// `~/.config/mirror-hoymiles/config.toml` on Linux or
/// `~/Library/Application Support/mirror-hoymiles/config.toml` on macOS.
///
/// A missing file is not an error: a commented template is written there
/// and the defaults are returned.
pub fn load_default() -> Result<WidgetConfig, ConfigError> {
    let path = default_config_path()?;

    if !path.exists() {
        info!("no config found at {}, creating default", path.display());
        create_default_config(&path)?;
        return Ok(WidgetConfig::default());
    }

    load_from_path(&path)
}

/// Where `load_default` looks for the config file.
pub fn default_config_path() -> Result<std::path::PathBuf, ConfigError> {
    let config_dir = dirs::config_dir()
        .ok_or_else(|| ConfigError::ParseError("could not determine config directory".into()))?;
    Ok(config_dir.join("mirror-hoymiles").join("config.toml"))
}

/// Write the commented config template to `path`, creating parent
/// directories as needed.
pub fn create_default_config(path: &Path) -> Result<(), ConfigError> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).map_err(|e| {
            ConfigError::ParseError(format!(
                "failed to create config directory {}: {e}",
                parent.display()
            ))
        })?;
    }

    let content = default_config_toml();

    std::fs::write(path, content).map_err(|e| {
        ConfigError::ParseError(format!(
            "failed to write default config to {}: {e}",
            path.display()
        ))
    })?;

    info!("created default config at {}", path.display());
    Ok(())
}

/// The commented template written on first run.
fn default_config_toml() -> String {
    r##"# Mirror-Hoymiles Configuration
# Schema version 1
# Only override what you want to change -- missing fields use defaults.

# Refresh interval in milliseconds. 0 renders once and never again.
# update_interval = 60000

# Identifier namespacing this widget's element ids (HOYMILES-<ident>-<n>).
# Leave empty to let the host assign one.
# ident = ""

# CSS styling applied to every frame.
# width = "100%"
# height = "300px"
# background_color = "black"
# color = "white"

# Frames to display, in order. Each frame needs either `src` (an address
# loaded directly) or `html` (content the worker serves for you).

# [[frames]]
# src = "http://192.168.178.114:5000/"

# [[frames]]
# html = "<p>Panel offline overnight</p>"
"##
    .to_string()
}
