//! Configuration module.
//!
//! Handles loading, validating, and merging `resize.toml`. Configuration is
//! layered: stock defaults are overridden by a user file, and command-line
//! flags override both.
//!
//! ## Config File Location
//!
//! The CLI reads `--config <path>` when given. Otherwise it looks for
//! `resize.toml` in the working directory and silently uses stock defaults
//! when none exists.
//!
//! ## Configuration Options
//!
//! ```toml
//! # All options are optional - defaults shown below
//!
//! [defaults]
//! width = 0                 # Width argument when --width is not given
//! height = 0                # Height argument when --height is not given
//! units = "pixels"          # "pixels" or "percentage"
//!
//! [processing]
//! filter = "lanczos3"       # nearest | triangle | catmull-rom | gaussian | lanczos3
//! max_processes = 4         # Max parallel workers (omit for auto = CPU cores)
//! ```
//!
//! ## Partial Configuration
//!
//! Config files are sparse. Override just the values you want:
//!
//! ```toml
//! [defaults]
//! units = "percentage"
//! ```
//!
//! Unknown keys are rejected to catch typos early.

use crate::imaging::{Filter, Units};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use thiserror::Error;

/// File name looked up in a directory when no explicit path is given.
pub const CONFIG_FILE_NAME: &str = "resize.toml";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("Config validation error: {0}")]
    Validation(String),
}

/// Configuration loaded from `resize.toml`.
///
/// All fields have defaults. User files need only specify the values they
/// want to override. Unknown keys are rejected.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ResizeConfig {
    /// Argument values used when the caller does not supply them.
    pub defaults: DefaultsConfig,
    /// Engine and worker settings.
    pub processing: ProcessingConfig,
}

impl ResizeConfig {
    /// Validate config values are within acceptable ranges.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let valid = |v: f64| v.is_finite() && v >= 0.0;
        if !valid(self.defaults.width) || !valid(self.defaults.height) {
            return Err(ConfigError::Validation(
                "defaults.width and defaults.height must be >= 0".into(),
            ));
        }
        if self.processing.max_processes == Some(0) {
            return Err(ConfigError::Validation(
                "processing.max_processes must be at least 1".into(),
            ));
        }
        Ok(())
    }
}

/// Default Width/Height/Units arguments.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DefaultsConfig {
    /// Target width; 0 = auto scale.
    pub width: f64,
    /// Target height; 0 = auto scale.
    pub height: f64,
    pub units: Units,
}

impl Default for DefaultsConfig {
    fn default() -> Self {
        Self {
            width: 0.0,
            height: 0.0,
            units: Units::Pixels,
        }
    }
}

/// Engine and parallelism settings.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ProcessingConfig {
    /// Resampling filter used for every resize.
    pub filter: Filter,
    /// Maximum number of parallel workers when resizing several files.
    /// When absent, defaults to the number of CPU cores.
    /// Values larger than the core count are clamped down.
    pub max_processes: Option<usize>,
}

/// Worker count for the batch resize.
///
/// - `None` → use all available cores
/// - `Some(n)` → use `min(n, cores)` (user can constrain down, not up)
pub fn effective_threads(config: &ProcessingConfig) -> usize {
    let cores = std::thread::available_parallelism()
        .map(|n| n.get())
        .unwrap_or(1);
    config.max_processes.map(|n| n.min(cores)).unwrap_or(cores)
}

// =============================================================================
// Config loading, merging, and validation
// =============================================================================

/// `ResizeConfig::default()` as a TOML table; the bottom layer of every merge.
pub fn stock_defaults_value() -> toml::Value {
    toml::Value::try_from(ResizeConfig::default()).expect("default config must serialize")
}

/// Lay `overlay` over `base`. Tables merge per key, any other overlay value
/// replaces the base value outright.
pub fn merge_toml(base: toml::Value, overlay: toml::Value) -> toml::Value {
    match (base, overlay) {
        (toml::Value::Table(mut base_table), toml::Value::Table(overlay_table)) => {
            for (key, overlay_val) in overlay_table {
                let merged = match base_table.remove(&key) {
                    Some(base_val) => merge_toml(base_val, overlay_val),
                    None => overlay_val,
                };
                base_table.insert(key, merged);
            }
            toml::Value::Table(base_table)
        }
        (_, overlay) => overlay,
    }
}

/// Read a config file as a raw TOML value.
pub fn load_raw_config(path: &Path) -> Result<toml::Value, ConfigError> {
    let content = fs::read_to_string(path)?;
    let value: toml::Value = toml::from_str(&content)?;
    Ok(value)
}

/// Apply `overlay` (if any) to `base` and turn the result into a checked config.
pub fn resolve_config(
    base: toml::Value,
    overlay: Option<toml::Value>,
) -> Result<ResizeConfig, ConfigError> {
    let merged = match overlay {
        Some(ov) => merge_toml(base, ov),
        None => base,
    };
    let config: ResizeConfig = merged.try_into()?;
    config.validate()?;
    Ok(config)
}

/// Load an explicitly named config file. A missing file is an error.
pub fn load_config_file(path: &Path) -> Result<ResizeConfig, ConfigError> {
    resolve_config(stock_defaults_value(), Some(load_raw_config(path)?))
}

/// Load `resize.toml` from `dir` if present, stock defaults otherwise.
pub fn load_config(dir: &Path) -> Result<ResizeConfig, ConfigError> {
    let path = dir.join(CONFIG_FILE_NAME);
    let overlay = if path.exists() {
        Some(load_raw_config(&path)?)
    } else {
        None
    };
    resolve_config(stock_defaults_value(), overlay)
}

/// Returns a fully-commented stock `resize.toml` with all keys and explanations.
///
/// Used by the `gen-config` CLI command.
pub fn stock_config_toml() -> &'static str {
    r##"# Resize Image Configuration
# ==========================
# All settings are optional. Remove or comment out any you don't need.
# Values shown below are the defaults.
#
# Command-line flags override anything set here.
# Unknown keys will cause an error.

# ---------------------------------------------------------------------------
# Default arguments
# ---------------------------------------------------------------------------
[defaults]
# Target width. 0 = auto scale from the height, preserving aspect ratio.
width = 0

# Target height. 0 = auto scale from the width, preserving aspect ratio.
# When both are 0 the image is re-encoded at its original size.
height = 0

# How width and height are read: "pixels", or "percentage" of the original.
units = "pixels"

# ---------------------------------------------------------------------------
# Processing
# ---------------------------------------------------------------------------
[processing]
# Resampling filter: "nearest", "triangle", "catmull-rom", "gaussian", "lanczos3".
filter = "lanczos3"

# Maximum parallel workers when resizing several files at once.
# Omit or comment out to auto-detect (= number of CPU cores).
# max_processes = 4
"##
}
