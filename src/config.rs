//! Editor configuration.
//!
//! Handles loading, validating, and merging the editor's TOML config file.
//! User files are sparse: they are merged key-by-key on top of the stock
//! defaults, so a file only needs the values it changes.
//!
//! ## Config File Location
//!
//! Passed with `--config <FILE>`; otherwise `image-studio.toml` in the
//! working directory is used when present, and stock defaults when not.
//!
//! ## Configuration Options
//!
//! ```toml
//! # All options are optional - defaults shown below
//!
//! [history]
//! # max_depth = 100        # Undo steps kept (omit for unlimited)
//!
//! [save]
//! jpeg_quality = 95        # JPEG quality (1-100)
//!
//! [display]
//! viewport = [900, 700]    # Preview bounding box, width x height
//!
//! [defaults]
//! blur_intensity = 5       # Used by `blur` without an argument (1-50)
//!
//! [processing]
//! max_processes = 4        # Max parallel batch workers (omit for auto = CPU cores)
//! ```
//!
//! Unknown keys are rejected to catch typos early.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("Config validation error: {0}")]
    Validation(String),
}

/// Name of the config file picked up from the working directory.
pub const DEFAULT_CONFIG_FILE: &str = "image-studio.toml";

/// Editor configuration.
///
/// All fields have sensible defaults. Unknown keys are rejected.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct EditorConfig {
    /// Undo history limits.
    pub history: HistoryConfig,
    /// Encoding settings.
    pub save: SaveConfig,
    /// Preview rendering settings.
    pub display: DisplayConfig,
    /// Values used when a shell command omits its argument.
    pub defaults: DefaultsConfig,
    /// Parallel batch settings.
    pub processing: ProcessingConfig,
}

impl EditorConfig {
    /// Validate config values are within acceptable ranges.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.history.max_depth == Some(0) {
            return Err(ConfigError::Validation(
                "history.max_depth must be at least 1 (omit it for unlimited)".into(),
            ));
        }
        if !(1..=100).contains(&self.save.jpeg_quality) {
            return Err(ConfigError::Validation(
                "save.jpeg_quality must be 1-100".into(),
            ));
        }
        if self.display.viewport[0] == 0 || self.display.viewport[1] == 0 {
            return Err(ConfigError::Validation(
                "display.viewport values must be non-zero".into(),
            ));
        }
        if !(1..=50).contains(&self.defaults.blur_intensity) {
            return Err(ConfigError::Validation(
                "defaults.blur_intensity must be 1-50".into(),
            ));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct HistoryConfig {
    /// Undo snapshots kept per session. `None` keeps all of them; when set,
    /// the oldest snapshot is dropped once the limit is exceeded.
    pub max_depth: Option<usize>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SaveConfig {
    /// JPEG encoding quality (1 = worst, 100 = best).
    pub jpeg_quality: u32,
}

impl Default for SaveConfig {
    fn default() -> Self {
        Self { jpeg_quality: 95 }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DisplayConfig {
    /// Preview bounding box as `[width, height]`. Images are scaled down to
    /// fit, never up.
    pub viewport: [u32; 2],
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            viewport: [900, 700],
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DefaultsConfig {
    /// Blur intensity for a bare `blur` command.
    pub blur_intensity: i64,
}

impl Default for DefaultsConfig {
    fn default() -> Self {
        Self { blur_intensity: 5 }
    }
}

/// Parallel processing settings.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ProcessingConfig {
    /// Maximum number of parallel batch workers.
    /// When absent or null, defaults to the number of CPU cores.
    /// Values larger than the core count are clamped down.
    pub max_processes: Option<usize>,
}

/// Resolve the effective thread count from config.
///
/// - `None` → use all available cores
/// - `Some(n)` → use `min(n, cores)` (user can constrain down, not up)
pub fn effective_threads(config: &ProcessingConfig) -> usize {
    let cores = std::thread::available_parallelism()
        .map(|n| n.get())
        .unwrap_or(1);
    config
        .max_processes
        .map(|n| n.clamp(1, cores))
        .unwrap_or(cores)
}

// =============================================================================
// Config loading, merging, and validation
// =============================================================================

/// Returns the stock default config as a `toml::Value::Table`.
///
/// This is the base layer user overrides are merged onto.
pub fn stock_defaults_value() -> Result<toml::Value, ConfigError> {
    toml::Value::try_from(EditorConfig::default())
        .map_err(|e| ConfigError::Validation(format!("default config must serialize: {e}")))
}

/// Recursively merge `overlay` on top of `base`.
///
/// - Tables are merged key-by-key (overlay keys override base keys).
/// - Non-table values in overlay replace base values entirely.
/// - Keys in base that are not in overlay are preserved.
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

/// Merge an optional overlay onto a base value, then deserialize and validate.
pub fn resolve_config(
    base: toml::Value,
    overlay: Option<toml::Value>,
) -> Result<EditorConfig, ConfigError> {
    let merged = match overlay {
        Some(ov) => merge_toml(base, ov),
        None => base,
    };
    let config: EditorConfig = merged.try_into()?;
    config.validate()?;
    Ok(config)
}

/// Load config from a TOML file, merged onto stock defaults and validated.
pub fn load_config(path: &Path) -> Result<EditorConfig, ConfigError> {
    let content = fs::read_to_string(path)?;
    let overlay: toml::Value = toml::from_str(&content)?;
    resolve_config(stock_defaults_value()?, Some(overlay))
}

/// Load `explicit` if given, else `image-studio.toml` from `dir` if it
/// exists, else stock defaults.
///
/// An explicitly named file must exist; the implicit one is optional.
pub fn discover_config(explicit: Option<&Path>, dir: &Path) -> Result<EditorConfig, ConfigError> {
    if let Some(path) = explicit {
        return load_config(path);
    }
    let implicit = dir.join(DEFAULT_CONFIG_FILE);
    if implicit.exists() {
        load_config(&implicit)
    } else {
        Ok(EditorConfig::default())
    }
}

/// Returns a fully-commented stock config file with all keys and explanations.
///
/// Used by the `gen-config` CLI command.
pub fn stock_config_toml() -> &'static str {
    r##"# image-studio configuration
# ==========================
# All settings are optional. Remove or comment out any you don't need.
# Values shown below are the defaults.
#
# Save as image-studio.toml in the working directory, or pass --config.
# Unknown keys will cause an error.

# ---------------------------------------------------------------------------
# Undo history
# ---------------------------------------------------------------------------
[history]
# Number of undo steps kept per session. Every step holds a full snapshot
# of the image, so capping this bounds memory on long sessions.
# Omit or comment out for unlimited undo.
# max_depth = 100

# ---------------------------------------------------------------------------
# Saving
# ---------------------------------------------------------------------------
[save]
# JPEG encoding quality (1 = worst, 100 = best). PNG and BMP are lossless.
jpeg_quality = 95

# ---------------------------------------------------------------------------
# Preview
# ---------------------------------------------------------------------------
[display]
# Bounding box for previews as [width, height]. Images are scaled down to
# fit while keeping their aspect ratio, never scaled up.
viewport = [900, 700]

# ---------------------------------------------------------------------------
# Shell defaults
# ---------------------------------------------------------------------------
[defaults]
# Intensity used by `blur` when no value is given (1-50).
blur_intensity = 5

# ---------------------------------------------------------------------------
# Processing
# ---------------------------------------------------------------------------
[processing]
# Maximum parallel workers for `batch`.
# Omit or comment out to auto-detect (= number of CPU cores).
# max_processes = 4
"##
}
