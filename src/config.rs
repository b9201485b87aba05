//! Site configuration module.
//!
//! Handles loading, validating, and merging `config.toml`. Stock defaults
//! are the base layer; a user file only needs the keys it wants to change.
//!
//! ## Config File Location
//!
//! By default the file is looked up inside the images directory. A missing
//! default file simply means "use the defaults". A path given explicitly
//! with `--config` must exist.
//!
//! ```text
//! images/
//! ├── config.toml              # optional
//! ├── Trip/
//! │   └── ...
//! └── 2019/
//!     └── ...
//! ```
//!
//! The scanner only picks up `.jpg`, `.jpeg` and `.png` files, so the config
//! file never turns into a gallery entry.
//!
//! ## Configuration Options
//!
//! ```toml
//! # All options are optional - defaults shown below
//!
//! [site]
//! title = "Galleries"          # Index page title, breadcrumb root
//! stylesheet = "/css/style.css" # Linked from every page ("" for none)
//! preview_count = 4            # Thumbnails per gallery on the index page
//!
//! [images]
//! thumbnail_size = 256         # Thumbnail target height (PNG)
//! display_size = 1024          # Display image target height (JPEG)
//! jpeg_quality = 93            # Display image quality (90-93)
//!
//! [output]
//! copy_sources = false         # Also copy the source tree to <output>/originals
//!
//! [processing]
//! max_processes = 4            # Max parallel workers (omit for auto = CPU cores)
//! ```
//!
//! Unknown keys are rejected to catch typos early.

use serde::{Deserialize, Serialize};
use std::fs;
use std::ops::RangeInclusive;
use std::path::Path;
use thiserror::Error;

/// File name of the config looked up in the images directory.
pub const CONFIG_FILENAME: &str = "config.toml";

/// Accepted JPEG quality for display images.
pub const JPEG_QUALITY_RANGE: RangeInclusive<u32> = 90..=93;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("Config validation error: {0}")]
    Validation(String),
}

/// Site configuration loaded from `config.toml`.
///
/// All fields have sensible defaults. User config files need only specify
/// the values they want to override. Unknown keys are rejected.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SiteConfig {
    /// Page titles and stylesheet.
    pub site: SiteSection,
    /// Thumbnail and display image settings.
    pub images: ImagesConfig,
    /// Extra output trees.
    pub output: OutputConfig,
    /// Parallel processing settings.
    pub processing: ProcessingConfig,
}

impl SiteConfig {
    /// Validate config values are within acceptable ranges.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.images.thumbnail_size == 0 || self.images.display_size == 0 {
            return Err(ConfigError::Validation(
                "images.thumbnail_size and images.display_size must be non-zero".into(),
            ));
        }
        if !JPEG_QUALITY_RANGE.contains(&self.images.jpeg_quality) {
            return Err(ConfigError::Validation(format!(
                "images.jpeg_quality must be {}-{}",
                JPEG_QUALITY_RANGE.start(),
                JPEG_QUALITY_RANGE.end()
            )));
        }
        if self.processing.max_processes == Some(0) {
            return Err(ConfigError::Validation(
                "processing.max_processes must be at least 1".into(),
            ));
        }
        Ok(())
    }
}

/// Page-level settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SiteSection {
    /// Title of the index page and root of every breadcrumb.
    pub title: String,
    /// Stylesheet URL linked from every page. Empty means no link.
    pub stylesheet: String,
    /// Number of thumbnails shown per gallery on the index page.
    pub preview_count: usize,
}

impl Default for SiteSection {
    fn default() -> Self {
        Self {
            title: "Galleries".to_string(),
            stylesheet: "/css/style.css".to_string(),
            preview_count: 4,
        }
    }
}

/// Derived image settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ImagesConfig {
    /// Target height of thumbnails, in pixels.
    pub thumbnail_size: u32,
    /// Target height of display images, in pixels.
    pub display_size: u32,
    /// JPEG quality of display images, within [`JPEG_QUALITY_RANGE`].
    pub jpeg_quality: u32,
}

impl Default for ImagesConfig {
    fn default() -> Self {
        Self {
            thumbnail_size: 256,
            display_size: 1024,
            jpeg_quality: 93,
        }
    }
}

/// Optional output trees.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct OutputConfig {
    /// Copy the untouched source tree to `<output>/originals` and link each
    /// image page to its original.
    pub copy_sources: bool,
}

/// Parallel processing settings.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ProcessingConfig {
    /// Maximum number of parallel image processing workers.
    /// When absent, defaults to the number of CPU cores.
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
    config.max_processes.map(|n| n.min(cores)).unwrap_or(cores)
}

// =============================================================================
// Config loading, merging, and validation
// =============================================================================

/// Returns the stock default config as a `toml::Value::Table`.
///
/// This is the canonical representation of all default values, used as the
/// base layer for merging user overrides on top.
pub fn stock_defaults_value() -> toml::Value {
    toml::Value::try_from(SiteConfig::default()).expect("default config must serialize")
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

/// Parse a config file as a raw TOML value.
fn read_raw_config(config_path: &Path) -> Result<toml::Value, ConfigError> {
    let content = fs::read_to_string(config_path)?;
    Ok(toml::from_str(&content)?)
}

/// Load a `config.toml` from a directory as a raw TOML value.
///
/// Returns `Ok(None)` if no `config.toml` exists in the directory.
/// Returns `Err` if the file exists but contains invalid TOML.
pub fn load_raw_config(dir: &Path) -> Result<Option<toml::Value>, ConfigError> {
    let config_path = dir.join(CONFIG_FILENAME);
    if !config_path.exists() {
        return Ok(None);
    }
    read_raw_config(&config_path).map(Some)
}

/// Merge an optional overlay onto a base value, then deserialize and validate.
pub fn resolve_config(
    base: toml::Value,
    overlay: Option<toml::Value>,
) -> Result<SiteConfig, ConfigError> {
    let merged = match overlay {
        Some(ov) => merge_toml(base, ov),
        None => base,
    };
    let config: SiteConfig = merged.try_into()?;
    config.validate()?;
    Ok(config)
}

/// Load config from `config.toml` in the given directory.
///
/// Merges user values on top of stock defaults, rejects unknown keys,
/// and validates the result. A missing file yields the defaults.
pub fn load_config(dir: &Path) -> Result<SiteConfig, ConfigError> {
    let base = stock_defaults_value();
    let overlay = load_raw_config(dir)?;
    resolve_config(base, overlay)
}

/// Load config from an explicitly named file, which must exist.
pub fn load_config_file(path: &Path) -> Result<SiteConfig, ConfigError> {
    let overlay = read_raw_config(path)?;
    resolve_config(stock_defaults_value(), Some(overlay))
}

/// Returns a fully-commented stock `config.toml` with all keys and explanations.
///
/// Used by the `gen-config` CLI command.
pub fn stock_config_toml() -> &'static str {
    r##"# Shoebox Configuration
# =====================
# All settings are optional. Remove or comment out any you don't need.
# Values shown below are the defaults.
#
# The file is read from <images>/config.toml unless --config names another.
# Unknown keys will cause an error.

# ---------------------------------------------------------------------------
# Pages
# ---------------------------------------------------------------------------
[site]
# Title of the index page and root of every breadcrumb.
title = "Galleries"

# Stylesheet URL linked from every page. Set to "" to link none.
stylesheet = "/css/style.css"

# Number of thumbnails shown for each gallery on the index page.
preview_count = 4

# ---------------------------------------------------------------------------
# Derived images
# ---------------------------------------------------------------------------
[images]
# Target height of thumbnails in pixels. Written as PNG.
# Images no wider than this are kept at their original size.
thumbnail_size = 256

# Target height of display images in pixels. Written as JPEG.
display_size = 1024

# JPEG quality for display images, 90 to 93.
jpeg_quality = 93

# ---------------------------------------------------------------------------
# Output
# ---------------------------------------------------------------------------
[output]
# Copy the untouched source tree to <output>/originals and link each image
# page to its original.
copy_sources = false

# ---------------------------------------------------------------------------
# Processing
# ---------------------------------------------------------------------------
[processing]
# Maximum parallel image-processing workers.
# Omit or comment out to auto-detect (= number of CPU cores).
# max_processes = 4
"##
}
