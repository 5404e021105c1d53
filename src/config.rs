//! Site configuration module.
//!
//! Handles loading, validating, and merging `config.toml`. The file lives in
//! the content directory next to the content export; every key is optional
//! and stock defaults fill in whatever the file leaves out.
//!
//! ## Configuration Options
//!
//! ```toml
//! # All options are optional - defaults shown below
//!
//! [site]
//! title = "Projects"            # Index page title
//! base_path = "/projects"       # URL prefix of project detail pages
//!
//! [content]
//! export = "projects.ndjson"    # Content export, relative to the content dir
//!
//! [assets]
//! cdn_base = "https://cdn.sanity.io/images"
//! project_id = ""
//! dataset = "production"
//! showcase_width = 600          # Card showcase image width
//! content_width = 1200          # Article and detail showcase image width
//!
//! [code]
//! highlight = true              # Syntax-highlight code blocks
//! theme = "InspiredGitHub"      # Highlight stylesheet theme
//! class_prefix = "hl-"          # CSS class prefix of highlight tokens
//!
//! [preview]
//! long_hover_ms = 2000          # Dwell before a card video may autoplay
//! progress_debounce_ms = 500    # Watch-progress debounce interval
//! resume_threshold_secs = 7     # Progress needed before linking with ?v=
//!
//! [processing]
//! max_processes = 4             # Max parallel page renders (omit for auto)
//! ```
//!
//! Unknown keys are rejected to catch typos early.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use std::time::Duration;
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

/// Site configuration loaded from `config.toml`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SiteConfig {
    pub site: SiteSection,
    pub content: ContentConfig,
    pub assets: AssetsConfig,
    pub code: CodeConfig,
    pub preview: PreviewConfig,
    pub processing: ProcessingConfig,
}

impl SiteConfig {
    /// Validate config values are within acceptable ranges.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.assets.showcase_width == 0 || self.assets.content_width == 0 {
            return Err(ConfigError::Validation(
                "assets.showcase_width and assets.content_width must be non-zero".into(),
            ));
        }
        if self.preview.long_hover_ms == 0 || self.preview.progress_debounce_ms == 0 {
            return Err(ConfigError::Validation(
                "preview.long_hover_ms and preview.progress_debounce_ms must be non-zero".into(),
            ));
        }
        if !self.preview.resume_threshold_secs.is_finite()
            || self.preview.resume_threshold_secs < 0.0
        {
            return Err(ConfigError::Validation(
                "preview.resume_threshold_secs must be a non-negative number".into(),
            ));
        }
        if self.code.class_prefix.is_empty() {
            return Err(ConfigError::Validation(
                "code.class_prefix must not be empty".into(),
            ));
        }
        if !self.site.base_path.starts_with('/') {
            return Err(ConfigError::Validation(
                "site.base_path must start with '/'".into(),
            ));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SiteSection {
    /// Title of the index page.
    pub title: String,
    /// URL prefix under which project detail pages live.
    pub base_path: String,
}

impl Default for SiteSection {
    fn default() -> Self {
        Self {
            title: "Projects".to_string(),
            base_path: "/projects".to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ContentConfig {
    /// Content export file (JSON array or NDJSON), relative to the content dir.
    pub export: String,
}

impl Default for ContentConfig {
    fn default() -> Self {
        Self {
            export: "projects.ndjson".to_string(),
        }
    }
}

/// Image CDN settings used by [`CdnAssetResolver`](crate::assets::CdnAssetResolver).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AssetsConfig {
    pub cdn_base: String,
    pub project_id: String,
    pub dataset: String,
    /// Width requested for project card showcase images.
    pub showcase_width: u32,
    /// Width requested for images inside rendered descriptions.
    pub content_width: u32,
}

impl Default for AssetsConfig {
    fn default() -> Self {
        Self {
            cdn_base: "https://cdn.sanity.io/images".to_string(),
            project_id: String::new(),
            dataset: "production".to_string(),
            showcase_width: 600,
            content_width: 1200,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CodeConfig {
    pub highlight: bool,
    pub theme: String,
    pub class_prefix: String,
}

impl Default for CodeConfig {
    fn default() -> Self {
        Self {
            highlight: true,
            theme: "InspiredGitHub".to_string(),
            class_prefix: "hl-".to_string(),
        }
    }
}

/// Hover-preview timings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PreviewConfig {
    pub long_hover_ms: u64,
    pub progress_debounce_ms: u64,
    pub resume_threshold_secs: f64,
}

impl Default for PreviewConfig {
    fn default() -> Self {
        Self {
            long_hover_ms: 2000,
            progress_debounce_ms: 500,
            resume_threshold_secs: 7.0,
        }
    }
}

impl PreviewConfig {
    pub fn long_hover(&self) -> Duration {
        Duration::from_millis(self.long_hover_ms)
    }

    pub fn progress_debounce(&self) -> Duration {
        Duration::from_millis(self.progress_debounce_ms)
    }
}

/// Parallel processing settings.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ProcessingConfig {
    /// Maximum number of pages rendered in parallel.
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

/// Load a `config.toml` from a directory as a raw TOML value.
///
/// Returns `Ok(None)` if no `config.toml` exists in the directory.
pub fn load_raw_config(path: &Path) -> Result<Option<toml::Value>, ConfigError> {
    let config_path = path.join("config.toml");
    if !config_path.exists() {
        return Ok(None);
    }
    let content = fs::read_to_string(&config_path)?;
    let value: toml::Value = toml::from_str(&content)?;
    Ok(Some(value))
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
pub fn load_config(root: &Path) -> Result<SiteConfig, ConfigError> {
    resolve_config(stock_defaults_value(), load_raw_config(root)?)
}

/// Returns a fully-commented stock `config.toml` with all keys and explanations.
///
/// Used by the `gen-config` CLI command.
pub fn stock_config_toml() -> &'static str {
    r##"# Folio Configuration
# ===================
# All settings are optional. Remove or comment out any you don't need.
# Values shown below are the defaults. Unknown keys will cause an error.

# ---------------------------------------------------------------------------
# Site
# ---------------------------------------------------------------------------
[site]
# Title of the project index page.
title = "Projects"

# URL prefix of project detail pages: <base_path>/<slug>/
base_path = "/projects"

# ---------------------------------------------------------------------------
# Content source
# ---------------------------------------------------------------------------
[content]
# Content export, relative to the content directory.
# Either a JSON array of documents or one document per line (NDJSON).
export = "projects.ndjson"

# ---------------------------------------------------------------------------
# Image assets
# ---------------------------------------------------------------------------
[assets]
cdn_base = "https://cdn.sanity.io/images"
project_id = ""
dataset = "production"

# Width requested for project card showcase images.
showcase_width = 600

# Width requested for images inside descriptions and the detail showcase.
content_width = 1200

# ---------------------------------------------------------------------------
# Code blocks
# ---------------------------------------------------------------------------
[code]
# Syntax-highlight code blocks. Unknown languages always render as plain text.
highlight = true

# Highlight theme, one of the bundled syntect themes
# (InspiredGitHub, Solarized (light), base16-ocean.dark, ...).
theme = "InspiredGitHub"

# CSS class prefix of highlighted tokens.
class_prefix = "hl-"

# ---------------------------------------------------------------------------
# Hover preview
# ---------------------------------------------------------------------------
[preview]
# Continuous hover needed before a card's video may autoplay.
long_hover_ms = 2000

# Watch-progress updates are delivered at most once per interval
# (first immediately, the latest pending one at the end of the interval).
progress_debounce_ms = 500

# Watch progress (seconds) beyond which card links resume playback with ?v=.
resume_threshold_secs = 7.0

# ---------------------------------------------------------------------------
# Processing
# ---------------------------------------------------------------------------
[processing]
# Maximum pages rendered in parallel.
# Omit or comment out to auto-detect (= number of CPU cores).
# max_processes = 4
"##
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn default_config_values() {
        let config = SiteConfig::default();
        assert_eq!(config.site.base_path, "/projects");
        assert_eq!(config.content.export, "projects.ndjson");
        assert_eq!(config.assets.showcase_width, 600);
        assert_eq!(config.preview.long_hover(), Duration::from_millis(2000));
        assert_eq!(config.preview.progress_debounce(), Duration::from_millis(500));
        assert_eq!(config.preview.resume_threshold_secs, 7.0);
        assert!(config.code.highlight);
    }

    #[test]
    fn parse_partial_config() {
        let config: SiteConfig = toml::from_str(
            r#"
[assets]
project_id = "abc123"
"#,
        )
        .unwrap();
        assert_eq!(config.assets.project_id, "abc123");
        // Default values preserved
        assert_eq!(config.assets.dataset, "production");
        assert_eq!(config.code.theme, "InspiredGitHub");
    }

    // =========================================================================
    // load_config tests
    // =========================================================================

    #[test]
    fn load_config_returns_default_when_no_file() {
        let tmp = TempDir::new().unwrap();
        let config = load_config(tmp.path()).unwrap();
        assert_eq!(config.site.title, "Projects");
    }

    #[test]
    fn load_config_reads_file() {
        let tmp = TempDir::new().unwrap();
        fs::write(
            tmp.path().join("config.toml"),
            r#"
[site]
title = "Work"

[preview]
long_hover_ms = 1500
"#,
        )
        .unwrap();

        let config = load_config(tmp.path()).unwrap();
        assert_eq!(config.site.title, "Work");
        assert_eq!(config.preview.long_hover_ms, 1500);
        assert_eq!(config.preview.progress_debounce_ms, 500);
    }

    #[test]
    fn load_config_invalid_toml_is_error() {
        let tmp = TempDir::new().unwrap();
        fs::write(tmp.path().join("config.toml"), "this is not valid toml [[[").unwrap();
        assert!(matches!(load_config(tmp.path()), Err(ConfigError::Toml(_))));
    }

    #[test]
    fn load_config_validates_values() {
        let tmp = TempDir::new().unwrap();
        fs::write(
            tmp.path().join("config.toml"),
            r#"
[preview]
progress_debounce_ms = 0
"#,
        )
        .unwrap();
        assert!(matches!(
            load_config(tmp.path()),
            Err(ConfigError::Validation(_))
        ));
    }

    // =========================================================================
    // merge_toml tests
    // =========================================================================

    #[test]
    fn merge_toml_table_merge() {
        let base: toml::Value = toml::from_str(
            r#"
[assets]
showcase_width = 600
content_width = 1200
"#,
        )
        .unwrap();
        let overlay: toml::Value = toml::from_str(
            r#"
[assets]
showcase_width = 400
"#,
        )
        .unwrap();
        let merged = merge_toml(base, overlay);
        let assets = merged.get("assets").unwrap();
        assert_eq!(assets.get("showcase_width").unwrap().as_integer(), Some(400));
        assert_eq!(assets.get("content_width").unwrap().as_integer(), Some(1200));
    }

    #[test]
    fn merge_toml_scalar_replaces_table() {
        let base: toml::Value = toml::from_str("[a]\nb = 1").unwrap();
        let overlay: toml::Value = toml::from_str("a = 2").unwrap();
        let merged = merge_toml(base, overlay);
        assert_eq!(merged.get("a").unwrap().as_integer(), Some(2));
    }

    #[test]
    fn resolve_config_with_overlay() {
        let overlay: toml::Value = toml::from_str("[code]\nhighlight = false").unwrap();
        let config = resolve_config(stock_defaults_value(), Some(overlay)).unwrap();
        assert!(!config.code.highlight);
        assert_eq!(config.code.class_prefix, "hl-");
    }

    // =========================================================================
    // Unknown key rejection tests
    // =========================================================================

    #[test]
    fn unknown_key_rejected() {
        let result: Result<SiteConfig, _> = toml::from_str("[preview]\nlong_hover = 10");
        let err = result.unwrap_err().to_string();
        assert!(err.contains("unknown field"));
    }

    #[test]
    fn unknown_section_rejected() {
        let result: Result<SiteConfig, _> = toml::from_str("[images]\nquality = 90");
        assert!(result.is_err());
    }

    // =========================================================================
    // Validation tests
    // =========================================================================

    #[test]
    fn validate_default_config_passes() {
        assert!(SiteConfig::default().validate().is_ok());
    }

    #[test]
    fn validate_zero_widths() {
        let mut config = SiteConfig::default();
        config.assets.content_width = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn validate_negative_threshold() {
        let mut config = SiteConfig::default();
        config.preview.resume_threshold_secs = -1.0;
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("resume_threshold_secs"));
    }

    #[test]
    fn validate_empty_class_prefix() {
        let mut config = SiteConfig::default();
        config.code.class_prefix.clear();
        assert!(config.validate().is_err());
    }

    #[test]
    fn validate_relative_base_path() {
        let mut config = SiteConfig::default();
        config.site.base_path = "projects".into();
        assert!(config.validate().is_err());
    }

    // =========================================================================
    // Processing config tests
    // =========================================================================

    #[test]
    fn effective_threads_user_constrains_down() {
        let config = ProcessingConfig {
            max_processes: Some(1),
        };
        assert_eq!(effective_threads(&config), 1);
    }

    #[test]
    fn effective_threads_clamped_to_cores() {
        let config = ProcessingConfig {
            max_processes: Some(99999),
        };
        let cores = std::thread::available_parallelism()
            .map(|n| n.get())
            .unwrap_or(1);
        assert_eq!(effective_threads(&config), cores);
    }

    #[test]
    fn effective_threads_zero_means_one() {
        let config = ProcessingConfig {
            max_processes: Some(0),
        };
        assert_eq!(effective_threads(&config), 1);
    }

    // =========================================================================
    // stock_config_toml tests
    // =========================================================================

    #[test]
    fn stock_config_toml_roundtrips_to_defaults() {
        let config: SiteConfig = toml::from_str(stock_config_toml()).unwrap();
        let defaults = SiteConfig::default();
        assert_eq!(config.site.title, defaults.site.title);
        assert_eq!(config.assets.cdn_base, defaults.assets.cdn_base);
        assert_eq!(config.assets.content_width, defaults.assets.content_width);
        assert_eq!(config.code.theme, defaults.code.theme);
        assert_eq!(config.preview.long_hover_ms, defaults.preview.long_hover_ms);
        assert_eq!(
            config.preview.resume_threshold_secs,
            defaults.preview.resume_threshold_secs
        );
        assert_eq!(config.processing.max_processes, None);
    }

    #[test]
    fn stock_config_toml_contains_all_sections() {
        let content = stock_config_toml();
        for section in ["[site]", "[content]", "[assets]", "[code]", "[preview]", "[processing]"] {
            assert!(content.contains(section), "missing {section}");
        }
    }

    #[test]
    fn stock_defaults_value_has_all_sections() {
        let val = stock_defaults_value();
        for key in ["site", "content", "assets", "code", "preview", "processing"] {
            assert!(val.get(key).is_some(), "missing {key}");
        }
    }
}
