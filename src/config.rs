//! Site configuration module.
//!
//! Handles loading, validating, and merging `config.toml`. The file lives in
//! the build directory next to `posts/`, `layouts/` and `styles/`, and is
//! optional: stock defaults cover every key.
//!
//! ## Configuration Options
//!
//! ```toml
//! # All options are optional - defaults shown below
//!
//! [site]
//! title = "Blog"                # Passed to every layout as `site_title`
//! date_format = "%B %-d, %Y"    # strftime format for `date_display`
//!
//! [markdown]
//! strikethrough = true          # ~~struck~~
//! superscript = true            # ^sup^
//! tables = true
//! smart_punctuation = true      # curly quotes, dashes, ellipses
//!
//! [styles]
//! compressed = false            # Minified CSS output
//!
//! [archive]
//! title = "Archive"             # Title of list.html
//! ```
//!
//! ## Partial Configuration
//!
//! Config files are sparse. Override just the values you want:
//!
//! ```toml
//! [site]
//! title = "Field Notes"
//! ```
//!
//! Unknown keys are rejected to catch typos early.

use chrono::NaiveDate;
use chrono::format::{Item, StrftimeItems};
use serde::{Deserialize, Serialize};
use std::fmt::Write;
use std::fs;
use std::path::Path;
use thiserror::Error;

pub const CONFIG_FILE: &str = "config.toml";

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
/// All fields have defaults. Unknown keys are rejected.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SiteConfig {
    /// Site-wide identity.
    pub site: SiteSection,
    /// Markdown extensions.
    pub markdown: MarkdownConfig,
    /// Stylesheet compilation.
    pub styles: StylesConfig,
    /// Archive list page.
    pub archive: ArchiveConfig,
}

impl SiteConfig {
    /// Validate config values are usable.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.site.date_format.trim().is_empty() {
            return Err(ConfigError::Validation(
                "site.date_format must not be empty".into(),
            ));
        }
        if StrftimeItems::new(&self.site.date_format).any(|item| matches!(item, Item::Error)) {
            return Err(ConfigError::Validation(format!(
                "site.date_format is not a valid strftime format: {}",
                self.site.date_format
            )));
        }
        // Time and zone fields parse fine but cannot format a bare date.
        let mut sample = String::new();
        if write!(sample, "{}", NaiveDate::default().format(&self.site.date_format)).is_err() {
            return Err(ConfigError::Validation(format!(
                "site.date_format must only use date fields: {}",
                self.site.date_format
            )));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SiteSection {
    pub title: String,
    pub date_format: String,
}

impl Default for SiteSection {
    fn default() -> Self {
        Self {
            title: "Blog".to_string(),
            date_format: "%B %-d, %Y".to_string(),
        }
    }
}

/// Markdown parser extensions. Fenced code blocks are always on.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct MarkdownConfig {
    pub strikethrough: bool,
    pub superscript: bool,
    pub tables: bool,
    pub smart_punctuation: bool,
}

impl Default for MarkdownConfig {
    fn default() -> Self {
        Self {
            strikethrough: true,
            superscript: true,
            tables: true,
            smart_punctuation: true,
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct StylesConfig {
    /// Emit minified CSS instead of the expanded form.
    pub compressed: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ArchiveConfig {
    pub title: String,
}

impl Default for ArchiveConfig {
    fn default() -> Self {
        Self {
            title: "Archive".to_string(),
        }
    }
}

// =============================================================================
// Config loading, merging, and validation
// =============================================================================

/// Returns the stock default config as a `toml::Value::Table`.
///
/// This is the base layer user overrides are merged on top of.
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

/// Load config from `config.toml` in the given directory.
///
/// Returns the stock defaults when the file does not exist. Unknown keys and
/// invalid values are errors.
pub fn load_config(dir: &Path) -> Result<SiteConfig, ConfigError> {
    let config_path = dir.join(CONFIG_FILE);
    let merged = if config_path.exists() {
        let content = fs::read_to_string(&config_path)?;
        let overlay: toml::Value = toml::from_str(&content)?;
        merge_toml(stock_defaults_value(), overlay)
    } else {
        stock_defaults_value()
    };
    let config: SiteConfig = merged.try_into()?;
    config.validate()?;
    Ok(config)
}

/// Returns a fully-commented stock `config.toml` with all keys and explanations.
///
/// Used by the `gen-config` CLI command.
pub fn stock_config_toml() -> &'static str {
    r##"# Quire Configuration
# ===================
# All settings are optional. Remove or comment out any you don't need.
# Values shown below are the defaults.
#
# This file lives in the build directory, next to posts/, layouts/ and styles/.
# Unknown keys will cause an error.

# ---------------------------------------------------------------------------
# Site
# ---------------------------------------------------------------------------
[site]
# Passed to every layout as `site_title`.
title = "Blog"

# strftime format used for `date_display` in layouts.
date_format = "%B %-d, %Y"

# ---------------------------------------------------------------------------
# Markdown extensions (fenced code blocks are always enabled)
# ---------------------------------------------------------------------------
[markdown]
strikethrough = true
superscript = true
tables = true
# Curly quotes, en/em dashes and ellipses.
smart_punctuation = true

# ---------------------------------------------------------------------------
# Stylesheets
# ---------------------------------------------------------------------------
[styles]
# Emit minified CSS.
compressed = false

# ---------------------------------------------------------------------------
# Archive page (rendered only when layouts/list.html.j2 exists)
# ---------------------------------------------------------------------------
[archive]
title = "Archive"
"##
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn default_config_values() {
        let config = SiteConfig::default();
        assert_eq!(config.site.title, "Blog");
        assert_eq!(config.site.date_format, "%B %-d, %Y");
        assert!(config.markdown.strikethrough);
        assert!(config.markdown.superscript);
        assert!(!config.styles.compressed);
        assert_eq!(config.archive.title, "Archive");
    }

    #[test]
    fn parse_partial_config() {
        let config: SiteConfig = toml::from_str(
            r#"
[site]
title = "Field Notes"
"#,
        )
        .unwrap();
        assert_eq!(config.site.title, "Field Notes");
        assert_eq!(config.site.date_format, "%B %-d, %Y");
        assert!(config.markdown.tables);
    }

    #[test]
    fn unknown_keys_rejected() {
        let result: Result<SiteConfig, _> = toml::from_str(
            r#"
[site]
titel = "typo"
"#,
        );
        assert!(result.is_err());
    }

    #[test]
    fn unknown_section_rejected() {
        let result: Result<SiteConfig, _> = toml::from_str("[feeds]\nrss = true\n");
        assert!(result.is_err());
    }

    #[test]
    fn load_config_returns_default_when_no_file() {
        let tmp = TempDir::new().unwrap();
        let config = load_config(tmp.path()).unwrap();
        assert_eq!(config.site.title, "Blog");
    }

    #[test]
    fn load_config_reads_file() {
        let tmp = TempDir::new().unwrap();
        fs::write(
            tmp.path().join(CONFIG_FILE),
            r#"
[markdown]
superscript = false

[styles]
compressed = true
"#,
        )
        .unwrap();

        let config = load_config(tmp.path()).unwrap();
        assert!(!config.markdown.superscript);
        assert!(config.markdown.strikethrough);
        assert!(config.styles.compressed);
    }

    #[test]
    fn load_config_rejects_bad_toml() {
        let tmp = TempDir::new().unwrap();
        fs::write(tmp.path().join(CONFIG_FILE), "[site\n").unwrap();
        assert!(matches!(
            load_config(tmp.path()),
            Err(ConfigError::Toml(_))
        ));
    }

    #[test]
    fn validate_rejects_empty_date_format() {
        let mut config = SiteConfig::default();
        config.site.date_format = "  ".into();
        assert!(matches!(
            config.validate(),
            Err(ConfigError::Validation(_))
        ));
    }

    #[test]
    fn validate_rejects_bad_strftime() {
        let mut config = SiteConfig::default();
        config.site.date_format = "%Q".into();
        assert!(matches!(
            config.validate(),
            Err(ConfigError::Validation(_))
        ));
    }

    #[test]
    fn validate_rejects_time_fields() {
        for format in ["%Y %H:%M", "%B %-d, %Y %H:%M", "%F %z"] {
            let mut config = SiteConfig::default();
            config.site.date_format = format.into();
            assert!(
                matches!(config.validate(), Err(ConfigError::Validation(_))),
                "{format} should be rejected"
            );
        }
    }

    #[test]
    fn validate_accepts_date_only_formats() {
        for format in ["%Y-%m-%d", "%A, %-d %B %Y", "%d/%m/%y", "%F"] {
            let mut config = SiteConfig::default();
            config.site.date_format = format.into();
            assert!(config.validate().is_ok(), "{format} should be accepted");
        }
    }

    #[test]
    fn load_config_rejects_time_in_date_format() {
        let tmp = TempDir::new().unwrap();
        fs::write(
            tmp.path().join(CONFIG_FILE),
            "[site]\ndate_format = \"%B %-d, %Y %H:%M\"\n",
        )
        .unwrap();
        assert!(matches!(
            load_config(tmp.path()),
            Err(ConfigError::Validation(_))
        ));
    }

    #[test]
    fn merge_overlay_keeps_base_keys() {
        let base: toml::Value = toml::from_str("[a]\nx = 1\ny = 2\n").unwrap();
        let overlay: toml::Value = toml::from_str("[a]\ny = 3\n").unwrap();
        let merged = merge_toml(base, overlay);
        assert_eq!(merged["a"]["x"].as_integer(), Some(1));
        assert_eq!(merged["a"]["y"].as_integer(), Some(3));
    }

    #[test]
    fn stock_config_toml_parses_to_defaults() {
        let config: SiteConfig = toml::from_str(stock_config_toml()).unwrap();
        let defaults = SiteConfig::default();
        assert_eq!(config.site.title, defaults.site.title);
        assert_eq!(config.site.date_format, defaults.site.date_format);
        assert_eq!(config.archive.title, defaults.archive.title);
    }
}
