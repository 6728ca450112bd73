//! Configuration for the preview application and session construction.

use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::error::{ConfigError, Result};
use crate::typeset::MathBackend;
use crate::viewport::MOBILE_BREAKPOINT;

/// Well-known path for the starter template document.
pub const DEFAULT_TEMPLATE_PATH: &str = "template.md";

/// Highlight theme used for exported stylesheets.
pub const DEFAULT_HIGHLIGHT_THEME: &str = "base16-ocean.dark";

const DEFAULT_TITLE: &str = "Markdown Studio Preview";
const DEFAULT_FONT_SIZE: f32 = 14.0;

/// Per-session options: export title, highlight theme, math backend.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SessionOptions {
    /// Title for the standalone HTML export.
    pub title: String,
    /// syntect theme name for the exported highlight stylesheet.
    pub highlight_theme: String,
    /// Math rendering backend.
    pub math_backend: MathBackend,
}

impl Default for SessionOptions {
    fn default() -> Self {
        Self {
            title: DEFAULT_TITLE.to_string(),
            highlight_theme: DEFAULT_HIGHLIGHT_THEME.to_string(),
            math_backend: MathBackend::default(),
        }
    }
}

/// Configuration for the `mds-preview` application, loaded from TOML.
///
/// Every field defaults, so a missing or partial file is fine.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Path to the starter template document.
    pub template_path: PathBuf,
    /// Editor font size in points.
    pub font_size: f32,
    /// Viewport width below which the compact layout applies.
    pub mobile_breakpoint: u32,
    /// Session options (export title, theme, math backend).
    pub session: SessionOptions,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            template_path: PathBuf::from(DEFAULT_TEMPLATE_PATH),
            font_size: DEFAULT_FONT_SIZE,
            mobile_breakpoint: MOBILE_BREAKPOINT,
            session: SessionOptions::default(),
        }
    }
}

impl AppConfig {
    /// Load configuration from a TOML file.
    pub fn load(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path)
            .map_err(|e| ConfigError::Read(format!("{}: {}", path.display(), e)))?;
        Self::parse(&raw)
    }

    /// Parse configuration from TOML text.
    pub fn parse(raw: &str) -> Result<Self> {
        toml::from_str(raw).map_err(|e| ConfigError::Parse(e.to_string()).into())
    }

    /// Load configuration, falling back to defaults if the file is absent.
    pub fn load_or_default(path: &Path) -> Self {
        if !path.exists() {
            return Self::default();
        }
        match Self::load(path) {
            Ok(config) => config,
            Err(err) => {
                log::warn!("ignoring invalid config {}: {err}", path.display());
                Self::default()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = AppConfig::default();
        assert_eq!(config.template_path, PathBuf::from("template.md"));
        assert_eq!(config.mobile_breakpoint, 768);
        assert_eq!(config.session.math_backend, MathBackend::MathMl);
        assert_eq!(config.session.highlight_theme, "base16-ocean.dark");
    }

    #[test]
    fn test_parse_full_config() {
        let config = AppConfig::parse(
            r#"
template_path = "docs/start.md"
font_size = 16.0
mobile_breakpoint = 600

[session]
title = "Notes"
highlight_theme = "InspiredGitHub"
math_backend = "katex"
"#,
        )
        .unwrap();

        assert_eq!(config.template_path, PathBuf::from("docs/start.md"));
        assert_eq!(config.font_size, 16.0);
        assert_eq!(config.mobile_breakpoint, 600);
        assert_eq!(config.session.title, "Notes");
        assert_eq!(config.session.math_backend, MathBackend::Katex);
    }

    #[test]
    fn test_partial_config_uses_defaults() {
        let config = AppConfig::parse("font_size = 18.0\n").unwrap();
        assert_eq!(config.font_size, 18.0);
        assert_eq!(config.template_path, PathBuf::from("template.md"));
        assert_eq!(config.session.title, "Markdown Studio Preview");
    }

    #[test]
    fn test_invalid_toml_is_an_error() {
        assert!(AppConfig::parse("font_size = [not a number").is_err());
    }

    #[test]
    fn test_unknown_backend_is_an_error() {
        assert!(AppConfig::parse("[session]\nmath_backend = \"tex\"\n").is_err());
    }

    #[test]
    fn test_load_or_default_missing_file() {
        let config = AppConfig::load_or_default(Path::new("/nonexistent/mds-preview.toml"));
        assert_eq!(config.font_size, DEFAULT_FONT_SIZE);
    }
}
