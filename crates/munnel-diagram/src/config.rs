//! Configuration types for diagram rendering.
//!
//! This module provides configuration structures that control where the
//! diagram is written, how it is laid out, and how it is styled. All types
//! implement [`serde::Deserialize`] so they can be loaded from TOML.
//!
//! # Overview
//!
//! - [`AppConfig`] - Top-level configuration combining the sections below.
//! - [`OutputConfig`] - Output format, directory, and DOT retention.
//! - [`LayoutConfig`] - Rank direction and edge routing.
//! - [`StyleConfig`] - Background color, edge color, and font.
//!
//! # Example
//!
//! ```
//! # use munnel_diagram::config::AppConfig;
//! let config = AppConfig::default();
//! assert!(config.style().background_color().is_ok());
//! assert_eq!(config.style().font_name(), "Sans-Serif");
//! ```

use std::path::{Path, PathBuf};

use serde::Deserialize;

use munnel_diagram_core::{
    color::Color,
    semantic::{CurveStyle, Direction},
};

use crate::export::OutputFormat;

/// Edge color used when none is configured.
pub const DEFAULT_EDGE_COLOR: &str = "#7B8894";

/// Font used for titles, labels and cluster captions when none is configured.
pub const DEFAULT_FONT_NAME: &str = "Sans-Serif";

/// Top-level configuration.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    output: OutputConfig,

    #[serde(default)]
    layout: LayoutConfig,

    #[serde(default)]
    style: StyleConfig,
}

impl AppConfig {
    /// Creates a new [`AppConfig`] from its three sections.
    pub fn new(output: OutputConfig, layout: LayoutConfig, style: StyleConfig) -> Self {
        Self {
            output,
            layout,
            style,
        }
    }

    pub fn output(&self) -> &OutputConfig {
        &self.output
    }

    pub fn layout(&self) -> &LayoutConfig {
        &self.layout
    }

    pub fn style(&self) -> &StyleConfig {
        &self.style
    }

    /// Replaces the output section, keeping layout and style.
    pub fn with_output(mut self, output: OutputConfig) -> Self {
        self.output = output;
        self
    }

    /// Checks every value that is only parsed lazily, such as colors.
    ///
    /// # Errors
    ///
    /// Returns a message describing the first invalid value.
    pub fn validate(&self) -> Result<(), String> {
        self.style.background_color()?;
        self.style.edge_color()?;
        Ok(())
    }
}

/// Where and how the rendered image is written.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct OutputConfig {
    /// Image format produced by Graphviz.
    #[serde(default)]
    format: OutputFormat,

    /// Directory receiving the image; the working directory when unset.
    #[serde(default)]
    directory: Option<PathBuf>,

    /// Explicit image path, overriding the name derived from the title.
    #[serde(default)]
    path: Option<PathBuf>,

    /// Keep the DOT source next to the image.
    #[serde(default)]
    keep_dot: bool,
}

impl OutputConfig {
    pub fn format(&self) -> OutputFormat {
        self.format
    }

    pub fn directory(&self) -> Option<&Path> {
        self.directory.as_deref()
    }

    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    pub fn keep_dot(&self) -> bool {
        self.keep_dot
    }

    pub fn with_format(mut self, format: OutputFormat) -> Self {
        self.format = format;
        self
    }

    pub fn with_directory(mut self, directory: impl Into<PathBuf>) -> Self {
        self.directory = Some(directory.into());
        self
    }

    pub fn with_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.path = Some(path.into());
        self
    }

    pub fn with_keep_dot(mut self, keep_dot: bool) -> Self {
        self.keep_dot = keep_dot;
        self
    }
}

/// Layout options handed to Graphviz.
#[derive(Debug, Default, Clone, Deserialize)]
pub struct LayoutConfig {
    #[serde(default)]
    direction: Direction,

    #[serde(default)]
    curve_style: CurveStyle,
}

impl LayoutConfig {
    pub fn new(direction: Direction, curve_style: CurveStyle) -> Self {
        Self {
            direction,
            curve_style,
        }
    }

    pub fn direction(&self) -> Direction {
        self.direction
    }

    pub fn curve_style(&self) -> CurveStyle {
        self.curve_style
    }
}

/// Visual styling configuration for rendered diagrams.
///
/// Colors are kept as strings and parsed on access, so an invalid value is
/// reported with the text the user wrote.
#[derive(Debug, Default, Clone, Deserialize)]
pub struct StyleConfig {
    #[serde(default)]
    background_color: Option<String>,

    #[serde(default)]
    edge_color: Option<String>,

    #[serde(default)]
    font_name: Option<String>,
}

impl StyleConfig {
    /// Returns the parsed background [`Color`], or `None` if no color is configured.
    ///
    /// # Errors
    ///
    /// Returns an error if the configured color string cannot be parsed.
    pub fn background_color(&self) -> Result<Option<Color>, String> {
        self.background_color
            .as_ref()
            .map(|color| Color::new(color))
            .transpose()
            .map_err(|err| format!("Invalid background color in config: {err}"))
    }

    /// Returns the parsed edge [`Color`], falling back to [`DEFAULT_EDGE_COLOR`].
    ///
    /// # Errors
    ///
    /// Returns an error if the configured color string cannot be parsed.
    pub fn edge_color(&self) -> Result<Color, String> {
        Color::new(self.edge_color.as_deref().unwrap_or(DEFAULT_EDGE_COLOR))
            .map_err(|err| format!("Invalid edge color in config: {err}"))
    }

    pub fn font_name(&self) -> &str {
        self.font_name.as_deref().unwrap_or(DEFAULT_FONT_NAME)
    }
}
