//! Exporting diagrams: DOT generation and Graphviz rendering.

pub mod dot;
pub mod graphviz;

use std::{fmt, str::FromStr};

use serde::Deserialize;

/// Image formats the renderer can produce.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Png,
    Svg,
    Jpg,
    Pdf,
    Gif,
}

impl OutputFormat {
    /// File extension used for images of this format.
    pub fn extension(self) -> &'static str {
        match self {
            Self::Png => "png",
            Self::Svg => "svg",
            Self::Jpg => "jpg",
            Self::Pdf => "pdf",
            Self::Gif => "gif",
        }
    }
}

impl FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "png" => Ok(Self::Png),
            "svg" => Ok(Self::Svg),
            "jpg" | "jpeg" => Ok(Self::Jpg),
            "pdf" => Ok(Self::Pdf),
            "gif" => Ok(Self::Gif),
            _ => Err(format!(
                "unsupported output format `{s}` (expected png, svg, jpg, pdf or gif)"
            )),
        }
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.extension())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_is_case_insensitive() {
        assert_eq!("PNG".parse::<OutputFormat>(), Ok(OutputFormat::Png));
        assert_eq!("jpeg".parse::<OutputFormat>(), Ok(OutputFormat::Jpg));
        assert_eq!("svg".parse::<OutputFormat>(), Ok(OutputFormat::Svg));
    }

    #[test]
    fn test_parse_unknown_format() {
        let err = "tiff".parse::<OutputFormat>().unwrap_err();
        assert!(err.contains("tiff"));
    }

    #[test]
    fn test_extension_matches_display() {
        for format in [
            OutputFormat::Png,
            OutputFormat::Svg,
            OutputFormat::Jpg,
            OutputFormat::Pdf,
            OutputFormat::Gif,
        ] {
            assert_eq!(format.to_string(), format.extension());
        }
    }
}
