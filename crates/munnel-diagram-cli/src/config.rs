//! Configuration loading for the CLI
//!
//! This module finds the TOML configuration file (explicit path, local
//! directory, platform config directory) and applies command-line overrides.

use std::{
    fs,
    path::{Path, PathBuf},
};

use directories::ProjectDirs;
use log::{debug, info};
use thiserror::Error;

use munnel_diagram::{DiagramError, config::AppConfig, export::OutputFormat};

use crate::Args;

/// Location of the project-local configuration file.
pub const LOCAL_CONFIG: &str = "munnel-diagram/config.toml";

/// Configuration-related errors for CLI
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to parse TOML configuration: {0}")]
    Parse(String),

    #[error("Missing configuration file: {0}")]
    MissingFile(PathBuf),

    #[error("Validation error: {0}")]
    Validation(String),
}

impl From<ConfigError> for DiagramError {
    fn from(err: ConfigError) -> Self {
        DiagramError::Config(err.to_string())
    }
}

/// Find and load configuration from various locations
///
/// Search order:
/// 1. Explicit path if provided
/// 2. Local project directory (munnel-diagram/config.toml)
/// 3. Platform-specific config directory
/// 4. Default config if none found
///
/// # Errors
///
/// Returns error if:
/// - Explicit path is provided but file doesn't exist
/// - Config file exists but cannot be parsed
pub fn load_config(explicit_path: Option<impl AsRef<Path>>) -> Result<AppConfig, DiagramError> {
    if let Some(path) = explicit_path {
        let path = path.as_ref();
        info!(path = path.display().to_string(); "Loading configuration from explicit path");
        return load_config_file(path);
    }

    let local_config = Path::new(LOCAL_CONFIG);
    if local_config.exists() {
        info!(path = local_config.display().to_string(); "Loading configuration from local path");
        return load_config_file(local_config);
    }

    if let Some(proj_dirs) = ProjectDirs::from("com", "munnel", "munnel-diagram") {
        let system_config = proj_dirs.config_dir().join("config.toml");

        if system_config.exists() {
            info!(path = system_config.display().to_string(); "Loading configuration from system path");
            return load_config_file(system_config);
        }

        debug!(path = system_config.display().to_string(); "System configuration file not found");
    } else {
        debug!("Could not determine platform-specific config directory");
    }

    debug!("No configuration file found, using default configuration");
    Ok(AppConfig::default())
}

/// Load configuration from a TOML file
fn load_config_file(path: impl AsRef<Path>) -> Result<AppConfig, DiagramError> {
    let path = path.as_ref();

    if !path.exists() {
        return Err(ConfigError::MissingFile(path.to_path_buf()).into());
    }

    let content = fs::read_to_string(path)?;
    let config: AppConfig =
        toml::from_str(&content).map_err(|e| ConfigError::Parse(e.to_string()))?;

    Ok(config)
}

/// Applies command-line overrides on top of `config` and validates the result.
///
/// Without `--format`, an explicit output path picks the format from its
/// extension.
///
/// # Errors
///
/// Returns [`DiagramError::Config`] for an unknown format, a format that
/// contradicts the output path's extension, or an invalid color.
pub fn apply_args(config: AppConfig, args: &Args) -> Result<AppConfig, DiagramError> {
    let mut output = config.output().clone();

    let flag_format = args
        .format
        .as_deref()
        .map(str::parse::<OutputFormat>)
        .transpose()
        .map_err(ConfigError::Validation)?;

    if let Some(path) = &args.output {
        if let Some(format) = output_format(Path::new(path), flag_format)? {
            output = output.with_format(format);
        }
        output = output.with_path(path);
    } else if let Some(format) = flag_format {
        output = output.with_format(format);
    }
    if args.emit_dot {
        output = output.with_keep_dot(true);
    }

    let config = config.with_output(output);
    config.validate().map_err(ConfigError::Validation)?;
    Ok(config)
}

/// Reconciles the `--format` flag with the extension of an explicit output path.
fn output_format(
    path: &Path,
    flag_format: Option<OutputFormat>,
) -> Result<Option<OutputFormat>, ConfigError> {
    let Some(extension) = path.extension().and_then(|ext| ext.to_str()) else {
        return Ok(flag_format);
    };

    match (flag_format, extension.parse::<OutputFormat>()) {
        (Some(flag), Ok(inferred)) if flag != inferred => Err(ConfigError::Validation(format!(
            "--format {flag} contradicts the `.{extension}` extension of `{}`",
            path.display()
        ))),
        (Some(flag), _) => Ok(Some(flag)),
        (None, Ok(inferred)) => {
            debug!(format = inferred.to_string(); "Output format inferred from path");
            Ok(Some(inferred))
        }
        (None, Err(err)) => Err(ConfigError::Validation(format!(
            "cannot infer the output format of `{}`: {err}; pass --format",
            path.display()
        ))),
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use munnel_diagram::semantic::Direction;

    use super::*;

    #[test]
    fn test_explicit_config_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            file,
            "[output]\nformat = \"svg\"\nkeep_dot = true\n\n[layout]\ndirection = \"TB\""
        )
        .unwrap();

        let config = load_config(Some(file.path())).unwrap();

        assert_eq!(config.output().format(), OutputFormat::Svg);
        assert!(config.output().keep_dot());
        assert_eq!(config.layout().direction(), Direction::TB);
    }

    #[test]
    fn test_missing_explicit_config() {
        let err = load_config(Some("does/not/exist.toml")).unwrap_err();
        match err {
            DiagramError::Config(message) => assert!(message.contains("exist.toml")),
            other => panic!("expected config error, got {other:?}"),
        }
    }

    #[test]
    fn test_malformed_config() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[output\nformat = ").unwrap();

        assert!(matches!(
            load_config(Some(file.path())),
            Err(DiagramError::Config(_))
        ));
    }

    #[test]
    fn test_flags_override_file() {
        let args = Args {
            format: Some("PDF".to_string()),
            output: Some("diagram.pdf".to_string()),
            emit_dot: true,
            ..Args::default()
        };

        let config = apply_args(AppConfig::default(), &args).unwrap();

        assert_eq!(config.output().format(), OutputFormat::Pdf);
        assert_eq!(config.output().path(), Some(Path::new("diagram.pdf")));
        assert!(config.output().keep_dot());
    }

    #[test]
    fn test_output_extension_selects_format() {
        let args = Args {
            output: Some("x.svg".to_string()),
            ..Args::default()
        };

        let config = apply_args(AppConfig::default(), &args).unwrap();

        assert_eq!(config.output().format(), OutputFormat::Svg);
        assert_eq!(config.output().path(), Some(Path::new("x.svg")));
    }

    #[test]
    fn test_output_extension_overrides_config_format() {
        let config: AppConfig = toml::from_str("[output]\nformat = \"pdf\"").unwrap();
        let args = Args {
            output: Some("out/diagram.JPEG".to_string()),
            ..Args::default()
        };

        let config = apply_args(config, &args).unwrap();

        assert_eq!(config.output().format(), OutputFormat::Jpg);
    }

    #[test]
    fn test_format_flag_contradicting_extension() {
        let args = Args {
            output: Some("diagram.svg".to_string()),
            format: Some("png".to_string()),
            ..Args::default()
        };

        match apply_args(AppConfig::default(), &args) {
            Err(DiagramError::Config(message)) => assert!(message.contains(".svg"), "{message}"),
            other => panic!("expected config error, got {other:?}"),
        }
    }

    #[test]
    fn test_unknown_extension_needs_format_flag() {
        let unknown = Args {
            output: Some("diagram.img".to_string()),
            ..Args::default()
        };
        assert!(matches!(
            apply_args(AppConfig::default(), &unknown),
            Err(DiagramError::Config(_))
        ));

        let explicit = Args {
            format: Some("gif".to_string()),
            ..unknown
        };
        let config = apply_args(AppConfig::default(), &explicit).unwrap();
        assert_eq!(config.output().format(), OutputFormat::Gif);
    }

    #[test]
    fn test_output_without_extension_keeps_format() {
        let args = Args {
            output: Some("diagram".to_string()),
            ..Args::default()
        };

        let config = apply_args(AppConfig::default(), &args).unwrap();

        assert_eq!(config.output().format(), OutputFormat::Png);
    }

    #[test]
    fn test_unknown_format_flag() {
        let args = Args {
            format: Some("bmp".to_string()),
            ..Args::default()
        };

        assert!(matches!(
            apply_args(AppConfig::default(), &args),
            Err(DiagramError::Config(_))
        ));
    }

    #[test]
    fn test_invalid_color_fails_validation() {
        let config: AppConfig = toml::from_str("[style]\nedge_color = \"nope\"").unwrap();

        assert!(matches!(
            apply_args(config, &Args::default()),
            Err(DiagramError::Config(_))
        ));
    }
}
