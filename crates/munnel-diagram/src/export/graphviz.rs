//! Rendering DOT source through the Graphviz `dot` executable.

use std::io;

use graphviz_rust::{
    cmd::{CommandArg, Format},
    exec_dot,
};
use log::{debug, trace};

use super::OutputFormat;
use crate::error::DiagramError;

/// Name of the Graphviz executable the renderer spawns.
pub const DOT_PROGRAM: &str = "dot";

impl From<OutputFormat> for Format {
    fn from(format: OutputFormat) -> Self {
        match format {
            OutputFormat::Png => Format::Png,
            OutputFormat::Svg => Format::Svg,
            OutputFormat::Jpg => Format::Jpg,
            OutputFormat::Pdf => Format::Pdf,
            OutputFormat::Gif => Format::Gif,
        }
    }
}

/// Lays out and renders `dot_source`, returning the image bytes.
///
/// # Errors
///
/// - [`DiagramError::RendererUnavailable`] when `dot` cannot be spawned.
/// - [`DiagramError::Render`] when Graphviz fails or produces no output.
pub fn render(dot_source: String, format: OutputFormat) -> Result<Vec<u8>, DiagramError> {
    debug!(format:? = format, source_len = dot_source.len(); "Invoking graphviz");
    trace!(dot_source = dot_source.as_str(); "DOT source");

    let bytes = exec_dot(dot_source, vec![CommandArg::Format(format.into())])
        .map_err(classify_exec_error)?;

    if bytes.is_empty() {
        return Err(DiagramError::Render(format!(
            "`{DOT_PROGRAM}` produced no {format} output"
        )));
    }

    debug!(bytes = bytes.len(); "Graphviz rendering finished");
    Ok(bytes)
}

fn classify_exec_error(err: io::Error) -> DiagramError {
    match err.kind() {
        io::ErrorKind::NotFound | io::ErrorKind::PermissionDenied => {
            DiagramError::RendererUnavailable {
                program: DOT_PROGRAM,
                source: err,
            }
        }
        _ => DiagramError::Render(err.to_string()),
    }
}
