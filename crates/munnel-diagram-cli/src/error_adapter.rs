//! Error adapter for converting DiagramError to miette diagnostics.
//!
//! This module bridges the library's error type and miette's report
//! formatting used in the CLI, attaching a stable code and, where the user
//! can act on it, a help message.

use std::{error::Error, fmt};

use miette::{Diagnostic as MietteDiagnostic, LabeledSpan};

use munnel_diagram::DiagramError;

/// Adapter rendering a [`DiagramError`] as a miette diagnostic.
pub struct ErrorAdapter<'a>(pub &'a DiagramError);

impl fmt::Debug for ErrorAdapter<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(&self.0, f)
    }
}

impl fmt::Display for ErrorAdapter<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

impl Error for ErrorAdapter<'_> {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        self.0.source()
    }
}

impl MietteDiagnostic for ErrorAdapter<'_> {
    fn code<'a>(&'a self) -> Option<Box<dyn fmt::Display + 'a>> {
        let code = match &self.0 {
            DiagramError::Io(_) => "munnel_diagram::io",
            DiagramError::Graph(_) => "munnel_diagram::graph",
            DiagramError::RendererUnavailable { .. } => "munnel_diagram::renderer_unavailable",
            DiagramError::Render(_) => "munnel_diagram::render",
            DiagramError::Config(_) => "munnel_diagram::config",
        };
        Some(Box::new(code))
    }

    fn help<'a>(&'a self) -> Option<Box<dyn fmt::Display + 'a>> {
        let help = match &self.0 {
            DiagramError::RendererUnavailable { program, .. } => format!(
                "Install Graphviz and make sure `{program}` is on PATH, \
                 or use --print-dot to get the DOT source without rendering"
            ),
            DiagramError::Config(_) => {
                "Check the configuration file and the --format flag".to_string()
            }
            DiagramError::Io(_) => {
                "Check that the output directory exists and is writable".to_string()
            }
            DiagramError::Graph(_) | DiagramError::Render(_) => return None,
        };
        Some(Box::new(help))
    }

    fn source_code(&self) -> Option<&dyn miette::SourceCode> {
        None
    }

    fn labels(&self) -> Option<Box<dyn Iterator<Item = LabeledSpan> + '_>> {
        None
    }
}

/// Renders `err` as a graphical miette report.
pub fn render_report(err: &DiagramError) -> String {
    let mut writer = String::new();
    if let Err(fmt_err) =
        miette::GraphicalReportHandler::new().render_report(&mut writer, &ErrorAdapter(err))
    {
        return format!("{err} (report formatting failed: {fmt_err})");
    }
    writer
}

#[cfg(test)]
mod tests {
    use std::io;

    use super::*;

    fn code(err: &DiagramError) -> String {
        ErrorAdapter(err).code().unwrap().to_string()
    }

    #[test]
    fn test_codes() {
        assert_eq!(
            code(&DiagramError::Graph("x".to_string())),
            "munnel_diagram::graph"
        );
        assert_eq!(
            code(&DiagramError::Config("x".to_string())),
            "munnel_diagram::config"
        );
        assert_eq!(
            code(&DiagramError::Io(io::Error::other("x"))),
            "munnel_diagram::io"
        );
    }

    #[test]
    fn test_renderer_unavailable_suggests_graphviz() {
        let err = DiagramError::RendererUnavailable {
            program: "dot",
            source: io::Error::new(io::ErrorKind::NotFound, "not found"),
        };
        let adapter = ErrorAdapter(&err);

        let help = adapter.help().unwrap().to_string();
        assert!(help.contains("Graphviz"));
        assert!(help.contains("`dot`"));
        assert!(adapter.source().is_some());
    }

    #[test]
    fn test_graph_error_has_no_help() {
        let err = DiagramError::Graph("edge references unknown node".to_string());
        let adapter = ErrorAdapter(&err);

        assert!(adapter.help().is_none());
        assert_eq!(
            adapter.to_string(),
            "Graph error: edge references unknown node"
        );
    }

    #[test]
    fn test_render_report_includes_code_and_help() {
        let err = DiagramError::RendererUnavailable {
            program: "dot",
            source: io::Error::new(io::ErrorKind::NotFound, "not found"),
        };

        let report = render_report(&err);

        assert!(report.contains("munnel_diagram::renderer_unavailable"), "{report}");
        assert!(report.contains("Graphviz"), "{report}");
    }
}
