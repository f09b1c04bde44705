//! CLI logic for the Munnel diagram renderer.
//!
//! Loads configuration, applies command-line overrides, and renders the
//! Munnel connectivity diagram (or prints its DOT source).

pub mod error_adapter;

mod args;
mod config;

pub use args::Args;

use std::io::{self, Write};

use log::info;

use munnel_diagram::{DiagramBuilder, DiagramError, topology};

/// Run the Munnel diagram CLI application
///
/// With `--print-dot` the DOT source is written to stdout and Graphviz is
/// never invoked. Otherwise the diagram is rendered and written to the
/// configured location.
///
/// # Errors
///
/// Returns `DiagramError` for:
/// - Configuration loading or validation errors
/// - Graph resolution errors
/// - Missing Graphviz or rendering errors
/// - File I/O errors
pub fn run(args: &Args) -> Result<(), DiagramError> {
    let app_config = config::load_config(args.config.as_ref())?;
    let app_config = config::apply_args(app_config, args)?;
    let builder = DiagramBuilder::new(app_config);

    if args.print_dot {
        let diagram = topology::diagram()?;
        let source = builder.to_dot(&diagram)?;

        let mut stdout = io::stdout().lock();
        stdout.write_all(source.as_bytes())?;
        stdout.write_all(b"\n")?;
        return Ok(());
    }

    let rendered = builder.draw(topology::TITLE, |ctx| {
        topology::munnel_connectivity(ctx).map(|_| ())
    })?;

    info!(
        output_file = rendered.path().display().to_string(),
        nodes = rendered.stats().nodes(),
        edges = rendered.stats().edges;
        "Diagram exported successfully"
    );
    if let Some(dot_path) = rendered.dot_path() {
        info!(dot_file = dot_path.display().to_string(); "DOT source kept");
    }

    Ok(())
}
