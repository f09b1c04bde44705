//! Command-line argument definitions for the Munnel diagram CLI.
//!
//! Every argument is optional: running the binary bare renders
//! `munnel_connectivity.png` into the working directory.

use clap::Parser;

/// Command-line arguments for the Munnel diagram renderer
#[derive(Parser, Debug, Default)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// Path of the rendered image, overriding the name derived from the title
    #[arg(short, long)]
    pub output: Option<String>,

    /// Image format (png, svg, jpg, pdf, gif)
    #[arg(short, long)]
    pub format: Option<String>,

    /// Path to configuration file (TOML)
    #[arg(short, long)]
    pub config: Option<String>,

    /// Keep the DOT source next to the image
    #[arg(long)]
    pub emit_dot: bool,

    /// Print the DOT source to stdout instead of rendering
    #[arg(long)]
    pub print_dot: bool,

    /// Log level (off, error, warn, info, debug, trace)
    #[arg(long, default_value = "info")]
    pub log_level: String,
}
