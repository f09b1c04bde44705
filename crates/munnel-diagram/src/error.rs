//! Error types for diagram operations.
//!
//! This module provides the main error type [`DiagramError`] which wraps
//! every failure that can occur while declaring, validating, rendering, or
//! writing a diagram.

use std::io;

use thiserror::Error;

/// The main error type for diagram operations.
#[derive(Debug, Error)]
pub enum DiagramError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// A reference that cannot be resolved, such as an edge endpoint that was
    /// never declared in the diagram.
    #[error("Graph error: {0}")]
    Graph(String),

    /// The Graphviz executable could not be started.
    #[error("Renderer `{program}` is unavailable: {source}")]
    RendererUnavailable {
        program: &'static str,
        #[source]
        source: io::Error,
    },

    #[error("Render error: {0}")]
    Render(String),

    #[error("Configuration error: {0}")]
    Config(String),
}

impl DiagramError {
    /// Returns true when the failure comes from a missing rendering backend
    /// rather than from the diagram itself.
    pub fn is_renderer_unavailable(&self) -> bool {
        matches!(self, Self::RendererUnavailable { .. })
    }
}
