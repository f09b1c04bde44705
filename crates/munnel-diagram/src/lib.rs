//! Munnel Diagram - Declarative architecture diagrams rendered with Graphviz.
//!
//! Diagrams are declared through a scoped [`DiagramContext`]: nodes,
//! clusters, and edges are collected in order, validated into a
//! [`DiagramGraph`], translated to DOT, and laid out by the Graphviz `dot`
//! executable. The [`topology`] module declares the Munnel connectivity
//! diagram itself.

pub mod config;
pub mod export;
pub mod topology;

mod context;
mod error;
mod structure;

pub use munnel_diagram_core::{color, identifier, semantic};

pub use context::{ClusterRef, DiagramContext, Endpoint, NodeRef};
pub use error::DiagramError;
pub use structure::{ClusterInfo, DiagramGraph, GraphStats};

use std::{
    fs,
    io::Write,
    path::{Path, PathBuf},
};

use log::{debug, info};
use tempfile::NamedTempFile;

use config::AppConfig;
use export::{dot::DotExporter, graphviz};

/// Result of writing a diagram to disk.
#[derive(Debug)]
pub struct RenderedDiagram {
    path: PathBuf,
    bytes: usize,
    dot_path: Option<PathBuf>,
    stats: GraphStats,
}

impl RenderedDiagram {
    /// Path of the written image.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Size of the written image in bytes.
    pub fn bytes(&self) -> usize {
        self.bytes
    }

    /// Path of the DOT source, when it was kept.
    pub fn dot_path(&self) -> Option<&Path> {
        self.dot_path.as_deref()
    }

    pub fn stats(&self) -> GraphStats {
        self.stats
    }
}

/// Builder for declaring and rendering diagrams.
///
/// # Examples
///
/// ```rust,no_run
/// use munnel_diagram::{DiagramBuilder, config::AppConfig, topology};
///
/// let builder = DiagramBuilder::new(AppConfig::default());
///
/// // Declare, render and write in one scoped step
/// let rendered = builder
///     .draw(topology::TITLE, |ctx| topology::munnel_connectivity(ctx).map(|_| ()))
///     .expect("Failed to render");
/// println!("{}", rendered.path().display());
/// ```
#[derive(Debug, Default)]
pub struct DiagramBuilder {
    config: AppConfig,
}

impl DiagramBuilder {
    /// Create a new diagram builder with the given configuration.
    pub fn new(config: AppConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    /// Opens a context titled `title` using the configured layout and background.
    ///
    /// # Errors
    ///
    /// Returns [`DiagramError::Config`] when the configured background color is invalid.
    pub fn context(&self, title: impl Into<String>) -> Result<DiagramContext, DiagramError> {
        let background = self
            .config
            .style()
            .background_color()
            .map_err(DiagramError::Config)?;

        Ok(DiagramContext::new(title)
            .with_direction(self.config.layout().direction())
            .with_curve_style(self.config.layout().curve_style())
            .with_background_color(background))
    }

    /// Declares a diagram inside `declare`, then renders and writes it.
    ///
    /// Rendering happens only after `declare` returns successfully; nothing
    /// is written when declaration, validation, or rendering fails.
    ///
    /// # Errors
    ///
    /// Returns the first error raised by `declare`, validation, Graphviz, or
    /// the filesystem.
    pub fn draw<F>(&self, title: &str, declare: F) -> Result<RenderedDiagram, DiagramError>
    where
        F: FnOnce(&mut DiagramContext) -> Result<(), DiagramError>,
    {
        info!(title = title; "Declaring diagram");
        let mut ctx = self.context(title)?;
        declare(&mut ctx)?;
        let diagram = ctx.finish();

        self.write(&diagram)
    }

    /// Validates `diagram` and returns its DOT source.
    ///
    /// # Errors
    ///
    /// Returns [`DiagramError::Graph`] for unresolved references and
    /// [`DiagramError::Config`] for invalid style settings.
    pub fn to_dot(&self, diagram: &semantic::Diagram) -> Result<String, DiagramError> {
        self.dot_source(diagram).map(|(source, _)| source)
    }

    /// Renders `diagram` to image bytes in the configured format.
    ///
    /// # Errors
    ///
    /// Returns validation errors, or [`DiagramError::RendererUnavailable`] /
    /// [`DiagramError::Render`] when Graphviz cannot produce the image.
    pub fn render(&self, diagram: &semantic::Diagram) -> Result<Vec<u8>, DiagramError> {
        let (source, _) = self.dot_source(diagram)?;
        graphviz::render(source, self.config.output().format())
    }

    /// Renders `diagram` and writes the image atomically.
    ///
    /// The image goes to the configured path, or to
    /// `<directory>/<file stem>.<extension>` where the stem is derived from
    /// the title. The directory is created when missing. When the DOT source
    /// is kept, both files are staged first and only moved into place once
    /// both were written.
    ///
    /// # Errors
    ///
    /// Returns [`DiagramError::Config`] when the kept DOT source would replace
    /// the image, rendering errors, and [`DiagramError::Io`] when writing fails.
    pub fn write(&self, diagram: &semantic::Diagram) -> Result<RenderedDiagram, DiagramError> {
        let output = self.config.output();
        let path = self.output_path(diagram);
        let dot_path = output.keep_dot().then(|| path.with_extension("dot"));
        if dot_path.as_deref() == Some(path.as_path()) {
            return Err(DiagramError::Config(format!(
                "image path `{}` would be overwritten by the kept DOT source",
                path.display()
            )));
        }

        let (source, stats) = self.dot_source(diagram)?;
        let bytes = graphviz::render(source.clone(), output.format())?;

        let mut files = vec![(path.as_path(), bytes.as_slice())];
        if let Some(dot_path) = &dot_path {
            files.push((dot_path.as_path(), source.as_bytes()));
        }
        write_atomic(&files)?;

        info!(
            path = path.display().to_string(),
            bytes = bytes.len(),
            nodes = stats.nodes(),
            edges = stats.edges;
            "Diagram written"
        );

        Ok(RenderedDiagram {
            path,
            bytes: bytes.len(),
            dot_path,
            stats,
        })
    }

    /// Path the image for `diagram` is written to.
    pub fn output_path(&self, diagram: &semantic::Diagram) -> PathBuf {
        let output = self.config.output();
        if let Some(path) = output.path() {
            return path.to_path_buf();
        }

        let file_name = format!("{}.{}", diagram.file_stem(), output.format().extension());
        match output.directory() {
            Some(directory) => directory.join(file_name),
            None => PathBuf::from(file_name),
        }
    }

    fn dot_source(
        &self,
        diagram: &semantic::Diagram,
    ) -> Result<(String, GraphStats), DiagramError> {
        info!(title = diagram.title(); "Building diagram structure");
        let graph = DiagramGraph::from_diagram(diagram)?;
        let stats = graph.stats();

        let exporter = DotExporter::new(self.config.style())?;
        let source = exporter.export_source(&graph);
        debug!(source_len = source.len(), stats:? = stats; "DOT source generated");

        Ok((source, stats))
    }
}

/// Writes each file to a temporary file beside its target, then renames them
/// into place. Nothing is renamed unless every file was staged.
fn write_atomic(files: &[(&Path, &[u8])]) -> Result<(), DiagramError> {
    let mut staged = Vec::with_capacity(files.len());
    for (path, contents) in files {
        let directory = match path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };
        fs::create_dir_all(directory)?;

        let mut file = NamedTempFile::new_in(directory)?;
        file.write_all(contents)?;
        file.flush()?;
        staged.push((file, *path, contents.len()));
    }

    for (file, path, bytes) in staged {
        file.persist(path).map_err(|err| err.error)?;
        debug!(path = path.display().to_string(), bytes = bytes; "File persisted");
    }
    Ok(())
}
