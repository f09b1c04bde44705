//! DOT generation for validated diagrams.
//!
//! [`DotExporter`] turns a [`DiagramGraph`] into a `dot_structures::Graph`.
//! Nodes and clusters are emitted in declaration order with sequential DOT
//! names (`n0`, `n1`, ..., `cluster_0`, ...), so the same diagram always
//! produces the same source. Edges are hoisted to the top level after all
//! clusters, which keeps Graphviz from pulling endpoints into the cluster
//! an edge happened to be declared in.

use std::collections::HashMap;

use dot_structures::{
    Attribute, Edge as DotEdge, EdgeTy, Graph, GraphAttributes, Id as DotId, Node as DotNode,
    NodeId, Stmt, Subgraph, Vertex,
};
use graphviz_rust::printer::{DotPrinter, PrinterContext};
use log::debug;

use munnel_diagram_core::{
    color::Color,
    identifier::Id,
    semantic::{Cluster, Edge, EdgeDirection, Element, LineStyle, Node, NodeKind, Scope},
};

use crate::{config::StyleConfig, error::DiagramError, structure::DiagramGraph};

/// Height of a node with a single-line label, in inches.
pub const NODE_BASE_HEIGHT: f64 = 1.4;

/// Extra height per additional label line, in inches.
pub const LABEL_LINE_PADDING: f64 = 0.4;

const NODE_WIDTH: &str = "1.4";
const FONT_COLOR: &str = "#2D3436";
const CLUSTER_PEN_COLOR: &str = "#AEB6BE";

/// Cluster backgrounds, cycled by nesting depth.
pub const CLUSTER_BACKGROUNDS: [&str; 4] = ["#E5F5FD", "#EBF3E7", "#ECE8F6", "#FDF7E3"];

/// Height a node needs so its whole label fits.
pub fn node_height(node: &Node) -> f64 {
    NODE_BASE_HEIGHT + LABEL_LINE_PADDING * (node.label_lines() - 1) as f64
}

/// Background color for a cluster nested `depth` levels deep.
pub fn cluster_background(depth: usize) -> &'static str {
    CLUSTER_BACKGROUNDS[depth % CLUSTER_BACKGROUNDS.len()]
}

/// Quotes `text` as a DOT string, escaping quotes, backslashes and line breaks.
pub fn quote(text: &str) -> String {
    let mut quoted = String::with_capacity(text.len() + 2);
    quoted.push('"');
    for ch in text.chars() {
        match ch {
            '"' => quoted.push_str("\\\""),
            '\\' => quoted.push_str("\\\\"),
            '\n' => quoted.push_str("\\n"),
            '\r' => {}
            other => quoted.push(other),
        }
    }
    quoted.push('"');
    quoted
}

fn attr(key: &str, value: &str) -> Attribute {
    Attribute(DotId::Plain(key.to_string()), DotId::Escaped(quote(value)))
}

/// Shape, style and fill used for each node kind.
fn kind_attributes(kind: NodeKind) -> [Attribute; 3] {
    match kind {
        NodeKind::Client => [
            attr("shape", "box"),
            attr("style", "rounded,filled"),
            attr("fillcolor", "#DAE8FC"),
        ],
        NodeKind::Server => [
            attr("shape", "box3d"),
            attr("style", "filled"),
            attr("fillcolor", "#D5E8D4"),
        ],
        NodeKind::Firewall => [
            attr("shape", "octagon"),
            attr("style", "filled"),
            attr("fillcolor", "#F8CECC"),
        ],
    }
}

/// Converts validated diagrams to DOT.
#[derive(Debug, Clone)]
pub struct DotExporter {
    edge_color: Color,
    font_name: String,
}

impl DotExporter {
    /// Creates an exporter styled by `style`.
    ///
    /// # Errors
    ///
    /// Returns [`DiagramError::Config`] when the configured edge color is invalid.
    pub fn new(style: &StyleConfig) -> Result<Self, DiagramError> {
        Ok(Self {
            edge_color: style.edge_color().map_err(DiagramError::Config)?,
            font_name: style.font_name().to_string(),
        })
    }

    /// Builds the DOT graph for `graph`.
    pub fn export(&self, graph: &DiagramGraph<'_>) -> Graph {
        let diagram = graph.diagram();
        let names = Names::assign(graph);
        let compound = graph
            .edges()
            .any(|edge| names.is_cluster(edge.source()) || names.is_cluster(edge.target()));

        let mut stmts = vec![
            Stmt::GAttribute(GraphAttributes::Graph(self.graph_attributes(graph, compound))),
            Stmt::GAttribute(GraphAttributes::Node(self.node_defaults())),
            Stmt::GAttribute(GraphAttributes::Edge(vec![attr(
                "color",
                &self.edge_color.to_graphviz(),
            )])),
        ];
        stmts.extend(self.scope_statements(diagram.scope(), 0, &names));
        stmts.extend(graph.edges().map(|edge| Stmt::Edge(self.edge(edge, &names))));

        debug!(
            title = diagram.title(),
            statements = stmts.len(),
            compound = compound;
            "DOT graph assembled"
        );

        Graph::DiGraph {
            id: DotId::Escaped(quote(diagram.title())),
            strict: false,
            stmts,
        }
    }

    /// Builds the DOT graph for `graph` and prints it as DOT source.
    pub fn export_source(&self, graph: &DiagramGraph<'_>) -> String {
        self.export(graph).print(&mut PrinterContext::default())
    }

    fn graph_attributes(&self, graph: &DiagramGraph<'_>, compound: bool) -> Vec<Attribute> {
        let diagram = graph.diagram();
        let mut attributes = vec![
            attr("label", diagram.title()),
            attr("rankdir", &diagram.direction().to_string()),
            attr("pad", "2.0"),
            attr("splines", &diagram.curve_style().to_string()),
            attr("nodesep", "0.60"),
            attr("ranksep", "0.75"),
            attr("fontname", &self.font_name),
            attr("fontsize", "15"),
            attr("fontcolor", FONT_COLOR),
        ];
        if let Some(background) = diagram.background_color() {
            attributes.push(attr("bgcolor", &background.to_graphviz()));
        }
        if compound {
            attributes.push(attr("compound", "true"));
        }
        attributes
    }

    fn node_defaults(&self) -> Vec<Attribute> {
        vec![
            attr("shape", "box"),
            attr("style", "rounded"),
            attr("fixedsize", "false"),
            attr("width", NODE_WIDTH),
            attr("height", &format!("{NODE_BASE_HEIGHT:.1}")),
            attr("fontname", &self.font_name),
            attr("fontsize", "13"),
            attr("fontcolor", FONT_COLOR),
        ]
    }

    fn scope_statements(&self, scope: &Scope, depth: usize, names: &Names) -> Vec<Stmt> {
        scope
            .elements()
            .iter()
            .filter_map(|element| match element {
                Element::Node(node) => Some(Stmt::Node(self.node(node, names))),
                Element::Cluster(cluster) => {
                    Some(Stmt::Subgraph(self.cluster(cluster, depth, names)))
                }
                Element::Edge(_) => None,
            })
            .collect()
    }

    fn node(&self, node: &Node, names: &Names) -> DotNode {
        let mut attributes = vec![attr("label", node.label())];
        attributes.extend(kind_attributes(node.kind()));
        attributes.push(attr("height", &format!("{:.1}", node_height(node))));

        DotNode {
            id: NodeId(names.plain(node.id()), None),
            attributes,
        }
    }

    fn cluster(&self, cluster: &Cluster, depth: usize, names: &Names) -> Subgraph {
        let mut stmts = vec![
            Stmt::Attribute(attr("label", cluster.label())),
            Stmt::Attribute(attr("style", "rounded")),
            Stmt::Attribute(attr("labeljust", "l")),
            Stmt::Attribute(attr("pencolor", CLUSTER_PEN_COLOR)),
            Stmt::Attribute(attr("bgcolor", cluster_background(depth))),
            Stmt::Attribute(attr("fontname", &self.font_name)),
            Stmt::Attribute(attr("fontsize", "12")),
        ];
        stmts.extend(self.scope_statements(cluster.scope(), depth + 1, names));

        Subgraph {
            id: names.plain(cluster.id()),
            stmts,
        }
    }

    fn edge(&self, edge: &Edge, names: &Names) -> DotEdge {
        let mut attributes = Vec::new();
        match edge.direction() {
            EdgeDirection::Forward => {}
            EdgeDirection::Backward => attributes.push(attr("dir", "back")),
            EdgeDirection::Bidirectional => attributes.push(attr("dir", "both")),
            EdgeDirection::Plain => attributes.push(attr("dir", "none")),
        }

        let edge_attrs = edge.attrs();
        if let Some(label) = &edge_attrs.label {
            attributes.push(attr("label", label));
        }
        if let Some(color) = edge_attrs.color {
            attributes.push(attr("color", &color.to_graphviz()));
        }
        if edge_attrs.style != LineStyle::Solid {
            attributes.push(attr("style", edge_attrs.style.as_str()));
        }
        if names.is_cluster(edge.source()) {
            attributes.push(Attribute(
                DotId::Plain("ltail".to_string()),
                names.plain(edge.source()),
            ));
        }
        if names.is_cluster(edge.target()) {
            attributes.push(Attribute(
                DotId::Plain("lhead".to_string()),
                names.plain(edge.target()),
            ));
        }

        DotEdge {
            ty: EdgeTy::Pair(
                Vertex::N(NodeId(names.endpoint(edge.source()), None)),
                Vertex::N(NodeId(names.endpoint(edge.target()), None)),
            ),
            attributes,
        }
    }
}

/// DOT names for every node and cluster, plus the node each cluster is anchored on.
struct Names {
    names: HashMap<Id, String>,
    anchors: HashMap<Id, Id>,
}

impl Names {
    fn assign(graph: &DiagramGraph<'_>) -> Self {
        let mut names: HashMap<Id, String> = graph
            .nodes()
            .enumerate()
            .map(|(idx, node)| (node.id(), format!("n{idx}")))
            .collect();
        let mut anchors = HashMap::new();
        for (idx, info) in graph.clusters().enumerate() {
            let id = info.cluster().id();
            names.insert(id, format!("cluster_{idx}"));
            if let Some(anchor) = info.anchor() {
                anchors.insert(id, anchor);
            }
        }
        Self { names, anchors }
    }

    fn is_cluster(&self, id: Id) -> bool {
        self.anchors.contains_key(&id)
    }

    // Every id reaching the exporter was resolved by `DiagramGraph`.
    fn plain(&self, id: Id) -> DotId {
        DotId::Plain(
            self.names
                .get(&id)
                .cloned()
                .unwrap_or_else(|| id.to_string()),
        )
    }

    fn endpoint(&self, id: Id) -> DotId {
        self.plain(self.anchors.get(&id).copied().unwrap_or(id))
    }
}
