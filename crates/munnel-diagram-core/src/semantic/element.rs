//! Diagram element types for the semantic model.

use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

use crate::{color::Color, identifier::Id, semantic::diagram::Scope};

/// Visual category of a node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum NodeKind {
    Client,
    Server,
    Firewall,
}

impl NodeKind {
    pub const ALL: [NodeKind; 3] = [NodeKind::Client, NodeKind::Server, NodeKind::Firewall];

    fn as_str(self) -> &'static str {
        match self {
            Self::Client => "client",
            Self::Server => "server",
            Self::Firewall => "firewall",
        }
    }
}

impl FromStr for NodeKind {
    type Err = &'static str;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "client" => Ok(Self::Client),
            "server" => Ok(Self::Server),
            "firewall" => Ok(Self::Firewall),
            _ => Err("Unsupported node kind"),
        }
    }
}

impl fmt::Display for NodeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A labeled box in the diagram.
#[derive(Debug, Clone, PartialEq)]
pub struct Node {
    id: Id,
    label: String,
    kind: NodeKind,
}

impl Node {
    pub fn new(id: Id, label: impl Into<String>, kind: NodeKind) -> Self {
        Self {
            id,
            label: label.into(),
            kind,
        }
    }

    pub fn id(&self) -> Id {
        self.id
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn kind(&self) -> NodeKind {
        self.kind
    }

    /// Number of lines the label occupies once rendered.
    pub fn label_lines(&self) -> usize {
        self.label.lines().count().max(1)
    }
}

impl fmt::Display for Node {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.id)
    }
}

/// A visual grouping of nodes and nested clusters.
///
/// The label may be empty, which draws an unlabeled frame.
#[derive(Debug, Clone, PartialEq)]
pub struct Cluster {
    id: Id,
    label: String,
    scope: Scope,
}

impl Cluster {
    pub fn new(id: Id, label: impl Into<String>, scope: Scope) -> Self {
        Self {
            id,
            label: label.into(),
            scope,
        }
    }

    pub fn id(&self) -> Id {
        self.id
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    /// Borrow the elements grouped by this cluster.
    pub fn scope(&self) -> &Scope {
        &self.scope
    }

    /// Returns the first node found in this cluster, depth first.
    ///
    /// Edges that touch a cluster are anchored on this node.
    pub fn first_node(&self) -> Option<&Node> {
        self.scope.elements().iter().find_map(|element| match element {
            Element::Node(node) => Some(node),
            Element::Cluster(cluster) => cluster.first_node(),
            Element::Edge(_) => None,
        })
    }
}

/// Direction of the arrow drawn for an edge.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EdgeDirection {
    #[default]
    Forward, // ->
    Backward,      // <-
    Bidirectional, // <->
    Plain,         // -
}

impl EdgeDirection {
    fn as_str(self) -> &'static str {
        match self {
            Self::Forward => "->",
            Self::Backward => "<-",
            Self::Bidirectional => "<->",
            Self::Plain => "-",
        }
    }
}

impl FromStr for EdgeDirection {
    type Err = &'static str;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "->" => Ok(Self::Forward),
            "<-" => Ok(Self::Backward),
            "<->" => Ok(Self::Bidirectional),
            "-" => Ok(Self::Plain),
            _ => Err("Invalid edge direction"),
        }
    }
}

impl fmt::Display for EdgeDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Line style used to stroke an edge.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum LineStyle {
    #[default]
    Solid,
    Dashed,
    Dotted,
    Bold,
}

impl LineStyle {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Solid => "solid",
            Self::Dashed => "dashed",
            Self::Dotted => "dotted",
            Self::Bold => "bold",
        }
    }
}

/// Optional presentation attributes of an edge.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EdgeAttrs {
    pub label: Option<String>,
    pub color: Option<Color>,
    pub style: LineStyle,
}

impl EdgeAttrs {
    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    pub fn with_color(mut self, color: Color) -> Self {
        self.color = Some(color);
        self
    }

    pub fn with_style(mut self, style: LineStyle) -> Self {
        self.style = style;
        self
    }
}

/// A directed connection between two nodes or clusters.
#[derive(Debug, Clone, PartialEq)]
pub struct Edge {
    source: Id,
    target: Id,
    direction: EdgeDirection,
    attrs: EdgeAttrs,
}

impl Edge {
    pub fn new(source: Id, target: Id, direction: EdgeDirection, attrs: EdgeAttrs) -> Self {
        Self {
            source,
            target,
            direction,
            attrs,
        }
    }

    /// Get the declared source endpoint.
    pub fn source(&self) -> Id {
        self.source
    }

    /// Get the declared target endpoint.
    pub fn target(&self) -> Id {
        self.target
    }

    pub fn direction(&self) -> EdgeDirection {
        self.direction
    }

    pub fn attrs(&self) -> &EdgeAttrs {
        &self.attrs
    }

    /// Returns the `(from, to)` pair the arrow visually runs along.
    ///
    /// A `Backward` edge declared as `target <- source` flows from its
    /// declared target into its declared source.
    ///
    /// # Examples
    ///
    /// ```
    /// use munnel_diagram_core::{identifier::Id, semantic::*};
    ///
    /// let server = Id::new("server");
    /// let client = Id::new("client");
    /// let edge = Edge::new(server, client, EdgeDirection::Backward, EdgeAttrs::default());
    /// assert_eq!(edge.flow(), (client, server));
    /// ```
    pub fn flow(&self) -> (Id, Id) {
        match self.direction {
            EdgeDirection::Backward => (self.target, self.source),
            EdgeDirection::Forward | EdgeDirection::Bidirectional | EdgeDirection::Plain => {
                (self.source, self.target)
            }
        }
    }
}

impl fmt::Display for Edge {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} {}", self.source, self.direction, self.target)
    }
}

/// Any element that can appear inside a [`Scope`].
#[derive(Debug, Clone, PartialEq)]
pub enum Element {
    Node(Node),
    Cluster(Cluster),
    Edge(Edge),
}
