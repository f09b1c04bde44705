//! Scoped, declarative diagram construction.
//!
//! A [`DiagramContext`] collects node, cluster, and edge declarations in
//! order. Clusters are opened with a closure: every node declared inside the
//! closure belongs to the cluster, and the cluster is closed when the closure
//! returns.
//!
//! ```
//! use munnel_diagram::DiagramContext;
//!
//! let mut ctx = DiagramContext::new("Example");
//! let (_, clients) = ctx.cluster("Clients", |ctx| [ctx.client("Browser"), ctx.client("CLI")]);
//! let server = ctx.server("Relay");
//! ctx.fan_in(&clients, server).unwrap();
//!
//! let diagram = ctx.finish();
//! assert_eq!(diagram.title(), "Example");
//! ```

use std::{
    collections::HashSet,
    sync::atomic::{AtomicUsize, Ordering},
};

use log::trace;

use munnel_diagram_core::{
    color::Color,
    identifier::Id,
    semantic::{
        Cluster, CurveStyle, Diagram, Direction, Edge, EdgeAttrs, EdgeDirection, Element, Node,
        NodeKind, Scope,
    },
};

use crate::error::DiagramError;

/// Process-wide sequence for element ids, so handles from one context never
/// resolve inside another.
static NEXT_ELEMENT: AtomicUsize = AtomicUsize::new(0);

fn next_id(prefix: &str) -> Id {
    Id::sequenced(prefix, NEXT_ELEMENT.fetch_add(1, Ordering::Relaxed))
}

/// Handle to a node declared in a [`DiagramContext`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeRef(Id);

impl NodeRef {
    pub fn id(self) -> Id {
        self.0
    }
}

/// Handle to a cluster declared in a [`DiagramContext`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ClusterRef(Id);

impl ClusterRef {
    pub fn id(self) -> Id {
        self.0
    }
}

/// Anything an edge can start or end at.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Endpoint {
    Node(NodeRef),
    Cluster(ClusterRef),
}

impl Endpoint {
    pub fn id(self) -> Id {
        match self {
            Self::Node(node) => node.id(),
            Self::Cluster(cluster) => cluster.id(),
        }
    }
}

impl From<NodeRef> for Endpoint {
    fn from(node: NodeRef) -> Self {
        Self::Node(node)
    }
}

impl From<ClusterRef> for Endpoint {
    fn from(cluster: ClusterRef) -> Self {
        Self::Cluster(cluster)
    }
}

/// Elements collected for one open scope.
#[derive(Debug)]
struct OpenScope {
    cluster: Option<(Id, String)>,
    elements: Vec<Element>,
}

/// Collects declarations for a single diagram.
#[derive(Debug)]
pub struct DiagramContext {
    title: String,
    direction: Direction,
    curve_style: CurveStyle,
    background_color: Option<Color>,
    scopes: Vec<OpenScope>,
    declared: HashSet<Id>,
}

impl DiagramContext {
    /// Opens a context for a diagram titled `title` with default layout.
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            direction: Direction::default(),
            curve_style: CurveStyle::default(),
            background_color: None,
            scopes: vec![OpenScope {
                cluster: None,
                elements: Vec::new(),
            }],
            declared: HashSet::new(),
        }
    }

    pub fn with_direction(mut self, direction: Direction) -> Self {
        self.direction = direction;
        self
    }

    pub fn with_curve_style(mut self, curve_style: CurveStyle) -> Self {
        self.curve_style = curve_style;
        self
    }

    pub fn with_background_color(mut self, background_color: Option<Color>) -> Self {
        self.background_color = background_color;
        self
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    fn current(&mut self) -> &mut Vec<Element> {
        &mut self
            .scopes
            .last_mut()
            .expect("The root scope is never closed")
            .elements
    }

    /// Declares a node in the innermost open scope.
    pub fn node(&mut self, kind: NodeKind, label: impl Into<String>) -> NodeRef {
        let id = next_id("node");
        let node = Node::new(id, label, kind);
        trace!(id = id.to_string(), kind = kind.to_string(); "Node declared");

        self.declared.insert(id);
        self.current().push(Element::Node(node));
        NodeRef(id)
    }

    pub fn client(&mut self, label: impl Into<String>) -> NodeRef {
        self.node(NodeKind::Client, label)
    }

    pub fn server(&mut self, label: impl Into<String>) -> NodeRef {
        self.node(NodeKind::Server, label)
    }

    pub fn firewall(&mut self, label: impl Into<String>) -> NodeRef {
        self.node(NodeKind::Firewall, label)
    }

    /// Opens a cluster, runs `build` inside it, and closes it.
    ///
    /// Returns the cluster handle together with whatever `build` returned.
    /// An empty `label` draws an unlabeled frame.
    pub fn cluster<R>(
        &mut self,
        label: impl Into<String>,
        build: impl FnOnce(&mut Self) -> R,
    ) -> (ClusterRef, R) {
        let id = next_id("cluster");
        self.declared.insert(id);
        self.scopes.push(OpenScope {
            cluster: Some((id, label.into())),
            elements: Vec::new(),
        });

        let result = build(self);

        let closed = self.scopes.pop().expect("Cluster scope was pushed above");
        let (cluster_id, label) = closed.cluster.expect("Only cluster scopes are popped");
        trace!(
            id = cluster_id.to_string(),
            elements = closed.elements.len();
            "Cluster closed"
        );
        self.current().push(Element::Cluster(Cluster::new(
            cluster_id,
            label,
            Scope::new(closed.elements),
        )));

        (ClusterRef(id), result)
    }

    fn ensure_declared(&self, endpoint: Endpoint) -> Result<Id, DiagramError> {
        let id = endpoint.id();
        if self.declared.contains(&id) {
            Ok(id)
        } else {
            Err(DiagramError::Graph(format!(
                "`{id}` is not declared in diagram `{}`",
                self.title
            )))
        }
    }

    /// Declares a fully specified edge.
    ///
    /// # Errors
    ///
    /// Returns [`DiagramError::Graph`] if either endpoint was not declared in
    /// this context.
    pub fn connect_with(
        &mut self,
        source: impl Into<Endpoint>,
        target: impl Into<Endpoint>,
        direction: EdgeDirection,
        attrs: EdgeAttrs,
    ) -> Result<(), DiagramError> {
        let source = self.ensure_declared(source.into())?;
        let target = self.ensure_declared(target.into())?;
        self.current()
            .push(Element::Edge(Edge::new(source, target, direction, attrs)));
        Ok(())
    }

    /// `from >> to`
    pub fn connect(
        &mut self,
        from: impl Into<Endpoint>,
        to: impl Into<Endpoint>,
    ) -> Result<(), DiagramError> {
        self.connect_with(from, to, EdgeDirection::Forward, EdgeAttrs::default())
    }

    /// `sources >> target`: one forward edge from every source.
    pub fn fan_in<E>(
        &mut self,
        sources: &[E],
        target: impl Into<Endpoint>,
    ) -> Result<(), DiagramError>
    where
        E: Into<Endpoint> + Copy,
    {
        let target = target.into();
        self.ensure_all(sources.iter().map(|source| (*source).into()))?;
        for source in sources {
            self.connect(*source, target)?;
        }
        Ok(())
    }

    /// `source >> targets`: one forward edge to every target.
    pub fn fan_out<E>(
        &mut self,
        source: impl Into<Endpoint>,
        targets: &[E],
    ) -> Result<(), DiagramError>
    where
        E: Into<Endpoint> + Copy,
    {
        let source = source.into();
        self.ensure_all(targets.iter().map(|target| (*target).into()))?;
        for target in targets {
            self.connect(source, *target)?;
        }
        Ok(())
    }

    /// `a >> b >> c`: forward edges between consecutive endpoints.
    pub fn chain(&mut self, endpoints: &[Endpoint]) -> Result<(), DiagramError> {
        self.ensure_all(endpoints.iter().copied())?;
        for pair in endpoints.windows(2) {
            self.connect(pair[0], pair[1])?;
        }
        Ok(())
    }

    /// `target << sources`: backward edges, each flowing from a source into `target`.
    pub fn gather<E>(
        &mut self,
        target: impl Into<Endpoint>,
        sources: &[E],
    ) -> Result<(), DiagramError>
    where
        E: Into<Endpoint> + Copy,
    {
        let target = target.into();
        self.ensure_all(sources.iter().map(|source| (*source).into()))?;
        for source in sources {
            self.connect_with(
                target,
                *source,
                EdgeDirection::Backward,
                EdgeAttrs::default(),
            )?;
        }
        Ok(())
    }

    // Multi-edge declarations are all-or-nothing.
    fn ensure_all(&self, endpoints: impl Iterator<Item = Endpoint>) -> Result<(), DiagramError> {
        for endpoint in endpoints {
            self.ensure_declared(endpoint)?;
        }
        Ok(())
    }

    /// Closes the context and returns the finished diagram.
    pub fn finish(mut self) -> Diagram {
        let root = self.scopes.swap_remove(0);
        Diagram::new(
            self.title,
            Scope::new(root.elements),
            self.direction,
            self.curve_style,
            self.background_color,
        )
    }
}
