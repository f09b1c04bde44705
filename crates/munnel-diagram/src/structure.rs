//! Resolved graph structure of a diagram.
//!
//! [`DiagramGraph`] walks the semantic model once, checks that every id is
//! declared exactly once and that every edge endpoint resolves, and stores
//! the result as a `petgraph` directed graph whose edges follow each
//! declaration's visual flow.
//!
//! Cluster endpoints resolve to the cluster's first node (depth first), which
//! is also where the DOT exporter anchors `lhead`/`ltail` edges.

use indexmap::IndexMap;
use log::{debug, trace};
use petgraph::{
    Direction as PetDirection,
    graph::{DiGraph, NodeIndex},
};

use munnel_diagram_core::{
    identifier::Id,
    semantic::{Cluster, Diagram, Edge, Element, Node, NodeKind, Scope},
};

use crate::error::DiagramError;

/// Placement of a cluster within the diagram.
#[derive(Debug, Clone, Copy)]
pub struct ClusterInfo<'a> {
    cluster: &'a Cluster,
    depth: usize,
    anchor: Option<Id>,
}

impl<'a> ClusterInfo<'a> {
    pub fn cluster(&self) -> &'a Cluster {
        self.cluster
    }

    /// Nesting depth; top-level clusters have depth 0.
    pub fn depth(&self) -> usize {
        self.depth
    }

    /// Node that edges touching this cluster attach to.
    pub fn anchor(&self) -> Option<Id> {
        self.anchor
    }
}

/// Counts describing a diagram.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct GraphStats {
    pub clients: usize,
    pub servers: usize,
    pub firewalls: usize,
    pub clusters: usize,
    pub edges: usize,
}

impl GraphStats {
    /// Total number of nodes of every kind.
    pub fn nodes(&self) -> usize {
        self.clients + self.servers + self.firewalls
    }
}

/// A validated diagram with resolved edge endpoints.
#[derive(Debug)]
pub struct DiagramGraph<'a> {
    diagram: &'a Diagram,
    graph: DiGraph<&'a Node, &'a Edge>,
    node_indices: IndexMap<Id, NodeIndex>,
    clusters: IndexMap<Id, ClusterInfo<'a>>,
    edges: Vec<&'a Edge>,
}

impl<'a> DiagramGraph<'a> {
    /// Builds and validates the graph for `diagram`.
    ///
    /// # Errors
    ///
    /// Returns [`DiagramError::Graph`] when an id is declared twice, when an
    /// edge names an endpoint that was never declared, or when an edge
    /// touches a cluster containing no nodes.
    pub fn from_diagram(diagram: &'a Diagram) -> Result<Self, DiagramError> {
        let mut structure = Self {
            diagram,
            graph: DiGraph::new(),
            node_indices: IndexMap::new(),
            clusters: IndexMap::new(),
            edges: Vec::new(),
        };

        structure.collect_scope(diagram.scope(), 0)?;

        for edge in std::mem::take(&mut structure.edges) {
            let (from, to) = edge.flow();
            let from_idx = structure.resolve_endpoint(from, edge)?;
            let to_idx = structure.resolve_endpoint(to, edge)?;
            structure.graph.add_edge(from_idx, to_idx, edge);
            structure.edges.push(edge);
        }

        debug!(
            title = diagram.title(),
            nodes = structure.node_count(),
            clusters = structure.cluster_count(),
            edges = structure.edge_count();
            "Diagram structure resolved"
        );

        Ok(structure)
    }

    fn collect_scope(&mut self, scope: &'a Scope, depth: usize) -> Result<(), DiagramError> {
        for element in scope.elements() {
            match element {
                Element::Node(node) => {
                    self.ensure_unique(node.id())?;
                    let idx = self.graph.add_node(node);
                    self.node_indices.insert(node.id(), idx);
                    trace!(
                        id = node.id().to_string(),
                        kind = node.kind().to_string();
                        "Node collected"
                    );
                }
                Element::Cluster(cluster) => {
                    self.ensure_unique(cluster.id())?;
                    self.clusters.insert(
                        cluster.id(),
                        ClusterInfo {
                            cluster,
                            depth,
                            anchor: cluster.first_node().map(Node::id),
                        },
                    );
                    self.collect_scope(cluster.scope(), depth + 1)?;
                }
                Element::Edge(edge) => self.edges.push(edge),
            }
        }
        Ok(())
    }

    fn ensure_unique(&self, id: Id) -> Result<(), DiagramError> {
        if self.node_indices.contains_key(&id) || self.clusters.contains_key(&id) {
            return Err(DiagramError::Graph(format!(
                "`{id}` is declared more than once in diagram `{}`",
                self.diagram.title()
            )));
        }
        Ok(())
    }

    fn resolve_endpoint(&self, id: Id, edge: &Edge) -> Result<NodeIndex, DiagramError> {
        if let Some(idx) = self.node_indices.get(&id) {
            return Ok(*idx);
        }

        match self.clusters.get(&id) {
            Some(info) => info
                .anchor
                .and_then(|anchor| self.node_indices.get(&anchor).copied())
                .ok_or_else(|| {
                    DiagramError::Graph(format!(
                        "edge `{edge}` connects to cluster `{id}` which contains no nodes"
                    ))
                }),
            None => Err(DiagramError::Graph(format!(
                "edge `{edge}` references `{id}`, which is not declared in diagram `{}`",
                self.diagram.title()
            ))),
        }
    }

    pub fn diagram(&self) -> &'a Diagram {
        self.diagram
    }

    pub fn node_count(&self) -> usize {
        self.graph.node_count()
    }

    pub fn edge_count(&self) -> usize {
        self.graph.edge_count()
    }

    pub fn cluster_count(&self) -> usize {
        self.clusters.len()
    }

    /// Iterates nodes in declaration order.
    pub fn nodes(&self) -> impl Iterator<Item = &'a Node> + '_ {
        self.node_indices.values().map(|idx| self.graph[*idx])
    }

    /// Iterates edges in declaration order.
    pub fn edges(&self) -> impl Iterator<Item = &'a Edge> + '_ {
        self.edges.iter().copied()
    }

    pub fn node(&self, id: Id) -> Option<&'a Node> {
        self.node_indices.get(&id).map(|idx| self.graph[*idx])
    }

    pub fn cluster(&self, id: Id) -> Option<ClusterInfo<'a>> {
        self.clusters.get(&id).copied()
    }

    /// Iterates clusters in declaration order, outer clusters first.
    pub fn clusters(&self) -> impl Iterator<Item = ClusterInfo<'a>> + '_ {
        self.clusters.values().copied()
    }

    pub fn nodes_of_kind(&self, kind: NodeKind) -> Vec<&'a Node> {
        self.nodes().filter(|node| node.kind() == kind).collect()
    }

    /// Nodes that `id` flows into.
    pub fn outgoing(&self, id: Id) -> Vec<&'a Node> {
        self.neighbors(id, PetDirection::Outgoing)
    }

    /// Nodes flowing into `id`.
    pub fn incoming(&self, id: Id) -> Vec<&'a Node> {
        self.neighbors(id, PetDirection::Incoming)
    }

    fn neighbors(&self, id: Id, direction: PetDirection) -> Vec<&'a Node> {
        let Some(idx) = self.node_indices.get(&id) else {
            return Vec::new();
        };
        let mut neighbors: Vec<_> = self
            .graph
            .neighbors_directed(*idx, direction)
            .map(|neighbor| self.graph[neighbor])
            .collect();
        // petgraph yields the most recently added edge first
        neighbors.reverse();
        neighbors
    }

    pub fn stats(&self) -> GraphStats {
        let count = |kind| self.nodes().filter(|node| node.kind() == kind).count();
        GraphStats {
            clients: count(NodeKind::Client),
            servers: count(NodeKind::Server),
            firewalls: count(NodeKind::Firewall),
            clusters: self.cluster_count(),
            edges: self.edge_count(),
        }
    }
}

#[cfg(test)]
mod tests {
    use munnel_diagram_core::semantic::{CurveStyle, Direction, EdgeAttrs, EdgeDirection};

    use super::*;

    fn node(name: &str, kind: NodeKind) -> Element {
        Element::Node(Node::new(Id::new(name), name, kind))
    }

    fn edge(source: &str, target: &str, direction: EdgeDirection) -> Element {
        Element::Edge(Edge::new(
            Id::new(source),
            Id::new(target),
            direction,
            EdgeAttrs::default(),
        ))
    }

    fn diagram(elements: Vec<Element>) -> Diagram {
        Diagram::new(
            "Structure Test",
            Scope::new(elements),
            Direction::default(),
            CurveStyle::default(),
            None,
        )
    }

    #[test]
    fn test_resolves_nodes_and_edges() {
        let diagram = diagram(vec![
            node("st_browser", NodeKind::Client),
            node("st_relay", NodeKind::Server),
            edge("st_browser", "st_relay", EdgeDirection::Forward),
        ]);

        let graph = DiagramGraph::from_diagram(&diagram).unwrap();

        assert_eq!(graph.node_count(), 2);
        assert_eq!(graph.edge_count(), 1);
        let outgoing = graph.outgoing(Id::new("st_browser"));
        assert_eq!(outgoing.len(), 1);
        assert_eq!(outgoing[0].label(), "st_relay");
    }

    #[test]
    fn test_backward_edge_flows_into_declared_source() {
        let diagram = diagram(vec![
            node("st_back_client", NodeKind::Client),
            node("st_back_server", NodeKind::Server),
            edge("st_back_server", "st_back_client", EdgeDirection::Backward),
        ]);

        let graph = DiagramGraph::from_diagram(&diagram).unwrap();

        let incoming = graph.incoming(Id::new("st_back_server"));
        assert_eq!(incoming.len(), 1);
        assert_eq!(incoming[0].label(), "st_back_client");
        assert!(graph.outgoing(Id::new("st_back_server")).is_empty());
    }

    #[test]
    fn test_unknown_endpoint_is_rejected() {
        let diagram = diagram(vec![
            node("st_known", NodeKind::Client),
            edge("st_known", "st_never_declared", EdgeDirection::Forward),
        ]);

        let err = DiagramGraph::from_diagram(&diagram).unwrap_err();
        match err {
            DiagramError::Graph(message) => {
                assert!(message.contains("st_never_declared"), "{message}")
            }
            other => panic!("expected graph error, got {other:?}"),
        }
    }

    #[test]
    fn test_duplicate_id_is_rejected() {
        let diagram = diagram(vec![
            node("st_dup", NodeKind::Client),
            node("st_dup", NodeKind::Server),
        ]);

        assert!(matches!(
            DiagramGraph::from_diagram(&diagram),
            Err(DiagramError::Graph(_))
        ));
    }

    #[test]
    fn test_cluster_endpoint_resolves_to_first_node() {
        let cluster = Cluster::new(
            Id::new("st_group"),
            "Group",
            Scope::new(vec![
                node("st_group_first", NodeKind::Server),
                node("st_group_second", NodeKind::Server),
            ]),
        );
        let diagram = diagram(vec![
            node("st_outside", NodeKind::Client),
            Element::Cluster(cluster),
            edge("st_outside", "st_group", EdgeDirection::Forward),
        ]);

        let graph = DiagramGraph::from_diagram(&diagram).unwrap();

        let targets = graph.outgoing(Id::new("st_outside"));
        assert_eq!(targets[0].label(), "st_group_first");
        assert_eq!(graph.cluster(Id::new("st_group")).unwrap().depth(), 0);
    }

    #[test]
    fn test_empty_cluster_endpoint_is_rejected() {
        let diagram = diagram(vec![
            node("st_lonely", NodeKind::Client),
            Element::Cluster(Cluster::new(Id::new("st_empty"), "", Scope::default())),
            edge("st_lonely", "st_empty", EdgeDirection::Forward),
        ]);

        let err = DiagramGraph::from_diagram(&diagram).unwrap_err();
        assert!(err.to_string().contains("contains no nodes"));
    }

    #[test]
    fn test_stats_and_nested_depth() {
        let inner = Cluster::new(
            Id::new("st_inner"),
            "",
            Scope::new(vec![node("st_fw", NodeKind::Firewall)]),
        );
        let outer = Cluster::new(
            Id::new("st_outer"),
            "Servers",
            Scope::new(vec![node("st_agent", NodeKind::Server), Element::Cluster(inner)]),
        );
        let diagram = diagram(vec![
            Element::Cluster(outer),
            edge("st_agent", "st_fw", EdgeDirection::Forward),
        ]);

        let graph = DiagramGraph::from_diagram(&diagram).unwrap();

        assert_eq!(
            graph.stats(),
            GraphStats {
                clients: 0,
                servers: 1,
                firewalls: 1,
                clusters: 2,
                edges: 1,
            }
        );
        assert_eq!(graph.cluster(Id::new("st_inner")).unwrap().depth(), 1);
        assert_eq!(graph.stats().nodes(), 2);
    }
}
