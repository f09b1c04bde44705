//! The Munnel connectivity topology.
//!
//! Clients reach servers through a central Munnel Server. Every server runs
//! a Munnel Agent that dials out to the Munnel Server, possibly through a
//! firewall, so agents never accept inbound connections:
//!
//! ```text
//! agents >> firewall >> munnel server << clients
//! ```

use log::debug;

use munnel_diagram_core::semantic::Diagram;

use crate::{
    context::{DiagramContext, NodeRef},
    error::DiagramError,
};

/// Title of the diagram, which also names the output file.
pub const TITLE: &str = "Munnel Connectivity";

pub const CLIENTS_CLUSTER: &str = "Clients";
pub const SERVERS_CLUSTER: &str = "Servers";

pub const CLIENT_LABELS: [&str; 4] = [
    "Browser",
    "VNC Client",
    "Database Client",
    "Any other\nTCP client",
];

pub const AGENT_LABELS: [&str; 4] = [
    "Munnel Agent On\nDatabase Server",
    "Munnel Agent On\nVNC Server",
    "Munnel Agent On\nWeb Server",
    "Munnel Agent On\nany other server\naccepting TCP\nconnections.",
];

pub const FIREWALL_LABEL: &str = "Servers running\nMunnel Agents\ncan be behind\na firewall";

pub const MUNNEL_SERVER_LABEL: &str = "Munnel Server";

/// Handles to every node of the topology.
#[derive(Debug, Clone, Copy)]
pub struct MunnelTopology {
    pub clients: [NodeRef; 4],
    pub agents: [NodeRef; 4],
    pub firewall: NodeRef,
    pub munnel_server: NodeRef,
}

/// Declares the Munnel connectivity topology into `ctx`.
///
/// The "Clients" cluster holds the four client types. The "Servers" cluster
/// holds the four agent-bearing servers plus an unlabeled inner cluster with
/// the firewall. The Munnel Server sits alone in an unlabeled cluster.
///
/// # Errors
///
/// Returns [`DiagramError::Graph`] if an edge cannot be declared, which only
/// happens when `ctx` has been misused by the caller.
pub fn munnel_connectivity(ctx: &mut DiagramContext) -> Result<MunnelTopology, DiagramError> {
    let (_, clients) = ctx.cluster(CLIENTS_CLUSTER, |ctx| {
        CLIENT_LABELS.map(|label| ctx.client(label))
    });

    let (_, (agents, firewall)) = ctx.cluster(SERVERS_CLUSTER, |ctx| {
        let agents = AGENT_LABELS.map(|label| ctx.server(label));
        let (_, firewall) = ctx.cluster("", |ctx| ctx.firewall(FIREWALL_LABEL));
        (agents, firewall)
    });

    let (_, munnel_server) = ctx.cluster("", |ctx| ctx.server(MUNNEL_SERVER_LABEL));

    ctx.fan_in(&agents, firewall)?;
    ctx.connect(firewall, munnel_server)?;
    ctx.gather(munnel_server, &clients)?;

    debug!(
        clients = clients.len(),
        agents = agents.len();
        "Munnel topology declared"
    );

    Ok(MunnelTopology {
        clients,
        agents,
        firewall,
        munnel_server,
    })
}

/// Builds the complete Munnel connectivity diagram with default layout.
pub fn diagram() -> Result<Diagram, DiagramError> {
    let mut ctx = DiagramContext::new(TITLE);
    munnel_connectivity(&mut ctx)?;
    Ok(ctx.finish())
}

#[cfg(test)]
mod tests {
    use munnel_diagram_core::semantic::{EdgeDirection, Element, NodeKind};

    use super::*;
    use crate::structure::DiagramGraph;

    #[test]
    fn test_cluster_layout() {
        let diagram = diagram().unwrap();
        let top: Vec<_> = diagram.scope().elements().iter().collect();

        let labels: Vec<&str> = top
            .iter()
            .filter_map(|element| match element {
                Element::Cluster(cluster) => Some(cluster.label()),
                _ => None,
            })
            .collect();
        assert_eq!(labels, vec![CLIENTS_CLUSTER, SERVERS_CLUSTER, ""]);

        // No nodes live outside a cluster.
        assert!(!top.iter().any(|element| matches!(element, Element::Node(_))));
    }

    #[test]
    fn test_firewall_sits_in_nested_cluster() {
        let diagram = diagram().unwrap();
        let graph = DiagramGraph::from_diagram(&diagram).unwrap();

        let firewall_cluster = graph
            .clusters()
            .find(|info| info.depth() == 1)
            .expect("nested cluster");
        assert_eq!(firewall_cluster.cluster().label(), "");
        let anchor = firewall_cluster.anchor().unwrap();
        assert_eq!(graph.node(anchor).unwrap().kind(), NodeKind::Firewall);
    }

    #[test]
    fn test_clients_use_backward_edges() {
        let mut ctx = DiagramContext::new(TITLE);
        let topology = munnel_connectivity(&mut ctx).unwrap();
        let diagram = ctx.finish();

        let backward: Vec<_> = diagram
            .scope()
            .elements()
            .iter()
            .filter_map(|element| match element {
                Element::Edge(edge) if edge.direction() == EdgeDirection::Backward => Some(edge),
                _ => None,
            })
            .collect();

        assert_eq!(backward.len(), 4);
        for (edge, client) in backward.iter().zip(topology.clients) {
            assert_eq!(edge.source(), topology.munnel_server.id());
            assert_eq!(edge.flow(), (client.id(), topology.munnel_server.id()));
        }
    }
}
