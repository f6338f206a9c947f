//! Graph view over the canonical circuit using petgraph.
//!
//! Used for connectivity queries (neighbors of a selected node, island
//! counts); the canonical [`GraphData`] stays the source of truth.

use petgraph::algo::connected_components;
use petgraph::graph::{DiGraph, NodeIndex};
use petgraph::visit::EdgeRef;
use petgraph::Direction;
use serde::{Deserialize, Serialize};

use super::{GraphData, GraphLink, GraphNode};

/// Borrowed petgraph view of a [`GraphData`]
pub struct CircuitGraphView<'a> {
    graph: DiGraph<&'a GraphNode, &'a GraphLink>,
    data: &'a GraphData,
}

/// One edge seen from a given node
#[derive(Debug, Clone, PartialEq)]
pub struct Neighbor<'a> {
    pub node: &'a GraphNode,
    pub link: &'a GraphLink,
    /// True when the link points away from the queried node
    pub outgoing: bool,
}

impl<'a> CircuitGraphView<'a> {
    pub fn new(data: &'a GraphData) -> Self {
        let mut graph = DiGraph::with_capacity(data.nodes().len(), data.links().len());
        for node in data.nodes() {
            graph.add_node(node);
        }
        // Node indices line up with positions in `data.nodes()`
        for link in data.links() {
            if let (Some(s), Some(t)) = (data.position_of(&link.source), data.position_of(&link.target)) {
                graph.add_edge(NodeIndex::new(s), NodeIndex::new(t), link);
            }
        }
        Self { graph, data }
    }

    /// All nodes linked to `id`, in link order
    pub fn neighbors(&self, id: &str) -> Vec<Neighbor<'a>> {
        let Some(pos) = self.data.position_of(id) else {
            return Vec::new();
        };
        let idx = NodeIndex::new(pos);

        let mut out: Vec<(usize, Neighbor<'a>)> = Vec::new();
        for (direction, outgoing) in [(Direction::Outgoing, true), (Direction::Incoming, false)] {
            for edge in self.graph.edges_directed(idx, direction) {
                let other = if outgoing { edge.target() } else { edge.source() };
                out.push((
                    edge.id().index(),
                    Neighbor {
                        node: self.graph[other],
                        link: *edge.weight(),
                        outgoing,
                    },
                ));
            }
        }
        out.sort_by_key(|(i, _)| *i);
        out.into_iter().map(|(_, n)| n).collect()
    }

    pub fn degree(&self, id: &str) -> usize {
        self.data
            .position_of(id)
            .map(|pos| {
                let idx = NodeIndex::new(pos);
                self.graph.edges_directed(idx, Direction::Outgoing).count()
                    + self.graph.edges_directed(idx, Direction::Incoming).count()
            })
            .unwrap_or(0)
    }

    pub fn stats(&self) -> GraphStats {
        GraphStats {
            component_count: self.data.components().count(),
            net_count: self.data.nets().count(),
            link_count: self.graph.edge_count(),
            island_count: connected_components(&self.graph),
            isolated_nodes: self
                .data
                .nodes()
                .iter()
                .filter(|n| self.degree(&n.id) == 0)
                .map(|n| n.id.clone())
                .collect(),
        }
    }
}

/// Summary counts of a canonical graph
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GraphStats {
    pub component_count: usize,
    pub net_count: usize,
    pub link_count: usize,
    /// Weakly connected islands
    pub island_count: usize,
    pub isolated_nodes: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::normalize::normalize_value;
    use serde_json::json;

    fn diff_pair() -> GraphData {
        normalize_value(json!({
            "components": {
                "M1": {"type": "nfet", "terminals": [
                    {"terminal": "D", "net": "outp"},
                    {"terminal": "G", "net": "vinp"},
                    {"terminal": "S", "net": "tail"}
                ]},
                "M2": {"type": "nfet", "terminals": [
                    {"terminal": "D", "net": "outn"},
                    {"terminal": "G", "net": "vinn"},
                    {"terminal": "S", "net": "tail"}
                ]}
            },
            "nets": {
                "outp": {"type": "signal"},
                "outn": {"type": "signal"},
                "vinp": {"type": "signal"},
                "vinn": {"type": "signal"},
                "tail": {"type": "internal"},
                "spare": {"type": "internal"}
            }
        }))
        .unwrap()
    }

    #[test]
    fn test_neighbors_of_component() {
        let g = diff_pair();
        let view = CircuitGraphView::new(&g);
        let n = view.neighbors("M1");
        let ids: Vec<&str> = n.iter().map(|n| n.node.id.as_str()).collect();
        assert_eq!(ids, vec!["outp", "vinp", "tail"]);
        assert!(n.iter().all(|n| n.outgoing));
    }

    #[test]
    fn test_neighbors_of_shared_net() {
        let g = diff_pair();
        let view = CircuitGraphView::new(&g);
        let n = view.neighbors("tail");
        assert_eq!(n.len(), 2);
        assert!(n.iter().all(|n| !n.outgoing && n.link.label.as_deref() == Some("S")));
    }

    #[test]
    fn test_stats() {
        let g = diff_pair();
        let stats = CircuitGraphView::new(&g).stats();
        assert_eq!(stats.component_count, 2);
        assert_eq!(stats.net_count, 6);
        assert_eq!(stats.link_count, 6);
        // M1/M2 joined through `tail`, plus the unconnected `spare`
        assert_eq!(stats.island_count, 2);
        assert_eq!(stats.isolated_nodes, vec!["spare".to_string()]);
    }

    #[test]
    fn test_unknown_node() {
        let g = diff_pair();
        let view = CircuitGraphView::new(&g);
        assert!(view.neighbors("nope").is_empty());
        assert_eq!(view.degree("nope"), 0);
    }
}
