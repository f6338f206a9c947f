//! Schema Normalizer
//!
//! Converts a decoded payload into the canonical [`GraphData`]. Conversion is
//! pure and all-or-nothing: either every node and link is emitted, or an
//! error names the first offending entity and no graph is returned.

use thiserror::Error;

use super::{GraphData, GraphLink, GraphNode, NodeGroup, NodeRecord};
use crate::payload::{CircuitData, CircuitPayload, FlatCircuit, NodeKind, SchemaShape, TypedCircuit};

/// Errors that abort a normalization attempt
#[derive(Debug, Error)]
pub enum NormalizeError {
    #[error("Unrecognized payload schema: expected `graph.nodes` or `components` + `nets`")]
    UnrecognizedSchema,

    #[error("Malformed {shape} payload: {reason}")]
    Malformed { shape: SchemaShape, reason: String },

    #[error("Link {from} -> {to}{} references unknown node `{missing}`", pin_suffix(.pin))]
    DanglingReference {
        from: String,
        to: String,
        pin: Option<String>,
        missing: String,
    },

    #[error("Duplicate node id `{0}`")]
    DuplicateNode(String),

    #[error("Invalid JSON: {0}")]
    Json(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

fn pin_suffix(pin: &Option<String>) -> String {
    pin.as_ref().map(|p| format!(" (pin {})", p)).unwrap_or_default()
}

/// Normalize a payload into the canonical graph
pub fn normalize(payload: &CircuitPayload) -> Result<GraphData, NormalizeError> {
    let graph = match payload.data() {
        CircuitData::Flat(flat) => normalize_flat(flat)?,
        CircuitData::Typed(typed) => normalize_typed(typed)?,
    };

    tracing::debug!(
        "Normalized {} payload: {} nodes, {} links",
        payload.shape(),
        graph.nodes().len(),
        graph.links().len()
    );

    Ok(graph)
}

/// Detect, decode and normalize a raw JSON document
pub fn normalize_value(raw: serde_json::Value) -> Result<GraphData, NormalizeError> {
    normalize(&CircuitPayload::from_value(raw)?)
}

fn normalize_flat(flat: &FlatCircuit) -> Result<GraphData, NormalizeError> {
    let mut graph = GraphData::new();

    for (id, component) in &flat.components {
        let node = GraphNode::new(id, NodeGroup::Component, NodeRecord::Component(component.clone()))
            .with_type(Some(component.kind.clone()));
        insert_node(&mut graph, node)?;
    }

    for (id, net) in &flat.nets {
        let node = GraphNode::new(id, NodeGroup::Net, NodeRecord::Net(net.clone()))
            .with_type(net.kind.clone());
        insert_node(&mut graph, node)?;
    }

    // Pass 2: links come from terminals only; `connected_components` is display metadata
    for (id, component) in &flat.components {
        for terminal in &component.terminals {
            let link = GraphLink::new(id, &terminal.net).with_label(Some(terminal.terminal.clone()));
            insert_link(&mut graph, link)?;
        }
    }

    Ok(graph)
}

fn normalize_typed(typed: &TypedCircuit) -> Result<GraphData, NormalizeError> {
    let mut graph = GraphData::new();

    for (id, record) in &typed.graph.nodes {
        let group = match record.node_kind() {
            NodeKind::Component => NodeGroup::Component,
            NodeKind::Net => NodeGroup::Net,
        };
        let node_type = record.subtype.clone().unwrap_or_else(|| record.kind.clone());
        let node = GraphNode::new(id, group, NodeRecord::Typed(record.clone())).with_type(Some(node_type));
        insert_node(&mut graph, node)?;
    }

    // Declared direction is kept even for undirected graphs; arrowheads are the renderer's call
    for edge in &typed.graph.edges {
        let link = GraphLink::new(&edge.source, &edge.target).with_label(edge.pin.clone());
        insert_link(&mut graph, link)?;
    }

    Ok(graph)
}

fn insert_node(graph: &mut GraphData, node: GraphNode) -> Result<(), NormalizeError> {
    let id = node.id.clone();
    if graph.push_node(node) {
        Ok(())
    } else {
        Err(NormalizeError::DuplicateNode(id))
    }
}

fn insert_link(graph: &mut GraphData, link: GraphLink) -> Result<(), NormalizeError> {
    let missing = [&link.source, &link.target]
        .into_iter()
        .find(|id| !graph.contains(id))
        .cloned();

    if let Some(missing) = missing {
        return Err(NormalizeError::DanglingReference {
            from: link.source,
            to: link.target,
            pin: link.label,
            missing,
        });
    }

    graph.push_link(link);
    Ok(())
}
