//! Node Inspector
//!
//! Builds the detail view shown when a node is selected: formatted parameter
//! rows read from the original record, plus the node's connections.
//!
//! Display policy lives here, not in the data: hiding a row never removes it
//! from the record or from an export.

use serde::Serialize;

use crate::graph::{CircuitGraphView, GraphData, NodeGroup, NodeRecord};
use crate::units::format_param;

/// Label prefix marking input-reference resistors
const INPUT_REFERENCE_PREFIX: &str = "rin";

/// Keys hidden for input-reference resistors
const INPUT_REFERENCE_KEYS: &[&str] = &["r", "nr"];

/// Which rows the detail view shows
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DetailPolicy {
    pub hide_input_reference_resistance: bool,
}

impl Default for DetailPolicy {
    fn default() -> Self {
        Self {
            hide_input_reference_resistance: true,
        }
    }
}

impl DetailPolicy {
    /// Show every row
    pub fn show_all() -> Self {
        Self {
            hide_input_reference_resistance: false,
        }
    }

    pub fn is_hidden(&self, label: &str, key: &str) -> bool {
        if !self.hide_input_reference_resistance {
            return false;
        }
        let is_input_reference = label
            .get(..INPUT_REFERENCE_PREFIX.len())
            .map(|p| p.eq_ignore_ascii_case(INPUT_REFERENCE_PREFIX))
            .unwrap_or(false);
        is_input_reference && INPUT_REFERENCE_KEYS.iter().any(|k| k.eq_ignore_ascii_case(key))
    }
}

/// Role of a well-known device pin
pub fn pin_description(pin: &str) -> Option<&'static str> {
    match pin {
        "D" => Some("drain"),
        "G" => Some("gate"),
        "S" => Some("source"),
        "B" => Some("bulk"),
        "P" | "pos" => Some("positive"),
        "N" | "neg" => Some("negative"),
        "ctrl_pos" => Some("control positive"),
        "ctrl_neg" => Some("control negative"),
        _ => None,
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ParamRow {
    pub key: String,
    pub display: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Connection {
    pub peer: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pin: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pin_role: Option<&'static str>,
}

/// Everything the inspector panel renders for one node
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NodeDetail {
    pub id: String,
    pub label: String,
    pub group: NodeGroup,
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub node_type: Option<String>,
    pub parameters: Vec<ParamRow>,
    pub connections: Vec<Connection>,
    /// Informational member list carried by flat net records
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub listed_components: Vec<String>,
}

/// Build the detail view for node `id`
pub fn inspect(graph: &GraphData, id: &str, policy: &DetailPolicy) -> Option<NodeDetail> {
    let node = graph.node(id)?;

    let parameters = node
        .properties
        .parameters()
        .into_iter()
        .filter(|(key, _)| !policy.is_hidden(&node.label, key))
        .map(|(key, value)| ParamRow {
            key: key.to_string(),
            display: format_param(key, value),
        })
        .collect();

    let connections = CircuitGraphView::new(graph)
        .neighbors(id)
        .into_iter()
        .map(|n| Connection {
            peer: n.node.id.clone(),
            pin: n.link.label.clone(),
            pin_role: n.link.label.as_deref().and_then(pin_description),
        })
        .collect();

    let listed_components = match &node.properties {
        NodeRecord::Net(net) => net.connected_components.clone(),
        _ => Vec::new(),
    };

    Some(NodeDetail {
        id: node.id.clone(),
        label: node.label.clone(),
        group: node.group,
        node_type: node.node_type.clone(),
        parameters,
        connections,
        listed_components,
    })
}
