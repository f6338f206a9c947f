//! Canonical Circuit Graph
//!
//! Every payload shape is normalized into the same node/link graph. Nodes
//! carry the original source record so detail views always read the value
//! the backend sent, never one touched by styling or layout.

pub mod normalize;
pub mod view;

pub use normalize::{normalize, NormalizeError};
pub use view::{CircuitGraphView, GraphStats, Neighbor};

use serde::Serialize;
use serde_json::Value;
use std::collections::HashMap;

use crate::payload::{ComponentRecord, NetRecord, TypedNodeRecord};

/// Semantic role of a canonical node
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum NodeGroup {
    Component,
    Net,
}

impl std::fmt::Display for NodeGroup {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            NodeGroup::Component => write!(f, "component"),
            NodeGroup::Net => write!(f, "net"),
        }
    }
}

/// The source record a node was built from
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "record", rename_all = "snake_case")]
pub enum NodeRecord {
    Component(ComponentRecord),
    Net(NetRecord),
    Typed(TypedNodeRecord),
}

impl NodeRecord {
    /// Electrical parameters in source order
    pub fn parameters(&self) -> Vec<(&str, &Value)> {
        match self {
            NodeRecord::Component(c) => c.parameters.iter().map(|(k, v)| (k.as_str(), v)).collect(),
            NodeRecord::Net(_) => Vec::new(),
            NodeRecord::Typed(t) => t.params.iter().map(|(k, v)| (k.as_str(), v)).collect(),
        }
    }

    /// Look up a key among the record's unclassified fields, then its parameters
    pub fn lookup(&self, key: &str) -> Option<&Value> {
        match self {
            NodeRecord::Component(c) => c.extra.get(key).or_else(|| c.parameters.get(key)),
            NodeRecord::Net(n) => n.extra.get(key),
            NodeRecord::Typed(t) => t.params.get(key),
        }
    }

    /// Matched-pair grouping tag, if the record carries one
    pub fn pair_id(&self) -> Option<&Value> {
        self.lookup("pair_id").filter(|v| !v.is_null())
    }
}

/// A node of the canonical graph
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GraphNode {
    pub id: String,
    pub group: NodeGroup,
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub node_type: Option<String>,
    pub label: String,
    pub properties: NodeRecord,

    // Layout coordinates belong to the renderer; normalization leaves them unset.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub x: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub y: Option<f64>,
}

impl GraphNode {
    pub fn new(id: impl Into<String>, group: NodeGroup, properties: NodeRecord) -> Self {
        let id = id.into();
        Self {
            label: id.clone(),
            id,
            group,
            node_type: None,
            properties,
            x: None,
            y: None,
        }
    }

    pub fn with_type(mut self, node_type: Option<String>) -> Self {
        self.node_type = node_type;
        self
    }

    pub fn is_component(&self) -> bool {
        self.group == NodeGroup::Component
    }

    pub fn is_net(&self) -> bool {
        self.group == NodeGroup::Net
    }
}

/// A link between two canonical nodes
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct GraphLink {
    pub source: String,
    pub target: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
}

impl GraphLink {
    pub fn new(source: impl Into<String>, target: impl Into<String>) -> Self {
        Self {
            source: source.into(),
            target: target.into(),
            label: None,
        }
    }

    pub fn with_label(mut self, label: Option<String>) -> Self {
        self.label = label;
        self
    }
}

/// Canonical graph: nodes, links, and an id index back to each node
#[derive(Debug, Clone, Default, Serialize)]
pub struct GraphData {
    nodes: Vec<GraphNode>,
    links: Vec<GraphLink>,

    #[serde(skip)]
    index: HashMap<String, usize>,
}

impl PartialEq for GraphData {
    fn eq(&self, other: &Self) -> bool {
        self.nodes == other.nodes && self.links == other.links
    }
}

impl GraphData {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a node; returns false (and leaves the graph unchanged) if the id is taken
    pub(crate) fn push_node(&mut self, node: GraphNode) -> bool {
        if self.index.contains_key(&node.id) {
            return false;
        }
        self.index.insert(node.id.clone(), self.nodes.len());
        self.nodes.push(node);
        true
    }

    pub(crate) fn push_link(&mut self, link: GraphLink) {
        self.links.push(link);
    }

    pub fn nodes(&self) -> &[GraphNode] {
        &self.nodes
    }

    pub fn links(&self) -> &[GraphLink] {
        &self.links
    }

    pub fn node(&self, id: &str) -> Option<&GraphNode> {
        self.index.get(id).map(|&i| &self.nodes[i])
    }

    pub fn contains(&self, id: &str) -> bool {
        self.index.contains_key(id)
    }

    /// Position of a node in [`GraphData::nodes`]
    pub fn position_of(&self, id: &str) -> Option<usize> {
        self.index.get(id).copied()
    }

    /// Original source record of a node
    pub fn record(&self, id: &str) -> Option<&NodeRecord> {
        self.node(id).map(|n| &n.properties)
    }

    /// Store layout coordinates computed by the renderer
    pub fn set_position(&mut self, id: &str, x: f64, y: f64) -> bool {
        match self.index.get(id) {
            Some(&i) => {
                self.nodes[i].x = Some(x);
                self.nodes[i].y = Some(y);
                true
            }
            None => false,
        }
    }

    pub fn components(&self) -> impl Iterator<Item = &GraphNode> {
        self.nodes.iter().filter(|n| n.is_component())
    }

    pub fn nets(&self) -> impl Iterator<Item = &GraphNode> {
        self.nodes.iter().filter(|n| n.is_net())
    }

    /// Links touching a node, in either direction
    pub fn links_of<'a>(&'a self, id: &'a str) -> impl Iterator<Item = &'a GraphLink> + 'a {
        self.links
            .iter()
            .filter(move |l| l.source == id || l.target == id)
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }
}
