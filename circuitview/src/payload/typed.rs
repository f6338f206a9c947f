//! Typed node/edge records (shape B)

use indexmap::IndexMap;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// Declared kind of a typed node
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NodeKind {
    Component,
    Net,
}

/// A node of a typed graph
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TypedNodeRecord {
    /// `COMPONENT` or `NET`
    #[serde(rename = "type")]
    pub kind: String,

    /// Component family, e.g. `nfet`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subtype: Option<String>,

    /// Electrical parameters and anything else the backend attached
    #[serde(flatten)]
    pub params: IndexMap<String, Value>,
}

impl TypedNodeRecord {
    /// Only an exact `COMPONENT` tag makes a component; every other tag is a net.
    pub fn node_kind(&self) -> NodeKind {
        if self.kind == "COMPONENT" {
            NodeKind::Component
        } else {
            NodeKind::Net
        }
    }
}

/// A directed edge of a typed graph
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EdgeRecord {
    pub source: String,
    pub target: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pin: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GraphStructure {
    #[serde(default)]
    pub directed: bool,
    pub nodes: IndexMap<String, TypedNodeRecord>,
    /// A missing or `null` edge list is an empty one
    #[serde(default, deserialize_with = "null_as_empty")]
    pub edges: Vec<EdgeRecord>,
}

fn null_as_empty<'de, D>(deserializer: D) -> Result<Vec<EdgeRecord>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<Vec<EdgeRecord>>::deserialize(deserializer)?.unwrap_or_default())
}

/// Shape B payload
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TypedCircuit {
    #[serde(default)]
    pub topology_id: Value,

    /// Netlist source text or its filename
    #[serde(default)]
    pub netlist: String,

    pub graph: GraphStructure,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata: Option<Value>,
}
