//! Payload Shape Detection
//!
//! Decides which of the supported payload shapes a JSON document uses by
//! checking for the presence of each shape's required keys. The typed
//! node/edge shape is checked first; the first match wins.

use serde_json::Value;

/// Supported payload shapes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SchemaShape {
    /// `components` + `nets` maps (shape A)
    Flat,
    /// `graph.nodes` map with an optional `graph.edges` list (shape B)
    Typed,
}

impl SchemaShape {
    pub fn as_str(&self) -> &'static str {
        match self {
            SchemaShape::Flat => "flat",
            SchemaShape::Typed => "typed",
        }
    }
}

impl std::fmt::Display for SchemaShape {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Detect the payload shape, or `None` when neither shape's keys are present
pub fn detect_shape(payload: &Value) -> Option<SchemaShape> {
    let obj = payload.as_object()?;

    if let Some(graph) = obj.get("graph").and_then(Value::as_object) {
        let has_nodes = graph.get("nodes").map(Value::is_object).unwrap_or(false);
        let edges_ok = graph
            .get("edges")
            .map(|e| e.is_array() || e.is_null())
            .unwrap_or(true);
        if has_nodes && edges_ok {
            return Some(SchemaShape::Typed);
        }
    }

    let is_map = |key: &str| obj.get(key).map(Value::is_object).unwrap_or(false);
    if is_map("components") && is_map("nets") {
        return Some(SchemaShape::Flat);
    }

    None
}
