//! Node Styling
//!
//! Maps each canonical node to a color, shape and radius. Styling is a pure
//! function of the node: the same node renders identically across re-renders
//! and sessions, so there are no counters or caches here.
//!
//! Resolution order:
//! 1. Nets get the fixed net color, a square and the small radius.
//! 2. Components with a `pair_id` get a hue rotated by the golden angle per id,
//!    which keeps any number of matched pairs distinct without a lookup table.
//! 3. Other components take their color from the device table, falling back
//!    to [`DEFAULT_COMPONENT_COLOR`].

use serde::{Serialize, Serializer};
use serde_json::Value;

use crate::graph::{GraphData, GraphNode, NodeGroup};

/// 360° × (1 − 1/φ)
pub const GOLDEN_ANGLE: f64 = 137.507_764_050_037_85;

pub const PAIR_SATURATION: f64 = 70.0;
pub const PAIR_LIGHTNESS: f64 = 55.0;

pub const NET_COLOR: &str = "#8fd694";
pub const DEFAULT_COMPONENT_COLOR: &str = "#9aa5b1";

pub const COMPONENT_RADIUS: f64 = 8.0;
pub const NET_RADIUS: f64 = 4.0;

/// Device tag → fill color
const COMPONENT_COLORS: &[(&str, &str)] = &[
    ("nfet", "#4f8ef7"),
    ("pfet", "#f7744f"),
    ("resistor", "#f7c94f"),
    ("capacitor", "#4fd6b0"),
    ("vsource", "#b36ff7"),
    ("isource", "#f74fb3"),
    ("vcvs", "#6f7ff7"),
];

/// A fill color as the renderer consumes it
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Color {
    Hex(&'static str),
    Hsl { hue: f64, saturation: f64, lightness: f64 },
}

impl std::fmt::Display for Color {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Color::Hex(hex) => f.write_str(hex),
            Color::Hsl { hue, saturation, lightness } => {
                write!(f, "hsl({:.1}, {}%, {}%)", hue, saturation, lightness)
            }
        }
    }
}

impl Serialize for Color {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum NodeShape {
    Circle,
    Square,
}

/// Visual identity of one node
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct NodeStyle {
    pub color: Color,
    pub shape: NodeShape,
    pub radius: f64,
}

/// Resolve the style of a single node
pub fn resolve_style(node: &GraphNode) -> NodeStyle {
    if node.group == NodeGroup::Net {
        return NodeStyle {
            color: Color::Hex(NET_COLOR),
            shape: NodeShape::Square,
            radius: NET_RADIUS,
        };
    }

    let color = match node.properties.pair_id().and_then(pair_index) {
        Some(pair) => pair_color(pair),
        None => type_color(node.node_type.as_deref()),
    };

    NodeStyle {
        color,
        shape: NodeShape::Circle,
        radius: COMPONENT_RADIUS,
    }
}

/// Resolve every node of a graph, in node order
pub fn resolve_styles(graph: &GraphData) -> Vec<(String, NodeStyle)> {
    graph
        .nodes()
        .iter()
        .map(|n| (n.id.clone(), resolve_style(n)))
        .collect()
}

/// Hue for a pair group
pub fn pair_color(pair: f64) -> Color {
    Color::Hsl {
        hue: (pair * GOLDEN_ANGLE).rem_euclid(360.0),
        saturation: PAIR_SATURATION,
        lightness: PAIR_LIGHTNESS,
    }
}

fn type_color(node_type: Option<&str>) -> Color {
    node_type
        .and_then(|t| {
            COMPONENT_COLORS
                .iter()
                .find(|(tag, _)| tag.eq_ignore_ascii_case(t))
        })
        .map(|(_, hex)| Color::Hex(*hex))
        .unwrap_or(Color::Hex(DEFAULT_COMPONENT_COLOR))
}

/// Numeric pair index from a `pair_id` value.
///
/// Numbers and numeric strings are used as-is; other strings are hashed with
/// FNV-1a so they still map to a stable index.
fn pair_index(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64().filter(|v| v.is_finite()),
        Value::String(s) => {
            let s = s.trim();
            if s.is_empty() {
                return None;
            }
            match s.parse::<f64>() {
                Ok(v) if v.is_finite() => Some(v),
                _ => Some(fnv1a(s) as f64),
            }
        }
        _ => None,
    }
}

fn fnv1a(s: &str) -> u32 {
    s.bytes().fold(0x811c_9dc5u32, |hash, b| (hash ^ b as u32).wrapping_mul(0x0100_0193))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::normalize::normalize_value;
    use serde_json::json;

    fn graph() -> GraphData {
        normalize_value(json!({
            "components": {
                "M1": {"type": "nfet", "pair_id": 1, "terminals": [{"terminal": "D", "net": "out"}]},
                "M2": {"type": "nfet", "pair_id": 1},
                "M3": {"type": "pfet"},
                "M4": {"type": "pfet", "parameters": {"pair_id": 2}},
                "R0": {"type": "Resistor"},
                "X0": {"type": "opamp"},
                "P0": {"type": "nfet", "pair_id": "diff_a"}
            },
            "nets": {"out": {"type": "signal"}}
        }))
        .unwrap()
    }

    #[test]
    fn test_net_style() {
        let g = graph();
        let style = resolve_style(g.node("out").unwrap());
        assert_eq!(style.color, Color::Hex(NET_COLOR));
        assert_eq!(style.shape, NodeShape::Square);
        assert_eq!(style.radius, NET_RADIUS);
    }

    #[test]
    fn test_components_are_larger_circles() {
        let g = graph();
        let style = resolve_style(g.node("M3").unwrap());
        assert_eq!(style.shape, NodeShape::Circle);
        assert!(style.radius > NET_RADIUS);
    }

    #[test]
    fn test_type_table_and_fallback() {
        let g = graph();
        assert_eq!(resolve_style(g.node("M3").unwrap()).color, Color::Hex("#f7744f"));
        assert_eq!(resolve_style(g.node("R0").unwrap()).color, Color::Hex("#f7c94f"));
        assert_eq!(
            resolve_style(g.node("X0").unwrap()).color,
            Color::Hex(DEFAULT_COMPONENT_COLOR)
        );
    }

    #[test]
    fn test_pair_members_share_color() {
        let g = graph();
        let m1 = resolve_style(g.node("M1").unwrap());
        let m2 = resolve_style(g.node("M2").unwrap());
        assert_eq!(m1.color, m2.color);
        assert_ne!(m1.color, resolve_style(g.node("M4").unwrap()).color);
    }

    #[test]
    fn test_pair_hue_formula() {
        match pair_color(3.0) {
            Color::Hsl { hue, .. } => assert!((hue - (3.0 * GOLDEN_ANGLE) % 360.0).abs() < 1e-9),
            other => panic!("expected hsl, got {other}"),
        }
        assert_eq!(pair_color(1.0).to_string(), "hsl(137.5, 70%, 55%)");
    }

    #[test]
    fn test_string_pair_id_is_stable() {
        let g = graph();
        let a = resolve_style(g.node("P0").unwrap());
        let b = resolve_style(g.node("P0").unwrap());
        assert_eq!(a, b);
        assert!(matches!(a.color, Color::Hsl { .. }));
    }

    #[test]
    fn test_styles_in_node_order() {
        let g = graph();
        let ids: Vec<String> = resolve_styles(&g).into_iter().map(|(id, _)| id).collect();
        let expected: Vec<String> = g.nodes().iter().map(|n| n.id.clone()).collect();
        assert_eq!(ids, expected);
    }

    #[test]
    fn test_color_serializes_as_css() {
        let v = serde_json::to_value(resolve_style(graph().node("out").unwrap())).unwrap();
        assert_eq!(v["color"], NET_COLOR);
        assert_eq!(v["shape"], "square");
    }
}
