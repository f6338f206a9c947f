//! Flat circuit records (shape A)
//!
//! Components and nets keyed by id, with terminals binding component pins to
//! net ids. This is the shape produced by the netlist-to-graph backend when it
//! reports per-component sizing.

use indexmap::IndexMap;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use crate::units::parse_numeric;

/// Performance figures reported alongside a circuit
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PerfSpecs {
    #[serde(default, deserialize_with = "lenient_number", skip_serializing_if = "Option::is_none")]
    pub gain: Option<f64>,

    /// Unity-gain bandwidth
    #[serde(
        default,
        alias = "unity_gain_bandwidth",
        deserialize_with = "lenient_number",
        skip_serializing_if = "Option::is_none"
    )]
    pub ugbw: Option<f64>,

    /// Phase margin
    #[serde(
        default,
        alias = "phase_margin",
        deserialize_with = "lenient_number",
        skip_serializing_if = "Option::is_none"
    )]
    pub pm: Option<f64>,

    #[serde(default, deserialize_with = "lenient_number", skip_serializing_if = "Option::is_none")]
    pub power: Option<f64>,

    /// Any further figures the backend attaches
    #[serde(flatten)]
    pub extra: IndexMap<String, Value>,
}

impl PerfSpecs {
    /// Known figures in display order, skipping the ones not reported
    pub fn entries(&self) -> Vec<(&str, f64)> {
        [
            ("gain", self.gain),
            ("ugbw", self.ugbw),
            ("pm", self.pm),
            ("power", self.power),
        ]
        .into_iter()
        .filter_map(|(k, v)| v.filter(|v| v.is_finite()).map(|v| (k, v)))
        .collect()
    }

    pub fn is_empty(&self) -> bool {
        self.entries().is_empty() && self.extra.is_empty()
    }
}

/// Ambient scalars describing the circuit as a whole
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CircuitMetadata {
    /// Simulation temperature in °C
    #[serde(
        default,
        alias = "temperature",
        deserialize_with = "lenient_number",
        skip_serializing_if = "Option::is_none"
    )]
    pub tempc: Option<f64>,

    #[serde(
        default,
        alias = "fet_count",
        deserialize_with = "lenient_number",
        skip_serializing_if = "Option::is_none"
    )]
    pub fet_num: Option<f64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub filename: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub perf_specs: Option<PerfSpecs>,

    #[serde(flatten)]
    pub extra: IndexMap<String, Value>,
}

impl CircuitMetadata {
    /// Decode a metadata block, falling back to empty metadata when its
    /// structure is unusable (e.g. `perf_specs` is not an object)
    pub fn from_value_lenient(value: Value) -> Self {
        if value.is_null() {
            return Self::default();
        }
        serde_json::from_value(value).unwrap_or_else(|e| {
            tracing::warn!("Ignoring unreadable circuit metadata: {}", e);
            Self::default()
        })
    }
}

/// Numbers, numeric strings (`"5"`, `"45n"`) or nothing; other values read as absent
fn lenient_number<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => parse_numeric(&s),
        _ => None,
    })
}

fn lenient_metadata<'de, D>(deserializer: D) -> Result<CircuitMetadata, D::Error>
where
    D: Deserializer<'de>,
{
    Value::deserialize(deserializer).map(CircuitMetadata::from_value_lenient)
}

/// A component pin bound to the net it connects to
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Terminal {
    /// Pin name, e.g. `D`, `G`, `P`
    #[serde(alias = "name")]
    pub terminal: String,

    /// Id of the net this pin lands on
    pub net: String,
}

/// A component entry of a flat circuit
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComponentRecord {
    /// Device tag, e.g. `nfet`, `resistor`
    #[serde(rename = "type")]
    pub kind: String,

    #[serde(default)]
    pub parameters: IndexMap<String, Value>,

    #[serde(default)]
    pub terminals: Vec<Terminal>,

    /// Unclassified keys (pairing tags and the like)
    #[serde(flatten)]
    pub extra: IndexMap<String, Value>,
}

/// A net entry of a flat circuit
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NetRecord {
    /// Net role tag, e.g. `supply`, `signal`
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,

    /// Informational only; links always come from component terminals
    #[serde(default)]
    pub connected_components: Vec<String>,

    #[serde(flatten)]
    pub extra: IndexMap<String, Value>,
}

/// Shape A payload
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FlatCircuit {
    /// Feeds the specs panel only, so a malformed block never rejects the circuit
    #[serde(default, deserialize_with = "lenient_metadata")]
    pub metadata: CircuitMetadata,
    pub components: IndexMap<String, ComponentRecord>,
    pub nets: IndexMap<String, NetRecord>,
}
