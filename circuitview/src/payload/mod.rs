//! Circuit Payloads
//!
//! A payload is one backend response. It keeps the raw JSON document for
//! verbatim export next to the typed view used by the normalizer.

pub mod detect;
pub mod flat;
pub mod typed;

pub use detect::{detect_shape, SchemaShape};
pub use flat::{CircuitMetadata, ComponentRecord, FlatCircuit, NetRecord, PerfSpecs, Terminal};
pub use typed::{EdgeRecord, GraphStructure, NodeKind, TypedCircuit, TypedNodeRecord};

use serde_json::Value;
use std::path::Path;

use crate::graph::NormalizeError;

/// Typed view of a payload
#[derive(Debug, Clone, PartialEq)]
pub enum CircuitData {
    Flat(FlatCircuit),
    Typed(TypedCircuit),
}

impl CircuitData {
    pub fn shape(&self) -> SchemaShape {
        match self {
            CircuitData::Flat(_) => SchemaShape::Flat,
            CircuitData::Typed(_) => SchemaShape::Typed,
        }
    }
}

/// One immutable backend response
#[derive(Debug, Clone, PartialEq)]
pub struct CircuitPayload {
    raw: Value,
    data: CircuitData,
}

impl CircuitPayload {
    /// Detect the shape of `raw` and decode it
    pub fn from_value(raw: Value) -> Result<Self, NormalizeError> {
        let shape = detect_shape(&raw).ok_or(NormalizeError::UnrecognizedSchema)?;
        tracing::debug!("Detected {} payload", shape);

        let data = match shape {
            SchemaShape::Flat => CircuitData::Flat(
                serde_json::from_value(raw.clone())
                    .map_err(|e| NormalizeError::Malformed { shape, reason: e.to_string() })?,
            ),
            SchemaShape::Typed => CircuitData::Typed(
                serde_json::from_value(raw.clone())
                    .map_err(|e| NormalizeError::Malformed { shape, reason: e.to_string() })?,
            ),
        };

        Ok(Self { raw, data })
    }

    pub fn from_json_str(content: &str) -> Result<Self, NormalizeError> {
        let raw: Value = serde_json::from_str(content).map_err(|e| NormalizeError::Json(e.to_string()))?;
        Self::from_value(raw)
    }

    pub fn from_path(path: &Path) -> Result<Self, NormalizeError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_json_str(&content)
    }

    /// The document exactly as the backend sent it
    pub fn raw(&self) -> &Value {
        &self.raw
    }

    pub fn data(&self) -> &CircuitData {
        &self.data
    }

    pub fn shape(&self) -> SchemaShape {
        self.data.shape()
    }

    /// Filename the netlist was uploaded under, when the payload declares one
    pub fn source_filename(&self) -> Option<&str> {
        match &self.data {
            CircuitData::Flat(flat) => flat.metadata.filename.as_deref(),
            CircuitData::Typed(typed) => {
                let netlist = typed.netlist.trim();
                // Inline netlist text rather than a filename
                if netlist.is_empty() || netlist.contains('\n') {
                    typed
                        .metadata
                        .as_ref()
                        .and_then(|m| m.get("filename"))
                        .and_then(Value::as_str)
                } else {
                    Some(netlist)
                }
            }
        }
    }

    /// Circuit-level metadata, when present in a recognizable form
    pub fn metadata(&self) -> Option<CircuitMetadata> {
        match &self.data {
            CircuitData::Flat(flat) => Some(flat.metadata.clone()),
            CircuitData::Typed(typed) => typed
                .metadata
                .as_ref()
                .filter(|m| m.is_object())
                .and_then(|m| serde_json::from_value(m.clone()).ok()),
        }
    }
}
