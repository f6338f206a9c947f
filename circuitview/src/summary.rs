//! Specs panel built from circuit-level metadata.

use serde::Serialize;

use crate::payload::CircuitPayload;
use crate::units::format_param;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SpecRow {
    pub key: String,
    pub display: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct CircuitSummary {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub filename: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub temperature_c: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fet_count: Option<u64>,
    pub perf_specs: Vec<SpecRow>,
}

impl CircuitSummary {
    /// Missing or unrecognized metadata yields an empty summary
    pub fn from_payload(payload: &CircuitPayload) -> Self {
        let filename = payload.source_filename().map(str::to_string);
        let Some(metadata) = payload.metadata() else {
            return Self {
                filename,
                ..Self::default()
            };
        };

        let mut perf_specs = Vec::new();
        if let Some(specs) = &metadata.perf_specs {
            for (key, value) in specs.entries() {
                perf_specs.push(SpecRow {
                    key: key.to_string(),
                    display: format_param(key, value),
                });
            }
            for (key, value) in &specs.extra {
                perf_specs.push(SpecRow {
                    key: key.clone(),
                    display: format_param(key, value),
                });
            }
        }

        Self {
            filename: filename.or(metadata.filename),
            temperature_c: metadata.tempc.filter(|t| t.is_finite()),
            fet_count: metadata
                .fet_num
                .filter(|n| n.is_finite() && *n >= 0.0)
                .map(|n| n.round() as u64),
            perf_specs,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.filename.is_none()
            && self.temperature_c.is_none()
            && self.fet_count.is_none()
            && self.perf_specs.is_empty()
    }
}
