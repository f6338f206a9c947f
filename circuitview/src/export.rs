//! Verbatim JSON export of the active payload.
//!
//! The export is the document the backend returned, not the canonical graph:
//! styling, layout and display policy never reach it.

use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::payload::CircuitPayload;

/// Fallback when the payload names no source file
pub const DEFAULT_EXPORT_NAME: &str = "circuit.json";

/// Netlist extensions swapped for `.json`
const CIRCUIT_EXTENSIONS: &[&str] = &["scs", "sp", "spi", "spice", "cir", "net", "json"];

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("Failed to serialize payload: {0}")]
    Serialize(#[from] serde_json::Error),
    #[error("Failed to write {path}: {source}")]
    Write {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

/// Pretty-printed raw payload
pub fn export_json(payload: &CircuitPayload) -> Result<String, ExportError> {
    Ok(serde_json::to_string_pretty(payload.raw())?)
}

/// Suggested export filename for a source netlist name
pub fn export_filename(source: Option<&str>) -> String {
    let Some(name) = source
        .and_then(|s| Path::new(s.trim()).file_name())
        .and_then(|n| n.to_str())
        .filter(|n| !n.is_empty())
    else {
        return DEFAULT_EXPORT_NAME.to_string();
    };

    let path = Path::new(name);
    match (path.file_stem().and_then(|s| s.to_str()), path.extension().and_then(|e| e.to_str())) {
        (Some(stem), Some(ext)) if CIRCUIT_EXTENSIONS.iter().any(|c| c.eq_ignore_ascii_case(ext)) => {
            format!("{}.json", stem)
        }
        _ => format!("{}.json", name),
    }
}

/// Write the export into `dir` under the suggested filename
pub fn write_export(payload: &CircuitPayload, dir: &Path) -> Result<PathBuf, ExportError> {
    let path = dir.join(export_filename(payload.source_filename()));
    let json = export_json(payload)?;
    std::fs::write(&path, json).map_err(|source| ExportError::Write {
        path: path.display().to_string(),
        source,
    })?;
    tracing::info!("Exported payload to {}", path.display());
    Ok(path)
}
