//! Core loading API shared by the CLI and embedding viewers.
//! No renderer or UI state dependencies.

use std::path::{Path, PathBuf};

use serde_json::Value;

use crate::config::{Config, ConfigError};
use crate::export::{write_export, ExportError};
use crate::graph::{normalize, CircuitGraphView, GraphData, GraphStats, NormalizeError};
use crate::inspect::{inspect, DetailPolicy, NodeDetail};
use crate::payload::CircuitPayload;
use crate::session::SessionError;
use crate::style::{resolve_styles, NodeStyle};
use crate::summary::CircuitSummary;
use crate::upload::{HttpBackend, NetlistBackend, UploadError, UploadRequest};

#[derive(Debug, thiserror::Error)]
pub enum CircuitViewError {
    #[error(transparent)]
    Normalize(#[from] NormalizeError),
    #[error(transparent)]
    Upload(#[from] UploadError),
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Export(#[from] ExportError),
    #[error(transparent)]
    Session(#[from] SessionError),
}

/// A payload together with everything the viewer derives from it
#[derive(Debug, Clone)]
pub struct CircuitView {
    pub payload: CircuitPayload,
    pub graph: GraphData,
    pub styles: Vec<(String, NodeStyle)>,
    pub stats: GraphStats,
    pub summary: CircuitSummary,
}

impl CircuitView {
    pub fn from_payload(payload: CircuitPayload) -> Result<Self, NormalizeError> {
        let graph = normalize(&payload)?;
        let styles = resolve_styles(&graph);
        let stats = CircuitGraphView::new(&graph).stats();
        let summary = CircuitSummary::from_payload(&payload);
        Ok(Self {
            payload,
            graph,
            styles,
            stats,
            summary,
        })
    }

    pub fn from_value(raw: Value) -> Result<Self, NormalizeError> {
        Self::from_payload(CircuitPayload::from_value(raw)?)
    }

    /// Load a saved payload JSON file
    pub fn open(path: &Path) -> Result<Self, NormalizeError> {
        let payload = CircuitPayload::from_path(path)?;
        tracing::debug!("Opened {} ({} payload)", path.display(), payload.shape());
        Self::from_payload(payload)
    }

    pub fn style_of(&self, id: &str) -> Option<&NodeStyle> {
        self.styles.iter().find(|(n, _)| n == id).map(|(_, s)| s)
    }

    pub fn detail(&self, id: &str, policy: &DetailPolicy) -> Option<NodeDetail> {
        inspect(&self.graph, id, policy)
    }

    pub fn export_to(&self, dir: &Path) -> Result<PathBuf, ExportError> {
        write_export(&self.payload, dir)
    }
}

/// Upload a netlist to the configured backend and build the view of its response
pub async fn upload_netlist(
    config: &Config,
    path: &Path,
    perf_specs: Option<Value>,
) -> Result<CircuitView, CircuitViewError> {
    let request = UploadRequest::from_path(path).await?.with_perf_specs(perf_specs);
    let backend = HttpBackend::new(config)?;
    let payload = backend.upload(request).await?;
    Ok(CircuitView::from_payload(payload)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::style::NET_COLOR;
    use serde_json::json;

    #[test]
    fn test_from_value() {
        let view = CircuitView::from_value(json!({
            "components": {"M0": {"type": "nfet", "terminals": [{"terminal": "D", "net": "out"}]}},
            "nets": {"out": {"type": "signal"}}
        }))
        .unwrap();

        assert_eq!(view.stats.component_count, 1);
        assert_eq!(view.styles.len(), view.graph.nodes().len());
        assert_eq!(view.style_of("out").unwrap().color.to_string(), NET_COLOR);
        assert!(view.style_of("missing").is_none());
    }

    #[test]
    fn test_errors_convert() {
        let err = CircuitView::from_value(json!({"nodes": []})).unwrap_err();
        assert!(matches!(err, NormalizeError::UnrecognizedSchema));

        let err: CircuitViewError = SessionError::NoActiveCircuit.into();
        assert_eq!(err.to_string(), "No circuit loaded");
    }

    #[tokio::test]
    async fn test_upload_rejects_non_netlist() {
        let err = upload_netlist(&Config::default(), Path::new("design.kicad_sch"), None)
            .await
            .unwrap_err();
        assert!(matches!(err, CircuitViewError::Upload(UploadError::Rejected(_))));
    }
}
