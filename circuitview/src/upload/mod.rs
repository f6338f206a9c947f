//! Netlist Upload
//!
//! Sends a netlist source file to the conversion backend and decodes the
//! returned payload. Backends sit behind [`NetlistBackend`] so sessions can be
//! driven by the HTTP client or by an in-memory double.

pub mod http;

pub use http::HttpBackend;

use async_trait::async_trait;
use serde_json::Value;
use std::path::Path;
use thiserror::Error;

use crate::graph::NormalizeError;
use crate::payload::CircuitPayload;

/// The only netlist format the backend converts
pub const NETLIST_EXTENSION: &str = "scs";

#[derive(Debug, Error)]
pub enum UploadError {
    #[error("Upload rejected: {0}")]
    Rejected(String),

    #[error("Upload failed: {0}")]
    Failed(String),

    #[error("Backend error: {status} - {message}")]
    Status { status: u16, message: String },

    #[error("Request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("Backend returned an unusable payload: {0}")]
    InvalidPayload(#[from] NormalizeError),
}

/// One netlist file plus its optional performance sidecar
#[derive(Debug, Clone, PartialEq)]
pub struct UploadRequest {
    pub filename: String,
    pub contents: Vec<u8>,
    pub perf_specs: Option<Value>,
}

impl UploadRequest {
    /// Build a request, rejecting anything that is not a `.scs` netlist
    pub fn new(filename: impl Into<String>, contents: Vec<u8>) -> Result<Self, UploadError> {
        let filename = filename.into();
        check_extension(&filename)?;
        Ok(Self {
            filename,
            contents,
            perf_specs: None,
        })
    }

    pub fn with_perf_specs(mut self, perf_specs: Option<Value>) -> Self {
        self.perf_specs = perf_specs;
        self
    }

    /// Read a netlist from disk; the extension is checked before the file is touched
    pub async fn from_path(path: &Path) -> Result<Self, UploadError> {
        let filename = path
            .file_name()
            .and_then(|n| n.to_str())
            .ok_or_else(|| UploadError::Rejected(format!("{} has no file name", path.display())))?
            .to_string();
        check_extension(&filename)?;

        let contents = tokio::fs::read(path)
            .await
            .map_err(|e| UploadError::Failed(format!("cannot read {}: {}", path.display(), e)))?;
        Self::new(filename, contents)
    }
}

fn check_extension(filename: &str) -> Result<(), UploadError> {
    let ok = Path::new(filename)
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.eq_ignore_ascii_case(NETLIST_EXTENSION))
        .unwrap_or(false);
    if ok {
        Ok(())
    } else {
        tracing::warn!("Rejected upload of {}", filename);
        Err(UploadError::Rejected(format!(
            "{} is not a .{} netlist",
            filename, NETLIST_EXTENSION
        )))
    }
}

/// A service that converts netlists into circuit payloads
#[async_trait]
pub trait NetlistBackend: Send + Sync {
    /// Backend name for logs
    fn name(&self) -> &str;

    /// Convert one netlist; failures are terminal for this attempt
    async fn upload(&self, request: UploadRequest) -> Result<CircuitPayload, UploadError>;

    /// Whether the backend reports itself healthy
    async fn health(&self) -> Result<bool, UploadError>;
}
