//! Viewer Session
//!
//! Holds the active circuit: its payload, canonical graph, resolved styles
//! and the current selection. Loading a new payload replaces all of it at
//! once; a failed load leaves the previous circuit in place.
//!
//! Uploads are single-flight. A second upload while one is outstanding is
//! refused, and a response that lands after a newer payload was loaded is
//! dropped instead of replacing it.

use chrono::{DateTime, Utc};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Mutex, MutexGuard};
use thiserror::Error;
use uuid::Uuid;

use crate::core::CircuitView;
use crate::export::{write_export, ExportError};
use crate::graph::NormalizeError;
use crate::inspect::{inspect, DetailPolicy, NodeDetail};
use crate::payload::CircuitPayload;
use crate::upload::{NetlistBackend, UploadError, UploadRequest};

#[derive(Debug, Error)]
pub enum SessionError {
    #[error("No circuit loaded")]
    NoActiveCircuit,
    #[error("Unknown node `{0}`")]
    UnknownNode(String),
    #[error("An upload is already in progress")]
    UploadInProgress,
    #[error("Upload result discarded: a newer circuit was loaded")]
    Superseded,
    #[error(transparent)]
    Normalize(#[from] NormalizeError),
    #[error(transparent)]
    Upload(#[from] UploadError),
    #[error(transparent)]
    Export(#[from] ExportError),
}

/// The loaded circuit plus its session identity
#[derive(Debug, Clone)]
pub struct ActiveCircuit {
    pub id: Uuid,
    pub loaded_at: DateTime<Utc>,
    pub view: CircuitView,
    pub selection: Option<String>,
}

impl ActiveCircuit {
    fn new(view: CircuitView) -> Self {
        Self {
            id: Uuid::new_v4(),
            loaded_at: Utc::now(),
            view,
            selection: None,
        }
    }
}

pub struct Session {
    active: Mutex<Option<ActiveCircuit>>,
    uploading: AtomicBool,
    generation: AtomicU64,
    policy: DetailPolicy,
}

impl Default for Session {
    fn default() -> Self {
        Self::new(DetailPolicy::default())
    }
}

/// Clears the upload flag however the upload ends
struct UploadGuard<'a>(&'a AtomicBool);

impl Drop for UploadGuard<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::SeqCst);
    }
}

impl Session {
    pub fn new(policy: DetailPolicy) -> Self {
        Self {
            active: Mutex::new(None),
            uploading: AtomicBool::new(false),
            generation: AtomicU64::new(0),
            policy,
        }
    }

    fn lock(&self) -> MutexGuard<'_, Option<ActiveCircuit>> {
        self.active.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Replace the active circuit with `payload`
    pub fn load(&self, payload: CircuitPayload) -> Result<Uuid, SessionError> {
        let circuit = ActiveCircuit::new(CircuitView::from_payload(payload)?);
        self.install(circuit, None)
    }

    /// Install a built circuit; with `expected`, only if no other load happened since
    fn install(&self, circuit: ActiveCircuit, expected: Option<u64>) -> Result<Uuid, SessionError> {
        let mut active = self.lock();
        if let Some(generation) = expected {
            if self.generation.load(Ordering::SeqCst) != generation {
                tracing::warn!("Discarding stale upload result {}", circuit.id);
                return Err(SessionError::Superseded);
            }
        }
        self.generation.fetch_add(1, Ordering::SeqCst);

        let id = circuit.id;
        tracing::info!(
            "Loaded circuit {} ({} nodes, {} links)",
            id,
            circuit.view.graph.nodes().len(),
            circuit.view.graph.links().len()
        );
        *active = Some(circuit);
        Ok(id)
    }

    /// Upload a netlist and make the response the active circuit
    pub async fn upload<B>(&self, backend: &B, request: UploadRequest) -> Result<Uuid, SessionError>
    where
        B: NetlistBackend + ?Sized,
    {
        if self
            .uploading
            .compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst)
            .is_err()
        {
            return Err(SessionError::UploadInProgress);
        }
        let _guard = UploadGuard(&self.uploading);
        let generation = self.generation.load(Ordering::SeqCst);

        tracing::info!("Uploading {} via {} backend", request.filename, backend.name());
        let payload = backend.upload(request).await?;
        let circuit = ActiveCircuit::new(CircuitView::from_payload(payload)?);
        self.install(circuit, Some(generation))
    }

    pub fn is_uploading(&self) -> bool {
        self.uploading.load(Ordering::SeqCst)
    }

    /// Drop the active circuit; an upload still in flight will be discarded
    pub fn close(&self) {
        let mut active = self.lock();
        self.generation.fetch_add(1, Ordering::SeqCst);
        *active = None;
    }

    pub fn active_id(&self) -> Option<Uuid> {
        self.lock().as_ref().map(|c| c.id)
    }

    /// Run `f` against the active circuit
    pub fn with_active<R>(&self, f: impl FnOnce(&ActiveCircuit) -> R) -> Option<R> {
        self.lock().as_ref().map(f)
    }

    /// Store layout coordinates for a node of the active circuit
    pub fn set_position(&self, id: &str, x: f64, y: f64) -> Result<(), SessionError> {
        let mut active = self.lock();
        let circuit = active.as_mut().ok_or(SessionError::NoActiveCircuit)?;
        if circuit.view.graph.set_position(id, x, y) {
            Ok(())
        } else {
            Err(SessionError::UnknownNode(id.to_string()))
        }
    }

    pub fn select(&self, id: Option<&str>) -> Result<(), SessionError> {
        let mut active = self.lock();
        let circuit = active.as_mut().ok_or(SessionError::NoActiveCircuit)?;
        match id {
            Some(id) if !circuit.view.graph.contains(id) => Err(SessionError::UnknownNode(id.to_string())),
            _ => {
                circuit.selection = id.map(str::to_string);
                Ok(())
            }
        }
    }

    pub fn selected_detail(&self) -> Option<NodeDetail> {
        let active = self.lock();
        let circuit = active.as_ref()?;
        let id = circuit.selection.as_deref()?;
        inspect(&circuit.view.graph, id, &self.policy)
    }

    /// Write the active payload's verbatim export into `dir`
    pub fn export(&self, dir: &Path) -> Result<PathBuf, SessionError> {
        let active = self.lock();
        let circuit = active.as_ref().ok_or(SessionError::NoActiveCircuit)?;
        Ok(write_export(&circuit.view.payload, dir)?)
    }
}
