//! CircuitView - netlist graph normalization for analog circuit viewers
//!
//! This library turns the JSON a netlist-to-graph backend returns into one
//! canonical node/link graph, assigns each node a stable visual style, and
//! formats electrical parameters with engineering units.
//!
//! # Quick Start
//!
//! ```no_run
//! use circuitview::{CircuitView, DetailPolicy};
//! use std::path::Path;
//!
//! let view = CircuitView::open(Path::new("ota.json")).unwrap();
//!
//! for node in view.graph.nodes() {
//!     println!("{} ({})", node.id, node.group);
//! }
//! if let Some(detail) = view.detail("M0", &DetailPolicy::default()) {
//!     for row in &detail.parameters {
//!         println!("{} = {}", row.key, row.display);
//!     }
//! }
//! ```
//!
//! # Features
//!
//! - **Schema normalization**: flat `components`/`nets` and typed `graph.nodes` payloads
//! - **Node styling**: per-device colors and golden-angle hues for matched pairs
//! - **Unit formatting**: Ω/F/V/m scaling and SPICE-suffixed values
//! - **Upload client**: multipart `.scs` upload to the conversion backend
//! - **Session**: single-flight uploads with stale results discarded

pub mod config;
pub mod core;
pub mod export;
pub mod graph;
pub mod inspect;
pub mod payload;
pub mod session;
pub mod style;
pub mod summary;
pub mod units;
pub mod upload;

// Re-export main types
pub use config::{Config, ConfigError};
pub use core::{upload_netlist, CircuitView, CircuitViewError};
pub use export::{export_filename, export_json, write_export, ExportError};
pub use graph::{normalize, GraphData, GraphLink, GraphNode, NodeGroup, NodeRecord, NormalizeError};
pub use inspect::{inspect, DetailPolicy, NodeDetail};
pub use payload::{CircuitPayload, SchemaShape};
pub use session::{Session, SessionError};
pub use style::{resolve_style, Color, NodeShape, NodeStyle};
pub use summary::CircuitSummary;
pub use units::format_param;
pub use upload::{HttpBackend, NetlistBackend, UploadError, UploadRequest};

/// Load and normalize a saved payload file (convenience wrapper).
pub fn load_payload(path: &std::path::Path) -> Result<CircuitView, CircuitViewError> {
    Ok(CircuitView::open(path)?)
}

/// Prelude for convenient imports.
pub mod prelude {
    pub use crate::{
        format_param, normalize, CircuitPayload, CircuitView, CircuitViewError, Config,
        DetailPolicy, GraphData, NodeGroup, NodeStyle, Session,
    };
}
