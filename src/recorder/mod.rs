//! Interception layer.
//!
//! # Data Flow
//! ```text
//! caller's Request<B>
//!     → capture (buffer body, HAR request)        errors abort, nothing written
//!     → ClientTrace attached, inner transport called  errors pass through unchanged
//!     → capture (buffer body, HAR response, timings)
//!     → rewrite hook (may alter or drop the entry)
//!     → EntryWriter
//!     → caller receives Response<Full<Bytes>> replaying the same body
//! ```
//!
//! # Design Decisions
//! - No lock is held across the inner call; only the writer serializes
//! - Nothing is retried; retry policy belongs to the caller or transport

use std::sync::Arc;

use crate::writer::EntryWriter;

pub mod layer;
pub mod options;
pub mod service;
pub mod transport;

pub use layer::HarLayer;
pub use options::{Options, Rewrite};
pub use service::HarRecorder;
pub use transport::{default_transport, DefaultConnector, DefaultTransport};

/// State shared by all recorders writing to one archive.
pub(crate) struct Recording {
    pub(crate) writer: Arc<dyn EntryWriter>,
    pub(crate) rewrite: Option<Rewrite>,
    pub(crate) max_multipart_memory: u64,
}
