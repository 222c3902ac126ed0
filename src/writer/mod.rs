//! Streaming archive writers.
//!
//! # Data Flow
//! ```text
//! serialized entry (bytes)
//!     → EntryWriter::write_entry (one lock acquisition per entry)
//!         → framed.rs: `,\n` separator + entry inside {"log":{...,"entries":[ ... ]}}
//!         → ndjson.rs: entry + `\n`
//!     → EntryWriter::close (postamble / flush)
//! ```
//!
//! # Design Decisions
//! - Entries are streamed; nothing is buffered beyond the entry being written
//! - The sink lock is held for one write only, never across an exchange
//! - Entry order is lock acquisition order, not request start order

use async_trait::async_trait;

use crate::error::WriteError;

pub mod framed;
pub mod ndjson;

pub use framed::HarWriter;
pub use ndjson::NdjsonWriter;

/// Sink for serialized HAR entries.
#[async_trait]
pub trait EntryWriter: Send + Sync {
    /// Append one serialized entry. Concurrent calls never interleave bytes.
    async fn write_entry(&self, entry: &[u8]) -> Result<(), WriteError>;

    /// Finish the output. A second call, or a write after it, fails with
    /// [`WriteError::Closed`].
    async fn close(&self) -> Result<(), WriteError>;
}
