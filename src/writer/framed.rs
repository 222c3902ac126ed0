//! Framed-array writer producing a single HAR document.

use async_trait::async_trait;
use tokio::io::{AsyncWrite, AsyncWriteExt};
use tokio::sync::Mutex;

use crate::error::{HarResult, WriteError};
use crate::har::{Creator, HAR_VERSION};
use crate::writer::EntryWriter;

const ENTRY_SEPARATOR: &[u8] = b",\n";
const POSTAMBLE: &[u8] = b"\n]}}";

struct FramedState<W> {
    sink: W,
    first: bool,
    closed: bool,
}

/// Writes `{"log":{"version":"1.2","creator":{..},"entries":[` up front, one
/// entry per [`write_entry`](EntryWriter::write_entry), and `]}}` on close.
pub struct HarWriter<W> {
    state: Mutex<FramedState<W>>,
}

impl<W> HarWriter<W>
where
    W: AsyncWrite + Unpin + Send,
{
    /// Emit the preamble and return the writer. Fails if the preamble
    /// cannot be written.
    pub async fn new(mut sink: W, creator: &Creator) -> HarResult<Self> {
        let mut preamble = format!(r#"{{"log":{{"version":"{}","creator":"#, HAR_VERSION).into_bytes();
        serde_json::to_writer(&mut preamble, creator)?;
        preamble.extend_from_slice(b",\"entries\":[\n");

        sink.write_all(&preamble)
            .await
            .map_err(WriteError::io("writing preamble"))?;
        sink.flush().await.map_err(WriteError::io("writing preamble"))?;

        tracing::debug!(creator = %creator.name, version = %creator.version, "HAR preamble written");

        Ok(Self {
            state: Mutex::new(FramedState {
                sink,
                first: true,
                closed: false,
            }),
        })
    }

    /// Give back the sink, whether or not the writer was closed.
    pub fn into_inner(self) -> W {
        self.state.into_inner().sink
    }
}

#[async_trait]
impl<W> EntryWriter for HarWriter<W>
where
    W: AsyncWrite + Unpin + Send,
{
    async fn write_entry(&self, entry: &[u8]) -> Result<(), WriteError> {
        let mut state = self.state.lock().await;
        if state.closed {
            return Err(WriteError::Closed);
        }

        let mut buf = Vec::with_capacity(entry.len() + ENTRY_SEPARATOR.len());
        if !state.first {
            buf.extend_from_slice(ENTRY_SEPARATOR);
        }
        buf.extend_from_slice(entry);
        state.first = false;

        state.sink
            .write_all(&buf)
            .await
            .map_err(WriteError::io("writing har entry"))?;
        state.sink.flush().await.map_err(WriteError::io("writing har entry"))
    }

    async fn close(&self) -> Result<(), WriteError> {
        let mut state = self.state.lock().await;
        if state.closed {
            return Err(WriteError::Closed);
        }
        state.closed = true;

        state.sink
            .write_all(POSTAMBLE)
            .await
            .map_err(WriteError::io("closing har writer"))?;
        state.sink.flush().await.map_err(WriteError::io("closing har writer"))?;

        tracing::debug!("HAR writer closed");
        Ok(())
    }
}
