//! Tower layer sharing one archive between every recorder it produces.

use std::sync::Arc;

use tokio::fs::{File, OpenOptions};
use tokio::io::AsyncWrite;
use tower::Layer;

use crate::config::{OutputConfig, OutputFormat};
use crate::error::{HarResult, WriteError};
use crate::recorder::{HarRecorder, Options, Recording};
use crate::writer::{EntryWriter, HarWriter, NdjsonWriter};

/// Wraps services in [`HarRecorder`]s writing to a common archive.
#[derive(Clone)]
pub struct HarLayer {
    recording: Arc<Recording>,
}

impl HarLayer {
    /// Framed HAR output to `sink`. The preamble is written before this
    /// returns.
    pub async fn new<W>(sink: W, options: Options) -> HarResult<Self>
    where
        W: AsyncWrite + Unpin + Send + 'static,
    {
        options.validate()?;
        let writer = HarWriter::new(sink, &options.creator).await?;
        Self::with_writer(Arc::new(writer), options)
    }

    /// Output to an already constructed writer, e.g. an [`NdjsonWriter`].
    pub fn with_writer(writer: Arc<dyn EntryWriter>, options: Options) -> HarResult<Self> {
        options.validate()?;
        Ok(Self {
            recording: Arc::new(Recording {
                writer,
                rewrite: options.rewrite,
                max_multipart_memory: options.max_multipart_memory,
            }),
        })
    }

    /// Open the configured output file and write to it in the configured
    /// format.
    pub async fn open(output: &OutputConfig, options: Options) -> HarResult<Self> {
        match output.format {
            OutputFormat::Har => {
                let file = File::create(&output.path)
                    .await
                    .map_err(WriteError::io("opening output"))?;
                Self::new(file, options).await
            }
            OutputFormat::Ndjson => {
                let file = OpenOptions::new()
                    .create(true)
                    .append(true)
                    .open(&output.path)
                    .await
                    .map_err(WriteError::io("opening output"))?;
                Self::with_writer(Arc::new(NdjsonWriter::new(file)), options)
            }
        }
    }

    /// Finalize the archive. Must be called once, after the last exchange.
    pub async fn close(&self) -> HarResult<()> {
        Ok(self.recording.writer.close().await?)
    }
}

impl<S> Layer<S> for HarLayer {
    type Service = HarRecorder<S>;

    fn layer(&self, inner: S) -> Self::Service {
        HarRecorder::from_parts(inner, self.recording.clone())
    }
}
