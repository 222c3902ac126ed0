//! Line-delimited writer: one entry per line, no enclosing document.

use async_trait::async_trait;
use tokio::io::{AsyncWrite, AsyncWriteExt};
use tokio::sync::Mutex;

use crate::error::WriteError;
use crate::writer::EntryWriter;

struct LineState<W> {
    sink: W,
    closed: bool,
}

pub struct NdjsonWriter<W> {
    state: Mutex<LineState<W>>,
}

impl<W> NdjsonWriter<W>
where
    W: AsyncWrite + Unpin + Send,
{
    pub fn new(sink: W) -> Self {
        Self {
            state: Mutex::new(LineState { sink, closed: false }),
        }
    }

    pub fn into_inner(self) -> W {
        self.state.into_inner().sink
    }
}

#[async_trait]
impl<W> EntryWriter for NdjsonWriter<W>
where
    W: AsyncWrite + Unpin + Send,
{
    async fn write_entry(&self, entry: &[u8]) -> Result<(), WriteError> {
        let mut state = self.state.lock().await;
        if state.closed {
            return Err(WriteError::Closed);
        }

        let mut line = Vec::with_capacity(entry.len() + 1);
        line.extend_from_slice(entry);
        line.push(b'\n');

        state.sink
            .write_all(&line)
            .await
            .map_err(WriteError::io("writing har entry"))?;
        state.sink.flush().await.map_err(WriteError::io("writing har entry"))
    }

    /// Nothing to frame; flushes and refuses further entries.
    async fn close(&self) -> Result<(), WriteError> {
        let mut state = self.state.lock().await;
        if state.closed {
            return Err(WriteError::Closed);
        }
        state.closed = true;
        state.sink.flush().await.map_err(WriteError::io("closing har writer"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::Value;
    use std::sync::Arc;

    #[tokio::test]
    async fn test_one_entry_per_line() {
        let writer = NdjsonWriter::new(Vec::new());
        writer.write_entry(br#"{"n":1}"#).await.unwrap();
        writer.write_entry(br#"{"n":2}"#).await.unwrap();

        let out = String::from_utf8(writer.into_inner()).unwrap();
        assert_eq!(out, "{\"n\":1}\n{\"n\":2}\n");
        for line in out.lines() {
            let _: Value = serde_json::from_str(line).unwrap();
        }
    }

    #[tokio::test]
    async fn test_no_preamble_and_close_adds_nothing() {
        let writer = NdjsonWriter::new(Vec::new());
        writer.close().await.unwrap();
        assert!(matches!(writer.write_entry(b"{}").await, Err(WriteError::Closed)));
        assert!(writer.into_inner().is_empty());
    }

    #[tokio::test]
    async fn test_concurrent_writes_keep_whole_lines() {
        let writer = Arc::new(NdjsonWriter::new(Vec::new()));

        let mut handles = Vec::new();
        for i in 0..32 {
            let writer = writer.clone();
            handles.push(tokio::spawn(async move {
                let entry = serde_json::json!({ "n": i, "pad": "x".repeat(512) });
                writer.write_entry(&serde_json::to_vec(&entry).unwrap()).await
            }));
        }
        for h in handles {
            h.await.unwrap().unwrap();
        }
        writer.close().await.unwrap();

        let writer = Arc::try_unwrap(writer).ok().unwrap();
        let out = String::from_utf8(writer.into_inner()).unwrap();
        let mut seen: Vec<u64> = out
            .lines()
            .map(|line| {
                let v: Value = serde_json::from_str(line).unwrap();
                v["n"].as_u64().unwrap()
            })
            .collect();
        seen.sort_unstable();
        assert_eq!(seen, (0..32).collect::<Vec<u64>>());
    }
}
