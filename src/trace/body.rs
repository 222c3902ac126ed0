//! In-memory request body handed to the wrapped transport.

use std::convert::Infallible;
use std::pin::Pin;
use std::task::{Context, Poll};

use bytes::Bytes;
use http_body::{Body, Frame, SizeHint};
use http_body_util::Full;

use crate::trace::ClientTrace;

/// Replay of a buffered request body.
///
/// When built with a trace, the trace is told the request was written once
/// the transport pulls the final frame.
#[derive(Debug, Default)]
pub struct ReplayBody {
    inner: Full<Bytes>,
    trace: Option<ClientTrace>,
}

impl ReplayBody {
    pub fn new(bytes: Bytes) -> Self {
        Self {
            inner: Full::new(bytes),
            trace: None,
        }
    }

    pub(crate) fn traced(bytes: Bytes, trace: ClientTrace) -> Self {
        Self {
            inner: Full::new(bytes),
            trace: Some(trace),
        }
    }
}

impl From<Bytes> for ReplayBody {
    fn from(bytes: Bytes) -> Self {
        Self::new(bytes)
    }
}

impl Body for ReplayBody {
    type Data = Bytes;
    type Error = Infallible;

    fn poll_frame(
        self: Pin<&mut Self>,
        cx: &mut Context<'_>,
    ) -> Poll<Option<Result<Frame<Self::Data>, Self::Error>>> {
        let this = self.get_mut();
        let polled = Pin::new(&mut this.inner).poll_frame(cx);
        if this.inner.is_end_stream() {
            if let Some(trace) = this.trace.take() {
                trace.wrote_request();
            }
        }
        polled
    }

    fn is_end_stream(&self) -> bool {
        self.inner.is_end_stream()
    }

    fn size_hint(&self) -> SizeHint {
        self.inner.size_hint()
    }
}
