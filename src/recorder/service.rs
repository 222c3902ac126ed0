//! The recording service.
//!
//! # Responsibilities
//! - Buffer and capture the request, forward a replay of it
//! - Attach a `ClientTrace` and delegate to the inner transport
//! - Buffer and capture the response, hand back a replay of it
//! - Run the rewrite hook and commit the entry to the writer

use std::sync::Arc;
use std::task::{Context, Poll};

use bytes::Bytes;
use futures_util::future::BoxFuture;
use http::{Request, Response};
use http_body::Body;
use http_body_util::Full;
use tokio::io::AsyncWrite;
use tower::{BoxError, Layer, Service};

use crate::capture::{capture_request, capture_response};
use crate::config::RecorderConfig;
use crate::error::{HarError, HarResult};
use crate::har::{Cache, Entry};
use crate::observability::metrics;
use crate::recorder::transport::{default_transport, DefaultTransport};
use crate::recorder::{HarLayer, Options, Recording};
use crate::trace::timing::millis;
use crate::trace::{ClientTrace, ReplayBody};

/// Records every exchange passing through the wrapped transport `S`.
///
/// Cloning is cheap; clones share the archive.
#[derive(Clone)]
pub struct HarRecorder<S> {
    inner: S,
    recording: Arc<Recording>,
}

impl HarRecorder<DefaultTransport> {
    /// Framed HAR output to `sink` over the default transport.
    pub async fn new<W>(sink: W, options: Options) -> HarResult<Self>
    where
        W: AsyncWrite + Unpin + Send + 'static,
    {
        Self::with_transport(default_transport(), sink, options).await
    }

    /// Build from a loaded configuration over the default transport.
    pub async fn from_config(config: &RecorderConfig) -> HarResult<Self> {
        let layer = HarLayer::open(&config.output, Options::from(config)).await?;
        Ok(layer.layer(default_transport()))
    }
}

impl<S> HarRecorder<S> {
    /// Framed HAR output to `sink` over `inner`.
    pub async fn with_transport<W>(inner: S, sink: W, options: Options) -> HarResult<Self>
    where
        W: AsyncWrite + Unpin + Send + 'static,
    {
        Ok(HarLayer::new(sink, options).await?.layer(inner))
    }

    pub(crate) fn from_parts(inner: S, recording: Arc<Recording>) -> Self {
        Self { inner, recording }
    }

    /// Finalize the archive. Must be called once, after the last exchange.
    pub async fn close(&self) -> HarResult<()> {
        Ok(self.recording.writer.close().await?)
    }
}

impl<S, B, ResBody> Service<Request<B>> for HarRecorder<S>
where
    S: Service<Request<ReplayBody>, Response = Response<ResBody>> + Clone + Send + 'static,
    S::Future: Send + 'static,
    S::Error: Into<BoxError>,
    B: Body + Send + 'static,
    B::Data: Send,
    B::Error: Into<BoxError>,
    ResBody: Body + Send + 'static,
    ResBody::Data: Send,
    ResBody::Error: Into<BoxError>,
{
    type Response = Response<Full<Bytes>>;
    type Error = BoxError;
    type Future = BoxFuture<'static, Result<Self::Response, Self::Error>>;

    fn poll_ready(&mut self, cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.inner.poll_ready(cx).map_err(Into::into)
    }

    fn call(&mut self, request: Request<B>) -> Self::Future {
        // the ready service goes into the future; a fresh clone stays behind
        let clone = self.inner.clone();
        let inner = std::mem::replace(&mut self.inner, clone);
        let recording = self.recording.clone();
        Box::pin(record(inner, recording, request))
    }
}

async fn record<S, B, ResBody>(
    mut inner: S,
    recording: Arc<Recording>,
    request: Request<B>,
) -> Result<Response<Full<Bytes>>, BoxError>
where
    S: Service<Request<ReplayBody>, Response = Response<ResBody>>,
    S::Error: Into<BoxError>,
    B: Body,
    B::Error: Into<BoxError>,
    ResBody: Body,
    ResBody::Error: Into<BoxError>,
{
    let captured = capture_request(request, recording.max_multipart_memory)
        .await
        .inspect_err(capture_failed)?;

    let trace = ClientTrace::new();
    let mut forwarded = Request::from_parts(
        captured.parts.clone(),
        ReplayBody::traced(captured.body.clone(), trace.clone()),
    );
    forwarded.extensions_mut().insert(trace.clone());

    trace.get_conn();
    let response = match trace.clone().scope(async move { inner.call(forwarded).await }).await {
        Ok(response) => response,
        Err(e) => {
            let e: BoxError = e.into();
            tracing::warn!(
                method = %captured.har.method,
                url = %captured.har.url,
                error = %e,
                "Transport error, no entry recorded"
            );
            metrics::record_transport_error();
            return Err(e);
        }
    };
    trace.first_response_byte();

    let captured_response = capture_response(response).await.inspect_err(capture_failed)?;
    let summary = trace.finish();

    let entry = Entry {
        started_date_time: summary.started_at,
        time: millis(summary.elapsed),
        request: captured.har,
        response: captured_response.har,
        cache: Cache::default(),
        timings: summary.timings,
    };

    let original_request = Request::from_parts(captured.parts, captured.body);
    let replay = Response::from_parts(captured_response.parts, captured_response.body);

    recording.commit(&original_request, &replay, &entry).await?;
    metrics::record_entry_written(&entry.request.method, entry.response.status, summary.elapsed);

    Ok(replay.map(Full::new))
}

fn capture_failed(e: &HarError) {
    tracing::warn!(stage = e.stage(), error = %e, "Capture failed, exchange aborted");
    metrics::record_capture_error(e.stage());
}

impl Recording {
    async fn commit(&self, request: &Request<Bytes>, response: &Response<Bytes>, entry: &Entry) -> HarResult<()> {
        let json = serde_json::to_vec(entry)?;
        let json = match &self.rewrite {
            Some(rewrite) => rewrite(request, response, json),
            None => Some(json),
        };

        let Some(json) = json.filter(|j| !j.is_empty()) else {
            tracing::debug!(url = %entry.request.url, "Entry suppressed by rewrite hook");
            metrics::record_entry_suppressed();
            return Ok(());
        };

        self.writer.write_entry(&json).await.inspect_err(|e| {
            tracing::error!(url = %entry.request.url, error = %e, "Failed to write HAR entry");
        })?;

        tracing::debug!(
            method = %entry.request.method,
            url = %entry.request.url,
            status = entry.response.status,
            elapsed_ms = entry.time,
            "HAR entry recorded"
        );
        Ok(())
    }
}
