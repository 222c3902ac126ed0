//! Per-request phase timestamps and the HAR timings derived from them.

use std::future::Future;
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::{Duration, Instant};

use chrono::{DateTime, Utc};

use crate::har::{Timings, NOT_MEASURED};

tokio::task_local! {
    static CURRENT: ClientTrace;
}

/// Raw lifecycle marks for one exchange.
#[derive(Debug, Clone, Copy)]
pub(crate) struct Marks {
    pub started: Instant,
    /// Request handed to the transport; connection acquisition begins.
    pub get_conn: Option<Instant>,
    pub dns_start: Option<Instant>,
    pub dns_done: Option<Instant>,
    /// Set only when the transport dials a new connection.
    pub connect_start: Option<Instant>,
    pub tls_start: Option<Instant>,
    pub tls_done: Option<Instant>,
    pub got_conn: Option<Instant>,
    pub wrote_request: Option<Instant>,
    pub first_byte: Option<Instant>,
}

impl Marks {
    fn new(started: Instant) -> Self {
        Self {
            started,
            get_conn: None,
            dns_start: None,
            dns_done: None,
            connect_start: None,
            tls_start: None,
            tls_done: None,
            got_conn: None,
            wrote_request: None,
            first_byte: None,
        }
    }

    /// Derive phase durations, ending the exchange at `end`.
    ///
    /// Connection timing for TLS transports covers the handshake as well;
    /// `ssl` reports the handshake on its own.
    pub fn timings(&self, end: Instant) -> Timings {
        let got_conn = self.got_conn.or(self.get_conn);
        let wrote_request = self.wrote_request.or(got_conn);

        Timings {
            blocked: span(Some(self.started), self.get_conn.or(self.connect_start)),
            dns: span(self.dns_start, self.dns_done),
            // reused connections never mark connect_start
            connect: span(self.connect_start, self.got_conn),
            send: span(got_conn, wrote_request),
            wait: span(wrote_request, self.first_byte),
            receive: span(self.first_byte, Some(end)),
            ssl: span(self.tls_start, self.tls_done),
        }
    }
}

fn span(from: Option<Instant>, to: Option<Instant>) -> f64 {
    match (from, to) {
        (Some(from), Some(to)) => millis(to.saturating_duration_since(from)),
        _ => NOT_MEASURED as f64,
    }
}

pub(crate) fn millis(d: Duration) -> f64 {
    d.as_secs() as f64 * 1000.0 + f64::from(d.subsec_nanos()) / 1_000_000.0
}

/// Result of closing a trace.
#[derive(Debug, Clone, Copy)]
pub struct TraceSummary {
    pub started_at: DateTime<Utc>,
    pub elapsed: Duration,
    pub timings: Timings,
}

/// Lifecycle recorder shared between the recorder and transport components.
///
/// Cloning is cheap; all clones record into the same marks. Transport
/// components find the trace of the exchange they serve through
/// [`ClientTrace::current`], or through the request extensions.
#[derive(Debug, Clone)]
pub struct ClientTrace {
    started_at: DateTime<Utc>,
    marks: Arc<Mutex<Marks>>,
}

impl ClientTrace {
    pub fn new() -> Self {
        Self {
            started_at: Utc::now(),
            marks: Arc::new(Mutex::new(Marks::new(Instant::now()))),
        }
    }

    /// Trace of the exchange being driven by the current task, if any.
    pub fn current() -> Option<ClientTrace> {
        CURRENT.try_with(|t| t.clone()).ok()
    }

    /// Run `fut` with this trace installed as the task's current trace.
    pub async fn scope<F: Future>(self, fut: F) -> F::Output {
        CURRENT.scope(self, fut).await
    }

    fn marks(&self) -> MutexGuard<'_, Marks> {
        self.marks.lock().unwrap_or_else(|e| e.into_inner())
    }

    pub fn get_conn(&self) {
        self.marks().get_conn.get_or_insert_with(Instant::now);
    }

    pub fn dns_start(&self) {
        self.marks().dns_start = Some(Instant::now());
    }

    pub fn dns_done(&self) {
        self.marks().dns_done = Some(Instant::now());
    }

    pub fn connect_start(&self) {
        self.marks().connect_start.get_or_insert_with(Instant::now);
    }

    pub fn tls_handshake_start(&self) {
        self.marks().tls_start = Some(Instant::now());
    }

    pub fn tls_handshake_done(&self) {
        self.marks().tls_done = Some(Instant::now());
    }

    pub(crate) fn tls_started(&self) -> bool {
        self.marks().tls_start.is_some()
    }

    /// A connection is ready for this request.
    pub fn got_conn(&self) {
        self.marks().got_conn = Some(Instant::now());
    }

    pub fn wrote_request(&self) {
        self.marks().wrote_request.get_or_insert_with(Instant::now);
    }

    #[cfg(test)]
    pub(crate) fn request_written(&self) -> bool {
        self.marks().wrote_request.is_some()
    }

    pub fn first_response_byte(&self) {
        self.marks().first_byte.get_or_insert_with(Instant::now);
    }

    /// Close the trace now and compute the entry timings.
    pub fn finish(&self) -> TraceSummary {
        let end = Instant::now();
        let marks = *self.marks();
        TraceSummary {
            started_at: self.started_at,
            elapsed: end.saturating_duration_since(marks.started),
            timings: marks.timings(end),
        }
    }
}

impl Default for ClientTrace {
    fn default() -> Self {
        Self::new()
    }
}
