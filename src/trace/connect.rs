//! Connector and resolver wrappers that report into the current trace.
//!
//! # Responsibilities
//! - `TracedResolver`: DNS lookup start/done
//! - `TracedConnector`: dial start, TCP ready, TLS handshake start for https
//! - `TracedTls`: TLS handshake done, connection handed to the client
//!
//! Wrappers only observe connections that are dialed on the task driving the
//! request. Pooled connections are never dialed, so their connect phases stay
//! unmeasured.

use std::task::{Context, Poll};

use futures_util::future::BoxFuture;
use http::uri::Scheme;
use http::Uri;
use tower::Service;

use crate::trace::ClientTrace;

fn is_https(uri: &Uri) -> bool {
    uri.scheme() == Some(&Scheme::HTTPS)
}

/// Resolver wrapper reporting DNS timing.
#[derive(Debug, Clone)]
pub struct TracedResolver<R> {
    inner: R,
}

impl<R> TracedResolver<R> {
    pub fn new(inner: R) -> Self {
        Self { inner }
    }
}

impl<R, N> Service<N> for TracedResolver<R>
where
    R: Service<N>,
    R::Future: Send + 'static,
{
    type Response = R::Response;
    type Error = R::Error;
    type Future = BoxFuture<'static, Result<R::Response, R::Error>>;

    fn poll_ready(&mut self, cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.inner.poll_ready(cx)
    }

    fn call(&mut self, name: N) -> Self::Future {
        let trace = ClientTrace::current();
        if let Some(trace) = &trace {
            trace.dns_start();
        }
        let fut = self.inner.call(name);
        Box::pin(async move {
            let resolved = fut.await;
            if let Some(trace) = trace {
                trace.dns_done();
            }
            resolved
        })
    }
}

/// Wrapper around the plain TCP connector.
#[derive(Debug, Clone)]
pub struct TracedConnector<C> {
    inner: C,
}

impl<C> TracedConnector<C> {
    pub fn new(inner: C) -> Self {
        Self { inner }
    }
}

impl<C> Service<Uri> for TracedConnector<C>
where
    C: Service<Uri>,
    C::Future: Send + 'static,
{
    type Response = C::Response;
    type Error = C::Error;
    type Future = BoxFuture<'static, Result<C::Response, C::Error>>;

    fn poll_ready(&mut self, cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.inner.poll_ready(cx)
    }

    fn call(&mut self, uri: Uri) -> Self::Future {
        let trace = ClientTrace::current();
        if let Some(trace) = &trace {
            trace.connect_start();
        }
        let https = is_https(&uri);
        let fut = self.inner.call(uri);
        Box::pin(async move {
            let conn = fut.await?;
            if let Some(trace) = trace {
                trace.got_conn();
                if https {
                    trace.tls_handshake_start();
                }
            }
            Ok(conn)
        })
    }
}

/// Wrapper around a TLS-capable connector built on [`TracedConnector`].
#[derive(Debug, Clone)]
pub struct TracedTls<C> {
    inner: C,
}

impl<C> TracedTls<C> {
    pub fn new(inner: C) -> Self {
        Self { inner }
    }
}

impl<C> Service<Uri> for TracedTls<C>
where
    C: Service<Uri>,
    C::Future: Send + 'static,
{
    type Response = C::Response;
    type Error = C::Error;
    type Future = BoxFuture<'static, Result<C::Response, C::Error>>;

    fn poll_ready(&mut self, cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.inner.poll_ready(cx)
    }

    fn call(&mut self, uri: Uri) -> Self::Future {
        let trace = ClientTrace::current();
        let fut = self.inner.call(uri);
        Box::pin(async move {
            let conn = fut.await?;
            if let Some(trace) = trace {
                if trace.tls_started() {
                    trace.tls_handshake_done();
                }
                trace.got_conn();
            }
            Ok(conn)
        })
    }
}
