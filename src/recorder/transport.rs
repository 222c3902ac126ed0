//! Default inner transport: a pooled hyper client with traced connectors.

use hyper_rustls::{HttpsConnector, HttpsConnectorBuilder};
use hyper_util::client::legacy::connect::dns::GaiResolver;
use hyper_util::client::legacy::connect::HttpConnector;
use hyper_util::client::legacy::Client;
use hyper_util::rt::TokioExecutor;

use crate::trace::{ReplayBody, TracedConnector, TracedResolver, TracedTls};

pub type DefaultConnector =
    TracedTls<HttpsConnector<TracedConnector<HttpConnector<TracedResolver<GaiResolver>>>>>;

/// Client used when no inner transport is supplied. Speaks http and https
/// (webpki roots), HTTP/1.1 and HTTP/2.
pub type DefaultTransport = Client<DefaultConnector, ReplayBody>;

pub fn default_transport() -> DefaultTransport {
    let mut http = HttpConnector::new_with_resolver(TracedResolver::new(GaiResolver::new()));
    http.enforce_http(false);

    let https = HttpsConnectorBuilder::new()
        .with_webpki_roots()
        .https_or_http()
        .enable_http1()
        .enable_http2()
        .wrap_connector(TracedConnector::new(http));

    Client::builder(TokioExecutor::new()).build(TracedTls::new(https))
}
