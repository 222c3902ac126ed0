//! Conversions from `http` types into HAR records.

use chrono::{DateTime, Utc};
use http::header::{HeaderMap, COOKIE, SET_COOKIE};
use http::{Uri, Version};
use url::form_urlencoded;

use crate::har::types::{Cookie, Nvp};

/// One pair per header value; repeated names stay separate.
pub fn headers_to_nvps(headers: &HeaderMap) -> Vec<Nvp> {
    headers
        .iter()
        .map(|(name, value)| Nvp {
            name: name.as_str().to_string(),
            value: String::from_utf8_lossy(value.as_bytes()).into_owned(),
        })
        .collect()
}

pub fn query_to_nvps(uri: &Uri) -> Vec<Nvp> {
    let Some(query) = uri.query() else {
        return Vec::new();
    };
    form_urlencoded::parse(query.as_bytes())
        .map(|(name, value)| Nvp {
            name: name.into_owned(),
            value: value.into_owned(),
        })
        .collect()
}

pub fn version_string(version: Version) -> String {
    format!("{:?}", version)
}

/// Cookies sent by the client in `Cookie` headers.
pub fn request_cookies(headers: &HeaderMap) -> Vec<Cookie> {
    headers
        .get_all(COOKIE)
        .iter()
        .filter_map(|v| v.to_str().ok())
        .flat_map(|line| {
            cookie::Cookie::split_parse(line)
                .filter_map(|c| c.ok())
                .map(|c| to_har_cookie(&c))
                .collect::<Vec<_>>()
        })
        .collect()
}

/// Cookies set by the server, one per `Set-Cookie` header.
pub fn response_cookies(headers: &HeaderMap) -> Vec<Cookie> {
    headers
        .get_all(SET_COOKIE)
        .iter()
        .filter_map(|v| v.to_str().ok())
        .filter_map(|line| match cookie::Cookie::parse(line) {
            Ok(c) => Some(to_har_cookie(&c)),
            Err(e) => {
                tracing::debug!(error = %e, "skipping unparseable Set-Cookie header");
                None
            }
        })
        .collect()
}

fn to_har_cookie(c: &cookie::Cookie<'_>) -> Cookie {
    let expires = c
        .expires_datetime()
        .and_then(|t| DateTime::<Utc>::from_timestamp(t.unix_timestamp(), t.nanosecond()));

    Cookie {
        name: c.name().to_string(),
        value: c.value().to_string(),
        path: c.path().map(str::to_string),
        domain: c.domain().map(str::to_string),
        expires,
        http_only: c.http_only().unwrap_or(false),
        secure: c.secure().unwrap_or(false),
    }
}
