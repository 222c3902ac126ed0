//! HAR 1.2 record shapes.
//!
//! Field names follow the published HAR schema; serde renames map them onto
//! snake_case Rust fields.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Sentinel for sizes and timings that could not be determined.
pub const NOT_MEASURED: i64 = -1;

/// Archive format version written into the preamble.
pub const HAR_VERSION: &str = "1.2";

/// Tool metadata written once per archive.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Creator {
    pub name: String,
    pub version: String,
}

impl Default for Creator {
    fn default() -> Self {
        Self {
            name: env!("CARGO_PKG_NAME").to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
        }
    }
}

/// One recorded request/response exchange.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Entry {
    #[serde(rename = "startedDateTime")]
    pub started_date_time: DateTime<Utc>,
    /// Total elapsed milliseconds.
    pub time: f64,
    pub request: Request,
    pub response: Response,
    pub cache: Cache,
    pub timings: Timings,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Request {
    pub method: String,
    pub url: String,
    #[serde(rename = "httpVersion")]
    pub http_version: String,
    pub cookies: Vec<Cookie>,
    pub headers: Vec<Nvp>,
    #[serde(rename = "queryString")]
    pub query_string: Vec<Nvp>,
    #[serde(rename = "postData", skip_serializing_if = "Option::is_none")]
    pub post_data: Option<PostData>,
    #[serde(rename = "headersSize")]
    pub headers_size: i64,
    #[serde(rename = "bodySize")]
    pub body_size: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Response {
    pub status: u16,
    #[serde(rename = "statusText")]
    pub status_text: String,
    #[serde(rename = "httpVersion")]
    pub http_version: String,
    pub cookies: Vec<Cookie>,
    pub headers: Vec<Nvp>,
    pub content: Content,
    #[serde(rename = "redirectURL")]
    pub redirect_url: String,
    #[serde(rename = "headersSize")]
    pub headers_size: i64,
    #[serde(rename = "bodySize")]
    pub body_size: i64,
}

/// Captured request body.
///
/// `text` always holds the raw payload; `params` is filled only for form
/// encodings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PostData {
    #[serde(rename = "mimeType")]
    pub mime_type: String,
    pub params: Vec<Param>,
    pub text: String,
}

/// One form field. File fields carry a file name and content type instead
/// of a value.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Param {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value: Option<String>,
    #[serde(rename = "fileName", skip_serializing_if = "Option::is_none")]
    pub file_name: Option<String>,
    #[serde(rename = "contentType", skip_serializing_if = "Option::is_none")]
    pub content_type: Option<String>,
}

impl Param {
    pub fn value(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: Some(value.into()),
            ..Default::default()
        }
    }

    pub fn file(name: impl Into<String>, file_name: impl Into<String>, content_type: Option<String>) -> Self {
        Self {
            name: name.into(),
            file_name: Some(file_name.into()),
            content_type,
            ..Default::default()
        }
    }
}

/// Name/value pair used for headers and query parameters.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Nvp {
    pub name: String,
    pub value: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cookie {
    pub name: String,
    pub value: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub domain: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expires: Option<DateTime<Utc>>,
    #[serde(rename = "httpOnly")]
    pub http_only: bool,
    pub secure: bool,
}

/// Response body container.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Content {
    /// Declared Content-Length, or [`NOT_MEASURED`].
    pub size: i64,
    pub compression: i64,
    #[serde(rename = "mimeType")]
    pub mime_type: String,
    pub text: String,
    /// `"base64"` for non-textual bodies.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub encoding: Option<String>,
}

/// Always empty: the recorder does not model caches.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Cache {}

/// Per-phase durations in milliseconds; `-1` marks a phase that was not
/// observed.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Timings {
    pub blocked: f64,
    pub dns: f64,
    pub connect: f64,
    pub send: f64,
    pub wait: f64,
    pub receive: f64,
    pub ssl: f64,
}
