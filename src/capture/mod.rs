//! Entry building: request and response capture.
//!
//! # Data Flow
//! ```text
//! Request<B>
//!     → request.rs (drain body, decode forms, HAR request)
//!     → [forwarded as ReplayBody over the same bytes]
//! Response<B>
//!     → response.rs (drain body, text or base64, HAR response)
//!     → [returned to the caller as an in-memory replay]
//! ```
//!
//! # Design Decisions
//! - Bodies are buffered fully; the forwarded and captured copies share bytes
//! - A missing Content-Type is not an error; a malformed one is

use http::header::{HeaderMap, HeaderName};
use mime::Mime;

use crate::error::{HarError, HarResult, Origin};

pub mod form;
pub mod request;
pub mod response;

pub use form::DEFAULT_MAX_MULTIPART_MEMORY;
pub use request::{capture_request, CapturedRequest};
pub use response::{capture_response, CapturedResponse};

pub(crate) fn header_string(headers: &HeaderMap, name: HeaderName) -> String {
    headers
        .get(name)
        .map(|v| String::from_utf8_lossy(v.as_bytes()).into_owned())
        .unwrap_or_default()
}

pub(crate) fn parse_media_type(value: &str, origin: Origin) -> HarResult<Mime> {
    value.parse::<Mime>().map_err(|source| HarError::ContentType {
        origin,
        value: value.to_string(),
        source,
    })
}
