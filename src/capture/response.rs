//! Response side of an entry, captured after the transport returns.

use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use bytes::Bytes;
use http::header::{CONTENT_LENGTH, CONTENT_TYPE, LOCATION};
use http::response::Parts;
use http::Response;
use http_body::Body;
use http_body_util::BodyExt;

use crate::capture::{header_string, parse_media_type};
use crate::error::{HarError, HarResult, Origin};
use crate::har::convert::{headers_to_nvps, response_cookies, version_string};
use crate::har::{self, Content, NOT_MEASURED};

/// A response drained into memory alongside its HAR record.
#[derive(Debug)]
pub struct CapturedResponse {
    pub parts: Parts,
    pub body: Bytes,
    pub har: har::Response,
}

/// Drain the response body and build the HAR response.
///
/// `text/*` bodies are stored verbatim; everything else is base64 encoded.
/// Sizes come from the declared Content-Length.
pub async fn capture_response<B>(response: Response<B>) -> HarResult<CapturedResponse>
where
    B: Body,
    B::Error: Into<tower::BoxError>,
{
    let (parts, body) = response.into_parts();
    let body = body
        .collect()
        .await
        .map_err(|e| HarError::ResponseBody(e.into()))?
        .to_bytes();

    let mime_type = header_string(&parts.headers, CONTENT_TYPE);
    let textual = !mime_type.is_empty() && parse_media_type(&mime_type, Origin::Response)?.type_() == mime::TEXT;

    let (text, encoding) = if textual {
        (String::from_utf8_lossy(&body).into_owned(), None)
    } else {
        (STANDARD.encode(&body), Some("base64".to_string()))
    };

    let declared_length = parts
        .headers
        .get(CONTENT_LENGTH)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.trim().parse::<i64>().ok())
        .unwrap_or(NOT_MEASURED);

    let har = har::Response {
        status: parts.status.as_u16(),
        status_text: parts.status.canonical_reason().unwrap_or_default().to_string(),
        http_version: version_string(parts.version),
        cookies: response_cookies(&parts.headers),
        headers: headers_to_nvps(&parts.headers),
        content: Content {
            size: declared_length,
            compression: 0,
            mime_type,
            text,
            encoding,
        },
        redirect_url: header_string(&parts.headers, LOCATION),
        headers_size: NOT_MEASURED,
        body_size: declared_length,
    };

    Ok(CapturedResponse { parts, body, har })
}
