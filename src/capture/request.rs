//! Request side of an entry, captured before the exchange is forwarded.

use bytes::Bytes;
use http::header::{HeaderMap, CONTENT_TYPE};
use http::request::Parts;
use http::Request;
use http_body::Body;
use http_body_util::BodyExt;

use crate::capture::{form, header_string, parse_media_type};
use crate::error::{HarError, HarResult, Origin};
use crate::har::convert::{headers_to_nvps, query_to_nvps, request_cookies, version_string};
use crate::har::{self, PostData, NOT_MEASURED};

/// A request drained into memory alongside its HAR record.
#[derive(Debug)]
pub struct CapturedRequest {
    pub parts: Parts,
    pub body: Bytes,
    pub har: har::Request,
}

/// Buffer the request body and build the HAR request.
///
/// Fails without side effects when the body cannot be read or its form
/// encoding cannot be decoded.
pub async fn capture_request<B>(request: Request<B>, max_multipart_memory: u64) -> HarResult<CapturedRequest>
where
    B: Body,
    B::Error: Into<tower::BoxError>,
{
    let (parts, body) = request.into_parts();
    let body = body
        .collect()
        .await
        .map_err(|e| HarError::RequestBody(e.into()))?
        .to_bytes();

    let post_data = if body.is_empty() {
        None
    } else {
        Some(post_data(&parts.headers, &body, max_multipart_memory).await?)
    };

    let har = har::Request {
        method: parts.method.to_string(),
        url: parts.uri.to_string(),
        http_version: version_string(parts.version),
        cookies: request_cookies(&parts.headers),
        headers: headers_to_nvps(&parts.headers),
        query_string: query_to_nvps(&parts.uri),
        post_data,
        headers_size: NOT_MEASURED,
        body_size: body.len() as i64,
    };

    Ok(CapturedRequest { parts, body, har })
}

async fn post_data(headers: &HeaderMap, body: &Bytes, max_multipart_memory: u64) -> HarResult<PostData> {
    let mime_type = header_string(headers, CONTENT_TYPE);
    let mut post_data = PostData {
        mime_type,
        params: Vec::new(),
        text: String::from_utf8_lossy(body).into_owned(),
    };

    if post_data.mime_type.is_empty() {
        return Ok(post_data);
    }

    let media_type = parse_media_type(&post_data.mime_type, Origin::Request)?;
    match (media_type.type_(), media_type.subtype()) {
        (mime::APPLICATION, mime::WWW_FORM_URLENCODED) => {
            post_data.params = form::parse_urlencoded(body)?;
        }
        (mime::MULTIPART, mime::FORM_DATA) => {
            post_data.params =
                form::parse_multipart(body.clone(), &post_data.mime_type, max_multipart_memory).await?;
        }
        _ => {}
    }

    Ok(post_data)
}
