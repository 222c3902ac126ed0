//! Form body decoding for `PostData.params`.

use std::convert::Infallible;

use bytes::Bytes;
use http::header::CONTENT_TYPE;
use multer::{Constraints, Multipart, SizeLimit};
use url::form_urlencoded;

use crate::error::{HarError, HarResult};
use crate::har::Param;

/// Multipart bodies larger than this are rejected unless configured otherwise.
pub const DEFAULT_MAX_MULTIPART_MEMORY: u64 = 10 * 1024 * 1024;

/// Decode an `application/x-www-form-urlencoded` body.
///
/// Percent escapes must be well formed; `%zz` or a trailing `%` is an error.
pub fn parse_urlencoded(body: &[u8]) -> HarResult<Vec<Param>> {
    check_escapes(body)?;
    Ok(form_urlencoded::parse(body)
        .map(|(name, value)| Param::value(name, value))
        .collect())
}

fn check_escapes(body: &[u8]) -> HarResult<()> {
    let mut i = 0;
    while i < body.len() {
        if body[i] != b'%' {
            i += 1;
            continue;
        }
        let well_formed = body
            .get(i + 1..i + 3)
            .is_some_and(|hex| hex.iter().all(u8::is_ascii_hexdigit));
        if !well_formed {
            let end = (i + 3).min(body.len());
            return Err(HarError::UrlEncodedForm(format!(
                "invalid URL escape {:?}",
                String::from_utf8_lossy(&body[i..end])
            )));
        }
        i += 3;
    }
    Ok(())
}

/// Decode a `multipart/form-data` body. File parts are listed by name, file
/// name and content type; their contents are read and discarded.
pub async fn parse_multipart(body: Bytes, content_type: &str, limit: u64) -> HarResult<Vec<Param>> {
    let boundary = multer::parse_boundary(content_type)?;
    let stream = futures_util::stream::once(async move { Ok::<_, Infallible>(body) });
    let constraints = Constraints::new().size_limit(SizeLimit::new().whole_stream(limit));
    let mut multipart = Multipart::with_constraints(stream, boundary, constraints);

    let mut params = Vec::new();
    while let Some(field) = multipart.next_field().await? {
        let name = field.name().unwrap_or_default().to_string();
        match field.file_name().map(str::to_string) {
            Some(file_name) => {
                let part_type = field
                    .headers()
                    .get(CONTENT_TYPE)
                    .map(|v| String::from_utf8_lossy(v.as_bytes()).into_owned());
                field.bytes().await?;
                params.push(Param::file(name, file_name, part_type));
            }
            None => {
                let value = field.text().await?;
                params.push(Param::value(name, value));
            }
        }
    }
    Ok(params)
}
