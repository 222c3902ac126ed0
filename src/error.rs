//! Error types for capture and archive writing.

use thiserror::Error;

/// Which side of an exchange a Content-Type came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Origin {
    Request,
    Response,
}

impl std::fmt::Display for Origin {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Origin::Request => write!(f, "request"),
            Origin::Response => write!(f, "response"),
        }
    }
}

/// Errors raised while constructing a recorder or capturing an exchange.
///
/// None of these leave a partial entry behind: a failed capture aborts the
/// exchange before anything reaches the writer.
#[derive(Debug, Error)]
pub enum HarError {
    #[error("creator name cannot be empty")]
    EmptyCreatorName,

    #[error("creator version cannot be empty")]
    EmptyCreatorVersion,

    #[error("reading request body: {0}")]
    RequestBody(#[source] tower::BoxError),

    #[error("reading response body: {0}")]
    ResponseBody(#[source] tower::BoxError),

    #[error("parsing {origin} Content-Type {value:?}: {source}")]
    ContentType {
        origin: Origin,
        value: String,
        #[source]
        source: mime::FromStrError,
    },

    #[error("parsing urlencoded form in request body: {0}")]
    UrlEncodedForm(String),

    #[error("parsing multipart form in request body: {0}")]
    Multipart(#[from] multer::Error),

    #[error("serializing har entry: {0}")]
    Serialize(#[from] serde_json::Error),

    #[error(transparent)]
    Write(#[from] WriteError),
}

impl HarError {
    /// Short label used for metrics and log fields.
    pub fn stage(&self) -> &'static str {
        match self {
            HarError::EmptyCreatorName | HarError::EmptyCreatorVersion => "config",
            HarError::RequestBody(_) => "request_body",
            HarError::ResponseBody(_) => "response_body",
            HarError::ContentType { .. } => "content_type",
            HarError::UrlEncodedForm(_) | HarError::Multipart(_) => "form",
            HarError::Serialize(_) => "serialize",
            HarError::Write(_) => "write",
        }
    }
}

/// Errors surfaced by an [`EntryWriter`](crate::writer::EntryWriter).
#[derive(Debug, Error)]
pub enum WriteError {
    #[error("{stage}: {source}")]
    Io {
        stage: &'static str,
        #[source]
        source: std::io::Error,
    },

    #[error("har writer already closed")]
    Closed,
}

impl WriteError {
    pub(crate) fn io(stage: &'static str) -> impl FnOnce(std::io::Error) -> Self {
        move |source| WriteError::Io { stage, source }
    }
}

pub type HarResult<T> = Result<T, HarError>;
