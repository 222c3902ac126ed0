//! Recorder options and the rewrite hook.

use std::fmt;
use std::sync::Arc;

use bytes::Bytes;
use http::{Request, Response};

use crate::capture::DEFAULT_MAX_MULTIPART_MEMORY;
use crate::config::RecorderConfig;
use crate::error::{HarError, HarResult};
use crate::har::Creator;

/// Per-entry transform applied before an entry is written.
///
/// Receives the original request and response (bodies buffered) and the
/// serialized entry. Returning `None`, or an empty buffer, drops the entry.
pub type Rewrite = Arc<dyn Fn(&Request<Bytes>, &Response<Bytes>, Vec<u8>) -> Option<Vec<u8>> + Send + Sync>;

#[derive(Clone)]
pub struct Options {
    pub creator: Creator,
    /// Identity when unset.
    pub rewrite: Option<Rewrite>,
    pub max_multipart_memory: u64,
}

impl Options {
    pub fn with_creator(mut self, name: impl Into<String>, version: impl Into<String>) -> Self {
        self.creator = Creator {
            name: name.into(),
            version: version.into(),
        };
        self
    }

    pub fn with_rewrite<F>(mut self, rewrite: F) -> Self
    where
        F: Fn(&Request<Bytes>, &Response<Bytes>, Vec<u8>) -> Option<Vec<u8>> + Send + Sync + 'static,
    {
        self.rewrite = Some(Arc::new(rewrite));
        self
    }

    pub fn with_max_multipart_memory(mut self, limit: u64) -> Self {
        self.max_multipart_memory = limit;
        self
    }

    pub(crate) fn validate(&self) -> HarResult<()> {
        if self.creator.name.is_empty() {
            return Err(HarError::EmptyCreatorName);
        }
        if self.creator.version.is_empty() {
            return Err(HarError::EmptyCreatorVersion);
        }
        Ok(())
    }
}

impl Default for Options {
    fn default() -> Self {
        Self {
            creator: Creator::default(),
            rewrite: None,
            max_multipart_memory: DEFAULT_MAX_MULTIPART_MEMORY,
        }
    }
}

impl From<&RecorderConfig> for Options {
    fn from(config: &RecorderConfig) -> Self {
        Self {
            creator: config.creator.clone(),
            rewrite: None,
            max_multipart_memory: config.capture.max_multipart_memory,
        }
    }
}

impl fmt::Debug for Options {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Options")
            .field("creator", &self.creator)
            .field("rewrite", &self.rewrite.as_ref().map(|_| ".."))
            .field("max_multipart_memory", &self.max_multipart_memory)
            .finish()
    }
}
