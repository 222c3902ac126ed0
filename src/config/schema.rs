//! Configuration schema definitions.
//!
//! All types derive Serde traits for deserialization from TOML files.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::capture::DEFAULT_MAX_MULTIPART_MEMORY;
use crate::har::Creator;

/// Root configuration for a recorder.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct RecorderConfig {
    /// Tool metadata written into the archive.
    pub creator: Creator,

    /// Where and how entries are written.
    pub output: OutputConfig,

    /// Body capture limits.
    pub capture: CaptureConfig,
}

/// Output mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// One HAR document with a framed `entries` array.
    #[default]
    Har,
    /// One entry per line, no enclosing document.
    Ndjson,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct OutputConfig {
    pub format: OutputFormat,

    /// Output file. Truncated for `har`, appended to for `ndjson`.
    pub path: PathBuf,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            format: OutputFormat::Har,
            path: PathBuf::from("capture.har"),
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct CaptureConfig {
    /// Largest multipart request body decoded into params, in bytes.
    pub max_multipart_memory: u64,
}

impl Default for CaptureConfig {
    fn default() -> Self {
        Self {
            max_multipart_memory: DEFAULT_MAX_MULTIPART_MEMORY,
        }
    }
}
