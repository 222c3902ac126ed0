//! HAR data model.
//!
//! # Data Flow
//! ```text
//! http::Request / http::Response
//!     → convert.rs (headers, query string, cookies, protocol version)
//!     → types.rs (Entry, Request, Response, Content, Timings ...)
//!     → serde_json bytes handed to the writer
//! ```

pub mod convert;
pub mod types;

pub use types::{
    Cache, Content, Cookie, Creator, Entry, Nvp, Param, PostData, Request, Response, Timings,
    HAR_VERSION, NOT_MEASURED,
};
