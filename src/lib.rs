//! HTTP Archive recorder for HTTP clients.
//!
//! `HarRecorder` is a tower service that wraps an HTTP client transport and
//! streams one HAR entry per completed exchange into a writer.
//!
//! # Architecture Overview
//!
//! ```text
//!                   ┌──────────────────────── HarRecorder ────────────────────────┐
//!   Request<B>      │  ┌─────────┐   ┌──────────────┐   ┌─────────┐   ┌────────┐  │
//!   ────────────────┼─▶│ capture │──▶│    inner     │──▶│ capture │──▶│rewrite │  │
//!                   │  │ request │   │  transport   │   │response │   │  hook  │  │
//!                   │  └─────────┘   └──────┬───────┘   └─────────┘   └───┬────┘  │
//!   Response        │                       │ ClientTrace                 │       │
//!   ◀───────────────┼── replay body         ▼                             ▼       │
//!                   │               ┌──────────────┐              ┌────────────┐  │
//!                   │               │ trace: dns / │              │   writer   │──┼──▶ sink
//!                   │               │ connect / tls│              │ har/ndjson │  │
//!                   │               └──────────────┘              └────────────┘  │
//!                   └─────────────────────────────────────────────────────────────┘
//! ```

pub mod capture;
pub mod config;
pub mod error;
pub mod har;
pub mod observability;
pub mod recorder;
pub mod trace;
pub mod writer;

pub use config::RecorderConfig;
pub use error::{HarError, HarResult, WriteError};
pub use har::{Creator, Entry};
pub use recorder::{default_transport, HarLayer, HarRecorder, Options, Rewrite};
pub use trace::{ClientTrace, ReplayBody};
pub use writer::{EntryWriter, HarWriter, NdjsonWriter};
