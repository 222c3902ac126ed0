//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! recorder produces:
//!     → logging.rs (structured log events via `tracing`)
//!     → metrics.rs (counters and histograms via the `metrics` facade)
//!
//! Consumers:
//!     → whatever subscriber / recorder the embedding application installs
//! ```
//!
//! # Design Decisions
//! - The library never installs a metrics exporter
//! - Logging setup is optional; `init_logging` is a convenience for embedders

pub mod logging;
pub mod metrics;
