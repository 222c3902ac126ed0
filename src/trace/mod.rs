//! Connection lifecycle timing.
//!
//! # Data Flow
//! ```text
//! recorder creates ClientTrace
//!     → attached to the forwarded request (extension)
//!     → installed as task-local while the transport runs
//!         → connect.rs wrappers mark DNS / dial / TLS / connection ready
//!         → body.rs marks the request as written
//!     → recorder marks first response byte and end of body
//!     → timing.rs derives HAR timings
//! ```
//!
//! # Design Decisions
//! - Best effort: phases that are never observed stay at -1
//! - Connect time of TLS connections includes the handshake

pub mod body;
pub mod connect;
pub mod timing;

pub use body::ReplayBody;
pub use connect::{TracedConnector, TracedResolver, TracedTls};
pub use timing::{ClientTrace, TraceSummary};
