//! External duplicate finder integration.
//!
//! Duplicate detection itself happens in an external script; this module only
//! knows how to locate it, build its command line, run it, and stream what it
//! prints. The finder's output is forwarded verbatim and never interpreted.
//!
//! # Architecture
//!
//! - [`request`]: immutable [`FinderRequest`] and exact argument construction
//! - [`resolve`]: script location (packaged vs development) and interpreter table
//! - [`events`]: [`StreamEvent`] channel and incremental UTF-8 decoding
//! - [`orchestrator`]: process lifecycle and [`ProcessOutcome`] resolution

pub mod events;
pub mod orchestrator;
pub mod request;
pub mod resolve;

// Re-export main types
pub use events::{create_event_channel, EventReceiver, EventSender, StreamEvent};
pub use orchestrator::{FailureReason, Orchestrator, ProcessOutcome};
pub use request::{FinderRequest, RequestError};
pub use resolve::{resolve_interpreter, FinderCommand, LaunchMode, Platform, ScriptLocator};
