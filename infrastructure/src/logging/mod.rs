//! Logging infrastructure: structured workflow event logging.
//!
//! Provides [`JsonlEventLogger`], a JSONL file writer that implements the
//! [`WorkflowObserver`](seeker_application::WorkflowObserver) port.

mod jsonl_logger;

pub use jsonl_logger::JsonlEventLogger;
