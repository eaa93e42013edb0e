//! Structured logging for the PRINIX assistant.
//!
//! Console plus rolling NDJSON file output, per-turn event records, and
//! scrubbing of credentials before anything reaches a log line.

pub mod event_logger;
pub mod logger;
pub mod redact;

pub use event_logger::{TurnEvent, TurnEventLogger, TurnLogEntry};
pub use logger::{LogSink, init_logger};
pub use redact::redact_sensitive_data;
