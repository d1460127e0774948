//! Observability.
//!
//! Logging, metric descriptions, and the JSONL match-event recorder.

pub mod events;
pub mod logging;
pub mod metrics;

pub use events::{EventLog, spawn_recorder};
pub use logging::{LogFormat, init_logging};
pub use metrics::describe_metrics;
