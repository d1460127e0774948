//! Match event recording.
//!
//! Every [`EngineEvent`] a match emits can be captured as a line of
//! newline-delimited JSON (JSONL), wrapped in an envelope carrying a
//! monotonic sequence number, a timestamp, and the match/group it came
//! from. The resulting log replays a whole match ball by ball.

use std::io::{BufWriter, Write};
use std::path::Path;
use std::sync::Mutex;
use std::sync::atomic::{AtomicU64, Ordering};

use chrono::{DateTime, Utc};
use serde::Serialize;
use tokio::sync::broadcast;
use tokio::task::JoinHandle;

use crate::engine::event::EngineEvent;
use crate::engine::types::{GroupId, MatchId};

/// One recorded line: envelope plus the flattened event.
#[derive(Debug, Serialize)]
struct EventEnvelope {
    /// Zero-based, monotonically increasing per-log counter.
    sequence: u64,
    /// When the event was recorded.
    timestamp: DateTime<Utc>,
    /// Which match emitted it.
    match_id: MatchId,
    /// The hosting group.
    group: i64,
    /// The event itself (flattened into the same JSON object).
    #[serde(flatten)]
    event: EngineEvent,
}

/// Thread-safe, buffered JSONL event writer.
///
/// Each [`record`](Self::record) call atomically takes a sequence number,
/// serializes one JSON line, and flushes. Serialization or I/O failures
/// are dropped silently; recording must never take a match down.
pub struct EventLog {
    writer: Mutex<BufWriter<Box<dyn Write + Send>>>,
    sequence: AtomicU64,
}

// Box<dyn Write> is not Debug.
impl std::fmt::Debug for EventLog {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EventLog")
            .field("sequence", &self.sequence.load(Ordering::Relaxed))
            .finish_non_exhaustive()
    }
}

impl EventLog {
    /// Creates a log writing to the given writer.
    #[must_use]
    pub fn new(writer: Box<dyn Write + Send>) -> Self {
        Self {
            writer: Mutex::new(BufWriter::new(writer)),
            sequence: AtomicU64::new(0),
        }
    }

    /// Creates a log writing to stdout.
    #[must_use]
    pub fn stdout() -> Self {
        Self::new(Box::new(std::io::stdout()))
    }

    /// Creates a log that silently discards everything.
    #[must_use]
    pub fn noop() -> Self {
        Self::new(Box::new(std::io::sink()))
    }

    /// Creates a log writing to a file at `path`.
    ///
    /// # Errors
    ///
    /// Returns an I/O error if the file cannot be created.
    pub fn from_file(path: &Path) -> std::io::Result<Self> {
        let file = std::fs::File::create(path)?;
        Ok(Self::new(Box::new(file)))
    }

    /// Records one event as a single JSONL line.
    pub fn record(&self, match_id: MatchId, group: GroupId, event: &EngineEvent) {
        let envelope = EventEnvelope {
            sequence: self.sequence.fetch_add(1, Ordering::SeqCst),
            timestamp: Utc::now(),
            match_id,
            group: group.0,
            event: event.clone(),
        };

        if let Ok(mut w) = self.writer.lock() {
            if let Ok(line) = serde_json::to_string(&envelope) {
                let _ = writeln!(w, "{line}");
                let _ = w.flush();
            }
        }
    }

    /// Number of events recorded so far.
    #[must_use]
    pub fn recorded(&self) -> u64 {
        self.sequence.load(Ordering::Relaxed)
    }
}

/// Drains a match's event stream into the log until the match ends.
///
/// Lagged receivers lose events rather than stall the match; a gap is
/// logged and draining continues.
pub fn spawn_recorder(
    log: std::sync::Arc<EventLog>,
    match_id: MatchId,
    group: GroupId,
    mut events: broadcast::Receiver<EngineEvent>,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        loop {
            match events.recv().await {
                Ok(event) => log.record(match_id, group, &event),
                Err(broadcast::error::RecvError::Lagged(missed)) => {
                    tracing::warn!(match_id = %match_id, missed, "event recorder lagged");
                }
                Err(broadcast::error::RecvError::Closed) => break,
            }
        }
    })
}
