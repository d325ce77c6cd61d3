// crates/meshdoc-suite/src/events.rs
// ============================================================================
// Module: Suite Events
// Description: Structured lifecycle events and sinks.
// Purpose: Emit JSON-line records for setup, install, test, and teardown steps.
// Dependencies: serde, serde_json
// ============================================================================

//! ## Overview
//! Every lifecycle step emits a [`SuiteEvent`] through an [`EventSink`].
//! [`JsonLineSink`] writes one JSON object per line to any writer;
//! [`RecordingSink`] keeps events in memory for assertions.
//! Invariants:
//! - Sink failures never change a test outcome; the suite counts them as
//!   dropped events.
//! - `seq` values in JSON-line output start at 1 and increase by one.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::fs::File;
use std::fs::OpenOptions;
use std::io::Write;
use std::path::Path;
use std::sync::Arc;
use std::sync::Mutex;
use std::sync::atomic::AtomicU64;
use std::sync::atomic::Ordering;

use serde::Serialize;

use crate::error::EventError;
use crate::report::TestStatus;

// ============================================================================
// SECTION: Events
// ============================================================================

/// Suite lifecycle event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum SuiteEvent {
    /// Suite run started.
    SuiteStarted {
        /// Suite name.
        suite: String,
        /// Profile under test.
        profile: String,
    },
    /// A setup callback completed.
    SetupApplied {
        /// Registered step name.
        step: String,
        /// Zero-based registration index.
        index: usize,
    },
    /// The configuration passed validation and was sealed.
    ConfigSealed {
        /// Number of leaf values set by the overlay.
        overlay_keys: usize,
    },
    /// The control plane was installed.
    Installed {
        /// Installed profile.
        profile: String,
        /// System namespace.
        namespace: String,
        /// Revision label.
        revision: String,
    },
    /// A test started.
    TestStarted {
        /// Test name.
        test: String,
    },
    /// A test finished.
    TestFinished {
        /// Test name.
        test: String,
        /// Outcome.
        status: TestStatus,
        /// Wall-clock duration.
        duration_ms: u64,
    },
    /// Golden documents were rewritten instead of verified.
    GoldenRefreshed {
        /// Test name.
        test: String,
        /// Written paths relative to the golden root.
        paths: Vec<String>,
    },
    /// The control plane was removed.
    Uninstalled {
        /// System namespace.
        namespace: String,
        /// Revision label.
        revision: String,
    },
    /// Teardown failed; recorded in the report.
    TeardownFailed {
        /// Failure description.
        reason: String,
    },
    /// The summary could not be written; recorded in the report.
    ReportFailed {
        /// Failure description.
        reason: String,
    },
    /// The suite aborted before running tests.
    SuiteAborted {
        /// Failure description.
        reason: String,
    },
    /// The suite finished.
    SuiteFinished {
        /// Passed test count.
        passed: usize,
        /// Failed or errored test count.
        failed: usize,
    },
}

// ============================================================================
// SECTION: Sinks
// ============================================================================

/// Destination for suite events.
pub trait EventSink: Send + Sync {
    /// Records one event.
    ///
    /// # Errors
    ///
    /// Returns [`EventError`] when the event cannot be persisted.
    fn record(&self, event: &SuiteEvent) -> Result<(), EventError>;
}

impl<T: EventSink + ?Sized> EventSink for Arc<T> {
    fn record(&self, event: &SuiteEvent) -> Result<(), EventError> {
        (**self).record(event)
    }
}

/// Sink that discards every event.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullSink;

impl EventSink for NullSink {
    fn record(&self, _event: &SuiteEvent) -> Result<(), EventError> {
        Ok(())
    }
}

/// Sink that keeps events in memory.
#[derive(Debug, Default)]
pub struct RecordingSink {
    /// Recorded events in emission order.
    events: Mutex<Vec<SuiteEvent>>,
}

impl RecordingSink {
    /// Creates an empty recording sink.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns a snapshot of recorded events.
    #[must_use]
    pub fn events(&self) -> Vec<SuiteEvent> {
        self.events.lock().map(|events| events.clone()).unwrap_or_default()
    }
}

impl EventSink for RecordingSink {
    fn record(&self, event: &SuiteEvent) -> Result<(), EventError> {
        let mut events =
            self.events.lock().map_err(|_| EventError::Write("recording sink poisoned".into()))?;
        events.push(event.clone());
        Ok(())
    }
}

/// JSON-line record written by [`JsonLineSink`].
#[derive(Serialize)]
struct EventRecord<'a> {
    /// Sequence number, starting at 1.
    seq: u64,
    /// Event payload.
    #[serde(flatten)]
    event: &'a SuiteEvent,
}

/// Sink that writes one JSON object per line.
#[derive(Debug)]
pub struct JsonLineSink<W: Write + Send> {
    /// Guarded writer.
    writer: Mutex<W>,
    /// Last sequence number issued.
    seq: AtomicU64,
}

impl<W: Write + Send> JsonLineSink<W> {
    /// Wraps a writer.
    #[must_use]
    pub const fn new(writer: W) -> Self {
        Self {
            writer: Mutex::new(writer),
            seq: AtomicU64::new(0),
        }
    }

    /// Returns the wrapped writer.
    ///
    /// # Errors
    ///
    /// Returns [`EventError::Write`] when the writer lock is poisoned.
    pub fn into_inner(self) -> Result<W, EventError> {
        self.writer.into_inner().map_err(|_| EventError::Write("event writer poisoned".into()))
    }
}

impl JsonLineSink<File> {
    /// Opens `path` for appending, creating it when missing.
    ///
    /// # Errors
    ///
    /// Returns [`EventError::Write`] when the file cannot be opened.
    pub fn append_to(path: &Path) -> Result<Self, EventError> {
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(path)
            .map_err(|err| EventError::Write(format!("{}: {err}", path.display())))?;
        Ok(Self::new(file))
    }
}

impl<W: Write + Send> EventSink for JsonLineSink<W> {
    fn record(&self, event: &SuiteEvent) -> Result<(), EventError> {
        let record = EventRecord {
            seq: self.seq.fetch_add(1, Ordering::Relaxed) + 1,
            event,
        };
        let mut line =
            serde_json::to_vec(&record).map_err(|err| EventError::Serialize(err.to_string()))?;
        line.push(b'\n');
        let mut writer =
            self.writer.lock().map_err(|_| EventError::Write("event writer poisoned".into()))?;
        writer.write_all(&line).map_err(|err| EventError::Write(err.to_string()))?;
        writer.flush().map_err(|err| EventError::Write(err.to_string()))
    }
}

// ============================================================================
// SECTION: Recorder
// ============================================================================

/// Emits events to a sink and counts the ones it failed to record.
pub(crate) struct EventRecorder {
    /// Destination sink.
    sink: Box<dyn EventSink>,
    /// Events the sink rejected.
    dropped: AtomicU64,
}

impl EventRecorder {
    /// Wraps a sink.
    pub(crate) fn new(sink: Box<dyn EventSink>) -> Self {
        Self {
            sink,
            dropped: AtomicU64::new(0),
        }
    }

    /// Emits an event, counting failures instead of propagating them.
    pub(crate) fn emit(&self, event: &SuiteEvent) {
        if self.sink.record(event).is_err() {
            self.dropped.fetch_add(1, Ordering::Relaxed);
        }
    }

    /// Returns the number of dropped events.
    pub(crate) fn dropped(&self) -> u64 {
        self.dropped.load(Ordering::Relaxed)
    }
}

impl std::fmt::Debug for EventRecorder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EventRecorder").field("dropped", &self.dropped()).finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests;
