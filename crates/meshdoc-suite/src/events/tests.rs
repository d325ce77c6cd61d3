// crates/meshdoc-suite/src/events/tests.rs
// ============================================================================
// Module: Suite Event Tests
// Description: Unit coverage for JSON-line and recording sinks.
// Dependencies: serde_json
// ============================================================================

#![allow(
    clippy::expect_used,
    clippy::unwrap_used,
    reason = "Test-only assertions favor direct unwrap/expect for clarity."
)]

use std::io::Write;
use std::sync::Arc;

use serde_json::Value;

use super::EventRecorder;
use super::EventSink;
use super::JsonLineSink;
use super::RecordingSink;
use super::SuiteEvent;
use crate::report::TestStatus;

struct FailingWriter;

impl Write for FailingWriter {
    fn write(&mut self, _buf: &[u8]) -> std::io::Result<usize> {
        Err(std::io::Error::other("simulated write failure"))
    }

    fn flush(&mut self) -> std::io::Result<()> {
        Ok(())
    }
}

#[test]
fn json_line_sink_writes_sequenced_records() {
    let sink = JsonLineSink::new(Vec::new());
    sink.record(&SuiteEvent::TestStarted {
        test: "profile=default".to_string(),
    })
    .expect("record");
    sink.record(&SuiteEvent::TestFinished {
        test: "profile=default".to_string(),
        status: TestStatus::Passed,
        duration_ms: 3,
    })
    .expect("record");

    let bytes = sink.into_inner().expect("writer");
    let text = String::from_utf8(bytes).expect("utf8");
    let lines: Vec<Value> =
        text.lines().map(|line| serde_json::from_str(line).expect("json line")).collect();
    assert_eq!(lines.len(), 2);
    assert_eq!(lines[0]["seq"], 1);
    assert_eq!(lines[0]["event"], "test_started");
    assert_eq!(lines[1]["seq"], 2);
    assert_eq!(lines[1]["status"], "passed");
    assert_eq!(lines[1]["duration_ms"], 3);
}

#[test]
fn json_line_sink_reports_write_failures() {
    let sink = JsonLineSink::new(FailingWriter);
    let result = sink.record(&SuiteEvent::SuiteAborted {
        reason: "boom".to_string(),
    });
    assert!(result.is_err());
}

#[test]
fn recorder_counts_dropped_events() {
    let recorder = EventRecorder::new(Box::new(JsonLineSink::new(FailingWriter)));
    recorder.emit(&SuiteEvent::ConfigSealed {
        overlay_keys: 1,
    });
    recorder.emit(&SuiteEvent::ConfigSealed {
        overlay_keys: 1,
    });
    assert_eq!(recorder.dropped(), 2);
}

#[test]
fn shared_recording_sink_sees_events() {
    let sink = Arc::new(RecordingSink::new());
    let recorder = EventRecorder::new(Box::new(Arc::clone(&sink)));
    recorder.emit(&SuiteEvent::SuiteFinished {
        passed: 1,
        failed: 0,
    });
    assert_eq!(recorder.dropped(), 0);
    assert_eq!(
        sink.events(),
        vec![SuiteEvent::SuiteFinished {
            passed: 1,
            failed: 0
        }]
    );
}

#[test]
fn append_to_creates_log_file() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("events.jsonl");
    let sink = JsonLineSink::append_to(&path).expect("open");
    sink.record(&SuiteEvent::SuiteStarted {
        suite: "docs".to_string(),
        profile: "default".to_string(),
    })
    .expect("record");
    drop(sink);
    let text = std::fs::read_to_string(&path).expect("read");
    assert!(text.ends_with('\n'));
    assert!(text.contains("\"suite_started\""));
}
