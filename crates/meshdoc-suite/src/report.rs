// crates/meshdoc-suite/src/report.rs
// ============================================================================
// Module: Suite Report
// Description: Per-test outcomes and suite summaries.
// Purpose: Surface pass/fail results and persist deterministic summaries.
// Dependencies: serde, serde_jcs
// ============================================================================

//! ## Overview
//! [`SuiteReport`] is returned by every suite run that reaches the test phase.
//! [`SuiteReport::write_to`] persists `summary.json` (canonical JSON) and
//! `summary.md` into a run directory.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::fmt::Write as _;
use std::fs;
use std::path::Path;
use std::path::PathBuf;

use serde::Serialize;

use crate::error::ReportError;
use crate::invocation::TestFailure;

// ============================================================================
// SECTION: Outcomes
// ============================================================================

/// Final status of a test.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TestStatus {
    /// The check passed.
    Passed,
    /// The check found a content mismatch.
    Failed,
    /// The check could not run because of a tooling fault.
    Errored,
}

impl TestStatus {
    /// Returns the lowercase label used in summaries.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Passed => "passed",
            Self::Failed => "failed",
            Self::Errored => "errored",
        }
    }
}

/// Result of a single test.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TestOutcome {
    /// Test name.
    pub name: String,
    /// Final status.
    pub status: TestStatus,
    /// Wall-clock duration.
    pub duration_ms: u64,
    /// Failure classification and details, when not passed.
    pub failure: Option<TestFailure>,
}

impl TestOutcome {
    /// Builds an outcome from a check result.
    #[must_use]
    pub fn from_result(name: &str, duration_ms: u64, result: Result<(), TestFailure>) -> Self {
        let (status, failure) = match result {
            Ok(()) => (TestStatus::Passed, None),
            Err(failure @ TestFailure::Assertion { .. }) => (TestStatus::Failed, Some(failure)),
            Err(failure @ TestFailure::Environment { .. }) => (TestStatus::Errored, Some(failure)),
        };
        Self {
            name: name.to_string(),
            status,
            duration_ms,
            failure,
        }
    }

    /// Returns true when the test passed.
    #[must_use]
    pub const fn passed(&self) -> bool {
        matches!(self.status, TestStatus::Passed)
    }
}

// ============================================================================
// SECTION: Suite Report
// ============================================================================

/// Summary of a suite run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SuiteReport {
    /// Suite name.
    pub suite: String,
    /// Installed profile.
    pub profile: String,
    /// System namespace of the installation.
    pub namespace: String,
    /// Revision label of the installation.
    pub revision: String,
    /// Number of leaf values set by the sealed overlay.
    pub overlay_keys: usize,
    /// Per-test outcomes in execution order.
    pub tests: Vec<TestOutcome>,
    /// Teardown failure, when uninstall failed.
    pub teardown_error: Option<String>,
    /// Failure to persist the summary under the run root.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub report_error: Option<String>,
    /// Events the sink failed to record.
    pub dropped_events: u64,
}

impl SuiteReport {
    /// Returns the number of passed tests.
    #[must_use]
    pub fn passed(&self) -> usize {
        self.tests.iter().filter(|test| test.passed()).count()
    }

    /// Returns the number of failed or errored tests.
    #[must_use]
    pub fn failed(&self) -> usize {
        self.tests.len() - self.passed()
    }

    /// Returns true when every test passed, teardown succeeded, and the
    /// summary was persisted.
    #[must_use]
    pub fn is_success(&self) -> bool {
        self.failed() == 0 && self.teardown_error.is_none() && self.report_error.is_none()
    }

    /// Looks up a test outcome by name.
    #[must_use]
    pub fn outcome(&self, name: &str) -> Option<&TestOutcome> {
        self.tests.iter().find(|test| test.name == name)
    }

    /// Writes `summary.json` and `summary.md` into `dir`, creating it.
    ///
    /// # Errors
    ///
    /// Returns [`ReportError`] when serialization or I/O fails.
    pub fn write_to(&self, dir: &Path) -> Result<Vec<PathBuf>, ReportError> {
        fs::create_dir_all(dir).map_err(|err| ReportError::Io(err.to_string()))?;
        let json = serde_jcs::to_vec(self).map_err(|err| ReportError::Serialize(err.to_string()))?;
        let json_path = dir.join("summary.json");
        fs::write(&json_path, json).map_err(|err| ReportError::Io(err.to_string()))?;
        let md_path = dir.join("summary.md");
        fs::write(&md_path, self.to_markdown()).map_err(|err| ReportError::Io(err.to_string()))?;
        Ok(vec![json_path, md_path])
    }

    /// Renders the Markdown summary.
    #[must_use]
    pub fn to_markdown(&self) -> String {
        let mut out = String::new();
        out.push_str("# Suite Summary\n\n## Status\n\n");
        let _ = writeln!(out, "- Suite: {}", self.suite);
        let _ = writeln!(out, "- Profile: {}", self.profile);
        let _ = writeln!(out, "- Namespace: {} (revision {})", self.namespace, self.revision);
        let _ = writeln!(out, "- Overlay keys: {}", self.overlay_keys);
        let _ = writeln!(out, "- Passed: {}", self.passed());
        let _ = writeln!(out, "- Failed: {}", self.failed());
        let _ = writeln!(out, "- Dropped events: {}", self.dropped_events);
        if let Some(reason) = &self.teardown_error {
            let _ = writeln!(out, "- Teardown: failed ({reason})");
        }
        out.push_str("\n## Tests\n\n");
        if self.tests.is_empty() {
            out.push_str("- None\n");
        }
        for test in &self.tests {
            let _ = writeln!(out, "- {}: {} ({} ms)", test.name, test.status.as_str(), test.duration_ms);
            if let Some(failure) = &test.failure {
                let _ = writeln!(out, "  - {failure}");
                if let Some(diff) = failure.diff() {
                    out.push_str("\n```diff\n");
                    out.push_str(diff);
                    if !diff.ends_with('\n') {
                        out.push('\n');
                    }
                    out.push_str("```\n\n");
                }
            }
        }
        out
    }
}
