// system-tests/tests/suites/docs_drift.rs
// ============================================================================
// Module: Docs Drift Tests
// Description: System tests for golden drift, tampering, and determinism.
// Purpose: Validate that the docs test fails loudly and names what changed.
// Dependencies: system-tests helpers, meshdoc-suite
// ============================================================================

//! ## Overview
//! System tests for golden drift, tampering, and determinism.
//! Invariants:
//! - Drift is an assertion failure carrying a per-document diff.
//! - An unreadable golden root is an environment fault, not drift.
//! - Teardown runs even when the docs test fails.

use std::fs;

use helpers::golden::ScratchGolden;
use meshdoc_suite::Suite;
use meshdoc_suite::SuiteReport;
use meshdoc_suite::TestStatus;
use meshdoc_suite::docs_test;
use meshdoc_suite::set_control_plane_values;
use system_tests::config::golden_root;
use system_tests::profile_default::DOCS_LABEL;
use system_tests::profile_default::suite;

use crate::helpers;

/// Overlay that keeps the alpha Gateway API enabled.
const ALPHA_ON: &str = "
values:
  pilot:
    env:
      PILOT_ENABLE_ALPHA_GATEWAY_API: true
";

/// Documents rendered for the default profile.
const DOCS: [&str; 3] =
    ["profile-default/overview.md", "profile-default/values.md", "profile-default/feature-flags.md"];

/// Returns the docs diff of a failed default-profile report.
fn failed_diff(report: &SuiteReport) -> Result<String, Box<dyn std::error::Error>> {
    let Some(outcome) = report.outcome(DOCS_LABEL) else {
        return Err(format!("no outcome for {DOCS_LABEL}").into());
    };
    if outcome.status != TestStatus::Failed {
        return Err(format!("expected a failed docs test:\n{}", report.to_markdown()).into());
    }
    let Some(diff) = outcome.failure.as_ref().and_then(|failure| failure.diff()) else {
        return Err("docs failure carries no diff".into());
    };
    Ok(diff.to_string())
}

#[test]
fn golden_with_alpha_enabled_fails_verification() -> Result<(), Box<dyn std::error::Error>> {
    let scratch = ScratchGolden::empty()?;
    let refreshed = Suite::new("alpha-enabled")
        .with_harness(scratch.harness(true))
        .setup("enable-alpha-gateway-api", set_control_plane_values(ALPHA_ON))
        .test(docs_test(DOCS_LABEL))
        .run()?;
    if !refreshed.is_success() {
        return Err(format!("refresh failed:\n{}", refreshed.to_markdown()).into());
    }

    let report = suite(scratch.harness(false))?.run()?;
    let diff = failed_diff(&report)?;
    if !diff.contains("PILOT_ENABLE_ALPHA_GATEWAY_API") {
        return Err(format!("diff does not name the alpha flag:\n{diff}").into());
    }
    if !diff.contains(
        "-| `values.pilot.env.PILOT_ENABLE_ALPHA_GATEWAY_API` | `true` | overlay |\n\
         +| `values.pilot.env.PILOT_ENABLE_ALPHA_GATEWAY_API` | `false` | overlay |\n",
    ) {
        return Err(format!("diff does not show the flipped value:\n{diff}").into());
    }
    if report.teardown_error.is_some() {
        return Err("teardown failed after a docs mismatch".into());
    }
    Ok(())
}

#[test]
fn tampered_golden_line_is_named() -> Result<(), Box<dyn std::error::Error>> {
    let scratch = ScratchGolden::copy_checked_in()?;
    scratch.edit(
        "profile-default/values.md",
        "| `values.pilot.replicaCount` | `1` | profile |",
        "| `values.pilot.replicaCount` | `3` | profile |",
    )?;

    let report = suite(scratch.harness(false))?.run()?;
    let diff = failed_diff(&report)?;
    if !diff.starts_with("profile-default/values.md: content differs from golden\n") {
        return Err(format!("unexpected failing document:\n{diff}").into());
    }
    if !diff.contains("-| `values.pilot.replicaCount` | `3` | profile |\n")
        || !diff.contains("+| `values.pilot.replicaCount` | `1` | profile |\n")
    {
        return Err(format!("diff does not name the changed line:\n{diff}").into());
    }
    Ok(())
}

#[test]
fn stale_golden_document_fails() -> Result<(), Box<dyn std::error::Error>> {
    let scratch = ScratchGolden::copy_checked_in()?;
    fs::write(scratch.doc("profile-default/legacy.md"), "# Legacy\n")?;

    let report = suite(scratch.harness(false))?.run()?;
    let diff = failed_diff(&report)?;
    if !diff.contains("profile-default/legacy.md: golden document is not rendered") {
        return Err(format!("stale document not reported:\n{diff}").into());
    }
    Ok(())
}

#[test]
fn missing_golden_root_is_an_environment_fault() -> Result<(), Box<dyn std::error::Error>> {
    let scratch = ScratchGolden::empty()?;
    let mut harness = scratch.harness(false);
    harness.golden_root = scratch.root().join("absent");

    let report = suite(harness)?.run()?;
    let status = report.outcome(DOCS_LABEL).map(|outcome| outcome.status);
    if status != Some(TestStatus::Errored) {
        return Err(format!("expected errored docs test:\n{}", report.to_markdown()).into());
    }
    Ok(())
}

#[test]
fn refresh_reproduces_checked_in_golden() -> Result<(), Box<dyn std::error::Error>> {
    let scratch = ScratchGolden::empty()?;
    let report = suite(scratch.harness(true))?.run()?;
    if !report.is_success() {
        return Err(format!("refresh failed:\n{}", report.to_markdown()).into());
    }
    for doc in DOCS {
        let rendered = fs::read(scratch.doc(doc))?;
        let checked_in = fs::read(golden_root().join(doc))?;
        if rendered != checked_in {
            return Err(format!("{doc} differs from the checked-in golden document").into());
        }
    }
    Ok(())
}
